//! Library surface for the `recs-query` binary, split out so the fixture
//! test harness in `crates/tests` can drive a full query run without
//! shelling out to the compiled binary.

pub mod driver;
