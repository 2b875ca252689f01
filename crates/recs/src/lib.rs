//! Streaming decoder for the line-oriented records format.
//!
//! [`RecsParser`] reads `name=value` records terminated by a literal `EOE`
//! line, decoding only the fields a caller declares interesting (a
//! [`FieldSet`]) and expanding the `Timing`/`Counters` pseudo-fields into
//! their derived `timer-*`/`counter-*` siblings.

mod component_time;
pub mod error;
mod parser;
mod timing;

use std::collections::HashSet;

use model::Name;

/// The set of field names a caller wants materialized out of each record.
pub type FieldSet = HashSet<Name>;

pub use component_time::parse_component_time;
pub use error::RecsError;
pub use parser::RecsParser;
