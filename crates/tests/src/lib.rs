//! Fixture helpers shared by the integration test harness.
//!
//! A fixture (`crates/tests/fixtures/*.case`) is a plain-text file with
//! three sections separated by a line containing exactly `===`: the query,
//! the records input, and the expected rendered output.

/// One parsed fixture case.
pub struct Case {
    pub query: String,
    pub input: String,
    pub expected: String,
}

/// Splits fixture file content into its three `===`-delimited sections.
pub fn parse_case(content: &str) -> Case {
    let sections: Vec<&str> = content.split("\n===\n").collect();
    assert_eq!(
        sections.len(),
        3,
        "fixture must contain exactly two '===' separator lines"
    );
    Case {
        query: sections[0].trim().to_string(),
        input: sections[1].to_string(),
        expected: sections[2].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_three_sections() {
        let case = parse_case("SELECT a WHERE a = 1\n===\na=1\nEOE\n===\na: 1\n\n");
        assert_eq!(case.query, "SELECT a WHERE a = 1");
        assert_eq!(case.input, "a=1\nEOE\n");
        assert_eq!(case.expected, "a: 1\n\n");
    }
}
