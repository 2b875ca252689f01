/// The end-to-end query run: parse the query, build the interesting-field
/// set, decode records from the chosen input, and print matches
/// (SPEC_FULL.md §4.6, §6).
use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use fql::Query;
use recs::{FieldSet, RecsParser};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("{0}")]
    Parse(#[from] fql::ParseError),
    #[error("{0}")]
    Recs(#[from] recs::RecsError),
    #[error("Can not open file '{path}'")]
    OpenFile {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("{0}")]
    Io(#[from] io::Error),
}

/// Runs the query against `input` (stdin if `None`) and writes matches to
/// standard output.
pub fn run(query: &str, input: Option<&Path>) -> Result<(), DriverError> {
    let rendered = execute(query, input)?;
    io::stdout().write_all(rendered.as_bytes())?;
    Ok(())
}

/// Same as [`run`], but returns the rendered output instead of printing it.
/// Exercised directly by the fixture-driven integration tests.
pub fn execute(query: &str, input: Option<&Path>) -> Result<String, DriverError> {
    let query = fql::parse(query)?;
    let interesting: FieldSet = query.interesting_fields().into_iter().collect();
    tracing::debug!(fields = interesting.len(), "resolved interesting fields");

    match input {
        Some(path) => {
            let file = File::open(path).map_err(|source| DriverError::OpenFile {
                path: path.display().to_string(),
                source,
            })?;
            execute_reader(&query, interesting, BufReader::new(file))
        }
        None => execute_reader(&query, interesting, BufReader::new(io::stdin().lock())),
    }
}

/// Runs a query against an in-memory records stream, bypassing file/stdin
/// selection entirely. Used by fixture tests that supply the input inline.
pub fn execute_str(query: &str, input: &str) -> Result<String, DriverError> {
    let query = fql::parse(query)?;
    let interesting: FieldSet = query.interesting_fields().into_iter().collect();
    execute_reader(&query, interesting, input.as_bytes())
}

fn execute_reader<R: BufRead>(
    query: &Query,
    interesting: FieldSet,
    reader: R,
) -> Result<String, DriverError> {
    let mut parser = RecsParser::new(reader, interesting);
    let mut out = String::new();

    while parser.next()? {
        let record = parser.current();
        if !query.where_.matches(&record) {
            continue;
        }

        for name in &query.projection {
            let field = record.get(*name);
            if field.is_null() {
                continue;
            }
            let _ = writeln!(out, "{}: {}", name, field);
        }
        out.push('\n');
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reports_open_error() {
        let err = execute("SELECT a WHERE a = 1", Some(Path::new("/no/such/file"))).unwrap_err();
        assert!(matches!(err, DriverError::OpenFile { .. }));
        assert!(err.to_string().starts_with("Can not open file"));
    }

    #[test]
    fn bad_query_reports_parse_error() {
        let err = execute_str("NOT A QUERY", "").unwrap_err();
        assert!(matches!(err, DriverError::Parse(_)));
    }

    #[test]
    fn basic_string_match() {
        let out = execute_str(
            r#"SELECT a WHERE a = "hi""#,
            "a=hi\nb=x\nEOE\na=bye\nEOE\n",
        )
        .unwrap();
        assert_eq!(out, "a: hi\n\n");
    }

    #[test]
    fn skips_null_projected_fields() {
        let out = execute_str(r#"SELECT a, missing WHERE a = "1""#, "a=1\nEOE\n").unwrap();
        assert_eq!(out, "a: 1\n\n");
    }
}
