/// Streaming decoder for the records text format (SPEC_FULL.md §4.5).
///
/// One record is live at a time. `next()` advances the stream and decodes
/// the next record's *interesting* fields only; `current()` borrows those
/// fields out of an internal line-buffer pool. The borrow checker enforces
/// the "valid only until the next call to `next()`" rule for free: `current`
/// takes `&self`, `next` takes `&mut self`, so a `Record` from one record
/// cannot outlive the call that decodes the next one.
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::io::BufRead;

use model::{Field, MutableRecord, Name, Record};

use crate::component_time;
use crate::error::{RecsError, Result};
use crate::timing::{self, Derived};

const INITIAL_LINE_CAPACITY: usize = 256;

/// Where a decoded field's value lives: either derived eagerly (`Timing`,
/// `Counters`, and parsed component-times yield numbers on the spot) or
/// still sitting in the line buffer pool as a byte range.
enum Slot {
    Str { line: usize, start: usize, end: usize },
    Num(f64),
}

/// Decodes records from `R`, materializing only fields named in
/// `interesting`.
pub struct RecsParser<R> {
    reader: R,
    interesting: HashSet<Name>,
    lines: Vec<String>,
    next_line: usize,
    slots: HashMap<Name, Slot>,
}

impl<R: BufRead> RecsParser<R> {
    pub fn new(reader: R, interesting: HashSet<Name>) -> Self {
        RecsParser {
            reader,
            interesting,
            lines: Vec::new(),
            next_line: 0,
            slots: HashMap::new(),
        }
    }

    /// Decodes the next record. `Ok(true)` means `current()` now reflects
    /// it; `Ok(false)` means the stream ended cleanly between records.
    /// An EOF in the middle of a record is `Err(RecsError::UnexpectedEof)`.
    pub fn next(&mut self) -> Result<bool> {
        self.slots.clear();
        self.next_line = 0;
        let mut any_content = false;

        loop {
            if !self.fill_next_line()? {
                if any_content {
                    tracing::error!("stream ended mid-record");
                    return Err(RecsError::UnexpectedEof);
                }
                tracing::trace!("stream ended cleanly between records");
                return Ok(false);
            }

            let idx = self.next_line;

            if self.lines[idx].as_bytes().first() == Some(&b'-') {
                // Any line opening with '-' is treated as a divider and
                // silently absorbed, regardless of its position in the
                // record.
                continue;
            }

            if self.lines[idx] == "EOE" {
                tracing::trace!(fields = self.slots.len(), "decoded record");
                return Ok(true);
            }

            any_content = true;

            if self.process_line(idx)? {
                self.next_line += 1;
            }
        }
    }

    /// The fields of the record most recently decoded by `next()`.
    pub fn current(&self) -> Record<'_> {
        let mut rec = MutableRecord::with_capacity(self.slots.len().max(1));
        for (name, slot) in &self.slots {
            let field = match slot {
                Slot::Str { line, start, end } => {
                    Field::Str(Cow::Borrowed(&self.lines[*line][*start..*end]))
                }
                Slot::Num(n) => Field::Num(*n),
            };
            rec.set(*name, field);
        }
        rec.into_record()
    }

    fn fill_next_line(&mut self) -> Result<bool> {
        if self.next_line == self.lines.len() {
            self.lines.push(String::with_capacity(INITIAL_LINE_CAPACITY));
        }

        let buf = &mut self.lines[self.next_line];
        buf.clear();
        let bytes = self.reader.read_line(buf)?;
        if bytes == 0 {
            return Ok(false);
        }
        while matches!(buf.chars().last(), Some('\n') | Some('\r')) {
            buf.pop();
        }
        Ok(true)
    }

    /// Decodes one `name=value` line, returning whether it contributed any
    /// interesting field (and so should advance to a fresh line buffer).
    fn process_line(&mut self, idx: usize) -> Result<bool> {
        let eq_pos = self.lines[idx]
            .find('=')
            .ok_or_else(|| RecsError::MalformedLine(self.lines[idx].clone()))?;
        let name = self.lines[idx][..eq_pos].to_string();
        let value_start = eq_pos + 1;
        let value_end = self.lines[idx].len();

        match name.as_str() {
            "Timing" => {
                let derived = timing::parse_timing(&self.lines[idx][value_start..])?;
                Ok(self.store_derived(derived))
            }
            "Counters" => {
                let derived = timing::parse_counters(&self.lines[idx][value_start..])?;
                Ok(self.store_derived(derived))
            }
            _ => {
                let field_name = Name::new(&name);
                if !self.interesting.contains(&field_name) {
                    return Ok(false);
                }

                let slot = if matches!(name.as_str(), "UserTime" | "SystemTime" | "Time") {
                    component_time::parse_component_time(&self.lines[idx][value_start..])
                        .map(Slot::Num)
                        .unwrap_or(Slot::Str {
                            line: idx,
                            start: value_start,
                            end: value_end,
                        })
                } else {
                    Slot::Str {
                        line: idx,
                        start: value_start,
                        end: value_end,
                    }
                };

                self.slots.insert(field_name, slot);
                Ok(true)
            }
        }
    }

    fn store_derived(&mut self, derived: Vec<Derived>) -> bool {
        let mut added = false;
        for d in derived {
            let (name, value) = match d {
                Derived::Time { name, value } => (name, value),
                Derived::Count { name, value } => (name, value),
                Derived::Counter { name, value } => (name, value),
            };
            let field_name = Name::new(&name);
            if self.interesting.contains(&field_name) {
                self.slots.insert(field_name, Slot::Num(value));
                added = true;
            }
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interesting(names: &[&str]) -> HashSet<Name> {
        names.iter().map(|n| Name::new(n)).collect()
    }

    #[test]
    fn decodes_a_single_record() {
        let input = "name=hello\nvalue=42\nEOE\n";
        let mut p = RecsParser::new(input.as_bytes(), interesting(&["name", "value"]));
        assert!(p.next().unwrap());
        let rec = p.current();
        assert_eq!(rec.get(Name::new("name")), Field::str("hello"));
        assert_eq!(rec.get(Name::new("value")), Field::str("42"));
        assert!(!p.next().unwrap());
    }

    #[test]
    fn uninteresting_fields_are_not_materialized() {
        let input = "name=hello\nother=skip\nEOE\n";
        let mut p = RecsParser::new(input.as_bytes(), interesting(&["name"]));
        assert!(p.next().unwrap());
        let rec = p.current();
        assert!(rec.has(Name::new("name")));
        assert!(!rec.has(Name::new("other")));
    }

    #[test]
    fn leading_and_interleaved_dividers_are_absorbed() {
        let input = "-----\nname=hello\n-----\nEOE\n";
        let mut p = RecsParser::new(input.as_bytes(), interesting(&["name"]));
        assert!(p.next().unwrap());
        assert_eq!(p.current().get(Name::new("name")), Field::str("hello"));
    }

    #[test]
    fn clean_eof_between_records_is_ok_false() {
        let input = "";
        let mut p = RecsParser::new(input.as_bytes(), interesting(&["name"]));
        assert!(!p.next().unwrap());
    }

    #[test]
    fn eof_mid_record_is_unexpected_eof() {
        let input = "name=hello\n";
        let mut p = RecsParser::new(input.as_bytes(), interesting(&["name"]));
        assert!(matches!(p.next(), Err(RecsError::UnexpectedEof)));
    }

    #[test]
    fn malformed_line_without_equals_is_error() {
        let input = "not-a-kv-line\nEOE\n";
        let mut p = RecsParser::new(input.as_bytes(), interesting(&["name"]));
        assert!(matches!(p.next(), Err(RecsError::MalformedLine(_))));
    }

    #[test]
    fn timing_and_counters_expand_into_derived_fields() {
        let input = "Timing=db:3.5/2\nCounters=hits=7\nEOE\n";
        let mut p = RecsParser::new(
            input.as_bytes(),
            interesting(&["timer-db-time", "timer-db-count", "counter-hits-value"]),
        );
        assert!(p.next().unwrap());
        let rec = p.current();
        assert_eq!(rec.get(Name::new("timer-db-time")), Field::Num(3.5));
        assert_eq!(rec.get(Name::new("timer-db-count")), Field::Num(2.0));
        assert_eq!(rec.get(Name::new("counter-hits-value")), Field::Num(7.0));
    }

    #[test]
    fn component_time_fields_parse_to_numbers_with_raw_fallback() {
        let input = "UserTime=2 msecs 500 usecs\nSystemTime=not-a-time\nEOE\n";
        let mut p = RecsParser::new(input.as_bytes(), interesting(&["UserTime", "SystemTime"]));
        assert!(p.next().unwrap());
        let rec = p.current();
        assert_eq!(rec.get(Name::new("UserTime")), Field::Num(2.5));
        assert_eq!(rec.get(Name::new("SystemTime")), Field::str("not-a-time"));
    }

    #[test]
    fn second_record_reuses_buffers_without_crosstalk() {
        let input = "name=first\nEOE\nname=second\nEOE\n";
        let mut p = RecsParser::new(input.as_bytes(), interesting(&["name"]));
        assert!(p.next().unwrap());
        assert_eq!(p.current().get(Name::new("name")), Field::str("first"));
        assert!(p.next().unwrap());
        assert_eq!(p.current().get(Name::new("name")), Field::str("second"));
    }
}
