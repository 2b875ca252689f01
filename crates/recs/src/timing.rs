/// The `Timing` and `Counters` sub-grammars (SPEC_FULL.md §4.5):
///
/// ```text
/// timings  := entry ("," entry)*
/// entry    := key ":" double "/" long
///
/// counters := cntr ("," cntr)*
/// cntr     := key "=" double
/// ```
///
/// Each `Timing` entry derives two field names (`timer-<key>-time`,
/// `timer-<key>-count`); each `Counters` entry derives one
/// (`counter-<key>-value`). A malformed numeric portion is a fatal parse
/// error for the record.
use crate::error::RecsError;

/// One field derived from a `Timing` or `Counters` line.
pub enum Derived {
    Time { name: String, value: f64 },
    Count { name: String, value: f64 },
    Counter { name: String, value: f64 },
}

pub fn parse_timing(raw: &str) -> Result<Vec<Derived>, RecsError> {
    let mut out = Vec::new();
    for entry in raw.split(',').filter(|e| !e.is_empty()) {
        let (key, rest) = entry
            .split_once(':')
            .ok_or_else(|| RecsError::BadTiming(raw.to_string()))?;
        let (time_str, count_str) = rest
            .split_once('/')
            .ok_or_else(|| RecsError::BadTiming(raw.to_string()))?;

        let time: f64 = time_str
            .trim()
            .parse()
            .map_err(|_| RecsError::BadTiming(raw.to_string()))?;
        let count: i64 = count_str
            .trim()
            .parse()
            .map_err(|_| RecsError::BadTiming(raw.to_string()))?;

        out.push(Derived::Time {
            name: format!("timer-{}-time", key),
            value: time,
        });
        out.push(Derived::Count {
            name: format!("timer-{}-count", key),
            value: count as f64,
        });
    }
    Ok(out)
}

pub fn parse_counters(raw: &str) -> Result<Vec<Derived>, RecsError> {
    let mut out = Vec::new();
    for entry in raw.split(',').filter(|e| !e.is_empty()) {
        let (key, value_str) = entry
            .split_once('=')
            .ok_or_else(|| RecsError::BadCounters(raw.to_string()))?;
        let value: f64 = value_str
            .trim()
            .parse()
            .map_err(|_| RecsError::BadCounters(raw.to_string()))?;

        out.push(Derived::Counter {
            name: format!("counter-{}-value", key),
            value,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(derived: &[Derived]) -> Vec<(&str, f64)> {
        derived
            .iter()
            .map(|d| match d {
                Derived::Time { name, value } => (name.as_str(), *value),
                Derived::Count { name, value } => (name.as_str(), *value),
                Derived::Counter { name, value } => (name.as_str(), *value),
            })
            .collect()
    }

    #[test]
    fn timing_decomposes_into_time_and_count() {
        let derived = parse_timing("db:3.5/2,net:1.0/1").unwrap();
        assert_eq!(
            names(&derived),
            vec![
                ("timer-db-time", 3.5),
                ("timer-db-count", 2.0),
                ("timer-net-time", 1.0),
                ("timer-net-count", 1.0),
            ]
        );
    }

    #[test]
    fn counters_decompose() {
        let derived = parse_counters("hits=3,misses=1.5").unwrap();
        assert_eq!(
            names(&derived),
            vec![("counter-hits-value", 3.0), ("counter-misses-value", 1.5)]
        );
    }

    #[test]
    fn bad_timing_number_is_fatal() {
        assert!(parse_timing("db:notanumber/2").is_err());
    }

    #[test]
    fn bad_counters_number_is_fatal() {
        assert!(parse_counters("x=notanumber").is_err());
    }
}
