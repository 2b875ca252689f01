/// The `<long> "msecs" <long> "usecs"` sub-grammar used by the `UserTime`,
/// `SystemTime`, and `Time` fields. Case-insensitive, whitespace-permissive.
/// Returns `None` on any mismatch — callers fall back to storing the raw
/// value as a string, per SPEC_FULL.md §4.5.
pub fn parse_component_time(s: &str) -> Option<f64> {
    let rest = s.trim_start();
    let (msecs, rest) = take_long(rest)?;
    let rest = strip_ci_prefix(rest.trim_start(), "msecs")?;
    let (usecs, rest) = take_long(rest.trim_start())?;
    let rest = strip_ci_prefix(rest.trim_start(), "usecs")?;

    if !rest.trim().is_empty() {
        return None;
    }

    Some(msecs as f64 + usecs as f64 / 1000.0)
}

fn take_long(s: &str) -> Option<(i64, &str)> {
    let mut end = 0;
    let bytes = s.as_bytes();
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    let n: i64 = s[..end].parse().ok()?;
    Some((n, &s[end..]))
}

fn strip_ci_prefix<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if s.len() < prefix.len() {
        return None;
    }
    if s[..prefix.len()].eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}
