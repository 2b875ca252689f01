/// A mapping from interned field `Name` to `Field` value.
///
/// Iteration order is implementation-defined; consumers must not depend on
/// it. `Record::get` returning `Field::Null` is equivalent to `has`
/// returning `false` — the two never disagree.
use std::collections::HashMap;

use crate::name::Name;
use crate::value::Field;

/// Preallocated slot count for a fresh `MutableRecord`, matching the
/// original implementation's default record width.
pub const DEFAULT_CAPACITY: usize = 1024;

#[derive(Debug, Default)]
pub struct Record<'a> {
    fields: HashMap<Name, Field<'a>>,
}

impl<'a> Record<'a> {
    pub fn get(&self, name: Name) -> Field<'a> {
        match self.fields.get(&name) {
            Some(v) => v.clone(),
            None => Field::Null,
        }
    }

    pub fn has(&self, name: Name) -> bool {
        matches!(self.fields.get(&name), Some(v) if !v.is_null())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Name, &Field<'a>)> {
        self.fields.iter().map(|(n, v)| (*n, v))
    }
}

/// A `Record` that can be populated and reused across parses.
#[derive(Debug)]
pub struct MutableRecord<'a> {
    record: Record<'a>,
}

impl<'a> MutableRecord<'a> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        MutableRecord {
            record: Record {
                fields: HashMap::with_capacity(capacity),
            },
        }
    }

    /// Sets `name` to `value`, returning `true` if the field was previously
    /// absent or `Null`.
    pub fn set(&mut self, name: Name, value: Field<'a>) -> bool {
        match self.record.fields.insert(name, value) {
            None => true,
            Some(prev) => prev.is_null(),
        }
    }

    /// Marks every entry `Null`, retaining the underlying table's capacity
    /// and keys so subsequent records reuse the same allocation.
    pub fn clear(&mut self) {
        for v in self.record.fields.values_mut() {
            *v = Field::Null;
        }
    }

    pub fn as_record(&self) -> &Record<'a> {
        &self.record
    }

    /// Consumes the builder, handing back the populated `Record` by value.
    pub fn into_record(self) -> Record<'a> {
        self.record
    }
}

impl<'a> Default for MutableRecord<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> std::ops::Deref for MutableRecord<'a> {
    type Target = Record<'a>;

    fn deref(&self) -> &Self::Target {
        &self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_missing_is_null_and_has_is_false() {
        let r: Record = Record::default();
        let n = Name::new("x");
        assert!(r.get(n).is_null());
        assert!(!r.has(n));
    }

    #[test]
    fn set_then_get_roundtrips() {
        let mut r = MutableRecord::new();
        let n = Name::new("a");
        assert!(r.set(n, Field::str("hi")));
        assert!(r.has(n));
        assert_eq!(r.get(n), Field::str("hi"));
    }

    #[test]
    fn clear_retains_keys_as_null() {
        let mut r = MutableRecord::new();
        let n = Name::new("a");
        r.set(n, Field::Num(1.0));
        r.clear();
        assert!(!r.has(n));
        assert!(r.get(n).is_null());
    }

    #[test]
    fn duplicate_set_is_last_wins() {
        let mut r = MutableRecord::new();
        let n = Name::new("a");
        r.set(n, Field::str("first"));
        r.set(n, Field::str("second"));
        assert_eq!(r.get(n), Field::str("second"));
    }

    #[test]
    fn into_record_preserves_fields() {
        let mut r = MutableRecord::new();
        let n = Name::new("a");
        r.set(n, Field::Num(42.0));
        let frozen = r.into_record();
        assert_eq!(frozen.get(n), Field::Num(42.0));
    }
}
