/// The field-value model: a tagged sum over `Null | Str | Num`.
///
/// Equality and ordering are defined *within* a variant. Any cross-variant
/// comparison — including `Null` compared to anything, `Null` included —
/// yields `false` for every relation. Comparisons never panic or promote.
use std::borrow::Cow;
use std::fmt;

/// A field value as stored in a `Record`.
///
/// `Str` borrows from a line buffer when produced by the streaming parser,
/// or owns its bytes when constructed directly (e.g. in tests). Literals
/// parsed from a query are never `Null`; see `Value`.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<'a> {
    Null,
    Str(Cow<'a, str>),
    Num(f64),
}

impl<'a> Field<'a> {
    pub fn str(s: impl Into<Cow<'a, str>>) -> Self {
        Field::Str(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Field::Null)
    }

    pub fn into_owned(self) -> Field<'static> {
        match self {
            Field::Null => Field::Null,
            Field::Str(s) => Field::Str(Cow::Owned(s.into_owned())),
            Field::Num(n) => Field::Num(n),
        }
    }
}

impl fmt::Display for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Null => Ok(()),
            Field::Str(s) => f.write_str(s),
            Field::Num(n) => write!(f, "{}", n),
        }
    }
}

/// A query literal. Never `Null` — the grammar has no null literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Num(f64),
}

impl Value {
    /// Compares a record's field against this literal under `op`.
    ///
    /// Returns `false` whenever the field is `Null` or its variant differs
    /// from the literal's — never panics, never promotes across types.
    pub fn relate(&self, field: &Field<'_>, op: RelOp) -> bool {
        match (field, self) {
            (Field::Str(f), Value::Str(v)) => op.apply_str(f, v),
            (Field::Num(f), Value::Num(v)) => op.apply_num(*f, *v),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{}", json_escape(s)),
            Value::Num(n) => write!(f, "{}", n),
        }
    }
}

fn json_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Relational operators usable in a `Cmp` predicate leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl RelOp {
    fn apply_str(self, l: &str, r: &str) -> bool {
        match self {
            RelOp::Eq => l == r,
            RelOp::Ne => l != r,
            RelOp::Lt => l < r,
            RelOp::Le => l <= r,
            RelOp::Gt => l > r,
            RelOp::Ge => l >= r,
        }
    }

    fn apply_num(self, l: f64, r: f64) -> bool {
        match self {
            RelOp::Eq => l == r,
            RelOp::Ne => l != r,
            RelOp::Lt => l < r,
            RelOp::Le => l <= r,
            RelOp::Gt => l > r,
            RelOp::Ge => l >= r,
        }
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RelOp::Eq => "=",
            RelOp::Ne => "<>",
            RelOp::Lt => "<",
            RelOp::Le => "<=",
            RelOp::Gt => ">",
            RelOp::Ge => ">=",
        };
        f.write_str(s)
    }
}
