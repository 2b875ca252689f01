/// Immutable predicate tree: leaf field comparisons composed with AND/OR.
///
/// Expressed as a tagged enum rather than a class hierarchy with virtual
/// dispatch — `match` and `visit_fields` are ordinary pattern matches, with
/// no indirection on the hot path.
use std::fmt;

use crate::name::Name;
use crate::record::Record;
use crate::value::{RelOp, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum PredicateNode {
    Cmp {
        field: Name,
        op: RelOp,
        literal: Value,
    },
    And(Vec<PredicateNode>),
    Or(Vec<PredicateNode>),
    True,
}

impl PredicateNode {
    pub fn cmp(field: Name, op: RelOp, literal: Value) -> Self {
        PredicateNode::Cmp { field, op, literal }
    }

    /// Builds an `And` node, collapsing a single child to itself.
    pub fn and(children: Vec<PredicateNode>) -> Self {
        Self::composite(children, PredicateNode::And)
    }

    /// Builds an `Or` node, collapsing a single child to itself.
    pub fn or(children: Vec<PredicateNode>) -> Self {
        Self::composite(children, PredicateNode::Or)
    }

    fn composite(mut children: Vec<PredicateNode>, wrap: fn(Vec<PredicateNode>) -> Self) -> Self {
        if children.len() == 1 {
            children.pop().expect("len checked above")
        } else {
            wrap(children)
        }
    }

    /// Evaluates the predicate against `record`.
    pub fn matches(&self, record: &Record<'_>) -> bool {
        match self {
            PredicateNode::Cmp { field, op, literal } => {
                let value = record.get(*field);
                literal.relate(&value, *op)
            }
            PredicateNode::And(children) => children.iter().all(|c| c.matches(record)),
            PredicateNode::Or(children) => children.iter().any(|c| c.matches(record)),
            PredicateNode::True => true,
        }
    }

    /// Invokes `cb` for every field name this predicate consults.
    pub fn visit_fields(&self, cb: &mut impl FnMut(Name)) {
        match self {
            PredicateNode::Cmp { field, .. } => cb(*field),
            PredicateNode::And(children) | PredicateNode::Or(children) => {
                for c in children {
                    c.visit_fields(cb);
                }
            }
            PredicateNode::True => {}
        }
    }
}

impl fmt::Display for PredicateNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicateNode::Cmp { field, op, literal } => {
                write!(f, "{} {} {}", field, op, literal)
            }
            PredicateNode::And(children) => write_composite(f, children, "AND"),
            PredicateNode::Or(children) => write_composite(f, children, "OR"),
            PredicateNode::True => write!(f, "true"),
        }
    }
}

fn write_composite(f: &mut fmt::Formatter<'_>, children: &[PredicateNode], op: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, c) in children.iter().enumerate() {
        if i > 0 {
            write!(f, " {} ", op)?;
        }
        write!(f, "{}", c)?;
    }
    f.write_str(")")
}
