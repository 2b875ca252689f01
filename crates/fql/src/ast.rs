/// AST produced by the FQL parser.
use model::{Name, PredicateNode};

/// A parsed `SELECT … WHERE …` query.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Field names in the order they were listed. Always non-empty.
    pub projection: Vec<Name>,
    pub where_: PredicateNode,
}

impl Query {
    /// The union of the projection and every field the predicate consults —
    /// the set `RecsParser` needs to materialize.
    pub fn interesting_fields(&self) -> Vec<Name> {
        let mut fields = self.projection.clone();
        self.where_.visit_fields(&mut |n| {
            if !fields.contains(&n) {
                fields.push(n);
            }
        });
        fields
    }
}
