/// Recursive-descent parser for FQL.
///
/// Grammar (see SPEC_FULL.md §4.3):
///
/// ```text
/// query      := SELECT field_list WHERE or_expr
/// field_list := field_name ("," field_name)*
/// or_expr    := and_expr ((OR | "||") and_expr)*
/// and_expr   := primary ((AND | "&&") primary)*
/// primary    := "(" or_expr ")" | cmp
/// cmp        := field_name rel_op literal
/// ```
///
/// `OR` binds looser than `AND`; parentheses override both.
use model::{Name, PredicateNode, Value};

use crate::ast::Query;
use crate::lexer::{Lexer, LexerError, Spanned, Token};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("{0}")]
    Lexer(#[from] LexerError),
    #[error("{reason} at offset {offset}")]
    Syntax { offset: usize, reason: String },
}

impl ParseError {
    fn syntax(offset: usize, reason: impl Into<String>) -> Self {
        ParseError::Syntax {
            offset,
            reason: reason.into(),
        }
    }
}

pub struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    pub fn new(input: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Parser { tokens, pos: 0 })
    }

    pub fn parse(&mut self) -> Result<Query, ParseError> {
        self.expect_keyword(Token::Select, "expected SELECT")?;
        let projection = self.parse_field_list()?;
        self.expect_keyword(Token::Where, "expected WHERE")?;
        let where_ = self.parse_or_expr()?;

        if self.current() != &Token::Eof {
            return Err(self.err("unexpected token"));
        }

        Ok(Query { projection, where_ })
    }

    fn parse_field_list(&mut self) -> Result<Vec<Name>, ParseError> {
        let mut fields = vec![self.expect_field_name()?];
        while self.current() == &Token::Comma {
            self.advance();
            fields.push(self.expect_field_name()?);
        }
        Ok(fields)
    }

    fn parse_or_expr(&mut self) -> Result<PredicateNode, ParseError> {
        let mut children = vec![self.parse_and_expr()?];
        while self.current() == &Token::Or {
            self.advance();
            children.push(self.parse_and_expr()?);
        }
        Ok(PredicateNode::or(children))
    }

    fn parse_and_expr(&mut self) -> Result<PredicateNode, ParseError> {
        let mut children = vec![self.parse_primary()?];
        while self.current() == &Token::And {
            self.advance();
            children.push(self.parse_primary()?);
        }
        Ok(PredicateNode::and(children))
    }

    fn parse_primary(&mut self) -> Result<PredicateNode, ParseError> {
        if self.current() == &Token::LParen {
            self.advance();
            let inner = self.parse_or_expr()?;
            self.expect(Token::RParen, "expected ')'")?;
            return Ok(inner);
        }
        self.parse_cmp()
    }

    fn parse_cmp(&mut self) -> Result<PredicateNode, ParseError> {
        let field = self.expect_field_name()?;
        let op = match self.current().clone() {
            Token::Rel(op) => {
                self.advance();
                op
            }
            _ => return Err(self.err("expected comparison operator")),
        };
        let literal = self.parse_literal()?;
        Ok(PredicateNode::cmp(field, op, literal))
    }

    fn parse_literal(&mut self) -> Result<Value, ParseError> {
        match self.current().clone() {
            Token::String(s) => {
                self.advance();
                Ok(Value::Str(s))
            }
            Token::Number(n) => {
                self.advance();
                Ok(Value::Num(n))
            }
            _ => Err(self.err("expected literal")),
        }
    }

    fn expect_field_name(&mut self) -> Result<Name, ParseError> {
        match self.current().clone() {
            Token::Ident(s) => {
                self.advance();
                Ok(Name::new(&s))
            }
            _ => Err(self.err("expected field name")),
        }
    }

    fn expect_keyword(&mut self, want: Token, reason: &str) -> Result<(), ParseError> {
        if self.current() == &want {
            self.advance();
            Ok(())
        } else {
            Err(self.err(reason))
        }
    }

    fn expect(&mut self, want: Token, reason: &str) -> Result<(), ParseError> {
        if self.current() == &want {
            self.advance();
            Ok(())
        } else {
            Err(self.err(reason))
        }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos].token
    }

    fn offset(&self) -> usize {
        self.tokens[self.pos].offset
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn err(&self, reason: &str) -> ParseError {
        ParseError::syntax(self.offset(), reason)
    }
}

/// Parses an FQL query string into a `Query`.
pub fn parse(input: &str) -> Result<Query, ParseError> {
    tracing::debug!(query = input, "parsing fql query");
    Parser::new(input)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::RelOp;

    #[test]
    fn basic_query() {
        let q = parse(r#"SELECT a WHERE a = "hi""#).unwrap();
        assert_eq!(q.projection, vec![Name::new("a")]);
        assert_eq!(
            q.where_,
            PredicateNode::cmp(Name::new("a"), RelOp::Eq, Value::Str("hi".into()))
        );
    }

    #[test]
    fn multi_field_projection() {
        let q = parse(r#"SELECT a, b, c WHERE a = 1"#).unwrap();
        assert_eq!(
            q.projection,
            vec![Name::new("a"), Name::new("b"), Name::new("c")]
        );
    }

    #[test]
    fn precedence_and_binds_tighter_than_or() {
        let q = parse("SELECT x WHERE x > 1 AND x < 10 OR x = 42").unwrap();
        let expected = PredicateNode::or(vec![
            PredicateNode::and(vec![
                PredicateNode::cmp(Name::new("x"), RelOp::Gt, Value::Num(1.0)),
                PredicateNode::cmp(Name::new("x"), RelOp::Lt, Value::Num(10.0)),
            ]),
            PredicateNode::cmp(Name::new("x"), RelOp::Eq, Value::Num(42.0)),
        ]);
        assert_eq!(q.where_, expected);
    }

    #[test]
    fn parentheses_override_precedence() {
        let q = parse("SELECT x WHERE (x = 1 OR x = 2) AND x < 10").unwrap();
        let expected = PredicateNode::and(vec![
            PredicateNode::or(vec![
                PredicateNode::cmp(Name::new("x"), RelOp::Eq, Value::Num(1.0)),
                PredicateNode::cmp(Name::new("x"), RelOp::Eq, Value::Num(2.0)),
            ]),
            PredicateNode::cmp(Name::new("x"), RelOp::Lt, Value::Num(10.0)),
        ]);
        assert_eq!(q.where_, expected);
    }

    #[test]
    fn missing_where_is_parse_error() {
        let err = parse("SELECT a").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { reason, .. } if reason.contains("WHERE")));
    }

    #[test]
    fn unterminated_string_is_parse_error() {
        let err = parse(r#"SELECT a WHERE a = "hi"#).unwrap_err();
        assert!(matches!(err, ParseError::Lexer(LexerError::UnterminatedString(_))));
    }

    #[test]
    fn and_or_synonyms_with_symbols() {
        let a = parse(r#"SELECT a WHERE a = 1 AND a = 2"#).unwrap();
        let b = parse(r#"SELECT a WHERE a = 1 && a = 2"#).unwrap();
        assert_eq!(a.where_, b.where_);
    }

    #[test]
    fn eq_and_double_eq_are_synonyms() {
        let a = parse(r#"SELECT a WHERE a = 1"#).unwrap();
        let b = parse(r#"SELECT a WHERE a == 1"#).unwrap();
        assert_eq!(a.where_, b.where_);
    }

    #[test]
    fn ne_and_angle_ne_are_synonyms() {
        let a = parse(r#"SELECT a WHERE a <> 1"#).unwrap();
        let b = parse(r#"SELECT a WHERE a != 1"#).unwrap();
        assert_eq!(a.where_, b.where_);
    }

    #[test]
    fn interesting_fields_union_projection_and_predicate() {
        let q = parse(r#"SELECT a WHERE b = 1"#).unwrap();
        let mut fields: Vec<_> = q.interesting_fields().into_iter().map(|n| n.to_string()).collect();
        fields.sort();
        assert_eq!(fields, vec!["a".to_string(), "b".to_string()]);
    }
}
