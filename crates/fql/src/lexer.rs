/// Lexer/tokenizer for FQL (`SELECT f1, f2 WHERE <expr>`).
///
/// Converts a query string into a stream of tokens for the parser. Keywords
/// (`SELECT`, `WHERE`, `AND`, `OR`) are case-insensitive; everything else is
/// matched literally.
use std::fmt;

use model::RelOp;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Select,
    Where,
    And,
    Or,
    Ident(String),
    String(String),
    Number(f64),
    Comma,
    LParen,
    RParen,
    Rel(RelOp),
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Select => write!(f, "SELECT"),
            Token::Where => write!(f, "WHERE"),
            Token::And => write!(f, "AND"),
            Token::Or => write!(f, "OR"),
            Token::Ident(s) => write!(f, "{}", s),
            Token::String(s) => write!(f, "\"{}\"", s),
            Token::Number(n) => write!(f, "{}", n),
            Token::Comma => write!(f, ","),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Rel(op) => write!(f, "{}", op),
            Token::Eof => write!(f, "<eof>"),
        }
    }
}

/// A token paired with the byte offset it started at, for error reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub offset: usize,
}

pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexerError {
    #[error("unexpected character '{0}' at offset {1}")]
    UnexpectedChar(char, usize),
    #[error("unterminated string")]
    UnterminatedString(usize),
    #[error("bad escape")]
    BadEscape(usize),
    #[error("bad number")]
    BadNumber(usize),
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input: input.as_bytes(),
            pos: 0,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Spanned>, LexerError> {
        let mut out = Vec::new();
        loop {
            let spanned = self.next_token()?;
            let is_eof = spanned.token == Token::Eof;
            out.push(spanned);
            if is_eof {
                break;
            }
        }
        Ok(out)
    }

    fn next_token(&mut self) -> Result<Spanned, LexerError> {
        self.skip_whitespace();
        let start = self.pos;

        if self.is_eof() {
            return Ok(Spanned {
                token: Token::Eof,
                offset: start,
            });
        }

        let c = self.current() as char;
        let token = match c {
            ',' => {
                self.advance();
                Token::Comma
            }
            '(' => {
                self.advance();
                Token::LParen
            }
            ')' => {
                self.advance();
                Token::RParen
            }
            '"' => return self.read_string(start),
            '=' => {
                self.advance();
                if self.current_is('=') {
                    self.advance();
                }
                Token::Rel(RelOp::Eq)
            }
            '<' => {
                self.advance();
                if self.current_is('>') {
                    self.advance();
                    Token::Rel(RelOp::Ne)
                } else if self.current_is('=') {
                    self.advance();
                    Token::Rel(RelOp::Le)
                } else {
                    Token::Rel(RelOp::Lt)
                }
            }
            '>' => {
                self.advance();
                if self.current_is('=') {
                    self.advance();
                    Token::Rel(RelOp::Ge)
                } else {
                    Token::Rel(RelOp::Gt)
                }
            }
            '!' => {
                self.advance();
                if self.current_is('=') {
                    self.advance();
                    Token::Rel(RelOp::Ne)
                } else {
                    return Err(LexerError::UnexpectedChar('!', start));
                }
            }
            '&' => {
                self.advance();
                if self.current_is('&') {
                    self.advance();
                    Token::And
                } else {
                    return Err(LexerError::UnexpectedChar('&', start));
                }
            }
            '|' => {
                self.advance();
                if self.current_is('|') {
                    self.advance();
                    Token::Or
                } else {
                    return Err(LexerError::UnexpectedChar('|', start));
                }
            }
            _ if c.is_ascii_digit() || (c == '-' && self.peek_is_digit()) => {
                return self.read_number(start)
            }
            _ if c.is_ascii_alphabetic() || c == '_' => self.read_identifier(),
            _ => return Err(LexerError::UnexpectedChar(c, start)),
        };

        Ok(Spanned {
            token,
            offset: start,
        })
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn current(&self) -> u8 {
        self.input[self.pos]
    }

    fn current_is(&self, c: char) -> bool {
        !self.is_eof() && self.current() == c as u8
    }

    fn peek_is_digit(&self) -> bool {
        self.input
            .get(self.pos + 1)
            .map(|b| b.is_ascii_digit())
            .unwrap_or(false)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn skip_whitespace(&mut self) {
        while !self.is_eof() && (self.current() as char).is_whitespace() {
            self.advance();
        }
    }

    fn read_string(&mut self, start: usize) -> Result<Spanned, LexerError> {
        self.advance(); // opening quote
        let mut value = String::new();

        loop {
            if self.is_eof() {
                return Err(LexerError::UnterminatedString(start));
            }
            let c = self.current() as char;
            if c == '"' {
                self.advance();
                break;
            }
            if c == '\\' {
                self.advance();
                if self.is_eof() {
                    return Err(LexerError::UnterminatedString(start));
                }
                let esc = self.current() as char;
                let decoded = match esc {
                    '"' => '"',
                    '\\' => '\\',
                    '/' => '/',
                    'b' => '\u{8}',
                    'f' => '\u{c}',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    _ => return Err(LexerError::BadEscape(self.pos)),
                };
                value.push(decoded);
                self.advance();
            } else {
                value.push(c);
                self.advance();
            }
        }

        Ok(Spanned {
            token: Token::String(value),
            offset: start,
        })
    }

    fn read_number(&mut self, start: usize) -> Result<Spanned, LexerError> {
        let begin = self.pos;
        if self.current_is('-') {
            self.advance();
        }
        self.consume_digits();
        if self.current_is('.') {
            self.advance();
            self.consume_digits();
        }
        if self.current_is('e') || self.current_is('E') {
            self.advance();
            if self.current_is('+') || self.current_is('-') {
                self.advance();
            }
            self.consume_digits();
        }

        let text = std::str::from_utf8(&self.input[begin..self.pos]).expect("ascii only");
        let n: f64 = text.parse().map_err(|_| LexerError::BadNumber(start))?;
        Ok(Spanned {
            token: Token::Number(n),
            offset: start,
        })
    }

    fn consume_digits(&mut self) {
        while !self.is_eof() && (self.current() as char).is_ascii_digit() {
            self.advance();
        }
    }

    fn read_identifier(&mut self) -> Token {
        let begin = self.pos;
        // field_name := [A-Za-z_] [A-Za-z0-9_.:\/-]*
        self.advance();
        while !self.is_eof() {
            let c = self.current() as char;
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '\\' | '/' | '-') {
                self.advance();
            } else {
                break;
            }
        }
        let text = std::str::from_utf8(&self.input[begin..self.pos])
            .expect("ascii only")
            .to_string();

        match text.to_ascii_uppercase().as_str() {
            "SELECT" => Token::Select,
            "WHERE" => Token::Where,
            "AND" => Token::And,
            "OR" => Token::Or,
            _ => Token::Ident(text),
        }
    }
}
