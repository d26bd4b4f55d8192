mod lexer;
mod literal;

use std::collections::HashMap;
use std::fmt;
use std::iter::Peekable;
use std::vec;

use crate::error::Error;
use crate::number::Number;
pub use self::lexer::{scan, Lexer, Token};
use self::lexer::closing_for;
pub use self::literal::parse_number;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    Define,
    DefineStruct,
    Lambda,
    Quote,
    CheckExpect,
    If,
    Cond,
    Else,
    And,
    Or,
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, Keyword> = hashmap! {
        "define" => Keyword::Define,
        "define-struct" => Keyword::DefineStruct,
        "lambda" => Keyword::Lambda,
        "λ" => Keyword::Lambda,
        "quote" => Keyword::Quote,
        "check-expect" => Keyword::CheckExpect,
        "if" => Keyword::If,
        "cond" => Keyword::Cond,
        "else" => Keyword::Else,
        "and" => Keyword::And,
        "or" => Keyword::Or,
    };
}

impl Keyword {
    pub fn from_name(name: &str) -> Option<Keyword> {
        KEYWORDS.get(name).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Keyword::Define => "define",
            Keyword::DefineStruct => "define-struct",
            Keyword::Lambda => "lambda",
            Keyword::Quote => "quote",
            Keyword::CheckExpect => "check-expect",
            Keyword::If => "if",
            Keyword::Cond => "cond",
            Keyword::Else => "else",
            Keyword::And => "and",
            Keyword::Or => "or",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Number(Number),
    String(String),
    Boolean(bool),
}

/// IR-1: the untyped tree handed from the reader to the resolver.
#[derive(Clone, Debug, PartialEq)]
pub enum Syntax {
    Group(Vec<Syntax>),
    Identifier(String),
    Keyword(Keyword),
    Literal(Literal),
}

impl Syntax {
    /// The noun used for this node in diagnostics ("but found a number").
    pub fn describe(&self) -> &'static str {
        match self {
            Syntax::Group(_) => "part",
            Syntax::Identifier(_) => "variable",
            Syntax::Keyword(_) => "keyword",
            Syntax::Literal(Literal::Number(_)) => "number",
            Syntax::Literal(Literal::String(_)) => "string",
            Syntax::Literal(Literal::Boolean(_)) => "boolean",
        }
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Syntax::Identifier(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&[Syntax]> {
        match self {
            Syntax::Group(items) => Some(items),
            _ => None,
        }
    }

    pub fn head_keyword(&self) -> Option<Keyword> {
        match self.as_group()?.first()? {
            Syntax::Keyword(keyword) => Some(*keyword),
            _ => None,
        }
    }
}

fn syntax_error<S: fmt::Display>(message: S) -> Error {
    Error::read(format!("read-syntax: {}", message))
}

/// Scans all of `input`, then reads every top-level form.
pub fn read(input: &str) -> Result<Vec<Syntax>, Error> {
    Reader::new(scan(input)?).read_program()
}

pub struct Reader {
    tokens: Peekable<vec::IntoIter<Token>>,
}

impl Reader {
    pub fn new(tokens: Vec<Token>) -> Self {
        Reader {
            tokens: tokens.into_iter().peekable(),
        }
    }

    pub fn peek_token(&mut self) -> Token {
        self.tokens.peek().cloned().unwrap_or(Token::Eof)
    }

    pub fn read_token(&mut self) -> Token {
        self.tokens.next().unwrap_or(Token::Eof)
    }

    pub fn read_program(&mut self) -> Result<Vec<Syntax>, Error> {
        let mut forms = Vec::new();
        while self.peek_token() != Token::Eof {
            forms.push(self.read_expr()?);
        }
        Ok(forms)
    }

    pub fn read_expr(&mut self) -> Result<Syntax, Error> {
        match self.read_token() {
            Token::Identifier(ident) => Ok(Syntax::Identifier(ident)),
            Token::Number(n) => Ok(Syntax::Literal(Literal::Number(n))),
            Token::String(s) => Ok(Syntax::Literal(Literal::String(s))),
            Token::Boolean(b) => Ok(Syntax::Literal(Literal::Boolean(b))),
            Token::Open(open) => self.read_group(open),
            Token::Close(close) =>
                Err(syntax_error(format!("unexpected `{}`", close))),
            Token::Quote => self.read_quoted(),
            Token::Keyword(keyword) => Err(Error::read(format!(
                "{0}: expected an open parenthesis before {0}, but found none",
                keyword))),
            Token::Eof => Err(Error::internal("read past the end of input")),
        }
    }

    fn read_quoted(&mut self) -> Result<Syntax, Error> {
        if self.peek_token() == Token::Eof {
            return Err(syntax_error(
                "expected an element for quoting \"'\", found end-of-file"));
        }
        let quoted = self.read_datum()?;
        Ok(Syntax::Group(vec![Syntax::Keyword(Keyword::Quote), quoted]))
    }

    // A quoted keyword reads as the symbol of the same name.
    fn read_datum(&mut self) -> Result<Syntax, Error> {
        match self.peek_token() {
            Token::Keyword(keyword) => {
                self.read_token();
                Ok(Syntax::Identifier(keyword.name().to_string()))
            },
            _ => self.read_expr(),
        }
    }

    fn read_group(&mut self, open: char) -> Result<Syntax, Error> {
        let close = closing_for(open);
        let mut items = Vec::new();

        if let Token::Keyword(keyword) = self.peek_token() {
            self.read_token();
            items.push(Syntax::Keyword(keyword));
            if keyword == Keyword::Quote {
                if let Token::Keyword(_) = self.peek_token() {
                    items.push(self.read_datum()?);
                }
            }
        }

        loop {
            match self.peek_token() {
                Token::Close(c) if c == close => {
                    self.read_token();
                    return Ok(Syntax::Group(items));
                },
                Token::Close(c) => return Err(syntax_error(format!(
                    "expected `{}` to close preceding `{}`, found instead `{}`",
                    close, open, c))),
                Token::Eof => return Err(syntax_error(format!(
                    "expected a `{}` to close `{}`", close, open))),
                _ => items.push(self.read_expr()?),
            }
        }
    }
}

#[cfg(test)]
fn ident(s: &str) -> Syntax {
    Syntax::Identifier(s.to_string())
}

#[test]
fn test_read_0() {
    read("0").unwrap();
}

#[test]
fn test_nested_groups() {
    assert_eq!(read("(f [g x] {})").unwrap(), vec![Syntax::Group(vec![
        ident("f"),
        Syntax::Group(vec![ident("g"), ident("x")]),
        Syntax::Group(vec![]),
    ])]);
}

#[test]
fn test_keyword_at_head() {
    assert_eq!(read("(define x 1)").unwrap()[0].head_keyword(),
        Some(Keyword::Define));
}

#[test]
fn test_keyword_outside_head() {
    assert_eq!(read("(f define)").unwrap_err().to_string(),
        "define: expected an open parenthesis before define, but found none");
    assert_eq!(read("cond").unwrap_err().to_string(),
        "cond: expected an open parenthesis before cond, but found none");
}

#[test]
fn test_quote_mark() {
    assert_eq!(read("'a").unwrap(), vec![Syntax::Group(vec![
        Syntax::Keyword(Keyword::Quote), ident("a")])]);
    assert_eq!(read("'else").unwrap(), vec![Syntax::Group(vec![
        Syntax::Keyword(Keyword::Quote), ident("else")])]);
    assert_eq!(read("'").unwrap_err().to_string(),
        "read-syntax: expected an element for quoting \"'\", found end-of-file");
}

#[test]
fn test_quote_form_reads_keywords_as_symbols() {
    assert_eq!(read("(quote define)").unwrap(), read("'define").unwrap());
    assert_eq!(read("(quote cond)").unwrap(), vec![Syntax::Group(vec![
        Syntax::Keyword(Keyword::Quote), ident("cond")])]);
    assert_eq!(read("(f (quote else))").unwrap(), vec![Syntax::Group(vec![
        ident("f"),
        Syntax::Group(vec![Syntax::Keyword(Keyword::Quote), ident("else")]),
    ])]);
}

#[test]
fn test_unbalanced() {
    assert_eq!(read("(+ 1 2").unwrap_err().to_string(),
        "read-syntax: expected a `)` to close `(`");
    assert_eq!(read("[+ 1 2").unwrap_err().to_string(),
        "read-syntax: expected a `]` to close `[`");
    assert_eq!(read("(+ 1 2))").unwrap_err().to_string(),
        "read-syntax: unexpected `)`");
    assert_eq!(read("(+ 1 2]").unwrap_err().to_string(),
        "read-syntax: expected `)` to close preceding `(`, found instead `]`");
}
