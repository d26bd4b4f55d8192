
use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::Error;
use crate::number::Number;
use super::literal::{self, LiteralError};
use super::Keyword;

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Open(char),
    Close(char),
    Quote,
    Identifier(String),
    Keyword(Keyword),
    Number(Number),
    String(String),
    Boolean(bool),
    Eof,
}

#[derive(Debug)]
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    finished: bool,
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || "()[]{}\"';`,".contains(c)
}

pub fn closing_for(open: char) -> char {
    match open {
        '[' => ']',
        '{' => '}',
        _ => ')',
    }
}

impl<'a> Lexer<'a> {
    pub fn new(input: &str) -> Lexer {
        Lexer {
            input,
            chars: input.char_indices().peekable(),
            finished: false,
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn next_char(&mut self) -> Option<char> {
        self.chars.next().map(|(_, c)| c)
    }

    fn offset(&mut self) -> usize {
        match self.chars.peek() {
            Some(&(at, _)) => at,
            None => self.input.len(),
        }
    }

    fn starts_block_comment(&self, at: usize) -> bool {
        self.input[at..].starts_with("#|")
    }

    // Block comments nest.
    fn skip_block_comment(&mut self) -> Result<(), Error> {
        self.next_char();
        self.next_char();
        let mut depth = 1;
        while depth > 0 {
            match self.next_char() {
                Some('|') if self.peek_char() == Some('#') => {
                    self.next_char();
                    depth -= 1;
                },
                Some('#') if self.peek_char() == Some('|') => {
                    self.next_char();
                    depth += 1;
                },
                Some(_) => {},
                None => return Err(Error::scan("end of file in `#|` comment")),
            }
        }
        Ok(())
    }

    fn skip_atmosphere(&mut self) -> Result<(), Error> {
        loop {
            let at = self.offset();
            match self.peek_char() {
                Some(c) if c.is_whitespace() => {
                    self.next_char();
                },
                Some(';') => {
                    while let Some(c) = self.next_char() {
                        if c == '\n' {
                            break;
                        }
                    }
                },
                Some('#') if self.starts_block_comment(at) => {
                    self.skip_block_comment()?;
                },
                _ => return Ok(()),
            }
        }
    }

    fn read_string(&mut self) -> Result<Token, Error> {
        self.next_char();
        let mut contents = String::new();
        loop {
            match self.next_char() {
                Some('"') => return Ok(Token::String(contents)),
                Some('\\') => {
                    let escaped = match self.next_char() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('a') => '\u{7}',
                        Some('b') => '\u{8}',
                        Some('v') => '\u{b}',
                        Some('f') => '\u{c}',
                        Some('e') => '\u{1b}',
                        Some('0') => '\0',
                        Some('"') => '"',
                        Some('\'') => '\'',
                        Some('\\') => '\\',
                        Some('\n') => continue,
                        Some(c) => return Err(Error::scan(format!(
                            "unknown escape sequence `\\{}` in string", c))),
                        None => return Err(Error::scan("expected a closing `\"`")),
                    };
                    contents.push(escaped);
                },
                Some(c) => contents.push(c),
                None => return Err(Error::scan("expected a closing `\"`")),
            }
        }
    }

    fn read_atom(&mut self) -> &'a str {
        let start = self.offset();
        while let Some(c) = self.peek_char() {
            if is_delimiter(c) {
                break;
            }
            self.next_char();
        }
        let end = self.offset();
        let input = self.input;
        &input[start..end]
    }

    fn read_token(&mut self) -> Result<Token, Error> {
        self.skip_atmosphere()?;
        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };
        match c {
            '(' | '[' | '{' => {
                self.next_char();
                Ok(Token::Open(c))
            },
            ')' | ']' | '}' => {
                self.next_char();
                Ok(Token::Close(c))
            },
            '\'' => {
                self.next_char();
                Ok(Token::Quote)
            },
            '"' => self.read_string(),
            '`' | ',' => {
                self.next_char();
                Err(Error::scan(format!("bad syntax `{}`", c)))
            },
            _ => {
                let atom = self.read_atom();
                classify_atom(atom)
            },
        }
    }
}

fn classify_atom(atom: &str) -> Result<Token, Error> {
    match atom {
        "#t" | "#T" | "#true" => return Ok(Token::Boolean(true)),
        "#f" | "#F" | "#false" => return Ok(Token::Boolean(false)),
        _ => {},
    }
    match literal::parse_number(atom) {
        Some(Ok(n)) => Ok(Token::Number(n)),
        Some(Err(LiteralError::DivideByZero)) =>
            Err(Error::scan(format!("division by zero in `{}`", atom))),
        Some(Err(LiteralError::NoExactRepresentation)) =>
            Err(Error::scan(format!("no exact representation for `{}`", atom))),
        None if atom.starts_with('#') =>
            Err(Error::scan(format!("bad syntax `{}`", atom))),
        None => Ok(match Keyword::from_name(atom) {
            Some(keyword) => Token::Keyword(keyword),
            None => Token::Identifier(atom.to_string()),
        }),
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, Error>;

    /// Yields `Token::Eof` exactly once, or stops after the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.read_token();
        match token {
            Ok(Token::Eof) | Err(_) => self.finished = true,
            _ => {},
        }
        Some(token)
    }
}

/// Scans the whole input.
pub fn scan(input: &str) -> Result<Vec<Token>, Error> {
    Lexer::new(input).collect()
}

#[cfg(test)]
fn ident(s: &str) -> Token {
    Token::Identifier(s.to_string())
}

#[test]
fn test_lexer() {
    assert_eq!(scan("(x y)"), Ok(vec![Token::Open('('), ident("x"), ident("y"),
        Token::Close(')'), Token::Eof]));
}

#[test]
fn test_brackets_and_quote() {
    assert_eq!(scan("['a]"), Ok(vec![Token::Open('['), Token::Quote,
        ident("a"), Token::Close(']'), Token::Eof]));
}

#[test]
fn test_comments_are_skipped() {
    let tokens = scan("; line\n#| outer #| inner |# still |# x").unwrap();
    assert_eq!(tokens, vec![ident("x"), Token::Eof]);
}

#[test]
fn test_unterminated_block_comment() {
    assert_eq!(scan("#| never closed").unwrap_err().to_string(),
        "read-syntax: end of file in `#|` comment");
}

#[test]
fn test_booleans() {
    assert_eq!(scan("#t #T #true #f #F #false").unwrap(), vec![
        Token::Boolean(true), Token::Boolean(true), Token::Boolean(true),
        Token::Boolean(false), Token::Boolean(false), Token::Boolean(false),
        Token::Eof]);
    assert_eq!(scan("#TRUE").unwrap_err().to_string(),
        "read-syntax: bad syntax `#TRUE`");
}

#[test]
fn test_strings() {
    assert_eq!(scan(r#""a\n\"b\"""#).unwrap(),
        vec![Token::String("a\n\"b\"".to_string()), Token::Eof]);
    assert_eq!(scan(r#""abc"#).unwrap_err().to_string(),
        "read-syntax: expected a closing `\"`");
    assert_eq!(scan(r#""\q""#).unwrap_err().to_string(),
        "read-syntax: unknown escape sequence `\\q` in string");
}

#[test]
fn test_keywords() {
    assert_eq!(scan("define define-struct defined").unwrap(), vec![
        Token::Keyword(Keyword::Define), Token::Keyword(Keyword::DefineStruct),
        ident("defined"), Token::Eof]);
}

#[test]
fn test_bad_hash_syntax() {
    assert_eq!(scan("#q").unwrap_err().to_string(), "read-syntax: bad syntax `#q`");
}

#[test]
fn test_zero_denominator_is_a_read_error() {
    assert_eq!(scan("3/0").unwrap_err(),
        Error::Scan("read-syntax: division by zero in `3/0`".to_string()));
}

#[test]
fn test_huge_exponent_is_still_a_number() {
    assert_eq!(scan("1e5000").unwrap(),
        vec![Token::Number(Number::float(f64::INFINITY)), Token::Eof]);
    assert_eq!(scan("#e1e5000").unwrap_err().to_string(),
        "read-syntax: no exact representation for `#e1e5000`");
}
