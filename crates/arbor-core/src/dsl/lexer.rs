use crate::{Error, Result};

use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Token {
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Str(String),
    Keyword(String),
    Symbol(String),
    Eof,
}

pub(super) struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
}

fn is_symbol_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

impl<'a> Lexer<'a> {
    pub(super) fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }

    pub(super) fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token == Token::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.chars.peek() {
                Some(c) if c.is_whitespace() || *c == ',' => {
                    self.chars.next();
                }
                Some(';') => {
                    while let Some(&c) = self.chars.peek() {
                        self.chars.next();
                        if c == '\n' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments();

        let Some(c) = self.chars.next() else {
            return Ok(Token::Eof);
        };

        match c {
            '(' => Ok(Token::LParen),
            ')' => Ok(Token::RParen),
            '[' => Ok(Token::LBracket),
            ']' => Ok(Token::RBracket),
            '{' => Ok(Token::LBrace),
            '}' => Ok(Token::RBrace),
            '"' => self.read_string(),
            ':' => {
                let name = self.read_symbol(None);
                if name.is_empty() {
                    Err(Error::invalid_spec("empty keyword"))
                } else {
                    Ok(Token::Keyword(name))
                }
            }
            c if is_symbol_char(c) => Ok(Token::Symbol(self.read_symbol(Some(c)))),
            c => Err(Error::invalid_spec(format!("unexpected character `{c}`"))),
        }
    }

    fn read_symbol(&mut self, first: Option<char>) -> String {
        let mut s = first.map(String::from).unwrap_or_default();
        while let Some(&c) = self.chars.peek() {
            if is_symbol_char(c) {
                s.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        s
    }

    fn read_string(&mut self) -> Result<Token> {
        let mut s = String::new();
        loop {
            match self.chars.next() {
                Some('"') => return Ok(Token::Str(s)),
                Some('\\') => match self.chars.next() {
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some(c) => s.push(c),
                    None => return Err(Error::invalid_spec("unterminated string")),
                },
                Some(c) => s.push(c),
                None => return Err(Error::invalid_spec("unterminated string")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_table_form() {
        let tokens = Lexer::new(r#"(Table users :id "uid" :fields "name")"#)
            .tokenize()
            .unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::LParen,
                Token::Symbol("Table".to_string()),
                Token::Symbol("users".to_string()),
                Token::Keyword("id".to_string()),
                Token::Str("uid".to_string()),
                Token::Keyword("fields".to_string()),
                Token::Str("name".to_string()),
                Token::RParen,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn comments_and_commas_are_whitespace() {
        let tokens = Lexer::new("; a comment\n[\"a\", binary-string]")
            .tokenize()
            .unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::LBracket,
                Token::Str("a".to_string()),
                Token::Symbol("binary-string".to_string()),
                Token::RBracket,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_string_fails() {
        let err = Lexer::new(r#""abc"#).tokenize().unwrap_err();
        assert!(err.is_invalid_spec());
    }
}
