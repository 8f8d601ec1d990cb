use crate::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Identifier(String),
    String(String),
    True,
    False,
    Null,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Bang,
    Ellipsis,
    LParen,
    RParen,
    Comma,
    Colon,
    DoubleColon,
    LBracket,
    RBracket,
    Greater,
    Less,
    Ge,
    Le,
    EqEq,
    NotEq,
    AndAnd,
    OrOr,
    Eof,
}

#[derive(Clone)]
pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
    last_start: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
            last_start: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn text(&self, start: usize) -> Result<&'a str, Error> {
        std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| Error::parse("Invalid UTF-8 in input", Some(start)))
    }

    fn number(&mut self, start: usize) -> Result<Token, Error> {
        let mut has_dot = self.input[start] == b'.';
        while let Some(c) = self.peek() {
            match c {
                b'0'..=b'9' => self.pos += 1,
                b'.' if !has_dot => {
                    // A dot followed by another dot starts a spread, not a fraction
                    if self.input.get(self.pos + 1) == Some(&b'.') {
                        break;
                    }
                    has_dot = true;
                    self.pos += 1;
                }
                _ => break,
            }
        }
        let s = self.text(start)?;
        let n: f64 = s
            .parse()
            .map_err(|_| Error::parse("Invalid number", Some(start)))?;
        Ok(Token::Number(n))
    }

    fn identifier(&mut self, start: usize) -> Result<Token, Error> {
        while let Some(c) = self.peek() {
            match c {
                b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' => self.pos += 1,
                _ => break,
            }
        }
        let s = self.text(start)?;
        Ok(match s.to_uppercase().as_str() {
            "TRUE" => Token::True,
            "FALSE" => Token::False,
            "NULL" => Token::Null,
            _ => Token::Identifier(s.to_string()),
        })
    }

    fn string(&mut self, quote: u8) -> Result<Token, Error> {
        // consume until matching quote, support escapes \" \\ \n \t; preserve UTF-8 bytes
        let mut buf: Vec<u8> = Vec::new();
        while let Some(c) = self.bump() {
            if c == quote {
                return String::from_utf8(buf)
                    .map(Token::String)
                    .map_err(|_| Error::parse("Invalid UTF-8 in string", Some(self.pos)));
            }
            if c == b'\\' {
                match self.bump() {
                    Some(b'n') => buf.push(b'\n'),
                    Some(b't') => buf.push(b'\t'),
                    Some(x) => buf.push(x),
                    None => return Err(Error::parse("Unterminated escape in string", Some(self.pos))),
                }
            } else {
                buf.push(c);
            }
        }
        Err(Error::parse("Unterminated string literal", Some(self.pos)))
    }

    pub fn next_token(&mut self) -> Result<Token, Error> {
        self.skip_ws();
        let start = self.pos;
        self.last_start = start;
        let ch = match self.bump() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        let tok = match ch {
            b'0'..=b'9' => return self.number(start),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => return self.identifier(start),
            b'"' | b'\'' => return self.string(ch),
            b'.' => {
                if self.peek() == Some(b'.') && self.input.get(self.pos + 1) == Some(&b'.') {
                    self.pos += 2;
                    Token::Ellipsis
                } else if matches!(self.peek(), Some(b'0'..=b'9')) {
                    return self.number(start);
                } else {
                    return Err(Error::parse("Unexpected '.'", Some(start)));
                }
            }
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' => Token::Star,
            b'/' => Token::Slash,
            b'%' => Token::Percent,
            b'^' => Token::Caret,
            b'!' => {
                if self.eat(b'=') { Token::NotEq } else { Token::Bang }
            }
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b'[' => Token::LBracket,
            b']' => Token::RBracket,
            b',' => Token::Comma,
            b':' => {
                if self.eat(b':') { Token::DoubleColon } else { Token::Colon }
            }
            b'>' => {
                if self.eat(b'=') { Token::Ge } else { Token::Greater }
            }
            b'<' => {
                if self.eat(b'=') {
                    Token::Le
                } else if self.eat(b'>') {
                    Token::NotEq
                } else {
                    Token::Less
                }
            }
            b'=' => {
                // Both '=' and '==' are equality (a leading '=' is stripped before lexing)
                self.eat(b'=');
                Token::EqEq
            }
            b'&' => {
                if self.eat(b'&') {
                    Token::AndAnd
                } else {
                    return Err(Error::parse("Unexpected '&'", Some(start)));
                }
            }
            b'|' => {
                if self.eat(b'|') {
                    Token::OrOr
                } else {
                    return Err(Error::parse("Unexpected '|'", Some(start)));
                }
            }
            _ => return Err(Error::parse("Unexpected character", Some(start))),
        };
        Ok(tok)
    }

    pub fn last_start(&self) -> usize {
        self.last_start
    }
}
