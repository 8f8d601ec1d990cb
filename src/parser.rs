use crate::ast::{BinaryOp, Expr, TypeName, UnaryOp};
use crate::error::Error;
use crate::lexer::{Lexer, Token};
use crate::types::Value;

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    lookahead: Token,
    look_pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Result<Self, Error> {
        let mut lexer = Lexer::new(input);
        let lookahead = lexer.next_token()?;
        let look_pos = lexer.last_start();
        Ok(Self { lexer, lookahead, look_pos })
    }

    fn bump(&mut self) -> Result<(), Error> {
        self.lookahead = self.lexer.next_token()?;
        self.look_pos = self.lexer.last_start();
        Ok(())
    }

    fn expect(&mut self, tok: Token, msg: &str) -> Result<(), Error> {
        if self.lookahead == tok {
            self.bump()
        } else {
            self.err_here(msg)
        }
    }

    fn err_here<T>(&self, msg: &str) -> Result<T, Error> {
        Err(Error::parse(msg, Some(self.look_pos)))
    }

    pub fn parse(&mut self) -> Result<Expr, Error> {
        let expr = self.parse_expr()?;
        if self.lookahead != Token::Eof {
            return self.err_here("Unexpected trailing input");
        }
        Ok(expr)
    }

    fn parse_expr(&mut self) -> Result<Expr, Error> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, Error> {
        let mut node = self.parse_and()?;
        while let Token::OrOr = self.lookahead {
            self.bump()?;
            let rhs = self.parse_and()?;
            node = Expr::Binary(Box::new(node), BinaryOp::Or, Box::new(rhs));
        }
        Ok(node)
    }

    fn parse_and(&mut self) -> Result<Expr, Error> {
        let mut node = self.parse_equality()?;
        while let Token::AndAnd = self.lookahead {
            self.bump()?;
            let rhs = self.parse_equality()?;
            node = Expr::Binary(Box::new(node), BinaryOp::And, Box::new(rhs));
        }
        Ok(node)
    }

    fn parse_equality(&mut self) -> Result<Expr, Error> {
        let mut node = self.parse_relational()?;
        loop {
            let op = match self.lookahead {
                Token::EqEq => BinaryOp::Eq,
                Token::NotEq => BinaryOp::Ne,
                _ => break,
            };
            self.bump()?;
            let rhs = self.parse_relational()?;
            node = Expr::Binary(Box::new(node), op, Box::new(rhs));
        }
        Ok(node)
    }

    fn parse_relational(&mut self) -> Result<Expr, Error> {
        let mut node = self.parse_additive()?;
        loop {
            let op = match self.lookahead {
                Token::Greater => BinaryOp::Gt,
                Token::Less => BinaryOp::Lt,
                Token::Ge => BinaryOp::Ge,
                Token::Le => BinaryOp::Le,
                _ => break,
            };
            self.bump()?;
            let rhs = self.parse_additive()?;
            node = Expr::Binary(Box::new(node), op, Box::new(rhs));
        }
        Ok(node)
    }

    fn parse_additive(&mut self) -> Result<Expr, Error> {
        let mut node = self.parse_multiplicative()?;
        loop {
            let op = match self.lookahead {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.bump()?;
            let rhs = self.parse_multiplicative()?;
            node = Expr::Binary(Box::new(node), op, Box::new(rhs));
        }
        Ok(node)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, Error> {
        let mut node = self.parse_unary()?;
        loop {
            let op = match self.lookahead {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                Token::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.bump()?;
            let rhs = self.parse_unary()?;
            node = Expr::Binary(Box::new(node), op, Box::new(rhs));
        }
        Ok(node)
    }

    fn parse_unary(&mut self) -> Result<Expr, Error> {
        let op = match self.lookahead {
            Token::Plus => UnaryOp::Plus,
            Token::Minus => UnaryOp::Minus,
            Token::Bang => UnaryOp::Not,
            _ => return self.parse_power(),
        };
        self.bump()?;
        let expr = self.parse_unary()?;
        Ok(Expr::Unary(op, Box::new(expr)))
    }

    fn parse_power(&mut self) -> Result<Expr, Error> {
        // Right associative with higher precedence than unary
        let left = self.parse_cast()?;
        if let Token::Caret = self.lookahead {
            self.bump()?;
            let right = self.parse_unary()?; // exponent can be unary like -2
            Ok(Expr::Binary(Box::new(left), BinaryOp::Pow, Box::new(right)))
        } else {
            Ok(left)
        }
    }

    fn parse_cast(&mut self) -> Result<Expr, Error> {
        let mut node = self.parse_postfix()?;
        if let Token::DoubleColon = self.lookahead {
            self.bump()?; // '::'
            let ty = match self.lookahead.clone() {
                Token::Identifier(s) => match s.to_lowercase().as_str() {
                    "integer" | "int" => TypeName::Integer,
                    "float" | "number" => TypeName::Float,
                    "string" => TypeName::String,
                    "boolean" | "bool" => TypeName::Boolean,
                    "array" => TypeName::Array,
                    _ => return self.err_here("Unknown cast type"),
                },
                _ => return self.err_here("Expected type name after '::'"),
            };
            self.bump()?;
            node = Expr::TypeCast { expr: Box::new(node), ty };
        }
        Ok(node)
    }

    fn parse_postfix(&mut self) -> Result<Expr, Error> {
        let mut node = self.parse_atom()?;
        while let Token::LParen = self.lookahead {
            let args = self.parse_arguments()?;
            node = Expr::Invoke { target: Box::new(node), args };
        }
        Ok(node)
    }

    /// Parses `( arg, ... )` with the lookahead on the opening parenthesis.
    fn parse_arguments(&mut self) -> Result<Vec<Expr>, Error> {
        self.bump()?; // '('
        let mut args = Vec::new();
        if let Token::RParen = self.lookahead {
            self.bump()?;
            return Ok(args);
        }
        loop {
            let arg = if let Token::Ellipsis = self.lookahead {
                self.bump()?;
                Expr::Spread(Box::new(self.parse_expr()?))
            } else {
                self.parse_expr()?
            };
            args.push(arg);
            match self.lookahead {
                Token::Comma => self.bump()?,
                Token::RParen => break,
                _ => return self.err_here("Expected ',' or ')' in argument list"),
            }
        }
        self.bump()?; // ')'
        Ok(args)
    }

    fn parse_atom(&mut self) -> Result<Expr, Error> {
        match self.lookahead.clone() {
            Token::Number(n) => {
                self.bump()?;
                Ok(Expr::Number(n))
            }
            Token::String(s) => {
                self.bump()?;
                Ok(Expr::StringLit(s))
            }
            Token::Null => {
                self.bump()?;
                Ok(Expr::Null)
            }
            Token::True => {
                self.bump()?;
                Ok(Expr::Literal(Value::Boolean(true)))
            }
            Token::False => {
                self.bump()?;
                Ok(Expr::Literal(Value::Boolean(false)))
            }
            Token::LParen => {
                self.bump()?;
                let expr = self.parse_expr()?;
                self.expect(Token::RParen, "Expected ')'")?;
                Ok(expr)
            }
            Token::Colon => {
                // Variable: ':' identifier
                self.bump()?;
                match self.lookahead.clone() {
                    Token::Identifier(name) => {
                        self.bump()?;
                        Ok(Expr::Variable(name))
                    }
                    _ => self.err_here("Expected variable name after ':'"),
                }
            }
            Token::Identifier(name) => {
                self.bump()?;
                if let Token::LParen = self.lookahead {
                    let args = self.parse_arguments()?;
                    Ok(Expr::FunctionCall { name, args })
                } else {
                    Ok(Expr::Variable(name))
                }
            }
            Token::LBracket => {
                // Array literal: [ expr (, expr)* ]
                self.bump()?;
                let mut items = Vec::new();
                if let Token::RBracket = self.lookahead {
                    // empty
                } else {
                    loop {
                        items.push(self.parse_expr()?);
                        match self.lookahead {
                            Token::Comma => self.bump()?,
                            Token::RBracket => break,
                            _ => return self.err_here("Expected ',' or ']' in array"),
                        }
                    }
                }
                self.bump()?; // ']'
                Ok(Expr::Array(items))
            }
            other => Err(Error::parse(format!("Unexpected token: {:?}", other), Some(self.look_pos))),
        }
    }
}
