//! Recursive descent parser for formula expressions.
//!
//! GRAMMAR:
//!   expression     --> comparison
//!   comparison     --> additive ( ("=" | "!=" | "<" | ">" | "<=" | ">=") additive )*
//!   additive       --> multiplicative ( ("+" | "-" | "&") multiplicative )*
//!   multiplicative --> unary ( ("*" | "/") unary )*
//!   unary          --> ("-" | "+") unary | primary
//!   primary        --> NUMBER | STRING | reference | function_call | "(" expression ")"
//!   reference      --> REF ( ":" REF )?
//!   function_call  --> IDENT "(" arguments? ")"
//!   arguments      --> expression ("," expression)*
//!
//! `&` sits at the same precedence as `+` and evaluates identically, an
//! inherited quirk of the dialect, where concatenation was rewritten to
//! addition before evaluation.

use crate::cell_ref::CellRef;
use crate::error::{EngineError, Result};
use crate::token::{Token, Tokenizer};

/// Binary operators of the closed grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    /// Alias of Add; kept distinct so the AST mirrors the source text.
    Concat,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
}

/// An expression tree over the closed formula grammar.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Str(String),
    Cell(CellRef),
    Range(CellRef, CellRef),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
}

pub struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Result<Parser<'a>> {
        let mut tokenizer = Tokenizer::new(input);
        let current = tokenizer.next_token()?;
        Ok(Parser { tokenizer, current })
    }

    /// Parse the entire input as one expression; trailing tokens are an error.
    pub fn parse(mut self) -> Result<Expr> {
        if self.current == Token::Eof {
            return Err(EngineError::Syntax("empty expression".to_string()));
        }
        let expr = self.parse_expression()?;
        if self.current != Token::Eof {
            return Err(EngineError::Syntax(format!(
                "unexpected token after expression: {:?}",
                self.current
            )));
        }
        Ok(expr)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.tokenizer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        if self.current == expected {
            self.advance()
        } else {
            Err(EngineError::Syntax(format!(
                "expected {:?}, found {:?}",
                expected, self.current
            )))
        }
    }

    fn parse_expression(&mut self) -> Result<Expr> {
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.current {
                Token::Eq => BinOp::Eq,
                Token::Ne => BinOp::Ne,
                Token::Lt => BinOp::Lt,
                Token::Gt => BinOp::Gt,
                Token::Le => BinOp::Le,
                Token::Ge => BinOp::Ge,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_additive()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.current {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                Token::Amp => BinOp::Concat,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_multiplicative()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current {
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_unary()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        match self.current {
            Token::Minus => {
                self.advance()?;
                Ok(Expr::Unary(UnaryOp::Neg, Box::new(self.parse_unary()?)))
            }
            Token::Plus => {
                self.advance()?;
                Ok(Expr::Unary(UnaryOp::Plus, Box::new(self.parse_unary()?)))
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        match self.current.clone() {
            Token::Number(n) => {
                self.advance()?;
                Ok(Expr::Number(n))
            }
            Token::Str(s) => {
                self.advance()?;
                Ok(Expr::Str(s))
            }
            Token::Ref(start) => {
                self.advance()?;
                if self.current == Token::Colon {
                    self.advance()?;
                    let Token::Ref(end) = self.current.clone() else {
                        return Err(EngineError::Syntax(format!(
                            "expected cell reference after ':', found {:?}",
                            self.current
                        )));
                    };
                    self.advance()?;
                    Ok(Expr::Range(start, end))
                } else {
                    Ok(Expr::Cell(start))
                }
            }
            Token::Ident(name) => {
                self.advance()?;
                self.expect(Token::LParen)?;
                let mut args = Vec::new();
                if self.current != Token::RParen {
                    loop {
                        args.push(self.parse_expression()?);
                        if self.current == Token::Comma {
                            self.advance()?;
                        } else {
                            break;
                        }
                    }
                }
                self.expect(Token::RParen)?;
                Ok(Expr::Call(name, args))
            }
            Token::LParen => {
                self.advance()?;
                let expr = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            other => Err(EngineError::Syntax(format!(
                "unexpected token {:?}",
                other
            ))),
        }
    }
}

/// Parse an expression string (without the leading `=`).
pub fn parse(input: &str) -> Result<Expr> {
    Parser::new(input)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(name: &str) -> Expr {
        Expr::Cell(CellRef::from_str(name).unwrap())
    }

    #[test]
    fn test_parse_precedence() {
        // A2 + B2 * 2 groups the multiplication first.
        let expr = parse("A2+B2*2").unwrap();
        assert_eq!(
            expr,
            Expr::Binary(
                BinOp::Add,
                Box::new(cell("A2")),
                Box::new(Expr::Binary(
                    BinOp::Mul,
                    Box::new(cell("B2")),
                    Box::new(Expr::Number(2.0)),
                )),
            )
        );
    }

    #[test]
    fn test_parse_comparison_binds_loosest() {
        let expr = parse("A2+1>B2").unwrap();
        assert!(matches!(expr, Expr::Binary(BinOp::Gt, _, _)));
    }

    #[test]
    fn test_parse_range_inside_call() {
        let expr = parse("SUM(A2:A4)").unwrap();
        let Expr::Call(name, args) = expr else {
            panic!("expected call");
        };
        assert_eq!(name, "SUM");
        assert_eq!(args.len(), 1);
        assert!(matches!(args[0], Expr::Range(_, _)));
    }

    #[test]
    fn test_parse_call_with_mixed_args() {
        let expr = parse("IF(A2>10,\"High\",\"Low\")").unwrap();
        let Expr::Call(name, args) = expr else {
            panic!("expected call");
        };
        assert_eq!(name, "IF");
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn test_parse_unary_minus() {
        let expr = parse("-A2").unwrap();
        assert!(matches!(expr, Expr::Unary(UnaryOp::Neg, _)));
    }

    #[test]
    fn test_parse_parentheses() {
        let expr = parse("(A2+B2)*2").unwrap();
        assert!(matches!(expr, Expr::Binary(BinOp::Mul, _, _)));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("").is_err());
        assert!(parse("A2+").is_err());
        assert!(parse("SUM(A2:)").is_err());
        assert!(parse("SUM A2").is_err());
        assert!(parse("A2 B2").is_err());
        assert!(parse("(A2").is_err());
    }

    #[test]
    fn test_parse_bare_identifier_is_error() {
        // Identifiers only exist as function calls in this grammar.
        assert!(parse("WINDOW").is_err());
    }
}
