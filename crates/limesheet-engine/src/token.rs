//! Formula tokenizer.
//!
//! Splits the expression text (everything after the leading `=`) into
//! tokens. Structural tokens are case-insensitive: function names are
//! uppercased and cell references parse in any case. String literals keep
//! their original case and content.

use crate::cell_ref::CellRef;
use crate::error::{EngineError, Result};

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    Str(String),
    /// Function name, uppercased.
    Ident(String),
    Ref(CellRef),
    Plus,
    Minus,
    Star,
    Slash,
    Amp,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    LParen,
    RParen,
    Comma,
    Colon,
    Eof,
}

pub struct Tokenizer<'a> {
    text: &'a str,
    src: &'a [u8],
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str) -> Tokenizer<'a> {
        Tokenizer {
            text: src,
            src: src.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();
        let Some(b) = self.peek() else {
            return Ok(Token::Eof);
        };

        match b {
            b'0'..=b'9' => self.lex_number(),
            b'.' if matches!(self.src.get(self.pos + 1), Some(d) if d.is_ascii_digit()) => {
                self.lex_number()
            }
            b'"' => self.lex_string(),
            b'A'..=b'Z' | b'a'..=b'z' => self.lex_word(),
            b'+' => self.single(Token::Plus),
            b'-' => self.single(Token::Minus),
            b'*' => self.single(Token::Star),
            b'/' => self.single(Token::Slash),
            b'&' => self.single(Token::Amp),
            b'(' => self.single(Token::LParen),
            b')' => self.single(Token::RParen),
            b',' => self.single(Token::Comma),
            b':' => self.single(Token::Colon),
            b'=' => self.single(Token::Eq),
            b'<' => {
                self.pos += 1;
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    Ok(Token::Le)
                } else {
                    Ok(Token::Lt)
                }
            }
            b'>' => {
                self.pos += 1;
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    Ok(Token::Ge)
                } else {
                    Ok(Token::Gt)
                }
            }
            b'!' => {
                self.pos += 1;
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    Ok(Token::Ne)
                } else {
                    Err(EngineError::Syntax("unexpected '!'".to_string()))
                }
            }
            other => Err(EngineError::Syntax(format!(
                "unexpected character '{}'",
                other as char
            ))),
        }
    }

    fn single(&mut self, tok: Token) -> Result<Token> {
        self.pos += 1;
        Ok(tok)
    }

    fn lex_number(&mut self) -> Result<Token> {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        // No exponent notation: a trailing `E3` is a cell reference, not an
        // exponent (references are substituted before numbers are read in
        // this dialect).

        let text = &self.text[start..self.pos];
        text.parse::<f64>()
            .map(Token::Number)
            .map_err(|_| EngineError::Syntax(format!("invalid number literal '{}'", text)))
    }

    /// Scans byte-wise for the closing quote and escapes (both ASCII, so
    /// never inside a multi-byte character), then copies the literal's
    /// content by slicing the original text. Keeps non-ASCII content intact.
    fn lex_string(&mut self) -> Result<Token> {
        self.pos += 1; // opening quote
        let mut out = String::new();
        let mut span_start = self.pos;
        loop {
            match self.peek() {
                Some(b'"') => {
                    out.push_str(&self.text[span_start..self.pos]);
                    self.pos += 1;
                    return Ok(Token::Str(out));
                }
                Some(b'\\') => {
                    out.push_str(&self.text[span_start..self.pos]);
                    self.pos += 1;
                    match self.peek() {
                        Some(b'"') => {
                            out.push('"');
                            self.pos += 1;
                        }
                        Some(b'\\') => {
                            out.push('\\');
                            self.pos += 1;
                        }
                        // Unknown escape: keep the backslash, let the next
                        // character flow into the following span verbatim.
                        Some(_) => out.push('\\'),
                        None => {
                            return Err(EngineError::Syntax(
                                "unterminated string literal".to_string(),
                            ));
                        }
                    }
                    span_start = self.pos;
                }
                Some(_) => self.pos += 1,
                None => {
                    return Err(EngineError::Syntax(
                        "unterminated string literal".to_string(),
                    ));
                }
            }
        }
    }

    /// A word is letters optionally followed by digits: all letters is a
    /// function name, letters-then-digits is a cell reference. Anything
    /// mixed beyond that is malformed.
    fn lex_word(&mut self) -> Result<Token> {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_alphanumeric()) {
            self.pos += 1;
        }
        let word = &self.text[start..self.pos];

        if word.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Ok(Token::Ident(word.to_ascii_uppercase()));
        }
        match CellRef::from_str(word) {
            Some(cr) => Ok(Token::Ref(cr)),
            None => Err(EngineError::Syntax(format!("invalid token '{}'", word))),
        }
    }
}

/// Tokenize a whole expression. Convenience for tests and the parser.
pub fn tokenize(src: &str) -> Result<Vec<Token>> {
    let mut tokenizer = Tokenizer::new(src);
    let mut tokens = Vec::new();
    loop {
        let tok = tokenizer.next_token()?;
        let done = tok == Token::Eof;
        tokens.push(tok);
        if done {
            return Ok(tokens);
        }
    }
}
