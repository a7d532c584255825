//! Parser
//!
//! Recursive descent over the token stream, producing `Value` trees. Every
//! compound the parser builds is an immutable literal; `quote` can hand them
//! out directly and `set-car!` on them fails.
//!
//! String literals get their surrounding quotes stripped and `\"` decoded;
//! no other escape sequence is processed.

use schist_core::value::{SchemeString, SchemeVector, literal_list};
use schist_core::{Number, Result, SchemeError, Symbol, Value};

use crate::token::{Token, TokenKind, tokenize};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Parser> {
        Ok(Parser {
            tokens: tokenize(source)?,
            pos: 0,
        })
    }

    /// Parse the next datum. Exhausted input yields the Eof singleton.
    pub fn parse(&mut self) -> Result<Value> {
        let Some(token) = self.advance() else {
            return Ok(Value::Eof);
        };
        match token.kind {
            TokenKind::True => Ok(Value::Boolean(true)),
            TokenKind::False => Ok(Value::Boolean(false)),
            TokenKind::Number => {
                Number::parse(&token.text)
                    .map(Value::number)
                    .ok_or_else(|| SchemeError::Parse(format!("bad number: {}", token.text)))
            }
            TokenKind::Str => {
                let inner = &token.text[1..token.text.len() - 1];
                Ok(Value::String(SchemeString::literal(
                    &inner.replace("\\\"", "\""),
                )))
            }
            TokenKind::Identifier => Ok(Value::Symbol(Symbol::of(&token.text))),
            // A dot outside a list reads as the symbol `.`.
            TokenKind::Dot => Ok(Value::Symbol(Symbol::of("."))),
            TokenKind::CharSpace => Ok(Value::Character(' ')),
            TokenKind::CharNewline => Ok(Value::Character('\n')),
            TokenKind::CharRaw => {
                let ch = token.text.chars().nth(2).ok_or_else(|| {
                    SchemeError::Parse(format!("bad character literal: {}", token.text))
                })?;
                Ok(Value::Character(ch))
            }
            TokenKind::Quote => self.wrap("quote"),
            TokenKind::Quasiquote => self.wrap("quasiquote"),
            TokenKind::Unquote => self.wrap("unquote"),
            TokenKind::UnquoteSplicing => self.wrap("unquote-splicing"),
            TokenKind::LParen => self.parse_list(),
            TokenKind::LVector => self.parse_vector(),
            TokenKind::RParen => Err(SchemeError::Parse("unexpected )".to_string())),
            TokenKind::Comment | TokenKind::Whitespace => {
                unreachable!("tokenizer drops ignored tokens")
            }
        }
    }

    /// Parse every datum until end of input.
    pub fn parse_all(&mut self) -> Result<Vec<Value>> {
        let mut forms = Vec::new();
        loop {
            match self.parse()? {
                Value::Eof => return Ok(forms),
                form => forms.push(form),
            }
        }
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    /// Build the two-element list `(kw <next datum>)` for the quote family.
    fn wrap(&mut self, keyword: &str) -> Result<Value> {
        let datum = self.parse()?;
        if matches!(datum, Value::Eof) {
            return Err(SchemeError::Parse(format!(
                "unexpected end of input after {keyword}"
            )));
        }
        Ok(literal_list(
            vec![Value::Symbol(Symbol::of(keyword)), datum],
            Value::Null,
        ))
    }

    fn parse_list(&mut self) -> Result<Value> {
        let mut items = Vec::new();
        loop {
            match self.peek_kind() {
                None => return Err(SchemeError::Parse("unexpected end of input in list".into())),
                Some(TokenKind::RParen) => {
                    self.advance();
                    return Ok(literal_list(items, Value::Null));
                }
                Some(TokenKind::Dot) if !items.is_empty() => {
                    self.advance();
                    let tail = self.parse()?;
                    if matches!(tail, Value::Eof) {
                        return Err(SchemeError::Parse(
                            "unexpected end of input after .".into(),
                        ));
                    }
                    match self.advance() {
                        Some(token) if token.kind == TokenKind::RParen => {
                            return Ok(literal_list(items, tail));
                        }
                        _ => {
                            return Err(SchemeError::Parse(
                                "expected ) after dotted tail".into(),
                            ));
                        }
                    }
                }
                Some(_) => items.push(self.parse()?),
            }
        }
    }

    fn parse_vector(&mut self) -> Result<Value> {
        let mut items = Vec::new();
        loop {
            match self.peek_kind() {
                None => {
                    return Err(SchemeError::Parse(
                        "unexpected end of input in vector".into(),
                    ));
                }
                Some(TokenKind::RParen) => {
                    self.advance();
                    return Ok(Value::Vector(SchemeVector::literal(items)));
                }
                Some(_) => items.push(self.parse()?),
            }
        }
    }
}

/// Parse one datum from `source`.
pub fn parse_str(source: &str) -> Result<Value> {
    Parser::new(source)?.parse()
}

/// Parse every datum in `source`.
pub fn parse_all(source: &str) -> Result<Vec<Value>> {
    Parser::new(source)?.parse_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use schist_core::write_str;

    fn roundtrip(source: &str) -> String {
        write_str(&parse_str(source).unwrap())
    }

    #[test]
    fn test_atoms() {
        assert_eq!(roundtrip("42"), "42");
        assert_eq!(roundtrip("#T"), "#t");
        assert_eq!(roundtrip("Hello"), "hello");
        assert_eq!(roundtrip(r"#\a"), r"#\a");
        assert_eq!(roundtrip("\"hi\""), "\"hi\"");
    }

    #[test]
    fn test_string_unescapes_quotes_only() {
        let v = parse_str(r#""say \"hi\" \n""#).unwrap();
        let Value::String(s) = v else { panic!("expected string") };
        // \" decoded, \n left as two characters.
        assert_eq!(s.to_text(), "say \"hi\" \\n");
    }

    #[test]
    fn test_proper_list() {
        assert_eq!(roundtrip("(1 2 3)"), "(1 2 3)");
        assert_eq!(roundtrip("()"), "()");
        assert_eq!(roundtrip("(a (b c) d)"), "(a (b c) d)");
    }

    #[test]
    fn test_dotted_list() {
        assert_eq!(roundtrip("(1 . 2)"), "(1 . 2)");
        assert_eq!(roundtrip("(1 2 . 3)"), "(1 2 . 3)");
        assert!(parse_str("(1 . 2 3)").is_err());
        assert!(parse_str("(1 .").is_err());
    }

    #[test]
    fn test_quote_sugar() {
        assert_eq!(roundtrip("'x"), "(quote x)");
        assert_eq!(roundtrip("`(a ,b ,@c)"),
            "(quasiquote (a (unquote b) (unquote-splicing c)))");
    }

    #[test]
    fn test_vector_literal() {
        assert_eq!(roundtrip("#(1 2 #(3))"), "#(1 2 #(3))");
    }

    #[test]
    fn test_literals_are_immutable() {
        let v = parse_str("(1 2)").unwrap();
        let Value::Pair(p) = v else { panic!("expected pair") };
        assert!(p.set_car(Value::Null).is_err());
    }

    #[test]
    fn test_eof_and_errors() {
        assert!(matches!(parse_str(""), Ok(Value::Eof)));
        assert!(matches!(parse_str("   ; just a comment"), Ok(Value::Eof)));
        assert!(parse_str(")").is_err());
        assert!(parse_str("(1 2").is_err());
        assert!(parse_str("'").is_err());
    }

    #[test]
    fn test_parse_all() {
        let forms = parse_all("1 2 (+ 1 2)").unwrap();
        assert_eq!(forms.len(), 3);
    }

    #[test]
    fn test_top_level_dot_is_a_symbol() {
        assert_eq!(roundtrip("."), ".");
    }
}
