//! Tokenizer
//!
//! Characters to tokens by anchored regex match. The pattern table is tried
//! in precedence order at each position and each pattern is greedy, so the
//! first pattern that matches claims the longest prefix it can. Comment and
//! whitespace tokens consume input without being emitted. Keyword tokens
//! (`#t`, `#\space`, ...) match case-insensitively.

use std::sync::LazyLock;

use regex::Regex;
use schist_core::{Result, SchemeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Comment,
    Quasiquote,
    UnquoteSplicing,
    Unquote,
    LVector,
    LParen,
    RParen,
    Number,
    True,
    False,
    CharSpace,
    CharNewline,
    CharRaw,
    Quote,
    Whitespace,
    Str,
    Dot,
    Identifier,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

/// The fixed token set, in precedence order.
static PATTERNS: LazyLock<Vec<(TokenKind, Regex)>> = LazyLock::new(|| {
    let table: &[(TokenKind, &str)] = &[
        (TokenKind::Comment, r";[^\n]*"),
        (TokenKind::Quasiquote, "`"),
        (TokenKind::UnquoteSplicing, ",@"),
        (TokenKind::Unquote, ","),
        (TokenKind::LVector, r"#\("),
        (TokenKind::LParen, r"\("),
        (TokenKind::RParen, r"\)"),
        (TokenKind::Number, r"[+-]?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?"),
        (TokenKind::True, r"(?i)#t"),
        (TokenKind::False, r"(?i)#f"),
        (TokenKind::CharSpace, r"(?i)#\\space"),
        (TokenKind::CharNewline, r"(?i)#\\newline"),
        (TokenKind::CharRaw, r"#\\(?s:.)"),
        (TokenKind::Quote, "'"),
        (TokenKind::Whitespace, r"\s+"),
        (TokenKind::Str, r#""(\\"|[^"])*""#),
        (TokenKind::Dot, r"\."),
        (TokenKind::Identifier, r"[^0-9()\s][^()\s]*"),
    ];
    table
        .iter()
        .map(|(kind, pattern)| {
            (*kind, Regex::new(&format!("^(?:{pattern})")).expect("token pattern"))
        })
        .collect()
});

/// Split source text into tokens, dropping comments and whitespace.
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut rest = source;
    while !rest.is_empty() {
        let (kind, len) = match_at(rest)?;
        if !matches!(kind, TokenKind::Comment | TokenKind::Whitespace) {
            tokens.push(Token {
                kind,
                text: rest[..len].to_string(),
            });
        }
        rest = &rest[len..];
    }
    Ok(tokens)
}

fn match_at(rest: &str) -> Result<(TokenKind, usize)> {
    for (kind, regex) in PATTERNS.iter() {
        if let Some(m) = regex.find(rest)
            && m.end() > 0
        {
            return Ok((*kind, m.end()));
        }
    }
    Err(SchemeError::Parse(format!(
        "unexpected character {:?}",
        rest.chars().next().unwrap_or('\0')
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_parens_and_atoms() {
        assert_eq!(
            kinds("(+ 1 2)"),
            vec![
                TokenKind::LParen,
                TokenKind::Identifier,
                TokenKind::Number,
                TokenKind::Number,
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kinds("42 -7 +3 1.5 2e10 -1.25e-3"), vec![TokenKind::Number; 6]);
        // A bare sign is an identifier, not a number.
        assert_eq!(kinds("+ -"), vec![TokenKind::Identifier, TokenKind::Identifier]);
    }

    #[test]
    fn test_booleans_case_insensitive() {
        assert_eq!(kinds("#t #F #T"), vec![TokenKind::True, TokenKind::False, TokenKind::True]);
    }

    #[test]
    fn test_characters() {
        assert_eq!(
            kinds(r"#\space #\SPACE #\newline #\a #\("),
            vec![
                TokenKind::CharSpace,
                TokenKind::CharSpace,
                TokenKind::CharNewline,
                TokenKind::CharRaw,
                TokenKind::CharRaw,
            ]
        );
    }

    #[test]
    fn test_quote_family() {
        assert_eq!(
            kinds("'x `(a ,b ,@c)"),
            vec![
                TokenKind::Quote,
                TokenKind::Identifier,
                TokenKind::Quasiquote,
                TokenKind::LParen,
                TokenKind::Identifier,
                TokenKind::Unquote,
                TokenKind::Identifier,
                TokenKind::UnquoteSplicing,
                TokenKind::Identifier,
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn test_string_with_escaped_quote() {
        let tokens = tokenize(r#""say \"hi\"""#).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[0].text, r#""say \"hi\"""#);
    }

    #[test]
    fn test_comment_is_dropped() {
        assert_eq!(
            kinds("1 ; the rest of this line vanishes\n2"),
            vec![TokenKind::Number, TokenKind::Number]
        );
    }

    #[test]
    fn test_vector_open() {
        assert_eq!(
            kinds("#(1)"),
            vec![TokenKind::LVector, TokenKind::Number, TokenKind::RParen]
        );
    }

    #[test]
    fn test_dot_and_dotted_identifiers() {
        assert_eq!(kinds("( a . b )")[2], TokenKind::Dot);
        // An identifier may contain a dot after its first character.
        assert_eq!(kinds("a.b"), vec![TokenKind::Identifier]);
    }

    #[test]
    fn test_identifier_charset() {
        assert_eq!(
            kinds("list->vector set! <= don't"),
            vec![TokenKind::Identifier; 4]
        );
    }
}
