//! Lexer
//!
//!     Tokenization is handled entirely by logos (see [Token](crate::lingo::token::Token)).
//!     This module keeps the byte range of every token so the parser can report offsets,
//!     and turns the first logos failure into a classified [ParseError].
//!
//!     Logos only tells us that a slice failed to lex. The slice itself is enough to tell
//!     the common failures apart: a leading quote is a string that never closed, a bare
//!     `#` is a symbol without identifier, and anything else is a malformed token.

use crate::lingo::error::{ParseError, ParseErrorKind};
use crate::lingo::token::Token;
use logos::Logos;
use std::ops::Range;

/// Token with its byte range in the source line
pub type TokenSpan = (Token, Range<usize>);

/// Tokenize a line, failing on the first slice logos cannot match
pub fn tokenize(source: &str) -> Result<Vec<TokenSpan>, ParseError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => return Err(classify(lexer.slice(), span.start)),
        }
    }

    Ok(tokens)
}

fn classify(slice: &str, offset: usize) -> ParseError {
    let kind = if slice.starts_with('"') {
        ParseErrorKind::UnterminatedString
    } else if slice.starts_with('#') {
        ParseErrorKind::EmptySymbol
    } else {
        ParseErrorKind::MalformedToken {
            text: slice.to_string(),
        }
    };
    ParseError::new(offset, kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .expect("source to tokenize")
            .into_iter()
            .map(|(token, _)| token)
            .collect()
    }

    #[test]
    fn test_spans_are_byte_ranges() {
        let tokens = tokenize("[1, \"ab\"]").unwrap();
        let spans: Vec<_> = tokens.into_iter().map(|(_, span)| span).collect();
        assert_eq!(spans, vec![0..1, 1..2, 2..3, 4..8, 8..9]);
    }

    #[test]
    fn test_call_tokenization() {
        assert_eq!(
            kinds("point(1, 2)"),
            vec![
                Token::Ident("point".into()),
                Token::LParen,
                Token::Integer(1),
                Token::Comma,
                Token::Integer(2),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_whitespace_is_skipped() {
        assert_eq!(kinds(" \t[ ]\r"), vec![Token::LBracket, Token::RBracket]);
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("[\"abc").unwrap_err();
        assert_eq!(err.offset, 1);
        assert_eq!(err.kind, ParseErrorKind::UnterminatedString);
    }

    #[test]
    fn test_empty_symbol() {
        let err = tokenize("#").unwrap_err();
        assert_eq!(err.offset, 0);
        assert_eq!(err.kind, ParseErrorKind::EmptySymbol);
    }

    #[test]
    fn test_malformed_token() {
        let err = tokenize("[1, @]").unwrap_err();
        assert_eq!(err.offset, 4);
        assert_eq!(
            err.kind,
            ParseErrorKind::MalformedToken { text: "@".into() }
        );
    }
}
