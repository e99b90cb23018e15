//! Parser
//!
//!     The grammar is recursive over "value":
//!
//!         value    := scalar | call | `[:]` | props | list
//!         scalar   := integer | float | string | symbol
//!         call     := identifier `(` value (`,` value)* `)`
//!         props    := `[` symbol `:` value (`,` symbol `:` value)* `]`
//!         list     := `[` (value (`,` value)*)? `]`
//!
//!     Property lists and plain lists share their delimiters. The parser tries the
//!     `symbol :` form first and backtracks into a plain list when that fails, which is
//!     what chumsky's `or` does for us. One call consumes exactly one value; anything left
//!     over is a [TrailingInput](ParseErrorKind::TrailingInput) failure.
//!
//!     Chumsky errors are mapped onto [ParseErrorKind] with a little help from the token
//!     stream: the bracket balance tells unbalanced input apart from an ordinary
//!     mismatch, and the innermost open bracket tells whether the mismatch happened
//!     inside a property list.

use crate::lingo::ast::Node;
use crate::lingo::error::{ParseError, ParseErrorKind};
use crate::lingo::lexing::{tokenize, TokenSpan};
use crate::lingo::token::Token;
use chumsky::prelude::*;
use chumsky::Stream;
use rayon::prelude::*;
use tracing::trace;

/// Deepest nesting of brackets and calls a line may have.
///
/// Level files nest five deep at most. The limit keeps the recursive descent well
/// inside a default thread stack.
pub const MAX_DEPTH: usize = 512;

/// Parse one line of literal notation into a [Node]
pub fn parse(source: &str) -> Result<Node, ParseError> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(ParseError::new(0, ParseErrorKind::EmptyInput));
    }
    if let Some(offset) = too_deep(&tokens) {
        return Err(ParseError::new(
            offset,
            ParseErrorKind::TooDeep { limit: MAX_DEPTH },
        ));
    }
    trace!(tokens = tokens.len(), "parsing literal line");

    let eoi = source.len();
    let stream = Stream::from_iter(eoi..eoi, tokens.clone().into_iter());
    value_parser()
        .then_ignore(end())
        .parse(stream)
        .map_err(|errors| match errors.into_iter().next() {
            Some(err) => map_error(source, &tokens, err),
            None => ParseError::new(
                0,
                ParseErrorKind::Unexpected {
                    expected: "a value".into(),
                    found: "nothing".into(),
                },
            ),
        })
}

/// Parse independent lines in parallel, keeping input order
pub fn parse_lines<S>(lines: &[S]) -> Vec<Result<Node, ParseError>>
where
    S: AsRef<str> + Sync,
{
    lines.par_iter().map(|line| parse(line.as_ref())).collect()
}

fn value_parser() -> impl Parser<Token, Node, Error = Simple<Token>> + Clone {
    recursive(|value| {
        let scalar = select! {
            Token::Integer(n) => Node::Number(n),
            Token::Float(x) => Node::FloatNumber(x.into_inner()),
            Token::Str(s) => Node::String(s),
            Token::Symbol(s) => Node::Symbol(s),
        };

        let items = value.clone().separated_by(just(Token::Comma));

        let call = select! { Token::Ident(name) => name }
            .then(
                items
                    .clone()
                    .delimited_by(just(Token::LParen), just(Token::RParen)),
            )
            .map(|(name, args)| Node::Call { name, args });

        let empty_props = just(Token::LBracket)
            .then(just(Token::Colon))
            .then(just(Token::RBracket))
            .to(Node::PropertyList(Vec::new()));

        let entry = select! { Token::Symbol(key) => key }
            .then_ignore(just(Token::Colon))
            .then(value.clone());

        let props = entry
            .separated_by(just(Token::Comma))
            .at_least(1)
            .delimited_by(just(Token::LBracket), just(Token::RBracket))
            .map(Node::PropertyList);

        let list = items
            .delimited_by(just(Token::LBracket), just(Token::RBracket))
            .map(Node::List);

        scalar.or(call).or(empty_props).or(props).or(list)
    })
}

fn map_error(source: &str, tokens: &[TokenSpan], err: Simple<Token>) -> ParseError {
    let span = err.span();
    let expected = describe_expected(&err);

    let kind = match err.found() {
        None if open_depth(tokens, tokens.len()) > 0 => {
            ParseErrorKind::UnbalancedBrackets { expected }
        }
        None => ParseErrorKind::Unexpected {
            expected,
            found: "end of input".into(),
        },
        Some(_) => {
            let found = format!("`{}`", source.get(span.clone()).unwrap_or_default());
            let at = tokens
                .iter()
                .position(|(_, s)| s.start >= span.start)
                .unwrap_or(tokens.len());
            if err.expected().any(Option::is_none) {
                ParseErrorKind::TrailingInput { found }
            } else if inside_property_list(tokens, at)
                && !matches!(tokens.get(at), Some((Token::Symbol(_), _)))
            {
                ParseErrorKind::AmbiguousPropertyList { found }
            } else {
                ParseErrorKind::Unexpected { expected, found }
            }
        }
    };

    ParseError::new(span.start, kind)
}

/// Only the bracket alternatives of a value report what they expected, so an
/// expected `[` stands for any value.
fn describe_expected(err: &Simple<Token>) -> String {
    let mut names: Vec<String> = err
        .expected()
        .map(|token| match token {
            Some(Token::LBracket) => "a value".to_string(),
            Some(token) => token.to_string(),
            None => "end of input".to_string(),
        })
        .collect();
    names.sort();
    names.dedup();
    if names.is_empty() {
        "a value".to_string()
    } else {
        names.join(" or ")
    }
}

/// Offset of the first opening token past [MAX_DEPTH]
fn too_deep(tokens: &[TokenSpan]) -> Option<usize> {
    let mut depth = 0usize;
    for (token, span) in tokens {
        if token.is_open() {
            depth += 1;
            if depth > MAX_DEPTH {
                return Some(span.start);
            }
        } else if token.is_close() {
            depth = depth.saturating_sub(1);
        }
    }
    None
}

/// Number of compound forms still open before token index `upto`
fn open_depth(tokens: &[TokenSpan], upto: usize) -> usize {
    tokens[..upto].iter().fold(0usize, |depth, (token, _)| {
        if token.is_open() {
            depth + 1
        } else if token.is_close() {
            depth.saturating_sub(1)
        } else {
            depth
        }
    })
}

/// Whether the innermost form open before token index `at` starts with `[#key:`
fn inside_property_list(tokens: &[TokenSpan], at: usize) -> bool {
    let mut open = Vec::new();
    for (i, (token, _)) in tokens[..at].iter().enumerate() {
        if token.is_open() {
            open.push(i);
        } else if token.is_close() {
            open.pop();
        }
    }
    let Some(&start) = open.last() else {
        return false;
    };
    matches!(
        (tokens.get(start), tokens.get(start + 1), tokens.get(start + 2)),
        (
            Some((Token::LBracket, _)),
            Some((Token::Symbol(_), _)),
            Some((Token::Colon, _))
        )
    )
}
