//! Token definitions for the Lingo literal notation
//!
//! The notation is small: brackets, parentheses, commas, colons and four kinds of
//! scalars. Everything is tokenized by logos; spaces, tabs and carriage returns
//! between tokens are skipped.
use logos::Logos;
use ordered_float::OrderedFloat;
use std::fmt;

/// All possible tokens in a literal line
#[derive(Logos, Debug, Clone, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r]+")]
pub enum Token {
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,

    // Floats need the fractional part; `1.` and `.5` are not numbers
    #[regex(r"-?[0-9]+\.[0-9]+", |lex| lex.slice().parse::<f64>().ok().map(OrderedFloat))]
    Float(OrderedFloat<f64>),

    #[regex(r"-?[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Integer(i64),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| unescape(lex.slice()))]
    Str(String),

    #[regex(r"#[A-Za-z0-9_]+", |lex| lex.slice()[1..].to_string())]
    Symbol(String),

    /// Name of a global call such as `point` or `color`
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
}

impl Token {
    /// Check if this token opens a compound form
    pub fn is_open(&self) -> bool {
        matches!(self, Token::LBracket | Token::LParen)
    }

    /// Check if this token closes a compound form
    pub fn is_close(&self) -> bool {
        matches!(self, Token::RBracket | Token::RParen)
    }

    /// Check if this token is a scalar value on its own
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Token::Float(_) | Token::Integer(_) | Token::Str(_) | Token::Symbol(_)
        )
    }
}

/// Describes the token kind, used when listing what the parser expected
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LBracket => write!(f, "`[`"),
            Token::RBracket => write!(f, "`]`"),
            Token::LParen => write!(f, "`(`"),
            Token::RParen => write!(f, "`)`"),
            Token::Comma => write!(f, "`,`"),
            Token::Colon => write!(f, "`:`"),
            Token::Float(_) => write!(f, "float"),
            Token::Integer(_) => write!(f, "integer"),
            Token::Str(_) => write!(f, "string"),
            Token::Symbol(_) => write!(f, "symbol"),
            Token::Ident(_) => write!(f, "identifier"),
        }
    }
}

/// Strip the quotes and decode `\"` and `\\`. Other backslash pairs stay verbatim.
fn unescape(slice: &str) -> String {
    let inner = &slice[1..slice.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
