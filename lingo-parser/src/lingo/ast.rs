//! Literal AST
//!
//!     A parsed line is a single [Node]. The set of variants is closed: decoders match on
//!     it exhaustively and never look at source text again.
//!
//!     Property lists keep their entries in source order, with keys spelled as written.
//!     Lookups by key ignore ASCII case, since files in the wild mix `#tlMatrix` and
//!     `#tlmatrix` for the same property.
//!
//!     Serializing back to literal notation is done through `Display` (see [writer]).

pub mod writer;

use serde::Serialize;

/// One parsed literal value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum Node {
    Number(i64),
    FloatNumber(f64),
    String(String),
    /// Identifier written after `#`, stored without the sigil
    Symbol(String),
    List(Vec<Node>),
    /// `(key, value)` entries in source order; keys are stored without `#`
    PropertyList(Vec<(String, Node)>),
    /// Global call such as `point(1, 2)` or `color(255, 0, 0)`
    Call { name: String, args: Vec<Node> },
}

impl Node {
    /// Short name of the variant, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Number(_) => "number",
            Node::FloatNumber(_) => "float",
            Node::String(_) => "string",
            Node::Symbol(_) => "symbol",
            Node::List(_) => "list",
            Node::PropertyList(_) => "property list",
            Node::Call { .. } => "call",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Node::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value of either number variant
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Node::Number(n) => Some(*n as f64),
            Node::FloatNumber(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Node::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_property_list(&self) -> Option<&[(String, Node)]> {
        match self {
            Node::PropertyList(entries) => Some(entries),
            _ => None,
        }
    }

    /// Arguments of a call with the given name (case-insensitive)
    pub fn as_call(&self, name: &str) -> Option<&[Node]> {
        match self {
            Node::Call { name: n, args } if n.eq_ignore_ascii_case(name) => Some(args),
            _ => None,
        }
    }

    /// Look up a property-list value by key, ignoring ASCII case
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_property_list().and_then(|entries| lookup(entries, key))
    }
}

/// Find the value for `key` among property-list entries, ignoring ASCII case
pub fn lookup<'a>(entries: &'a [(String, Node)], key: &str) -> Option<&'a Node> {
    entries
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, value)| value)
}
