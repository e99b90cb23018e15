//! Property-based tests for the literal writer and parser
//!
//! Writing any tree in canonical form and parsing it back must give the same tree,
//! including key spelling and order, string escapes and nesting of at least three levels.

use lingo_parser::lingo::{parse, Node};
use proptest::prelude::*;

fn key_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,8}"
}

fn scalar_strategy() -> impl Strategy<Value = Node> {
    prop_oneof![
        any::<i64>().prop_map(Node::Number),
        (-1.0e9..1.0e9f64).prop_map(Node::FloatNumber),
        // Quotes and backslashes exercise the escapes
        "[a-zA-Z0-9 .:,#\\[\\]\"\\\\]{0,12}".prop_map(Node::String),
        "[A-Za-z0-9_]{1,8}".prop_map(Node::Symbol),
    ]
}

fn node_strategy() -> impl Strategy<Value = Node> {
    scalar_strategy().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Node::List),
            prop::collection::vec((key_strategy(), inner.clone()), 0..6)
                .prop_map(Node::PropertyList),
            ("[a-z][a-zA-Z]{0,6}", prop::collection::vec(inner, 0..4))
                .prop_map(|(name, args)| Node::Call { name, args }),
        ]
    })
}

proptest! {
    #[test]
    fn test_write_then_parse(node in node_strategy()) {
        let text = node.to_string();
        prop_assert_eq!(parse(&text), Ok(node), "canonical text: {}", text);
    }

    #[test]
    fn test_canonical_text_is_stable(node in node_strategy()) {
        let once = node.to_string();
        let twice = parse(&once).map(|n| n.to_string());
        prop_assert_eq!(twice, Ok(once));
    }

    #[test]
    fn test_whitespace_between_tokens_is_ignored(
        items in prop::collection::vec(any::<i32>(), 1..8)
    ) {
        let tight = format!("[{}]", items.iter().map(i32::to_string).collect::<Vec<_>>().join(","));
        let joined = items.iter().map(i32::to_string).collect::<Vec<_>>().join(" ,\t");
        let loose = format!(" [ {} ] ", joined);
        prop_assert_eq!(parse(&tight), parse(&loose));
    }

    #[test]
    fn test_parse_never_panics(text in "[\\[\\]#:,\"0-9a-z() .-]{0,24}") {
        let _ = parse(&text);
    }
}
