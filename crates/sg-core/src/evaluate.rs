//! Literal evaluation with `tree(...)` / `graph(...)` wrappers.

use std::sync::OnceLock;

use regex::Regex;
use tracing::trace;

use crate::literal::parse_literal;
use crate::value::Value;

/// First parenthesized group, non-greedy, on a single line.
///
/// Nested parentheses are not balanced: `(a(b))` yields `a(b`.
fn first_group_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\((.*?)\)").expect("valid parenthesized group pattern"))
}

fn first_group(text: &str) -> Option<&str> {
    first_group_pattern()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Evaluate a sample literal.
///
/// Text mentioning `tree` (any case) has the lowercase keyword removed and the
/// first parenthesized group evaluated and wrapped in [`Value::Tree`]; `graph`
/// works the same way for [`Value::Graph`]. Everything else goes through the
/// literal parser, and text that does not parse comes back verbatim as
/// [`Value::Text`].
///
/// A keyword without any parenthesized group is evaluated as a plain literal.
pub fn evaluate(text: &str) -> Value {
    let lowered = text.to_lowercase();
    if lowered.contains("tree") {
        let stripped = text.replace("tree", "");
        if let Some(inner) = first_group(&stripped) {
            return Value::Tree(Box::new(evaluate(inner)));
        }
    } else if lowered.contains("graph") {
        let stripped = text.replace("graph", "");
        if let Some(inner) = first_group(&stripped) {
            return Value::Graph(Box::new(evaluate(inner)));
        }
    }

    match parse_literal(text) {
        Ok(value) => value,
        Err(e) => {
            trace!(text, error = %e, "not a literal, keeping raw text");
            Value::Text(text.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_literals() {
        assert_eq!(evaluate("42"), Value::Int(42));
        assert_eq!(
            evaluate("[1, 2, 3]"),
            Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
        assert_eq!(
            evaluate("{'a': 1}"),
            Value::Dict(vec![(Value::Str("a".into()), Value::Int(1))])
        );
    }

    #[test]
    fn test_fallback_keeps_raw_text() {
        assert_eq!(evaluate("hello world"), Value::Text("hello world".into()));
        assert_eq!(evaluate("[1, 2"), Value::Text("[1, 2".into()));
        assert_eq!(evaluate("1+2j"), Value::Text("1+2j".into()));
        assert_eq!(evaluate("b'abc'"), Value::Text("b'abc'".into()));
    }

    #[test]
    fn test_deep_nesting_falls_back() {
        let deep = "[".repeat(50_000) + &"]".repeat(50_000);
        assert_eq!(evaluate(&deep), Value::Text(deep.clone()));
    }

    #[test]
    fn test_empty_set_and_big_integers() {
        assert_eq!(evaluate("set()"), Value::Set(vec![]));
        assert_eq!(
            evaluate("100000000000000000000"),
            Value::BigInt("100000000000000000000".into())
        );
    }

    #[test]
    fn test_tree_wrapper() {
        assert_eq!(evaluate("tree(1)"), Value::Tree(Box::new(Value::Int(1))));
        assert_eq!(
            evaluate("Tree([1, None, 2])"),
            Value::Tree(Box::new(Value::List(vec![
                Value::Int(1),
                Value::None,
                Value::Int(2)
            ])))
        );
    }

    #[test]
    fn test_graph_wrapper() {
        assert_eq!(
            evaluate("graph([1,2])"),
            Value::Graph(Box::new(Value::List(vec![Value::Int(1), Value::Int(2)])))
        );
    }

    #[test]
    fn test_first_group_is_not_balanced() {
        // Known limitation: the group ends at the first `)`.
        assert_eq!(
            evaluate("tree(graph((1,2)))"),
            Value::Tree(Box::new(Value::Text("graph((1,2".into())))
        );
        assert_eq!(
            evaluate("graph([(1, 2), (3, 4)])"),
            Value::Graph(Box::new(Value::Text("[(1, 2".into())))
        );
    }

    #[test]
    fn test_keyword_without_group() {
        assert_eq!(evaluate("'street'"), Value::Str("street".into()));
        assert_eq!(evaluate("treehouse"), Value::Text("treehouse".into()));
    }
}
