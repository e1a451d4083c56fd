//! Parameter name normalization.
//!
//! Sample keys come straight from problem statements (`nums`, `targetSum`,
//! `Max Depth`, `k-th value`) and must become Python parameter names.

use std::sync::OnceLock;

use regex::Regex;

fn camel_boundary() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid camel boundary pattern"))
}

/// Convert an identifier-like string to lowercase snake_case.
///
/// - GOOD: `targetSum` -> `target_sum`, `Two Words-Here` -> `two_words_here`
/// - Already normalized names pass through unchanged.
pub fn to_snake_case(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect();

    let mut words = Vec::new();
    for word in cleaned.split_whitespace() {
        let split = camel_boundary().replace_all(word, "${1} ${2}");
        words.extend(split.split_whitespace().map(str::to_string));
    }

    words.join("_").to_lowercase()
}
