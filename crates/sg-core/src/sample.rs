//! Sample extraction from markdown problem statements.

use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;
use tracing::debug;

use crate::evaluate::evaluate;
use crate::naming::to_snake_case;
use crate::value::Value;

/// Sample extraction errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SampleError {
    #[error("Sample input or output not found in the input text")]
    SectionsNotFound,

    #[error("Malformed sample input line {line:?}: expected exactly one '='")]
    MalformedAssignment { line: String },

    #[error("Expected a single output block, found {count}")]
    MultipleOutputs { count: usize },
}

/// Sample inputs and the expected output of one problem statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Parameter name (as written) to value, in first-seen order
    pub inputs: IndexMap<String, Value>,
    /// Expected output value
    pub output: Value,
}

impl Sample {
    /// Inputs keyed by snake_case parameter names.
    ///
    /// Keys that normalize to the same name collapse: the last value wins and
    /// the first key's position is kept.
    pub fn normalized_inputs(&self) -> IndexMap<String, Value> {
        let mut normalized = IndexMap::with_capacity(self.inputs.len());
        for (key, value) in &self.inputs {
            normalized.insert(to_snake_case(key), value.clone());
        }
        normalized
    }

    /// Whether both inputs and output carry something.
    pub fn is_complete(&self) -> bool {
        !self.inputs.is_empty() && !self.output.is_empty()
    }
}

fn comment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"//.*").expect("valid comment pattern"))
}

fn input_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?is)##\s*sample\s*input\s+(.*?)\s*---").expect("valid input block pattern")
    })
}

fn output_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?is)##\s*expected\s*output\s+(.*?)\s*---").expect("valid output block pattern")
    })
}

/// Remove `//` comments up to the end of each line.
///
/// String literals are not respected: `'http://x'` is cut at `//`.
pub fn strip_comments(text: &str) -> String {
    comment_pattern().replace_all(text, "").into_owned()
}

fn blocks<'t>(pattern: &Regex, text: &'t str) -> Vec<&'t str> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Extract the sample inputs and expected output from markdown.
///
/// Every `## Sample Input` block contributes `name = literal` lines to one
/// mapping; later blocks overwrite earlier names. Exactly one
/// `## Expected Output` block is allowed.
pub fn extract_samples(markdown: &str) -> Result<Sample, SampleError> {
    let content = strip_comments(markdown);

    let input_blocks = blocks(input_pattern(), &content);
    let output_blocks = blocks(output_pattern(), &content);
    debug!(
        inputs = input_blocks.len(),
        outputs = output_blocks.len(),
        "found sample blocks"
    );

    if input_blocks.is_empty() || output_blocks.is_empty() {
        return Err(SampleError::SectionsNotFound);
    }

    let mut inputs = IndexMap::new();
    for block in &input_blocks {
        for line in block.lines().filter(|l| !l.trim().is_empty()) {
            let mut parts = line.split('=');
            let (key, value) = match (parts.next(), parts.next(), parts.next()) {
                (Some(key), Some(value), None) => (key, value),
                _ => {
                    return Err(SampleError::MalformedAssignment {
                        line: line.to_string(),
                    })
                }
            };
            inputs.insert(key.trim().to_string(), evaluate(value.trim()));
        }
    }

    if output_blocks.len() > 1 {
        return Err(SampleError::MultipleOutputs {
            count: output_blocks.len(),
        });
    }

    let output = evaluate(output_blocks[0].trim());
    Ok(Sample { inputs, output })
}
