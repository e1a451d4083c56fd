//! # sg-core
//!
//! Sample extraction for markdown problem statements.
//!
//! A problem statement carries one or more `## Sample Input` blocks made of
//! `name = literal` lines and a single `## Expected Output` block, each closed
//! by a `---` line:
//!
//! ```text
//! ## Sample Input
//! num = 5
//! ---
//! ## Expected Output
//! 10
//! ---
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Module | Produces |
//! |-------|--------|----------|
//! | Literal parsing | [`literal`] | [`Value`] or [`LiteralError`] |
//! | Evaluation | [`evaluate`](mod@evaluate) | [`Value`], falling back to raw text |
//! | Extraction | [`sample`] | [`Sample`] or [`SampleError`] |
//! | Naming | [`naming`] | snake_case parameter names |
//!
//! # Usage
//!
//! ```rust
//! use sg_core::{extract_samples, Value};
//!
//! let markdown = "## Sample Input\nnum = 5\n---\n## Expected Output\n10\n---";
//! let sample = extract_samples(markdown).unwrap();
//! assert_eq!(sample.inputs["num"], Value::Int(5));
//! assert_eq!(sample.output, Value::Int(10));
//! ```

pub mod evaluate;
pub mod literal;
pub mod naming;
pub mod sample;
pub mod value;

pub use evaluate::evaluate;
pub use literal::{parse_literal, LiteralError};
pub use naming::to_snake_case;
pub use sample::{extract_samples, Sample, SampleError};
pub use value::{Value, ValueKind};
