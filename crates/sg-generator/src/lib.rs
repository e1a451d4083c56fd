//! # sg-generator
//!
//! Solution stub and test scaffolding for markdown problem statements.
//!
//! # Usage
//!
//! ```bash
//! # Scaffold the first problem statement without a generated folder
//! cargo run -p sg-generator --bin stubgen
//!
//! # Scaffold a specific statement (file name matched case-insensitively)
//! cargo run -p sg-generator --bin stubgen -- -f TwoSum.md
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Questions  │ ──> │   Sample    │ ──> │  Template   │
//! │    tree     │     │  Extractor  │     │   Builder   │
//! └─────────────┘     └─────────────┘     └──────┬──────┘
//!                                                │
//!                     ┌──────────────────────────┘
//!                     ▼
//!              ┌─────────────┐
//!              │ solution.py │
//!              │ *_test.py   │
//!              └─────────────┘
//! ```

pub mod listing;
pub mod scaffold;
pub mod template;

pub use listing::{find_markdown, find_unprocessed, DirectoryListing, Entry, FsListing};
pub use scaffold::{Outcome, ScaffoldConfig, ScaffoldError, Scaffolder};
pub use template::{Artifacts, RenderConfig, TemplateBuilder};
