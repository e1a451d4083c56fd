//! Scaffold orchestration.
//!
//! Implements the locate → extract → render → write cycle for one markdown
//! problem statement:
//!
//! ```text
//! Questions/<Category>/<Problem>.md
//! Questions/<Category>/<Problem>/Python/solution[_N].py
//! Questions/<Category>/<Problem>/Python/solution[_N]_test.py
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sg_core::{extract_samples, SampleError};
use tracing::{debug, info, warn};

use crate::listing::{find_markdown, find_unprocessed, DirectoryListing, FsListing};
use crate::template::{RenderConfig, TemplateBuilder};

/// Scaffold configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaffoldConfig {
    /// Root of the problem statement tree
    pub questions_root: PathBuf,
    /// Folder for generated sources inside each problem folder
    pub language_dir: String,
    /// Base name of the solution file
    pub solution_stem: String,
    /// Extension of generated files
    pub extension: String,
    /// Render without writing anything
    pub dry_run: bool,
    /// Template settings
    pub render: RenderConfig,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            questions_root: PathBuf::from("Questions"),
            language_dir: "Python".to_string(),
            solution_stem: "solution".to_string(),
            extension: "py".to_string(),
            dry_run: false,
            render: RenderConfig::default(),
        }
    }
}

/// Result of a scaffold run that did not fail hard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Files were written
    Created {
        problem: String,
        language_dir: PathBuf,
        solution: PathBuf,
        test: PathBuf,
    },
    /// Dry run: files were rendered but not written
    Previewed {
        problem: String,
        solution: PathBuf,
        test: PathBuf,
        function: String,
        test_module: String,
    },
    /// The requested markdown file does not exist
    NotFound { requested: String },
    /// Every markdown file already has its folder
    NothingToProcess { root: PathBuf },
    /// Inputs or output came out empty
    Incomplete { markdown: PathBuf },
}

impl Outcome {
    /// Human-readable summary.
    pub fn message(&self) -> String {
        match self {
            Outcome::Created {
                problem,
                language_dir,
                ..
            } => format!(
                "Created files for '{}' in '{}'.",
                problem,
                language_dir.display()
            ),
            Outcome::Previewed {
                problem,
                solution,
                test,
                function,
                test_module,
            } => format!(
                "Would create files for '{}':\n\n# {}\n{}\n# {}\n{}",
                problem,
                solution.display(),
                function,
                test.display(),
                test_module
            ),
            Outcome::NotFound { requested } => format!("Error: File '{}' not found", requested),
            Outcome::NothingToProcess { root } => format!(
                "No unprocessed .md file found in the '{}' folder.",
                root.display()
            ),
            Outcome::Incomplete { markdown } => format!(
                "Error: Unable to extract input or output from {}.",
                markdown.display()
            ),
        }
    }
}

/// Scaffold errors.
#[derive(Debug, thiserror::Error)]
pub enum ScaffoldError {
    #[error("Failed to extract samples from {}: {source}", .path.display())]
    Sample {
        path: PathBuf,
        #[source]
        source: SampleError,
    },

    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScaffoldError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> ScaffoldError + '_ {
        move |source| ScaffoldError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Generates solution stubs and tests for markdown problem statements.
pub struct Scaffolder<L: DirectoryListing = FsListing> {
    listing: L,
    config: ScaffoldConfig,
    templates: TemplateBuilder,
}

impl Scaffolder<FsListing> {
    /// Create a scaffolder over the real filesystem.
    pub fn new(config: ScaffoldConfig) -> Self {
        Self::with_listing(FsListing, config)
    }
}

impl<L: DirectoryListing> Scaffolder<L> {
    /// Create a scaffolder with a custom directory listing.
    pub fn with_listing(listing: L, config: ScaffoldConfig) -> Self {
        let templates = TemplateBuilder::new(config.render.clone());
        Self {
            listing,
            config,
            templates,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &ScaffoldConfig {
        &self.config
    }

    /// Resolve the markdown file to process.
    ///
    /// An explicit request is used as a path when it exists, otherwise it is
    /// looked up by file name under the questions root. Without a request the
    /// first unprocessed file is picked.
    pub fn locate(&self, requested: Option<&str>) -> Result<PathBuf, Outcome> {
        let root = &self.config.questions_root;
        match requested {
            Some(name) => {
                let direct = Path::new(name);
                if self.listing.exists(direct) {
                    return Ok(direct.to_path_buf());
                }
                find_markdown(&self.listing, root, name).ok_or_else(|| Outcome::NotFound {
                    requested: name.to_string(),
                })
            }
            None => find_unprocessed(&self.listing, root)
                .ok_or_else(|| Outcome::NothingToProcess { root: root.clone() }),
        }
    }

    /// Path for a new solution file in `language_dir`.
    ///
    /// The canonical name is used when free; otherwise the first unused
    /// `<stem>_<n>` suffix starting at 1.
    pub fn solution_path(&self, language_dir: &Path) -> PathBuf {
        let canonical =
            language_dir.join(format!("{}.{}", self.config.solution_stem, self.config.extension));
        if !self.listing.exists(&canonical) {
            return canonical;
        }

        let mut suffix = 1u32;
        loop {
            let candidate = language_dir.join(format!(
                "{}_{}.{}",
                self.config.solution_stem, suffix, self.config.extension
            ));
            if !self.listing.exists(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    /// Process one markdown file.
    pub fn run(&self, requested: Option<&str>) -> Result<Outcome, ScaffoldError> {
        let markdown = match self.locate(requested) {
            Ok(path) => path,
            Err(outcome) => {
                debug!(?outcome, "nothing to scaffold");
                return Ok(outcome);
            }
        };
        info!(markdown = %markdown.display(), "processing problem statement");

        let text = fs::read_to_string(&markdown).map_err(ScaffoldError::io(&markdown))?;
        let sample = extract_samples(&text).map_err(|source| ScaffoldError::Sample {
            path: markdown.clone(),
            source,
        })?;
        if !sample.is_complete() {
            warn!(markdown = %markdown.display(), "sample inputs or output are empty");
            return Ok(Outcome::Incomplete { markdown });
        }
        debug!(
            inputs = sample.inputs.len(),
            output_type = sample.output.type_name(),
            "extracted sample"
        );

        let artifacts = self.templates.render(&sample);

        let problem = markdown
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let problem_dir = markdown
            .parent()
            .map(|p| p.join(&problem))
            .unwrap_or_else(|| PathBuf::from(&problem));
        let language_dir = problem_dir.join(&self.config.language_dir);

        let solution = self.solution_path(&language_dir);
        let module = solution
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.config.solution_stem.clone());
        let test = solution.with_file_name(format!("{}_test.{}", module, self.config.extension));
        let test_module = artifacts.bind_test_module(&module);

        if self.config.dry_run {
            info!(solution = %solution.display(), "dry run, nothing written");
            return Ok(Outcome::Previewed {
                problem,
                solution,
                test,
                function: artifacts.function,
                test_module,
            });
        }

        fs::create_dir_all(&language_dir).map_err(ScaffoldError::io(&language_dir))?;
        fs::write(&solution, &artifacts.function).map_err(ScaffoldError::io(&solution))?;
        fs::write(&test, &test_module).map_err(ScaffoldError::io(&test))?;
        info!(
            solution = %solution.display(),
            test = %test.display(),
            "wrote solution stub and tests"
        );

        Ok(Outcome::Created {
            problem,
            language_dir,
            solution,
            test,
        })
    }
}
