//! Python stub and test module templates.
//!
//! Types come from the sample values: each parameter is annotated with the
//! type of its sample value, the return type with the type of the expected
//! output. Tree and Graph values pull in their helper imports.

use indexmap::IndexMap;
use serde::Serialize;
use sg_core::{Sample, Value, ValueKind};

/// Template rendering configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderConfig {
    /// Name of the generated stub function
    pub function_name: String,
    /// Module the test template imports from until bound to a real file
    pub placeholder_module: String,
    /// Python package holding the `tree_util` / `graph_util` helpers
    pub helpers_package: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            function_name: "solution_func".to_string(),
            placeholder_module: "solution".to_string(),
            helpers_package: "CommonResources.Python".to_string(),
        }
    }
}

/// Rendered stub and test module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    /// Stub function source
    pub function: String,
    /// Test module source, importing from the placeholder module
    pub test_module: String,
    placeholder_module: String,
}

impl Artifacts {
    /// Test module with its import pointed at `module`.
    pub fn bind_test_module(&self, module: &str) -> String {
        self.test_module.replace(
            &format!("from {} import ", self.placeholder_module),
            &format!("from {} import ", module),
        )
    }
}

/// Renders stubs and test modules from samples.
#[derive(Debug, Clone, Default)]
pub struct TemplateBuilder {
    config: RenderConfig,
}

impl TemplateBuilder {
    /// Create a builder with the given config.
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render both artifacts for a sample, normalizing parameter names.
    pub fn render(&self, sample: &Sample) -> Artifacts {
        self.render_parts(&sample.normalized_inputs(), &sample.output)
    }

    /// Render both artifacts from already-normalized inputs.
    pub fn render_parts(&self, inputs: &IndexMap<String, Value>, output: &Value) -> Artifacts {
        let mut imports = Vec::new();

        let params = inputs
            .iter()
            .map(|(name, value)| {
                self.collect_import(value.kind(), &mut imports);
                format!("{}: {}", name, value.type_name())
            })
            .collect::<Vec<_>>()
            .join(", ");

        let return_kind = output.kind();
        self.collect_import(return_kind, &mut imports);

        let header = if imports.is_empty() {
            String::new()
        } else {
            format!("{}\n\n\n", imports.join("\n"))
        };

        let function = format!(
            "{header}def {name}({params}) -> {return_type}:\n    return {default}\n",
            header = header,
            name = self.config.function_name,
            params = params,
            return_type = return_kind.type_name(),
            default = default_return(return_kind),
        );

        let inputs_literal = Value::Dict(
            inputs
                .iter()
                .map(|(name, value)| (Value::Str(name.clone()), value.clone()))
                .collect(),
        );

        let test_module = format!(
            r#"{header}from {module} import {name}

test_cases = [
    ({inputs}, {output}),  # input, output
]


def test_{name}():
    for input_kwargs, output in test_cases:
        assert {name}(**input_kwargs) == output
"#,
            header = header,
            module = self.config.placeholder_module,
            name = self.config.function_name,
            inputs = inputs_literal.to_python(),
            output = output.to_python(),
        );

        Artifacts {
            function,
            test_module,
            placeholder_module: self.config.placeholder_module.clone(),
        }
    }

    /// Record the helper import for `kind`, once.
    fn collect_import(&self, kind: ValueKind, imports: &mut Vec<String>) {
        if let Some((module, class)) = kind.helper() {
            let import = format!("from {}.{} import {}", self.config.helpers_package, module, class);
            if !imports.contains(&import) {
                imports.push(import);
            }
        }
    }
}

/// Stub body for a return kind.
fn default_return(kind: ValueKind) -> String {
    match kind {
        ValueKind::Int | ValueKind::None => "None".to_string(),
        ValueKind::List => "[]".to_string(),
        other => format!("{}()", other.type_name()),
    }
}
