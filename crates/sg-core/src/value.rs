//! Evaluated sample values.
//!
//! Values mirror the Python literal model so the generated stubs and tests can
//! name their types and embed them back into Python source.

/// A typed sample value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `None`
    None,
    /// `True` / `False`
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// Integer literal outside the `i64` range, as decimal digits with an
    /// optional leading `-`
    BigInt(String),
    /// Float literal
    Float(f64),
    /// Quoted string literal
    Str(String),
    /// `[a, b]`
    List(Vec<Value>),
    /// `(a, b)`
    Tuple(Vec<Value>),
    /// `{a, b}`, members kept in first-seen order without duplicates
    Set(Vec<Value>),
    /// `{k: v}`, entries kept in first-seen key order
    Dict(Vec<(Value, Value)>),
    /// `tree(...)` helper value
    Tree(Box<Value>),
    /// `graph(...)` helper value
    Graph(Box<Value>),
    /// Text that did not parse as a literal, kept verbatim
    Text(String),
}

/// Tag of a [`Value`], used to pick generated type names and imports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    None,
    Bool,
    Int,
    Float,
    Str,
    List,
    Tuple,
    Set,
    Dict,
    Tree,
    Graph,
}

impl ValueKind {
    /// Python type name used in generated signatures.
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueKind::None => "None",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Str => "str",
            ValueKind::List => "list",
            ValueKind::Tuple => "tuple",
            ValueKind::Set => "set",
            ValueKind::Dict => "dict",
            ValueKind::Tree => "Tree",
            ValueKind::Graph => "Graph",
        }
    }

    /// Helper module and class for kinds that need an import.
    ///
    /// Returns `(module, class)`, e.g. `("tree_util", "Tree")`.
    pub fn helper(&self) -> Option<(&'static str, &'static str)> {
        match self {
            ValueKind::Tree => Some(("tree_util", "Tree")),
            ValueKind::Graph => Some(("graph_util", "Graph")),
            _ => None,
        }
    }
}

impl Value {
    /// Kind tag of this value. Unparsed text reports `Str`.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::None => ValueKind::None,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) | Value::BigInt(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) | Value::Text(_) => ValueKind::Str,
            Value::List(_) => ValueKind::List,
            Value::Tuple(_) => ValueKind::Tuple,
            Value::Set(_) => ValueKind::Set,
            Value::Dict(_) => ValueKind::Dict,
            Value::Tree(_) => ValueKind::Tree,
            Value::Graph(_) => ValueKind::Graph,
        }
    }

    /// Python type name of this value.
    pub fn type_name(&self) -> &'static str {
        self.kind().type_name()
    }

    /// Whether the value carries nothing: `None`, an empty string, or an
    /// empty container. Zero and `False` are not empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::None => true,
            Value::Str(s) | Value::Text(s) => s.is_empty(),
            Value::List(items) | Value::Tuple(items) | Value::Set(items) => items.is_empty(),
            Value::Dict(entries) => entries.is_empty(),
            _ => false,
        }
    }

    /// Whether the value may be a set member or dict key.
    pub fn is_hashable(&self) -> bool {
        match self {
            Value::List(_) | Value::Set(_) | Value::Dict(_) => false,
            Value::Tuple(items) => items.iter().all(Value::is_hashable),
            _ => true,
        }
    }

    /// Render as Python source, following `repr` conventions.
    pub fn to_python(&self) -> String {
        let mut out = String::new();
        self.write_python(&mut out);
        out
    }

    fn write_python(&self, out: &mut String) {
        match self {
            Value::None => out.push_str("None"),
            Value::Bool(true) => out.push_str("True"),
            Value::Bool(false) => out.push_str("False"),
            Value::Int(n) => out.push_str(&n.to_string()),
            Value::BigInt(digits) => out.push_str(digits),
            Value::Float(f) => out.push_str(&float_repr(*f)),
            Value::Str(s) | Value::Text(s) => out.push_str(&str_repr(s)),
            Value::List(items) => write_items(out, "[", items, "]"),
            Value::Tuple(items) if items.len() == 1 => {
                out.push('(');
                items[0].write_python(out);
                out.push_str(",)");
            }
            Value::Tuple(items) => write_items(out, "(", items, ")"),
            Value::Set(items) if items.is_empty() => out.push_str("set()"),
            Value::Set(items) => write_items(out, "{", items, "}"),
            Value::Dict(entries) => {
                out.push('{');
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    key.write_python(out);
                    out.push_str(": ");
                    value.write_python(out);
                }
                out.push('}');
            }
            Value::Tree(inner) => write_items(out, "Tree(", std::slice::from_ref(inner.as_ref()), ")"),
            Value::Graph(inner) => write_items(out, "Graph(", std::slice::from_ref(inner.as_ref()), ")"),
        }
    }
}

fn write_items(out: &mut String, open: &str, items: &[Value], close: &str) {
    out.push_str(open);
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        item.write_python(out);
    }
    out.push_str(close);
}

/// Python source for a float, following `repr` for finite values.
///
/// Infinities and NaN have no literal form and become `float(...)` calls.
fn float_repr(f: f64) -> String {
    if f.is_nan() {
        return "float('nan')".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "float('inf')" } else { "-float('inf')" }.to_string();
    }

    let magnitude = f.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{:e}", f);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) => {
                let exponent: i32 = exponent.parse().unwrap_or(0);
                let sign = if exponent < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", mantissa, sign, exponent.abs())
            }
            None => formatted,
        };
    }

    let formatted = f.to_string();
    if formatted.contains('.') {
        formatted
    } else {
        format!("{}.0", formatted)
    }
}

/// Python `repr` of a string.
fn str_repr(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
