//! Template engine for rendering the prompt
//!
//! A small subset of Go's `text/template` syntax, enough to loop over the
//! file list and conditionally emit sections:
//!
//! - `{{.Field}}`, `{{.Nested.Field}}` and `{{.}}` interpolate values
//! - `{{if .X}}...{{else if .Y}}...{{else}}...{{end}}`
//! - `{{range .List}}...{{else}}...{{end}}`, with the dot set to each element
//! - `{{/* comments */}}` and `{{-` / `-}}` whitespace trimming

mod parser;

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use parser::{FieldPath, Node};

/// Errors raised while compiling or executing a template
#[derive(Error, Debug)]
pub enum TemplateError {
    /// The template source could not be parsed
    #[error("template {name}:{line}: {message}")]
    Parse {
        name: String,
        line: usize,
        message: String,
    },

    /// Evaluation failed against the supplied data
    #[error("template {name}: {message}")]
    Exec { name: String, message: String },
}

/// Data a template is executed against
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Build a map value from field name/value pairs
    pub fn map<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Map(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Go-style truthiness: zero values and empty collections are false
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Map(fields) => !fields.is_empty(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Map(fields) => {
                f.write_str("map[")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}:{}", key, value)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Option<String>> for Value {
    fn from(s: Option<String>) -> Self {
        Value::Str(s.unwrap_or_default())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Int(n as i64)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// A compiled template
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    nodes: Vec<Node>,
}

impl Template {
    /// Parse template source, failing on any syntax error
    pub fn compile(name: &str, source: &str) -> Result<Self, TemplateError> {
        Ok(Self {
            name: name.to_string(),
            nodes: parser::parse(name, source)?,
        })
    }

    /// Execute the template against `data`
    pub fn render(&self, data: &Value) -> Result<String, TemplateError> {
        let mut out = String::new();
        self.render_nodes(&self.nodes, data, &mut out)?;
        Ok(out)
    }

    fn render_nodes(&self, nodes: &[Node], dot: &Value, out: &mut String) -> Result<(), TemplateError> {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Output(path) => {
                    let value = self.resolve(path, dot)?;
                    out.push_str(&value.to_string());
                }
                Node::If {
                    branches,
                    otherwise,
                } => {
                    let mut taken = None;
                    for (condition, body) in branches {
                        if self.resolve(condition, dot)?.is_truthy() {
                            taken = Some(body);
                            break;
                        }
                    }
                    self.render_nodes(taken.unwrap_or(otherwise), dot, out)?;
                }
                Node::Range {
                    over,
                    body,
                    otherwise,
                } => match self.resolve(over, dot)? {
                    Value::List(items) if !items.is_empty() => {
                        for item in items {
                            self.render_nodes(body, item, out)?;
                        }
                    }
                    Value::List(_) | Value::Nil => self.render_nodes(otherwise, dot, out)?,
                    other => {
                        return Err(self.exec_error(format!(
                            "range can't iterate over {} ({})",
                            over,
                            other.kind()
                        )))
                    }
                },
            }
        }
        Ok(())
    }

    fn resolve<'v>(&self, path: &FieldPath, dot: &'v Value) -> Result<&'v Value, TemplateError> {
        let mut current = dot;
        for segment in &path.0 {
            current = match current {
                Value::Map(fields) => fields.get(segment).ok_or_else(|| {
                    self.exec_error(format!("can't evaluate field {} in {}", segment, path))
                })?,
                other => {
                    return Err(self.exec_error(format!(
                        "can't evaluate field {} in type {}",
                        segment,
                        other.kind()
                    )))
                }
            };
        }
        Ok(current)
    }

    fn exec_error(&self, message: String) -> TemplateError {
        TemplateError::Exec {
            name: self.name.clone(),
            message,
        }
    }
}
