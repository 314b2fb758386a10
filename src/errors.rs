// Validation errors

use crate::value::Kind;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Full path including the top-level type name, e.g. `RegisterRequest.address.street`
    pub namespace: String,

    /// Path relative to the validated value, e.g. `address.street` or `hobbies[0]`.
    ///
    /// A map key failure reports the entry path (`scores[M]`), the same as
    /// a failure of that entry's value; `value` holds the key in that case.
    pub field: String,

    /// Reported name of the failing field
    pub name: String,

    /// Rust identifier of the failing field
    pub struct_field: String,

    /// Tag as written on the field (alias name or whole alternation)
    pub tag: String,

    /// Underlying rule name
    pub actual_tag: String,

    /// Rule parameter, if any
    pub param: Option<String>,

    /// Offending value
    pub value: serde_json::Value,

    /// Error message
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error for `field` failing on `tag`
    pub fn new(field: impl Into<String>, tag: impl Into<String>) -> Self {
        let field = field.into();
        let tag = tag.into();
        let name = leaf_name(&field).to_string();
        Self {
            namespace: field.clone(),
            message: failure_message(&name, &tag),
            struct_field: name.clone(),
            actual_tag: tag.clone(),
            field,
            name,
            tag,
            param: None,
            value: serde_json::Value::Null,
        }
    }

    /// Set the namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the reported and structural field names
    pub fn with_names(mut self, name: impl Into<String>, struct_field: impl Into<String>) -> Self {
        self.name = name.into();
        self.struct_field = struct_field.into();
        self.message = failure_message(&self.name, &self.tag);
        self
    }

    /// Set the underlying rule name
    pub fn with_actual_tag(mut self, actual_tag: impl Into<String>) -> Self {
        self.actual_tag = actual_tag.into();
        self
    }

    /// Set the rule parameter
    pub fn with_param(mut self, param: Option<String>) -> Self {
        self.param = param.filter(|p| !p.is_empty());
        self
    }

    /// Set the invalid value
    pub fn with_value(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.value = value.into();
        self
    }
}

fn leaf_name(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

fn failure_message(name: &str, tag: &str) -> String {
    format!("Field validation for '{}' failed on the '{}' tag", name, tag)
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "Key: '{}' Error:{}", self.namespace, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// Ordered collection of validation errors; empty means the value is valid
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Create a new validation errors collection
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Add an error
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// First error in traversal order
    pub fn first(&self) -> Option<&ValidationError> {
        self.errors.first()
    }

    /// Iterate over the errors in traversal order
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    /// Get errors for a specific field path
    pub fn get_field_errors(&self, field: &str) -> Vec<&ValidationError> {
        self.errors.iter().filter(|e| e.field == field).collect()
    }

    /// `Ok(())` when empty, otherwise `Err(self)`
    pub fn into_result(self) -> std::result::Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Convert to JSON representation
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "errors": self.errors.iter().map(|e| {
                serde_json::json!({
                    "namespace": e.namespace,
                    "field": e.field,
                    "tag": e.tag,
                    "actual_tag": e.actual_tag,
                    "param": e.param,
                    "value": e.value,
                    "message": e.message,
                })
            }).collect::<Vec<_>>()
        })
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::new(errors)
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Configuration errors. Any of these aborts the whole validation call.
#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("undefined validation rule '{rule}' on field '{field}'")]
    UnknownRule { rule: String, field: String },

    #[error("alias cycle detected: {0}")]
    AliasCycle(String),

    #[error("invalid rule tag '{tag}': {reason}")]
    InvalidTag { tag: String, reason: String },

    #[error("invalid parameter '{param}' for rule '{rule}': {reason}")]
    InvalidParam {
        rule: String,
        param: String,
        reason: String,
    },

    #[error("rule '{rule}' cannot be applied to a value of kind {kind}")]
    UnsupportedKind { rule: String, kind: Kind },

    #[error("maximum nesting depth of {max} exceeded at '{path}'")]
    DepthExceeded { max: usize, path: String },

    #[error("invalid registration name '{0}'")]
    InvalidName(String),

    #[error("rule '{rule}' failed: {message}")]
    Rule { rule: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl ValidatorError {
    /// Error a custom rule can return to abort validation with a message
    pub fn rule(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rule {
            rule: rule.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ValidatorError>;
