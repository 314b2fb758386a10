// Field- and struct-level evaluation contexts

use crate::errors::{Result, ValidationError, ValidatorError};
use crate::traits::Validate;
use crate::value::Value;
use std::fmt::Display;
use std::str::FromStr;

/// What a field's siblings are resolved against.
#[derive(Clone)]
pub(crate) enum Parent<'a> {
    /// Standalone value with nothing to compare against
    None,
    /// Field of a struct
    Struct(&'a dyn Validate),
    /// Standalone value paired with a second value
    Value(Value<'a>),
}

/// A sibling field resolved for a cross-field rule.
#[derive(Debug, Clone)]
pub struct Sibling<'a> {
    /// Reported name of the sibling field, empty for a paired value
    pub name: &'static str,
    /// Rule tag declared on the sibling field
    pub rules: &'static str,
    pub value: Value<'a>,
}

/// Everything a rule can see while it runs.
pub struct FieldLevel<'a> {
    pub(crate) value: &'a Value<'a>,
    pub(crate) parent: &'a Parent<'a>,
    pub(crate) top: Option<&'a dyn Validate>,
    pub(crate) name: &'a str,
    pub(crate) path: &'a str,
    pub(crate) rule: &'a str,
    pub(crate) param: Option<&'a str>,
}

impl<'a> FieldLevel<'a> {
    /// Value being validated
    pub fn field(&self) -> &Value<'a> {
        self.value
    }

    /// Reported name of the field, e.g. `hobbies[0]`
    pub fn field_name(&self) -> &str {
        self.name
    }

    /// Path of the field relative to the validated value
    pub fn path(&self) -> &str {
        self.path
    }

    /// Name of the rule being evaluated
    pub fn rule(&self) -> &str {
        self.rule
    }

    /// Rule parameter, empty when none was given
    pub fn param(&self) -> &str {
        self.param.unwrap_or_default()
    }

    /// Parse the rule parameter. A missing or malformed parameter is a
    /// configuration error, not a field failure.
    pub fn param_as<T>(&self) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let param = self.param.ok_or_else(|| ValidatorError::InvalidParam {
            rule: self.rule.to_string(),
            param: String::new(),
            reason: "parameter required".to_string(),
        })?;

        param.trim().parse().map_err(|e: T::Err| ValidatorError::InvalidParam {
            rule: self.rule.to_string(),
            param: param.to_string(),
            reason: e.to_string(),
        })
    }

    /// Struct holding the field, if any
    pub fn parent(&self) -> Option<&'a dyn Validate> {
        match self.parent {
            Parent::Struct(parent) => Some(*parent),
            _ => None,
        }
    }

    /// Top-level struct passed to the validator, if any
    pub fn top(&self) -> Option<&'a dyn Validate> {
        self.top
    }

    /// Resolve a sibling field by name or Rust identifier.
    ///
    /// For a paired standalone value the paired value is returned whatever
    /// the name.
    pub fn sibling(&self, name: &str) -> Option<Sibling<'a>> {
        match self.parent {
            Parent::None => None,
            Parent::Struct(parent) => {
                let parent: &'a dyn Validate = *parent;
                parent.lookup(name).map(|(field, value)| Sibling {
                    name: field.name,
                    rules: field.rules,
                    value,
                })
            }
            Parent::Value(value) => Some(Sibling {
                name: "",
                rules: "",
                value: value.clone(),
            }),
        }
    }

    /// Sibling named by the rule parameter
    pub fn param_field(&self) -> Option<Sibling<'a>> {
        self.sibling(self.param())
    }
}

/// Handle passed to struct-level hooks.
pub struct StructLevel<'a> {
    current: &'a dyn Validate,
    top: &'a dyn Validate,
    namespace: String,
    path: String,
    errors: Vec<ValidationError>,
}

impl<'a> StructLevel<'a> {
    pub(crate) fn new(
        current: &'a dyn Validate,
        top: &'a dyn Validate,
        namespace: String,
        path: String,
    ) -> Self {
        Self {
            current,
            top,
            namespace,
            path,
            errors: Vec::new(),
        }
    }

    /// Struct being validated
    pub fn current(&self) -> &'a dyn Validate {
        self.current
    }

    /// Top-level struct of this validation call
    pub fn top(&self) -> &'a dyn Validate {
        self.top
    }

    /// Report a failure against a field of the current struct.
    ///
    /// `field` is the reported name, `struct_field` the field whose value is
    /// recorded as the offending value. An empty `param` means none.
    pub fn report_error(&mut self, field: &str, struct_field: &str, tag: &str, param: &str) {
        let value = self
            .current
            .lookup(struct_field)
            .map(|(_, value)| value.to_json())
            .unwrap_or(serde_json::Value::Null);

        let error = ValidationError::new(join(&self.path, field), tag)
            .with_namespace(join(&self.namespace, field))
            .with_names(field, struct_field)
            .with_param(Some(param.to_string()))
            .with_value(value);
        self.errors.push(error);
    }

    pub(crate) fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

pub(crate) fn join(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", base, name)
    }
}
