// Validation engine

use crate::cache::RuleCache;
use crate::config::ValidatorConfig;
use crate::context::{FieldLevel, Parent, StructLevel, join};
use crate::errors::{Result, ValidationError, ValidationErrors, ValidatorError};
use crate::registry::Registry;
use crate::rules::{FieldRuleSet, RuleGroup};
use crate::traits::Validate;
use crate::value::{FieldValue, Value};
use tracing::{trace, warn};

/// Tag-driven validator.
///
/// Configure it once (rules, aliases, struct hooks), then share it: every
/// validation method takes `&self` and the type is `Send + Sync`.
pub struct Validator {
    registry: Registry,
    cache: RuleCache,
    config: ValidatorConfig,
}

impl Validator {
    /// Create a validator with the built-in rules and default settings
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            cache: RuleCache::default(),
            config: ValidatorConfig::default(),
        }
    }

    /// Create a validator from a configuration, registering its aliases
    pub fn with_config(config: ValidatorConfig) -> Result<Self> {
        let mut registry = Registry::new();
        for (name, rules) in &config.aliases {
            registry.register_alias(name, rules)?;
        }

        Ok(Self {
            registry,
            cache: RuleCache::default(),
            config,
        })
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Register or replace a named rule
    pub fn register_rule<F>(&mut self, name: &str, rule: F) -> Result<()>
    where
        F: Fn(&FieldLevel<'_>) -> Result<bool> + Send + Sync + 'static,
    {
        self.registry.register_rule(name, rule)?;
        self.cache.clear();
        Ok(())
    }

    /// Register an alias expanding to `rules`
    pub fn register_alias(&mut self, name: &str, rules: &str) -> Result<()> {
        self.registry.register_alias(name, rules)?;
        self.cache.clear();
        Ok(())
    }

    /// Register a hook run after all field rules of a `T` value pass
    pub fn register_struct_hook<T, F>(&mut self, hook: F)
    where
        T: Validate,
        F: Fn(&T, &mut StructLevel<'_>) + Send + Sync + 'static,
    {
        self.registry.register_struct_hook(hook);
    }

    /// Validate a standalone value against an inline rule tag.
    ///
    /// A non-container value yields at most one error.
    pub fn var<V: FieldValue + ?Sized>(&self, value: &V, rules: &str) -> Result<ValidationErrors> {
        self.run_var(value.field_value(), Parent::None, rules)
    }

    /// Validate a standalone value whose cross-field rules (`eqfield`,
    /// custom sibling lookups) compare against `other`
    pub fn var_with_value<V, O>(&self, value: &V, other: &O, rules: &str) -> Result<ValidationErrors>
    where
        V: FieldValue + ?Sized,
        O: FieldValue + ?Sized,
    {
        self.run_var(value.field_value(), Parent::Value(other.field_value()), rules)
    }

    /// Validate a struct with its declared field rules; an empty result
    /// means the value is valid
    pub fn validate<T: Validate>(&self, value: &T) -> Result<ValidationErrors> {
        let mut walker = Walker::new(self, Some(value));
        let root = Location::root(value.type_name());

        if let Err(e) = walker.walk_struct(value, &root, 0) {
            warn!(type_name = value.type_name(), error = %e, "Validation aborted");
            return Err(e);
        }

        let errors = walker.finish();
        trace!(type_name = value.type_name(), failures = errors.len(), "Struct validated");
        Ok(errors)
    }

    fn run_var(&self, value: Value<'_>, parent: Parent<'_>, rules: &str) -> Result<ValidationErrors> {
        let set = self.cache.inline_rules(rules, &self.registry)?;
        let mut walker = Walker::new(self, None);
        let slot = Slot {
            name: "",
            struct_field: "",
            location: Location::default(),
        };

        if let Err(e) = walker.walk_field(&value, &set, &parent, &slot, 0) {
            warn!(rules = %rules, error = %e, "Validation aborted");
            return Err(e);
        }

        let errors = walker.finish();
        trace!(rules = %rules, failures = errors.len(), "Value validated");
        Ok(errors)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Where a value sits: namespace is rooted at the type name, path at the
/// validated value.
#[derive(Debug, Clone, Default)]
struct Location {
    namespace: String,
    path: String,
}

impl Location {
    fn root(type_name: &str) -> Self {
        Self {
            namespace: type_name.to_string(),
            path: String::new(),
        }
    }

    fn field(&self, name: &str) -> Self {
        Self {
            namespace: join(&self.namespace, name),
            path: join(&self.path, name),
        }
    }

    fn element(&self, key: impl std::fmt::Display) -> Self {
        Self {
            namespace: format!("{}[{}]", self.namespace, key),
            path: format!("{}[{}]", self.path, key),
        }
    }
}

/// A field slot being validated: names plus location.
struct Slot<'s> {
    name: &'s str,
    struct_field: &'s str,
    location: Location,
}

impl Slot<'_> {
    /// Slot of a sequence element or map entry, reported as `name[key]`
    fn element(&self, key: impl std::fmt::Display) -> (String, Location) {
        (format!("{}[{}]", self.name, key), self.location.element(key))
    }
}

/// Depth-first traversal state of one validation call.
struct Walker<'v> {
    validator: &'v Validator,
    top: Option<&'v dyn Validate>,
    errors: Vec<ValidationError>,
}

impl<'v> Walker<'v> {
    fn new(validator: &'v Validator, top: Option<&'v dyn Validate>) -> Self {
        Self {
            validator,
            top,
            errors: Vec::new(),
        }
    }

    fn finish(self) -> ValidationErrors {
        ValidationErrors::new(self.errors)
    }

    fn check_depth(&self, depth: usize, location: &Location) -> Result<()> {
        let max = self.validator.config.max_depth;
        if depth > max {
            return Err(ValidatorError::DepthExceeded {
                max,
                path: location.namespace.clone(),
            });
        }
        Ok(())
    }

    fn walk_struct(&mut self, value: &'v dyn Validate, location: &Location, depth: usize) -> Result<()> {
        self.check_depth(depth, location)?;

        let rules = self
            .validator
            .cache
            .struct_rules(value, &self.validator.registry)?;
        let parent = Parent::Struct(value);
        let before = self.errors.len();

        for (index, (field, set)) in value.fields().iter().zip(&rules.fields).enumerate() {
            if set.is_skipped() {
                continue;
            }
            let slot = Slot {
                name: field.name,
                struct_field: field.ident,
                location: location.field(field.name),
            };
            self.walk_field(&value.field(index), set, &parent, &slot, depth)?;
        }

        if self.errors.len() > before {
            return Ok(());
        }

        if let Some(hook) = self.validator.registry.struct_hook(value.key()) {
            let mut level = StructLevel::new(
                value,
                self.top.unwrap_or(value),
                location.namespace.clone(),
                location.path.clone(),
            );
            hook(value, &mut level);
            let reported = level.into_errors();
            trace!(type_name = value.type_name(), reported = reported.len(), "Struct hook ran");
            self.errors.extend(reported);
        }
        Ok(())
    }

    fn walk_field(
        &mut self,
        value: &Value<'v>,
        set: &FieldRuleSet,
        parent: &Parent<'v>,
        slot: &Slot<'_>,
        depth: usize,
    ) -> Result<()> {
        // Absent values are zero, so omitempty skips them before `required`
        if set.omit_empty && value.is_zero() {
            return Ok(());
        }

        if value.is_absent() {
            if let Some(group) = set.groups.iter().find(|group| group.requires_presence()) {
                self.report(group, value, slot);
            }
            return Ok(());
        }

        for group in &set.groups {
            if !self.evaluate(group, value, parent, slot)? {
                self.report(group, value, slot);
                return Ok(());
            }
        }

        match (value, set.dive.as_deref()) {
            (Value::Seq(items), Some(dive)) => {
                self.check_depth(depth + 1, &slot.location)?;
                for (index, item) in items.iter().enumerate() {
                    let (name, location) = slot.element(index);
                    let element = Slot {
                        name: &name,
                        struct_field: slot.struct_field,
                        location,
                    };
                    self.walk_field(item, &dive.elements, parent, &element, depth + 1)?;
                }
            }
            (Value::Map(entries), Some(dive)) => {
                self.check_depth(depth + 1, &slot.location)?;
                for (key, item) in entries {
                    let (name, location) = slot.element(key);
                    let element = Slot {
                        name: &name,
                        struct_field: slot.struct_field,
                        location,
                    };
                    if let Some(keys) = &dive.keys {
                        self.walk_field(key, keys, parent, &element, depth + 1)?;
                    }
                    self.walk_field(item, &dive.elements, parent, &element, depth + 1)?;
                }
            }
            (other, Some(_)) => {
                return Err(ValidatorError::UnsupportedKind {
                    rule: "dive".to_string(),
                    kind: other.kind(),
                });
            }
            (Value::Struct(inner), None) => {
                self.walk_struct(*inner, &slot.location, depth + 1)?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Alternatives are tried left to right; the first success wins.
    fn evaluate(&self, group: &RuleGroup, value: &Value<'v>, parent: &Parent<'v>, slot: &Slot<'_>) -> Result<bool> {
        for rule in &group.alternatives {
            let fl = FieldLevel {
                value,
                parent,
                top: self.top,
                name: slot.name,
                path: &slot.location.path,
                rule: &rule.token.name,
                param: rule.token.param.as_deref(),
            };
            if (rule.eval)(&fl)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn report(&mut self, group: &RuleGroup, value: &Value<'_>, slot: &Slot<'_>) {
        let error = ValidationError::new(slot.location.path.clone(), group.tag())
            .with_namespace(slot.location.namespace.clone())
            .with_names(slot.name, slot.struct_field)
            .with_actual_tag(group.actual_tag())
            .with_param(group.param())
            .with_value(value.to_json());
        self.errors.push(error);
    }
}
