//! Rule registry - named rules, aliases and struct-level hooks

use crate::context::{FieldLevel, StructLevel};
use crate::errors::{Result, ValidatorError};
use crate::parser::RESERVED;
use crate::rules::RuleFn;
use crate::traits::Validate;
use crate::validators::BUILTIN_RULES;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Struct-level hook, type-erased. Downcasting happens inside.
pub type StructHookFn = Arc<dyn Fn(&dyn Validate, &mut StructLevel<'_>) + Send + Sync>;

/// Registry of everything a rule tag can refer to.
///
/// Mutated only through `&mut self`, so a registry shared behind `Arc` is
/// read-only.
#[derive(Clone)]
pub struct Registry {
    rules: HashMap<String, RuleFn>,
    aliases: HashMap<String, String>,
    hooks: HashMap<TypeId, StructHookFn>,
}

impl Registry {
    /// Create a registry holding the built-in rules
    pub fn new() -> Self {
        let mut registry = Self {
            rules: HashMap::new(),
            aliases: HashMap::new(),
            hooks: HashMap::new(),
        };
        registry.register_builtin_rules();
        registry
    }

    fn register_builtin_rules(&mut self) {
        for (name, rule) in BUILTIN_RULES {
            self.rules.insert((*name).to_string(), Arc::new(*rule));
        }
        debug!(count = self.rules.len(), "Registered built-in validation rules");
    }

    /// Register or replace a named rule
    pub fn register_rule<F>(&mut self, name: &str, rule: F) -> Result<()>
    where
        F: Fn(&FieldLevel<'_>) -> Result<bool> + Send + Sync + 'static,
    {
        check_name(name)?;
        debug!(rule = %name, replaced = self.rules.contains_key(name), "Registering validation rule");
        self.rules.insert(name.to_string(), Arc::new(rule));
        Ok(())
    }

    /// Register an alias expanding to `rules`. The expansion is resolved
    /// lazily, so aliases may refer to rules registered later.
    pub fn register_alias(&mut self, name: &str, rules: &str) -> Result<()> {
        check_name(name)?;
        debug!(alias = %name, rules = %rules, "Registering rule alias");
        self.aliases.insert(name.to_string(), rules.to_string());
        Ok(())
    }

    /// Register a struct-level hook for `T`, replacing any previous one
    pub fn register_struct_hook<T, F>(&mut self, hook: F)
    where
        T: Validate,
        F: Fn(&T, &mut StructLevel<'_>) + Send + Sync + 'static,
    {
        debug!(type_name = std::any::type_name::<T>(), "Registering struct-level hook");
        let erased: StructHookFn = Arc::new(move |value: &dyn Validate, level: &mut StructLevel<'_>| {
            if let Some(value) = value.downcast_ref::<T>() {
                hook(value, level);
            }
        });
        self.hooks.insert(TypeId::of::<T>(), erased);
    }

    pub fn rule(&self, name: &str) -> Option<&RuleFn> {
        self.rules.get(name)
    }

    pub fn alias(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    pub fn struct_hook(&self, type_id: TypeId) -> Option<&StructHookFn> {
        self.hooks.get(&type_id)
    }

    /// Names of all registered rules, sorted
    pub fn rule_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

fn check_name(name: &str) -> Result<()> {
    let malformed = name.is_empty()
        || name.contains(|c: char| c.is_whitespace() || matches!(c, ',' | '|' | '='));

    if malformed || RESERVED.contains(&name) {
        return Err(ValidatorError::InvalidName(name.to_string()));
    }
    Ok(())
}
