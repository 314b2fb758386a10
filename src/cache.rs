// Parsed rule cache

use crate::errors::Result;
use crate::parser;
use crate::registry::Registry;
use crate::rules::FieldRuleSet;
use crate::traits::Validate;
use dashmap::DashMap;
use std::any::TypeId;
use std::sync::Arc;
use tracing::{debug, trace};

/// Parsed rules of every field of one type, in declaration order.
#[derive(Debug)]
pub(crate) struct StructRules {
    pub(crate) fields: Vec<Arc<FieldRuleSet>>,
}

/// Rules parsed once per type and once per inline tag string.
///
/// Parsing happens outside the map's locks; when two callers race on the
/// same key the first insert wins and the loser's parse is dropped.
///
/// Entries are never evicted: the inline map grows with every distinct tag
/// passed to `var`, until the next registration clears it.
#[derive(Default)]
pub(crate) struct RuleCache {
    structs: DashMap<TypeId, Arc<StructRules>>,
    inline: DashMap<String, Arc<FieldRuleSet>>,
}

impl RuleCache {
    pub(crate) fn struct_rules(&self, value: &dyn Validate, registry: &Registry) -> Result<Arc<StructRules>> {
        let key = value.key();
        if let Some(hit) = self.structs.get(&key) {
            return Ok(Arc::clone(hit.value()));
        }

        let fields = value
            .fields()
            .iter()
            .map(|field| parser::parse(field.rules, field.name, registry).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;
        trace!(type_name = value.type_name(), fields = fields.len(), "Cached struct rules");

        let entry = self.structs.entry(key).or_insert(Arc::new(StructRules { fields }));
        Ok(Arc::clone(entry.value()))
    }

    pub(crate) fn inline_rules(&self, tag: &str, registry: &Registry) -> Result<Arc<FieldRuleSet>> {
        if let Some(hit) = self.inline.get(tag) {
            return Ok(Arc::clone(hit.value()));
        }

        let rules = Arc::new(parser::parse(tag, "", registry)?);
        trace!(tag = %tag, "Cached inline rules");

        let entry = self.inline.entry(tag.to_string()).or_insert(rules);
        Ok(Arc::clone(entry.value()))
    }

    /// Drop every entry; called whenever the registry changes
    pub(crate) fn clear(&self) {
        debug!(entries = self.len(), "Clearing rule cache");
        self.structs.clear();
        self.inline.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.structs.len() + self.inline.len()
    }
}
