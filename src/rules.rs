// Parsed rule model

use crate::context::FieldLevel;
use crate::errors::Result;
use std::fmt;
use std::sync::Arc;

/// Evaluator behind a rule name. `Ok(false)` is a field failure, `Err` aborts
/// the validation call.
pub type RuleFn = Arc<dyn Fn(&FieldLevel<'_>) -> Result<bool> + Send + Sync>;

/// One rule invocation as written in a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleToken {
    pub name: String,
    pub param: Option<String>,
    /// Alias the token was expanded from, if any
    pub alias: Option<String>,
}

impl RuleToken {
    pub fn new(name: impl Into<String>, param: Option<String>) -> Self {
        Self {
            name: name.into(),
            param,
            alias: None,
        }
    }

    /// Tag as the user wrote it on the field
    pub fn tag(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

impl fmt::Display for RuleToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            Some(param) => write!(f, "{}={}", self.name, param),
            None => f.write_str(&self.name),
        }
    }
}

/// A resolved rule: token plus its evaluator.
#[derive(Clone)]
pub struct Rule {
    pub(crate) token: RuleToken,
    pub(crate) eval: RuleFn,
}

impl Rule {
    pub fn token(&self) -> &RuleToken {
        &self.token
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("token", &self.token).finish()
    }
}

/// Alternatives joined by `|`; passes when any alternative passes.
#[derive(Debug, Clone, Default)]
pub struct RuleGroup {
    pub(crate) alternatives: Vec<Rule>,
}

impl RuleGroup {
    pub fn tokens(&self) -> impl Iterator<Item = &RuleToken> {
        self.alternatives.iter().map(Rule::token)
    }

    pub fn is_alternation(&self) -> bool {
        self.alternatives.len() > 1
    }

    /// Reported tag: the alias or rule name for a single rule, the whole
    /// alternation text otherwise.
    pub(crate) fn tag(&self) -> String {
        match self.alternatives.as_slice() {
            [single] => single.token.tag().to_string(),
            _ => self.joined(),
        }
    }

    pub(crate) fn actual_tag(&self) -> String {
        match self.alternatives.as_slice() {
            [single] => single.token.name.clone(),
            _ => self.joined(),
        }
    }

    pub(crate) fn param(&self) -> Option<String> {
        match self.alternatives.as_slice() {
            [single] => single.token.param.clone(),
            _ => None,
        }
    }

    /// Whether the group can fail on an absent value
    pub(crate) fn requires_presence(&self) -> bool {
        self.tokens().any(|token| token.name == "required")
    }

    fn joined(&self) -> String {
        self.tokens()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// Parsed rules of one field.
#[derive(Debug, Clone, Default)]
pub struct FieldRuleSet {
    pub(crate) skip: bool,
    pub(crate) omit_empty: bool,
    pub(crate) groups: Vec<RuleGroup>,
    pub(crate) dive: Option<Box<DiveRules>>,
}

impl FieldRuleSet {
    /// Field excluded with `-`
    pub fn is_skipped(&self) -> bool {
        self.skip
    }

    pub fn omits_empty(&self) -> bool {
        self.omit_empty
    }

    /// AND-groups applied to the value itself
    pub fn groups(&self) -> &[RuleGroup] {
        &self.groups
    }

    pub fn dive(&self) -> Option<&DiveRules> {
        self.dive.as_deref()
    }
}

/// Rules applied inside a sequence or map after `dive`.
#[derive(Debug, Clone, Default)]
pub struct DiveRules {
    pub(crate) keys: Option<FieldRuleSet>,
    pub(crate) elements: FieldRuleSet,
}

impl DiveRules {
    /// Rules between `keys` and `endkeys`
    pub fn keys(&self) -> Option<&FieldRuleSet> {
        self.keys.as_ref()
    }

    /// Rules for each sequence element or map value
    pub fn elements(&self) -> &FieldRuleSet {
        &self.elements
    }
}
