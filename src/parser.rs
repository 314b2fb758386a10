// Rule tag parser
//
// Tag grammar:
//
//   tag         := token ("," token)*
//   token       := "omitempty" | "dive" | "keys" | "endkeys" | "-" | alternation
//   alternation := rule ("|" rule)*
//   rule        := name ("=" param)?
//
// Aliases are expanded on the token list before any structure is built.

use crate::errors::{Result, ValidatorError};
use crate::registry::Registry;
use crate::rules::{DiveRules, FieldRuleSet, Rule, RuleGroup, RuleToken};
use tracing::trace;

pub(crate) const DIVE: &str = "dive";
pub(crate) const KEYS: &str = "keys";
pub(crate) const END_KEYS: &str = "endkeys";
pub(crate) const OMIT_EMPTY: &str = "omitempty";
pub(crate) const SKIP: &str = "-";

/// Words with structural meaning; they can't be registered as rules or aliases.
pub(crate) const RESERVED: &[&str] = &[DIVE, KEYS, END_KEYS, OMIT_EMPTY, SKIP];

#[derive(Debug)]
struct Expanded {
    text: String,
    alias: Option<String>,
}

/// Parse `tag` into a rule set, resolving every rule name against `registry`.
///
/// `field` only feeds error messages.
pub fn parse(tag: &str, field: &str, registry: &Registry) -> Result<FieldRuleSet> {
    if tag.trim() == SKIP {
        return Ok(FieldRuleSet {
            skip: true,
            ..FieldRuleSet::default()
        });
    }

    let mut stack = Vec::new();
    let tokens = expand(tag, None, registry, &mut stack)?;
    trace!(field = %field, tag = %tag, tokens = tokens.len(), "Parsed rule tag");

    build(&tokens, tag, field, registry)
}

fn invalid(tag: &str, reason: impl Into<String>) -> ValidatorError {
    ValidatorError::InvalidTag {
        tag: tag.to_string(),
        reason: reason.into(),
    }
}

fn split(tag: &str) -> Result<Vec<&str>> {
    if tag.trim().is_empty() {
        return Ok(Vec::new());
    }

    tag.split(',')
        .map(|token| match token.trim() {
            "" => Err(invalid(tag, "empty rule")),
            token => Ok(token),
        })
        .collect()
}

fn enter(stack: &mut Vec<String>, alias: &str) -> Result<()> {
    if stack.iter().any(|seen| seen == alias) {
        let mut chain = stack.clone();
        chain.push(alias.to_string());
        return Err(ValidatorError::AliasCycle(chain.join(" -> ")));
    }
    stack.push(alias.to_string());
    Ok(())
}

fn expand(
    tag: &str,
    origin: Option<&str>,
    registry: &Registry,
    stack: &mut Vec<String>,
) -> Result<Vec<Expanded>> {
    let mut expanded = Vec::new();

    for token in split(tag)? {
        if token.contains('|') {
            let alternatives = token
                .split('|')
                .map(|alternative| expand_alternative(alternative.trim(), tag, registry, stack))
                .collect::<Result<Vec<_>>>()?;
            expanded.push(Expanded {
                text: alternatives.join("|"),
                alias: origin.map(str::to_string),
            });
        } else if let Some(rules) = registry.alias(token) {
            enter(stack, token)?;
            expanded.extend(expand(rules, Some(origin.unwrap_or(token)), registry, stack)?);
            stack.pop();
        } else {
            expanded.push(Expanded {
                text: token.to_string(),
                alias: origin.map(str::to_string),
            });
        }
    }

    Ok(expanded)
}

fn expand_alternative(
    alternative: &str,
    tag: &str,
    registry: &Registry,
    stack: &mut Vec<String>,
) -> Result<String> {
    if alternative.is_empty() {
        return Err(invalid(tag, "empty alternative"));
    }

    let Some(rules) = registry.alias(alternative) else {
        return Ok(alternative.to_string());
    };

    enter(stack, alternative)?;
    let inner = expand(rules, Some(alternative), registry, stack)?;
    stack.pop();

    match inner.as_slice() {
        [single] => Ok(single.text.clone()),
        _ => Err(invalid(
            tag,
            format!("alias '{alternative}' must expand to a single rule inside an alternation"),
        )),
    }
}

fn build(tokens: &[Expanded], tag: &str, field: &str, registry: &Registry) -> Result<FieldRuleSet> {
    let mut set = FieldRuleSet::default();

    for (index, token) in tokens.iter().enumerate() {
        match token.text.as_str() {
            OMIT_EMPTY => set.omit_empty = true,
            DIVE => {
                let dive = build_dive(&tokens[index + 1..], tag, field, registry)?;
                set.dive = Some(Box::new(dive));
                break;
            }
            KEYS | END_KEYS => {
                return Err(invalid(tag, format!("'{}' must directly follow 'dive'", token.text)));
            }
            SKIP => return Err(invalid(tag, "'-' must be the only rule")),
            _ => set.groups.push(build_group(token, tag, field, registry)?),
        }
    }

    Ok(set)
}

fn build_dive(rest: &[Expanded], tag: &str, field: &str, registry: &Registry) -> Result<DiveRules> {
    if rest.first().map(|token| token.text.as_str()) != Some(KEYS) {
        return Ok(DiveRules {
            keys: None,
            elements: build(rest, tag, field, registry)?,
        });
    }

    let end = rest
        .iter()
        .position(|token| token.text == END_KEYS)
        .ok_or_else(|| invalid(tag, "'keys' without matching 'endkeys'"))?;

    Ok(DiveRules {
        keys: Some(build(&rest[1..end], tag, field, registry)?),
        elements: build(&rest[end + 1..], tag, field, registry)?,
    })
}

fn build_group(token: &Expanded, tag: &str, field: &str, registry: &Registry) -> Result<RuleGroup> {
    let alternatives = token
        .text
        .split('|')
        .map(|alternative| {
            let (name, param) = match alternative.split_once('=') {
                Some((name, param)) => (name.trim(), Some(param.to_string())),
                None => (alternative.trim(), None),
            };

            if name.is_empty() {
                return Err(invalid(tag, "rule without a name"));
            }
            if RESERVED.contains(&name) {
                return Err(invalid(tag, format!("'{name}' cannot take a parameter or be alternated")));
            }
            if param.is_some() && registry.alias(name).is_some() {
                return Err(invalid(tag, format!("alias '{name}' does not take a parameter")));
            }

            let eval = registry
                .rule(name)
                .cloned()
                .ok_or_else(|| ValidatorError::UnknownRule {
                    rule: name.to_string(),
                    field: field.to_string(),
                })?;

            Ok(Rule {
                token: RuleToken {
                    name: name.to_string(),
                    param,
                    alias: token.alias.clone(),
                },
                eval,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RuleGroup { alternatives })
}
