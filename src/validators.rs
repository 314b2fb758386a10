// Built-in validators

use crate::context::FieldLevel;
use crate::errors::{Result, ValidatorError};
use crate::value::Value;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

// Common regex patterns
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$").unwrap()
});

static URL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").unwrap());

static UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$").unwrap()
});

static ALPHA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]+$").unwrap());

static ALPHANUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap());

static NUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// Name and evaluator of every built-in rule.
pub(crate) const BUILTIN_RULES: &[(&str, fn(&FieldLevel<'_>) -> Result<bool>)] = &[
    ("required", required),
    ("min", min),
    ("max", max),
    ("len", len),
    ("eq", eq),
    ("ne", ne),
    ("gt", gt),
    ("gte", gte),
    ("lt", lt),
    ("lte", lte),
    ("numeric", numeric),
    ("number", numeric),
    ("alpha", alpha),
    ("alphanum", alphanum),
    ("email", email),
    ("url", url),
    ("uuid", uuid),
    ("oneof", one_of),
    ("eqfield", eq_field),
    ("nefield", ne_field),
];

fn unsupported(fl: &FieldLevel<'_>) -> ValidatorError {
    ValidatorError::UnsupportedKind {
        rule: fl.rule().to_string(),
        kind: fl.field().kind(),
    }
}

/// Text of a string field; other kinds fail string rules without aborting
fn text<'a>(fl: &FieldLevel<'a>) -> Option<&'a str> {
    fl.field().as_str()
}

fn matches_regex(fl: &FieldLevel<'_>, regex: &Regex) -> Result<bool> {
    Ok(text(fl).is_some_and(|s| regex.is_match(s)))
}

/// Compare the field against the numeric parameter.
///
/// Integers compare exactly against an integer parameter; floats, lengths
/// and fractional parameters compare as `f64`.
fn measured(fl: &FieldLevel<'_>, accept: fn(Ordering) -> bool) -> Result<bool> {
    let exact = match fl.field() {
        Value::Int(n) => Some(i128::from(*n)),
        Value::Uint(n) => Some(i128::from(*n)),
        _ => None,
    };
    if let (Some(actual), Ok(limit)) = (exact, fl.param().trim().parse::<i128>()) {
        return Ok(accept(actual.cmp(&limit)));
    }

    let limit: f64 = fl.param_as()?;
    let actual = fl.field().measure().ok_or_else(|| unsupported(fl))?;
    Ok(actual.partial_cmp(&limit).is_some_and(accept))
}

// String and presence validators

/// Fails on the zero value of the field's kind
pub fn required(fl: &FieldLevel<'_>) -> Result<bool> {
    Ok(!fl.field().is_zero())
}

/// ASCII digits only; any numeric kind passes
pub fn numeric(fl: &FieldLevel<'_>) -> Result<bool> {
    if fl.field().is_numeric() {
        return Ok(true);
    }
    matches_regex(fl, &NUMERIC_REGEX)
}

pub fn alpha(fl: &FieldLevel<'_>) -> Result<bool> {
    matches_regex(fl, &ALPHA_REGEX)
}

pub fn alphanum(fl: &FieldLevel<'_>) -> Result<bool> {
    matches_regex(fl, &ALPHANUMERIC_REGEX)
}

pub fn email(fl: &FieldLevel<'_>) -> Result<bool> {
    matches_regex(fl, &EMAIL_REGEX)
}

pub fn url(fl: &FieldLevel<'_>) -> Result<bool> {
    matches_regex(fl, &URL_REGEX)
}

pub fn uuid(fl: &FieldLevel<'_>) -> Result<bool> {
    matches_regex(fl, &UUID_REGEX)
}

/// Value is one of the space separated words of the parameter
pub fn one_of(fl: &FieldLevel<'_>) -> Result<bool> {
    let candidate = match fl.field() {
        Value::Str(_) | Value::Int(_) | Value::Uint(_) => fl.field().to_string(),
        _ => return Err(unsupported(fl)),
    };
    Ok(fl.param().split_whitespace().any(|word| word == candidate))
}

// Bound validators: length for strings and containers, value for numbers

pub fn min(fl: &FieldLevel<'_>) -> Result<bool> {
    measured(fl, Ordering::is_ge)
}

pub fn max(fl: &FieldLevel<'_>) -> Result<bool> {
    measured(fl, Ordering::is_le)
}

pub fn len(fl: &FieldLevel<'_>) -> Result<bool> {
    measured(fl, Ordering::is_eq)
}

pub fn gt(fl: &FieldLevel<'_>) -> Result<bool> {
    measured(fl, Ordering::is_gt)
}

pub fn gte(fl: &FieldLevel<'_>) -> Result<bool> {
    measured(fl, Ordering::is_ge)
}

pub fn lt(fl: &FieldLevel<'_>) -> Result<bool> {
    measured(fl, Ordering::is_lt)
}

pub fn lte(fl: &FieldLevel<'_>) -> Result<bool> {
    measured(fl, Ordering::is_le)
}

// Equality validators

/// Strings compare against the parameter text, bools against its parsed
/// value, everything else like `len`
pub fn eq(fl: &FieldLevel<'_>) -> Result<bool> {
    match fl.field() {
        Value::Str(s) => Ok(*s == fl.param()),
        Value::Bool(b) => Ok(*b == fl.param_as::<bool>()?),
        _ => measured(fl, Ordering::is_eq),
    }
}

pub fn ne(fl: &FieldLevel<'_>) -> Result<bool> {
    eq(fl).map(|equal| !equal)
}

/// Equal to the sibling named by the parameter; a missing sibling fails
pub fn eq_field(fl: &FieldLevel<'_>) -> Result<bool> {
    Ok(fl
        .param_field()
        .is_some_and(|sibling| sibling.value == *fl.field()))
}

/// Differs from the sibling named by the parameter; a missing sibling passes
pub fn ne_field(fl: &FieldLevel<'_>) -> Result<bool> {
    Ok(fl
        .param_field()
        .is_none_or(|sibling| sibling.value != *fl.field()))
}
