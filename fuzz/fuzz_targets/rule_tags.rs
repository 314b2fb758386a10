//! Fuzz target for rule tag parsing and evaluation.
//!
//! Arbitrary tags, aliases and values must only ever produce field failures
//! or configuration errors, never panics.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use fieldcheck::Validator;
use std::collections::HashMap;

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    /// Aliases registered before validating
    aliases: Vec<(String, String)>,
    /// Rule tag applied to every value
    tag: String,
    text: String,
    number: i64,
    items: Vec<String>,
    scores: HashMap<String, i32>,
}

fuzz_target!(|data: FuzzInput| {
    let mut validator = Validator::new();
    for (name, rules) in data.aliases.iter().take(8) {
        let _ = validator.register_alias(name, rules);
    }

    let _ = fieldcheck::parse(&data.tag, "fuzz", validator.registry());

    let _ = validator.var(&data.text, &data.tag);
    let _ = validator.var(&data.number, &data.tag);
    let _ = validator.var(&data.items, &data.tag);
    let _ = validator.var(&data.scores, &data.tag);
    let _ = validator.var_with_value(&data.text, &data.number, &data.tag);
});
