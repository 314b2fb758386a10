//! Tag-driven validation for structs and standalone values
//!
//! Rules are written as compact tag strings (`"required,min=5,max=10"`) and
//! attached to struct fields with `#[derive(Validate)]` or passed inline to
//! [`Validator::var`]. Commas separate rules that must all pass, `|` separates
//! alternatives, `dive` applies the remaining rules to every element of a
//! sequence or map and `keys ... endkeys` validates map keys.
//!
//! # Examples
//!
//! ## Struct Validation
//!
//! ```
//! use fieldcheck::{Validate, Validator};
//!
//! #[derive(Validate)]
//! struct Address {
//!     #[validate("required,alphanum")]
//!     city: String,
//! }
//!
//! #[derive(Validate)]
//! struct RegisterRequest {
//!     #[validate("required,email")]
//!     username: String,
//!     #[validate("required,min=5")]
//!     password: String,
//!     #[validate("eqfield=password")]
//!     confirm: String,
//!     address: Address,
//! }
//!
//! let validator = Validator::new();
//! let request = RegisterRequest {
//!     username: "andi@mail.com".to_string(),
//!     password: "secret".to_string(),
//!     confirm: "secret".to_string(),
//!     address: Address { city: "Bandung!".to_string() },
//! };
//!
//! let errors = validator.validate(&request).unwrap();
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors.errors[0].namespace, "RegisterRequest.address.city");
//! assert_eq!(errors.errors[0].tag, "alphanum");
//! ```
//!
//! ## Value Validation
//!
//! ```
//! use fieldcheck::Validator;
//!
//! let validator = Validator::new();
//! assert!(validator.var("0815900141", "required,numeric,min=5,max=10").unwrap().is_empty());
//!
//! let hobbies = vec!["Coding", ""];
//! let errors = validator.var(&hobbies, "required,dive,required").unwrap();
//! assert_eq!(errors.errors[0].field, "[1]");
//! ```
//!
//! ## Custom Rules and Aliases
//!
//! ```
//! use fieldcheck::{FieldLevel, Validator};
//!
//! let mut validator = Validator::new();
//! validator
//!     .register_rule("username", |fl: &FieldLevel<'_>| {
//!         Ok(fl.field().as_str().is_some_and(|s| s.len() >= 5 && s == s.to_lowercase()))
//!     })
//!     .unwrap();
//! validator.register_alias("varchar", "required,max=255").unwrap();
//!
//! assert!(validator.var("andisoraya", "username").unwrap().is_empty());
//!
//! let errors = validator.var("", "varchar").unwrap();
//! assert_eq!(errors.errors[0].tag, "varchar");
//! assert_eq!(errors.errors[0].actual_tag, "required");
//! ```
//!
//! Configuration mistakes (unknown rules, malformed tags, bad parameters)
//! surface as [`ValidatorError`] rather than as field failures.

extern crate self as fieldcheck;

mod cache;
mod config;
mod context;
mod errors;
mod parser;
mod registry;
mod rules;
mod traits;
mod validator;
mod validators;
mod value;

pub use config::*;
pub use context::{FieldLevel, Sibling, StructLevel};
pub use errors::*;
pub use parser::parse;
pub use registry::*;
pub use rules::*;
pub use traits::*;
pub use validator::Validator;
pub use validators::*;
pub use value::*;

// Re-export the derive macro
pub use fieldcheck_derive::Validate;
