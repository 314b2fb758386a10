//! Derive macro for `fieldcheck`
//!
//! `#[derive(Validate)]` generates the field table and field accessors the
//! validation engine walks. Rules are attached per field:
//!
//! ```ignore
//! #[derive(Validate)]
//! struct RegisterRequest {
//!     #[validate("required,email")]
//!     username: String,
//!
//!     #[validate(rules = "required,min=8", rename = "Password")]
//!     password: String,
//!
//!     #[validate("eqfield=password")]
//!     confirm: String,
//!
//!     #[validate(skip)]
//!     session: Session,
//! }
//! ```
//!
//! Fields without an attribute carry no rules but stay visible to
//! cross-field rules. Nested structs that derive `Validate` are walked
//! recursively.

use proc_macro::TokenStream;

mod validate;

/// Derive `fieldcheck::Validate` and `fieldcheck::FieldValue`
#[proc_macro_derive(Validate, attributes(validate))]
pub fn derive_validate(input: TokenStream) -> TokenStream {
    validate::derive_validate_impl(input)
}
