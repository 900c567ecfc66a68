//! # tenon-derive
//!
//! Derive macro for the tenon model mixin.
//!
//! - `#[derive(Model)]`: implement `tenon::Model`, `PartialEq`, `Debug`,
//!   `Display` and `tenon::ToValue` for a mapped struct

use proc_macro::TokenStream;

mod model;

/// Model derive macro
///
/// Container attributes: `#[model(table = "name")]`,
/// `#[model(naming = "lowercase" | "snake_case" | "verbatim")]`.
///
/// Field attributes: `#[model(primary_key)]`, `#[model(relationship)]`,
/// `#[model(skip)]`. Without an explicit key, a field named `id` is the
/// primary key.
#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    model::derive_model_impl(input)
}
