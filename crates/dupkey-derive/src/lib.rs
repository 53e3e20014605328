//! Derive macros for dupkey
//!
//! Provides `#[derive(Model)]` and `#[derive(ToRow)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod model;
mod to_row;

/// Derive `Model` metadata for a struct.
///
/// # Example
///
/// ```ignore
/// use dupkey::Model;
///
/// #[derive(Model)]
/// #[orm(table = "users")]
/// struct User {
///     #[orm(id)]
///     uuid: String,
///     email: String,
/// }
/// ```
///
/// # Generated
///
/// - `impl dupkey::Model` with `TABLE` and `PRIMARY_KEY`
///
/// # Attributes
///
/// - `#[orm(table = "name")]` - Specify table name (required)
/// - `#[orm(id)]` - Mark field as primary key (defaults to `id`)
/// - `#[orm(column = "name")]` - Map field to different column name
#[proc_macro_derive(Model, attributes(orm))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    model::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `ToRow` for a struct.
///
/// Fields become columns in declaration order.
///
/// # Attributes
///
/// - `#[orm(column = "name")]` - Map field to a different column name
/// - `#[orm(skip)]` - Leave the field out of the row
#[proc_macro_derive(ToRow, attributes(orm))]
pub fn derive_to_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    to_row::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
