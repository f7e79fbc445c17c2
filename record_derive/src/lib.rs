//! Procedural macros for generating procedure field/column descriptors
//!
//! This crate provides the `Record` derive, which generates the input binding,
//! output materialization and type descriptor of a model struct at compile time.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod generation;
mod parsing;

use generation::{generate_proc_input_impl, generate_proc_output_impl, generate_record_impl};
use parsing::{parse_field_attributes, parse_record_attributes};

/// Derive macro for the `Record` trait
///
/// Every named field becomes one parameter/column. Columns are named after
/// the field unless renamed:
///
/// ```rust,ignore
/// use proc_access::Record;
///
/// #[derive(Debug, Clone, Default, Record)]
/// #[record(name = "Customer", rename_all = "PascalCase")]
/// pub struct CustomerRow {
///     pub first_name: String,
///
///     #[column(name = "EMail")]
///     pub email: Option<String>,
///
///     #[column(skip)]
///     pub cached_score: f64,
/// }
/// ```
///
/// `#[record]` keys: `name` (type context handed to name resolvers, defaults
/// to the struct name) and `rename_all` (`PascalCase`, `camelCase`,
/// `snake_case` or `SCREAMING_SNAKE_CASE`). `#[column]` keys: `name` and
/// `skip`; skipped fields are never bound and are filled with
/// `Default::default()` when a row is read.
#[proc_macro_derive(Record, attributes(record, column))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;

    // Parse record attributes - handle errors properly
    let record_info = match parse_record_attributes(name, &input.attrs) {
        Ok(attrs) => attrs,
        Err(e) => return e.to_compile_error().into(),
    };

    // Parse field attributes - handle errors properly
    let field_info = match parse_field_attributes(&input.data, &record_info) {
        Ok(info) => info,
        Err(e) => return e.to_compile_error().into(),
    };

    let proc_input_impl = generate_proc_input_impl(&input, &field_info);
    let proc_output_impl = generate_proc_output_impl(&input, &field_info);
    let record_impl = generate_record_impl(&input, &record_info, &field_info);

    let expanded = quote::quote! {
        #proc_input_impl
        #proc_output_impl
        #record_impl
    };

    TokenStream::from(expanded)
}
