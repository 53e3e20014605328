//! Attribute parsing shared by the derives.
//!
//! Handles struct-level `#[orm(table = "...")]` and field-level
//! `#[orm(id, column = "...", skip)]`.

use syn::{DeriveInput, Result};

/// Parsed field-level `#[orm(...)]` attribute.
#[derive(Default)]
pub(crate) struct FieldAttr {
    pub is_id: bool,
    pub skip: bool,
    pub column: Option<String>,
}

impl syn::parse::Parse for FieldAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();

        while !input.is_empty() {
            let ident: syn::Ident = input.parse()?;
            if ident == "id" {
                attr.is_id = true;
            } else if ident == "skip" {
                attr.skip = true;
            } else if ident == "column" {
                let _: syn::Token![=] = input.parse()?;
                let value: syn::LitStr = input.parse()?;
                attr.column = Some(value.value());
            } else {
                return Err(syn::Error::new(
                    ident.span(),
                    format!("unknown orm field attribute `{ident}`"),
                ));
            }

            if input.peek(syn::Token![,]) {
                let _: syn::Token![,] = input.parse()?;
            } else {
                break;
            }
        }

        Ok(attr)
    }
}

/// Merge every `#[orm(...)]` on a field into one [`FieldAttr`].
pub(crate) fn field_attr(field: &syn::Field) -> Result<FieldAttr> {
    let mut out = FieldAttr::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        let parsed: FieldAttr = attr.parse_args()?;
        out.is_id |= parsed.is_id;
        out.skip |= parsed.skip;
        if parsed.column.is_some() {
            out.column = parsed.column;
        }
    }
    Ok(out)
}

/// Column name for a field: `#[orm(column = "...")]` or the field name.
pub(crate) fn column_name(field: &syn::Field, attr: &FieldAttr) -> Result<String> {
    if let Some(column) = &attr.column {
        return Ok(column.clone());
    }
    field
        .ident
        .as_ref()
        .map(|ident| ident.to_string().trim_start_matches("r#").to_string())
        .ok_or_else(|| {
            syn::Error::new_spanned(field, "tuple struct fields need #[orm(column = \"...\")]")
        })
}

/// Extract table name from struct-level `#[orm(table = "...")]` attribute.
pub(crate) fn table_name(input: &DeriveInput) -> Result<String> {
    for attr in &input.attrs {
        if attr.path().is_ident("orm") {
            if let Ok(nested) = attr.parse_args::<syn::MetaNameValue>() {
                if nested.path.is_ident("table") {
                    if let syn::Expr::Lit(syn::ExprLit {
                        lit: syn::Lit::Str(lit),
                        ..
                    }) = &nested.value
                    {
                        return Ok(lit.value());
                    }
                }
            }
        }
    }
    Err(syn::Error::new_spanned(
        input,
        "Model requires #[orm(table = \"table_name\")] attribute",
    ))
}

/// Named fields of a struct, or an error for enums/unions/tuple structs.
pub(crate) fn named_fields<'a>(
    input: &'a DeriveInput,
    derive: &str,
) -> Result<&'a syn::punctuated::Punctuated<syn::Field, syn::Token![,]>> {
    match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            syn::Fields::Named(fields) => Ok(&fields.named),
            _ => Err(syn::Error::new_spanned(
                input,
                format!("{derive} only supports structs with named fields"),
            )),
        },
        _ => Err(syn::Error::new_spanned(
            input,
            format!("{derive} can only be derived for structs"),
        )),
    }
}
