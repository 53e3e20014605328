//! Model derive macro implementation

use crate::attrs::{column_name, field_attr, named_fields, table_name};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let table = table_name(&input)?;
    if table.trim().is_empty() {
        return Err(syn::Error::new_spanned(&input, "table name must not be empty"));
    }

    let mut primary_key: Option<String> = None;
    for field in named_fields(&input, "Model")? {
        let attr = field_attr(field)?;
        if !attr.is_id {
            continue;
        }
        if primary_key.is_some() {
            return Err(syn::Error::new_spanned(
                field,
                "only one field can be marked #[orm(id)]",
            ));
        }
        primary_key = Some(column_name(field, &attr)?);
    }

    let primary_key = match primary_key {
        Some(pk) => quote! { const PRIMARY_KEY: &'static str = #pk; },
        None => quote! {},
    };

    Ok(quote! {
        impl #impl_generics dupkey::Model for #name #ty_generics #where_clause {
            const TABLE: &'static str = #table;
            #primary_key
        }
    })
}
