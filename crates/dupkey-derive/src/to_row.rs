//! ToRow derive macro implementation

use crate::attrs::{column_name, field_attr, named_fields};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut setters = Vec::new();
    for field in named_fields(&input, "ToRow")? {
        let attr = field_attr(field)?;
        if attr.skip {
            continue;
        }
        let column = column_name(field, &attr)?;
        let ident = field.ident.as_ref();
        setters.push(quote! {
            row.insert(#column, ::std::clone::Clone::clone(&self.#ident));
        });
    }

    if setters.is_empty() {
        return Err(syn::Error::new_spanned(
            &input,
            "ToRow needs at least one non-skipped field",
        ));
    }

    Ok(quote! {
        impl #impl_generics dupkey::ToRow for #name #ty_generics #where_clause {
            fn to_row(&self) -> dupkey::Row {
                let mut row = dupkey::Row::new();
                #(#setters)*
                row
            }
        }
    })
}
