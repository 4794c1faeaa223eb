// Copyright 2026 The pall Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Field, Fields, Result};

/// Helper function to derive Element.
///
/// The generated implementation compares and hashes the single field marked with `#[key]`:
///
/// ```ignore
/// impl ::pall::Element for Item {
///     fn compare(&self, other: &Self) -> ::core::cmp::Ordering {
///         ::core::cmp::Ord::cmp(&self.id, &other.id)
///     }
///
///     fn hash(&self) -> u32 {
///         ::pall::KeyHash::key_hash(&self.id)
///     }
/// }
/// ```
pub(crate) fn derive_element_trait(input: DeriveInput) -> Result<TokenStream> {
    let s = match &input.data {
        Data::Struct(s) => s,
        _ => {
            return Err(Error::new_spanned(
                input,
                "Element can only be derived for structs",
            ))
        }
    };

    let f = match &s.fields {
        Fields::Named(f) => f,
        _ => {
            return Err(Error::new_spanned(
                input,
                "Element can only be derived for structs with named fields",
            ))
        }
    };

    let mut key_fields = Vec::new();
    for field in &f.named {
        if is_key_field(field)? {
            key_fields.push(field);
        }
    }

    let key_field = match key_fields.as_slice() {
        [key_field] => key_field,
        [] => {
            return Err(Error::new_spanned(
                input,
                "Found no field with a #[key] attribute",
            ))
        }
        [_, second, ..] => {
            return Err(Error::new_spanned(
                second,
                "Only a single field may have a #[key] attribute",
            ))
        }
    };

    let ident = &input.ident;
    let key_ident = &key_field.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::pall::Element for #ident #ty_generics #where_clause {
            fn compare(&self, other: &Self) -> ::core::cmp::Ordering {
                ::core::cmp::Ord::cmp(&self.#key_ident, &other.#key_ident)
            }

            fn hash(&self) -> u32 {
                ::pall::KeyHash::key_hash(&self.#key_ident)
            }
        }
    })
}

/// Returns whether a bare `#[key]` attribute has been placed before the given field.
///
/// Arguments to the attribute, as in `#[key(...)]` or `#[key = ...]`, are rejected.
fn is_key_field(field: &Field) -> Result<bool> {
    for attr in &field.attrs {
        if attr.path().is_ident("key") {
            attr.meta.require_path_only()?;
            return Ok(true);
        }
    }

    Ok(false)
}
