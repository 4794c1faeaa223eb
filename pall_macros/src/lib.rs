// Copyright 2026 The pall Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

mod helpers;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

#[proc_macro_derive(Element, attributes(key))]
pub fn derive_element(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    helpers::derive_element_trait(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
