// Copyright (c) the danpg Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Procedural macros used by the `danpg` crate.

use proc_macro_error2::{abort, proc_macro_error};
use quote::quote;
use syn::{Item, parse_macro_input};

/// Stands in for `tracing::instrument` when the `tracing` feature is off.
///
/// Arguments are ignored and the item is emitted unchanged. Like
/// `instrument`, the attribute only accepts functions, so a misplaced
/// attribute is reported in both configurations.
#[proc_macro_error]
#[proc_macro_attribute]
pub fn noop(
    _attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let item = parse_macro_input!(item as Item);
    match item {
        Item::Fn(_) => quote! { #item }.into(),
        Item::Verbatim(_) => quote! { #item }.into(),
        other => abort!(other, "attribute can only be applied to functions"),
    }
}
