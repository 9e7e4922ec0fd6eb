//! `#[derive(IntoValue)]` for `msgpack-codec`.
//!
//! Structs with named fields become maps keyed by field name, in declaration order. Tuple
//! structs become arrays and unit structs become nil. Enums are externally tagged
//! (`{variant: payload}`, or just the variant name for unit variants) unless marked
//! `#[msgpack(untagged)]`.
//!
//! Field attributes: `#[msgpack(rename = "...")]`, `#[msgpack(skip)]`.
//! Variant attributes: `#[msgpack(rename = "...")]`.

extern crate proc_macro;

mod attrs;
mod encode;
mod types;
mod util;

use proc_macro::TokenStream;
use syn::{parse_macro_input, Data, DeriveInput};

use crate::attrs::{ensure_no_msgpack_attrs, parse_enum_attrs};

/// Derives `msgpack_codec::IntoValue` and `msgpack_codec::ArrayElem`.
#[proc_macro_derive(IntoValue, attributes(msgpack))]
pub fn derive_into_value(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let out = match &input.data {
        Data::Struct(data) => ensure_no_msgpack_attrs(&input.attrs, "structs")
            .and_then(|()| encode::derive_struct(&input.ident, &input.generics, data)),
        Data::Enum(data) => parse_enum_attrs(&input.attrs).and_then(|tagging| {
            encode::derive_enum(&input.ident, &input.generics, data, tagging)
        }),
        Data::Union(u) => Err(syn::Error::new(
            u.union_token.span,
            "IntoValue not supported for unions",
        )),
    };
    TokenStream::from(out.unwrap_or_else(syn::Error::into_compile_error))
}
