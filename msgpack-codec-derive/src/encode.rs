use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{spanned::Spanned, DataEnum, DataStruct, Fields, Generics, Ident, LitStr, Type};

use crate::attrs::{ensure_no_msgpack_attrs, parse_field_attrs, parse_variant_attrs, EnumTagging};
use crate::types::type_mentions_self;
use crate::util::where_with_bounds;

fn into_value(expr: &TokenStream) -> TokenStream {
    quote!(::msgpack_codec::IntoValue::into_value(#expr)?)
}

fn array_expr(items: &[Ident]) -> TokenStream {
    let len = items.len();
    quote! {{
        let mut __msgpack_items = ::msgpack_codec::__msgpack_macro::Vec::new();
        ::msgpack_codec::__msgpack_macro::try_reserve_exact(&mut __msgpack_items, #len)?;
        #( __msgpack_items.push(::msgpack_codec::IntoValue::into_value(#items)?); )*
        ::msgpack_codec::Value::Array(__msgpack_items)
    }}
}

fn map_expr(entries: &[(LitStr, Ident)]) -> TokenStream {
    let len = entries.len();
    let pushes = entries.iter().map(|(key, var)| {
        let k = into_value(&quote!(#key));
        let v = into_value(&quote!(#var));
        quote! { __msgpack_entries.push((#k, #v)); }
    });
    quote! {{
        let mut __msgpack_entries = ::msgpack_codec::__msgpack_macro::Vec::new();
        ::msgpack_codec::__msgpack_macro::try_reserve_exact(&mut __msgpack_entries, #len)?;
        #(#pushes)*
        ::msgpack_codec::Value::Map(__msgpack_entries)
    }}
}

fn tagged(vname: &LitStr, inner: &TokenStream) -> TokenStream {
    let key = into_value(&quote!(#vname));
    quote! {{
        let __msgpack_inner = #inner;
        let mut __msgpack_entries = ::msgpack_codec::__msgpack_macro::Vec::new();
        ::msgpack_codec::__msgpack_macro::try_reserve_exact(&mut __msgpack_entries, 1)?;
        __msgpack_entries.push((#key, __msgpack_inner));
        ::msgpack_codec::Value::Map(__msgpack_entries)
    }}
}

/// Field bindings of a named struct or variant. Skipped fields are left to a trailing `..`.
struct NamedParts {
    pats: Vec<TokenStream>,
    entries: Vec<(LitStr, Ident)>,
}

fn named_parts<'a>(
    name: &Ident,
    fields: &'a syn::FieldsNamed,
    bounds: &mut Vec<&'a Type>,
) -> syn::Result<NamedParts> {
    let mut pats = Vec::new();
    let mut entries = Vec::new();

    for field in &fields.named {
        let attr = parse_field_attrs(&field.attrs)?;
        let Some(f_ident) = field.ident.as_ref() else {
            return Err(syn::Error::new(field.span(), "expected a named field"));
        };
        if attr.skip {
            continue;
        }

        let key = attr
            .rename
            .unwrap_or_else(|| LitStr::new(&f_ident.unraw().to_string(), f_ident.span()));
        let var = format_ident!("__field_{}", f_ident);

        if !type_mentions_self(&field.ty, name) {
            bounds.push(&field.ty);
        }

        pats.push(quote!(#f_ident: #var));
        entries.push((key, var));
    }

    Ok(NamedParts { pats, entries })
}

fn tuple_parts<'a>(
    name: &Ident,
    fields: &'a syn::FieldsUnnamed,
    bounds: &mut Vec<&'a Type>,
    ctx: &str,
) -> syn::Result<Vec<Ident>> {
    let mut vars = Vec::new();
    for (idx, field) in fields.unnamed.iter().enumerate() {
        ensure_no_msgpack_attrs(&field.attrs, ctx)?;
        if !type_mentions_self(&field.ty, name) {
            bounds.push(&field.ty);
        }
        vars.push(format_ident!("__field_{idx}"));
    }
    Ok(vars)
}

fn finish(
    name: &Ident,
    generics: &Generics,
    bounds: &[&Type],
    body: &TokenStream,
) -> TokenStream {
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let where_clause = where_with_bounds(where_clause, bounds, &quote!(::msgpack_codec::IntoValue));

    quote! {
        impl #impl_generics ::msgpack_codec::IntoValue for #name #ty_generics #where_clause {
            fn into_value(
                self,
            ) -> ::core::result::Result<::msgpack_codec::Value, ::msgpack_codec::Error> {
                #body
            }
        }

        impl #impl_generics ::msgpack_codec::ArrayElem for #name #ty_generics #where_clause {}
    }
}

pub(crate) fn derive_struct(
    name: &Ident,
    generics: &Generics,
    data: &DataStruct,
) -> syn::Result<TokenStream> {
    let mut bounds = Vec::new();

    let body = match &data.fields {
        Fields::Named(fields) => {
            let NamedParts { pats, entries } = named_parts(name, fields, &mut bounds)?;
            let map = map_expr(&entries);
            quote! {
                let Self { #(#pats,)* .. } = self;
                ::core::result::Result::Ok(#map)
            }
        }
        Fields::Unnamed(fields) => {
            let vars = tuple_parts(name, fields, &mut bounds, "tuple struct fields")?;
            let array = array_expr(&vars);
            quote! {
                let Self( #(#vars),* ) = self;
                ::core::result::Result::Ok(#array)
            }
        }
        Fields::Unit => quote! {
            ::core::result::Result::Ok(::msgpack_codec::Value::Nil)
        },
    };

    Ok(finish(name, generics, &bounds, &body))
}

pub(crate) fn derive_enum(
    name: &Ident,
    generics: &Generics,
    data: &DataEnum,
    tagging: EnumTagging,
) -> syn::Result<TokenStream> {
    let mut arms = Vec::new();
    let mut bounds = Vec::new();

    for variant in &data.variants {
        let v_attr = parse_variant_attrs(&variant.attrs)?;
        if tagging == EnumTagging::Untagged && v_attr.rename.is_some() {
            return Err(syn::Error::new(
                variant.span(),
                "variant `msgpack(rename=...)` is meaningless for `#[msgpack(untagged)]` enums",
            ));
        }
        let vname = v_attr
            .rename
            .unwrap_or_else(|| LitStr::new(&variant.ident.to_string(), variant.ident.span()));
        let ident = &variant.ident;

        let (pat, inner) = match &variant.fields {
            Fields::Unit => (quote!(Self::#ident), quote!(::msgpack_codec::Value::Nil)),
            Fields::Unnamed(fields) => {
                let vars = tuple_parts(name, fields, &mut bounds, "tuple enum variant fields")?;
                let inner = if tagging == EnumTagging::Untagged && vars.len() == 1 {
                    into_value(&quote!(__field_0))
                } else {
                    array_expr(&vars)
                };
                (quote!(Self::#ident( #(#vars),* )), inner)
            }
            Fields::Named(fields) => {
                let NamedParts { pats, entries } = named_parts(name, fields, &mut bounds)?;
                (quote!(Self::#ident { #(#pats,)* .. }), map_expr(&entries))
            }
        };

        let value = match (tagging, &variant.fields) {
            // Unit variants of a tagged enum are just their name.
            (EnumTagging::Tagged, Fields::Unit) => into_value(&quote!(#vname)),
            (EnumTagging::Tagged, _) => tagged(&vname, &inner),
            (EnumTagging::Untagged, _) => inner,
        };
        arms.push(quote! { #pat => #value });
    }

    let body = quote! {
        ::core::result::Result::Ok(match self { #(#arms),* })
    };
    Ok(finish(name, generics, &bounds, &body))
}
