use proc_macro2::Span;
use syn::{spanned::Spanned, Attribute, LitStr};

#[derive(Default, Clone)]
pub(crate) struct FieldAttr {
    pub(crate) rename: Option<LitStr>,
    pub(crate) skip: bool,
}

#[derive(Default, Clone)]
pub(crate) struct VariantAttr {
    pub(crate) rename: Option<LitStr>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) enum EnumTagging {
    #[default]
    Tagged,
    Untagged,
}

pub(crate) fn ensure_no_msgpack_attrs(attrs: &[Attribute], ctx: &str) -> syn::Result<()> {
    for a in attrs {
        if a.path().is_ident("msgpack") {
            return Err(syn::Error::new(
                a.span(),
                format!("`#[msgpack(...)]` is not supported on {ctx}"),
            ));
        }
    }
    Ok(())
}

pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttr> {
    let mut out = FieldAttr::default();
    for attr in attrs {
        if !attr.path().is_ident("msgpack") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                if out.skip {
                    return Err(meta.error("duplicate `msgpack(skip)`"));
                }
                out.skip = true;
                return Ok(());
            }
            if meta.path.is_ident("rename") {
                if out.rename.is_some() {
                    return Err(meta.error("duplicate `msgpack(rename=...)`"));
                }
                let lit: LitStr = meta.value()?.parse()?;
                out.rename = Some(lit);
                return Ok(());
            }
            Err(meta.error("unsupported `msgpack(...)` field attribute (allowed: rename, skip)"))
        })?;
    }

    if out.skip && out.rename.is_some() {
        return Err(syn::Error::new(
            Span::call_site(),
            "`msgpack(skip)` cannot be combined with `rename`",
        ));
    }

    Ok(out)
}

pub(crate) fn parse_variant_attrs(attrs: &[Attribute]) -> syn::Result<VariantAttr> {
    let mut out = VariantAttr::default();
    for attr in attrs {
        if !attr.path().is_ident("msgpack") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                if out.rename.is_some() {
                    return Err(meta.error("duplicate `msgpack(rename=...)` on variant"));
                }
                let lit: LitStr = meta.value()?.parse()?;
                out.rename = Some(lit);
                return Ok(());
            }
            if meta.path.is_ident("skip") {
                return Err(meta.error("`msgpack(skip)` is not valid on enum variants"));
            }
            Err(meta.error("unsupported `msgpack(...)` variant attribute (allowed: rename)"))
        })?;
    }
    Ok(out)
}

pub(crate) fn parse_enum_attrs(attrs: &[Attribute]) -> syn::Result<EnumTagging> {
    let mut seen_tagged = false;
    let mut seen_untagged = false;

    for attr in attrs {
        if !attr.path().is_ident("msgpack") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("untagged") {
                if seen_untagged {
                    return Err(meta.error("duplicate `msgpack(untagged)`"));
                }
                seen_untagged = true;
                return Ok(());
            }
            if meta.path.is_ident("tagged") {
                if seen_tagged {
                    return Err(meta.error("duplicate `msgpack(tagged)`"));
                }
                seen_tagged = true;
                return Ok(());
            }
            Err(meta.error("unsupported `msgpack(...)` enum attribute (allowed: tagged, untagged)"))
        })?;
    }

    if seen_tagged && seen_untagged {
        return Err(syn::Error::new(
            Span::call_site(),
            "msgpack enum cannot be both tagged and untagged",
        ));
    }

    Ok(if seen_untagged {
        EnumTagging::Untagged
    } else {
        EnumTagging::Tagged
    })
}
