// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::errors::Errors;

/// Attributes applied to a field of a `#[derive(Bindable)]` struct.
#[derive(Default)]
pub struct FieldAttrs {
    pub positional: Option<PositionalAttr>,
    pub option: Option<OptionAttr>,
    pub tail: Option<syn::Path>,
    pub adapter: Option<AdapterAttr>,
    pub flatten: Option<syn::Path>,
    pub description: Option<Description>,
}

/// `positional(index = N, name = "..", optional, description = "..")`
pub struct PositionalAttr {
    pub path: syn::Path,
    pub index: Option<usize>,
    pub name: Option<syn::LitStr>,
    pub optional: bool,
    pub description: Option<syn::LitStr>,
}

/// `option(key = 'k', long = "..", long, value, description = "..")`
pub struct OptionAttr {
    pub path: syn::Path,
    pub key: Option<syn::LitChar>,
    pub long: Option<LongKey>,
    pub value: bool,
    pub description: Option<syn::LitStr>,
}

pub enum LongKey {
    /// `long = "dry-run"`
    Explicit(syn::LitStr),
    /// A bare `long`, derived from the field name.
    FromField,
}

pub enum AdapterAttr {
    /// `adapter = "Type"`
    Type { path: syn::Path, ty: syn::Type },
    /// `from_str_fn(path)`
    FromStrFn { path: syn::Path, func: syn::Path },
}

impl AdapterAttr {
    fn path(&self) -> &syn::Path {
        match self {
            AdapterAttr::Type { path, .. } | AdapterAttr::FromStrFn { path, .. } => path,
        }
    }
}

/// A description collected from doc comments or an explicit attribute.
pub struct Description {
    pub explicit: bool,
    pub content: syn::LitStr,
}

impl FieldAttrs {
    pub fn parse(errors: &Errors, field: &syn::Field) -> Self {
        let mut this = Self::default();

        for attr in &field.attrs {
            if is_doc_attr(attr) {
                parse_attr_doc(errors, attr, &mut this.description);
                continue;
            }

            let ml = if let Some(ml) = bind_attr_to_meta_list(errors, attr) {
                ml
            } else {
                continue;
            };

            for meta in &ml.nested {
                let meta = if let Some(m) = errors.nested_meta(meta) { m } else { continue };

                let name = meta.path();
                if name.is_ident("positional") {
                    let first = this.positional.as_ref().map(|attr| &attr.path);
                    if !errors.repeated_tag("positional", first, name) {
                        this.positional = errors.list(meta).map(|ml| parse_positional(errors, ml));
                    }
                } else if name.is_ident("option") {
                    let first = this.option.as_ref().map(|attr| &attr.path);
                    if !errors.repeated_tag("option", first, name) {
                        this.option = errors.list(meta).map(|ml| parse_option(errors, ml));
                    }
                } else if name.is_ident("tail") {
                    if !errors.repeated_tag("tail", this.tail.as_ref(), name) {
                        this.tail = errors.flag(meta).cloned();
                    }
                } else if name.is_ident("flatten") {
                    if !errors.repeated_tag("flatten", this.flatten.as_ref(), name) {
                        this.flatten = errors.flag(meta).cloned();
                    }
                } else if name.is_ident("adapter") || name.is_ident("from_str_fn") {
                    let first = this.adapter.as_ref().map(AdapterAttr::path);
                    if !errors.repeated_tag("adapter", first, name) {
                        this.adapter = parse_adapter(errors, meta);
                    }
                } else {
                    errors.unknown_attr(
                        meta,
                        "field-level `bind`",
                        &["positional", "option", "tail", "adapter", "from_str_fn", "flatten"],
                    );
                }
            }
        }

        if let Some(flatten) = &this.flatten {
            if this.positional.is_some()
                || this.option.is_some()
                || this.tail.is_some()
                || this.adapter.is_some()
            {
                errors.err(flatten, "`flatten` fields cannot carry other `bind` attributes");
            }
        }

        this
    }
}

fn parse_positional(errors: &Errors, ml: &syn::MetaList) -> PositionalAttr {
    let mut attr = PositionalAttr {
        path: ml.path.clone(),
        index: None,
        name: None,
        optional: false,
        description: None,
    };

    for meta in &ml.nested {
        let meta = if let Some(m) = errors.nested_meta(meta) { m } else { continue };
        let name = meta.path();
        if name.is_ident("index") {
            attr.index = errors.index_value(meta);
        } else if name.is_ident("name") {
            attr.name = errors.str_value(meta);
        } else if name.is_ident("optional") {
            attr.optional = errors.flag(meta).is_some();
        } else if name.is_ident("description") {
            attr.description = errors.str_value(meta);
        } else {
            errors.unknown_attr(
                meta,
                "`positional`",
                &["index", "name", "optional", "description"],
            );
        }
    }

    if attr.index.is_none() {
        errors.err(ml, "Missing `index` in `positional` attribute");
    }
    attr
}

fn parse_option(errors: &Errors, ml: &syn::MetaList) -> OptionAttr {
    let mut attr = OptionAttr {
        path: ml.path.clone(),
        key: None,
        long: None,
        value: false,
        description: None,
    };

    for meta in &ml.nested {
        let meta = if let Some(m) = errors.nested_meta(meta) { m } else { continue };
        let name = meta.path();
        if name.is_ident("key") {
            attr.key = errors.short_key(meta);
        } else if name.is_ident("long") {
            attr.long = match meta {
                syn::Meta::Path(_) => Some(LongKey::FromField),
                _ => errors.long_key(meta).map(LongKey::Explicit),
            };
        } else if name.is_ident("value") {
            attr.value = errors.flag(meta).is_some();
        } else if name.is_ident("description") {
            attr.description = errors.str_value(meta);
        } else {
            errors.unknown_attr(meta, "`option`", &["key", "long", "value", "description"]);
        }
    }

    if attr.key.is_none() {
        errors.err(ml, "Missing `key` in `option` attribute");
    }
    attr
}

fn parse_adapter(errors: &Errors, meta: &syn::Meta) -> Option<AdapterAttr> {
    let path = meta.path().clone();
    if path.is_ident("adapter") {
        let lit = errors.str_value(meta)?;
        match lit.parse::<syn::Type>() {
            Ok(ty) => Some(AdapterAttr::Type { path, ty }),
            Err(e) => {
                errors.push(e);
                None
            }
        }
    } else {
        let ml = errors.list(meta)?;
        let mut nested = ml.nested.iter();
        let func = match (nested.next(), nested.next()) {
            (Some(only), None) => errors.nested_meta(only).and_then(|m| errors.flag(m))?,
            _ => {
                errors.err(ml, "Expected a single function path in `from_str_fn`");
                return None;
            }
        };
        Some(AdapterAttr::FromStrFn { path, func: func.clone() })
    }
}

/// Represents a `#[derive(Bindable)]` type's top-level attributes.
#[derive(Default)]
pub struct TypeAttrs {
    pub description: Option<Description>,
}

impl TypeAttrs {
    /// Parse top-level `#[bind(...)]` attributes
    pub fn parse(errors: &Errors, derive_input: &syn::DeriveInput) -> Self {
        let mut this = TypeAttrs::default();

        for attr in &derive_input.attrs {
            if is_doc_attr(attr) {
                parse_attr_doc(errors, attr, &mut this.description);
                continue;
            }

            let ml = if let Some(ml) = bind_attr_to_meta_list(errors, attr) {
                ml
            } else {
                continue;
            };

            for meta in &ml.nested {
                let meta = if let Some(m) = errors.nested_meta(meta) { m } else { continue };
                if meta.path().is_ident("description") {
                    if let Some(lit) = errors.str_value(meta) {
                        if let Some(Description { explicit: true, .. }) = &this.description {
                            errors.err(&lit, "`description` is given more than once");
                        } else {
                            this.description = Some(Description { explicit: true, content: lit });
                        }
                    }
                } else {
                    errors.unknown_attr(meta, "type-level `bind`", &["description"]);
                }
            }
        }

        this
    }
}

fn is_doc_attr(attr: &syn::Attribute) -> bool {
    attr.path.segments.len() == 1 && attr.path.segments[0].ident == "doc"
}

/// Filters out non-`#[bind(...)]` attributes and converts to `syn::MetaList`.
fn bind_attr_to_meta_list(errors: &Errors, attr: &syn::Attribute) -> Option<syn::MetaList> {
    if !attr.path.is_ident("bind") {
        return None;
    }
    match attr.parse_meta() {
        Ok(syn::Meta::List(ml)) => Some(ml),
        Ok(other) => {
            errors.err(&other, "Expected a list like `#[bind(positional(index = 0))]`");
            None
        }
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

/// Append one doc comment line to the description. Lines are trimmed and
/// joined with single spaces; an explicit description wins.
fn parse_attr_doc(errors: &Errors, attr: &syn::Attribute, slot: &mut Option<Description>) {
    let meta = match attr.parse_meta() {
        Ok(meta @ syn::Meta::NameValue(_)) => meta,
        _ => return,
    };

    // Don't replace an existing explicit description.
    if slot.as_ref().map(|d| d.explicit).unwrap_or(false) {
        return;
    }

    if let Some(lit_str) = errors.str_value(&meta) {
        let line = lit_str.value();
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        let content = match slot {
            Some(previous) => {
                let joined = [previous.content.value().as_str(), " ", line].concat();
                syn::LitStr::new(&joined, previous.content.span())
            }
            None => syn::LitStr::new(line, lit_str.span()),
        };
        *slot = Some(Description { explicit: false, content });
    }
}
