// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

/// Implementation of the `Bindable` derive and the `bind(...)` attributes.
///
/// For more thorough documentation, see the `argbind` crate itself.
extern crate proc_macro;

use {
    crate::{
        errors::Errors,
        parse_attrs::{AdapterAttr, FieldAttrs, LongKey, OptionAttr, PositionalAttr, TypeAttrs},
    },
    heck::KebabCase,
    proc_macro2::{Span, TokenStream},
    quote::{quote, quote_spanned, ToTokens},
    syn::{ext::IdentExt, spanned::Spanned},
};

mod errors;
mod parse_attrs;

/// Entrypoint for `#[derive(Bindable)]`.
#[proc_macro_derive(Bindable, attributes(bind))]
pub fn bindable_derive(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let ast = syn::parse_macro_input!(input as syn::DeriveInput);
    let gen = impl_bindable(&ast);
    gen.into()
}

/// Transform the input into a token stream containing any generated implementations,
/// as well as all errors that occurred.
fn impl_bindable(input: &syn::DeriveInput) -> TokenStream {
    let errors = &Errors::default();
    if !input.generics.params.is_empty() {
        errors.err(
            &input.generics,
            "`#[derive(Bindable)]` cannot be applied to types with generic parameters",
        );
    }
    let type_attrs = &TypeAttrs::parse(errors, input);
    let mut output_tokens = match &input.data {
        syn::Data::Struct(ds) => impl_bindable_struct(errors, &input.ident, type_attrs, ds),
        syn::Data::Enum(de) => {
            errors.err(&de.enum_token, "`#[derive(Bindable)]` cannot be applied to enums");
            TokenStream::new()
        }
        syn::Data::Union(_) => {
            errors.err(input, "`#[derive(Bindable)]` cannot be applied to unions");
            TokenStream::new()
        }
    };
    errors.to_tokens(&mut output_tokens);
    output_tokens
}

/// A named field of a `#[derive(Bindable)]` struct with its parsed attributes.
struct StructField<'a> {
    /// The original parsed field
    field: &'a syn::Field,
    /// The parsed attributes of the field
    attrs: FieldAttrs,
    /// The field identifier, present for every field of a struct with named
    /// fields.
    ident: &'a syn::Ident,
    /// The field name as seen by users, without any `r#` prefix.
    name: String,
}

/// Implements `Bindable` for a `#[derive(Bindable)]` struct.
fn impl_bindable_struct(
    errors: &Errors,
    name: &syn::Ident,
    type_attrs: &TypeAttrs,
    ds: &syn::DataStruct,
) -> TokenStream {
    let fields = match &ds.fields {
        syn::Fields::Named(fields) => fields,
        syn::Fields::Unnamed(_) => {
            errors.err(
                &ds.struct_token,
                "`#[derive(Bindable)]` is not currently supported on tuple structs",
            );
            return TokenStream::new();
        }
        syn::Fields::Unit => {
            errors.err(&ds.struct_token, "`#[derive(Bindable)]` cannot be applied to unit structs");
            return TokenStream::new();
        }
    };

    let fields: Vec<_> = fields
        .named
        .iter()
        .filter_map(|field| {
            let attrs = FieldAttrs::parse(errors, field);
            let ident = field.ident.as_ref()?;
            Some(StructField { field, attrs, ident, name: ident.unraw().to_string() })
        })
        .collect();

    // Own fields first, then flattened records, matching the runtime order.
    let own_fields = fields.iter().filter(|field| field.attrs.flatten.is_none()).map(declare_field);
    let flattened_fields =
        fields.iter().filter(|field| field.attrs.flatten.is_some()).map(declare_flattened);

    let description = type_attrs
        .description
        .as_ref()
        .map(|description| description.content.to_token_stream())
        .unwrap_or_else(|| quote! { "" });

    let impl_span = Span::call_site();
    quote_spanned! { impl_span =>
        #[automatically_derived]
        impl ::argbind::Bindable for #name {
            fn declare(__decl: &mut ::argbind::Declaration<Self>) {
                #( #own_fields )*
                #( #flattened_fields )*
            }

            fn description() -> &'static str {
                #description
            }
        }
    }
}

/// `__decl.field(...)` for a field that is not flattened.
fn declare_field(field: &StructField<'_>) -> TokenStream {
    let ident = field.ident;
    let name = &field.name;
    let ty = &field.field.ty;
    let doc = field.attrs.description.as_ref().map(|description| &description.content);

    let positional = field.attrs.positional.as_ref().map(|attr| positional_tag(attr, doc));
    let option = field.attrs.option.as_ref().map(|attr| option_tag(attr, name, doc));
    let tail = field.attrs.tail.as_ref().map(|path| quote_spanned! { path.span() => .tail() });
    let adapter = field.attrs.adapter.as_ref().map(|adapter| match adapter {
        AdapterAttr::Type { ty, .. } => quote_spanned! { ty.span() =>
            .adapter(::argbind::Adapter::of::<#ty>())
        },
        AdapterAttr::FromStrFn { func, .. } => quote_spanned! { func.span() =>
            .adapter(::argbind::Adapter::from_fn(#func))
        },
    });

    quote_spanned! { field.field.span() =>
        __decl.field(
            ::argbind::FieldDecl::<Self, #ty>::new(#name, |__target| &mut __target.#ident)
                #positional
                #option
                #tail
                #adapter
        );
    }
}

/// `__decl.flatten(...)` for a field embedding another `Bindable`.
fn declare_flattened(field: &StructField<'_>) -> TokenStream {
    let ident = field.ident;
    let ty = &field.field.ty;
    quote_spanned! { field.field.span() =>
        __decl.flatten::<#ty>(|__target| &mut __target.#ident);
    }
}

fn positional_tag(attr: &PositionalAttr, doc: Option<&syn::LitStr>) -> TokenStream {
    // A missing index has already been reported.
    let index = attr.index.unwrap_or_default();
    let name = attr.name.as_ref().map(|name| quote! { .name(#name) });
    let optional = if attr.optional { Some(quote! { .optional() }) } else { None };
    let description = attr.description.as_ref().or(doc).map(|d| quote! { .description(#d) });
    quote_spanned! { attr.path.span() =>
        .positional(::argbind::PositionalTag::new(#index) #name #optional #description)
    }
}

fn option_tag(attr: &OptionAttr, field_name: &str, doc: Option<&syn::LitStr>) -> TokenStream {
    let key = match &attr.key {
        Some(key) => key.to_token_stream(),
        // A missing key has already been reported.
        None => return TokenStream::new(),
    };
    let long = attr.long.as_ref().map(|long| match long {
        LongKey::Explicit(lit) => quote! { .long(#lit) },
        LongKey::FromField => {
            let long = field_name.to_kebab_case();
            quote! { .long(#long) }
        }
    });
    let value = if attr.value { Some(quote! { .expects_value() }) } else { None };
    let description = attr.description.as_ref().or(doc).map(|d| quote! { .description(#d) });
    quote_spanned! { attr.path.span() =>
        .option(::argbind::OptionTag::new(#key) #long #value #description)
    }
}
