// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use {
    argbind_shared::{check_long_key, check_short_key},
    proc_macro2::{Span, TokenStream},
    quote::ToTokens,
    std::cell::RefCell,
    syn::spanned::Spanned,
};

/// Collects the errors found while reading `#[bind(...)]` attributes.
///
/// Reading continues past a malformed attribute, so every problem in a type
/// is reported by a single compilation.
#[derive(Default)]
pub struct Errors {
    errors: RefCell<Vec<syn::Error>>,
}

/// The value of a `name = <literal>` sub-attribute as one literal kind.
macro_rules! lit_value_fn {
    ($(($fn_name:ident, $syn_type:ident, $variant:ident, $lit_name:literal),)*) => {
        $(
            pub fn $fn_name(&self, meta: &syn::Meta) -> Option<syn::$syn_type> {
                match self.name_value(meta)? {
                    syn::Lit::$variant(inner) => Some(inner.clone()),
                    other => {
                        let name = path_name(meta);
                        self.err(other, &["`", name.as_str(), "` takes a ", $lit_name].concat());
                        None
                    }
                }
            }
        )*
    }
}

impl Errors {
    /// Report `second` when the `kind` tag was already given on the same
    /// item. Returns whether it was a repeat.
    pub fn repeated_tag(&self, kind: &str, first: Option<&syn::Path>, second: &syn::Path) -> bool {
        match first {
            Some(first) => {
                self.err(second, &["`", kind, "` is given more than once"].concat());
                self.err(first, &["first `", kind, "` is here"].concat());
                true
            }
            None => false,
        }
    }

    /// Report a sub-attribute that is not one of `expected` inside `context`.
    pub fn unknown_attr(&self, meta: &syn::Meta, context: &str, expected: &[&str]) {
        let expected: Vec<String> =
            expected.iter().map(|name| ["`", *name, "`"].concat()).collect();
        let expected = expected.join(", ");
        self.err(
            meta,
            &["Invalid ", context, " attribute\nExpected one of: ", expected.as_str()].concat(),
        );
    }

    /// Literals are never valid in a `bind` attribute list.
    pub fn nested_meta<'a>(&self, nested: &'a syn::NestedMeta) -> Option<&'a syn::Meta> {
        match nested {
            syn::NestedMeta::Meta(meta) => Some(meta),
            syn::NestedMeta::Lit(lit) => {
                self.err(lit, "Unexpected literal");
                None
            }
        }
    }

    /// A bare flag such as `optional`, `value` or `tail`.
    pub fn flag<'a>(&self, meta: &'a syn::Meta) -> Option<&'a syn::Path> {
        match meta {
            syn::Meta::Path(path) => Some(path),
            _ => {
                let name = path_name(meta);
                self.err(meta, &["`", name.as_str(), "` takes no value"].concat());
                None
            }
        }
    }

    /// A parenthesized list such as `positional(...)`.
    pub fn list<'a>(&self, meta: &'a syn::Meta) -> Option<&'a syn::MetaList> {
        match meta {
            syn::Meta::List(list) => Some(list),
            _ => {
                let name = path_name(meta);
                self.err(meta, &["Expected a list like `", name.as_str(), "(...)`"].concat());
                None
            }
        }
    }

    /// The literal of a `name = <literal>` sub-attribute.
    pub fn name_value<'a>(&self, meta: &'a syn::Meta) -> Option<&'a syn::Lit> {
        match meta {
            syn::Meta::NameValue(nv) => Some(&nv.lit),
            _ => {
                self.err(meta, "Expected a name-value pair like `name = \"value\"`");
                None
            }
        }
    }

    lit_value_fn![
        (str_value, LitStr, Str, "string"),
        (char_value, LitChar, Char, "character"),
        (int_value, LitInt, Int, "integer"),
    ];

    /// `index = N`, a positional index.
    pub fn index_value(&self, meta: &syn::Meta) -> Option<usize> {
        let lit = self.int_value(meta)?;
        match lit.base10_parse::<usize>() {
            Ok(index) => Some(index),
            Err(e) => {
                self.push(e);
                None
            }
        }
    }

    /// `key = 'k'`, checked against the short key syntax.
    pub fn short_key(&self, meta: &syn::Meta) -> Option<syn::LitChar> {
        let lit = self.char_value(meta)?;
        if let Err(reason) = check_short_key(lit.value()) {
            self.err(&lit, &reason);
        }
        Some(lit)
    }

    /// `long = "..."`, checked against the long key syntax.
    pub fn long_key(&self, meta: &syn::Meta) -> Option<syn::LitStr> {
        let lit = self.str_value(meta)?;
        if let Err(reason) = check_long_key(&lit.value()) {
            self.err(&lit, &reason);
        }
        Some(lit)
    }

    /// Issue an error relating to a particular `Spanned` structure.
    pub fn err(&self, spanned: &impl Spanned, msg: &str) {
        self.err_span(spanned.span(), msg);
    }

    /// Issue an error relating to a particular `Span`.
    pub fn err_span(&self, span: Span, msg: &str) {
        self.push(syn::Error::new(span, msg));
    }

    /// Push a `syn::Error` onto the list of errors to issue.
    pub fn push(&self, err: syn::Error) {
        self.errors.borrow_mut().push(err);
    }
}

fn path_name(meta: &syn::Meta) -> String {
    meta.path().to_token_stream().to_string().replace(' ', "")
}

impl ToTokens for Errors {
    /// Convert the errors into tokens that, when emit, will cause
    /// the user of the macro to receive compiler errors.
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.extend(self.errors.borrow().iter().map(|e| e.to_compile_error()));
    }
}
