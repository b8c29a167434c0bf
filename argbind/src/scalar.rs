// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! The built-in conversions from command line text to scalar field types.
//!
//! Every entry serves both its plain type and the `Option` of it, so an
//! `Option<u16>` field binds to `Some(port)` when the value is given.

use {
    crate::FieldType,
    std::{
        any::{Any, TypeId},
        fmt::Display,
        str::FromStr,
    },
};

/// The kinds of scalar with a built-in conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarKind {
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// `char`
    Char,
    /// `bool`
    Bool,
    /// `String`
    Text,
}

/// One entry of the conversion table.
pub struct Primitive {
    kind: ScalarKind,
    type_id: fn() -> TypeId,
    optional_type_id: fn() -> TypeId,
    parse: fn(&str) -> Result<Box<dyn Any>, String>,
    zero: fn() -> Box<dyn Any>,
    wrap_some: fn(Box<dyn Any>) -> Box<dyn Any>,
}

impl Primitive {
    /// The kind of scalar this entry converts to.
    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// Parse `text` into a boxed value of this entry's type.
    pub fn parse(&self, text: &str) -> Result<Box<dyn Any>, String> {
        (self.parse)(text)
    }

    /// The zero value of this entry's type.
    pub fn zero(&self) -> Box<dyn Any> {
        (self.zero)()
    }

    /// Turn a boxed `T` produced by [`Primitive::parse`] into a boxed `Some(T)`.
    pub(crate) fn wrap_some(&self, value: Box<dyn Any>) -> Box<dyn Any> {
        (self.wrap_some)(value)
    }
}

macro_rules! primitives {
    ($($kind:ident => $ty:ty, $parse:expr, $zero:expr;)*) => {
        static PRIMITIVES: &[Primitive] = &[
            $(
                Primitive {
                    kind: ScalarKind::$kind,
                    type_id: TypeId::of::<$ty>,
                    optional_type_id: TypeId::of::<Option<$ty>>,
                    parse: $parse,
                    zero: || Box::new($zero as $ty),
                    wrap_some: wrap_some::<$ty>,
                },
            )*
        ];
    }
}

primitives! {
    I8 => i8, parse_from_str::<i8>, 0;
    I16 => i16, parse_from_str::<i16>, 0;
    I32 => i32, parse_from_str::<i32>, 0;
    I64 => i64, parse_from_str::<i64>, 0;
    U8 => u8, parse_from_str::<u8>, 0;
    U16 => u16, parse_from_str::<u16>, 0;
    U32 => u32, parse_from_str::<u32>, 0;
    U64 => u64, parse_from_str::<u64>, 0;
    F32 => f32, parse_from_str::<f32>, 0.0;
    F64 => f64, parse_from_str::<f64>, 0.0;
    Char => char, parse_from_str::<char>, ' ';
    Bool => bool, parse_bool, false;
    Text => String, parse_text, String::new();
}

fn parse_from_str<T>(text: &str) -> Result<Box<dyn Any>, String>
where
    T: FromStr + 'static,
    T::Err: Display,
{
    T::from_str(text).map(|value| Box::new(value) as Box<dyn Any>).map_err(|e| e.to_string())
}

fn parse_bool(text: &str) -> Result<Box<dyn Any>, String> {
    if text.eq_ignore_ascii_case("true") {
        Ok(Box::new(true))
    } else if text.eq_ignore_ascii_case("false") {
        Ok(Box::new(false))
    } else {
        Err("expected `true` or `false`".to_string())
    }
}

fn parse_text(text: &str) -> Result<Box<dyn Any>, String> {
    Ok(Box::new(text.to_string()))
}

pub(crate) fn wrap_some<T: 'static>(value: Box<dyn Any>) -> Box<dyn Any> {
    match value.downcast::<T>() {
        Ok(value) => Box::new(Some(*value)),
        // Left as is so that storing it reports the mismatch.
        Err(value) => value,
    }
}

/// Find the conversion for a field type. The flag is `true` when the field is
/// the `Option` of the entry's type.
pub fn lookup(ty: FieldType) -> Option<(&'static Primitive, bool)> {
    PRIMITIVES.iter().find_map(|primitive| {
        if (primitive.type_id)() == ty.id() {
            Some((primitive, false))
        } else if (primitive.optional_type_id)() == ty.id() {
            Some((primitive, true))
        } else {
            None
        }
    })
}

/// Whether a field of this type can be bound without an adapter.
pub fn is_supported(ty: FieldType) -> bool {
    lookup(ty).is_some()
}
