// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Failure taxonomy.
//!
//! [`StructuralError`]s are caused by the declaration of the target type and
//! are found while building its [`Specification`](crate::Specification).
//! [`ParseError`]s and [`ValueError`]s are caused by the command line the user
//! typed.

use {std::fmt, thiserror::Error};

/// The role tags a field can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleKind {
    /// `positional`
    Positional,
    /// `option`
    Option,
    /// `tail`
    VariadicTail,
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RoleKind::Positional => "a positional argument",
            RoleKind::Option => "an option",
            RoleKind::VariadicTail => "the variadic tail",
        })
    }
}

/// The target type is declared in a way that cannot be bound.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum StructuralError {
    #[error(
        "field `{field}` of `{type_name}` can only represent either {first} or {second}, \
         but was tagged as both"
    )]
    ConflictingRoles {
        type_name: &'static str,
        field: &'static str,
        first: RoleKind,
        second: RoleKind,
    },

    #[error(
        "positional field `{field}` of `{type_name}` has index {actual}, \
         but index {expected} was expected next"
    )]
    PositionalIndex { type_name: &'static str, field: &'static str, expected: usize, actual: usize },

    #[error("`{type_name}` declares a second variadic tail `{second}`; `{first}` was declared first")]
    DuplicateTail { type_name: &'static str, first: &'static str, second: &'static str },

    #[error(
        "switch field `{field}` of `{type_name}` has type `{field_type}`; \
         an option that expects no value must be a `bool`"
    )]
    SwitchNotBool { type_name: &'static str, field: &'static str, field_type: &'static str },

    #[error(
        "field `{field}` of `{type_name}` has type `{field_type}`, which has no built-in \
         conversion, and no adapter was provided"
    )]
    UnsupportedType { type_name: &'static str, field: &'static str, field_type: &'static str },

    #[error("variadic tail `{field}` of `{type_name}` requires an adapter for its elements")]
    TailWithoutAdapter { type_name: &'static str, field: &'static str },

    #[error(
        "adapter for field `{field}` of `{type_name}` produces `{adapter_output}`, \
         which cannot be stored as `{expected}`"
    )]
    AdapterMismatch {
        type_name: &'static str,
        field: &'static str,
        expected: &'static str,
        adapter_output: &'static str,
    },

    #[error("key `{key}` of field `{field}` in `{type_name}` is already used by `{other}`")]
    DuplicateKey { type_name: &'static str, field: &'static str, other: &'static str, key: String },

    #[error("positional name `{name}` of field `{field}` in `{type_name}` is already used by `{other}`")]
    DuplicateName {
        type_name: &'static str,
        field: &'static str,
        other: &'static str,
        name: &'static str,
    },

    #[error("invalid key on field `{field}` of `{type_name}`: {reason}")]
    InvalidKey { type_name: &'static str, field: &'static str, reason: String },

    #[error(
        "mandatory positional field `{field}` of `{type_name}` follows the optional \
         positional field `{optional}`"
    )]
    MandatoryAfterOptional { type_name: &'static str, field: &'static str, optional: &'static str },

    #[error("the default adapter only marks the absence of an adapter and cannot parse values")]
    DefaultAdapterInvoked,
}

/// A token could not be turned into a field's value.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ValueError {
    #[error("cannot convert '{token}' for field `{field}` to `{type_name}`: {message}")]
    Conversion { field: &'static str, token: String, type_name: &'static str, message: String },

    #[error("cannot store the value of '{token}' in field `{field}` of type `{type_name}`")]
    Assign { field: &'static str, token: String, type_name: &'static str },
}

/// The command line does not match the specification.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ParseError {
    #[error("Unrecognized argument: {token}{}", suggestion_text(.suggestion))]
    UnknownOption { token: String, suggestion: Option<String> },

    #[error("Unexpected positional argument: {token}")]
    UnexpectedArgument { token: String },

    #[error("No value provided for option '{option}'.")]
    MissingOptionValue { option: String },

    #[error("Option '{option}' was provided more than once.")]
    DuplicateOption { option: String },

    #[error("Required positional arguments not provided:{}", list_names(.names))]
    MissingArguments { names: Vec<String> },
}

fn suggestion_text(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(suggestion) => format!("\nDid you mean '{}'?", suggestion),
        None => String::new(),
    }
}

const NEWLINE_INDENT: &str = "\n    ";

fn list_names(names: &[String]) -> String {
    let mut output = String::new();
    for name in names {
        output.push_str(NEWLINE_INDENT);
        output.push_str(name);
    }
    output
}

/// Any failure of a parse-and-bind invocation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The target type is malformed; fix the type.
    #[error(transparent)]
    Structural(#[from] StructuralError),
    /// The command line is malformed; fix the arguments.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A value on the command line is malformed; fix the arguments.
    #[error(transparent)]
    Value(#[from] ValueError),
}
