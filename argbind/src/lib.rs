// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Declarative binding of command line arguments onto typed records.
//!
//! The fields of a record are tagged as positional arguments, options or a
//! variadic tail. From those tags a validated [`Specification`] is built once
//! per type; each command line is then parsed into a flat [`ParsedModel`] and
//! bound onto a fresh, default-constructed instance of the record.
//!
//! ## Basic Example
//!
//! ```rust,no_run
//! use argbind::Bindable;
//!
//! #[derive(Bindable, Default)]
//! /// Copy a file.
//! struct CopyFile {
//!     /// the file to copy
//!     #[bind(positional(index = 0))]
//!     source: String,
//!
//!     #[bind(positional(index = 1, optional))]
//!     target: Option<String>,
//!
//!     /// overwrite an existing target
//!     #[bind(option(key = 'f', long))]
//!     force: bool,
//!
//!     /// permission bits
//!     #[bind(option(key = 'm', value))]
//!     mode: Option<u32>,
//! }
//!
//! let copy: CopyFile = argbind::from_env();
//! ```
//!
//! `./cp --help` will then output the following:
//!
//! ```bash
//! Usage: cp <source> [<target>] [-f] [-m <mode>]
//!
//! Copy a file.
//!
//! Positional Arguments:
//!   source            the file to copy
//!   target
//!
//! Options:
//!   -f, --force       overwrite an existing target
//!   -m                permission bits
//!   -h, --help        display usage information
//! ```
//!
//! Switches, like `force`, are `bool` fields set to whether they were given.
//! Options with a `value`, like `mode`, and positional arguments are converted
//! by a built-in table covering the integer and floating point types, `char`,
//! `bool`, `String` and the `Option` of each. Absent values leave the field at
//! its `Default`.
//!
//! Any other type is converted by a [`TypeAdapter`], and the variadic tail
//! always needs one for its elements:
//!
//! ```rust
//! use {argbind::Bindable, std::path::PathBuf};
//!
//! #[derive(Bindable, Default)]
//! /// Remove files.
//! struct Remove {
//!     #[bind(option(key = 'r', long))]
//!     recursive: bool,
//!
//!     #[bind(option(key = 'C', value), from_str_fn(parse_dir))]
//!     directory: Option<PathBuf>,
//!
//!     #[bind(tail, adapter = "argbind::FromStrAdapter<PathBuf>")]
//!     paths: Vec<PathBuf>,
//! }
//!
//! fn parse_dir(text: &str) -> Result<PathBuf, String> {
//!     let dir = PathBuf::from(text);
//!     if dir.is_absolute() { Ok(dir) } else { Err("expected an absolute path".into()) }
//! }
//!
//! let rm = Remove::from_args(&["rm"], &["-r", "a", "-C", "/tmp", "b"]).unwrap();
//! assert!(rm.recursive);
//! assert_eq!(rm.directory, Some(PathBuf::from("/tmp")));
//! assert_eq!(rm.paths, vec![PathBuf::from("a"), PathBuf::from("b")]);
//! ```
//!
//! A malformed record, such as one with a gap between positional indices or a
//! switch that is not a `bool`, is reported as a [`StructuralError`] when its
//! specification is built, before any command line is looked at.

#![deny(missing_docs)]

mod adapter;
mod binder;
mod bind;
mod config;
mod declare;
mod error;
mod model;
pub mod parser;
pub mod scalar;
mod spec;

pub use {
    crate::{
        adapter::{Adapter, CustomAdapter, FromStrAdapter, TypeAdapter},
        binder::{Binder, Outcome},
        config::BindConfig,
        declare::{Declaration, FieldDecl, FieldType, OptionTag, PositionalTag, TailCollection},
        error::{Error, ParseError, RoleKind, StructuralError, ValueError},
        model::{ParsedArgs, ParsedModel},
        spec::{
            Conversion, OptionDescriptor, OptionKind, PositionalDescriptor, Role, Specification,
            TailDescriptor,
        },
    },
    argbind_derive::Bindable,
    argbind_shared::{OptionInfo, PositionalInfo, SpecInfo},
};

/// Types whose fields can be bound from a command line.
///
/// This trait is usually implemented with `#[derive(Bindable)]`.
pub trait Bindable: Default + 'static {
    /// Declare the fields of `Self` and their tags, in declaration order.
    fn declare(decl: &mut Declaration<Self>);

    /// The description of the command shown in usage output.
    fn description() -> &'static str {
        ""
    }

    /// Construct the type from an input set of arguments.
    ///
    /// The first argument `command_name` is the identifier for the current command. In most cases,
    /// users should only pass in a single item for the command name, which typically comes from
    /// the first item from `std::env::args()`. It is only used in usage output.
    ///
    /// The second argument `args` is the rest of the command line arguments.
    ///
    /// The specification of `Self` is built on every call; use a [`Binder`]
    /// to build it once for many calls.
    fn from_args(command_name: &[&str], args: &[&str]) -> Result<Self, EarlyExit> {
        Binder::<Self>::new().map_err(Error::from)?.from_args(command_name, args)
    }
}

/// Information to display to the user about why a `Bindable` construction exited early.
///
/// This can occur due to either failed parsing or a flag like `--help`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EarlyExit {
    /// The output to display to the user of the commandline tool.
    pub output: String,
    /// Status of argument parsing.
    ///
    /// `Ok` if the command was parsed successfully and the early exit is due
    /// to a flag like `--help` causing early exit with output.
    ///
    /// `Err` if the arguments were not successfully parsed.
    pub status: Result<(), ()>,
}

impl From<String> for EarlyExit {
    fn from(err_msg: String) -> Self {
        Self { output: err_msg, status: Err(()) }
    }
}

impl From<Error> for EarlyExit {
    fn from(err: Error) -> Self {
        err.to_string().into()
    }
}

/// Parse `args`, the command line without the command name, into a `T`.
pub fn parse_args<T: Bindable>(args: &[&str], config: BindConfig) -> Result<Outcome<T>, Error> {
    Binder::<T>::with_config(config)?.parse(args)
}

/// Extract the base cmd from a path
fn cmd<'a>(default: &'a str, path: &'a str) -> &'a str {
    std::path::Path::new(path).file_name().and_then(|s| s.to_str()).unwrap_or(default)
}

/// Create a `Bindable` type from the current process's `env::args`.
///
/// This function will exit early from the current process if argument parsing
/// was unsuccessful or if information like `--help` was requested. Error messages will be printed
/// to stderr, and `--help` output to stdout.
pub fn from_env<T: Bindable>() -> T {
    let strings: Vec<String> = std::env::args_os()
        .map(|s| s.into_string())
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|arg| {
            eprintln!("Invalid utf8: {}", arg.to_string_lossy());
            std::process::exit(1)
        });

    if strings.is_empty() {
        eprintln!("No program name, argv is empty");
        std::process::exit(1)
    }

    let cmd = cmd(&strings[0], &strings[0]);
    let strs: Vec<&str> = strings.iter().map(|s| s.as_str()).collect();
    T::from_args(&[cmd], &strs[1..]).unwrap_or_else(|early_exit| {
        std::process::exit(match early_exit.status {
            Ok(()) => {
                println!("{}", early_exit.output);
                0
            }
            Err(()) => {
                eprintln!("{}\nRun {} --help for more information.", early_exit.output, cmd);
                1
            }
        })
    })
}
