// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use {
    crate::{
        config::BindConfig,
        error::{Error, StructuralError},
        parser::{parse_tokens, ParseOutcome},
        spec::Specification,
        Bindable, EarlyExit,
    },
    argbind_shared::SpecInfo,
};

/// What a successful invocation produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The populated target.
    Bound(T),
    /// Usage information was requested instead.
    Help,
}

/// Parses and binds command lines for a `T`.
///
/// The specification of `T` is built and validated once, when the binder is
/// created, and shared by every later call.
pub struct Binder<T> {
    spec: Specification<T>,
    info: SpecInfo<'static>,
    config: BindConfig,
}

impl<T: Bindable> Binder<T> {
    /// A binder with the default configuration.
    pub fn new() -> Result<Self, StructuralError> {
        Self::with_config(BindConfig::default())
    }

    /// A binder with the given configuration.
    pub fn with_config(config: BindConfig) -> Result<Self, StructuralError> {
        let spec = Specification::build()?;
        let info = spec.info();
        Ok(Binder { spec, info, config })
    }

    /// The validated specification of `T`.
    pub fn specification(&self) -> &Specification<T> {
        &self.spec
    }

    /// The parser-facing view of the specification.
    pub fn info(&self) -> &SpecInfo<'static> {
        &self.info
    }

    /// The configuration in use.
    pub fn config(&self) -> BindConfig {
        self.config
    }

    /// Render the usage message. `command_name` is the command as typed,
    /// one segment per word. The help flags are listed only while help
    /// handling is on.
    pub fn usage(&self, command_name: &[&str]) -> String {
        self.info.usage(command_name, self.config.handles_help())
    }

    /// Parse `args`, the command line without the command name, and bind a
    /// fresh `T` from it.
    pub fn parse(&self, args: &[&str]) -> Result<Outcome<T>, Error> {
        match parse_tokens(&self.info, args, self.config.handles_help())? {
            ParseOutcome::Help => Ok(Outcome::Help),
            ParseOutcome::Args(parsed) => Ok(Outcome::Bound(self.spec.bind_new(&parsed)?)),
        }
    }

    /// Like [`Binder::parse`], but a help request becomes an [`EarlyExit`]
    /// carrying the usage message.
    pub fn from_args(&self, command_name: &[&str], args: &[&str]) -> Result<T, EarlyExit> {
        match self.parse(args)? {
            Outcome::Bound(target) => Ok(target),
            Outcome::Help => Err(EarlyExit { output: self.usage(command_name), status: Ok(()) }),
        }
    }
}
