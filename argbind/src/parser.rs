// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Turns command line tokens into a [`ParsedArgs`] according to a
//! [`SpecInfo`].

use {
    crate::{
        error::ParseError,
        model::{ParsedArgs, ParsedModel},
    },
    argbind_shared::SpecInfo,
    rust_fuzzy_search::fuzzy_search_best_n,
    tracing::debug,
};

/// The result of parsing a command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The tokens, sorted into positionals, options and leftovers.
    Args(ParsedArgs),
    /// Usage information was requested.
    Help,
}

/// How similar an unknown flag must be to a declared one to be suggested.
const SUGGESTION_THRESHOLD: f32 = 0.5;

/// Parse `args`, the command line without the command name.
///
/// `-k value` and `--long value` give option values, `--` ends option
/// processing, and plain tokens fill the positional arguments in order before
/// spilling into the leftovers. With `handle_help`, an unclaimed `-h` or
/// `--help` ends parsing with [`ParseOutcome::Help`].
pub fn parse_tokens(
    info: &SpecInfo<'_>,
    args: &[&str],
    handle_help: bool,
) -> Result<ParseOutcome, ParseError> {
    let help_triggers = if handle_help { info.help_triggers() } else { Vec::new() };
    let mut parsed = ParsedArgs::new();
    let mut remaining_args = args;
    let mut positional_index = 0;
    let mut options_ended = false;

    while let Some(&next_arg) = remaining_args.first() {
        remaining_args = &remaining_args[1..];
        if !options_ended && help_triggers.contains(&next_arg) {
            debug!(target_type = info.name, trigger = next_arg, "help requested");
            return Ok(ParseOutcome::Help);
        }

        if !options_ended && is_flag(next_arg) {
            if next_arg == "--" {
                options_ended = true;
                continue;
            }
            parse_option(info, &mut parsed, next_arg, &mut remaining_args)?;
            continue;
        }

        if let Some(positional) = info.positionals.get(positional_index) {
            parsed.set_positional(positional.name, next_arg);
            positional_index += 1;
        } else if info.variadic_tail {
            parsed.push_leftover(next_arg);
        } else {
            return Err(ParseError::UnexpectedArgument { token: next_arg.to_string() });
        }
    }

    let missing: Vec<String> = info.positionals[positional_index..]
        .iter()
        .filter(|positional| positional.mandatory)
        .map(|positional| positional.name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ParseError::MissingArguments { names: missing });
    }

    Ok(ParseOutcome::Args(parsed))
}

/// Whether `arg` looks like an option rather than a plain token. A lone `-`
/// and anything that reads as a number, such as `-3`, `-.5` or `-inf`, are
/// plain tokens. No declared key can be spelled that way.
fn is_flag(arg: &str) -> bool {
    match arg.strip_prefix('-') {
        None | Some("") => false,
        Some(_) => arg.parse::<f64>().is_err(),
    }
}

/// Parse a commandline option.
///
/// `arg`: the current option argument being parsed (e.g. `--foo`).
/// `remaining_args`: the remaining command line arguments. This slice
/// will be advanced forwards if the option takes a value argument.
fn parse_option(
    info: &SpecInfo<'_>,
    parsed: &mut ParsedArgs,
    arg: &str,
    remaining_args: &mut &[&str],
) -> Result<(), ParseError> {
    let option = info.find_option(arg).ok_or_else(|| unrecognized_argument(info, arg))?;

    if !option.expects_value {
        parsed.set_switch(option.key);
        return Ok(());
    }

    if parsed.is_present(option.key) {
        return Err(ParseError::DuplicateOption { option: arg.to_string() });
    }
    let value = remaining_args
        .first()
        .ok_or_else(|| ParseError::MissingOptionValue { option: arg.to_string() })?;
    *remaining_args = &remaining_args[1..];
    parsed.set_option(option.key, *value);
    Ok(())
}

fn unrecognized_argument(info: &SpecInfo<'_>, arg: &str) -> ParseError {
    let spellings = info.option_spellings();
    let candidates: Vec<&str> = spellings.iter().map(String::as_str).collect();
    let suggestion = fuzzy_search_best_n(arg, &candidates, 1)
        .into_iter()
        .find(|&(_, score)| score >= SUGGESTION_THRESHOLD)
        .map(|(candidate, _)| candidate.to_string());
    ParseError::UnknownOption { token: arg.to_string(), suggestion }
}
