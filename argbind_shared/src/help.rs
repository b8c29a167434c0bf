// Copyright (c) 2022 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use super::{write_description, OptionInfo, PositionalInfo, SpecInfo};

const SECTION_SEPARATOR: &str = "\n\n";

const HELP_DESCRIPTION: &str = "display usage information";

impl SpecInfo<'_> {
    /// Render the usage message for this specification.
    ///
    /// `command_name` is the identifier of the current command, treating each
    /// segment as space-separated. The help line is only listed when
    /// `handle_help` is set.
    pub fn usage(&self, command_name: &[&str], handle_help: bool) -> String {
        let mut out = format!("Usage: {}", command_name.join(" "));

        for positional in &self.positionals {
            out.push(' ');
            positional_usage(&mut out, positional);
        }

        for option in &self.options {
            out.push(' ');
            option_usage(&mut out, option);
        }

        if self.variadic_tail {
            out.push_str(" [<args>...]");
        }

        if !self.description.is_empty() {
            out.push_str(SECTION_SEPARATOR);
            out.push_str(self.description);
        }

        if self.positionals.iter().any(|positional| !positional.description.is_empty()) {
            out.push_str(SECTION_SEPARATOR);
            out.push_str("Positional Arguments:");
            for positional in &self.positionals {
                write_description(&mut out, positional.name, positional.description);
            }
        }

        let triggers = if handle_help { self.help_triggers() } else { Vec::new() };
        if !self.options.is_empty() || !triggers.is_empty() {
            out.push_str(SECTION_SEPARATOR);
            out.push_str("Options:");
            for option in &self.options {
                option_description(&mut out, option);
            }

            // Also include "help"
            if !triggers.is_empty() {
                write_description(&mut out, &triggers.join(", "), HELP_DESCRIPTION);
            }
        }

        out.push('\n');
        out
    }
}

/// Add positional arguments like `[<foo>]` to a usage line.
fn positional_usage(out: &mut String, positional: &PositionalInfo<'_>) {
    if !positional.mandatory {
        out.push('[');
    }
    out.push('<');
    out.push_str(positional.name);
    out.push('>');
    if !positional.mandatory {
        out.push(']');
    }
}

/// Add options like `[-f <foo>]` to a usage line. Options are never required.
fn option_usage(out: &mut String, option: &OptionInfo<'_>) {
    out.push_str("[-");
    out.push(option.key);
    if option.expects_value {
        out.push_str(" <");
        out.push_str(option.value_name());
        out.push('>');
    }
    out.push(']');
}

/// Describes an option like this:
///  -f, --force       force, ignore minor errors. This description
///                    is so long that it wraps to the next line.
fn option_description(out: &mut String, option: &OptionInfo<'_>) {
    let mut name = String::new();
    name.push('-');
    name.push(option.key);
    if let Some(long) = option.long_key {
        name.push_str(", --");
        name.push_str(long);
    }
    write_description(out, &name, option.description);
}
