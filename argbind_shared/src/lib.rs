// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Shared functionality between argbind_derive and the argbind runtime.
//!
//! This library holds the parser-facing view of an argument specification and
//! the key syntax rules that both the derive macro and the runtime enforce.

#![deny(missing_docs)]

mod help;

#[cfg(feature = "serde")]
use serde::Serialize;

/// The long flag that requests usage information.
pub const HELP_LONG: &str = "help";
/// The short flag that requests usage information.
pub const HELP_SHORT: char = 'h';

/// The specification of a command as seen by a token parser.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SpecInfo<'a> {
    /// The name of the target type.
    pub name: &'a str,
    /// A short description of the command's functionality.
    pub description: &'a str,
    /// Positional arguments, ordered by index.
    pub positionals: Vec<PositionalInfo<'a>>,
    /// Options and switches.
    pub options: Vec<OptionInfo<'a>>,
    /// Whether surplus plain tokens are collected instead of rejected.
    pub variadic_tail: bool,
}

/// A positional argument.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PositionalInfo<'a> {
    /// The display name, which is also the key of its value in a parsed model.
    pub name: &'a str,
    /// Whether parsing fails when the argument is missing.
    pub mandatory: bool,
    /// The description shown in usage output.
    pub description: &'a str,
}

/// An option or switch.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct OptionInfo<'a> {
    /// The short key, given as `-k`.
    pub key: char,
    /// The long key, given as `--long-key`.
    pub long_key: Option<&'a str>,
    /// The name of the field backing the option, used as the value name.
    pub name: &'a str,
    /// `false` for a switch, `true` for an option followed by a value.
    pub expects_value: bool,
    /// The description shown in usage output.
    pub description: &'a str,
}

impl OptionInfo<'_> {
    /// Whether `token` as typed on the command line names this option.
    pub fn matches(&self, token: &str) -> bool {
        if let Some(long) = token.strip_prefix("--") {
            return self.long_key == Some(long);
        }
        let mut chars = token.chars();
        chars.next() == Some('-') && chars.next() == Some(self.key) && chars.next().is_none()
    }

    /// The value placeholder shown in usage output.
    pub fn value_name(&self) -> &str {
        self.long_key.unwrap_or(self.name)
    }
}

impl<'a> SpecInfo<'a> {
    /// Find the option named by `token`, either `-k` or `--long-key`.
    pub fn find_option(&self, token: &str) -> Option<&OptionInfo<'a>> {
        self.options.iter().find(|option| option.matches(token))
    }

    /// All spellings of the declared options, used to suggest corrections.
    pub fn option_spellings(&self) -> Vec<String> {
        let mut spellings = Vec::with_capacity(self.options.len() * 2);
        for option in &self.options {
            spellings.push(format!("-{}", option.key));
            if let Some(long) = option.long_key {
                spellings.push(format!("--{}", long));
            }
        }
        spellings
    }

    /// The tokens that request usage information. A help spelling that is
    /// claimed by a declared option belongs to that option instead.
    pub fn help_triggers(&self) -> Vec<&'static str> {
        let mut triggers = Vec::with_capacity(2);
        if !self.options.iter().any(|option| option.key == HELP_SHORT) {
            triggers.push("-h");
        }
        if !self.options.iter().any(|option| option.long_key == Some(HELP_LONG)) {
            triggers.push("--help");
        }
        triggers
    }
}

/// Check that `key` can be used as a short key.
pub fn check_short_key(key: char) -> Result<(), String> {
    if key.is_ascii_alphanumeric() {
        Ok(())
    } else {
        Err(format!("short key `{}` must be an ASCII letter or digit", key.escape_default()))
    }
}

/// Check that `key` can be used as a long key (without the leading `--`).
pub fn check_long_key(key: &str) -> Result<(), String> {
    if key.is_empty() {
        return Err("long key must not be empty".to_string());
    }
    if key.starts_with('-') {
        return Err(format!("long key `{}` must be given without leading dashes", key));
    }
    if let Some(bad) = key.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_')) {
        return Err(format!(
            "long key `{}` contains `{}`; only ASCII letters, digits, `-` and `_` are allowed",
            key,
            bad.escape_default()
        ));
    }
    Ok(())
}

/// Indentation of entries in usage output.
pub const INDENT: &str = "  ";
const DESCRIPTION_INDENT: usize = 20;
const WRAP_WIDTH: usize = 80;

/// Write an entry name and its description to an output string.
pub fn write_description(out: &mut String, name: &str, description: &str) {
    let mut current_line = INDENT.to_string();
    current_line.push_str(name);

    if description.is_empty() {
        new_line(&mut current_line, out);
        return;
    }

    if !indent_description(&mut current_line) {
        // Start the description on a new line if the names already
        // add up to more than DESCRIPTION_INDENT.
        new_line(&mut current_line, out);
    }

    let mut words = description.split(' ').peekable();
    while let Some(first_word) = words.next() {
        indent_description(&mut current_line);
        current_line.push_str(first_word);

        'inner: while let Some(&word) = words.peek() {
            if (char_len(&current_line) + char_len(word) + 1) > WRAP_WIDTH {
                new_line(&mut current_line, out);
                break 'inner;
            } else {
                // advance the iterator
                let _ = words.next();
                current_line.push(' ');
                current_line.push_str(word);
            }
        }
    }
    new_line(&mut current_line, out);
}

// Indent the current line in to DESCRIPTION_INDENT chars.
// Returns a boolean indicating whether or not spacing was added.
fn indent_description(line: &mut String) -> bool {
    let cur_len = char_len(line);
    if cur_len < DESCRIPTION_INDENT {
        let num_spaces = DESCRIPTION_INDENT - cur_len;
        line.extend(std::iter::repeat(' ').take(num_spaces));
        true
    } else {
        false
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

// Append a newline and the current line to the output,
// clearing the current line.
fn new_line(current_line: &mut String, out: &mut String) {
    out.push('\n');
    out.push_str(current_line);
    current_line.truncate(0);
}

#[cfg(test)]
mod test {
    use super::*;

    fn verbose() -> OptionInfo<'static> {
        OptionInfo {
            key: 'v',
            long_key: Some("verbose"),
            name: "verbose",
            expects_value: false,
            description: "",
        }
    }

    #[test]
    fn option_matches_short_and_long_spellings() {
        let option = verbose();
        assert!(option.matches("-v"));
        assert!(option.matches("--verbose"));
        assert!(!option.matches("-vv"));
        assert!(!option.matches("--v"));
        assert!(!option.matches("v"));
    }

    #[test]
    fn claimed_help_spellings_are_not_triggers() {
        let mut info = SpecInfo::default();
        assert_eq!(info.help_triggers(), vec!["-h", "--help"]);

        info.options.push(OptionInfo { key: 'h', long_key: Some("host"), ..verbose() });
        assert_eq!(info.help_triggers(), vec!["--help"]);
    }

    #[test]
    fn key_syntax() {
        assert!(check_short_key('v').is_ok());
        assert!(check_short_key('7').is_ok());
        assert!(check_short_key('-').is_err());
        assert!(check_short_key(' ').is_err());

        assert!(check_long_key("dry-run").is_ok());
        assert!(check_long_key("dry_run").is_ok());
        assert!(check_long_key("").is_err());
        assert!(check_long_key("--dry-run").is_err());
        assert!(check_long_key("dry run").is_err());
    }

    #[test]
    fn long_descriptions_wrap() {
        let mut out = String::new();
        write_description(
            &mut out,
            "-f, --force",
            "force, ignore minor errors. This description is so long that it wraps to the next line.",
        );
        assert_eq!(
            out,
            "\n  -f, --force       force, ignore minor errors. This description is so long that\n                    it wraps to the next line."
        );
    }
}
