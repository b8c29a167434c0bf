// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::collections::HashMap;

/// The flat result of parsing a command line, consumed by the binder.
///
/// Positional arguments are looked up by display name and options by short
/// key.
pub trait ParsedModel {
    /// The token given for the positional argument `name`.
    fn positional_value(&self, name: &str) -> Option<&str>;

    /// The token given as the value of the option `key`.
    fn option_value(&self, key: char) -> Option<&str>;

    /// Whether the option `key` was given at all.
    fn is_present(&self, key: char) -> bool;

    /// The plain tokens left after all positional arguments, in order.
    fn leftover_tokens(&self) -> &[String];
}

/// The parsed model produced by [`parse_tokens`](crate::parser::parse_tokens).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    positionals: HashMap<String, String>,
    // `None` for a switch.
    options: HashMap<char, Option<String>>,
    leftovers: Vec<String>,
}

impl ParsedArgs {
    /// An empty model: nothing was given.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` for the positional argument `name`.
    pub fn set_positional(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.positionals.insert(name.into(), value.into());
        self
    }

    /// Record that the switch `key` was given.
    pub fn set_switch(&mut self, key: char) -> &mut Self {
        self.options.entry(key).or_insert(None);
        self
    }

    /// Record `value` for the option `key`.
    pub fn set_option(&mut self, key: char, value: impl Into<String>) -> &mut Self {
        self.options.insert(key, Some(value.into()));
        self
    }

    /// Append a plain token to the leftovers.
    pub fn push_leftover(&mut self, token: impl Into<String>) -> &mut Self {
        self.leftovers.push(token.into());
        self
    }
}

impl ParsedModel for ParsedArgs {
    fn positional_value(&self, name: &str) -> Option<&str> {
        self.positionals.get(name).map(String::as_str)
    }

    fn option_value(&self, key: char) -> Option<&str> {
        self.options.get(&key).and_then(Option::as_deref)
    }

    fn is_present(&self, key: char) -> bool {
        self.options.contains_key(&key)
    }

    fn leftover_tokens(&self) -> &[String] {
        &self.leftovers
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn switches_are_present_without_a_value() {
        let mut model = ParsedArgs::new();
        model.set_switch('v').set_option('b', "1024");

        assert!(model.is_present('v'));
        assert_eq!(model.option_value('v'), None);
        assert!(model.is_present('b'));
        assert_eq!(model.option_value('b'), Some("1024"));
        assert!(!model.is_present('x'));
    }

    #[test]
    fn positionals_and_leftovers() {
        let mut model = ParsedArgs::new();
        model.set_positional("name", "foo").push_leftover("a").push_leftover("b");

        assert_eq!(model.positional_value("name"), Some("foo"));
        assert_eq!(model.positional_value("other"), None);
        assert_eq!(model.leftover_tokens(), &["a".to_string(), "b".to_string()]);
    }
}
