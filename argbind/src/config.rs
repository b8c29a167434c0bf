// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

/// Settings for one [`Binder`](crate::Binder).
///
/// ```rust
/// # use argbind::BindConfig;
/// let config = BindConfig::default().handle_help(false);
/// assert!(!config.handles_help());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BindConfig {
    handle_help: bool,
}

impl Default for BindConfig {
    fn default() -> Self {
        BindConfig { handle_help: true }
    }
}

impl BindConfig {
    /// Whether `-h` and `--help` produce usage information instead of being
    /// parsed like any other token. On by default.
    pub fn handle_help(mut self, handle_help: bool) -> Self {
        self.handle_help = handle_help;
        self
    }

    /// See [`BindConfig::handle_help`].
    pub fn handles_help(&self) -> bool {
        self.handle_help
    }
}
