// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use argbind::Bindable;

/// Fields named after keywords bind under their plain names.
#[derive(Bindable, Default)]
struct Cmd {
    #[bind(positional(index = 0))]
    r#type: String,

    /// move instead of copying
    #[bind(option(key = 'm', long))]
    r#move: bool,
}

fn main() {
    let cmd = Cmd::from_args(&["cmd"], &["file", "--move"]).unwrap();
    assert_eq!(cmd.r#type, "file");
    assert!(cmd.r#move);

    let spec = argbind::Specification::<Cmd>::build().unwrap();
    assert_eq!(spec.positionals()[0].field(), "type");
    assert_eq!(spec.options()[0].long_key(), Some("move"));
}
