// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use {
    argbind::{Bindable, TypeAdapter},
    std::{net::Ipv4Addr, time::Duration},
    tracing_subscriber::EnvFilter,
};

#[derive(Bindable, Default, Debug)]
/// Reach new heights.
struct GoUp {
    /// the pilot's name
    #[bind(positional(index = 0))]
    pilot: String,

    /// whether or not to jump
    #[bind(option(key = 'j', long))]
    jump: bool,

    /// how high to go
    #[bind(option(key = 'H', long, value))]
    height: Option<u32>,

    /// how long to hover, like `30s`
    #[bind(option(key = 'w', long = "wait", value), adapter = "Seconds")]
    hover: Option<Duration>,

    /// control towers to notify
    #[bind(tail, adapter = "argbind::FromStrAdapter<Ipv4Addr>")]
    towers: Vec<Ipv4Addr>,
}

#[derive(Default)]
struct Seconds;

impl TypeAdapter for Seconds {
    type Output = Duration;

    fn parse(&self, text: &str) -> Result<Duration, String> {
        let seconds = text.strip_suffix('s').ok_or("expected a number of seconds like `30s`")?;
        seconds.parse().map(Duration::from_secs).map_err(|e| e.to_string())
    }
}

fn main() {
    // `RUST_LOG=argbind=trace` shows how each field is bound.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let up: GoUp = argbind::from_env();
    println!("Options: {:?}", up);
}
