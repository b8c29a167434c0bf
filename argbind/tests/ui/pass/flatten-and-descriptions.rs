// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use argbind::Bindable;

#[derive(Bindable, Default)]
struct Common {
    /// print more output
    #[bind(option(key = 'v', long))]
    verbose: bool,
}

#[derive(Bindable, Default)]
#[bind(description = "Run a job.")]
/// This doc comment is replaced by the explicit description.
struct Run {
    #[bind(flatten)]
    common: Common,

    /// the job to run
    #[bind(positional(index = 0, name = "JOB"))]
    job: String,

    /// how many times to retry
    #[bind(option(key = 'r', long = "retries", value, description = "retry count"))]
    retries: Option<u8>,
}

fn main() {
    assert_eq!(Run::description(), "Run a job.");

    let run = Run::from_args(&["run"], &["nightly", "-r", "2", "--verbose"]).unwrap();
    assert!(run.common.verbose);
    assert_eq!(run.job, "nightly");
    assert_eq!(run.retries, Some(2));

    let binder = argbind::Binder::<Run>::new().unwrap();
    let usage = binder.usage(&["run"]);
    assert!(usage.starts_with("Usage: run <JOB> [-r <retries>] [-v]\n\nRun a job.\n"));
    assert!(usage.contains("  -r, --retries     retry count\n"));
    assert!(usage.contains("  JOB               the job to run\n"));
}
