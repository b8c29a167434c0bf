// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

// Deny a bunch of uncommon clippy lints to make sure the generated code won't trigger a warning.
#![deny(
    clippy::indexing_slicing,
    clippy::panic_in_result_fn,
    clippy::str_to_string,
    clippy::unreachable,
    clippy::unwrap_in_result
)]

use {
    argbind::{
        BindConfig, Bindable, Binder, Error, Outcome, ParseError, ParsedArgs, Specification,
        TypeAdapter, ValueError,
    },
    once_cell::sync::Lazy,
    std::fmt::Debug,
};

#[test]
fn basic_example() {
    #[derive(Bindable, Default, PartialEq, Debug)]
    /// Copy a file.
    struct CopyFile {
        /// the file to copy
        #[bind(positional(index = 0))]
        source: String,

        #[bind(positional(index = 1, optional))]
        target: Option<String>,

        /// overwrite an existing target
        #[bind(option(key = 'f', long))]
        force: bool,

        /// permission bits
        #[bind(option(key = 'm', value))]
        mode: Option<u32>,
    }

    let copy = CopyFile::from_args(&["cp"], &["a.txt", "-m", "644"]).expect("failed copy");
    assert_eq!(
        copy,
        CopyFile { source: "a.txt".into(), target: None, force: false, mode: Some(644) }
    );

    assert_help_string::<CopyFile>(
        r###"Usage: test_arg_0 <source> [<target>] [-f] [-m <mode>]

Copy a file.

Positional Arguments:
  source            the file to copy
  target

Options:
  -f, --force       overwrite an existing target
  -m                permission bits
  -h, --help        display usage information
"###,
    );
}

fn assert_help_string<T: Bindable>(help_str: &str) {
    match T::from_args(&["test_arg_0"], &["--help"]) {
        Ok(_) => panic!("help was parsed as args"),
        Err(e) => {
            assert_eq!(help_str, e.output);
            e.status.expect("help returned an error");
        }
    }
}

fn assert_output<T: Bindable + Debug + PartialEq>(args: &[&str], expected: T) {
    let t = T::from_args(&["cmd"], args).expect("failed to parse");
    assert_eq!(t, expected);
}

fn assert_error<T: Bindable + Debug>(args: &[&str], err_msg: &str) {
    let e = T::from_args(&["cmd"], args).expect_err("unexpectedly succeeded parsing");
    assert_eq!(err_msg, e.output);
    e.status.expect_err("error had a positive status");
}

mod scenarios {
    use super::*;

    #[derive(Bindable, Default, Debug, PartialEq)]
    /// One positional and one switch.
    struct NameAndSwitch {
        #[bind(positional(index = 0))]
        name: String,
        #[bind(option(key = 'v'))]
        v: bool,
    }

    static NAME_AND_SWITCH: Lazy<Binder<NameAndSwitch>> =
        Lazy::new(|| Binder::new().expect("valid specification"));

    fn bind(args: &[&str]) -> Result<NameAndSwitch, Error> {
        match NAME_AND_SWITCH.parse(args)? {
            Outcome::Bound(bound) => Ok(bound),
            Outcome::Help => panic!("unexpected help request"),
        }
    }

    #[test]
    fn switch_given() {
        assert_eq!(bind(&["foo", "-v"]), Ok(NameAndSwitch { name: "foo".into(), v: true }));
    }

    #[test]
    fn switch_absent() {
        assert_eq!(bind(&["foo"]), Ok(NameAndSwitch { name: "foo".into(), v: false }));
    }

    #[test]
    fn shared_binder_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                std::thread::spawn(move || {
                    let name = format!("worker-{}", i);
                    bind(&[&name]).map(|bound| bound.name == name)
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().expect("thread panicked"), Ok(true));
        }
    }

    #[derive(Bindable, Debug, PartialEq)]
    struct NameAndCount {
        #[bind(positional(index = 0))]
        name: String,
        #[bind(positional(index = 1, optional))]
        n: i32,
    }

    impl Default for NameAndCount {
        fn default() -> Self {
            NameAndCount { name: String::new(), n: -1 }
        }
    }

    #[derive(Bindable, Debug, PartialEq)]
    struct AllOptional {
        #[bind(positional(index = 0, optional))]
        name: String,
        #[bind(positional(index = 1, optional))]
        n: i32,
    }

    impl Default for AllOptional {
        fn default() -> Self {
            AllOptional { name: "unnamed".into(), n: -1 }
        }
    }

    #[test]
    fn missing_mandatory_positional_is_a_parse_error() {
        assert_eq!(
            argbind::parse_args::<NameAndCount>(&[], BindConfig::default()),
            Err(Error::Parse(ParseError::MissingArguments { names: vec!["name".into()] }))
        );
        assert_output(&["x"], NameAndCount { name: "x".into(), n: -1 });
    }

    #[test]
    fn optional_positionals_keep_defaults() {
        assert_output(&[], AllOptional::default());
        assert_output(&["x", "7"], AllOptional { name: "x".into(), n: 7 });
    }

    #[derive(Bindable, Default, Debug, PartialEq)]
    struct WithBlockSize {
        #[bind(positional(index = 0))]
        file: String,
        #[bind(option(key = 'b', value))]
        b: i64,
    }

    #[test]
    fn value_option() {
        assert_output(&["x", "-b", "1024"], WithBlockSize { file: "x".into(), b: 1024 });
        assert_eq!(
            argbind::parse_args::<WithBlockSize>(&["x", "-b"], BindConfig::default()),
            Err(Error::Parse(ParseError::MissingOptionValue { option: "-b".into() }))
        );
    }

    #[derive(Bindable, Default, Debug, PartialEq)]
    struct WithTail {
        #[bind(positional(index = 0))]
        first: String,
        #[bind(tail, adapter = "argbind::FromStrAdapter<String>")]
        rest: Vec<String>,
    }

    #[test]
    fn variadic_tail() {
        assert_output(
            &["x", "a", "b", "c"],
            WithTail { first: "x".into(), rest: vec!["a".into(), "b".into(), "c".into()] },
        );
        assert_output(&["x"], WithTail { first: "x".into(), rest: vec![] });
    }
}

mod adapters {
    use {super::*, std::time::Duration};

    /// Parses durations like `30s` or `250ms`.
    #[derive(Default)]
    struct HumanDuration;

    impl TypeAdapter for HumanDuration {
        type Output = Duration;

        fn parse(&self, text: &str) -> Result<Duration, String> {
            let (digits, unit) = text
                .find(|c: char| !c.is_ascii_digit())
                .map(|split| text.split_at(split))
                .ok_or_else(|| format!("missing unit in `{}`", text))?;
            let amount: u64 = digits.parse().map_err(|e| format!("{}", e))?;
            match unit {
                "ms" => Ok(Duration::from_millis(amount)),
                "s" => Ok(Duration::from_secs(amount)),
                _ => Err(format!("unknown unit `{}`", unit)),
            }
        }
    }

    fn parse_level(text: &str) -> Result<u8, String> {
        match text {
            "low" => Ok(1),
            "high" => Ok(9),
            _ => Err("expected `low` or `high`".into()),
        }
    }

    #[derive(Bindable, Debug, PartialEq)]
    struct Fetch {
        #[bind(positional(index = 0))]
        url: String,
        #[bind(option(key = 't', long, value), adapter = "HumanDuration")]
        timeout: Option<Duration>,
        #[bind(option(key = 'd', long = "delay", value), adapter = "HumanDuration")]
        retry_delay: Duration,
        #[bind(option(key = 'l', value), from_str_fn(parse_level))]
        level: u8,
        #[bind(tail, from_str_fn(parse_level))]
        extra_levels: std::collections::VecDeque<u8>,
    }

    impl Default for Fetch {
        fn default() -> Self {
            Fetch {
                url: String::new(),
                timeout: None,
                retry_delay: Duration::from_secs(1),
                level: 5,
                extra_levels: Default::default(),
            }
        }
    }

    #[test]
    fn adapter_results_are_assigned() {
        assert_output(
            &["example.com", "--timeout", "30s", "-d", "250ms", "-l", "high", "low", "high"],
            Fetch {
                url: "example.com".into(),
                timeout: Some(Duration::from_secs(30)),
                retry_delay: Duration::from_millis(250),
                level: 9,
                extra_levels: vec![1, 9].into(),
            },
        );
    }

    #[test]
    fn absent_options_keep_defaults() {
        assert_output(&["example.com"], Fetch { url: "example.com".into(), ..Fetch::default() });
    }

    #[test]
    fn adapter_failures_are_value_errors() {
        let err = argbind::parse_args::<Fetch>(&["x", "-t", "30"], BindConfig::default())
            .expect_err("unexpectedly succeeded parsing");
        match err {
            Error::Value(ValueError::Conversion { field, token, message, .. }) => {
                assert_eq!(field, "timeout");
                assert_eq!(token, "30");
                assert_eq!(message, "missing unit in `30`");
            }
            other => panic!("unexpected error {:?}", other),
        }

        assert_error::<Fetch>(
            &["x", "extreme"],
            "cannot convert 'extreme' for field `extra_levels` to `u8`: expected `low` or `high`",
        );
    }
}

mod options {
    use super::*;

    #[derive(Bindable, Default, Debug, PartialEq)]
    /// Connect to a server.
    struct Connect {
        /// the server to connect to
        #[bind(option(key = 'h', long = "host", value))]
        host: Option<String>,
        /// port number
        #[bind(option(key = 'p', long, value))]
        port: u16,
        /// print more output
        #[bind(option(key = 'v', long))]
        verbose: bool,
        /// skip certificate checks
        #[bind(option(key = 'k', long))]
        dangerously_skip_checks: bool,
    }

    #[test]
    fn short_and_long_spellings() {
        assert_output(
            &["-h", "example.com", "--port", "8080", "-v", "--verbose"],
            Connect {
                host: Some("example.com".into()),
                port: 8080,
                verbose: true,
                dangerously_skip_checks: false,
            },
        );
        assert_output(
            &["--dangerously-skip-checks"],
            Connect { dangerously_skip_checks: true, ..Connect::default() },
        );
    }

    #[test]
    fn claimed_short_help_flag() {
        assert_help_string::<Connect>(
            r###"Usage: test_arg_0 [-h <host>] [-p <port>] [-v] [-k]

Connect to a server.

Options:
  -h, --host        the server to connect to
  -p, --port        port number
  -v, --verbose     print more output
  -k, --dangerously-skip-checks
                    skip certificate checks
  --help            display usage information
"###,
        );
    }

    #[test]
    fn duplicate_value_option() {
        assert_error::<Connect>(&["-p", "1", "-p", "2"], "Option '-p' was provided more than once.");
    }

    #[test]
    fn unknown_option_with_suggestion() {
        assert_error::<Connect>(
            &["--verbos"],
            "Unrecognized argument: --verbos\nDid you mean '--verbose'?",
        );
        assert_error::<Connect>(&["-x"], "Unrecognized argument: -x");
    }

    #[test]
    fn invalid_value() {
        let err = argbind::parse_args::<Connect>(&["-p", "http"], BindConfig::default())
            .expect_err("unexpectedly succeeded parsing");
        assert!(matches!(
            err,
            Error::Value(ValueError::Conversion { field: "port", ref token, .. }) if token == "http"
        ));
    }
}

mod positional {
    use super::*;

    #[derive(Bindable, Default, Debug, PartialEq)]
    struct Move {
        /// where to move to
        #[bind(positional(index = 1, name = "to"))]
        destination: String,
        /// where to move from
        #[bind(positional(index = 0, name = "from", description = "the source path"))]
        source: String,
        /// not bound from the command line
        cache: Vec<u8>,
    }

    #[test]
    fn bound_in_index_order() {
        assert_output(
            &["a", "b"],
            Move { source: "a".into(), destination: "b".into(), cache: vec![] },
        );
    }

    #[test]
    fn display_names_in_errors() {
        assert_error::<Move>(&[], "Required positional arguments not provided:\n    from\n    to");
        assert_error::<Move>(&["a", "b", "c"], "Unexpected positional argument: c");
    }

    #[test]
    fn explicit_description_wins() {
        let binder = Binder::<Move>::new().expect("valid specification");
        assert_eq!(binder.specification().unannotated(), &["cache"]);
        assert_eq!(
            binder.usage(&["mv"]),
            r###"Usage: mv <from> <to>

Positional Arguments:
  from              the source path
  to                where to move to

Options:
  -h, --help        display usage information
"###
        );
    }

    #[test]
    fn negative_numbers_are_values() {
        #[derive(Bindable, Default, Debug, PartialEq)]
        struct Offset {
            #[bind(positional(index = 0))]
            offset: f64,
        }

        assert_output(&["-2.5"], Offset { offset: -2.5 });
    }
}

mod flatten {
    use super::*;

    #[derive(Bindable, Default, Debug, PartialEq)]
    struct Verbosity {
        /// more output
        #[bind(option(key = 'v', long))]
        verbose: bool,
        /// less output
        #[bind(option(key = 'q', long))]
        quiet: bool,
    }

    #[derive(Bindable, Default, Debug, PartialEq)]
    /// Build a target.
    struct Build {
        #[bind(flatten)]
        verbosity: Verbosity,
        #[bind(positional(index = 0))]
        target: String,
        /// number of parallel jobs
        #[bind(option(key = 'j', value))]
        jobs: Option<u32>,
    }

    #[test]
    fn embedded_fields_are_bound() {
        assert_output(
            &["--quiet", "all"],
            Build {
                verbosity: Verbosity { verbose: false, quiet: true },
                target: "all".into(),
                jobs: None,
            },
        );
    }

    #[test]
    fn embedded_fields_come_last() {
        let spec = Specification::<Build>::build().expect("valid specification");
        let keys: Vec<char> = spec.options().iter().map(|option| option.key()).collect();
        assert_eq!(keys, vec!['j', 'v', 'q']);
    }
}

mod help {
    use super::*;

    #[derive(Bindable, Default, Debug, PartialEq)]
    struct Greet {
        #[bind(positional(index = 0))]
        name: String,
    }

    #[test]
    fn help_can_be_disabled() {
        let binder = Binder::<Greet>::with_config(BindConfig::default().handle_help(false))
            .expect("valid specification");
        assert!(!binder.config().handles_help());
        assert_eq!(
            binder.parse(&["--help"]),
            Err(Error::Parse(ParseError::UnknownOption {
                token: "--help".into(),
                suggestion: None
            }))
        );
    }

    #[test]
    fn usage_follows_help_handling() {
        let binder = Binder::<Greet>::new().expect("valid specification");
        assert_eq!(
            binder.usage(&["greet"]),
            "Usage: greet <name>\n\nOptions:\n  -h, --help        display usage information\n"
        );

        let binder = Binder::<Greet>::with_config(BindConfig::default().handle_help(false))
            .expect("valid specification");
        assert_eq!(binder.usage(&["greet"]), "Usage: greet <name>\n");
        assert!(!binder.usage(&["greet"]).contains("--help"));
    }

    #[test]
    fn help_short_circuits_errors() {
        assert_eq!(
            argbind::parse_args::<Greet>(&["-h"], BindConfig::default()),
            Ok(Outcome::Help)
        );
        assert_eq!(
            argbind::parse_args::<Greet>(&["-h", "--bogus"], BindConfig::default()),
            Ok(Outcome::Help)
        );
    }

    #[test]
    fn help_after_double_dash_is_a_value() {
        assert_output(&["--", "--help"], Greet { name: "--help".into() });
    }
}

mod model {
    use super::*;

    #[derive(Bindable, Default, Debug, PartialEq)]
    struct Job {
        #[bind(positional(index = 0))]
        name: String,
        #[bind(option(key = 'r', value))]
        retries: Option<u8>,
        #[bind(option(key = 'f'))]
        force: bool,
    }

    #[test]
    fn bind_from_a_hand_built_model() {
        let spec = Specification::<Job>::build().expect("valid specification");
        let mut model = ParsedArgs::new();
        model.set_positional("name", "nightly").set_option('r', "3").set_switch('f');
        assert_eq!(
            spec.bind_new(&model),
            Ok(Job { name: "nightly".into(), retries: Some(3), force: true })
        );
    }

    #[test]
    fn bind_into_an_existing_target() {
        let spec = Specification::<Job>::build().expect("valid specification");
        let mut job = Job { name: "kept".into(), retries: Some(9), force: true };
        spec.bind(&ParsedArgs::new(), &mut job).expect("bind failed");
        // Switches always reflect presence; absent values keep what was there.
        assert_eq!(job, Job { name: "kept".into(), retries: Some(9), force: false });
    }
}
