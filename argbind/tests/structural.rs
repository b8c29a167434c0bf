// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Malformed records are rejected when their specification is built.

use {
    argbind::{
        Adapter, Bindable, Binder, Declaration, FieldDecl, FromStrAdapter, OptionTag, Role,
        RoleKind, Specification, StructuralError,
    },
    std::{any::type_name, path::PathBuf},
};

fn build_error<T: Bindable>() -> StructuralError {
    match Specification::<T>::build() {
        Ok(_) => panic!("`{}` unexpectedly built", type_name::<T>()),
        Err(e) => e,
    }
}

#[test]
fn positional_and_option_conflict() {
    #[derive(Bindable, Default)]
    struct Conflict {
        #[bind(positional(index = 0), option(key = 'n', value))]
        name: String,
    }

    assert_eq!(
        build_error::<Conflict>(),
        StructuralError::ConflictingRoles {
            type_name: type_name::<Conflict>(),
            field: "name",
            first: RoleKind::Positional,
            second: RoleKind::Option,
        }
    );
}

#[test]
fn role_of_a_single_declaration() {
    #[derive(Default)]
    struct Raw {
        rest: Vec<String>,
    }

    let tail = FieldDecl::<Raw, Vec<String>>::new("rest", |raw| &mut raw.rest).tail();
    assert_eq!(tail.role(), Ok(Role::VariadicTail));

    let conflicting = FieldDecl::<Raw, Vec<String>>::new("rest", |raw| &mut raw.rest)
        .tail()
        .option(OptionTag::new('r'));
    assert!(matches!(
        conflicting.role(),
        Err(StructuralError::ConflictingRoles {
            first: RoleKind::Option,
            second: RoleKind::VariadicTail,
            ..
        })
    ));

    let bare = FieldDecl::<Raw, Vec<String>>::new("rest", |raw| &mut raw.rest);
    assert_eq!(bare.role(), Ok(Role::Unannotated));
}

#[test]
fn gap_between_indices() {
    #[derive(Bindable, Default)]
    struct Gap {
        #[bind(positional(index = 0))]
        first: String,
        #[bind(positional(index = 2))]
        third: String,
    }

    assert_eq!(
        build_error::<Gap>(),
        StructuralError::PositionalIndex {
            type_name: type_name::<Gap>(),
            field: "third",
            expected: 1,
            actual: 2,
        }
    );
}

#[test]
fn indices_must_start_at_zero() {
    #[derive(Bindable, Default)]
    struct OneBased {
        #[bind(positional(index = 1))]
        first: String,
    }

    assert!(matches!(
        build_error::<OneBased>(),
        StructuralError::PositionalIndex { field: "first", expected: 0, actual: 1, .. }
    ));
}

#[test]
fn duplicate_index_reports_the_later_field() {
    #[derive(Bindable, Default)]
    struct Twice {
        #[bind(positional(index = 0))]
        a: String,
        #[bind(positional(index = 0))]
        b: String,
    }

    assert!(matches!(
        build_error::<Twice>(),
        StructuralError::PositionalIndex { field: "b", expected: 1, actual: 0, .. }
    ));
}

#[test]
fn contiguous_indices_in_any_declaration_order() {
    #[derive(Bindable, Default, Debug, PartialEq)]
    struct Shuffled {
        #[bind(positional(index = 2, optional))]
        c: u8,
        #[bind(positional(index = 0))]
        a: u8,
        #[bind(positional(index = 1))]
        b: u8,
    }

    let spec = Specification::<Shuffled>::build().expect("valid specification");
    let order: Vec<(usize, &str)> =
        spec.positionals().iter().map(|p| (p.index(), p.field())).collect();
    assert_eq!(order, vec![(0, "a"), (1, "b"), (2, "c")]);
}

#[test]
fn switch_must_be_bool() {
    #[derive(Bindable, Default)]
    struct Count {
        #[bind(option(key = 'c'))]
        count: u32,
    }

    assert_eq!(
        build_error::<Count>(),
        StructuralError::SwitchNotBool {
            type_name: type_name::<Count>(),
            field: "count",
            field_type: type_name::<u32>(),
        }
    );
}

#[test]
fn type_without_conversion() {
    #[derive(Bindable, Default)]
    struct Paths {
        #[bind(option(key = 'p', value))]
        path: PathBuf,
    }

    assert_eq!(
        build_error::<Paths>(),
        StructuralError::UnsupportedType {
            type_name: type_name::<Paths>(),
            field: "path",
            field_type: type_name::<PathBuf>(),
        }
    );
}

#[test]
fn adapter_makes_any_type_supported() {
    #[derive(Bindable, Default)]
    struct Paths {
        #[bind(option(key = 'p', value), adapter = "FromStrAdapter<PathBuf>")]
        path: PathBuf,
        #[bind(positional(index = 0, optional), adapter = "FromStrAdapter<PathBuf>")]
        root: Option<PathBuf>,
    }

    assert!(Specification::<Paths>::build().is_ok());
}

#[test]
fn tail_needs_an_adapter() {
    #[derive(Bindable, Default)]
    struct Rest {
        #[bind(tail)]
        rest: Vec<String>,
    }

    assert_eq!(
        build_error::<Rest>(),
        StructuralError::TailWithoutAdapter { type_name: type_name::<Rest>(), field: "rest" }
    );
}

#[test]
fn only_one_tail() {
    #[derive(Bindable, Default)]
    struct TwoTails {
        #[bind(tail, adapter = "FromStrAdapter<String>")]
        first: Vec<String>,
        #[bind(tail, adapter = "FromStrAdapter<String>")]
        second: Vec<String>,
    }

    assert_eq!(
        build_error::<TwoTails>(),
        StructuralError::DuplicateTail {
            type_name: type_name::<TwoTails>(),
            first: "first",
            second: "second",
        }
    );
}

#[test]
fn adapter_output_must_match() {
    #[derive(Bindable, Default)]
    struct Narrow {
        #[bind(option(key = 'n', value), adapter = "FromStrAdapter<u8>")]
        n: u16,
    }

    assert_eq!(
        build_error::<Narrow>(),
        StructuralError::AdapterMismatch {
            type_name: type_name::<Narrow>(),
            field: "n",
            expected: type_name::<u16>(),
            adapter_output: type_name::<u8>(),
        }
    );

    #[derive(Bindable, Default)]
    struct WrongItems {
        #[bind(tail, adapter = "FromStrAdapter<u8>")]
        items: Vec<String>,
    }

    assert_eq!(
        build_error::<WrongItems>(),
        StructuralError::AdapterMismatch {
            type_name: type_name::<WrongItems>(),
            field: "items",
            expected: type_name::<String>(),
            adapter_output: type_name::<u8>(),
        }
    );
}

#[test]
fn short_keys_are_unique() {
    #[derive(Bindable, Default)]
    struct SameShort {
        #[bind(option(key = 'v'))]
        verbose: bool,
        #[bind(option(key = 'v', value))]
        version: Option<String>,
    }

    assert_eq!(
        build_error::<SameShort>(),
        StructuralError::DuplicateKey {
            type_name: type_name::<SameShort>(),
            field: "version",
            other: "verbose",
            key: "-v".into(),
        }
    );
}

#[test]
fn long_keys_are_unique() {
    #[derive(Bindable, Default)]
    struct SameLong {
        #[bind(option(key = 'a', long = "all"))]
        all: bool,
        #[bind(option(key = 'A', long = "all"))]
        almost_all: bool,
    }

    assert!(matches!(
        build_error::<SameLong>(),
        StructuralError::DuplicateKey { field: "almost_all", other: "all", ref key, .. }
            if key == "--all"
    ));
}

#[test]
fn display_names_are_unique() {
    #[derive(Bindable, Default)]
    struct SameName {
        #[bind(positional(index = 0, name = "path"))]
        source: String,
        #[bind(positional(index = 1, name = "path"))]
        target: String,
    }

    assert!(matches!(
        build_error::<SameName>(),
        StructuralError::DuplicateName { field: "target", other: "source", name: "path", .. }
    ));
}

#[test]
fn mandatory_after_optional() {
    #[derive(Bindable, Default)]
    struct Backwards {
        #[bind(positional(index = 0, optional))]
        a: String,
        #[bind(positional(index = 1))]
        b: String,
    }

    assert_eq!(
        build_error::<Backwards>(),
        StructuralError::MandatoryAfterOptional {
            type_name: type_name::<Backwards>(),
            field: "b",
            optional: "a",
        }
    );
}

#[derive(Default)]
struct HandWritten {
    level: u8,
}

impl Bindable for HandWritten {
    fn declare(decl: &mut Declaration<Self>) {
        decl.field(
            FieldDecl::<Self, u8>::new("level", |this| &mut this.level)
                .option(OptionTag::new('-').expects_value()),
        );
    }
}

#[test]
fn invalid_short_key() {
    assert!(matches!(
        build_error::<HandWritten>(),
        StructuralError::InvalidKey { field: "level", .. }
    ));
}

#[derive(Default)]
struct DefaultMarker {
    level: u8,
}

impl Bindable for DefaultMarker {
    fn declare(decl: &mut Declaration<Self>) {
        decl.field(
            FieldDecl::<Self, u8>::new("level", |this| &mut this.level)
                .option(OptionTag::new('l').expects_value())
                .adapter(Adapter::Default),
        );
    }
}

#[test]
fn explicit_default_adapter_uses_the_table() {
    let spec = Specification::<DefaultMarker>::build().expect("valid specification");
    assert_eq!(spec.options().len(), 1);
}

#[test]
fn structural_errors_exit_early() {
    #[derive(Bindable, Default, Debug)]
    struct Count {
        #[bind(option(key = 'c'))]
        count: u32,
    }

    assert!(Binder::<Count>::new().is_err());

    let exit = Count::from_args(&["cmd"], &[]).expect_err("malformed type was bound");
    assert_eq!(exit.status, Err(()));
    assert_eq!(exit.output, build_error::<Count>().to_string());
}
