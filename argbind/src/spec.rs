// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Classification of declared fields and the argument specification built
//! from them.

use {
    crate::{
        adapter::{Adapter, CustomAdapter},
        declare::{Declaration, FieldDecl, OptionTag, PositionalTag, RawField, Slot, TailShape},
        error::{RoleKind, StructuralError},
        scalar::{self, Primitive},
        Bindable, FieldType,
    },
    argbind_shared::{check_long_key, check_short_key, OptionInfo, PositionalInfo, SpecInfo},
    std::{
        any::{type_name, Any, TypeId},
        fmt,
    },
    tracing::{debug, trace},
};

/// The role a field plays on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Identified by its position among the plain tokens.
    Positional,
    /// Identified by a key, either as a switch or followed by a value.
    Option,
    /// Collects the plain tokens left over after all positionals.
    VariadicTail,
    /// Not bound at all.
    Unannotated,
}

/// Determine the role of one field from its tags. A field carrying more than
/// one role tag is rejected.
pub(crate) fn classify<T>(
    type_name: &'static str,
    field: &RawField<T>,
) -> Result<Role, StructuralError> {
    let mut tags = [
        (field.positional.is_some(), RoleKind::Positional),
        (field.option.is_some(), RoleKind::Option),
        (field.tail.is_some(), RoleKind::VariadicTail),
    ]
    .into_iter()
    .filter_map(|(present, kind)| present.then(|| kind));

    let role = match tags.next() {
        None => return Ok(Role::Unannotated),
        Some(RoleKind::Positional) => Role::Positional,
        Some(RoleKind::Option) => Role::Option,
        Some(RoleKind::VariadicTail) => Role::VariadicTail,
    };
    if let Some(second) = tags.next() {
        let first = match role {
            Role::Positional => RoleKind::Positional,
            Role::Option => RoleKind::Option,
            _ => RoleKind::VariadicTail,
        };
        return Err(StructuralError::ConflictingRoles {
            type_name,
            field: field.name,
            first,
            second,
        });
    }
    Ok(role)
}

impl<T: 'static, V: 'static> FieldDecl<T, V> {
    /// The role of the declared field, or why it has none.
    pub fn role(&self) -> Result<Role, StructuralError> {
        classify(type_name::<T>(), self.raw())
    }
}

/// How a token becomes a field value.
#[derive(Clone)]
pub enum Conversion {
    /// Through the built-in table; `wrap` stores the value in `Some`.
    Primitive {
        /// The table entry.
        primitive: &'static Primitive,
        /// Whether the field is the `Option` of the entry's type.
        wrap: bool,
    },
    /// Through a custom adapter; `wrap` stores the value in `Some`.
    Custom {
        /// The adapter.
        adapter: CustomAdapter,
        /// Whether the field is the `Option` of the adapter's output.
        wrap: bool,
    },
}

impl Conversion {
    fn resolve(
        type_name: &'static str,
        field: &'static str,
        ty: FieldType,
        adapter: Adapter,
    ) -> Result<Self, StructuralError> {
        match adapter {
            Adapter::Custom(adapter) => match adapter.fit(ty.id()) {
                Some(wrap) => Ok(Conversion::Custom { adapter, wrap }),
                None => Err(StructuralError::AdapterMismatch {
                    type_name,
                    field,
                    expected: ty.name(),
                    adapter_output: adapter.output().name(),
                }),
            },
            Adapter::Default => match scalar::lookup(ty) {
                Some((primitive, wrap)) => Ok(Conversion::Primitive { primitive, wrap }),
                None => Err(StructuralError::UnsupportedType {
                    type_name,
                    field,
                    field_type: ty.name(),
                }),
            },
        }
    }

    /// Convert `text` into a boxed value of the field's type.
    pub fn convert(&self, text: &str) -> Result<Box<dyn Any>, String> {
        match self {
            Conversion::Primitive { primitive, wrap } => {
                let value = primitive.parse(text)?;
                Ok(if *wrap { primitive.wrap_some(value) } else { value })
            }
            Conversion::Custom { adapter, wrap } => {
                let value = adapter.parse(text)?;
                Ok(if *wrap { adapter.wrap_some(value) } else { value })
            }
        }
    }
}

impl fmt::Debug for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conversion::Primitive { primitive, wrap } => f
                .debug_struct("Primitive")
                .field("kind", &primitive.kind())
                .field("wrap", wrap)
                .finish(),
            Conversion::Custom { adapter, wrap } => {
                f.debug_struct("Custom").field("adapter", adapter).field("wrap", wrap).finish()
            }
        }
    }
}

/// A field bound from a positional argument.
pub struct PositionalDescriptor<T> {
    pub(crate) field: &'static str,
    pub(crate) ty: FieldType,
    pub(crate) index: usize,
    pub(crate) display_name: &'static str,
    pub(crate) mandatory: bool,
    pub(crate) description: &'static str,
    pub(crate) conversion: Conversion,
    pub(crate) slot: Box<dyn Slot<T>>,
}

impl<T> PositionalDescriptor<T> {
    /// The name of the field.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// The position among the positional arguments.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The name in usage output and parsed models.
    pub fn display_name(&self) -> &'static str {
        self.display_name
    }

    /// Whether the argument must be given.
    pub fn mandatory(&self) -> bool {
        self.mandatory
    }

    /// How tokens are converted.
    pub fn conversion(&self) -> &Conversion {
        &self.conversion
    }
}

/// Whether an option is a switch or takes a value.
#[derive(Clone, Debug)]
pub enum OptionKind {
    /// Binds to `true` when given.
    Switch,
    /// Binds to the converted token following the key.
    Value(Conversion),
}

/// A field bound from an option.
pub struct OptionDescriptor<T> {
    pub(crate) field: &'static str,
    pub(crate) ty: FieldType,
    pub(crate) key: char,
    pub(crate) long_key: Option<&'static str>,
    pub(crate) description: &'static str,
    pub(crate) kind: OptionKind,
    pub(crate) slot: Box<dyn Slot<T>>,
}

impl<T> OptionDescriptor<T> {
    /// The name of the field.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// The short key.
    pub fn key(&self) -> char {
        self.key
    }

    /// The long key, if any.
    pub fn long_key(&self) -> Option<&'static str> {
        self.long_key
    }

    /// Switch or value option.
    pub fn kind(&self) -> &OptionKind {
        &self.kind
    }
}

/// The field collecting the variadic tail.
pub struct TailDescriptor<T> {
    pub(crate) field: &'static str,
    pub(crate) ty: FieldType,
    pub(crate) item: FieldType,
    pub(crate) adapter: CustomAdapter,
    pub(crate) collect: fn(Vec<Box<dyn Any>>) -> Result<Box<dyn Any>, usize>,
    pub(crate) slot: Box<dyn Slot<T>>,
}

impl<T> TailDescriptor<T> {
    /// The name of the field.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// The element type of the collection.
    pub fn item(&self) -> FieldType {
        self.item
    }
}

/// The validated, immutable description of how to bind a `T`.
///
/// Build it once per type and reuse it for any number of bind operations.
pub struct Specification<T> {
    pub(crate) type_name: &'static str,
    pub(crate) positionals: Vec<PositionalDescriptor<T>>,
    pub(crate) options: Vec<OptionDescriptor<T>>,
    pub(crate) tail: Option<TailDescriptor<T>>,
    pub(crate) unannotated: Vec<&'static str>,
}

impl<T: Bindable> Specification<T> {
    /// Collect and validate the declared fields of `T`.
    pub fn build() -> Result<Self, StructuralError> {
        let type_name = type_name::<T>();
        let mut decl = Declaration::<T>::new();
        T::declare(&mut decl);

        let mut pending = Vec::new();
        let mut options = Vec::new();
        let mut tail: Option<TailDescriptor<T>> = None;
        let mut unannotated = Vec::new();

        for field in decl.into_fields() {
            let role = classify(type_name, &field)?;
            trace!(target_type = type_name, field = field.name, ?role, "classified field");

            let RawField { name, ty, positional, option, tail: shape, adapter, slot } = field;
            if let Some(tag) = positional {
                pending.push((tag, name, ty, adapter, slot));
            } else if let Some(tag) = option {
                let option =
                    option_descriptor(type_name, &options, tag, name, ty, adapter, slot)?;
                options.push(option);
            } else if let Some(shape) = shape {
                if let Some(first) = &tail {
                    return Err(StructuralError::DuplicateTail {
                        type_name,
                        first: first.field,
                        second: name,
                    });
                }
                tail = Some(tail_descriptor(type_name, shape, name, ty, adapter, slot)?);
            } else {
                unannotated.push(name);
            }
        }

        // A stable sort keeps duplicates in declaration order, so the second
        // field with an index is the one reported.
        pending.sort_by_key(|(tag, ..)| tag.index);
        for (expected, (tag, name, ..)) in pending.iter().enumerate() {
            if tag.index != expected {
                return Err(StructuralError::PositionalIndex {
                    type_name,
                    field: *name,
                    expected,
                    actual: tag.index,
                });
            }
        }

        let mut positionals: Vec<PositionalDescriptor<T>> = Vec::with_capacity(pending.len());
        for (tag, name, ty, adapter, slot) in pending {
            let PositionalTag { index, name: display_name, mandatory, description } = tag;
            let display_name = display_name.unwrap_or(name);
            if let Some(other) = positionals.iter().find(|p| p.display_name == display_name) {
                return Err(StructuralError::DuplicateName {
                    type_name,
                    field: name,
                    other: other.field,
                    name: display_name,
                });
            }
            if mandatory {
                if let Some(optional) = positionals.iter().find(|p| !p.mandatory) {
                    return Err(StructuralError::MandatoryAfterOptional {
                        type_name,
                        field: name,
                        optional: optional.field,
                    });
                }
            }
            positionals.push(PositionalDescriptor {
                field: name,
                ty,
                index,
                display_name,
                mandatory,
                description,
                conversion: Conversion::resolve(type_name, name, ty, adapter)?,
                slot,
            });
        }

        debug!(
            target_type = type_name,
            positionals = positionals.len(),
            options = options.len(),
            variadic_tail = tail.is_some(),
            unannotated = unannotated.len(),
            "built argument specification"
        );

        Ok(Specification { type_name, positionals, options, tail, unannotated })
    }
}

fn option_descriptor<T>(
    type_name: &'static str,
    existing: &[OptionDescriptor<T>],
    tag: OptionTag,
    field: &'static str,
    ty: FieldType,
    adapter: Adapter,
    slot: Box<dyn Slot<T>>,
) -> Result<OptionDescriptor<T>, StructuralError> {
    let OptionTag { key, long_key, expects_value, description } = tag;
    let invalid = |reason| StructuralError::InvalidKey { type_name, field, reason };
    check_short_key(key).map_err(invalid)?;
    if let Some(long_key) = long_key {
        check_long_key(long_key).map_err(invalid)?;
    }

    for other in existing {
        let duplicate = if other.key == key {
            Some(format!("-{}", key))
        } else {
            long_key.filter(|long| other.long_key == Some(*long)).map(|long| format!("--{}", long))
        };
        if let Some(key) = duplicate {
            return Err(StructuralError::DuplicateKey { type_name, field, other: other.field, key });
        }
    }

    let kind = if expects_value {
        OptionKind::Value(Conversion::resolve(type_name, field, ty, adapter)?)
    } else if ty.id() == TypeId::of::<bool>() {
        OptionKind::Switch
    } else {
        return Err(StructuralError::SwitchNotBool { type_name, field, field_type: ty.name() });
    };

    Ok(OptionDescriptor { field, ty, key, long_key, description, kind, slot })
}

fn tail_descriptor<T>(
    type_name: &'static str,
    shape: TailShape,
    field: &'static str,
    ty: FieldType,
    adapter: Adapter,
    slot: Box<dyn Slot<T>>,
) -> Result<TailDescriptor<T>, StructuralError> {
    let adapter = match adapter {
        Adapter::Custom(adapter) => adapter,
        Adapter::Default => return Err(StructuralError::TailWithoutAdapter { type_name, field }),
    };
    if adapter.output() != shape.item {
        return Err(StructuralError::AdapterMismatch {
            type_name,
            field,
            expected: shape.item.name(),
            adapter_output: adapter.output().name(),
        });
    }
    Ok(TailDescriptor { field, ty, item: shape.item, adapter, collect: shape.collect, slot })
}

impl<T> Specification<T> {
    /// The name of the target type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The positional arguments, ordered by index.
    pub fn positionals(&self) -> &[PositionalDescriptor<T>] {
        &self.positionals
    }

    /// The options, in declaration order.
    pub fn options(&self) -> &[OptionDescriptor<T>] {
        &self.options
    }

    /// The variadic tail, if one is declared.
    pub fn tail(&self) -> Option<&TailDescriptor<T>> {
        self.tail.as_ref()
    }

    /// The fields that are not bound.
    pub fn unannotated(&self) -> &[&'static str] {
        &self.unannotated
    }
}

impl<T: Bindable> Specification<T> {
    /// The parser-facing view of this specification.
    pub fn info(&self) -> SpecInfo<'static> {
        SpecInfo {
            name: self.type_name,
            description: T::description(),
            positionals: self
                .positionals
                .iter()
                .map(|positional| PositionalInfo {
                    name: positional.display_name,
                    mandatory: positional.mandatory,
                    description: positional.description,
                })
                .collect(),
            options: self
                .options
                .iter()
                .map(|option| OptionInfo {
                    key: option.key,
                    long_key: option.long_key,
                    name: option.field,
                    expects_value: matches!(option.kind, OptionKind::Value(_)),
                    description: option.description,
                })
                .collect(),
            variadic_tail: self.tail.is_some(),
        }
    }
}

impl<T: Bindable> fmt::Debug for Specification<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Specification")
            .field("info", &self.info())
            .field("unannotated", &self.unannotated)
            .finish()
    }
}
