// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! The explicit metadata describing how each field of a target type is bound.
//!
//! `#[derive(Bindable)]` generates these declarations. They can also be
//! written by hand:
//!
//! ```rust
//! use argbind::{Bindable, Declaration, FieldDecl, OptionTag, PositionalTag};
//!
//! #[derive(Default)]
//! struct Greet {
//!     name: String,
//!     loud: bool,
//! }
//!
//! impl Bindable for Greet {
//!     fn declare(decl: &mut Declaration<Self>) {
//!         decl.field(
//!             FieldDecl::<Self, String>::new("name", |greet| &mut greet.name)
//!                 .positional(PositionalTag::new(0)),
//!         )
//!         .field(
//!             FieldDecl::<Self, bool>::new("loud", |greet| &mut greet.loud)
//!                 .option(OptionTag::new('l').long("loud")),
//!         );
//!     }
//! }
//!
//! let greet = Greet::from_args(&["greet"], &["world", "-l"]).unwrap();
//! assert_eq!(greet.name, "world");
//! assert!(greet.loud);
//! ```

use {
    crate::{adapter::Adapter, Bindable},
    std::{
        any::{type_name, Any, TypeId},
        collections::{BTreeSet, HashSet, LinkedList, VecDeque},
        hash::Hash,
        marker::PhantomData,
    },
};

/// The declared type of a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldType {
    name: &'static str,
    id: TypeId,
}

impl FieldType {
    /// The field type of values of type `V`.
    pub fn of<V: 'static>() -> Self {
        FieldType { name: type_name::<V>(), id: TypeId::of::<V>() }
    }

    /// The Rust name of the type.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The identity of the type.
    pub fn id(&self) -> TypeId {
        self.id
    }
}

/// Marks a field as a positional argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionalTag {
    pub(crate) index: usize,
    pub(crate) name: Option<&'static str>,
    pub(crate) mandatory: bool,
    pub(crate) description: &'static str,
}

impl PositionalTag {
    /// A mandatory positional argument at `index`, named after its field.
    pub fn new(index: usize) -> Self {
        PositionalTag { index, name: None, mandatory: true, description: "" }
    }

    /// Use `name` instead of the field name in usage output and parsed models.
    pub fn name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    /// Allow the argument to be omitted.
    pub fn optional(mut self) -> Self {
        self.mandatory = false;
        self
    }

    /// Set the description shown in usage output.
    pub fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }
}

/// Marks a field as an option. Without [`OptionTag::expects_value`] the
/// option is a switch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionTag {
    pub(crate) key: char,
    pub(crate) long_key: Option<&'static str>,
    pub(crate) expects_value: bool,
    pub(crate) description: &'static str,
}

impl OptionTag {
    /// A switch given as `-key`.
    pub fn new(key: char) -> Self {
        OptionTag { key, long_key: None, expects_value: false, description: "" }
    }

    /// Also accept `--long_key`.
    pub fn long(mut self, long_key: &'static str) -> Self {
        self.long_key = Some(long_key);
        self
    }

    /// Take the token following the key as the option's value.
    pub fn expects_value(mut self) -> Self {
        self.expects_value = true;
        self
    }

    /// Set the description shown in usage output.
    pub fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }
}

/// A container that can collect the variadic tail.
pub trait TailCollection: Default + 'static {
    /// The element type, produced by the tail's adapter.
    type Item: 'static;

    /// Add `item` after the elements collected so far.
    fn append(&mut self, item: Self::Item);
}

impl<I: 'static> TailCollection for Vec<I> {
    type Item = I;

    fn append(&mut self, item: I) {
        self.push(item)
    }
}

impl<I: 'static> TailCollection for VecDeque<I> {
    type Item = I;

    fn append(&mut self, item: I) {
        self.push_back(item)
    }
}

impl<I: 'static> TailCollection for LinkedList<I> {
    type Item = I;

    fn append(&mut self, item: I) {
        self.push_back(item)
    }
}

impl<I: Ord + 'static> TailCollection for BTreeSet<I> {
    type Item = I;

    fn append(&mut self, item: I) {
        self.insert(item);
    }
}

impl<I: Eq + Hash + 'static> TailCollection for HashSet<I> {
    type Item = I;

    fn append(&mut self, item: I) {
        self.insert(item);
    }
}

/// The element type of a tail and a way to gather converted elements into
/// the declared container.
#[derive(Clone, Copy)]
pub(crate) struct TailShape {
    pub(crate) item: FieldType,
    /// Fails with the position of the first element of the wrong type.
    pub(crate) collect: fn(Vec<Box<dyn Any>>) -> Result<Box<dyn Any>, usize>,
}

fn collect<C: TailCollection>(items: Vec<Box<dyn Any>>) -> Result<Box<dyn Any>, usize> {
    let mut collection = C::default();
    for (position, item) in items.into_iter().enumerate() {
        let item = item.downcast::<C::Item>().map_err(|_| position)?;
        collection.append(*item);
    }
    Ok(Box::new(collection))
}

/// Stores converted values into one field of a `T`.
pub(crate) trait Slot<T>: Send + Sync {
    /// Hands `value` back if it is not of the field's type.
    fn store(&self, target: &mut T, value: Box<dyn Any>) -> Result<(), Box<dyn Any>>;
}

struct Direct<T, V> {
    access: fn(&mut T) -> &mut V,
}

impl<T, V: 'static> Slot<T> for Direct<T, V> {
    fn store(&self, target: &mut T, value: Box<dyn Any>) -> Result<(), Box<dyn Any>> {
        *(self.access)(target) = *value.downcast::<V>()?;
        Ok(())
    }
}

/// A slot of a flattened record, reached through the embedding field.
struct Projected<T, B> {
    project: fn(&mut T) -> &mut B,
    inner: Box<dyn Slot<B>>,
}

impl<T, B> Slot<T> for Projected<T, B> {
    fn store(&self, target: &mut T, value: Box<dyn Any>) -> Result<(), Box<dyn Any>> {
        self.inner.store((self.project)(target), value)
    }
}

/// One declared field with its tags, before classification.
pub(crate) struct RawField<T> {
    pub(crate) name: &'static str,
    pub(crate) ty: FieldType,
    pub(crate) positional: Option<PositionalTag>,
    pub(crate) option: Option<OptionTag>,
    pub(crate) tail: Option<TailShape>,
    pub(crate) adapter: Adapter,
    pub(crate) slot: Box<dyn Slot<T>>,
}

impl<T: 'static> RawField<T> {
    fn project<S: 'static>(self, project: fn(&mut S) -> &mut T) -> RawField<S> {
        RawField {
            name: self.name,
            ty: self.ty,
            positional: self.positional,
            option: self.option,
            tail: self.tail,
            adapter: self.adapter,
            slot: Box::new(Projected { project, inner: self.slot }),
        }
    }
}

/// The declaration of one field of `T` whose type is `V`.
pub struct FieldDecl<T, V> {
    raw: RawField<T>,
    _value: PhantomData<fn() -> V>,
}

impl<T: 'static, V: 'static> FieldDecl<T, V> {
    /// Declare the field called `name`, reached through `access`. The field
    /// stays unannotated until a tag is added.
    pub fn new(name: &'static str, access: fn(&mut T) -> &mut V) -> Self {
        FieldDecl {
            raw: RawField {
                name,
                ty: FieldType::of::<V>(),
                positional: None,
                option: None,
                tail: None,
                adapter: Adapter::Default,
                slot: Box::new(Direct { access }),
            },
            _value: PhantomData,
        }
    }

    pub(crate) fn raw(&self) -> &RawField<T> {
        &self.raw
    }

    /// Tag the field as a positional argument.
    pub fn positional(mut self, tag: PositionalTag) -> Self {
        self.raw.positional = Some(tag);
        self
    }

    /// Tag the field as an option.
    pub fn option(mut self, tag: OptionTag) -> Self {
        self.raw.option = Some(tag);
        self
    }

    /// Convert the field's tokens with `adapter` instead of the built-in table.
    pub fn adapter(mut self, adapter: Adapter) -> Self {
        self.raw.adapter = adapter;
        self
    }
}

impl<T: 'static, V: TailCollection> FieldDecl<T, V> {
    /// Tag the field as the variadic tail. Its elements are converted by the
    /// field's adapter.
    pub fn tail(mut self) -> Self {
        self.raw.tail = Some(TailShape { item: FieldType::of::<V::Item>(), collect: collect::<V> });
        self
    }
}

/// The fields of a [`Bindable`] type, in declaration order.
pub struct Declaration<T> {
    own: Vec<RawField<T>>,
    flattened: Vec<RawField<T>>,
}

impl<T: 'static> Declaration<T> {
    pub(crate) fn new() -> Self {
        Declaration { own: Vec::new(), flattened: Vec::new() }
    }

    /// Add a field of `T` itself.
    pub fn field<V: 'static>(&mut self, field: FieldDecl<T, V>) -> &mut Self {
        self.own.push(field.raw);
        self
    }

    /// Embed the fields of another bindable record, reached through `project`.
    /// They follow all fields of `T` itself.
    pub fn flatten<B: Bindable>(&mut self, project: fn(&mut T) -> &mut B) -> &mut Self {
        let mut inner = Declaration::<B>::new();
        B::declare(&mut inner);
        self.flattened.extend(inner.into_fields().into_iter().map(|field| field.project(project)));
        self
    }

    /// The number of fields declared so far, flattened ones included.
    pub fn len(&self) -> usize {
        self.own.len() + self.flattened.len()
    }

    /// Whether no field has been declared.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn into_fields(self) -> Vec<RawField<T>> {
        let mut fields = self.own;
        fields.extend(self.flattened);
        fields
    }
}
