// Copyright (c) 2020 Google LLC All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Pluggable conversions for field types the built-in table does not cover.

use {
    crate::{error::StructuralError, scalar, FieldType},
    std::{
        any::{type_name, Any, TypeId},
        fmt,
        marker::PhantomData,
        str::FromStr,
        sync::Arc,
    },
};

/// Converts one command line token into a value of an arbitrary type.
///
/// ```rust
/// # use argbind::TypeAdapter;
/// #[derive(Default)]
/// struct Celsius;
///
/// impl TypeAdapter for Celsius {
///     type Output = f64;
///
///     fn parse(&self, text: &str) -> Result<f64, String> {
///         let degrees = text.strip_suffix("C").ok_or("expected a value like `21C`")?;
///         degrees.parse().map_err(|e| format!("{}", e))
///     }
/// }
/// ```
pub trait TypeAdapter {
    /// The type produced by the adapter.
    type Output: 'static;

    /// Convert `text`, or describe why it cannot be converted.
    fn parse(&self, text: &str) -> Result<Self::Output, String>;
}

/// Adapts any type that implements [`FromStr`].
pub struct FromStrAdapter<T>(PhantomData<fn() -> T>);

impl<T> Default for FromStrAdapter<T> {
    fn default() -> Self {
        FromStrAdapter(PhantomData)
    }
}

impl<T> fmt::Debug for FromStrAdapter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FromStrAdapter<{}>", type_name::<T>())
    }
}

impl<T> TypeAdapter for FromStrAdapter<T>
where
    T: FromStr + 'static,
    T::Err: fmt::Display,
{
    type Output = T;

    fn parse(&self, text: &str) -> Result<T, String> {
        T::from_str(text).map_err(|e| e.to_string())
    }
}

type ErasedParse = dyn Fn(&str) -> Result<Box<dyn Any>, String> + Send + Sync;

/// The adapter attached to a field declaration.
#[derive(Clone, Default)]
pub enum Adapter {
    /// No adapter: the field is converted by the built-in table.
    #[default]
    Default,
    /// An explicitly supplied adapter.
    Custom(CustomAdapter),
}

/// A type-erased adapter together with the factory that creates it.
#[derive(Clone)]
pub struct CustomAdapter {
    name: &'static str,
    output: FieldType,
    optional_output: TypeId,
    parse: Arc<ErasedParse>,
    wrap_some: fn(Box<dyn Any>) -> Box<dyn Any>,
}

impl Adapter {
    /// An adapter of type `A`, default-constructed for every conversion.
    pub fn of<A>() -> Self
    where
        A: TypeAdapter + Default + 'static,
    {
        Self::with_factory(A::default)
    }

    /// An adapter created by `factory` for every conversion.
    pub fn with_factory<A>(factory: fn() -> A) -> Self
    where
        A: TypeAdapter + 'static,
    {
        Self::erase::<A::Output>(type_name::<A>(), move |text| factory().parse(text))
    }

    /// An adapter backed by a plain conversion function.
    pub fn from_fn<O: 'static>(convert: fn(&str) -> Result<O, String>) -> Self {
        Self::erase::<O>(type_name::<fn(&str) -> Result<O, String>>(), convert)
    }

    fn erase<O: 'static>(
        name: &'static str,
        convert: impl Fn(&str) -> Result<O, String> + Send + Sync + 'static,
    ) -> Self {
        Adapter::Custom(CustomAdapter {
            name,
            output: FieldType::of::<O>(),
            optional_output: TypeId::of::<Option<O>>(),
            parse: Arc::new(move |text: &str| {
                convert(text).map(|value| Box::new(value) as Box<dyn Any>)
            }),
            wrap_some: scalar::wrap_some::<O>,
        })
    }

    /// Whether this is the [`Adapter::Default`] marker.
    pub fn is_default(&self) -> bool {
        matches!(self, Adapter::Default)
    }

    /// Run the adapter on `text`.
    ///
    /// The outer error means the [`Adapter::Default`] marker was invoked, which
    /// a built specification never does. The inner error is the adapter's own
    /// rejection of `text`.
    pub fn parse(&self, text: &str) -> Result<Result<Box<dyn Any>, String>, StructuralError> {
        match self {
            Adapter::Default => Err(StructuralError::DefaultAdapterInvoked),
            Adapter::Custom(custom) => Ok(custom.parse(text)),
        }
    }
}

impl CustomAdapter {
    /// The name of the adapter type.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The type the adapter produces.
    pub fn output(&self) -> FieldType {
        self.output
    }

    /// Create a fresh adapter and convert `text` with it.
    pub fn parse(&self, text: &str) -> Result<Box<dyn Any>, String> {
        (self.parse)(text)
    }

    /// How the output is stored in a value of type `target`: `Some(false)` as
    /// is, `Some(true)` wrapped in `Some`, `None` not at all.
    pub(crate) fn fit(&self, target: TypeId) -> Option<bool> {
        if target == self.output.id() {
            Some(false)
        } else if target == self.optional_output {
            Some(true)
        } else {
            None
        }
    }

    pub(crate) fn wrap_some(&self, value: Box<dyn Any>) -> Box<dyn Any> {
        (self.wrap_some)(value)
    }
}

impl fmt::Debug for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Adapter::Default => f.write_str("Adapter::Default"),
            Adapter::Custom(custom) => write!(f, "Adapter::Custom({:?})", custom),
        }
    }
}

impl fmt::Debug for CustomAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomAdapter")
            .field("name", &self.name)
            .field("output", &self.output.name())
            .finish()
    }
}
