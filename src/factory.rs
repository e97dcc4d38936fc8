//! This module implements the adapter factory: the piece that turns an
//! applier into a reusable function returning one deferred value per call.

use crate::{
    callback::{Callback, Resolution, Shape},
    config::{Config, Options},
    deferred::{DeferredConstructor, Local},
    error::Error,
    value::CallbackValue,
};
use std::{borrow::Cow, fmt, marker::PhantomData};

/// Describes how to invoke a callback-style operation: it receives the
/// generated callback and the arguments forwarded by the caller, and is
/// responsible for handing the callback to the operation.
///
/// Returning `Err` means the operation could not even be started; the error
/// propagates out of [`Adapter::invoke`] synchronously.
pub trait Applier<I, V> {
    /// Invokes the operation.
    fn apply(&self, callback: Callback<V>, input: I) -> Result<(), Error>;
}

impl<F, I, V> Applier<I, V> for F
where
    F: Fn(Callback<V>, I) -> Result<(), Error>,
{
    fn apply(&self, callback: Callback<V>, input: I) -> Result<(), Error> {
        self(callback, input)
    }
}

/// A reusable adapter. Each [`invoke`](Adapter::invoke) creates a fresh
/// deferred value and a fresh callback; nothing is shared between calls
/// except the read-only configuration.
pub struct Adapter<A, I, V, D = Local> {
    applier: A,
    config: Config<D>,
    shape: Shape,
    name: Option<Cow<'static, str>>,
    _marker: PhantomData<fn(I) -> V>,
}

impl<A, I, V> Adapter<A, I, V, Local>
where
    A: Applier<I, V>,
{
    /// Creates an adapter with the default configuration.
    pub fn new(applier: A) -> Self {
        Self::with_options(applier, Options::new())
    }
}

impl<A, I, V, D> Adapter<A, I, V, D> {
    /// Attaches a display name, shown in logs and `Debug` output.
    pub fn named<N>(mut self, name: N) -> Self
    where
        N: Into<Cow<'static, str>>,
    {
        self.name = Some(name.into());
        self
    }

    /// The display name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The resolved configuration.
    pub fn config(&self) -> &Config<D> {
        &self.config
    }

    /// The callback convention in use.
    pub fn shape(&self) -> Shape {
        self.shape
    }
}

impl<A, I, V, D> Adapter<A, I, V, D>
where
    A: Applier<I, V>,
{
    /// Creates an adapter from configuration overrides.
    pub fn with_options(applier: A, options: Options<D>) -> Self {
        let config = options.merge();
        let shape = config.shape();
        tracing::debug!(?shape, "adapter constructed");
        Self { applier, config, shape, name: None, _marker: PhantomData }
    }

    /// Runs the adapted operation, returning its deferred value.
    ///
    /// The deferred value is created first, then the applier runs
    /// synchronously with a callback settling it. If the applier fails, its
    /// error is returned here and the deferred value is discarded.
    pub fn invoke(&self, input: I) -> Result<D::Deferred, Error>
    where
        V: CallbackValue + 'static,
        D: DeferredConstructor<Resolution<V>, V>,
    {
        tracing::trace!(name = self.name(), "invoking applier");

        let shape = self.shape;
        let applier = &self.applier;
        let mut failure = None;

        let deferred = self.config.deferred.construct(|resolve, reject| {
            let callback = shape.callback(resolve, reject);
            if let Err(error) = applier.apply(callback, input) {
                failure = Some(error);
            }
        });

        match failure {
            Some(error) => {
                tracing::debug!(
                    name = self.name(),
                    %error,
                    "applier failed synchronously"
                );
                Err(error)
            },
            None => Ok(deferred),
        }
    }
}

impl<A, I, V, D> Clone for Adapter<A, I, V, D>
where
    A: Clone,
    D: Clone,
{
    fn clone(&self) -> Self {
        Self {
            applier: self.applier.clone(),
            config: self.config.clone(),
            shape: self.shape,
            name: self.name.clone(),
            _marker: PhantomData,
        }
    }
}

impl<A, I, V, D> fmt::Debug for Adapter<A, I, V, D>
where
    D: fmt::Debug,
{
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        fmtr.debug_struct("Adapter")
            .field("name", &self.name)
            .field("shape", &self.shape)
            .field("config", &self.config)
            .finish()
    }
}

/// Builds an adapter from an applier and configuration overrides.
///
/// # Examples
///
/// ```
/// use futures::executor::block_on;
/// use thenified::{args, factory, Args, Callback, Options, Resolution, Value};
///
/// let adapter = factory(
///     |callback: Callback<Value>, args: Args<Value>| {
///         callback.invoke(args);
///         Ok(())
///     },
///     Options::new().error_first(false),
/// );
/// let deferred = adapter.invoke(args!["hello", "world"]).unwrap();
/// assert_eq!(
///     block_on(deferred),
///     Ok(Resolution::Single(Value::from("hello")))
/// );
/// ```
pub fn factory<A, I, V, D>(
    applier: A,
    options: Options<D>,
) -> Adapter<A, I, V, D>
where
    A: Applier<I, V>,
{
    Adapter::with_options(applier, options)
}
