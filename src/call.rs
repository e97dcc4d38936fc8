//! Direct calls: invoking a plain callback-style function with the generated
//! callback appended as its last argument.

use crate::{
    args::Args,
    callback::{Callback, Resolution},
    config::Options,
    deferred::{Deferred, DeferredConstructor, Local},
    error::Error,
    factory::{Adapter, Applier},
    value::CallbackValue,
};
use std::{fmt, rc::Rc};

/// A callback-style function. It has no receiver: it only sees its
/// positional arguments, the last one being a callback.
///
/// The function may fail synchronously, which is reported as an [`Error`]
/// by the adapter rather than as a rejection.
pub struct Function<V> {
    function: Rc<dyn Fn(Args<V>) -> Result<(), Error>>,
}

impl<V> Function<V> {
    /// Wraps an infallible function.
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(Args<V>) + 'static,
    {
        Self::fallible(move |args| {
            function(args);
            Ok(())
        })
    }

    /// Wraps a function that may fail before taking its callback.
    pub fn fallible<F>(function: F) -> Self
    where
        F: Fn(Args<V>) -> Result<(), Error> + 'static,
    {
        Self { function: Rc::new(function) }
    }

    /// Calls the function with the given arguments.
    pub fn apply(&self, args: Args<V>) -> Result<(), Error> {
        (self.function)(args)
    }
}

impl<V> Clone for Function<V> {
    fn clone(&self) -> Self {
        Self { function: self.function.clone() }
    }
}

impl<V> fmt::Debug for Function<V> {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        write!(fmtr, "Function({:p})", Rc::as_ptr(&self.function))
    }
}

/// Arguments forwarded by a direct call: the function and its arguments,
/// not including the callback.
#[derive(Debug, Clone)]
pub struct DirectCall<V> {
    /// Function to call.
    pub function: Function<V>,
    /// Arguments before the callback.
    pub args: Args<V>,
}

impl<V> DirectCall<V> {
    /// Packages a direct call.
    pub fn new(function: Function<V>, args: Args<V>) -> Self {
        Self { function, args }
    }
}

/// Applier of direct calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyCall;

impl<V> Applier<DirectCall<V>, V> for ApplyCall
where
    V: CallbackValue,
{
    fn apply(
        &self,
        callback: Callback<V>,
        input: DirectCall<V>,
    ) -> Result<(), Error> {
        let DirectCall { function, mut args } = input;
        args.push_last(V::from_callback(callback));
        function.apply(args)
    }
}

/// Builds a reusable direct-call adapter with configuration overrides.
pub fn call_with<V, D>(
    options: Options<D>,
) -> Adapter<ApplyCall, DirectCall<V>, V, D>
where
    V: CallbackValue + 'static,
    D: DeferredConstructor<Resolution<V>, V>,
{
    Adapter::with_options(ApplyCall, options).named("thenifiedCall")
}

/// Calls an error-first callback-style function, returning a deferred value
/// settled by the callback.
///
/// # Examples
///
/// ```
/// use futures::executor::block_on;
/// use thenified::{args, call, Function, Resolution, Value};
///
/// let sum = Function::new(|mut args: thenified::Args<Value>| {
///     let callback = args.pop_callback().unwrap();
///     let total: f64 = args.iter().filter_map(Value::as_number).sum();
///     callback.invoke(args![Value::Null, total]);
/// });
///
/// let deferred = call(sum, args![1, 2]).unwrap();
/// assert_eq!(block_on(deferred), Ok(Resolution::Single(Value::from(3))));
/// ```
pub fn call<V>(
    function: Function<V>,
    args: Args<V>,
) -> Result<Deferred<V>, Error>
where
    V: CallbackValue + 'static,
{
    call_with::<V, Local>(Options::new())
        .invoke(DirectCall::new(function, args))
}
