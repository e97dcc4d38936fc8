//! This module defines generated callbacks and the conventions used to turn a
//! callback invocation into a settlement.

use crate::{
    args::Args,
    deferred::{Reject, Resolve},
    value::CallbackValue,
};
use std::{fmt, rc::Rc};

/// A callable taking an ordered argument sequence. Clones share the same
/// underlying function.
pub struct Callback<V> {
    function: Rc<dyn Fn(Args<V>)>,
}

impl<V> Callback<V> {
    /// Wraps a function as a callback.
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(Args<V>) + 'static,
    {
        Self { function: Rc::new(function) }
    }

    /// Invokes the callback with the given arguments.
    pub fn invoke(&self, args: Args<V>) {
        (self.function)(args)
    }

    /// Tests whether both handles share the same function.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.function, &other.function)
    }
}

impl<V> Clone for Callback<V> {
    fn clone(&self) -> Self {
        Self { function: self.function.clone() }
    }
}

impl<V> PartialEq for Callback<V> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<V> fmt::Debug for Callback<V> {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        write!(fmtr, "Callback({:p})", Rc::as_ptr(&self.function))
    }
}

/// What a deferred value resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<V> {
    /// Single-value conventions resolve with one value.
    Single(V),
    /// Multi-value conventions resolve with every value received, in order.
    Multiple(Args<V>),
}

impl<V> Resolution<V> {
    /// Tests whether this came from a multi-value convention.
    pub fn is_multiple(&self) -> bool {
        matches!(self, Resolution::Multiple(_))
    }

    /// Converts into a sequence; a single value becomes a one-element
    /// sequence.
    pub fn into_multiple(self) -> Args<V> {
        match self {
            Resolution::Single(value) => Args::from([value]),
            Resolution::Multiple(values) => values,
        }
    }
}

impl<V> Resolution<V>
where
    V: CallbackValue,
{
    /// Converts into a single value; a sequence yields its first element, or
    /// the absent value when empty.
    pub fn into_single(self) -> V {
        match self {
            Resolution::Single(value) => value,
            Resolution::Multiple(values) => {
                values.into_iter().next().unwrap_or_else(V::absent)
            },
        }
    }
}

/// The callback convention of an adapter, resolved once from the two
/// configuration flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// `(err, value)`: truthy `err` rejects, otherwise resolves with `value`.
    ErrorFirst,
    /// `(value)`: always resolves with `value`.
    Plain,
    /// `(err, ...rest)`: truthy `err` rejects, otherwise resolves with `rest`.
    ErrorFirstMulti,
    /// `(...all)`: always resolves with every argument.
    PlainMulti,
}

impl Shape {
    /// Selects the convention for the given flags.
    pub fn from_flags(multiple_values: bool, error_first: bool) -> Self {
        match (multiple_values, error_first) {
            (false, true) => Shape::ErrorFirst,
            (false, false) => Shape::Plain,
            (true, true) => Shape::ErrorFirstMulti,
            (true, false) => Shape::PlainMulti,
        }
    }

    /// Tests whether the first argument is an error slot.
    pub fn is_error_first(self) -> bool {
        matches!(self, Shape::ErrorFirst | Shape::ErrorFirstMulti)
    }

    /// Tests whether every received value is resolved.
    pub fn is_multiple(self) -> bool {
        matches!(self, Shape::ErrorFirstMulti | Shape::PlainMulti)
    }

    /// Builds a callback settling through `resolve` and `reject` according
    /// to this convention. Later invocations settle again; the deferred
    /// primitive decides what that means.
    pub fn callback<V>(
        self,
        resolve: Resolve<Resolution<V>>,
        reject: Reject<V>,
    ) -> Callback<V>
    where
        V: CallbackValue + 'static,
    {
        match self {
            Shape::ErrorFirst => Callback::new(move |args: Args<V>| {
                let mut args = args.into_iter();
                let error = args.next().unwrap_or_else(V::absent);
                if error.is_truthy() {
                    reject(error);
                } else {
                    let value = args.next().unwrap_or_else(V::absent);
                    resolve(Resolution::Single(value));
                }
            }),

            Shape::Plain => Callback::new(move |args: Args<V>| {
                let value = args.into_iter().next().unwrap_or_else(V::absent);
                resolve(Resolution::Single(value));
            }),

            Shape::ErrorFirstMulti => {
                Callback::new(move |args: Args<V>| match args.split_first() {
                    Some((error, _)) if error.is_truthy() => reject(error),
                    Some((_, rest)) => resolve(Resolution::Multiple(rest)),
                    None => resolve(Resolution::Multiple(Args::new())),
                })
            },

            Shape::PlainMulti => Callback::new(move |args: Args<V>| {
                resolve(Resolution::Multiple(args));
            }),
        }
    }
}
