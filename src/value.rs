//! This module defines what a callback argument is, and a small dynamic value
//! type usable as one.

use crate::{args::Args, callback::Callback};
use std::{fmt, rc::Rc};

/// Values that travel through generated callbacks.
///
/// An error-first callback needs to decide whether its first argument
/// reports an error, which is done through truthiness. Wrapped functions
/// receive the generated callback as their last positional argument, so a
/// callback must also be representable as a value.
pub trait CallbackValue: Sized {
    /// Tests whether this value counts as "present" in the error slot.
    fn is_truthy(&self) -> bool;

    /// The value resolved when a callback omits an argument.
    fn absent() -> Self;

    /// Embeds a callback into a value.
    fn from_callback(callback: Callback<Self>) -> Self;

    /// Extracts a callback from a value, if the value is callable.
    fn to_callback(&self) -> Option<Callback<Self>>;
}

/// An error reported through a callback. Errors are compared by identity:
/// clones of the same error are equal, two errors created separately are not,
/// even with the same message.
#[derive(Clone)]
pub struct ErrorValue {
    inner: Rc<ErrorInner>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: &'static str,
    message: String,
}

impl ErrorValue {
    /// Creates a generic error with the given message.
    pub fn new<M>(message: M) -> Self
    where
        M: Into<String>,
    {
        Self::with_kind("Error", message)
    }

    /// Creates an error of a named kind, such as `"TypeError"`.
    pub fn with_kind<M>(kind: &'static str, message: M) -> Self
    where
        M: Into<String>,
    {
        Self { inner: Rc::new(ErrorInner { kind, message: message.into() }) }
    }

    /// Kind of this error.
    pub fn kind(&self) -> &'static str {
        self.inner.kind
    }

    /// Message of this error.
    pub fn message(&self) -> &str {
        &self.inner.message
    }

    /// Tests whether both handles point to the same error.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for ErrorValue {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ErrorValue {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        fmtr.debug_struct("ErrorValue")
            .field("kind", &self.inner.kind)
            .field("message", &self.inner.message)
            .finish()
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        write!(fmtr, "{}: {}", self.inner.kind, self.inner.message)
    }
}

impl std::error::Error for ErrorValue {}

/// A dynamically typed callback argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A missing value.
    Undefined,
    /// An explicit "nothing", the usual error slot of a successful callback.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A string.
    Str(Rc<str>),
    /// An error.
    Error(ErrorValue),
    /// An ordered list of values.
    List(Rc<[Value]>),
    /// A callable value.
    Function(Callback<Value>),
}

impl Value {
    /// The number inside, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(number) => Some(*number),
            _ => None,
        }
    }

    /// The string inside, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(string) => Some(string),
            _ => None,
        }
    }

    /// The error inside, if this is an error.
    pub fn as_error(&self) -> Option<&ErrorValue> {
        match self {
            Value::Error(error) => Some(error),
            _ => None,
        }
    }

    /// Tests whether this is `Undefined` or `Null`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }
}

impl CallbackValue for Value {
    fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(boolean) => *boolean,
            Value::Number(number) => *number != 0.0 && !number.is_nan(),
            Value::Str(string) => !string.is_empty(),
            Value::Error(_) | Value::List(_) | Value::Function(_) => true,
        }
    }

    fn absent() -> Self {
        Value::Undefined
    }

    fn from_callback(callback: Callback<Self>) -> Self {
        Value::Function(callback)
    }

    fn to_callback(&self) -> Option<Callback<Self>> {
        match self {
            Value::Function(callback) => Some(callback.clone()),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Undefined
    }
}

impl fmt::Display for Value {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Undefined => write!(fmtr, "undefined"),
            Value::Null => write!(fmtr, "null"),
            Value::Bool(boolean) => write!(fmtr, "{}", boolean),
            Value::Number(number) => write!(fmtr, "{}", number),
            Value::Str(string) => write!(fmtr, "{}", string),
            Value::Error(error) => write!(fmtr, "{}", error),
            Value::List(items) => {
                write!(fmtr, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(fmtr, ", ")?;
                    }
                    write!(fmtr, "{}", item)?;
                }
                write!(fmtr, "]")
            },
            Value::Function(_) => write!(fmtr, "[function]"),
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Undefined
    }
}

impl From<bool> for Value {
    fn from(boolean: bool) -> Self {
        Value::Bool(boolean)
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Value::Number(number)
    }
}

impl From<i32> for Value {
    fn from(number: i32) -> Self {
        Value::Number(f64::from(number))
    }
}

impl From<u32> for Value {
    fn from(number: u32) -> Self {
        Value::Number(f64::from(number))
    }
}

impl<'s> From<&'s str> for Value {
    fn from(string: &'s str) -> Self {
        Value::Str(Rc::from(string))
    }
}

impl From<String> for Value {
    fn from(string: String) -> Self {
        Value::Str(Rc::from(string))
    }
}

impl From<ErrorValue> for Value {
    fn from(error: ErrorValue) -> Self {
        Value::Error(error)
    }
}

impl From<Callback<Value>> for Value {
    fn from(callback: Callback<Value>) -> Self {
        Value::Function(callback)
    }
}

impl From<Args<Value>> for Value {
    fn from(args: Args<Value>) -> Self {
        Value::List(args.into_vec().into())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(option: Option<T>) -> Self {
        match option {
            Some(value) => value.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod test {
    use super::{CallbackValue, ErrorValue, Value};

    #[test]
    fn truthiness_follows_loose_rules() {
        assert!(!Value::Undefined.is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(!Value::from(f64::NAN).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::from(false).is_truthy());
        assert!(Value::from(1).is_truthy());
        assert!(Value::from("x").is_truthy());
        assert!(Value::from(ErrorValue::new("x")).is_truthy());
    }

    #[test]
    fn errors_compare_by_identity() {
        let error = ErrorValue::new("boom");
        assert_eq!(error, error.clone());
        assert_ne!(error, ErrorValue::new("boom"));
        assert_eq!(error.to_string(), "Error: boom");
    }
}
