//! This module defines macros.

/// Builds an [`Args`](crate::Args) sequence. Syntax:
/// ```ignore
/// args![$($arguments),*]
/// ```
/// Each argument is converted into the sequence's value type using `Into`.
///
/// # Examples
///
/// ```
/// use thenified::{args, Args, Value};
///
/// let args: Args<Value> = args![Value::Null, 1, "two"];
/// assert_eq!(args.len(), 3);
/// assert_eq!(args[2], Value::from("two"));
///
/// let empty: Args<Value> = args![];
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::new()
    };
    ($($argument:expr),+ $(,)?) => {
        $crate::Args::from(::std::vec![
            $(::core::convert::Into::into($argument)),+
        ])
    };
}
