//! This module defines the ordered argument sequence forwarded from a call site
//! into an applier, and from an applier into a wrapped function.

use crate::{callback::Callback, value::CallbackValue};
use std::{ops::Index, slice, vec};

/// An ordered, growable sequence of call arguments.
///
/// Arguments are captured at one call site and splatted at another, usually
/// with a generated callback appended through [`Args::push_last`].
#[derive(Debug, Clone, PartialEq)]
pub struct Args<V> {
    items: Vec<V>,
}

impl<V> Args<V> {
    /// Creates an empty argument sequence.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Creates an empty argument sequence with room for `capacity` arguments.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { items: Vec::with_capacity(capacity) }
    }

    /// Appends an argument as the last positional argument.
    pub fn push_last(&mut self, value: V) {
        self.items.push(value);
    }

    /// Removes the last positional argument, if any.
    pub fn pop_last(&mut self) -> Option<V> {
        self.items.pop()
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Tests whether there are no arguments at all.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The argument at position `index`.
    pub fn get(&self, index: usize) -> Option<&V> {
        self.items.get(index)
    }

    /// The first argument.
    pub fn first(&self) -> Option<&V> {
        self.items.first()
    }

    /// The last argument.
    pub fn last(&self) -> Option<&V> {
        self.items.last()
    }

    /// Iterates over the arguments in order.
    pub fn iter(&self) -> slice::Iter<'_, V> {
        self.items.iter()
    }

    /// Arguments as a slice.
    pub fn as_slice(&self) -> &[V] {
        &self.items
    }

    /// Splits the first argument off the rest. Returns `None` when empty.
    pub fn split_first(self) -> Option<(V, Args<V>)> {
        let mut items = self.items.into_iter();
        let first = items.next()?;
        Some((first, items.collect()))
    }

    /// Converts into the underlying vector.
    pub fn into_vec(self) -> Vec<V> {
        self.items
    }
}

impl<V> Args<V>
where
    V: CallbackValue,
{
    /// Removes the last argument and interprets it as a callback. This is how
    /// a wrapped callback-style function retrieves the callback appended by
    /// an adapter.
    ///
    /// The last argument is consumed even when it is not a callback.
    pub fn pop_callback(&mut self) -> Option<Callback<V>> {
        self.pop_last().and_then(|value| value.to_callback())
    }
}

impl<V> Default for Args<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> From<Vec<V>> for Args<V> {
    fn from(items: Vec<V>) -> Self {
        Self { items }
    }
}

impl<V, const N: usize> From<[V; N]> for Args<V> {
    fn from(items: [V; N]) -> Self {
        Self { items: Vec::from(items) }
    }
}

impl<V> FromIterator<V> for Args<V> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = V>,
    {
        Self { items: iter.into_iter().collect() }
    }
}

impl<V> Extend<V> for Args<V> {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = V>,
    {
        self.items.extend(iter);
    }
}

impl<V> IntoIterator for Args<V> {
    type Item = V;
    type IntoIter = vec::IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'args, V> IntoIterator for &'args Args<V> {
    type Item = &'args V;
    type IntoIter = slice::Iter<'args, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<V> Index<usize> for Args<V> {
    type Output = V;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

#[cfg(test)]
mod test {
    use super::Args;

    #[test]
    fn split_first_strips_only_the_head() {
        let args = Args::from([1, 2, 3]);
        let (head, rest) = args.split_first().unwrap();
        assert_eq!(head, 1);
        assert_eq!(rest.into_vec(), vec![2, 3]);
        assert!(Args::<i32>::new().split_first().is_none());
    }

    #[test]
    fn push_last_appends_after_existing() {
        let mut args: Args<i32> = (0..2).collect();
        args.push_last(9);
        assert_eq!(args.as_slice(), &[0, 1, 9]);
        assert_eq!(args.last(), Some(&9));
    }
}
