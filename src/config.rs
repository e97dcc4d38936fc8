//! This module defines adapter configuration: partial [`Options`] given by the
//! adapter author, merged over the defaults into an immutable [`Config`].

use crate::{callback::Shape, deferred::Local};

/// Resolved configuration of an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config<D = Local> {
    /// Whether every callback argument is resolved, instead of a single one.
    pub multiple_values: bool,
    /// Whether the first callback argument is an error slot.
    pub error_first: bool,
    /// The constructor of deferred values.
    pub deferred: D,
}

impl Default for Config<Local> {
    fn default() -> Self {
        Self { multiple_values: false, error_first: true, deferred: Local }
    }
}

impl<D> Config<D> {
    /// The callback convention selected by the flags.
    pub fn shape(&self) -> Shape {
        Shape::from_flags(self.multiple_values, self.error_first)
    }
}

/// Overrides of the default configuration. Fields left unset fall back to
/// the defaults of [`Config`].
///
/// # Examples
///
/// ```
/// use thenified::{callback::Shape, Options};
///
/// let config = Options::new().multiple_values(true).merge();
/// assert!(config.error_first);
/// assert_eq!(config.shape(), Shape::ErrorFirstMulti);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options<D = Local> {
    multiple_values: Option<bool>,
    error_first: Option<bool>,
    deferred: D,
}

impl Options<Local> {
    /// Creates options overriding nothing.
    pub fn new() -> Self {
        Self { multiple_values: None, error_first: None, deferred: Local }
    }
}

impl Default for Options<Local> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Options<D> {
    /// Overrides whether every callback argument is resolved.
    pub fn multiple_values(self, multiple_values: bool) -> Self {
        Self { multiple_values: Some(multiple_values), ..self }
    }

    /// Overrides whether the first callback argument is an error slot.
    pub fn error_first(self, error_first: bool) -> Self {
        Self { error_first: Some(error_first), ..self }
    }

    /// Overrides the constructor of deferred values.
    pub fn deferred<C>(self, deferred: C) -> Options<C> {
        Options {
            multiple_values: self.multiple_values,
            error_first: self.error_first,
            deferred,
        }
    }

    /// Merges these overrides over the defaults.
    pub fn merge(self) -> Config<D> {
        let defaults = Config::default();
        Config {
            multiple_values: self
                .multiple_values
                .unwrap_or(defaults.multiple_values),
            error_first: self.error_first.unwrap_or(defaults.error_first),
            deferred: self.deferred,
        }
    }
}

impl<D> From<Config<D>> for Options<D> {
    fn from(config: Config<D>) -> Self {
        Self {
            multiple_values: Some(config.multiple_values),
            error_first: Some(config.error_first),
            deferred: config.deferred,
        }
    }
}
