//! Synchronous failures of adapted calls. Failures reported through a
//! callback never become an [`Error`]: they reject the deferred value.

use std::fmt;

/// An error raised before the wrapped operation could take its callback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The receiver has no member with this name.
    #[error("receiver has no member named `{method}`")]
    MethodNotFound {
        /// Name looked up.
        method: String,
    },
    /// The member exists but cannot be called.
    #[error("member `{method}` of the receiver is not callable")]
    NotCallable {
        /// Name looked up.
        method: String,
    },
    /// A custom applier or wrapped function failed.
    #[error("applier failed: {0}")]
    Applier(String),
    /// JavaScript threw while the applier ran.
    #[cfg(feature = "js")]
    #[error("javascript exception: {0}")]
    Js(String),
}

impl Error {
    /// Creates an [`Error::Applier`] from anything displayable.
    pub fn applier<M>(message: M) -> Self
    where
        M: fmt::Display,
    {
        Error::Applier(message.to_string())
    }
}
