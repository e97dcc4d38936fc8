//! Adaptors for futures resolving with a [`Resolution`], for callers that know
//! which convention an adapter uses.

use crate::{args::Args, callback::Resolution, value::CallbackValue};
use pin_project::pin_project;
use std::{future::Future, pin::Pin, task};

/// Extension methods for deferred values resolving with a [`Resolution`].
pub trait ResolutionExt<V>:
    Future<Output = Result<Resolution<V>, V>> + Sized
{
    /// Resolves with a single value instead.
    fn single(self) -> Single<Self> {
        Single { inner: self }
    }

    /// Resolves with a sequence of values instead.
    fn multiple(self) -> Multiple<Self> {
        Multiple { inner: self }
    }
}

impl<F, V> ResolutionExt<V> for F where
    F: Future<Output = Result<Resolution<V>, V>>
{
}

/// Future returned by [`ResolutionExt::single`].
#[pin_project]
#[derive(Debug)]
pub struct Single<F> {
    #[pin]
    inner: F,
}

impl<F, V> Future for Single<F>
where
    F: Future<Output = Result<Resolution<V>, V>>,
    V: CallbackValue,
{
    type Output = Result<V, V>;

    fn poll(
        self: Pin<&mut Self>,
        ctx: &mut task::Context<'_>,
    ) -> task::Poll<Self::Output> {
        self.project()
            .inner
            .poll(ctx)
            .map(|result| result.map(Resolution::into_single))
    }
}

/// Future returned by [`ResolutionExt::multiple`].
#[pin_project]
#[derive(Debug)]
pub struct Multiple<F> {
    #[pin]
    inner: F,
}

impl<F, V> Future for Multiple<F>
where
    F: Future<Output = Result<Resolution<V>, V>>,
{
    type Output = Result<Args<V>, V>;

    fn poll(
        self: Pin<&mut Self>,
        ctx: &mut task::Context<'_>,
    ) -> task::Poll<Self::Output> {
        self.project()
            .inner
            .poll(ctx)
            .map(|result| result.map(Resolution::into_multiple))
    }
}
