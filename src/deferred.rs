//! This module defines pluggable deferred-value constructors and the local,
//! single-threaded deferred value used by default.

use crate::callback::Resolution;
use futures::future::FusedFuture;
use std::{cell::Cell, fmt, future::Future, pin::Pin, rc::Rc, task};

/// Settles a deferred value successfully.
pub type Resolve<T> = Rc<dyn Fn(T)>;

/// Settles a deferred value with a failure.
pub type Reject<E> = Rc<dyn Fn(E)>;

/// A constructor of deferred values following the executor convention: the
/// constructor creates a deferred value and immediately hands its settlement
/// functions to the executor.
///
/// Settling an already settled value must be a silent no-op.
pub trait DeferredConstructor<T, E> {
    /// The deferred value produced.
    type Deferred;

    /// Creates a deferred value, running `executor` synchronously with its
    /// settlement functions.
    fn construct<X>(&self, executor: X) -> Self::Deferred
    where
        X: FnOnce(Resolve<T>, Reject<E>);
}

/// The default constructor, producing [`Pending`] futures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Local;

impl<T, E> DeferredConstructor<T, E> for Local
where
    T: 'static,
    E: 'static,
{
    type Deferred = Pending<T, E>;

    fn construct<X>(&self, executor: X) -> Self::Deferred
    where
        X: FnOnce(Resolve<T>, Reject<E>),
    {
        let (settler, pending) = channel();
        let resolve: Resolve<T> = {
            let settler = settler.clone();
            Rc::new(move |value| settler.settle(Ok(value)))
        };
        let reject: Reject<E> =
            Rc::new(move |error| settler.settle(Err(error)));
        executor(resolve, reject);
        pending
    }
}

/// The deferred value adapters produce under the default configuration.
pub type Deferred<V> = Pending<Resolution<V>, V>;

enum State<T, E> {
    Waiting,
    Settled(Result<T, E>),
    Taken,
}

struct Slot<T, E> {
    state: Cell<State<T, E>>,
    waker: Cell<Option<task::Waker>>,
}

impl<T, E> Slot<T, E> {
    fn init_waiting() -> Self {
        Self { state: Cell::new(State::Waiting), waker: Cell::new(None) }
    }

    fn is_waiting(&self) -> bool {
        let state = self.state.replace(State::Taken);
        let waiting = matches!(state, State::Waiting);
        self.state.set(state);
        waiting
    }
}

fn channel<T, E>() -> (Settler<T, E>, Pending<T, E>) {
    let slot = Rc::new(Slot::init_waiting());
    (Settler { slot: slot.clone() }, Pending { slot })
}

struct Settler<T, E> {
    slot: Rc<Slot<T, E>>,
}

impl<T, E> Settler<T, E> {
    fn settle(&self, outcome: Result<T, E>) {
        match self.slot.state.replace(State::Taken) {
            State::Waiting => {
                tracing::trace!(
                    resolved = outcome.is_ok(),
                    "deferred value settled"
                );
                self.slot.state.set(State::Settled(outcome));
                if let Some(waker) = self.slot.waker.take() {
                    waker.wake();
                }
            },
            state => {
                tracing::trace!("ignoring settlement of a settled value");
                self.slot.state.set(state);
            },
        }
    }
}

impl<T, E> Clone for Settler<T, E> {
    fn clone(&self) -> Self {
        Self { slot: self.slot.clone() }
    }
}

/// A local deferred value: a future completing with `Ok` when resolved and
/// `Err` when rejected.
///
/// If nothing ever settles it, it stays pending forever.
pub struct Pending<T, E> {
    slot: Rc<Slot<T, E>>,
}

impl<T, E> Pending<T, E> {
    /// Tests whether the value was settled, whether or not the outcome was
    /// already taken by polling.
    pub fn is_settled(&self) -> bool {
        !self.slot.is_waiting()
    }
}

impl<T, E> fmt::Debug for Pending<T, E> {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        fmtr.debug_struct("Pending")
            .field("settled", &self.is_settled())
            .finish()
    }
}

impl<T, E> Future for Pending<T, E> {
    type Output = Result<T, E>;

    fn poll(
        self: Pin<&mut Self>,
        ctx: &mut task::Context<'_>,
    ) -> task::Poll<Self::Output> {
        match self.slot.state.replace(State::Taken) {
            State::Settled(outcome) => task::Poll::Ready(outcome),
            State::Waiting => {
                self.slot.state.set(State::Waiting);
                self.slot.waker.set(Some(ctx.waker().clone()));
                task::Poll::Pending
            },
            State::Taken => panic!("`Pending` polled after completion"),
        }
    }
}

impl<T, E> FusedFuture for Pending<T, E> {
    fn is_terminated(&self) -> bool {
        let state = self.slot.state.replace(State::Taken);
        let taken = matches!(state, State::Taken);
        self.slot.state.set(state);
        taken
    }
}

#[cfg(test)]
mod test {
    use super::{DeferredConstructor, Local, Pending};
    use futures::{executor::block_on, future::FusedFuture};

    #[test]
    fn first_settlement_wins() {
        let pending: Pending<i32, &str> = Local.construct(|resolve, reject| {
            resolve(1);
            reject("late");
            resolve(2);
        });
        assert!(pending.is_settled());
        assert_eq!(block_on(pending), Ok(1));
    }

    #[test]
    fn unsettled_stays_pending() {
        let pending: Pending<i32, i32> = Local.construct(|_, _| ());
        assert!(!pending.is_settled());
        assert!(!pending.is_terminated());
    }

    #[test]
    fn settling_after_construction_wakes() {
        let mut handles = None;
        let pending: Pending<&str, ()> = Local.construct(|resolve, reject| {
            handles = Some((resolve, reject));
        });
        assert!(!pending.is_settled());
        let (resolve, _) = handles.unwrap();
        resolve("later");
        assert_eq!(block_on(pending), Ok("later"));
    }
}
