//! Module for waiting on the first occurrence of a named event.
//!
//! # Examples
//!
//! ```
//! use futures::executor::block_on;
//! use std::rc::Rc;
//! use thenified::{args, till_event, EventEmitter, Resolution, Value};
//!
//! let emitter = Rc::new(EventEmitter::<Value>::new());
//! let deferred = till_event("ready", &emitter).unwrap();
//! emitter.emit("ready", args!["bar", "baz"]);
//! emitter.emit("ready", args!["baz"]);
//! assert_eq!(emitter.listener_count("ready"), 0);
//! assert_eq!(block_on(deferred), Ok(Resolution::Single(Value::from("bar"))));
//! ```

use crate::{
    args::Args,
    callback::Callback,
    config::Options,
    deferred::Deferred,
    error::Error,
    factory::{Adapter, Applier},
    value::CallbackValue,
};
use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    fmt,
    marker::PhantomData,
    rc::Rc,
};

/// Identifies a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Something emitting named events to registered listeners.
pub trait Emitter<V> {
    /// Registers a listener called on every occurrence of `event`.
    fn add_listener(&self, event: &str, listener: Callback<V>) -> ListenerId;

    /// Unregisters a listener. Returns whether it was registered.
    fn remove_listener(&self, event: &str, id: ListenerId) -> bool;

    /// Registers a listener called on the next occurrence of `event` only.
    ///
    /// Emitters without a native "once" capability keep this default, which
    /// hands the listener back; callers then subscribe with
    /// [`add_listener`](Emitter::add_listener) and unsubscribe themselves.
    fn once(
        &self,
        event: &str,
        listener: Callback<V>,
    ) -> Result<ListenerId, Callback<V>> {
        let _ = event;
        Err(listener)
    }
}

struct Registration<V> {
    id: ListenerId,
    once: bool,
    listener: Callback<V>,
}

/// A single-threaded event emitter.
pub struct EventEmitter<V> {
    next_id: Cell<u64>,
    events: RefCell<HashMap<String, Vec<Registration<V>>>>,
}

impl<V> EventEmitter<V> {
    /// Creates an emitter without listeners.
    pub fn new() -> Self {
        Self { next_id: Cell::new(0), events: RefCell::new(HashMap::new()) }
    }

    fn register(
        &self,
        event: &str,
        listener: Callback<V>,
        once: bool,
    ) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.events
            .borrow_mut()
            .entry(event.to_owned())
            .or_default()
            .push(Registration { id, once, listener });
        id
    }

    /// Registers a listener for every occurrence of `event`.
    pub fn on(&self, event: &str, listener: Callback<V>) -> ListenerId {
        self.register(event, listener, false)
    }

    /// Registers a listener for the next occurrence of `event` only.
    pub fn once(&self, event: &str, listener: Callback<V>) -> ListenerId {
        self.register(event, listener, true)
    }

    /// Unregisters a listener. Returns whether it was registered.
    pub fn off(&self, event: &str, id: ListenerId) -> bool {
        let mut events = self.events.borrow_mut();
        let Some(registrations) = events.get_mut(event) else {
            return false;
        };
        let before = registrations.len();
        registrations.retain(|registration| registration.id != id);
        let removed = registrations.len() != before;
        if registrations.is_empty() {
            events.remove(event);
        }
        removed
    }

    /// Number of listeners registered for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.events.borrow().get(event).map_or(0, Vec::len)
    }
}

impl<V> EventEmitter<V>
where
    V: Clone,
{
    /// Emits `event`, calling its listeners in registration order with a copy
    /// of `args`. One-shot listeners are unregistered before any listener
    /// runs. Returns whether there was any listener.
    ///
    /// Listeners may register and unregister listeners; such changes apply
    /// from the next emission.
    pub fn emit(&self, event: &str, args: Args<V>) -> bool {
        let listeners: Vec<Callback<V>> = {
            let mut events = self.events.borrow_mut();
            let Some(registrations) = events.get_mut(event) else {
                return false;
            };
            let listeners = registrations
                .iter()
                .map(|registration| registration.listener.clone())
                .collect();
            registrations.retain(|registration| !registration.once);
            if registrations.is_empty() {
                events.remove(event);
            }
            listeners
        };
        for listener in &listeners {
            listener.invoke(args.clone());
        }
        !listeners.is_empty()
    }
}

impl<V> Default for EventEmitter<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for EventEmitter<V> {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        let events = self.events.borrow();
        let counts: HashMap<&str, usize> = events
            .iter()
            .map(|(event, registrations)| (event.as_str(), registrations.len()))
            .collect();
        fmtr.debug_struct("EventEmitter").field("listeners", &counts).finish()
    }
}

impl<V> Emitter<V> for EventEmitter<V> {
    fn add_listener(&self, event: &str, listener: Callback<V>) -> ListenerId {
        self.on(event, listener)
    }

    fn remove_listener(&self, event: &str, id: ListenerId) -> bool {
        self.off(event, id)
    }

    fn once(
        &self,
        event: &str,
        listener: Callback<V>,
    ) -> Result<ListenerId, Callback<V>> {
        Ok(EventEmitter::once(self, event, listener))
    }
}

/// Arguments forwarded by an event wait.
pub struct EventWait<E> {
    /// Name of the awaited event.
    pub event: Rc<str>,
    /// The emitter.
    pub emitter: Rc<E>,
}

impl<E> EventWait<E> {
    /// Packages an event wait.
    pub fn new(event: Rc<str>, emitter: Rc<E>) -> Self {
        Self { event, emitter }
    }
}

impl<E> fmt::Debug for EventWait<E> {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        fmtr.debug_struct("EventWait").field("event", &self.event).finish()
    }
}

/// Applier of event waits: registers a listener removed after its first
/// call.
pub struct ApplyEvent<V> {
    _marker: PhantomData<fn(V)>,
}

impl<V> ApplyEvent<V> {
    /// Creates the applier.
    pub fn new() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<V> Default for ApplyEvent<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for ApplyEvent<V> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for ApplyEvent<V> {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        fmtr.write_str("ApplyEvent")
    }
}

impl<E, V> Applier<EventWait<E>, V> for ApplyEvent<V>
where
    E: Emitter<V> + 'static,
    V: 'static,
{
    fn apply(
        &self,
        callback: Callback<V>,
        input: EventWait<E>,
    ) -> Result<(), Error> {
        let EventWait { event, emitter } = input;
        let callback = match emitter.once(&event, callback) {
            Ok(_) => return Ok(()),
            Err(callback) => callback,
        };

        let fired = Rc::new(Cell::new(false));
        let registered = Rc::new(Cell::new(None));
        let weak_emitter = Rc::downgrade(&emitter);

        let listener = {
            let fired = fired.clone();
            let registered = registered.clone();
            let event = event.clone();
            Callback::new(move |args: Args<V>| {
                if fired.replace(true) {
                    return;
                }
                if let (Some(emitter), Some(id)) =
                    (weak_emitter.upgrade(), registered.take())
                {
                    emitter.remove_listener(&event, id);
                    tracing::trace!(%event, "one-shot listener removed");
                }
                callback.invoke(args);
            })
        };

        let id = emitter.add_listener(&event, listener);
        if fired.get() {
            emitter.remove_listener(&event, id);
        } else {
            registered.set(Some(id));
        }
        Ok(())
    }
}

/// Waits for the first occurrence of `event` on `emitter`, resolving with the
/// first argument it carries. The listener is removed once it fires, so
/// later occurrences have no effect.
///
/// If the event never occurs the deferred value never settles.
pub fn till_event<E, V>(
    event: &str,
    emitter: &Rc<E>,
) -> Result<Deferred<V>, Error>
where
    E: Emitter<V> + 'static,
    V: CallbackValue + 'static,
{
    Adapter::with_options(ApplyEvent::new(), Options::new().error_first(false))
        .named("thenifiedTillEvent")
        .invoke(EventWait::new(Rc::from(event), emitter.clone()))
}
