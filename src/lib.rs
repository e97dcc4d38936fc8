//! Adapters turning callback-style asynchronous functions into functions
//! returning deferred values.
//!
//! An adapter is built from an *applier*, which describes how to hand a
//! generated callback to the wrapped operation, and from [`Options`], which
//! select the callback convention and the kind of deferred value produced.
//! By default callbacks are error-first, resolve with a single value, and
//! deferred values are local futures ([`Pending`]).
//!
//! Three adapters come prebuilt: [`call`] for plain functions,
//! [`call_method`] and [`call_method_factory`] for methods looked up by name,
//! and [`till_event`] for the first occurrence of an event.
//!
//! # Examples
//!
//! ```
//! use futures::executor::block_on;
//! use std::rc::Rc;
//! use thenified::{args, call_method, Object, Resolution, Value};
//!
//! let calculator = Object::<Value>::new().with_method("sum", |_, mut args| {
//!     let callback = args.pop_callback().unwrap();
//!     let total: f64 = args.iter().filter_map(Value::as_number).sum();
//!     callback.invoke(args![Value::Null, total]);
//! });
//! let calculator = Rc::new(calculator);
//!
//! let deferred = call_method("sum", &calculator, args![2, 3]).unwrap();
//! assert_eq!(block_on(deferred), Ok(Resolution::Single(Value::from(5))));
//! ```

#![warn(missing_docs)]

mod macros;

mod args;
mod call;
mod config;
mod error;
mod event;
mod factory;
mod method;
mod value;

pub mod callback;
pub mod deferred;
pub mod future;

#[cfg(feature = "js")]
pub mod js;

pub use args::Args;
pub use call::{call, call_with, ApplyCall, DirectCall, Function};
pub use callback::{Callback, Resolution};
pub use config::{Config, Options};
pub use deferred::{Deferred, DeferredConstructor, Local, Pending};
pub use error::Error;
pub use event::{
    till_event,
    ApplyEvent,
    Emitter,
    EventEmitter,
    EventWait,
    ListenerId,
};
pub use factory::{factory, Adapter, Applier};
pub use future::ResolutionExt;
pub use method::{
    call_method,
    call_method_factory,
    call_method_factory_with,
    ApplyMethod,
    Member,
    Method,
    MethodAdapter,
    MethodCall,
    Object,
    Receiver,
};
pub use value::{CallbackValue, ErrorValue, Value};
