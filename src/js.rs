//! JavaScript interop: `Promise` as the deferred value, `JsValue` as the
//! callback value, and adapters for JS functions, methods and emitters.
//!
//! # Examples
//!
//! ```no_run
//! use thenified::{args, js};
//! use wasm_bindgen::JsValue;
//! use wasm_bindgen_futures::JsFuture;
//!
//! # async fn run() -> Result<(), JsValue> {
//! let read_file = js_sys::Function::new_with_args(
//!     "path, callback",
//!     "setTimeout(callback, 0, null, 'contents of ' + path);",
//! );
//! let promise = js::call(&read_file, args!["a.txt"]).unwrap();
//! let contents = JsFuture::from(promise).await?;
//! assert_eq!(contents.as_string().unwrap(), "contents of a.txt");
//! # Ok(())
//! # }
//! ```

use crate::{
    args::Args,
    callback::{Callback, Resolution},
    config::Options,
    deferred::{DeferredConstructor, Reject, Resolve},
    error::Error,
    factory::{Adapter, Applier},
    value::CallbackValue,
};
use js_sys::{Array, Function, Promise, Reflect};
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};

thread_local! {
    static VARIADIC: Function = Function::new_with_args(
        "inner",
        "return function () { inner(Array.prototype.slice.call(arguments)); };",
    );
}

fn to_array(args: Args<JsValue>) -> Array {
    args.iter().collect()
}

fn js_error(exception: JsValue) -> Error {
    Error::Js(format!("{:?}", exception))
}

/// Looks a callable member up on a JS object.
fn lookup(target: &JsValue, name: &str) -> Result<Option<Function>, Error> {
    let member =
        Reflect::get(target, &JsValue::from_str(name)).map_err(js_error)?;
    Ok(member.dyn_into::<Function>().ok())
}

impl CallbackValue for JsValue {
    fn is_truthy(&self) -> bool {
        JsValue::is_truthy(self)
    }

    fn absent() -> Self {
        JsValue::UNDEFINED
    }

    fn from_callback(callback: Callback<Self>) -> Self {
        let closure = Closure::wrap(Box::new(move |args: Array| {
            callback.invoke(args.iter().collect());
        }) as Box<dyn FnMut(Array)>)
        .into_js_value();
        match VARIADIC.with(|shim| shim.call1(&JsValue::NULL, &closure)) {
            Ok(function) => function,
            Err(exception) => {
                tracing::debug!(?exception, "variadic shim unavailable");
                closure
            },
        }
    }

    fn to_callback(&self) -> Option<Callback<Self>> {
        let function = self.dyn_ref::<Function>()?.clone();
        Some(Callback::new(move |args: Args<JsValue>| {
            if let Err(exception) =
                function.apply(&JsValue::UNDEFINED, &to_array(args))
            {
                tracing::debug!(?exception, "callback threw");
            }
        }))
    }
}

impl From<Resolution<JsValue>> for JsValue {
    fn from(resolution: Resolution<JsValue>) -> Self {
        match resolution {
            Resolution::Single(value) => value,
            Resolution::Multiple(values) => to_array(values).into(),
        }
    }
}

/// Constructor of JS promises. Multi-value resolutions become arrays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsPromise;

impl DeferredConstructor<Resolution<JsValue>, JsValue> for JsPromise {
    type Deferred = Promise;

    fn construct<X>(&self, executor: X) -> Self::Deferred
    where
        X: FnOnce(Resolve<Resolution<JsValue>>, Reject<JsValue>),
    {
        let mut executor = Some(executor);
        Promise::new(&mut |resolve: Function, reject: Function| {
            let Some(executor) = executor.take() else {
                return;
            };
            let resolve: Resolve<Resolution<JsValue>> =
                Rc::new(move |resolution| {
                    let value = JsValue::from(resolution);
                    let _ = resolve.call1(&JsValue::UNDEFINED, &value);
                });
            let reject: Reject<JsValue> = Rc::new(move |error| {
                let _ = reject.call1(&JsValue::UNDEFINED, &error);
            });
            executor(resolve, reject);
        })
    }
}

struct ApplyCall;

impl Applier<(Function, Args<JsValue>), JsValue> for ApplyCall {
    fn apply(
        &self,
        callback: Callback<JsValue>,
        (function, mut args): (Function, Args<JsValue>),
    ) -> Result<(), Error> {
        args.push_last(JsValue::from_callback(callback));
        function.apply(&JsValue::UNDEFINED, &to_array(args)).map_err(js_error)?;
        Ok(())
    }
}

struct ApplyMethod;

impl Applier<(Rc<str>, JsValue, Args<JsValue>), JsValue> for ApplyMethod {
    fn apply(
        &self,
        callback: Callback<JsValue>,
        (method, receiver, mut args): (Rc<str>, JsValue, Args<JsValue>),
    ) -> Result<(), Error> {
        let member = Reflect::get(&receiver, &JsValue::from_str(&method))
            .map_err(js_error)?;
        if member.is_undefined() {
            return Err(Error::MethodNotFound { method: method.to_string() });
        }
        let function = member
            .dyn_into::<Function>()
            .map_err(|_| Error::NotCallable { method: method.to_string() })?;
        args.push_last(JsValue::from_callback(callback));
        function.apply(&receiver, &to_array(args)).map_err(js_error)?;
        Ok(())
    }
}

struct ApplyEvent;

impl Applier<(Rc<str>, JsValue), JsValue> for ApplyEvent {
    fn apply(
        &self,
        callback: Callback<JsValue>,
        (event, emitter): (Rc<str>, JsValue),
    ) -> Result<(), Error> {
        let event = JsValue::from_str(&event);

        if let Some(once) = lookup(&emitter, "once")? {
            let listener = JsValue::from_callback(callback);
            once.call2(&emitter, &event, &listener).map_err(js_error)?;
            return Ok(());
        }

        let on = match lookup(&emitter, "on")? {
            Some(on) => on,
            None => lookup(&emitter, "addListener")?.ok_or_else(|| {
                Error::MethodNotFound { method: String::from("on") }
            })?,
        };
        let remove = match lookup(&emitter, "removeListener")? {
            Some(remove) => remove,
            None => lookup(&emitter, "off")?.ok_or_else(|| {
                Error::MethodNotFound { method: String::from("removeListener") }
            })?,
        };

        let fired = Rc::new(Cell::new(false));
        let registered: Rc<RefCell<Option<JsValue>>> = Rc::default();
        let listener = JsValue::from_callback(Callback::new({
            let fired = fired.clone();
            let registered = registered.clone();
            let remove = remove.clone();
            let emitter = emitter.clone();
            let event = event.clone();
            move |args: Args<JsValue>| {
                if fired.replace(true) {
                    return;
                }
                if let Some(listener) = registered.borrow_mut().take() {
                    let _ = remove.call2(&emitter, &event, &listener);
                }
                callback.invoke(args);
            }
        }));

        on.call2(&emitter, &event, &listener).map_err(js_error)?;
        if fired.get() {
            remove.call2(&emitter, &event, &listener).map_err(js_error)?;
        } else {
            *registered.borrow_mut() = Some(listener);
        }
        Ok(())
    }
}

struct ApplyDomEvent;

impl Applier<(Rc<str>, web_sys::EventTarget), JsValue> for ApplyDomEvent {
    fn apply(
        &self,
        callback: Callback<JsValue>,
        (event, target): (Rc<str>, web_sys::EventTarget),
    ) -> Result<(), Error> {
        let listener = JsValue::from_callback(callback);
        let mut options = web_sys::AddEventListenerOptions::new();
        #[allow(deprecated)]
        options.once(true);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                &event,
                listener.unchecked_ref(),
                &options,
            )
            .map_err(js_error)
    }
}

/// Calls an error-first callback-style JS function with no `this`,
/// returning a promise.
pub fn call(
    function: &Function,
    args: Args<JsValue>,
) -> Result<Promise, Error> {
    Adapter::with_options(ApplyCall, Options::new().deferred(JsPromise))
        .invoke((function.clone(), args))
}

/// Calls the method named `method` of `receiver` with `receiver` as `this`.
/// The method is looked up at call time.
pub fn call_method(
    method: &str,
    receiver: &JsValue,
    args: Args<JsValue>,
) -> Result<Promise, Error> {
    Adapter::with_options(ApplyMethod, Options::new().deferred(JsPromise))
        .invoke((Rc::from(method), receiver.clone(), args))
}

/// Waits for the first occurrence of `event` on a Node-style emitter,
/// resolving with its first argument. Uses the emitter's `once` when it has
/// one, otherwise `on` and `removeListener`.
pub fn till_event(event: &str, emitter: &JsValue) -> Result<Promise, Error> {
    let options = Options::new().error_first(false).deferred(JsPromise);
    Adapter::with_options(ApplyEvent, options)
        .invoke((Rc::from(event), emitter.clone()))
}

/// Waits for the first occurrence of `event` on a DOM event target,
/// resolving with the event object.
pub fn till_dom_event(
    event: &str,
    target: &web_sys::EventTarget,
) -> Result<Promise, Error> {
    let options = Options::new().error_first(false).deferred(JsPromise);
    Adapter::with_options(ApplyDomEvent, options)
        .invoke((Rc::from(event), target.clone()))
}
