#![cfg(all(target_arch = "wasm32", feature = "js"))]

use js_sys::{Array, Function, Object, Reflect};
use thenified::{
    args,
    js::{self, JsPromise},
    Adapter,
    Args,
    Callback,
    CallbackValue,
    Error,
    Options,
};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

fn init() {
    console_error_panic_hook::set_once();
}

fn sum_async() -> Function {
    Function::new_with_args(
        "a, b, callback",
        "setTimeout(callback, 0, null, a + b);",
    )
}

#[wasm_bindgen_test]
async fn call_resolves_second_argument() {
    init();
    let promise = js::call(&sum_async(), args![1, 2]).unwrap();
    let result = JsFuture::from(promise).await.unwrap();
    assert_eq!(result.as_f64(), Some(3.0));
}

#[wasm_bindgen_test]
async fn call_forwards_variadic_arguments() {
    init();
    let sum = Function::new_with_args(
        "",
        "var args = Array.prototype.slice.call(arguments);
         var callback = args.pop();
         var total = args.reduce(function (a, b) { return a + b; }, 0);
         callback(null, total, args.length);",
    );
    let promise = js::call(&sum, args![1, 2, 3, 4]).unwrap();
    let result = JsFuture::from(promise).await.unwrap();
    assert_eq!(result.as_f64(), Some(10.0));
}

#[wasm_bindgen_test]
async fn call_rejects_with_error_argument() {
    init();
    let failing = Function::new_with_args(
        "a, b, callback",
        "callback(new TypeError('nononono'));",
    );
    let promise = js::call(&failing, args!["1", "2"]).unwrap();
    let error = JsFuture::from(promise).await.unwrap_err();
    let message = Reflect::get(&error, &JsValue::from_str("message")).unwrap();
    assert_eq!(message.as_string().unwrap(), "nononono");
}

#[wasm_bindgen_test]
async fn multiple_values_resolve_as_array() {
    init();
    let stat = Function::new_with_args(
        "path, callback",
        "setTimeout(callback, 0, null, path, 512, true);",
    );
    let adapter = Adapter::with_options(
        move |callback: Callback<JsValue>,
              mut args: Args<JsValue>|
              -> Result<(), Error> {
            args.push_last(JsValue::from_callback(callback));
            let args: Array = args.iter().collect();
            stat.apply(&JsValue::UNDEFINED, &args)
                .map_err(|error| Error::Js(format!("{:?}", error)))?;
            Ok(())
        },
        Options::new().multiple_values(true).deferred(JsPromise),
    );

    let promise = adapter.invoke(args!["a.txt"]).unwrap();
    let result = JsFuture::from(promise).await.unwrap();
    let values = result.dyn_into::<Array>().unwrap();
    assert_eq!(values.length(), 3);
    assert_eq!(values.get(0).as_string().unwrap(), "a.txt");
    assert_eq!(values.get(1).as_f64(), Some(512.0));
    assert_eq!(values.get(2).as_bool(), Some(true));
}

#[wasm_bindgen_test]
fn call_reports_synchronous_throw() {
    init();
    let throwing = Function::new_no_args("throw new Error('early');");
    let error = js::call(&throwing, args![]).unwrap_err();
    assert!(matches!(error, Error::Js(_)));
}

#[wasm_bindgen_test]
async fn call_method_uses_receiver_as_this() {
    init();
    let make = Function::new_no_args(
        "return {
            offset: 10,
            sum: function (a, b, callback) {
                var self = this;
                setTimeout(function () {
                    callback(null, a + b + self.offset);
                });
            },
        };",
    );
    let receiver = make.call0(&JsValue::NULL).unwrap();
    let promise = js::call_method("sum", &receiver, args![2, 3]).unwrap();
    let result = JsFuture::from(promise).await.unwrap();
    assert_eq!(result.as_f64(), Some(15.0));
}

#[wasm_bindgen_test]
fn call_method_reports_missing_method() {
    init();
    let receiver = JsValue::from(Object::new());
    let error = js::call_method("nope", &receiver, args![]).unwrap_err();
    assert_eq!(error, Error::MethodNotFound { method: String::from("nope") });
}

#[wasm_bindgen_test]
async fn till_event_uses_on_and_remove_listener() {
    init();
    let make = Function::new_no_args(
        "var listeners = [];
         return {
            listeners: listeners,
            on: function (event, listener) { listeners.push(listener); },
            removeListener: function (event, listener) {
                var index = listeners.indexOf(listener);
                if (index >= 0) listeners.splice(index, 1);
            },
            emit: function () {
                var args = arguments;
                listeners.slice().forEach(function (listener) {
                    listener.apply(null, Array.prototype.slice.call(args, 1));
                });
            },
        };",
    );
    let emitter = make.call0(&JsValue::NULL).unwrap();
    let promise = js::till_event("foo", &emitter).unwrap();

    let emit = Reflect::get(&emitter, &JsValue::from_str("emit"))
        .unwrap()
        .dyn_into::<Function>()
        .unwrap();
    emit.call3(&emitter, &"foo".into(), &"bar".into(), &"baz".into())
        .unwrap();
    emit.call2(&emitter, &"foo".into(), &"baz".into()).unwrap();

    let result = JsFuture::from(promise).await.unwrap();
    assert_eq!(result.as_string().unwrap(), "bar");

    let listeners =
        Reflect::get(&emitter, &JsValue::from_str("listeners")).unwrap();
    let length = Reflect::get(&listeners, &JsValue::from_str("length"));
    assert_eq!(length.unwrap().as_f64(), Some(0.0));
}

#[wasm_bindgen_test]
async fn till_dom_event_resolves_with_event() {
    init();
    let target = web_sys::EventTarget::new().unwrap();
    let promise = js::till_dom_event("ping", &target).unwrap();
    let event = web_sys::Event::new("ping").unwrap();
    target.dispatch_event(&event).unwrap();
    let result = JsFuture::from(promise).await.unwrap();
    assert_eq!(JsValue::from(event), result);
}
