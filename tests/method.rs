use futures::{
    executor::{block_on, LocalPool},
    task::LocalSpawnExt,
};
use std::{cell::RefCell, rc::Rc};
use thenified::{
    args,
    call_method,
    call_method_factory,
    call_method_factory_with,
    Args,
    Error,
    ErrorValue,
    MethodAdapter,
    Object,
    Options,
    Resolution,
    Value,
};

/// Contexts and arguments each `sumAsync` call saw.
type Calls = Rc<RefCell<Vec<(*const Object<Value>, usize)>>>;

fn calculator(pool: &LocalPool, calls: &Calls) -> Rc<Object<Value>> {
    let spawner = pool.spawner();
    let calls = calls.clone();
    Rc::new(Object::new().with_method(
        "sumAsync",
        move |this: &Object<Value>, mut args: Args<Value>| {
            calls.borrow_mut().push((this as *const _, args.len()));
            let callback = args.pop_callback().unwrap();
            let total: f64 = args.iter().filter_map(Value::as_number).sum();
            spawner
                .spawn_local(async move {
                    callback.invoke(args![Value::Null, total]);
                })
                .unwrap();
        },
    ))
}

#[test]
fn resolves_value_passed_to_callback() {
    let mut pool = LocalPool::new();
    let calls = Calls::default();
    let instance = calculator(&pool, &calls);

    let deferred = call_method("sumAsync", &instance, args![1, 2]).unwrap();
    assert!(!deferred.is_settled());
    let result = pool.run_until(deferred);
    assert_eq!(result, Ok(Resolution::Single(Value::from(3))));

    let calls = calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], (Rc::as_ptr(&instance), 3));
}

#[test]
fn works_with_dynamic_length_function() {
    let mut pool = LocalPool::new();
    let calls = Calls::default();
    let instance = calculator(&pool, &calls);

    let deferred =
        call_method("sumAsync", &instance, args![1, 2, 3, 4]).unwrap();
    let result = pool.run_until(deferred);
    assert_eq!(result, Ok(Resolution::Single(Value::from(10))));
    assert_eq!(calls.borrow()[0], (Rc::as_ptr(&instance), 5));
}

#[test]
fn sum_scenario_uses_receiver_as_context() {
    let seen_context = Rc::new(RefCell::new(None));
    let instance = Rc::new(Object::new().with_method("sum", {
        let seen_context = seen_context.clone();
        move |this: &Object<Value>, mut args: Args<Value>| {
            *seen_context.borrow_mut() = Some(this as *const Object<Value>);
            let callback = args.pop_callback().unwrap();
            let x = args[0].as_number().unwrap();
            let y = args[1].as_number().unwrap();
            callback.invoke(args![Value::Null, x + y]);
        }
    }));

    let deferred = call_method("sum", &instance, args![2, 3]).unwrap();
    assert_eq!(block_on(deferred), Ok(Resolution::Single(Value::from(5))));
    assert_eq!(*seen_context.borrow(), Some(Rc::as_ptr(&instance)));
}

#[test]
fn rejects_with_error_passed_to_callback() {
    let error = ErrorValue::with_kind("TypeError", "nononono");
    let instance = Rc::new(Object::new().with_method("sumAsync", {
        let error = error.clone();
        move |_: &Object<Value>, mut args: Args<Value>| {
            let callback = args.pop_callback().unwrap();
            callback.invoke(args![error.clone()]);
        }
    }));

    let deferred = call_method("sumAsync", &instance, args!["1", "2"]).unwrap();
    assert_eq!(block_on(deferred), Err(Value::from(error)));
}

#[test]
fn missing_method_fails_synchronously() {
    let instance = Rc::new(Object::<Value>::new());
    let error = call_method("nope", &instance, args![]).unwrap_err();
    assert_eq!(error, Error::MethodNotFound { method: String::from("nope") });
}

#[test]
fn non_callable_member_fails_synchronously() {
    let instance = Rc::new(Object::<Value>::new());
    instance.set_value("answer", Value::from(42));
    let error = call_method("answer", &instance, args![]).unwrap_err();
    assert_eq!(error, Error::NotCallable { method: String::from("answer") });
}

#[test]
fn factory_is_named_after_method() {
    let adapter = call_method_factory::<Object<Value>, Value>("sumAsync");
    assert_eq!(adapter.method(), "sumAsync");
    assert_eq!(adapter.name(), "thenifiedSumAsync");
}

fn label<R, V, D>(adapter: &MethodAdapter<R, V, D>) -> (&str, &str) {
    (adapter.method(), adapter.name())
}

#[test]
fn factory_with_options_is_named_after_method() {
    let adapter = call_method_factory_with::<Object<Value>, Value, _>(
        "readFile",
        Options::new().error_first(false),
    );
    assert_eq!(label(&adapter), ("readFile", "thenifiedReadFile"));
}

#[test]
fn factory_binds_method_late() {
    let adapter = call_method_factory::<Object<Value>, Value>("greet");
    let instance = Rc::new(Object::new());

    assert_eq!(
        adapter.invoke(&instance, args![]).unwrap_err(),
        Error::MethodNotFound { method: String::from("greet") }
    );

    instance.set_method("greet", |_, mut args: Args<Value>| {
        let callback = args.pop_callback().unwrap();
        callback.invoke(args![Value::Null, "hello"]);
    });
    let deferred = adapter.invoke(&instance, args![]).unwrap();
    assert_eq!(
        block_on(deferred),
        Ok(Resolution::Single(Value::from("hello")))
    );

    instance.set_method("greet", |_, mut args: Args<Value>| {
        let callback = args.pop_callback().unwrap();
        callback.invoke(args![Value::Null, "bonjour"]);
    });
    let deferred = adapter.invoke(&instance, args![]).unwrap();
    assert_eq!(
        block_on(deferred),
        Ok(Resolution::Single(Value::from("bonjour")))
    );
}

#[test]
fn factory_serves_many_receivers() {
    let adapter = call_method_factory_with::<Object<Value>, Value, _>(
        "pair",
        Options::new().multiple_values(true),
    );
    let make = |tag: &'static str| {
        Rc::new(Object::new().with_method(
            "pair",
            move |_: &Object<Value>, mut args: Args<Value>| {
                let callback = args.pop_callback().unwrap();
                callback.invoke(args![Value::Null, tag, args.len() as u32]);
            },
        ))
    };

    let first = adapter.invoke(&make("first"), args![1]).unwrap();
    let second = adapter.invoke(&make("second"), args![1, 2]).unwrap();
    assert_eq!(
        block_on(first),
        Ok(Resolution::Multiple(args!["first", 1]))
    );
    assert_eq!(
        block_on(second),
        Ok(Resolution::Multiple(args!["second", 2]))
    );
}
