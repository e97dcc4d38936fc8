//! Method calls: looking a member up by name on a receiver when the call
//! happens, then invoking it with the receiver as its context.

use crate::{
    args::Args,
    callback::{Callback, Resolution},
    config::Options,
    deferred::{Deferred, DeferredConstructor, Local},
    error::Error,
    factory::{Adapter, Applier},
    value::CallbackValue,
};
use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

/// A callback-style method of receivers of type `R`.
pub struct Method<R, V> {
    function: Rc<dyn Fn(&R, Args<V>) -> Result<(), Error>>,
}

impl<R, V> Method<R, V> {
    /// Wraps an infallible method.
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(&R, Args<V>) + 'static,
    {
        Self::fallible(move |this, args| {
            function(this, args);
            Ok(())
        })
    }

    /// Wraps a method that may fail before taking its callback.
    pub fn fallible<F>(function: F) -> Self
    where
        F: Fn(&R, Args<V>) -> Result<(), Error> + 'static,
    {
        Self { function: Rc::new(function) }
    }

    /// Calls the method with `this` as its receiver.
    pub fn apply(&self, this: &R, args: Args<V>) -> Result<(), Error> {
        (self.function)(this, args)
    }
}

impl<R, V> Clone for Method<R, V> {
    fn clone(&self) -> Self {
        Self { function: self.function.clone() }
    }
}

impl<R, V> fmt::Debug for Method<R, V> {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        write!(fmtr, "Method({:p})", Rc::as_ptr(&self.function))
    }
}

/// A member found on a receiver.
#[derive(Debug)]
pub enum Member<R, V> {
    /// A callable member.
    Method(Method<R, V>),
    /// A plain value, which cannot be called.
    Value(V),
}

impl<R, V> Clone for Member<R, V>
where
    V: Clone,
{
    fn clone(&self) -> Self {
        match self {
            Member::Method(method) => Member::Method(method.clone()),
            Member::Value(value) => Member::Value(value.clone()),
        }
    }
}

/// Something whose members can be looked up by name.
pub trait Receiver<V>: Sized {
    /// Looks the member up. Called on every adapted call, never cached.
    fn member(&self, name: &str) -> Option<Member<Self, V>>;
}

/// A dynamic object with named members that can be replaced at any time.
pub struct Object<V> {
    members: RefCell<HashMap<String, Member<Object<V>, V>>>,
}

impl<V> Object<V> {
    /// Creates an object without members.
    pub fn new() -> Self {
        Self { members: RefCell::new(HashMap::new()) }
    }

    /// Adds a method, builder style.
    pub fn with_method<F>(self, name: &str, function: F) -> Self
    where
        F: Fn(&Self, Args<V>) + 'static,
    {
        self.set_method(name, function);
        self
    }

    /// Sets an infallible method, replacing any member with that name.
    pub fn set_method<F>(&self, name: &str, function: F)
    where
        F: Fn(&Self, Args<V>) + 'static,
    {
        self.set(name, Member::Method(Method::new(function)));
    }

    /// Sets a plain value, replacing any member with that name.
    pub fn set_value(&self, name: &str, value: V) {
        self.set(name, Member::Value(value));
    }

    /// Sets a member, replacing any member with that name.
    pub fn set(&self, name: &str, member: Member<Self, V>) {
        self.members.borrow_mut().insert(name.to_owned(), member);
    }

    /// Removes a member, returning it.
    pub fn remove(&self, name: &str) -> Option<Member<Self, V>> {
        self.members.borrow_mut().remove(name)
    }
}

impl<V> Default for Object<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for Object<V> {
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        let members = self.members.borrow();
        let mut names: Vec<&str> = members.keys().map(String::as_str).collect();
        names.sort_unstable();
        fmtr.debug_struct("Object").field("members", &names).finish()
    }
}

impl<V> Receiver<V> for Object<V>
where
    V: Clone,
{
    fn member(&self, name: &str) -> Option<Member<Self, V>> {
        self.members.borrow().get(name).cloned()
    }
}

/// Arguments forwarded by a method call: the method name, the receiver and
/// the arguments, not including the callback.
pub struct MethodCall<R, V> {
    /// Name of the member to call.
    pub method: Rc<str>,
    /// The receiver, also the call's context.
    pub receiver: Rc<R>,
    /// Arguments before the callback.
    pub args: Args<V>,
}

impl<R, V> MethodCall<R, V> {
    /// Packages a method call.
    pub fn new(method: Rc<str>, receiver: Rc<R>, args: Args<V>) -> Self {
        Self { method, receiver, args }
    }
}

impl<R, V> fmt::Debug for MethodCall<R, V>
where
    V: fmt::Debug,
{
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        fmtr.debug_struct("MethodCall")
            .field("method", &self.method)
            .field("args", &self.args)
            .finish()
    }
}

/// Applier of method calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyMethod;

impl<R, V> Applier<MethodCall<R, V>, V> for ApplyMethod
where
    R: Receiver<V>,
    V: CallbackValue,
{
    fn apply(
        &self,
        callback: Callback<V>,
        input: MethodCall<R, V>,
    ) -> Result<(), Error> {
        let MethodCall { method, receiver, mut args } = input;
        let function = match receiver.member(&method) {
            Some(Member::Method(function)) => function,
            Some(Member::Value(_)) => {
                return Err(Error::NotCallable { method: method.to_string() })
            },
            None => {
                return Err(Error::MethodNotFound { method: method.to_string() })
            },
        };
        args.push_last(V::from_callback(callback));
        function.apply(&receiver, args)
    }
}

/// Calls the method named `method` on `receiver`, returning a deferred value
/// settled by its error-first callback.
///
/// The member is looked up now, not when an adapter was built, so replacing a
/// member affects later calls.
pub fn call_method<R, V>(
    method: &str,
    receiver: &Rc<R>,
    args: Args<V>,
) -> Result<Deferred<V>, Error>
where
    R: Receiver<V>,
    V: CallbackValue + 'static,
{
    Adapter::new(ApplyMethod).invoke(MethodCall::new(
        Rc::from(method),
        receiver.clone(),
        args,
    ))
}

/// An adapter bound to a fixed method name.
pub struct MethodAdapter<R, V, D = Local> {
    method: Rc<str>,
    adapter: Adapter<ApplyMethod, MethodCall<R, V>, V, D>,
}

impl<R, V, D> MethodAdapter<R, V, D>
where
    R: Receiver<V>,
    V: CallbackValue + 'static,
    D: DeferredConstructor<Resolution<V>, V>,
{
    fn new(method: &str, options: Options<D>) -> Self {
        let name = display_name(method);
        tracing::debug!(method, name = %name, "method adapter built");
        Self {
            method: Rc::from(method),
            adapter: Adapter::with_options(ApplyMethod, options).named(name),
        }
    }

    /// Calls the bound method on `receiver`.
    pub fn invoke(
        &self,
        receiver: &Rc<R>,
        args: Args<V>,
    ) -> Result<D::Deferred, Error> {
        self.adapter.invoke(MethodCall::new(
            self.method.clone(),
            receiver.clone(),
            args,
        ))
    }
}

impl<R, V, D> MethodAdapter<R, V, D> {
    /// The bound method name.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The display name, such as `thenifiedSumAsync` for `sumAsync`.
    pub fn name(&self) -> &str {
        self.adapter.name().unwrap_or_default()
    }
}

impl<R, V, D> fmt::Debug for MethodAdapter<R, V, D>
where
    D: fmt::Debug,
{
    fn fmt(&self, fmtr: &mut fmt::Formatter) -> fmt::Result {
        fmtr.debug_struct("MethodAdapter")
            .field("method", &self.method)
            .field("adapter", &self.adapter)
            .finish()
    }
}

/// Builds an adapter bound to `method`, so call sites only pass the receiver
/// and the arguments.
pub fn call_method_factory<R, V>(method: &str) -> MethodAdapter<R, V>
where
    R: Receiver<V>,
    V: CallbackValue + 'static,
{
    MethodAdapter::new(method, Options::new())
}

/// Like [`call_method_factory`], with configuration overrides.
pub fn call_method_factory_with<R, V, D>(
    method: &str,
    options: Options<D>,
) -> MethodAdapter<R, V, D>
where
    R: Receiver<V>,
    V: CallbackValue + 'static,
    D: DeferredConstructor<Resolution<V>, V>,
{
    MethodAdapter::new(method, options)
}

fn display_name(method: &str) -> String {
    let mut chars = method.chars();
    let mut name = String::from("thenified");
    if let Some(first) = chars.next() {
        name.extend(first.to_uppercase());
        name.push_str(chars.as_str());
    }
    name
}
