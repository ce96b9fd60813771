//! Custom per-locale implementations of a message interface

use crate::interface::MethodId;
use crate::value::Value;
use msgbind_common::BoxError;
use std::sync::Arc;

/// Hand-written implementation of a message interface for one locale
pub trait MessageImpl: Send + Sync {
    /// Answer one method call; the result is returned to the caller verbatim
    fn invoke(&self, method: &MethodId, args: &[Value]) -> Result<Value, BoxError>;
}

/// Creates the implementation instance on first use
pub type ImplFactory = Arc<dyn Fn() -> Result<Arc<dyn MessageImpl>, BoxError> + Send + Sync>;

/// Factory for an implementation type with a `Default` constructor
#[must_use]
pub fn default_factory<T>() -> ImplFactory
where
    T: MessageImpl + Default + 'static,
{
    Arc::new(|| Ok(Arc::new(T::default()) as Arc<dyn MessageImpl>))
}

/// Factory that hands out one shared, already-built instance
pub fn shared_factory(instance: Arc<dyn MessageImpl>) -> ImplFactory {
    Arc::new(move || Ok(Arc::clone(&instance)))
}

impl<F> MessageImpl for F
where
    F: Fn(&MethodId, &[Value]) -> Result<Value, BoxError> + Send + Sync,
{
    fn invoke(&self, method: &MethodId, args: &[Value]) -> Result<Value, BoxError> {
        self(method, args)
    }
}
