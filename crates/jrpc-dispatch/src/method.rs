//! Typed method adapters.
//!
//! Any `Fn(A1, .., An) -> Result<T, E>` whose arguments are deserializable
//! and whose result is serializable can be registered as a [`Method`]. The
//! adapter checks the argument count, converts each positional JSON argument
//! into the closure's native parameter type, and converts the returned value
//! back into JSON.
//!
//! ```ignore
//! let add = |a: i64, b: i64| -> MethodResult<i64> { Ok(a + b) };
//! let method = add.into_method();
//! assert_eq!(method.arity(), 2);
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use jrpc_protocol::RpcError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Failure reported by a method implementation.
///
/// Becomes a SERVER_ERROR envelope whose `data` is the message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct MethodError {
    message: String,
}

impl MethodError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for MethodError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for MethodError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Result type for method implementations.
pub type MethodResult<T> = Result<T, MethodError>;

/// An invocable unit with a fixed number of positional arguments.
pub trait Method: Send + Sync {
    /// Number of positional arguments the method requires.
    fn arity(&self) -> usize;

    /// Invoke the method with positional JSON arguments.
    fn invoke(&self, params: Vec<Value>) -> Result<Value, RpcError>;
}

/// Conversion of a closure or function into a shared [`Method`].
///
/// `Args` is the tuple of the closure's parameter types; it is inferred and
/// only exists to keep the per-arity implementations apart.
pub trait IntoMethod<Args> {
    fn into_method(self) -> Arc<dyn Method>;
}

/// Adapter wrapping a closure of a specific arity.
pub struct FnMethod<F, Args> {
    f: F,
    _args: PhantomData<fn() -> Args>,
}

impl<F, Args> FnMethod<F, Args> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            _args: PhantomData,
        }
    }
}

fn check_arity(required: usize, provided: usize) -> Result<(), RpcError> {
    if required == provided {
        Ok(())
    } else {
        Err(RpcError::arity_mismatch(required, provided))
    }
}

fn decode_param<A: DeserializeOwned>(position: usize, value: Option<Value>) -> Result<A, RpcError> {
    serde_json::from_value(value.unwrap_or(Value::Null))
        .map_err(|e| RpcError::invalid_param(position, e))
}

fn encode_result<T: Serialize>(result: &T) -> Result<Value, RpcError> {
    serde_json::to_value(result)
        .map_err(|e| RpcError::internal_error(format!("failed to encode result: {}", e)))
}

macro_rules! impl_method_for_fn {
    ($arity:literal $(, $arg:ident)*) => {
        impl<F, T, E, $($arg,)*> Method for FnMethod<F, ($($arg,)*)>
        where
            F: Fn($($arg),*) -> Result<T, E> + Send + Sync,
            T: Serialize,
            E: fmt::Display,
            $($arg: DeserializeOwned,)*
        {
            fn arity(&self) -> usize {
                $arity
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn invoke(&self, params: Vec<Value>) -> Result<Value, RpcError> {
                check_arity($arity, params.len())?;

                let mut params = params.into_iter();
                let mut position: usize = 0;
                $(
                    position += 1;
                    let $arg: $arg = decode_param(position, params.next())?;
                )*

                let result = (self.f)($($arg),*)
                    .map_err(|e| RpcError::server_error(e.to_string()))?;
                encode_result(&result)
            }
        }

        impl<F, T, E, $($arg,)*> IntoMethod<($($arg,)*)> for F
        where
            F: Fn($($arg),*) -> Result<T, E> + Send + Sync + 'static,
            T: Serialize,
            E: fmt::Display,
            $($arg: DeserializeOwned + 'static,)*
        {
            fn into_method(self) -> Arc<dyn Method> {
                Arc::new(FnMethod::<F, ($($arg,)*)>::new(self))
            }
        }
    };
}

impl_method_for_fn!(0);
impl_method_for_fn!(1, A1);
impl_method_for_fn!(2, A1, A2);
impl_method_for_fn!(3, A1, A2, A3);
impl_method_for_fn!(4, A1, A2, A3, A4);
impl_method_for_fn!(5, A1, A2, A3, A4, A5);
impl_method_for_fn!(6, A1, A2, A3, A4, A5, A6);
impl_method_for_fn!(7, A1, A2, A3, A4, A5, A6, A7);
impl_method_for_fn!(8, A1, A2, A3, A4, A5, A6, A7, A8);
