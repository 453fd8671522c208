//! Request dispatcher.
//!
//! Resolves a decoded request against the registry, invokes the method and
//! builds the response. Argument count and types are checked by the method
//! itself (see [`crate::method`]).

use std::any::Any;
use std::mem;
use std::panic::{self, AssertUnwindSafe};

use jrpc_protocol::{ErrorCode, RpcError, RpcRequest, RpcResponse};
use serde_json::Value;

use crate::method::Method;
use crate::registry::Registry;

/// Dispatch a request to its registered method.
pub fn dispatch(registry: &Registry, mut request: RpcRequest) -> Result<RpcResponse, RpcError> {
    let method = registry.resolve(&request.method)?;
    let params = mem::take(&mut request.params);
    let result = invoke(method, &request.method, params)?;
    Ok(RpcResponse::success(request, result))
}

/// Call the method, turning a panic into a SERVER_ERROR.
fn invoke(method: &dyn Method, name: &str, params: Vec<Value>) -> Result<Value, RpcError> {
    match panic::catch_unwind(AssertUnwindSafe(|| method.invoke(params))) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => {
            if err.code == ErrorCode::ServerError {
                tracing::warn!(method = %name, error = %err.data, "method returned error");
            }
            Err(err)
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(method = %name, panic = %message, "method panicked");
            Err(RpcError::server_error(format!("Method panicked: {}", message)))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::{MethodError, MethodResult};
    use crate::registry::RegistryBuilder;
    use serde_json::json;

    fn registry() -> Registry {
        let mut builder = RegistryBuilder::new();
        builder
            .service("Mock")
            .unwrap()
            .method("One", || -> MethodResult<&'static str> { Ok("Hello from mock method one!") })
            .unwrap()
            .method("Two", |a: String, b: String| -> MethodResult<String> {
                Ok(format!("Hello from mock method two: {} {}", a, b))
            })
            .unwrap()
            .method("Fail", || -> MethodResult<()> { Err(MethodError::new("store unavailable")) })
            .unwrap()
            .method("Panic", || -> MethodResult<()> { panic!("boom") })
            .unwrap();
        builder.build()
    }

    fn request(method: &str, params: Vec<Value>) -> RpcRequest {
        RpcRequest::new("2.0", method, params, 100)
    }

    #[test]
    fn test_dispatch_success_echoes_envelope() {
        let response = dispatch(&registry(), request("Mock.One", vec![])).unwrap();
        assert_eq!(response.jsonrpc, "2.0");
        assert_eq!(response.id, 100);
        assert_eq!(response.result, json!("Hello from mock method one!"));
    }

    #[test]
    fn test_dispatch_positional_params() {
        let params = vec![json!("test"), json!("test1")];
        let response = dispatch(&registry(), request("Mock.Two", params)).unwrap();
        assert_eq!(response.result, json!("Hello from mock method two: test test1"));
    }

    #[test]
    fn test_dispatch_arity_mismatch() {
        let err = dispatch(
            &registry(),
            request("Mock.One", vec![json!("test"), json!("test1"), json!("test2")]),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidParams);
        assert_eq!(err.data, "Too many parameters. Method takes 0 params, 3 provided");
    }

    #[test]
    fn test_dispatch_not_found_variants() {
        let registry = registry();

        let err = dispatch(&registry, request("MockOne", vec![])).unwrap_err();
        assert_eq!(err.code, ErrorCode::MethodNotFound);
        assert_eq!(err.data, "Provided method name needs to have format service.method");

        let err = dispatch(&registry, request("Test.Test", vec![])).unwrap_err();
        assert_eq!(err.data, "Provided service Test does not exist");

        let err = dispatch(&registry, request("Mock.Get", vec![])).unwrap_err();
        assert_eq!(err.data, "Provided method Get does not exist");
    }

    #[test]
    fn test_dispatch_method_failure() {
        let err = dispatch(&registry(), request("Mock.Fail", vec![])).unwrap_err();
        assert_eq!(err.code, ErrorCode::ServerError);
        assert_eq!(err.data, "store unavailable");
    }

    #[test]
    fn test_dispatch_recovers_panic() {
        let err = dispatch(&registry(), request("Mock.Panic", vec![])).unwrap_err();
        assert_eq!(err.code, ErrorCode::ServerError);
        assert_eq!(err.data, "Method panicked: boom");
    }

    #[test]
    fn test_panic_message_from_string_payload() {
        let payload: Box<dyn Any + Send> = Box::new(String::from("formatted 42"));
        assert_eq!(panic_message(payload.as_ref()), "formatted 42");

        let payload: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic payload");
    }
}
