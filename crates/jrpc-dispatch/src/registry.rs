//! Method registry.
//!
//! Methods are grouped by service and addressed as `Service.Method`. The
//! registry is assembled once with a [`RegistryBuilder`] and then frozen;
//! the frozen [`Registry`] has no mutating operations and is shared
//! read-only across concurrent requests.
//!
//! # Example
//!
//! ```ignore
//! let mut builder = RegistryBuilder::new();
//! builder
//!     .service("Health")?
//!     .method("Check", || -> MethodResult<&'static str> { Ok("OK!") })?;
//! builder.register("Math.Add", |a: i64, b: i64| -> MethodResult<i64> { Ok(a + b) })?;
//! let registry = builder.build();
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use jrpc_protocol::RpcError;

use crate::method::{IntoMethod, Method};

/// Separator between the service and method segments of a name.
pub const NAME_SEPARATOR: char = '.';

/// Errors raised while registering methods.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("service name cannot be empty")]
    EmptyServiceName,

    #[error("method name cannot be empty")]
    EmptyMethodName,

    #[error("service name '{0}' cannot contain '.'")]
    DottedServiceName(String),

    #[error("method name '{0}' cannot contain '.'")]
    DottedMethodName(String),

    #[error("method name '{0}' needs to have format service.method")]
    MalformedName(String),
}

/// Reasons a dotted name fails to resolve.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("method name '{0}' is not of the form service.method")]
    MalformedName(String),

    #[error("service '{0}' does not exist")]
    UnknownService(String),

    #[error("method '{method}' does not exist on service '{service}'")]
    UnknownMethod { service: String, method: String },
}

impl From<LookupError> for RpcError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::MalformedName(_) => RpcError::malformed_method_name(),
            LookupError::UnknownService(service) => RpcError::service_not_found(&service),
            LookupError::UnknownMethod { method, .. } => RpcError::method_not_found(&method),
        }
    }
}

fn validate_service_name(name: &str) -> Result<(), RegistrationError> {
    if name.is_empty() {
        return Err(RegistrationError::EmptyServiceName);
    }
    if name.contains(NAME_SEPARATOR) {
        return Err(RegistrationError::DottedServiceName(name.to_string()));
    }
    Ok(())
}

fn validate_method_name(name: &str) -> Result<(), RegistrationError> {
    if name.is_empty() {
        return Err(RegistrationError::EmptyMethodName);
    }
    if name.contains(NAME_SEPARATOR) {
        return Err(RegistrationError::DottedMethodName(name.to_string()));
    }
    Ok(())
}

type ServiceMethods = HashMap<String, Arc<dyn Method>>;

/// Mutable registry used during startup.
#[derive(Default)]
pub struct RegistryBuilder {
    services: HashMap<String, ServiceMethods>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (or reopen) a service for method registration.
    pub fn service(&mut self, name: &str) -> Result<ServiceBuilder<'_>, RegistrationError> {
        validate_service_name(name)?;
        let methods = self.services.entry(name.to_string()).or_default();
        Ok(ServiceBuilder {
            service: name.to_string(),
            methods,
        })
    }

    /// Register a handler under a full `Service.Method` name.
    ///
    /// A previous registration under the same name is replaced.
    pub fn register<H, Args>(
        &mut self,
        name: &str,
        handler: H,
    ) -> Result<&mut Self, RegistrationError>
    where
        H: IntoMethod<Args>,
    {
        let (service, method) = name
            .split_once(NAME_SEPARATOR)
            .ok_or_else(|| RegistrationError::MalformedName(name.to_string()))?;
        self.service(service)?.method(method, handler)?;
        Ok(self)
    }

    /// Freeze the registry.
    pub fn build(self) -> Registry {
        Registry {
            services: self.services,
        }
    }
}

/// Registers methods under one service name.
pub struct ServiceBuilder<'a> {
    service: String,
    methods: &'a mut ServiceMethods,
}

impl ServiceBuilder<'_> {
    /// Register `handler` as `<service>.<name>`.
    ///
    /// A previous registration under the same name is replaced.
    pub fn method<H, Args>(
        &mut self,
        name: &str,
        handler: H,
    ) -> Result<&mut Self, RegistrationError>
    where
        H: IntoMethod<Args>,
    {
        validate_method_name(name)?;
        let method = handler.into_method();
        tracing::debug!(
            service = %self.service,
            method = %name,
            arity = method.arity(),
            "registering method"
        );
        if self.methods.insert(name.to_string(), method).is_some() {
            tracing::debug!(service = %self.service, method = %name, "replaced existing method");
        }
        Ok(self)
    }
}

/// Frozen, read-only set of registered methods.
pub struct Registry {
    services: HashMap<String, ServiceMethods>,
}

impl Registry {
    /// Resolve a dotted name to its method.
    ///
    /// The name is split at every `.`; the first segment is the service and
    /// the second the method. Further segments are ignored, so `A.b.c`
    /// resolves the same as `A.b`.
    pub fn resolve(&self, name: &str) -> Result<&dyn Method, LookupError> {
        let mut segments = name.split(NAME_SEPARATOR);
        let (service, method) = match (segments.next(), segments.next()) {
            (Some(service), Some(method)) => (service, method),
            _ => return Err(LookupError::MalformedName(name.to_string())),
        };

        let methods = self
            .services
            .get(service)
            .ok_or_else(|| LookupError::UnknownService(service.to_string()))?;

        methods
            .get(method)
            .map(|m| m.as_ref())
            .ok_or_else(|| LookupError::UnknownMethod {
                service: service.to_string(),
                method: method.to_string(),
            })
    }

    /// Whether a dotted name resolves.
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_ok()
    }

    /// All registered `Service.Method` names, sorted.
    pub fn method_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .services
            .iter()
            .flat_map(|(service, methods)| {
                methods
                    .keys()
                    .map(move |method| format!("{}{}{}", service, NAME_SEPARATOR, method))
            })
            .collect();
        names.sort();
        names
    }

    /// Number of registered methods across all services.
    pub fn len(&self) -> usize {
        self.services.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("methods", &self.method_names())
            .finish()
    }
}
