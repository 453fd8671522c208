//! `Health` service.

use jrpc_dispatch::{MethodResult, RegistrationError, RegistryBuilder};

/// Service name under which the methods are registered.
pub const SERVICE: &str = "Health";

/// Value returned by `Health.Check`.
pub const CHECK_OK: &str = "OK!";

/// `Health.Check`: liveness probe.
pub fn check() -> MethodResult<&'static str> {
    Ok(CHECK_OK)
}

pub fn register(builder: &mut RegistryBuilder) -> Result<(), RegistrationError> {
    builder.service(SERVICE)?.method("Check", check)?;
    Ok(())
}
