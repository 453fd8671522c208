//! Methods exposed by the server binary.

pub mod health;

use jrpc_dispatch::{RegistrationError, RegistryBuilder};

/// Register every built-in service.
pub fn register_all(builder: &mut RegistryBuilder) -> Result<(), RegistrationError> {
    health::register(builder)?;
    Ok(())
}
