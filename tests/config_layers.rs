//! Layered configuration tests: defaults, TOML file, CLI flags.

use std::io::Write;

use jrpc_server::{CliOverrides, ConfigError, ServerConfig};
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_file_layer_over_defaults() {
    let file = write_config(
        r#"
[server]
listen = "127.0.0.1:7070"

[dispatch]
max_body_bytes = 2048
"#,
    );

    let config = ServerConfig::load(Some(file.path()), &CliOverrides::default()).unwrap();
    assert_eq!(config.server.listen, "127.0.0.1:7070");
    assert_eq!(config.dispatch.max_body_bytes, 2048);
    assert_eq!(config.log.filter, "info");
}

#[test]
fn test_cli_layer_over_file() {
    let file = write_config(
        r#"
[server]
listen = "127.0.0.1:7070"

[dispatch]
max_body_bytes = 2048

[log]
filter = "jrpc_dispatch=debug"
"#,
    );
    let overrides = CliOverrides {
        listen: Some("127.0.0.1:9090".to_string()),
        max_body_bytes: None,
    };

    let config = ServerConfig::load(Some(file.path()), &overrides).unwrap();
    assert_eq!(config.listen_addr().unwrap().port(), 9090);
    assert_eq!(config.dispatch.max_body_bytes, 2048);
    assert_eq!(config.log.filter, "jrpc_dispatch=debug");
}

#[test]
fn test_missing_explicit_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = ServerConfig::load(Some(&path), &CliOverrides::default()).unwrap_err();
    assert!(matches!(err, ConfigError::IoError(_)), "got: {}", err);
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let file = write_config("[server\nlisten = 1");
    let err = ServerConfig::load(Some(file.path()), &CliOverrides::default()).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)), "got: {}", err);
}

#[test]
fn test_bad_listen_address_is_validation_error() {
    let file = write_config("[server]\nlisten = \"not-an-address\"\n");
    let err = ServerConfig::load(Some(file.path()), &CliOverrides::default()).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError(_)), "got: {}", err);
}

#[test]
fn test_zero_body_limit_from_cli_rejected() {
    let overrides = CliOverrides {
        listen: None,
        max_body_bytes: Some(0),
    };
    let err = ServerConfig::load(None, &overrides).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError(_)), "got: {}", err);
}
