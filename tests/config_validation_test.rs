use ptimer::config::{Config, DisplayConfig, load_from_path};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_display_validation_valid() {
    let config = DisplayConfig {
        tick_interval_ms: 2,
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_display_validation_zero_interval() {
    let config = DisplayConfig {
        tick_interval_ms: 0,
    };

    let result = config.validate();
    assert!(result.is_err());
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("tick_interval_ms must be greater than 0")
    );
}

#[test]
fn test_slow_interval_is_allowed() {
    let config = DisplayConfig {
        tick_interval_ms: 5000,
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_full_config_validation() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_load_rejects_invalid_interval() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file
        .write_all(b"[display]\ntick_interval_ms = 0\n")
        .unwrap();

    assert!(load_from_path(temp_file.path()).is_err());
}

#[test]
fn test_load_rejects_wrong_type() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file
        .write_all(b"[display]\ntick_interval_ms = \"fast\"\n")
        .unwrap();

    let result = load_from_path(temp_file.path());
    assert!(result.is_err());
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("Failed to parse config file")
    );
}
