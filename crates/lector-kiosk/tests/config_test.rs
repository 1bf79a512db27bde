//! Integration tests for configuration loading

use std::io::Write;

use lector_core::Error;
use lector_hardware::FacingMode;
use lector_kiosk::KioskConfig;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();

    let config_content = r#"
[scanner]
facing_mode = "user"
fps = 15
qrbox = { width = 300, height = 200 }

[routes]
externo = "/observador/"
computo = "/computo"

[logging]
filter = "lector_kiosk=trace"
"#;

    temp_file.write_all(config_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = KioskConfig::from_file(temp_file.path()).unwrap();

    assert_eq!(config.scanner.facing_mode, FacingMode::User);
    assert_eq!(config.scanner.fps, 15);
    assert_eq!(config.scanner.qrbox.width, 300);
    assert_eq!(config.scanner.qrbox.height, 200);
    assert_eq!(config.routes.externo, "/observador/");
    assert_eq!(config.logging.filter, "lector_kiosk=trace");

    // Trailing slashes on a base do not double up.
    let navigation = config.routes.navigation(&lector_core::classify("externo-1"));
    assert_eq!(navigation.path, "/observador/externo-1");
}

#[test]
fn test_missing_file_names_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let error = KioskConfig::from_file(&path).unwrap_err();

    assert!(matches!(error, Error::Config(_)));
    assert!(error.to_string().contains(&path.display().to_string()));
}

#[test]
fn test_invalid_file_names_path() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[scanner]\nfps = 0\n").unwrap();
    temp_file.flush().unwrap();

    let error = KioskConfig::from_file(temp_file.path()).unwrap_err();

    assert!(matches!(error, Error::Config(_)));
    assert!(error.to_string().contains(&temp_file.path().display().to_string()));
}

#[test]
fn test_load_explicit_path() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[scanner]\nfps = 3\n").unwrap();
    temp_file.flush().unwrap();

    let config = KioskConfig::load(Some(temp_file.path().to_path_buf())).unwrap();

    assert_eq!(config.scanner.fps, 3);
}
