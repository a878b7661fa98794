use safepointer_core::{ConfigError, DemoConfig};
use std::io::Write;

#[test]
fn loads_config_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"{{"entity_name": "Timer Object", "max_delay_ms": 500, "seed": 3}}"#
    )
    .expect("write config");

    let config = DemoConfig::from_json_file(file.path()).expect("config should load");
    assert_eq!(config.entity_name, "Timer Object");
    assert_eq!(config.max_delay_ms, 500);
    assert_eq!(config.seed, Some(3));

    let mut delays = config.delay_source().expect("delay source");
    assert!(delays.next_delay_ms() < 500);
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.json");

    let err = DemoConfig::from_json_file(&path).expect_err("missing file must fail");
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}
