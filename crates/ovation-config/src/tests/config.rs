use crate::{Config, ConfigError};

use serial_test::serial;

const OVERRIDE_VARS: &[&str] = &[
    "OVATION_CONFIG_DIR",
    "OVATION_SERVER_HOST",
    "OVATION_SERVER_PORT",
    "OVATION_AUTH_ENABLED",
    "OVATION_AUTH_JWT_SECRET",
    "OVATION_AUTH_DEV_USER_ID",
    "OVATION_APPLAUSE_SAMPLE_INTERVAL_SECS",
    "OVATION_APPLAUSE_COUNT_WINDOW_SECS",
    "OVATION_APPLAUSE_SWEEP_INTERVAL_SECS",
    "OVATION_APPLAUSE_RETENTION_SECS",
    "OVATION_PRESENCE_DIRECTORY_URL",
    "OVATION_LOG_LEVEL",
    "OVATION_LOG_COLORED",
    "OVATION_LOG_FILE",
];

fn set_env(key: &str, value: &str) {
    unsafe { std::env::set_var(key, value) }
}

fn clear_env() {
    for var in OVERRIDE_VARS {
        unsafe { std::env::remove_var(var) }
    }
}

#[test]
#[serial]
fn given_no_config_file_then_defaults_are_used() {
    clear_env();
    let dir = tempfile::tempdir().expect("tempdir");
    set_env("OVATION_CONFIG_DIR", dir.path().to_str().expect("utf-8 path"));

    let config = Config::load().expect("load");

    assert!(config.validate().is_ok());
    assert_eq!(config.server.port, 9007);
    assert!(!config.auth.enabled);
    assert_eq!(config.applause.sample_interval_secs, 1);

    clear_env();
}

#[test]
#[serial]
fn given_config_file_then_values_are_loaded() {
    clear_env();
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("config.toml"),
        r#"
[server]
port = 9100

[applause]
sample_interval_secs = 2
retention_secs = 120

[auth]
enabled = true
jwt_secret = "shared-secret"
"#,
    )
    .expect("write config");
    set_env("OVATION_CONFIG_DIR", dir.path().to_str().expect("utf-8 path"));

    let config = Config::load().expect("load");

    assert!(config.validate().is_ok());
    assert_eq!(config.server.port, 9100);
    assert_eq!(config.applause.sample_interval_secs, 2);
    assert_eq!(config.applause.retention_secs, 120);
    assert!(config.auth.enabled);

    clear_env();
}

#[test]
#[serial]
fn given_env_overrides_then_they_win_over_file() {
    clear_env();
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("config.toml"), "[server]\nport = 9100\n")
        .expect("write config");
    set_env("OVATION_CONFIG_DIR", dir.path().to_str().expect("utf-8 path"));
    set_env("OVATION_SERVER_PORT", "9200");
    set_env("OVATION_PRESENCE_DIRECTORY_URL", "http://directory:9010");
    set_env("OVATION_LOG_LEVEL", "debug");

    let config = Config::load().expect("load");

    assert_eq!(config.server.port, 9200);
    assert_eq!(
        config.presence.directory_url.as_deref(),
        Some("http://directory:9010")
    );
    assert_eq!(*config.logging.level, log::LevelFilter::Debug);

    clear_env();
}

#[test]
#[serial]
fn given_malformed_config_file_then_toml_error() {
    clear_env();
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("config.toml"), "server = not toml {")
        .expect("write config");
    set_env("OVATION_CONFIG_DIR", dir.path().to_str().expect("utf-8 path"));

    let result = Config::load();

    assert!(matches!(result, Err(ConfigError::Toml { .. })));

    clear_env();
}

#[test]
#[serial]
fn given_config_dir_env_then_it_takes_priority() {
    clear_env();
    set_env("OVATION_CONFIG_DIR", "/tmp/ovation-test-dir");

    let dir = Config::config_dir().expect("config dir");
    assert_eq!(dir, std::path::PathBuf::from("/tmp/ovation-test-dir"));

    clear_env();
}

#[test]
fn given_server_settings_then_bind_addr_is_joined() {
    let config = Config::default();

    assert_eq!(config.bind_addr(), "127.0.0.1:9007");
}
