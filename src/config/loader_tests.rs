//! Tests for configuration file loading.

use super::*;
use serial_test::serial;
use std::env;
use std::fs;

#[test]
fn default_config_path_contains_quizpane_config_toml() {
    let path = default_config_path().expect("Should have default path");
    let path_str = path.to_string_lossy();
    assert!(
        path_str.contains("quizpane") && path_str.ends_with("config.toml"),
        "Path should contain 'quizpane' and end with 'config.toml', got: {}",
        path_str
    );
}

#[test]
fn default_log_path_ends_with_quizpane_log() {
    let path = default_log_path();
    assert!(
        path.to_string_lossy().ends_with("quizpane.log"),
        "Default log path should end with 'quizpane.log', got: {:?}",
        path
    );
}

#[test]
fn load_config_file_returns_ok_none_for_missing_file() {
    let result = load_config_file("/nonexistent/path/to/config.toml");
    assert_eq!(
        result,
        Ok(None),
        "Missing config file should return Ok(None), not an error"
    );
}

#[test]
fn load_config_file_parses_valid_toml() {
    let config_path = env::temp_dir().join("quizpane_test_config.toml");

    let toml_content = r#"
estimated_row_height = 60.0
row_padding = 12.0
measurement_timeout_ms = 500
viewport_width = 414
log_file_path = "/tmp/quizpane-test.log"
"#;

    fs::write(&config_path, toml_content).expect("Failed to write test config");

    let config = load_config_file(&config_path)
        .expect("Should successfully parse valid TOML")
        .expect("Should return Some(ConfigFile) for existing file");

    assert_eq!(config.estimated_row_height, Some(60.0));
    assert_eq!(config.row_padding, Some(12.0));
    assert_eq!(config.measurement_timeout_ms, Some(500));
    assert_eq!(config.viewport_width, Some(414));
    assert_eq!(
        config.log_file_path,
        Some(PathBuf::from("/tmp/quizpane-test.log"))
    );

    fs::remove_file(config_path).ok();
}

#[test]
fn load_config_file_returns_error_for_invalid_toml() {
    let config_path = env::temp_dir().join("quizpane_test_invalid.toml");

    fs::write(&config_path, "this is not valid TOML ][}{")
        .expect("Failed to write invalid test config");

    let result = load_config_file(&config_path);

    match result {
        Err(ConfigError::ParseError { path, reason: _ }) => {
            assert_eq!(path, config_path);
        }
        _ => panic!("Expected ParseError, got {:?}", result),
    }

    fs::remove_file(config_path).ok();
}

#[test]
fn config_file_rejects_unknown_fields() {
    let result: Result<ConfigFile, _> = toml::from_str("theme = \"dark\"");
    assert!(result.is_err(), "Unknown fields should be rejected");
}

#[test]
fn merge_config_uses_defaults_when_none() {
    assert_eq!(merge_config(None), ResolvedConfig::default());
}

#[test]
fn merge_config_uses_defaults_for_none_fields() {
    let config_file = ConfigFile {
        row_padding: Some(0.0),
        ..ConfigFile::default()
    };

    let resolved = merge_config(Some(config_file));
    let defaults = ResolvedConfig::default();

    assert_eq!(resolved.row_padding, 0.0);
    assert_eq!(resolved.estimated_row_height, defaults.estimated_row_height);
    assert_eq!(resolved.measurement_timeout_ms, defaults.measurement_timeout_ms);
    assert_eq!(resolved.viewport_width, defaults.viewport_width);
    assert_eq!(resolved.log_file_path, defaults.log_file_path);
}

#[test]
fn resolved_config_default_has_expected_values() {
    let config = ResolvedConfig::default();
    assert_eq!(config.estimated_row_height, 200.0);
    assert_eq!(config.row_padding, 48.0);
    assert_eq!(config.measurement_timeout_ms, 3000);
    assert_eq!(config.viewport_width, 320);
}

// ===== Screen settings =====

#[test]
fn screen_settings_converts_timeout() {
    let settings = ResolvedConfig::default().screen_settings().unwrap();
    assert_eq!(settings.measurement_timeout, Some(Duration::from_millis(3000)));
    assert_eq!(settings.estimated_row_height.get(), 200.0);
    assert_eq!(settings.row_padding.get(), 48.0);
}

#[test]
fn zero_timeout_disables_expiry() {
    let config = ResolvedConfig {
        measurement_timeout_ms: 0,
        ..ResolvedConfig::default()
    };
    assert_eq!(config.screen_settings().unwrap().measurement_timeout, None);
}

#[test]
fn negative_estimate_is_invalid() {
    let config = ResolvedConfig {
        estimated_row_height: -1.0,
        ..ResolvedConfig::default()
    };

    match config.screen_settings() {
        Err(ConfigError::InvalidValue { field, .. }) => {
            assert_eq!(field, "estimated_row_height");
        }
        other => panic!("Expected InvalidValue, got {:?}", other),
    }
}

#[test]
fn surface_metrics_use_viewport_width() {
    let config = ResolvedConfig {
        viewport_width: 600,
        ..ResolvedConfig::default()
    };
    assert_eq!(config.surface_metrics().viewport_width, 600.0);
}

// ===== Environment overrides =====

/// RAII guard to ensure environment variable cleanup even under test parallelism.
/// Removes the var on drop, preventing test pollution in parallel execution.
struct EnvGuard(&'static str);

impl EnvGuard {
    fn new(name: &'static str) -> Self {
        env::remove_var(name);
        EnvGuard(name)
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        env::remove_var(self.0);
    }
}

#[test]
#[serial(quizpane_row_height)]
fn apply_env_overrides_respects_estimated_row_height() {
    let _guard = EnvGuard::new(ESTIMATED_ROW_HEIGHT_ENV);
    env::set_var(ESTIMATED_ROW_HEIGHT_ENV, "72.5");

    let result = apply_env_overrides(ResolvedConfig::default()).unwrap();

    assert_eq!(result.estimated_row_height, 72.5);
    assert_eq!(result.row_padding, 48.0, "Other fields stay unchanged");
}

#[test]
#[serial(quizpane_row_height)]
fn apply_env_overrides_rejects_non_numeric_height() {
    let _guard = EnvGuard::new(ESTIMATED_ROW_HEIGHT_ENV);
    env::set_var(ESTIMATED_ROW_HEIGHT_ENV, "tall");

    let result = apply_env_overrides(ResolvedConfig::default());

    assert!(matches!(
        result,
        Err(ConfigError::InvalidValue {
            field: "estimated_row_height",
            ..
        })
    ));
}

#[test]
#[serial(quizpane_row_height)]
fn apply_env_overrides_no_change_when_env_var_not_set() {
    let _guard = EnvGuard::new(ESTIMATED_ROW_HEIGHT_ENV);

    let base = ResolvedConfig::default();
    let result = apply_env_overrides(base.clone()).unwrap();

    assert_eq!(result, base);
}

#[test]
#[serial(quizpane_config)]
fn load_config_with_precedence_prefers_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV);
    let temp_dir = env::temp_dir();

    let explicit_path = temp_dir.join("quizpane_explicit.toml");
    fs::write(&explicit_path, "viewport_width = 111").expect("Failed to write explicit config");

    let env_path = temp_dir.join("quizpane_env.toml");
    fs::write(&env_path, "viewport_width = 222").expect("Failed to write env config");
    env::set_var(CONFIG_ENV, env_path.to_str().unwrap());

    let config = load_config_with_precedence(Some(explicit_path.clone()))
        .unwrap()
        .unwrap();
    assert_eq!(
        config.viewport_width,
        Some(111),
        "Should use explicit path, not QUIZPANE_CONFIG env var"
    );

    fs::remove_file(explicit_path).ok();
    fs::remove_file(env_path).ok();
}

#[test]
#[serial(quizpane_config)]
fn load_config_with_precedence_uses_env_var_when_no_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV);

    let env_path = env::temp_dir().join("quizpane_env_only.toml");
    fs::write(&env_path, "measurement_timeout_ms = 0").expect("Failed to write env config");
    env::set_var(CONFIG_ENV, env_path.to_str().unwrap());

    let config = load_config_with_precedence(None).unwrap().unwrap();
    assert_eq!(config.measurement_timeout_ms, Some(0));

    fs::remove_file(env_path).ok();
}

// ===== Full precedence chain =====

#[test]
fn apply_cli_overrides_width_override() {
    let config = apply_cli_overrides(ResolvedConfig::default(), Some(768));
    assert_eq!(config.viewport_width, 768);
}

#[test]
fn apply_cli_overrides_no_overrides() {
    let base = ResolvedConfig::default();
    assert_eq!(apply_cli_overrides(base.clone(), None), base);
}

#[test]
#[serial(quizpane_row_height)]
fn precedence_chain_full_defaults_to_cli() {
    let _guard = EnvGuard::new(ESTIMATED_ROW_HEIGHT_ENV);

    let file = ConfigFile {
        estimated_row_height: Some(50.0),
        viewport_width: Some(400),
        ..ConfigFile::default()
    };
    let merged = merge_config(Some(file));
    assert_eq!(merged.estimated_row_height, 50.0);

    env::set_var(ESTIMATED_ROW_HEIGHT_ENV, "55");
    let with_env = apply_env_overrides(merged).unwrap();
    assert_eq!(with_env.estimated_row_height, 55.0);

    let final_config = apply_cli_overrides(with_env, Some(500));
    assert_eq!(final_config.viewport_width, 500);
    assert_eq!(final_config.estimated_row_height, 55.0);
    assert_eq!(final_config.row_padding, 48.0);
}
