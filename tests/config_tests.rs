use slowlog_harvester::cli::run::RunOverrides;
use slowlog_harvester::config::{generate::generate_starter_config, load_config, Config, MissingLogsPolicy};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_generated_config_is_valid() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.yml");
    fs::write(&config_path, generate_starter_config()).unwrap();

    let config = load_config(&config_path).expect("Generated config should be valid");

    assert_eq!(config.instances, vec!["mydb-primary"]);
    assert_eq!(config.harvest.filename_contains, "slowquery");
    assert_eq!(config.harvest.on_missing_logs, MissingLogsPolicy::Abort);
    assert!(!config.positions.path.to_string_lossy().starts_with('~'));
    assert!(config
        .output
        .path
        .as_deref()
        .unwrap()
        .ends_with("{instance}.slowquery.log"));
}

#[test]
fn test_missing_config_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = load_config(&temp_dir.path().join("absent.yml"));
    assert!(result.is_err());
}

#[test]
fn test_overrides_replace_config_values() {
    let mut config = Config::default();
    config.instances = vec!["from-file".to_string()];

    RunOverrides {
        instance_ids: Some("db-1, db-2".to_string()),
        positions: Some(PathBuf::from("/srv/positions.json")),
        output: Some("/srv/{instance}.log".to_string()),
        endpoint: Some("https://gateway.example".to_string()),
        token: None,
    }
    .apply(&mut config);

    assert_eq!(config.instances, vec!["db-1", "db-2"]);
    assert_eq!(config.positions.path, PathBuf::from("/srv/positions.json"));
    assert_eq!(config.output.sink_path("db-2"), PathBuf::from("/srv/db-2.log"));
    assert_eq!(config.remote.endpoint, "https://gateway.example");
    assert!(config.remote.token.is_none());
}

#[test]
fn test_overrides_without_flags_keep_config() {
    let mut config = Config::default();
    config.instances = vec!["from-file".to_string()];

    RunOverrides::default().apply(&mut config);
    assert_eq!(config.instances, vec!["from-file"]);
}
