use super::types::*;
use crate::config::{expand_env_vars, expand_tilde};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation failed:\n{}", .0.join("\n"))]
    ValidationList(Vec<String>),

    #[error("validation failed: {0}")]
    Validation(String),
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let yaml_string = fs::read_to_string(path).map_err(|e| {
        ConfigError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to read config file '{}': {}", path.display(), e),
        ))
    })?;

    parse_config(&yaml_string)
}

/// Parse and validate config from a YAML string.
pub fn parse_config(yaml: &str) -> Result<Config, ConfigError> {
    let yaml_string = expand_env_vars(yaml);
    check_unexpanded_vars(&yaml_string)?;

    let mut config: Config = serde_yaml::from_str(&yaml_string)?;
    expand_paths(&mut config);
    validate_config(&config)?;

    Ok(config)
}

fn check_unexpanded_vars(yaml_string: &str) -> Result<(), ConfigError> {
    let re = Regex::new(r"\$env\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();
    let mut unexpanded_vars: Vec<String> = re
        .captures_iter(yaml_string)
        .map(|cap| cap[1].to_string())
        .collect();

    if unexpanded_vars.is_empty() {
        return Ok(());
    }

    unexpanded_vars.sort();
    unexpanded_vars.dedup();

    Err(ConfigError::Validation(format!(
        "environment variables are not set: {}",
        unexpanded_vars.join(", ")
    )))
}

fn expand_paths(config: &mut Config) {
    config.positions.path = expand_tilde(&config.positions.path);

    if let Some(output) = config.output.path.take() {
        let expanded = expand_tilde(Path::new(&output));
        config.output.path = Some(expanded.to_string_lossy().into_owned());
    }
}

/// Check config invariants, collecting every problem rather than stopping at
/// the first.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    let endpoint = &config.remote.endpoint;
    if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
        errors.push(format!(
            "remote.endpoint must be an http(s) URL, got '{}'",
            endpoint
        ));
    }

    if config.harvest.filename_contains.trim().is_empty() {
        errors.push("harvest.filename_contains must not be empty".to_string());
    }

    if config.harvest.max_pages == 0 {
        errors.push("harvest.max_pages must be greater than zero".to_string());
    }

    let mut seen = HashSet::new();
    for instance_id in &config.instances {
        if instance_id.trim().is_empty() {
            errors.push("instances must not contain empty ids".to_string());
        } else if !seen.insert(instance_id.as_str()) {
            errors.push(format!("instance '{}' is listed more than once", instance_id));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationList(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
remote:
  endpoint: https://logs.internal.example
  token: secret
  timeout: 30s
instances:
  - db-1
  - db-2
harvest:
  filename_contains: slowquery
  on_missing_logs: skip
  max_pages: 50
positions:
  path: /var/lib/harvester/positions.json
output:
  path: /var/log/slow/{instance}.log
"#;
        let config = parse_config(yaml).unwrap();
        assert_eq!(config.remote.endpoint, "https://logs.internal.example");
        assert_eq!(config.remote.token.as_deref(), Some("secret"));
        assert_eq!(config.remote.timeout, Duration::from_secs(30));
        assert_eq!(config.instances, vec!["db-1", "db-2"]);
        assert_eq!(config.harvest.on_missing_logs, MissingLogsPolicy::Skip);
        assert_eq!(config.harvest.max_pages, 50);
        assert_eq!(
            config.positions.path,
            Path::new("/var/lib/harvester/positions.json")
        );
    }

    #[test]
    fn test_validation_collects_errors() {
        let yaml = r#"
remote:
  endpoint: ftp://nope
instances: [db-1, db-1, ""]
harvest:
  filename_contains: ""
  max_pages: 0
"#;
        match parse_config(yaml) {
            Err(ConfigError::ValidationList(errors)) => assert_eq!(errors.len(), 5),
            other => panic!("expected validation errors, got {:?}", other),
        }
    }

    #[test]
    fn test_unexpanded_env_var_is_reported() {
        let yaml = "positions:\n  path: $env{SLOWLOG_HARVESTER_UNSET_VAR}/p.json\n";
        assert!(matches!(
            parse_config(yaml),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_env_var_expansion() {
        std::env::set_var("SLOWLOG_HARVESTER_TEST_DIR", "/srv/harvest");
        let yaml = "positions:\n  path: $env{SLOWLOG_HARVESTER_TEST_DIR}/p.json\n";
        let config = parse_config(yaml).unwrap();
        assert_eq!(config.positions.path, Path::new("/srv/harvest/p.json"));
        std::env::remove_var("SLOWLOG_HARVESTER_TEST_DIR");
    }

    #[test]
    fn test_invalid_policy_is_yaml_error() {
        let yaml = "harvest:\n  on_missing_logs: retry\n";
        assert!(matches!(parse_config(yaml), Err(ConfigError::YamlParse(_))));
    }
}
