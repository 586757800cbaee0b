//! Configuration loader with TOML parsing and environment variable overrides.

use std::fs;
use std::path::Path;

use regex::Regex;
use secrecy::SecretString;

use super::AppConfig;
use crate::error::YoloPrepError;

/// Load configuration from a TOML file.
///
/// The file is read, `${VAR}` placeholders are substituted from the
/// environment, the result is parsed, `YOLOPREP_DB_*` overrides are applied
/// and the final configuration is validated.
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, YoloPrepError> {
    let path = path.as_ref();

    let contents = fs::read_to_string(path).map_err(|e| {
        YoloPrepError::Config(format!(
            "failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents, |name| std::env::var(name).ok())?;

    let mut config: AppConfig = toml::from_str(&contents)
        .map_err(|e| YoloPrepError::Config(format!("failed to parse TOML: {}", e)))?;

    apply_overrides_from(&mut config, |name| std::env::var(name).ok())?;

    config
        .validate()
        .map_err(|e| YoloPrepError::Config(format!("validation failed: {}", e)))?;

    Ok(config)
}

/// Substitute `${VAR_NAME}` placeholders using `lookup`.
///
/// Comment lines are left untouched. Every missing variable is reported in
/// one error.
pub fn substitute_env_vars<F>(input: &str, lookup: F) -> Result<String, YoloPrepError>
where
    F: Fn(&str) -> Option<String>,
{
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| YoloPrepError::Config(format!("invalid placeholder pattern: {}", e)))?;

    let mut result = String::with_capacity(input.len());
    let mut missing: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed = line.to_string();
        for cap in re.captures_iter(line) {
            let name = &cap[1];
            match lookup(name) {
                Some(value) => {
                    processed = processed.replace(&format!("${{{}}}", name), &value);
                }
                None => {
                    if !missing.iter().any(|m| m == name) {
                        missing.push(name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing.is_empty() {
        return Err(YoloPrepError::Config(format!(
            "missing required environment variables: {}",
            missing.join(", ")
        )));
    }

    Ok(result)
}

/// Apply `YOLOPREP_DB_*` overrides using `lookup`.
pub fn apply_overrides_from<F>(config: &mut AppConfig, lookup: F) -> Result<(), YoloPrepError>
where
    F: Fn(&str) -> Option<String>,
{
    let db = &mut config.database;

    if let Some(val) = lookup("YOLOPREP_DB_HOST") {
        db.host = val;
    }
    if let Some(val) = lookup("YOLOPREP_DB_PORT") {
        db.port = val.parse().map_err(|_| {
            YoloPrepError::Config(format!("YOLOPREP_DB_PORT is not a valid port: '{}'", val))
        })?;
    }
    if let Some(val) = lookup("YOLOPREP_DB_NAME") {
        db.dbname = val;
    }
    if let Some(val) = lookup("YOLOPREP_DB_USER") {
        db.user = val;
    }
    if let Some(val) = lookup("YOLOPREP_DB_PASSWORD") {
        db.password = Some(SecretString::new(val));
    }
    if let Some(val) = lookup("YOLOPREP_DB_CONNECT_TIMEOUT") {
        db.connect_timeout_seconds = val.parse().map_err(|_| {
            YoloPrepError::Config(format!(
                "YOLOPREP_DB_CONNECT_TIMEOUT must be a number of seconds: '{}'",
                val
            ))
        })?;
    }

    Ok(())
}
