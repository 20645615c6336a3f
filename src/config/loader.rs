//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::GrafexConfig;
use super::secret_string;
use crate::domain::errors::GrafexError;
use crate::domain::result::Result;
use crate::domain::ExportFormat;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into GrafexConfig
/// 4. Applies environment variable overrides (GRAFEX_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a referenced
/// environment variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use grafex::config::loader::load_config;
///
/// let config = load_config("grafex.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<GrafexConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(GrafexError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        GrafexError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: GrafexConfig = toml::from_str(&contents)
        .map_err(|e| GrafexError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        GrafexError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Loads the configuration file if it exists, otherwise builds one from
/// the environment
///
/// The environment path reads `GRAFANA_API_URL` and `GRAFANA_API_KEY`
/// (typically from a `.env` file) and then applies the usual `GRAFEX_*`
/// overrides.
pub fn load_config_or_env(path: impl AsRef<Path>) -> Result<GrafexConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::info!(
        config_path = %path.display(),
        "Configuration file not found, using GRAFANA_API_URL / GRAFANA_API_KEY from environment"
    );

    let mut config = GrafexConfig::from_env();
    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        GrafexError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. All missing variables are reported
/// together.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| GrafexError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(GrafexError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using GRAFEX_* prefix
///
/// Environment variables follow the pattern: GRAFEX_<SECTION>_<KEY>
/// For example: GRAFEX_GRAFANA_BASE_URL, GRAFEX_EXPORT_OUTPUT_DIR
fn apply_env_overrides(config: &mut GrafexConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("GRAFEX_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Grafana overrides
    if let Ok(val) = std::env::var("GRAFEX_GRAFANA_BASE_URL") {
        config.grafana.base_url = val;
    }
    if let Ok(val) = std::env::var("GRAFEX_GRAFANA_AUTH_TYPE") {
        config.grafana.auth_type = val;
    }
    if let Ok(val) = std::env::var("GRAFEX_GRAFANA_API_KEY") {
        config.grafana.api_key = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("GRAFEX_GRAFANA_USERNAME") {
        config.grafana.username = Some(val);
    }
    if let Ok(val) = std::env::var("GRAFEX_GRAFANA_PASSWORD") {
        config.grafana.password = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("GRAFEX_GRAFANA_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.grafana.timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("GRAFEX_GRAFANA_TLS_VERIFY") {
        config.grafana.tls_verify = val.parse().unwrap_or(true);
    }

    // Export overrides
    if let Ok(val) = std::env::var("GRAFEX_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }
    if let Ok(val) = std::env::var("GRAFEX_EXPORT_DRY_RUN") {
        config.export.dry_run = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("GRAFEX_EXPORT_NOTIFICATION_TEMPLATE_FORMAT") {
        config.export.notification_template_format =
            ExportFormat::from_str(&val).map_err(GrafexError::Configuration)?;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("GRAFEX_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("GRAFEX_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("GRAFEX_LOADER_TEST_VAR", "test_value");
        let input = "api_key = \"${GRAFEX_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "api_key = \"test_value\"\n");
        std::env::remove_var("GRAFEX_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("GRAFEX_LOADER_MISSING_VAR");
        let input = "api_key = \"${GRAFEX_LOADER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("GRAFEX_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("GRAFEX_LOADER_COMMENTED_VAR");
        let input = "# api_key = \"${GRAFEX_LOADER_COMMENTED_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${GRAFEX_LOADER_COMMENTED_VAR}"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-grafex.toml");
        assert!(matches!(result, Err(GrafexError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[grafana]
base_url = "https://grafana.example.com"
api_key = "glsa_test"

[export]
output_dir = "/tmp/backup"
flows = ["dashboards", "datasources"]
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.grafana.base_url, "https://grafana.example.com");
        assert_eq!(
            config.grafana.api_key.as_ref().unwrap().expose_secret(),
            "glsa_test"
        );
        assert_eq!(config.export.flows.len(), 2);
        assert_eq!(config.export.roots.dashboards, "grafana-dash-backup");
    }

    #[test]
    fn test_load_config_rejects_unknown_flow() {
        let toml_content = r#"
[grafana]
base_url = "https://grafana.example.com"
api_key = "glsa_test"

[export]
flows = ["folders"]
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        assert!(load_config(temp_file.path()).is_err());
    }
}
