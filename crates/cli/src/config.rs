//! Configuration commands.
//!
//! Settings come from a TOML file when `--config` is given, otherwise from the
//! embedded defaults. Either way, environment variables prefixed with
//! `QUIZCALL__` are merged on top. For example,
//! `QUIZCALL__SERVICE__TIMEOUT_MS=3000` overrides `service.timeout_ms`.

use std::fs;
use std::path::Path;

use quizcall_common::settings::Settings;

use crate::error::CliError;

/// Load settings from `file`, or the embedded defaults when `file` is `None`.
pub(crate) fn load_settings(file: Option<&Path>) -> Result<Settings, CliError> {
    let Some(file) = file else {
        log::debug!("Using embedded settings");
        return Ok(Settings::new()?);
    };

    log::debug!("Loading config from: {}", file.display());
    let content = fs::read_to_string(file)?;
    Ok(Settings::from_toml(&content)?)
}

/// Validate a configuration file, or the embedded defaults.
pub fn validate(file: Option<&Path>) -> Result<(), CliError> {
    let settings = load_settings(file)?;

    println!("Configuration is valid");
    match file {
        Some(path) => println!("  File: {}", path.display()),
        None => println!("  File: <embedded>"),
    }
    println!("  Base URL: {}", settings.service.base_url);
    println!(
        "  Question types: {}..={}",
        settings.request.question_type_min, settings.request.question_type_max
    );
    println!("  Key length: {}", settings.request.private_key_length);

    Ok(())
}

/// Print the effective configuration after environment overrides.
pub fn show(file: Option<&Path>) -> Result<(), CliError> {
    let settings = load_settings(file)?;
    print!("{}", settings.to_canonical_toml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const VALID_CONFIG: &str = r#"
[service]
base_url = "https://quiz.test/output"
timeout_ms = 2000

[request]
question_type_min = 0
question_type_max = 7
firm_id_max_length = 18
private_key_length = 229
signature_delimiter = "@==@"
"#;

    fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_settings_from_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "quizcall.toml", VALID_CONFIG);

        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.request.firm_id_max_length, 18);
        assert_eq!(settings.request.signature_delimiter, "@==@");
    }

    #[test]
    fn test_load_embedded_settings() {
        assert!(load_settings(None).is_ok());
    }

    #[test]
    fn test_validate_valid_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "quizcall.toml", VALID_CONFIG);

        assert!(validate(Some(&path)).is_ok());
    }

    #[test]
    fn test_validate_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "invalid.toml", "invalid { toml");

        let result = validate(Some(&path));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let dir = TempDir::new().unwrap();
        let content = VALID_CONFIG.replace("question_type_max = 7", "question_type_max = -1");
        let path = write_config(&dir, "inverted.toml", &content);

        assert!(matches!(validate(Some(&path)), Err(CliError::Config(_))));
    }

    #[test]
    fn test_validate_nonexistent_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nonexistent.toml");

        assert!(matches!(validate(Some(&path)), Err(CliError::Io(_))));
    }

    #[test]
    fn test_show_valid_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "quizcall.toml", VALID_CONFIG);

        assert!(show(Some(&path)).is_ok());
    }
}
