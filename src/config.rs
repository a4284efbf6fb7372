use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://app.asana.com/api/1.0";
pub const DEFAULT_DEV_HOURS_FIELD: &str = "Dev Hours";

/// Token variable names, in lookup order.
pub const TOKEN_VARS: [&str; 2] = ["ASANA_PAT", "ASANA_TOKEN"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ASANA_PAT not set. Create a .env file with:\n  ASANA_PAT=your_personal_access_token")]
    MissingToken,
}

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    pub base_url: Option<String>,
    pub dev_hours_field: Option<String>,
    pub activity_log: Option<bool>,
}

impl AppConfig {
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn dev_hours_field(&self) -> &str {
        self.dev_hours_field
            .as_deref()
            .unwrap_or(DEFAULT_DEV_HOURS_FIELD)
    }

    pub fn activity_log_enabled(&self) -> bool {
        self.activity_log.unwrap_or(true)
    }
}

/// Everything the HTTP client needs, resolved up front.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: String,
}

impl ApiConfig {
    pub fn new(base_url: &str, token: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }
}

pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".asana-cli")
}

fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}

pub fn load_config() -> Result<AppConfig> {
    let path = config_path();
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: AppConfig =
        toml::from_str(&contents).with_context(|| "Failed to parse config.toml")?;
    Ok(config)
}

/// `.env` locations searched for credentials, highest precedence first.
pub fn env_file_candidates() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(".env")];

    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
    {
        paths.push(exe_dir.join(".env"));
        if let Some(parent) = exe_dir.parent() {
            paths.push(parent.join(".env"));
        }
    }

    if let Some(home) = dirs::home_dir() {
        let claude = home.join(".claude");
        paths.push(claude.join("skills").join("asana").join(".env"));
        paths.push(claude.join("skills").join(".env"));
        paths.push(claude.join(".env"));
    }

    paths
}

/// Parse one `KEY=VALUE` line. Blank lines, comments and lines without `=` yield `None`.
pub fn parse_env_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), strip_quotes(value.trim()).to_string()))
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Merge `.env` files in order. A key is kept from the first file (and first line) that
/// sets it, and skipped entirely when `is_preset` reports it as already in the environment.
pub fn load_env_files(
    paths: &[PathBuf],
    is_preset: impl Fn(&str) -> bool,
) -> HashMap<String, String> {
    let mut values = HashMap::new();

    for path in paths {
        if !path.is_file() {
            continue;
        }
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable env file");
                continue;
            }
        };
        tracing::debug!(path = %path.display(), "loading env file");

        for (key, value) in contents.lines().filter_map(parse_env_line) {
            if is_preset(&key) || values.contains_key(&key) {
                continue;
            }
            values.insert(key, value);
        }
    }

    values
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub token: String,
}

impl Credentials {
    /// Resolve the token: real environment first, then values loaded from `.env` files,
    /// trying each name in `TOKEN_VARS` in turn.
    pub fn resolve(
        env: impl Fn(&str) -> Option<String>,
        files: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        TOKEN_VARS
            .iter()
            .find_map(|&name| {
                env(name)
                    .or_else(|| files.get(name).cloned())
                    .filter(|v| !v.is_empty())
            })
            .map(|token| Credentials { token })
            .ok_or(ConfigError::MissingToken)
    }

    pub fn from_environment() -> Result<Self, ConfigError> {
        let files = load_env_files(&env_file_candidates(), |key| {
            std::env::var_os(key).is_some()
        });
        Self::resolve(|key| std::env::var(key).ok(), &files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_env(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn parse_plain_pair() {
        assert_eq!(
            parse_env_line("ASANA_PAT=abc123"),
            Some(("ASANA_PAT".into(), "abc123".into()))
        );
    }

    #[test]
    fn parse_trims_and_strips_matching_quotes() {
        assert_eq!(
            parse_env_line("  ASANA_PAT = \"abc 123\"  "),
            Some(("ASANA_PAT".into(), "abc 123".into()))
        );
        assert_eq!(
            parse_env_line("ASANA_PAT='abc'"),
            Some(("ASANA_PAT".into(), "abc".into()))
        );
    }

    #[test]
    fn parse_keeps_mismatched_quotes() {
        assert_eq!(
            parse_env_line("ASANA_PAT=\"abc'"),
            Some(("ASANA_PAT".into(), "\"abc'".into()))
        );
    }

    #[test]
    fn parse_splits_on_first_equals_only() {
        assert_eq!(
            parse_env_line("URL=https://x.test/?a=b"),
            Some(("URL".into(), "https://x.test/?a=b".into()))
        );
    }

    #[test]
    fn parse_skips_comments_blank_and_malformed() {
        assert_eq!(parse_env_line(""), None);
        assert_eq!(parse_env_line("   "), None);
        assert_eq!(parse_env_line("# ASANA_PAT=abc"), None);
        assert_eq!(parse_env_line("just some words"), None);
    }

    #[test]
    fn earlier_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_env(dir.path(), "first.env", "ASANA_PAT=first\n");
        let second = write_env(dir.path(), "second.env", "ASANA_PAT=second\nASANA_TOKEN=tok\n");

        let values = load_env_files(&[first, second], |_| false);
        assert_eq!(values.get("ASANA_PAT").map(String::as_str), Some("first"));
        assert_eq!(values.get("ASANA_TOKEN").map(String::as_str), Some("tok"));
    }

    #[test]
    fn earlier_line_wins_within_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_env(dir.path(), ".env", "ASANA_PAT=one\nASANA_PAT=two\n");

        let values = load_env_files(&[path], |_| false);
        assert_eq!(values.get("ASANA_PAT").map(String::as_str), Some("one"));
    }

    #[test]
    fn preset_keys_are_never_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_env(dir.path(), "a.env", "ASANA_PAT=from-file\n");
        let second = write_env(dir.path(), "b.env", "ASANA_PAT=from-later-file\nOTHER=x\n");

        let values = load_env_files(&[first, second], |key| key == "ASANA_PAT");
        assert!(!values.contains_key("ASANA_PAT"));
        assert_eq!(values.get("OTHER").map(String::as_str), Some("x"));
    }

    #[test]
    fn missing_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let present = write_env(dir.path(), ".env", "ASANA_TOKEN=tok\n");
        let missing = dir.path().join("nope.env");

        let values = load_env_files(&[missing, present], |_| false);
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn environment_beats_file_values() {
        let mut files = HashMap::new();
        files.insert("ASANA_PAT".to_string(), "from-file".to_string());

        let creds = Credentials::resolve(
            |key| (key == "ASANA_PAT").then(|| "from-env".to_string()),
            &files,
        )
        .unwrap();
        assert_eq!(creds.token, "from-env");
    }

    #[test]
    fn falls_back_to_secondary_name() {
        let mut files = HashMap::new();
        files.insert("ASANA_TOKEN".to_string(), "secondary".to_string());

        let creds = Credentials::resolve(|_| None, &files).unwrap();
        assert_eq!(creds.token, "secondary");
    }

    #[test]
    fn empty_values_count_as_unset() {
        let mut files = HashMap::new();
        files.insert("ASANA_PAT".to_string(), String::new());
        files.insert("ASANA_TOKEN".to_string(), "secondary".to_string());

        let creds = Credentials::resolve(|_| None, &files).unwrap();
        assert_eq!(creds.token, "secondary");
    }

    #[test]
    fn missing_token_is_an_error() {
        let err = Credentials::resolve(|_| None, &HashMap::new()).unwrap_err();
        assert!(err.to_string().contains("ASANA_PAT"));
    }

    #[test]
    fn config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.dev_hours_field(), "Dev Hours");
        assert!(config.activity_log_enabled());
    }

    #[test]
    fn config_parses_toml() {
        let config: AppConfig = toml::from_str(
            "base_url = \"http://localhost:9999\"\ndev_hours_field = \"Estimate\"\nactivity_log = false\n",
        )
        .unwrap();
        assert_eq!(config.base_url(), "http://localhost:9999");
        assert_eq!(config.dev_hours_field(), "Estimate");
        assert!(!config.activity_log_enabled());
    }

    #[test]
    fn api_config_trims_trailing_slash() {
        let api = ApiConfig::new("https://app.asana.com/api/1.0/", "t".into());
        assert_eq!(api.base_url, "https://app.asana.com/api/1.0");
    }
}
