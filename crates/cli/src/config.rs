use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

use wordatro_client::DEFAULT_BASE_URL;

pub const DEFAULT_CONFIG: &str = "wordatro.toml";

/// Layered configuration: command-line flag, then `WORDATRO_*` environment,
/// then the optional config file, then built-in defaults.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub base_url: String,
    pub prefs_path: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    base_url: Option<String>,
    prefs_path: Option<PathBuf>,
}

impl CliConfig {
    pub fn resolve(base_url_flag: Option<String>) -> Result<Self> {
        let file = read_file_config()?;
        let base_url = base_url_flag
            .or_else(|| env::var("WORDATRO_BASE_URL").ok())
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let prefs_path = env::var("WORDATRO_PREFS")
            .ok()
            .map(PathBuf::from)
            .or(file.prefs_path)
            .unwrap_or_else(default_prefs_path);
        Ok(Self {
            base_url,
            prefs_path,
        })
    }
}

fn read_file_config() -> Result<FileConfig> {
    let path = PathBuf::from(DEFAULT_CONFIG);
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("invalid config in {}", path.display()))
}

fn default_prefs_path() -> PathBuf {
    env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".wordatro")
        .join("prefs.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins_over_default() {
        let config = CliConfig::resolve(Some("http://example:9000".to_string())).unwrap();
        assert_eq!(config.base_url, "http://example:9000");
    }

    #[test]
    fn file_config_parses() {
        let parsed: FileConfig =
            toml::from_str("base_url = \"http://host:1234\"\nprefs_path = \"/tmp/p.json\"")
                .unwrap();
        assert_eq!(parsed.base_url.as_deref(), Some("http://host:1234"));
        assert_eq!(parsed.prefs_path, Some(PathBuf::from("/tmp/p.json")));
    }
}
