//! Configuration model.
//!
//! Settings live in `config.toml` under the user config directory. An
//! optional `config.local.toml` beside it is merged on top, so secrets can
//! stay out of the shared file. A handful of secrets can also come from the
//! environment.

use crate::core::similarity::Metric;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const BASE_CONFIG_FILE: &str = "config.toml";
const LOCAL_CONFIG_FILE: &str = "config.local.toml";
const DEFAULT_PRIORITY: u32 = 999;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Trakt configuration.
    pub trakt: TraktConfig,
    /// NZBGet configuration.
    pub nzbget: NzbgetConfig,
    /// Newznab indexers.
    pub indexers: Vec<IndexerConfig>,
    /// Library paths.
    pub paths: PathsConfig,
    /// Resolutions to search for, most preferred first.
    pub resolutions: Vec<String>,
    /// Maximum results kept per indexer search.
    pub max_results: usize,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Name matching parameters.
    pub matching: MatchingConfig,
}

/// Trakt configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TraktConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub access_token: Option<String>,
}

/// NZBGet configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NzbgetConfig {
    /// JSON-RPC endpoint.
    pub url: String,
    pub username: String,
    pub password: String,
    /// Category assigned to submitted NZBs.
    pub category: String,
}

/// A Newznab indexer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexerConfig {
    pub name: String,
    /// API endpoint, e.g. `https://api.nzbgeek.info/api`.
    pub url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Lower values are searched first.
    #[serde(default)]
    pub priority: Option<u32>,
}

/// Library paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Organized TV library root.
    pub library: PathBuf,
    /// Download client's completed-download folder.
    pub unorganized: PathBuf,
}

/// Name matching parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum similarity treated as the same show.
    pub accept_threshold: f64,
    /// Added to a catalog entry's score when release years agree.
    pub year_bonus: f64,
    /// Similarity metric.
    pub metric: Metric,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trakt: TraktConfig::default(),
            nzbget: NzbgetConfig::default(),
            indexers: Vec::new(),
            paths: PathsConfig::default(),
            resolutions: vec!["1080p".to_string(), "720p".to_string()],
            max_results: 50,
            request_timeout_secs: 30,
            matching: MatchingConfig::default(),
        }
    }
}

impl Default for NzbgetConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6789/jsonrpc".to_string(),
            username: "nzbget".to_string(),
            password: String::new(),
            category: "Series".to_string(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            library: PathBuf::from("~/Media/TV Shows"),
            unorganized: PathBuf::from("~/Downloads/Unorganized TV Shows"),
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            accept_threshold: 0.80,
            year_bonus: 0.10,
            metric: Metric::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from `path`, or from the default location.
    ///
    /// A missing default file yields the built-in defaults; a missing
    /// explicit path is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| config_dir().join(BASE_CONFIG_FILE));

        let mut table = if base_path.exists() {
            read_table(&base_path)?
        } else if path.is_some() {
            return Err(Error::ConfigNotFound(base_path.display().to_string()));
        } else {
            tracing::debug!("No config at {}, using defaults", base_path.display());
            toml::Table::new()
        };

        let local_path = base_path.with_file_name(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            tracing::debug!("Merging local settings from {}", local_path.display());
            merge_tables(&mut table, read_table(&local_path)?);
        }

        let mut config = Self::from_table(table)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Build a configuration from an already merged TOML table.
    pub fn from_table(table: toml::Table) -> Result<Self> {
        let mut config: Config = toml::Value::Table(table).try_into()?;
        config.paths.library = expand_tilde(&config.paths.library);
        config.paths.unorganized = expand_tilde(&config.paths.unorganized);
        config.matching.check()?;
        Ok(config)
    }

    /// Apply secret overrides from a key lookup (the environment in practice).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |slot: &mut Option<String>, key: &str| {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *slot = Some(value);
            }
        };
        set(&mut self.trakt.client_id, "TRAKT_CLIENT_ID");
        set(&mut self.trakt.client_secret, "TRAKT_CLIENT_SECRET");
        set(&mut self.trakt.access_token, "TRAKT_ACCESS_TOKEN");
        if let Some(password) = lookup("NZBGET_PASSWORD") {
            self.nzbget.password = password;
        }
    }

    /// Enabled indexers that have an API key, in priority order.
    pub fn enabled_indexers(&self) -> Vec<IndexerConfig> {
        let mut indexers: Vec<IndexerConfig> = self
            .indexers
            .iter()
            .filter(|i| i.enabled && i.api_key.as_deref().is_some_and(|k| !k.is_empty()))
            .cloned()
            .collect();
        indexers.sort_by_key(|i| i.priority.unwrap_or(DEFAULT_PRIORITY));
        indexers
    }

    /// Check that everything a download run needs is present.
    pub fn validate_for_download(&self) -> Result<()> {
        let mut missing = Vec::new();
        if is_blank(&self.trakt.client_id) {
            missing.push("trakt.client_id".to_string());
        }
        if is_blank(&self.trakt.access_token) {
            missing.push("trakt.access_token".to_string());
        }
        if self.enabled_indexers().is_empty() {
            missing.push("indexers (at least one enabled with api_key)".to_string());
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingSettings(missing))
        }
    }
}

impl MatchingConfig {
    fn check(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.accept_threshold) {
            return Err(Error::InvalidConfig(format!(
                "matching.accept_threshold must be within 0..=1, got {}",
                self.accept_threshold
            )));
        }
        if self.year_bonus < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "matching.year_bonus must not be negative, got {}",
                self.year_bonus
            )));
        }
        Ok(())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).unwrap_or("").is_empty()
}

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("showfetch")
}

fn read_table(path: &Path) -> Result<toml::Table> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge `overlay` into `base`; nested tables merge key by key, anything
/// else in the overlay replaces the base value.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(s: &str) -> toml::Table {
        toml::from_str(s).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_table(toml::Table::new()).unwrap();
        assert_eq!(config.resolutions, vec!["1080p", "720p"]);
        assert_eq!(config.max_results, 50);
        assert_eq!(config.nzbget.category, "Series");
        assert_eq!(config.matching.accept_threshold, 0.80);
        assert_eq!(config.matching.year_bonus, 0.10);
        assert_eq!(config.matching.metric, Metric::Gestalt);
    }

    #[test]
    fn test_local_overrides_base() {
        let mut base = table(
            r#"
            resolutions = ["2160p"]
            [trakt]
            client_id = "base-id"
            client_secret = "base-secret"
            "#,
        );
        let local = table(
            r#"
            [trakt]
            client_id = "local-id"
            access_token = "token"
            "#,
        );
        merge_tables(&mut base, local);
        let config = Config::from_table(base).unwrap();

        assert_eq!(config.trakt.client_id.as_deref(), Some("local-id"));
        assert_eq!(config.trakt.client_secret.as_deref(), Some("base-secret"));
        assert_eq!(config.trakt.access_token.as_deref(), Some("token"));
        assert_eq!(config.resolutions, vec!["2160p"]);
    }

    #[test]
    fn test_load_merges_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("config.toml");
        std::fs::write(
            &base,
            r#"
            resolutions = ["2160p", "1080p"]
            [nzbget]
            category = "TV"
            [paths]
            library = "/media/tv"
            unorganized = "/downloads/tv"
            "#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join(LOCAL_CONFIG_FILE),
            r#"
            [paths]
            library = "/mnt/tv"
            "#,
        )
        .unwrap();

        let config = Config::load(Some(&base)).unwrap();
        assert_eq!(config.resolutions, vec!["2160p", "1080p"]);
        assert_eq!(config.nzbget.category, "TV");
        assert_eq!(config.paths.library, PathBuf::from("/mnt/tv"));
        assert_eq!(config.paths.unorganized, PathBuf::from("/downloads/tv"));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(Error::ConfigNotFound(_))));
    }

    #[test]
    fn test_tilde_expansion() {
        let config = Config::from_table(table(
            r#"
            [paths]
            library = "~/TV"
            unorganized = "/data/incoming"
            "#,
        ))
        .unwrap();

        if let Some(home) = dirs::home_dir() {
            assert_eq!(config.paths.library, home.join("TV"));
        }
        assert_eq!(config.paths.unorganized, PathBuf::from("/data/incoming"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.trakt.access_token = Some("from-file".to_string());
        config.apply_overrides(|key| match key {
            "TRAKT_ACCESS_TOKEN" => Some("from-env".to_string()),
            "TRAKT_CLIENT_ID" => Some(String::new()),
            _ => None,
        });

        assert_eq!(config.trakt.access_token.as_deref(), Some("from-env"));
        assert!(config.trakt.client_id.is_none());
    }

    #[test]
    fn test_enabled_indexers_sorted_by_priority() {
        let config = Config::from_table(table(
            r#"
            [[indexers]]
            name = "late"
            url = "https://late.example/api"
            api_key = "k1"

            [[indexers]]
            name = "first"
            url = "https://first.example/api"
            api_key = "k2"
            priority = 1

            [[indexers]]
            name = "disabled"
            url = "https://off.example/api"
            api_key = "k3"
            enabled = false
            priority = 0

            [[indexers]]
            name = "keyless"
            url = "https://nokey.example/api"
            priority = 0
            "#,
        ))
        .unwrap();

        let names: Vec<_> = config.enabled_indexers().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["first", "late"]);
    }

    #[test]
    fn test_validate_reports_all_missing() {
        let config = Config::default();
        match config.validate_for_download() {
            Err(Error::MissingSettings(missing)) => {
                assert_eq!(missing.len(), 3);
                assert!(missing.contains(&"trakt.client_id".to_string()));
                assert!(missing.contains(&"trakt.access_token".to_string()));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let result = Config::from_table(table(
            r#"
            [matching]
            accept_threshold = 1.5
            "#,
        ));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_metric_from_toml() {
        let config = Config::from_table(table(
            r#"
            [matching]
            metric = "jaro_winkler"
            accept_threshold = 0.9
            "#,
        ))
        .unwrap();
        assert_eq!(config.matching.metric, Metric::JaroWinkler);
        assert_eq!(config.matching.accept_threshold, 0.9);
        assert_eq!(config.matching.year_bonus, 0.10);
    }
}
