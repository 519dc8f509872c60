//! Server configuration.
//!
//! Loaded from the first of:
//! 1. the file named by `FASTENER_SEARCH_CONFIG`
//! 2. `<config dir>/fastener-search/config.toml`
//! 3. built-in defaults
//!
//! Every field is optional in the file.

use crate::catalog::SearchLanguage;
use crate::error::LoadError;
use crate::search::{Category, Scorer, ScoringWeights, StagedRetriever};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "FASTENER_SEARCH_CONFIG";

/// Directory under the platform config dir.
const APP_DIR: &str = "fastener-search";
const CONFIG_FILE: &str = "config.toml";

pub const DEFAULT_RESULT_LIMIT: usize = 20;
pub const MAX_RESULT_LIMIT: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON array of catalog entries. Relative paths resolve against the
    /// config file's directory.
    pub catalog_path: PathBuf,
    /// Row cap for every store query
    pub result_limit: usize,
    pub language: SearchLanguage,
    pub weights: ScoringWeights,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("catalog.json"),
            result_limit: DEFAULT_RESULT_LIMIT,
            language: SearchLanguage::default(),
            weights: ScoringWeights::default(),
        }
    }
}

impl Config {
    /// Resolve and load the configuration.
    pub fn load() -> Result<Self, LoadError> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let user = dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE));
        Self::load_from(explicit.as_deref(), user.as_deref())
    }

    /// Load from an explicit path if given, else from `fallback` if it
    /// exists, else defaults. A missing explicit file is an error.
    pub fn load_from(explicit: Option<&Path>, fallback: Option<&Path>) -> Result<Self, LoadError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match fallback {
            Some(path) if path.is_file() => Self::from_file(path),
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse one TOML file, resolving `catalog_path` against its directory.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&content).map_err(|source| LoadError::Config {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(expanded) = config.catalog_path.to_str().map(|raw| expand_tilde(raw).into_owned()) {
            config.catalog_path = PathBuf::from(expanded);
        }
        if config.catalog_path.is_relative()
            && let Some(dir) = path.parent()
        {
            config.catalog_path = dir.join(&config.catalog_path);
        }

        tracing::info!("Loaded config from {}", path.display());
        config.validated()
    }

    /// Clamp the row cap and reject negative weights.
    pub fn validated(mut self) -> Result<Self, LoadError> {
        for category in Category::ALL {
            let value = self.weights.weight(category);
            if value < 0.0 || value.is_nan() {
                return Err(LoadError::InvalidWeight {
                    category: category.as_str(),
                    value,
                });
            }
        }

        let clamped = self.result_limit.clamp(1, MAX_RESULT_LIMIT);
        if clamped != self.result_limit {
            tracing::warn!(
                "result_limit {} out of range, using {}",
                self.result_limit,
                clamped
            );
            self.result_limit = clamped;
        }
        Ok(self)
    }

    pub const fn scorer(&self) -> Scorer {
        Scorer::new(self.weights)
    }

    pub const fn retriever(&self) -> StagedRetriever {
        StagedRetriever::new(self.language, self.result_limit)
    }
}

/// Expands a leading `~` to the user's home directory.
///
/// Returns `Cow::Borrowed` if no expansion was needed.
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join(CONFIG_FILE);
        let mut file = std::fs::File::create(&path).expect("create config");
        file.write_all(content.as_bytes()).expect("write config");
        path
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        check!(config.result_limit == 20);
        check!(config.language == SearchLanguage::Russian);
        check!(config.weights == ScoringWeights::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let path = write_config(
            &dir,
            r#"
language = "simple"

[weights]
material = 5
"#,
        );

        let_assert!(Ok(config) = Config::from_file(&path));
        check!(config.language == SearchLanguage::Simple);
        check!(config.result_limit == DEFAULT_RESULT_LIMIT);
        check!(config.weights.material == 5.0);
        check!(config.weights.standard == 40.0);
        check!(config.catalog_path == dir.path().join("catalog.json"));
    }

    #[test]
    fn test_absolute_catalog_path_kept() {
        let dir = TempDir::new().expect("temp dir");
        let path = write_config(&dir, r#"catalog_path = "/srv/catalog.json""#);
        let_assert!(Ok(config) = Config::from_file(&path));
        check!(config.catalog_path == Path::new("/srv/catalog.json"));
    }

    #[test]
    fn test_expand_tilde() {
        check!(expand_tilde("/srv/catalog.json") == "/srv/catalog.json");
        check!(expand_tilde("catalog.json") == "catalog.json");
        if let Some(home) = dirs::home_dir() {
            check!(expand_tilde("~/catalog.json") == home.join("catalog.json").display().to_string());
        }
    }

    #[test]
    fn test_limit_is_clamped() {
        let dir = TempDir::new().expect("temp dir");
        let path = write_config(&dir, "result_limit = 1000");
        let_assert!(Ok(config) = Config::from_file(&path));
        check!(config.result_limit == MAX_RESULT_LIMIT);

        let path = write_config(&dir, "result_limit = 0");
        let_assert!(Ok(config) = Config::from_file(&path));
        check!(config.result_limit == 1);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let dir = TempDir::new().expect("temp dir");
        let path = write_config(&dir, "[weights]\ncoating = -1");
        let_assert!(
            Err(LoadError::InvalidWeight {
                category: "coating",
                ..
            }) = Config::from_file(&path)
        );
    }

    #[test]
    fn test_bad_toml_rejected() {
        let dir = TempDir::new().expect("temp dir");
        let path = write_config(&dir, "result_limit = \"many\"");
        let_assert!(Err(LoadError::Config { .. }) = Config::from_file(&path));
    }

    #[test]
    fn test_load_from_resolution() {
        let dir = TempDir::new().expect("temp dir");
        let missing = dir.path().join("absent.toml");

        // Missing fallback falls through to defaults.
        let_assert!(Ok(config) = Config::load_from(None, Some(&missing)));
        check!(config == Config::default());

        // Missing explicit file is an error.
        let_assert!(Err(LoadError::Io { .. }) = Config::load_from(Some(&missing), None));

        let path = write_config(&dir, "result_limit = 5");
        let_assert!(Ok(config) = Config::load_from(None, Some(&path)));
        check!(config.result_limit == 5);
    }
}
