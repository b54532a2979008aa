use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Key prefix under which review collections are stored, one key per movie
pub const DEFAULT_NAMESPACE: &str = "cinestream_comments_";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub reviews: ReviewsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote catalog (TMDB) settings. The access token lives in the credentials file.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per movie under the data directory
    File,
    /// Process memory only; nothing survives exit
    Memory,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Overrides `<data_dir>/reviews`
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReviewsConfig {
    #[serde(default = "default_author")]
    pub default_author: String,
    #[serde(default = "default_avatar_base_url")]
    pub avatar_base_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    /// Write logs to this file (rotated daily) instead of stderr
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Force JSON (true) or plain (false) output; unset means auto-detect
    #[serde(default)]
    pub json: Option<bool>,
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_language() -> String {
    "pt-BR".to_string()
}

fn default_timeout_seconds() -> u64 {
    15
}

fn default_backend() -> StorageBackend {
    StorageBackend::File
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_author() -> String {
    "Usuário Anônimo".to_string()
}

fn default_avatar_base_url() -> String {
    "https://api.dicebear.com/7.x/avataaars/svg".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            language: default_language(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            namespace: default_namespace(),
            dir: None,
        }
    }
}

impl Default for ReviewsConfig {
    fn default() -> Self {
        Self {
            default_author: default_author(),
            avatar_base_url: default_avatar_base_url(),
        }
    }
}

impl ReviewsConfig {
    /// Avatar reference for a new review, seeded so each review gets its own image
    pub fn avatar_for_seed(&self, seed: &str) -> String {
        format!("{}?seed={}", self.avatar_base_url, seed)
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file, falling back to defaults when it does not exist yet
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!("Config file {} not found, using defaults", path.display());
            return Ok(Config::default());
        }
        Self::load_from_file(path)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, url) in [
            ("catalog.base_url", &self.catalog.base_url),
            ("catalog.image_base_url", &self.catalog.image_base_url),
            ("reviews.avatar_base_url", &self.reviews.avatar_base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow::anyhow!("{} must be an http(s) URL, got '{}'", name, url));
            }
        }

        if self.catalog.language.trim().is_empty() {
            return Err(anyhow::anyhow!("catalog.language cannot be empty"));
        }

        if self.catalog.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("catalog.timeout_seconds must be positive"));
        }

        if self.storage.namespace.is_empty() {
            return Err(anyhow::anyhow!("storage.namespace cannot be empty"));
        }

        Ok(())
    }

    /// Directory for the file backend: explicit override or the default under the data dir
    pub fn reviews_dir(&self, paths: &crate::PathManager) -> PathBuf {
        self.storage.dir.clone().unwrap_or_else(|| paths.reviews_dir())
    }
}
