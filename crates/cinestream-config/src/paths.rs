use anyhow::Result;
use std::path::PathBuf;

/// Get the container base path from environment variable, defaulting to "/app"
pub fn container_base_path() -> PathBuf {
    std::env::var("CINESTREAM_BASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/app"))
}

pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("cinestream");

        Ok(Self::from_base(base_dir))
    }

    pub fn from_docker_env() -> Self {
        Self::from_base(container_base_path())
    }

    /// Lay out all directories under a single base (config files at the top level)
    pub fn from_base(base: PathBuf) -> Self {
        Self {
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
            config_dir: base,
        }
    }

    /// Directory holding one file per reviewed movie
    pub fn reviews_dir(&self) -> PathBuf {
        self.data_dir.join("reviews")
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.config_dir.join("credentials.toml")
    }

    /// Log destination for `--log-file` without a path
    pub fn default_log_file(&self) -> PathBuf {
        self.log_dir.join("cinestream.log")
    }

    /// Create every directory the CLI writes into
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        std::fs::create_dir_all(self.reviews_dir())?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        // The container image creates the base directory; its presence means we run in Docker
        let base = container_base_path();
        if base.exists() {
            return Self::from_docker_env();
        }

        Self::new().unwrap_or_else(|_| Self::from_docker_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout_under_base() {
        let base = PathBuf::from("/srv/cinestream");
        let paths = PathManager::from_base(base.clone());

        assert_eq!(paths.config_file(), base.join("config.toml"));
        assert_eq!(paths.credentials_file(), base.join("credentials.toml"));
        assert_eq!(paths.reviews_dir(), base.join("data").join("reviews"));
        assert_eq!(paths.default_log_file(), base.join("logs").join("cinestream.log"));
    }

    #[test]
    fn test_ensure_directories() {
        let dir = TempDir::new().unwrap();
        let paths = PathManager::from_base(dir.path().join("cs"));
        paths.ensure_directories().unwrap();

        assert!(paths.reviews_dir().is_dir());
        assert!(paths.default_log_file().parent().unwrap().is_dir());
        assert!(paths.config_file().parent().unwrap().is_dir());
    }
}
