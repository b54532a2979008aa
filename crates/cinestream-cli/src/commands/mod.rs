pub mod browse;
pub mod clear;
pub mod config;
pub mod movie;
pub mod prompts;
pub mod review;

use cinestream_catalog::{ImageResolver, TmdbClient};
use cinestream_config::{Config, CredentialStore, PathManager};
use cinestream_core::{open_review_store, ReviewStore};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

/// Paths and configuration shared by every command
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        Self::with_paths(paths)
    }

    pub fn with_paths(paths: PathManager) -> Result<Self> {
        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Falha ao carregar a configuração de {}: {}", config_file.display(), e))?;
        Ok(Self { paths, config })
    }

    pub fn credentials(&self) -> Result<CredentialStore> {
        let mut store = CredentialStore::new(self.paths.credentials_file());
        store
            .load()
            .map_err(|e| eyre!("Falha ao carregar as credenciais: {}", e))?;
        Ok(store)
    }

    pub fn review_store(&self) -> Result<ReviewStore> {
        open_review_store(&self.config, &self.paths).map_err(|e| eyre!("Falha ao abrir o armazenamento de comentários: {}", e))
    }

    pub fn catalog(&self) -> Result<TmdbClient> {
        let token = self.credentials()?.resolve_catalog_access_token();
        TmdbClient::new(&self.config.catalog, token).map_err(|e| eyre!("{}", e))
    }

    pub fn images(&self) -> ImageResolver {
        ImageResolver::new(self.config.catalog.image_base_url.clone())
    }
}

/// Spinner shown while waiting on the catalog; hidden outside interactive human output
pub fn spinner(msg: &str, show: bool) -> ProgressBar {
    if !show || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.blue} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(msg.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Prompts only make sense when a person is at the keyboard
pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_context_defaults_without_config_file() {
        let dir = TempDir::new().unwrap();
        let ctx = AppContext::with_paths(PathManager::from_base(dir.path().to_path_buf())).unwrap();
        assert_eq!(ctx.config.catalog.language, "pt-BR");
        assert!(ctx.credentials().unwrap().get_catalog_access_token().is_none());
    }

    #[test]
    fn test_context_review_store_uses_data_dir() {
        let dir = TempDir::new().unwrap();
        let ctx = AppContext::with_paths(PathManager::from_base(dir.path().to_path_buf())).unwrap();
        let store = ctx.review_store().unwrap();
        assert_eq!(store.backend_name(), "file");
        assert!(store.list(1).is_empty());
    }
}
