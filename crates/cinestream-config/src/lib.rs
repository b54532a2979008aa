pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{CatalogConfig, Config, LoggingConfig, ReviewsConfig, StorageBackend, StorageConfig, DEFAULT_NAMESPACE};
pub use credentials::{CredentialStore, ACCESS_TOKEN_ENV};
pub use paths::{PathManager, container_base_path};
