use crate::error::CatalogError;
use crate::tmdb::api::{self, RequestContext};
use crate::traits::CatalogSource;
use async_trait::async_trait;
use cinestream_config::CatalogConfig;
use cinestream_models::{Movie, MovieDetails};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    ctx: RequestContext,
}

impl TmdbClient {
    pub fn new(config: &CatalogConfig, access_token: Option<String>) -> Result<Self, CatalogError> {
        let access_token = access_token
            .filter(|t| !t.trim().is_empty())
            .ok_or(CatalogError::MissingToken)?;

        let client = Client::builder()
            .user_agent(concat!("cinestream/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(CatalogError::Client)?;

        info!("Catalog client ready ({}, language {})", config.base_url, config.language);

        Ok(Self {
            client: Arc::new(client),
            ctx: RequestContext {
                base_url: config.base_url.clone(),
                access_token,
                language: config.language.clone(),
            },
        })
    }

    pub fn language(&self) -> &str {
        &self.ctx.language
    }
}

#[async_trait]
impl CatalogSource for TmdbClient {
    fn source_name(&self) -> &str {
        "tmdb"
    }

    async fn trending(&self) -> Result<Vec<Movie>, CatalogError> {
        api::get_movie_list(&self.client, &self.ctx, api::TRENDING_WEEK, &[]).await
    }

    async fn popular(&self) -> Result<Vec<Movie>, CatalogError> {
        api::get_movie_list(&self.client, &self.ctx, api::POPULAR, &[]).await
    }

    async fn top_rated(&self) -> Result<Vec<Movie>, CatalogError> {
        api::get_movie_list(&self.client, &self.ctx, api::TOP_RATED, &[]).await
    }

    async fn by_genre(&self, genre_id: u32) -> Result<Vec<Movie>, CatalogError> {
        api::get_movie_list(&self.client, &self.ctx, api::DISCOVER, &[("with_genres", genre_id.to_string())]).await
    }

    async fn movie_details(&self, id: u64) -> Result<MovieDetails, CatalogError> {
        api::get_movie_details(&self.client, &self.ctx, id).await
    }
}
