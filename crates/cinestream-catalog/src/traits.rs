use crate::error::CatalogError;
use async_trait::async_trait;
use cinestream_models::{Movie, MovieDetails};

/// Read-only movie catalog
#[async_trait]
pub trait CatalogSource: Send + Sync {
    fn source_name(&self) -> &str;

    /// Movies trending this week
    async fn trending(&self) -> Result<Vec<Movie>, CatalogError>;
    async fn popular(&self) -> Result<Vec<Movie>, CatalogError>;
    async fn top_rated(&self) -> Result<Vec<Movie>, CatalogError>;
    async fn by_genre(&self, genre_id: u32) -> Result<Vec<Movie>, CatalogError>;

    /// Full record with credits, videos and similar titles
    async fn movie_details(&self, id: u64) -> Result<MovieDetails, CatalogError>;
}
