pub mod error;
pub mod feed;
pub mod images;
pub mod tmdb;
pub mod traits;

pub use error::CatalogError;
pub use feed::{HomeFeed, Shelf, ShelfRow, ACTION_GENRE_ID};
pub use images::{ImageResolver, ImageSize, FALLBACK_IMAGE_URL};
pub use tmdb::TmdbClient;
pub use traits::CatalogSource;
