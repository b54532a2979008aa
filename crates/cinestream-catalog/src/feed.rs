use crate::error::CatalogError;
use crate::traits::CatalogSource;
use cinestream_models::Movie;
use rand::seq::SliceRandom;
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Catalog genre id for "Action"
pub const ACTION_GENRE_ID: u32 = 28;

/// One of the curated rows on the home screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shelf {
    Trending,
    Popular,
    TopRated,
    Action,
}

impl Shelf {
    /// Display order on the home screen
    pub const ALL: [Shelf; 4] = [Shelf::Trending, Shelf::Popular, Shelf::TopRated, Shelf::Action];

    pub fn title(&self) -> &'static str {
        match self {
            Shelf::Trending => "Tendências da Semana",
            Shelf::Popular => "Populares no CineStream",
            Shelf::TopRated => "Aclamados pela Crítica",
            Shelf::Action => "Ação e Aventura",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Shelf::Trending => "trending",
            Shelf::Popular => "popular",
            Shelf::TopRated => "top-rated",
            Shelf::Action => "action",
        }
    }

    pub async fn fetch<S: CatalogSource + ?Sized>(&self, source: &S) -> Result<Vec<Movie>, CatalogError> {
        match self {
            Shelf::Trending => source.trending().await,
            Shelf::Popular => source.popular().await,
            Shelf::TopRated => source.top_rated().await,
            Shelf::Action => source.by_genre(ACTION_GENRE_ID).await,
        }
    }
}

impl fmt::Display for Shelf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Shelf {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "trending" => Ok(Shelf::Trending),
            "popular" => Ok(Shelf::Popular),
            "top-rated" => Ok(Shelf::TopRated),
            "action" => Ok(Shelf::Action),
            _ => Err(format!(
                "Invalid shelf: {}. Use 'trending', 'popular', 'top-rated' or 'action'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShelfRow {
    pub shelf: Shelf,
    pub movies: Vec<Movie>,
}

/// Everything the home screen shows: a featured movie and the curated rows
#[derive(Debug, Clone)]
pub struct HomeFeed {
    pub featured: Option<Movie>,
    pub rows: Vec<ShelfRow>,
}

impl HomeFeed {
    /// Fetch every shelf in display order and feature a random popular movie
    pub async fn load<S: CatalogSource + ?Sized>(source: &S) -> Result<Self, CatalogError> {
        Self::load_shelves(source, &Shelf::ALL).await
    }

    /// Fetch only the given shelves. The featured movie comes from Popular when it is among them.
    pub async fn load_shelves<S: CatalogSource + ?Sized>(source: &S, shelves: &[Shelf]) -> Result<Self, CatalogError> {
        let mut rows = Vec::with_capacity(shelves.len());
        for shelf in shelves {
            let movies = shelf.fetch(source).await?;
            info!("Loaded shelf {} from {} ({} movies)", shelf, source.source_name(), movies.len());
            rows.push(ShelfRow { shelf: *shelf, movies });
        }

        let featured = rows
            .iter()
            .find(|row| row.shelf == Shelf::Popular)
            .and_then(|row| row.movies.choose(&mut rand::thread_rng()))
            .cloned();

        Ok(Self { featured, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cinestream_models::MovieDetails;
    use std::sync::Mutex;

    fn movie(id: u64, title: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            overview: String::new(),
            poster_path: None,
            backdrop_path: None,
            vote_average: 7.0,
            release_date: "2020-01-01".to_string(),
            genre_ids: vec![],
        }
    }

    /// In-memory catalog that records which endpoints were hit
    struct FakeCatalog {
        popular: Vec<Movie>,
        fail_top_rated: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeCatalog {
        fn new(popular: Vec<Movie>) -> Self {
            Self {
                popular,
                fail_top_rated: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, call: &str) {
            self.calls.lock().unwrap().push(call.to_string());
        }
    }

    #[async_trait]
    impl CatalogSource for FakeCatalog {
        fn source_name(&self) -> &str {
            "fake"
        }

        async fn trending(&self) -> Result<Vec<Movie>, CatalogError> {
            self.record("trending");
            Ok(vec![movie(1, "Trending")])
        }

        async fn popular(&self) -> Result<Vec<Movie>, CatalogError> {
            self.record("popular");
            Ok(self.popular.clone())
        }

        async fn top_rated(&self) -> Result<Vec<Movie>, CatalogError> {
            self.record("top_rated");
            if self.fail_top_rated {
                return Err(CatalogError::Status {
                    endpoint: "/movie/top_rated".to_string(),
                    status: 401,
                    body: String::new(),
                });
            }
            Ok(vec![movie(3, "Top")])
        }

        async fn by_genre(&self, genre_id: u32) -> Result<Vec<Movie>, CatalogError> {
            self.record(&format!("genre:{}", genre_id));
            Ok(vec![movie(4, "Action")])
        }

        async fn movie_details(&self, id: u64) -> Result<MovieDetails, CatalogError> {
            Err(CatalogError::InvalidUrl(format!("no details for {}", id)))
        }
    }

    #[tokio::test]
    async fn test_home_feed_order_and_featured() {
        let catalog = FakeCatalog::new(vec![movie(2, "Popular")]);
        let feed = HomeFeed::load(&catalog).await.unwrap();

        let shelves: Vec<Shelf> = feed.rows.iter().map(|r| r.shelf).collect();
        assert_eq!(shelves, Shelf::ALL.to_vec());
        assert_eq!(
            *catalog.calls.lock().unwrap(),
            vec!["trending", "popular", "top_rated", "genre:28"]
        );
        assert_eq!(feed.featured.map(|m| m.id), Some(2));
        let action = feed.rows.iter().find(|row| row.shelf == Shelf::Action).unwrap();
        assert_eq!(action.movies[0].title, "Action");
    }

    #[tokio::test]
    async fn test_featured_comes_from_popular() {
        let popular = vec![movie(10, "a"), movie(11, "b"), movie(12, "c")];
        let catalog = FakeCatalog::new(popular);
        for _ in 0..10 {
            let feed = HomeFeed::load(&catalog).await.unwrap();
            let featured = feed.featured.unwrap();
            assert!((10..=12).contains(&featured.id));
        }
    }

    #[tokio::test]
    async fn test_no_featured_when_popular_empty() {
        let catalog = FakeCatalog::new(vec![]);
        let feed = HomeFeed::load(&catalog).await.unwrap();
        assert!(feed.featured.is_none());
    }

    #[tokio::test]
    async fn test_shelf_failure_fails_load() {
        let mut catalog = FakeCatalog::new(vec![movie(2, "Popular")]);
        catalog.fail_top_rated = true;
        let result = HomeFeed::load(&catalog).await;
        assert!(matches!(result, Err(CatalogError::Status { status: 401, .. })));
    }

    #[tokio::test]
    async fn test_single_shelf() {
        let catalog = FakeCatalog::new(vec![movie(2, "Popular")]);
        let feed = HomeFeed::load_shelves(&catalog, &[Shelf::Trending]).await.unwrap();
        assert_eq!(feed.rows.len(), 1);
        assert!(feed.featured.is_none());
    }

    #[test]
    fn test_shelf_parse() {
        assert_eq!("top_rated".parse::<Shelf>(), Ok(Shelf::TopRated));
        assert_eq!("Action".parse::<Shelf>(), Ok(Shelf::Action));
        assert!("horror".parse::<Shelf>().is_err());
    }
}
