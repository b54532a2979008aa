use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no catalog access token configured (set TMDB_ACCESS_TOKEN or run 'cinestream config token')")]
    MissingToken,

    #[error("could not build the catalog HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid catalog URL: {0}")]
    InvalidUrl(String),

    #[error("catalog request to {endpoint} failed with status {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("catalog request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected catalog response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}
