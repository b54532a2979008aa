use crate::error::CatalogError;
use cinestream_models::{Movie, MovieDetails, MovieList};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub const TRENDING_WEEK: &str = "/trending/movie/week";
pub const POPULAR: &str = "/movie/popular";
pub const TOP_RATED: &str = "/movie/top_rated";
pub const DISCOVER: &str = "/discover/movie";

/// Extra records requested alongside movie details
pub const DETAILS_APPEND: &str = "credits,videos,similar";

/// Connection settings shared by every request
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub base_url: String,
    pub access_token: String,
    pub language: String,
}

/// Build the full request URL: base + endpoint, `language` first, then endpoint params
pub fn endpoint_url(base_url: &str, endpoint: &str, language: &str, params: &[(&str, String)]) -> Result<Url, CatalogError> {
    let raw = format!("{}{}", base_url.trim_end_matches('/'), endpoint);
    let mut query: Vec<(&str, &str)> = vec![("language", language)];
    query.extend(params.iter().map(|(k, v)| (*k, v.as_str())));

    Url::parse_with_params(&raw, &query).map_err(|e| CatalogError::InvalidUrl(format!("{}: {}", raw, e)))
}

async fn fetch<T: DeserializeOwned>(
    client: &Client,
    ctx: &RequestContext,
    endpoint: &str,
    params: &[(&str, String)],
) -> Result<T, CatalogError> {
    let url = endpoint_url(&ctx.base_url, endpoint, &ctx.language, params)?;
    debug!("Catalog request: {}", endpoint);

    let response = client
        .get(url)
        .header("Authorization", format!("Bearer {}", ctx.access_token))
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|source| CatalogError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        warn!("Catalog request {} failed: {}", endpoint, status);
        return Err(CatalogError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await.map_err(|source| CatalogError::Transport {
        endpoint: endpoint.to_string(),
        source,
    })?;

    serde_json::from_slice(&bytes).map_err(|source| CatalogError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

/// Fetch the first page of a list endpoint
pub async fn get_movie_list(
    client: &Client,
    ctx: &RequestContext,
    endpoint: &str,
    params: &[(&str, String)],
) -> Result<Vec<Movie>, CatalogError> {
    let list: MovieList = fetch(client, ctx, endpoint, params).await?;
    debug!("Catalog {} returned {} movie(s)", endpoint, list.results.len());
    Ok(list.results)
}

pub async fn get_movie_details(client: &Client, ctx: &RequestContext, id: u64) -> Result<MovieDetails, CatalogError> {
    let endpoint = format!("/movie/{}", id);
    fetch(client, ctx, &endpoint, &[("append_to_response", DETAILS_APPEND.to_string())]).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_language_first() {
        let url = endpoint_url(
            "https://api.themoviedb.org/3",
            DISCOVER,
            "pt-BR",
            &[("with_genres", "28".to_string())],
        )
        .unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.themoviedb.org/3/discover/movie?language=pt-BR&with_genres=28"
        );
    }

    #[test]
    fn test_endpoint_url_encodes_params() {
        let url = endpoint_url(
            "https://api.themoviedb.org/3/",
            "/movie/550",
            "pt-BR",
            &[("append_to_response", DETAILS_APPEND.to_string())],
        )
        .unwrap();

        assert_eq!(url.path(), "/3/movie/550");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("language".to_string(), "pt-BR".to_string()),
                ("append_to_response".to_string(), "credits,videos,similar".to_string()),
            ]
        );
    }

    #[test]
    fn test_endpoint_url_invalid_base() {
        assert!(matches!(
            endpoint_url("not a url", POPULAR, "pt-BR", &[]),
            Err(CatalogError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_list_payload() {
        let json = r#"{"page":1,"results":[{"id":1,"title":"A","vote_average":7.5,"genre_ids":[28]}],"total_pages":10}"#;
        let list: MovieList = serde_json::from_str(json).unwrap();
        assert_eq!(list.results.len(), 1);
        assert_eq!(list.results[0].genre_ids, vec![28]);
        assert_eq!(list.total_pages, Some(10));
    }
}
