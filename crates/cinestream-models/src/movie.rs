use serde::{Deserialize, Serialize};

/// Movie summary as returned by the catalog list endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

impl Movie {
    /// Year from `release_date` (YYYY-MM-DD), if present
    pub fn release_year(&self) -> Option<u32> {
        self.release_date.get(..4).and_then(|y| y.parse().ok())
    }

    /// Catalog score (0-10) as a percentage, rounded
    pub fn relevance_percent(&self) -> u32 {
        (self.vote_average * 10.0).round().max(0.0) as u32
    }
}

/// One page of a catalog list endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieList {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<Movie>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub total_results: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrewMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub job: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Video {
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub site: String,
    #[serde(rename = "type", default)]
    pub video_type: String,
}

impl Video {
    pub fn watch_url(&self) -> Option<String> {
        match self.site.as_str() {
            "YouTube" => Some(format!("https://www.youtube.com/watch?v={}", self.key)),
            "Vimeo" => Some(format!("https://vimeo.com/{}", self.key)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoList {
    #[serde(default)]
    pub results: Vec<Video>,
}

/// Full movie record, fetched with credits, videos and similar titles appended
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub credits: Option<Credits>,
    #[serde(default)]
    pub videos: Option<VideoList>,
    #[serde(default)]
    pub similar: Option<MovieList>,
}

impl MovieDetails {
    /// Runtime formatted as "2h 5m"
    pub fn runtime_label(&self) -> Option<String> {
        self.runtime.map(|minutes| format!("{}h {}m", minutes / 60, minutes % 60))
    }

    /// First YouTube trailer, if the catalog returned one
    pub fn trailer(&self) -> Option<&Video> {
        self.videos
            .as_ref()?
            .results
            .iter()
            .find(|v| v.site == "YouTube" && v.video_type == "Trailer")
    }

    pub fn top_cast(&self, limit: usize) -> &[CastMember] {
        match &self.credits {
            Some(credits) => &credits.cast[..credits.cast.len().min(limit)],
            None => &[],
        }
    }

    pub fn genre_names(&self) -> Vec<&str> {
        self.genres.iter().map(|g| g.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAILS_JSON: &str = r#"{
        "id": 550,
        "title": "Clube da Luta",
        "overview": "Um homem deprimido...",
        "poster_path": "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
        "backdrop_path": null,
        "vote_average": 8.433,
        "release_date": "1999-10-15",
        "genres": [{"id": 18, "name": "Drama"}],
        "runtime": 139,
        "tagline": "Mischief. Mayhem. Soap.",
        "status": "Released",
        "credits": {
            "cast": [
                {"id": 819, "name": "Edward Norton", "character": "Narrator", "profile_path": null},
                {"id": 287, "name": "Brad Pitt", "character": "Tyler Durden", "profile_path": "/a.jpg"}
            ],
            "crew": [{"id": 7467, "name": "David Fincher", "job": "Director"}]
        },
        "videos": {"results": [
            {"key": "abc", "name": "Teaser", "site": "YouTube", "type": "Teaser"},
            {"key": "xyz", "name": "Trailer", "site": "YouTube", "type": "Trailer"}
        ]},
        "similar": {"page": 1, "results": [{"id": 807, "title": "Se7en"}]}
    }"#;

    #[test]
    fn test_details_deserialize() {
        let details: MovieDetails = serde_json::from_str(DETAILS_JSON).unwrap();
        assert_eq!(details.movie.id, 550);
        assert_eq!(details.movie.release_year(), Some(1999));
        assert_eq!(details.movie.relevance_percent(), 84);
        assert_eq!(details.runtime_label().as_deref(), Some("2h 19m"));
        assert_eq!(details.genre_names(), vec!["Drama"]);
        assert_eq!(details.top_cast(1).len(), 1);
        assert_eq!(details.top_cast(10).len(), 2);
        assert_eq!(details.trailer().map(|v| v.key.as_str()), Some("xyz"));
        assert_eq!(details.similar.unwrap().results[0].title, "Se7en");
    }

    #[test]
    fn test_minimal_movie_deserialize() {
        let movie: Movie = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(movie.title, "");
        assert_eq!(movie.release_year(), None);
        assert!(movie.genre_ids.is_empty());
    }

    #[test]
    fn test_details_without_appended_fields() {
        let details: MovieDetails = serde_json::from_str(r#"{"id": 2, "title": "X"}"#).unwrap();
        assert!(details.top_cast(10).is_empty());
        assert!(details.trailer().is_none());
        assert_eq!(details.runtime_label(), None);
    }

    #[test]
    fn test_video_watch_url() {
        let video = Video {
            key: "xyz".to_string(),
            name: String::new(),
            site: "YouTube".to_string(),
            video_type: "Trailer".to_string(),
        };
        assert_eq!(video.watch_url().as_deref(), Some("https://www.youtube.com/watch?v=xyz"));
    }
}
