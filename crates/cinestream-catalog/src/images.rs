use std::fmt;

/// Shown wherever the catalog has no image for a movie or person
pub const FALLBACK_IMAGE_URL: &str = "https://picsum.photos/500/750?blur=2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    #[default]
    Original,
    W500,
    W1280,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Original => "original",
            ImageSize::W500 => "w500",
            ImageSize::W1280 => "w1280",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Turns catalog image paths ("/abc.jpg") into absolute URLs
#[derive(Debug, Clone)]
pub struct ImageResolver {
    base_url: String,
}

impl ImageResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: Option<&str>, size: ImageSize) -> String {
        match path {
            Some(p) if !p.trim().is_empty() => {
                let p = if p.starts_with('/') { p.to_string() } else { format!("/{}", p) };
                format!("{}/{}{}", self.base_url, size, p)
            }
            _ => FALLBACK_IMAGE_URL.to_string(),
        }
    }

    pub fn poster(&self, path: Option<&str>) -> String {
        self.url(path, ImageSize::W500)
    }

    pub fn backdrop(&self, path: Option<&str>) -> String {
        self.url(path, ImageSize::Original)
    }
}

impl Default for ImageResolver {
    fn default() -> Self {
        Self::new("https://image.tmdb.org/t/p")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url() {
        let resolver = ImageResolver::default();
        assert_eq!(
            resolver.url(Some("/abc.jpg"), ImageSize::W500),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
        assert_eq!(
            resolver.backdrop(Some("/b.jpg")),
            "https://image.tmdb.org/t/p/original/b.jpg"
        );
        assert_eq!(
            resolver.url(Some("/c.jpg"), ImageSize::W1280),
            "https://image.tmdb.org/t/p/w1280/c.jpg"
        );
    }

    #[test]
    fn test_image_url_fallback() {
        let resolver = ImageResolver::default();
        assert_eq!(resolver.poster(None), FALLBACK_IMAGE_URL);
        assert_eq!(resolver.poster(Some("")), FALLBACK_IMAGE_URL);
    }

    #[test]
    fn test_trailing_slash_base() {
        let resolver = ImageResolver::new("https://img.example.com/t/p/");
        assert_eq!(resolver.poster(Some("x.jpg")), "https://img.example.com/t/p/w500/x.jpg");
    }
}
