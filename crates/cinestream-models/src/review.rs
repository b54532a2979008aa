use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Catalog identifier of the movie a review is attached to
pub type SubjectId = u64;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// A persisted user review.
///
/// Field names on the wire match the records written by the browser build
/// (`userName`, `createdAt`, `avatarUrl`), so exported collections load as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: String,
    /// Optional on the wire; the store fills it from the collection key
    #[serde(rename = "movieId", default)]
    pub subject_id: SubjectId,
    #[serde(rename = "userName", default)]
    pub author_name: String,
    #[serde(default)]
    pub text: String,
    /// Star rating, 1-5. Signed so that legacy out-of-range records still parse.
    #[serde(default, deserialize_with = "lenient::rating")]
    pub rating: i32,
    #[serde(rename = "createdAt", deserialize_with = "lenient::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "avatarUrl", default, skip_serializing_if = "Option::is_none")]
    pub avatar_ref: Option<String>,
}

/// Caller-supplied fields of a review before id and timestamp assignment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewDraft {
    #[serde(rename = "userName")]
    pub author_name: String,
    pub text: String,
    pub rating: i32,
    #[serde(rename = "avatarUrl", default, skip_serializing_if = "Option::is_none")]
    pub avatar_ref: Option<String>,
}

impl ReviewDraft {
    pub fn new(author_name: impl Into<String>, text: impl Into<String>, rating: i32) -> Self {
        Self {
            author_name: author_name.into(),
            text: text.into(),
            rating,
            avatar_ref: None,
        }
    }

    pub fn with_avatar(mut self, avatar_ref: impl Into<String>) -> Self {
        self.avatar_ref = Some(avatar_ref.into());
        self
    }

    /// Materialize the draft into a review with the given identity
    pub fn into_review(self, id: String, subject_id: SubjectId, created_at: DateTime<Utc>) -> Review {
        Review {
            id,
            subject_id,
            author_name: self.author_name,
            text: self.text,
            rating: self.rating,
            created_at,
            avatar_ref: self.avatar_ref,
        }
    }
}

/// Review count and mean rating for one subject
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ReviewSummary {
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
}

/// Tolerant readers for fields that older builds wrote loosely
mod lenient {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn whole_stars(value: f64) -> Option<i32> {
        value.is_finite().then(|| value.round() as i32)
    }

    /// Any JSON number or numeric string; fractional values round to the nearest star
    pub fn rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
        let parsed = match Value::deserialize(deserializer)? {
            Value::Null => Some(0),
            Value::Number(n) => match n.as_i64() {
                Some(v) => Some(v.clamp(i32::MIN as i64, i32::MAX as i64) as i32),
                None => n.as_f64().and_then(whole_stars),
            },
            Value::String(s) => s.trim().parse::<f64>().ok().and_then(whole_stars),
            _ => None,
        };
        parsed.ok_or_else(|| D::Error::custom("rating is not a number"))
    }

    /// RFC 3339, a zone-less ISO timestamp taken as UTC, or epoch milliseconds
    pub fn timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => {
                let s = s.trim();
                if let Ok(at) = DateTime::parse_from_rfc3339(s) {
                    return Ok(at.with_timezone(&Utc));
                }
                ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                    .map(|naive| Utc.from_utc_datetime(&naive))
                    .ok_or_else(|| D::Error::custom(format!("invalid timestamp '{}'", s)))
            }
            Value::Number(n) => n
                .as_i64()
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
                .ok_or_else(|| D::Error::custom("timestamp out of range")),
            other => Err(D::Error::custom(format!("invalid timestamp {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parses_browser_record() {
        let json = r#"[{
            "id": "0b8d0f6e-4c1a-4f4e-9d9a-1d2c3b4a5f60",
            "movieId": 42,
            "userName": "Ana",
            "text": "Ótimo!",
            "rating": 5,
            "createdAt": "2024-03-01T18:22:10.512Z"
        }]"#;

        let reviews: Vec<Review> = serde_json::from_str(json).unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].subject_id, 42);
        assert_eq!(reviews[0].author_name, "Ana");
        assert_eq!(reviews[0].rating, 5);
        assert_eq!(reviews[0].avatar_ref, None);
    }

    #[test]
    fn test_parses_record_without_movie_id() {
        let json = r#"{"id":"a","userName":"Ana","text":"Bom","rating":4,"createdAt":"2024-03-01T18:22:10.512Z"}"#;
        let review: Review = serde_json::from_str(json).unwrap();
        assert_eq!(review.subject_id, 0);
        assert_eq!(review.rating, 4);
    }

    #[test]
    fn test_loose_rating_values() {
        let parse = |rating: &str| {
            let json = format!(r#"{{"id":"a","text":"t","rating":{},"createdAt":"2024-01-01T00:00:00Z"}}"#, rating);
            serde_json::from_str::<Review>(&json).map(|r| r.rating)
        };
        assert_eq!(parse("3.5").unwrap(), 4);
        assert_eq!(parse("2.2").unwrap(), 2);
        assert_eq!(parse(r#""5""#).unwrap(), 5);
        assert_eq!(parse("null").unwrap(), 0);
        assert!(parse(r#""five""#).is_err());
        assert!(parse("[]").is_err());
    }

    #[test]
    fn test_loose_timestamps() {
        let parse = |created_at: &str| {
            let json = format!(r#"{{"id":"a","text":"t","rating":3,"createdAt":{}}}"#, created_at);
            serde_json::from_str::<Review>(&json).map(|r| r.created_at)
        };
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 18, 22, 10).unwrap();

        assert_eq!(parse(r#""2024-03-01T18:22:10Z""#).unwrap(), expected);
        assert_eq!(parse(r#""2024-03-01T15:22:10-03:00""#).unwrap(), expected);
        assert_eq!(parse(r#""2024-03-01T18:22:10""#).unwrap(), expected);
        assert_eq!(parse(&expected.timestamp_millis().to_string()).unwrap(), expected);
        assert!(parse(r#""yesterday""#).is_err());
    }

    #[test]
    fn test_serializes_wire_names() {
        let draft = ReviewDraft::new("Ana", "Bom", 4).with_avatar("https://example.com/a.svg");
        let review = draft.into_review("id-1".to_string(), 7, Utc::now());
        let value = serde_json::to_value(&review).unwrap();

        assert_eq!(value["movieId"], 7);
        assert_eq!(value["userName"], "Ana");
        assert_eq!(value["avatarUrl"], "https://example.com/a.svg");
        assert!(value["createdAt"].is_string());
    }

    #[test]
    fn test_avatar_omitted_when_absent() {
        let review = ReviewDraft::new("", "", 3).into_review("id-2".to_string(), 1, Utc::now());
        let value = serde_json::to_value(&review).unwrap();
        assert!(value.get("avatarUrl").is_none());
    }
}
