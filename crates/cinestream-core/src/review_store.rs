use crate::error::{ReviewStoreError, StorageError};
use crate::kv::KeyValueStore;
use cinestream_config::DEFAULT_NAMESPACE;
use cinestream_models::{Review, ReviewDraft, ReviewSummary, SubjectId, MAX_RATING, MIN_RATING};
use chrono::Utc;
use serde_json::Value;
use std::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Per-movie review collections on top of a key-value backend.
///
/// Each movie has one key (`namespace + id`) holding a JSON array of reviews,
/// newest first. Reads never fail: missing or unparseable data is an empty
/// collection, and a single malformed record is skipped rather than hiding the
/// rest. Writes rewrite the whole collection; the internal lock keeps
/// concurrent read-modify-write cycles in this process from losing updates.
pub struct ReviewStore {
    backend: Box<dyn KeyValueStore>,
    namespace: String,
    write_lock: Mutex<()>,
}

impl ReviewStore {
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self::with_namespace(backend, DEFAULT_NAMESPACE)
    }

    pub fn with_namespace(backend: Box<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn backend_name(&self) -> &str {
        self.backend.backend_name()
    }

    fn key_for(&self, subject_id: SubjectId) -> String {
        format!("{}{}", self.namespace, subject_id)
    }

    /// All reviews for the movie, newest first
    pub fn list(&self, subject_id: SubjectId) -> Vec<Review> {
        decode_records(subject_id, &self.read_records(subject_id))
    }

    /// Validate the draft, persist it at the head of the collection and return it
    pub fn append(&self, subject_id: SubjectId, draft: ReviewDraft) -> Result<Review, ReviewStoreError> {
        validate_draft(&draft)?;

        let _guard = self.lock();
        let review = draft.into_review(Uuid::new_v4().to_string(), subject_id, Utc::now());

        let mut records = self.read_records(subject_id);
        records.insert(0, serde_json::to_value(&review)?);
        self.write(subject_id, &records)?;

        info!(
            "Added review {} for movie {} (rating {}, {} total)",
            review.id,
            subject_id,
            review.rating,
            records.len()
        );
        Ok(review)
    }

    /// Mean of all positive ratings; `None` when there are none
    pub fn average_rating(&self, subject_id: SubjectId) -> Option<f64> {
        average_of(&self.list(subject_id))
    }

    pub fn summary(&self, subject_id: SubjectId) -> ReviewSummary {
        let reviews = self.list(subject_id);
        ReviewSummary {
            count: reviews.len(),
            average: average_of(&reviews),
        }
    }

    /// Drop one review by id. Returns false (and writes nothing) when it is not there.
    pub fn remove(&self, subject_id: SubjectId, review_id: &str) -> Result<bool, ReviewStoreError> {
        let _guard = self.lock();

        let mut records = self.read_records(subject_id);
        let before = records.len();
        records.retain(|record| record.get("id").and_then(Value::as_str) != Some(review_id));
        if records.len() == before {
            debug!("Review {} not found for movie {}", review_id, subject_id);
            return Ok(false);
        }

        self.write(subject_id, &records)?;
        info!("Removed review {} from movie {}", review_id, subject_id);
        Ok(true)
    }

    /// Delete the whole collection for a movie, returning how many reviews it held
    pub fn clear(&self, subject_id: SubjectId) -> Result<usize, ReviewStoreError> {
        let _guard = self.lock();

        let count = self.list(subject_id).len();
        let key = self.key_for(subject_id);
        self.backend
            .remove(&key)
            .map_err(|source| ReviewStoreError::StorageUnavailable { key: key.clone(), source })?;

        info!("Cleared {} review(s) for movie {}", count, subject_id);
        Ok(count)
    }

    /// Movies that currently have a stored collection, ascending
    pub fn subjects(&self) -> Result<Vec<SubjectId>, ReviewStoreError> {
        let keys = self
            .backend
            .keys_with_prefix(&self.namespace)
            .map_err(|source| ReviewStoreError::StorageUnavailable {
                key: self.namespace.clone(),
                source,
            })?;

        let mut subjects: Vec<SubjectId> = keys
            .iter()
            .filter_map(|k| k.strip_prefix(&self.namespace))
            .filter_map(|id| id.parse().ok())
            .collect();
        subjects.sort_unstable();
        Ok(subjects)
    }

    /// Raw records of the collection. Anything other than a readable JSON array is empty.
    fn read_records(&self, subject_id: SubjectId) -> Vec<Value> {
        let key = self.key_for(subject_id);

        let data = match self.backend.get(&key) {
            Ok(Some(data)) => data,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read reviews for {}: {}. Treating as empty.", key, e);
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<Value>>(&data) {
            Ok(records) => {
                debug!("Loaded {} record(s) for {}", records.len(), key);
                records
            }
            Err(e) => {
                warn!("Stored reviews for {} are unreadable: {}. Treating as empty.", key, e);
                Vec::new()
            }
        }
    }

    /// Records are written back as read, so entries this build cannot decode are kept
    fn write(&self, subject_id: SubjectId, records: &[Value]) -> Result<(), ReviewStoreError> {
        let key = self.key_for(subject_id);
        let json = serde_json::to_vec(records)?;
        self.backend.set(&key, &json).map_err(|source: StorageError| {
            warn!("Failed to write reviews for {}: {}", key, source);
            ReviewStoreError::StorageUnavailable { key, source }
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        // The guarded value is (), so a poisoned lock carries no broken state
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Enforce the persisted-review contract: rating in 1..=5 and a non-blank body
pub fn validate_draft(draft: &ReviewDraft) -> Result<(), ReviewStoreError> {
    if !(MIN_RATING..=MAX_RATING).contains(&draft.rating) {
        return Err(ReviewStoreError::InvalidReview(format!(
            "rating must be between {} and {}, got {}",
            MIN_RATING, MAX_RATING, draft.rating
        )));
    }
    if draft.text.trim().is_empty() {
        return Err(ReviewStoreError::InvalidReview("review text cannot be empty".to_string()));
    }
    Ok(())
}

/// Decode each record on its own; a malformed entry is skipped, not the whole collection
fn decode_records(subject_id: SubjectId, records: &[Value]) -> Vec<Review> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Review>(record.clone()) {
            Ok(mut review) => {
                review.subject_id = subject_id;
                Some(review)
            }
            Err(e) => {
                warn!("Skipping unreadable review #{} of movie {}: {}", index, subject_id, e);
                None
            }
        })
        .collect()
}

fn average_of(reviews: &[Review]) -> Option<f64> {
    let ratings: Vec<i32> = reviews.iter().map(|r| r.rating).filter(|&r| r > 0).collect();
    if ratings.is_empty() {
        return None;
    }
    let sum: i64 = ratings.iter().map(|&r| r as i64).sum();
    Some(sum as f64 / ratings.len() as f64)
}
