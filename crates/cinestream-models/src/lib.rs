pub mod movie;
pub mod review;

pub use movie::{CastMember, Credits, CrewMember, Genre, Movie, MovieDetails, MovieList, Video, VideoList};
pub use review::{Review, ReviewDraft, ReviewSummary, SubjectId, MAX_RATING, MIN_RATING};
