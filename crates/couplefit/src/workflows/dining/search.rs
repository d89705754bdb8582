use super::domain::{PlaceCandidate, PlaceQuery};

/// Geo-search backend returning venues around a point.
///
/// Implementations own filtering (radius, cuisine); ordering is left to the
/// proximity ranker.
pub trait PlaceSearch: Send + Sync {
    fn search(&self, query: &PlaceQuery) -> Result<Vec<PlaceCandidate>, PlaceSearchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PlaceSearchError {
    #[error("place search unavailable: {0}")]
    Unavailable(String),
}
