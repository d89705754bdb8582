use std::sync::Arc;

use tracing::{debug, warn};

use super::domain::{NearbyRequest, PlaceCandidate, PlaceQuery, RankedCandidate};
use super::proximity::rank_by_distance;
use super::search::{PlaceSearch, PlaceSearchError};
use crate::config::DiningConfig;

/// Finds venues for a date night around one partner's location.
pub struct RestaurantFinder<S> {
    search: Arc<S>,
    default_radius_km: f64,
    default_limit: usize,
}

impl<S> RestaurantFinder<S>
where
    S: PlaceSearch + 'static,
{
    pub fn new(search: Arc<S>, config: &DiningConfig) -> Self {
        Self {
            search,
            default_radius_km: config.search_radius_km,
            default_limit: config.result_limit,
        }
    }

    /// Query the search backend, rank by distance, then keep the closest `limit`.
    pub fn nearby(
        &self,
        request: NearbyRequest,
    ) -> Result<Vec<RankedCandidate<PlaceCandidate>>, DiningError> {
        if !request.origin.is_valid() {
            return Err(DiningError::InvalidOrigin {
                latitude: request.origin.latitude,
                longitude: request.origin.longitude,
            });
        }

        let radius_km = request.radius_km.unwrap_or(self.default_radius_km);
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(DiningError::InvalidRadius(radius_km));
        }
        let limit = request.limit.unwrap_or(self.default_limit);

        let query = PlaceQuery {
            center: request.origin,
            radius_km,
            cuisine: request.cuisine,
        };
        let candidates = self.search.search(&query).map_err(|err| {
            warn!(error = %err, "place search failed");
            DiningError::Search(err)
        })?;

        let mut ranked = rank_by_distance(query.center, candidates);
        ranked.truncate(limit);
        debug!(results = ranked.len(), radius_km, "ranked nearby places");
        Ok(ranked)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DiningError {
    #[error("origin ({latitude}, {longitude}) is not a valid coordinate")]
    InvalidOrigin { latitude: f64, longitude: f64 },
    #[error("search radius must be a positive number of kilometres, got {0}")]
    InvalidRadius(f64),
    #[error(transparent)]
    Search(#[from] PlaceSearchError),
}
