//! Date-night venue search ranked by distance from the couple.

pub mod catalogue;
pub mod domain;
pub mod proximity;
pub mod router;
pub mod search;
pub mod service;


pub use catalogue::{parse_catalogue, CatalogueError, CatalogueSearch};
pub use domain::{GeoPoint, NearbyRequest, PlaceCandidate, PlaceQuery, RankedCandidate};
pub use proximity::{haversine_km, rank_by_distance, Located, EARTH_RADIUS_KM};
pub use router::dining_router;
pub use search::{PlaceSearch, PlaceSearchError};
pub use service::{DiningError, RestaurantFinder};
