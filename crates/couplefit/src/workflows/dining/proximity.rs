//! Great-circle ranking of candidates around an origin.

use super::domain::{GeoPoint, PlaceCandidate, RankedCandidate};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Anything with a position that can be ranked.
pub trait Located {
    fn location(&self) -> GeoPoint;
}

impl Located for GeoPoint {
    fn location(&self) -> GeoPoint {
        *self
    }
}

impl Located for PlaceCandidate {
    fn location(&self) -> GeoPoint {
        self.location
    }
}

/// Haversine distance in kilometres.
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Attach distances and sort ascending. Equal distances keep input order and
/// nothing is filtered out.
pub fn rank_by_distance<T, I>(origin: GeoPoint, candidates: I) -> Vec<RankedCandidate<T>>
where
    T: Located,
    I: IntoIterator<Item = T>,
{
    let mut ranked: Vec<RankedCandidate<T>> = candidates
        .into_iter()
        .map(|candidate| {
            let distance_km = haversine_km(origin, candidate.location());
            RankedCandidate {
                candidate,
                distance_km,
            }
        })
        .collect();

    ranked.sort_by(|left, right| left.distance_km.total_cmp(&right.distance_km));
    ranked
}
