use serde::{Deserialize, Serialize};

/// WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Finite and inside `[-90, 90] x [-180, 180]`.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A venue returned by the place search backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub name: String,
    pub location: GeoPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Candidate annotated with its great-circle distance from the search origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate<T> {
    #[serde(flatten)]
    pub candidate: T,
    pub distance_km: f64,
}

/// Query handed to a place search backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceQuery {
    pub center: GeoPoint,
    pub radius_km: f64,
    #[serde(default)]
    pub cuisine: Option<String>,
}

impl PlaceQuery {
    /// Case-insensitive cuisine match; no filter accepts everything.
    pub fn accepts_cuisine(&self, cuisine: Option<&str>) -> bool {
        match self.cuisine.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(wanted) => cuisine.is_some_and(|value| value.trim().eq_ignore_ascii_case(wanted)),
        }
    }
}

/// Request body for the nearby-places endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NearbyRequest {
    pub origin: GeoPoint,
    #[serde(default)]
    pub radius_km: Option<f64>,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}
