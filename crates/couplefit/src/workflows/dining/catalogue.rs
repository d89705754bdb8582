use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::domain::{GeoPoint, PlaceCandidate, PlaceQuery};
use super::proximity::haversine_km;
use super::search::{PlaceSearch, PlaceSearchError};

#[derive(Debug)]
pub enum CatalogueError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidCoordinates { row: usize, name: String },
}

impl std::fmt::Display for CatalogueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogueError::Io(err) => write!(f, "failed to read places catalogue: {}", err),
            CatalogueError::Csv(err) => write!(f, "invalid places CSV data: {}", err),
            CatalogueError::InvalidCoordinates { row, name } => write!(
                f,
                "row {} ({}) has coordinates outside the valid range",
                row, name
            ),
        }
    }
}

impl std::error::Error for CatalogueError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogueError::Io(err) => Some(err),
            CatalogueError::Csv(err) => Some(err),
            CatalogueError::InvalidCoordinates { .. } => None,
        }
    }
}

impl From<std::io::Error> for CatalogueError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogueError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Deserialize)]
struct PlaceRow {
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    rating: Option<f32>,
    #[serde(default)]
    price_level: Option<u8>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    cuisine: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    address: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Load places from a CSV export with the header
/// `name,latitude,longitude,rating,price_level,cuisine,address`.
pub fn parse_catalogue<R: Read>(reader: R) -> Result<Vec<PlaceCandidate>, CatalogueError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut places = Vec::new();
    for (index, record) in csv_reader.deserialize::<PlaceRow>().enumerate() {
        let row = record?;
        let location = GeoPoint::new(row.latitude, row.longitude);
        if !location.is_valid() {
            return Err(CatalogueError::InvalidCoordinates {
                // header is line 1
                row: index + 2,
                name: row.name,
            });
        }

        places.push(PlaceCandidate {
            name: row.name,
            location,
            rating: row.rating,
            price_level: row.price_level,
            cuisine: row.cuisine,
            address: row.address,
        });
    }

    Ok(places)
}

/// In-memory place search over a loaded catalogue.
#[derive(Debug, Clone, Default)]
pub struct CatalogueSearch {
    places: Vec<PlaceCandidate>,
}

impl CatalogueSearch {
    pub fn new(places: Vec<PlaceCandidate>) -> Self {
        Self { places }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogueError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogueError> {
        Ok(Self::new(parse_catalogue(reader)?))
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

impl PlaceSearch for CatalogueSearch {
    fn search(&self, query: &PlaceQuery) -> Result<Vec<PlaceCandidate>, PlaceSearchError> {
        Ok(self
            .places
            .iter()
            .filter(|place| haversine_km(query.center, place.location) <= query.radius_km)
            .filter(|place| query.accepts_cuisine(place.cuisine.as_deref()))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
name,latitude,longitude,rating,price_level,cuisine,address
Lumen Bistro,52.5200,13.4050,4.6,3,french,Unter den Linden 1
Nonna Rosa,52.5230,13.4120,4.2,2,Italian,
Harbor Grill,53.5511,9.9937,,,seafood,
";

    fn query(radius_km: f64, cuisine: Option<&str>) -> PlaceQuery {
        PlaceQuery {
            center: GeoPoint::new(52.5200, 13.4050),
            radius_km,
            cuisine: cuisine.map(str::to_string),
        }
    }

    #[test]
    fn parses_rows_with_optional_columns() {
        let places = parse_catalogue(Cursor::new(SAMPLE)).expect("catalogue parses");

        assert_eq!(places.len(), 3);
        assert_eq!(places[0].rating, Some(4.6));
        assert_eq!(places[0].address.as_deref(), Some("Unter den Linden 1"));
        assert_eq!(places[1].address, None);
        assert_eq!(places[2].rating, None);
        assert_eq!(places[2].price_level, None);
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let csv = "name,latitude,longitude,rating,price_level,cuisine,address\n\
                   Nowhere,95.0,10.0,,,,\n";

        match parse_catalogue(Cursor::new(csv)) {
            Err(CatalogueError::InvalidCoordinates { row, name }) => {
                assert_eq!(row, 2);
                assert_eq!(name, "Nowhere");
            }
            other => panic!("expected invalid coordinates, got {other:?}"),
        }
    }

    #[test]
    fn search_filters_by_radius_and_cuisine() {
        let search = CatalogueSearch::from_reader(Cursor::new(SAMPLE)).expect("catalogue");

        let nearby = search.search(&query(5.0, None)).expect("search");
        assert_eq!(nearby.len(), 2);

        let italian = search
            .search(&query(5.0, Some("italian")))
            .expect("search");
        assert_eq!(italian.len(), 1);
        assert_eq!(italian[0].name, "Nonna Rosa");

        let everywhere = search.search(&query(500.0, None)).expect("search");
        assert_eq!(everywhere.len(), 3);
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let error = CatalogueSearch::from_path("./does-not-exist.csv").expect_err("io error");
        assert!(matches!(error, CatalogueError::Io(_)));
    }
}
