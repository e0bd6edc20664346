use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coordinate comparison tolerance in degrees (~0.1 m at the equator).
///
/// Used to detect redundant route and recenter requests.
pub const COORD_EPSILON: f64 = 1e-6;

/// Errors for coordinate contract violations
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoError {
    #[error("invalid coordinate: lat {lat} lng {lng} outside [-90,90]x[-180,180]")]
    InvalidCoordinate { lat: f64, lng: f64 },
}

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Create a validated point
    pub fn new(lat: f64, lng: f64) -> Result<Self, GeoError> {
        let point = Self { lat, lng };
        point.validate()?;
        Ok(point)
    }

    /// Check the coordinate ranges
    pub fn validate(&self) -> Result<(), GeoError> {
        if !(-90.0..=90.0).contains(&self.lat) || !(-180.0..=180.0).contains(&self.lng) {
            return Err(GeoError::InvalidCoordinate {
                lat: self.lat,
                lng: self.lng,
            });
        }
        Ok(())
    }

    /// True if both coordinates match within [`COORD_EPSILON`]
    #[inline]
    pub fn approx_eq(&self, other: &GeoPoint) -> bool {
        (self.lat - other.lat).abs() < COORD_EPSILON && (self.lng - other.lng).abs() < COORD_EPSILON
    }
}

/// Property category as listed in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HomeType {
    House,
    Apartment,
    Villa,
}

/// Whether a listing is for sale or for rent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingKind {
    Sale,
    Rental,
}

/// A catalog listing. Owned by the external catalog; read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: u64,
    pub address: String,
    pub price: f64,
    pub beds: u32,
    pub baths: f64,
    #[serde(rename = "homeType")]
    pub home_type: HomeType,
    #[serde(rename = "parkingSpaces")]
    pub parking_spaces: u32,
    #[serde(rename = "listingKind")]
    pub listing_kind: ListingKind,
    pub location: GeoPoint,
}

/// Inclusive price bracket; `max = None` models an open "above X" bracket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn between(min: f64, max: f64) -> Self {
        Self { min, max: Some(max) }
    }

    pub fn above(min: f64) -> Self {
        Self { min, max: None }
    }

    #[inline]
    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && self.max.map_or(true, |max| price <= max)
    }
}

/// User-selected filter controls. Constructed by the external filter UI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(rename = "searchText", default)]
    pub search_text: String,
    #[serde(rename = "minBeds", default)]
    pub min_beds: Option<u32>,
    #[serde(rename = "minBaths", default)]
    pub min_baths: Option<u32>,
    #[serde(rename = "minParking", default)]
    pub min_parking: Option<u32>,
    #[serde(rename = "homeType", default)]
    pub home_type: Option<HomeType>,
    #[serde(rename = "priceRange", default)]
    pub price_range: Option<PriceRange>,
    #[serde(rename = "radiusKm", default)]
    pub radius_km: Option<f64>,
}

/// Axis-aligned geographic rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Minimal box covering every point, or `None` for an empty slice
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        let first = points.first()?;
        let mut bbox = Self {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lng: first.lng,
            max_lng: first.lng,
        };
        for p in &points[1..] {
            bbox.min_lat = bbox.min_lat.min(p.lat);
            bbox.max_lat = bbox.max_lat.max(p.lat);
            bbox.min_lng = bbox.min_lng.min(p.lng);
            bbox.max_lng = bbox.max_lng.max(p.lng);
        }
        Some(bbox)
    }

    pub fn southwest(&self) -> GeoPoint {
        GeoPoint {
            lat: self.min_lat,
            lng: self.min_lng,
        }
    }

    pub fn northeast(&self) -> GeoPoint {
        GeoPoint {
            lat: self.max_lat,
            lng: self.max_lng,
        }
    }

    /// Expand each side by `fraction` of the box's span.
    ///
    /// Visual margin for viewport fitting; not stored in [`RouteResult`].
    pub fn padded(&self, fraction: f64) -> Self {
        let lat_pad = (self.max_lat - self.min_lat) * fraction;
        let lng_pad = (self.max_lng - self.min_lng) * fraction;
        Self {
            min_lat: self.min_lat - lat_pad,
            max_lat: self.max_lat + lat_pad,
            min_lng: self.min_lng - lng_pad,
            max_lng: self.max_lng + lng_pad,
        }
    }
}

/// A computed driving route. Superseded by the next request, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub points: Vec<GeoPoint>,
    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
    #[serde(rename = "durationMin")]
    pub duration_min: u32,
    pub bounds: BoundingBox,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geopoint_validation() {
        assert!(GeoPoint::new(12.9716, 77.5946).is_ok());
        assert!(GeoPoint::new(-90.0, 180.0).is_ok());

        assert_eq!(
            GeoPoint::new(91.0, 0.0),
            Err(GeoError::InvalidCoordinate { lat: 91.0, lng: 0.0 })
        );
        assert!(GeoPoint::new(0.0, -180.5).is_err());
    }

    #[test]
    fn test_geopoint_approx_eq() {
        let a = GeoPoint { lat: 12.9716, lng: 77.5946 };
        let nudged = GeoPoint {
            lat: a.lat + COORD_EPSILON / 10.0,
            lng: a.lng,
        };
        let moved = GeoPoint { lat: 12.98, lng: 77.5946 };

        assert!(a.approx_eq(&nudged));
        assert!(!a.approx_eq(&moved));
    }

    #[test]
    fn test_price_range_inclusive() {
        let range = PriceRange::between(5_000_000.0, 10_000_000.0);
        assert!(range.contains(5_000_000.0));
        assert!(range.contains(10_000_000.0));
        assert!(!range.contains(10_000_001.0));

        let open = PriceRange::above(10_000_000.0);
        assert!(open.contains(15_000_000.0));
        assert!(!open.contains(9_999_999.0));
    }

    #[test]
    fn test_bounding_box_covers_polyline() {
        let points = vec![
            GeoPoint { lat: 12.97, lng: 77.59 },
            GeoPoint { lat: 13.05, lng: 77.40 },
            GeoPoint { lat: 12.80, lng: 77.70 },
        ];

        let bbox = BoundingBox::from_points(&points).unwrap();
        assert_eq!(bbox.min_lat, 12.80);
        assert_eq!(bbox.max_lat, 13.05);
        assert_eq!(bbox.min_lng, 77.40);
        assert_eq!(bbox.max_lng, 77.70);

        assert!(BoundingBox::from_points(&[]).is_none());
    }

    #[test]
    fn test_bounding_box_padding() {
        let bbox = BoundingBox {
            min_lat: 10.0,
            max_lat: 11.0,
            min_lng: 70.0,
            max_lng: 72.0,
        };

        let padded = bbox.padded(0.1);
        assert!((padded.min_lat - 9.9).abs() < 1e-9);
        assert!((padded.max_lat - 11.1).abs() < 1e-9);
        assert!((padded.min_lng - 69.8).abs() < 1e-9);
        assert!((padded.max_lng - 72.2).abs() < 1e-9);
    }

    #[test]
    fn test_property_json_shape() {
        let json = r#"{
            "id": 1,
            "address": "123 MG Road, Bengaluru, Karnataka",
            "price": 6500000,
            "beds": 3,
            "baths": 2,
            "homeType": "House",
            "parkingSpaces": 1,
            "listingKind": "Sale",
            "location": { "lat": 12.9716, "lng": 77.5946 }
        }"#;

        let property: Property = serde_json::from_str(json).unwrap();
        assert_eq!(property.home_type, HomeType::House);
        assert_eq!(property.parking_spaces, 1);
        assert!(property.location.approx_eq(&GeoPoint { lat: 12.9716, lng: 77.5946 }));
    }
}
