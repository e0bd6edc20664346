// Model exports
pub mod domain;

pub use domain::{
    BoundingBox, FilterCriteria, GeoError, GeoPoint, HomeType, ListingKind, PriceRange, Property,
    RouteResult, COORD_EPSILON,
};
