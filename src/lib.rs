//! Basera Geo - geospatial discovery and routing engine for the Basera property search app
//!
//! This library computes proximity between a user and listed properties,
//! resolves free-text addresses under typing pressure, fetches driving
//! routes, and arbitrates which focus request the map should honor at any
//! instant. A rendering surface consumes its output; tiles and markers are
//! drawn elsewhere.

pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use core::{distance::distance_km, Focus, MapCommand, ViewCoordinator};
pub use models::{BoundingBox, FilterCriteria, GeoPoint, Property, RouteResult};
pub use services::{GeocodeResolver, Outcome, RouteEngine};
