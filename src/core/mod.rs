// Core engine exports
pub mod coordinator;
pub mod distance;
pub mod filters;

pub use coordinator::{CoordinatorConfig, Focus, MapCommand, ViewCoordinator};
pub use distance::distance_km;
pub use filters::{apply, distance_to, matches_category, matches_search, matches_thresholds, within_radius};
