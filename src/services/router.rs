use crate::models::{BoundingBox, GeoError, GeoPoint, RouteResult};
use crate::services::Outcome;
use reqwest::Client;
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors that can occur when computing a route
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("no drivable route: {0}")]
    Unavailable(String),

    #[error("invalid response format: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    InvalidCoordinate(#[from] GeoError),
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
    /// Meters
    distance: f64,
    /// Seconds
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    /// GeoJSON order: [lng, lat]
    coordinates: Vec<[f64; 2]>,
}

struct CachedRoute {
    start: GeoPoint,
    end: GeoPoint,
    result: RouteResult,
}

/// Driving-route client against an OSRM-style service
///
/// Repeating the active endpoints (within epsilon) returns the cached result
/// without a network call. Calls with new endpoints are generation-stamped:
/// only the most recent call's response (or failure) is allowed out, the
/// rest are discarded. A failed request never clears the previously
/// computed route.
pub struct RouteEngine {
    base_url: String,
    client: Client,
    generation: AtomicU64,
    last_route: Mutex<Option<CachedRoute>>,
}

impl RouteEngine {
    /// Create an engine against an OSRM-style routing endpoint
    pub fn new(base_url: String, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            client,
            generation: AtomicU64::new(0),
            last_route: Mutex::new(None),
        }
    }

    /// Compute a driving route between two points
    pub async fn compute_route(
        &self,
        start: GeoPoint,
        end: GeoPoint,
    ) -> Result<Outcome<RouteResult>, RouteError> {
        start.validate()?;
        end.validate()?;

        if let Some(cached) = self.cached(start, end).await {
            tracing::debug!("route cache hit, skipping network call");
            return Ok(Outcome::Resolved(cached));
        }

        let request_id = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let url = format!(
            "{}/route/v1/driving/{},{};{},{}?overview=full&geometries=geojson",
            self.base_url.trim_end_matches('/'),
            start.lng,
            start.lat,
            end.lng,
            end.lat
        );

        tracing::debug!("routing query: {}", url);

        let fetched = self.fetch(&url).await;

        // A newer request supersedes this one; neither its result nor its
        // failure may escape
        if self.generation.load(Ordering::SeqCst) != request_id {
            tracing::debug!(request_id, "stale route response discarded");
            return Ok(Outcome::Discarded);
        }

        let body = fetched?;

        if body.code != "Ok" {
            return Err(RouteError::Unavailable(body.code));
        }

        let route = body
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| RouteError::Unavailable("empty route list".to_string()))?;

        let points: Vec<GeoPoint> = route
            .geometry
            .coordinates
            .iter()
            .map(|&[lng, lat]| GeoPoint { lat, lng })
            .collect();

        if points.len() < 2 {
            return Err(RouteError::InvalidResponse(
                "polyline has fewer than two points".to_string(),
            ));
        }

        let bounds = BoundingBox::from_points(&points)
            .ok_or_else(|| RouteError::InvalidResponse("empty polyline".to_string()))?;

        let result = RouteResult {
            distance_km: (route.distance / 1000.0 * 10.0).round() / 10.0,
            duration_min: (route.duration / 60.0).round() as u32,
            bounds,
            points,
        };

        let mut last = self.last_route.lock().await;
        *last = Some(CachedRoute {
            start,
            end,
            result: result.clone(),
        });

        tracing::debug!(
            request_id,
            distance_km = result.distance_km,
            duration_min = result.duration_min,
            "route computed"
        );

        Ok(Outcome::Resolved(result))
    }

    /// The most recently computed route, if any
    pub async fn last_route(&self) -> Option<RouteResult> {
        let last = self.last_route.lock().await;
        last.as_ref().map(|cached| cached.result.clone())
    }

    async fn fetch(&self, url: &str) -> Result<OsrmResponse, RouteError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(RouteError::Unavailable(format!(
                "routing request failed: {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    async fn cached(&self, start: GeoPoint, end: GeoPoint) -> Option<RouteResult> {
        let last = self.last_route.lock().await;
        last.as_ref()
            .filter(|cached| cached.start.approx_eq(&start) && cached.end.approx_eq(&end))
            .map(|cached| cached.result.clone())
    }
}
