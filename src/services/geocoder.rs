use crate::models::GeoPoint;
use crate::services::Outcome;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when resolving an address
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("geocoding service returned error: {0}")]
    ServiceError(String),

    #[error("no match for the given address")]
    NotFound,

    #[error("invalid response format: {0}")]
    InvalidResponse(String),
}

/// One entry of the geocoding service's ordered candidate list
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeCandidate {
    #[serde(deserialize_with = "coord_from_string_or_number")]
    pub lat: f64,
    #[serde(deserialize_with = "coord_from_string_or_number")]
    pub lon: f64,
    #[serde(rename = "display_name", default)]
    pub display_name: String,
}

// The service serializes coordinates as strings, but numbers appear too
fn coord_from_string_or_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
    }
}

/// Debounced free-text address resolver
///
/// Every call takes a strictly increasing generation id. After the quiet
/// window, and again after the network response, the id is compared with the
/// latest issued; a superseded call yields [`Outcome::Discarded`] silently,
/// even when its service call failed, so an out-of-order network completion
/// can never publish a stale coordinate or surface a stale error.
pub struct GeocodeResolver {
    base_url: String,
    client: Client,
    debounce: Duration,
    generation: AtomicU64,
}

impl GeocodeResolver {
    /// Create a resolver against a Nominatim-style search endpoint
    pub fn new(base_url: String, debounce_ms: u64, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            client,
            debounce: Duration::from_millis(debounce_ms),
            generation: AtomicU64::new(0),
        }
    }

    /// Resolve free-text input to a coordinate.
    ///
    /// Whitespace-only input short-circuits with no network call. Of several
    /// calls racing within the debounce window, only the latest reaches the
    /// network; all others come back [`Outcome::Discarded`].
    pub async fn resolve(&self, text: &str) -> Result<Outcome<GeoPoint>, GeocodeError> {
        let query = text.trim();
        if query.is_empty() {
            return Ok(Outcome::Discarded);
        }

        let request_id = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        // Quiet window: a newer keystroke during the sleep supersedes us
        tokio::time::sleep(self.debounce).await;
        if self.generation.load(Ordering::SeqCst) != request_id {
            tracing::trace!(request_id, "geocode superseded before dispatch");
            return Ok(Outcome::Discarded);
        }

        let fetched = self.search(query).await;

        // The response, or its failure, may arrive after a newer request
        // was issued; nothing from a superseded call may escape
        if self.generation.load(Ordering::SeqCst) != request_id {
            tracing::debug!(request_id, "stale geocode response discarded");
            return Ok(Outcome::Discarded);
        }

        let candidates = fetched?;
        let first = candidates.into_iter().next().ok_or(GeocodeError::NotFound)?;
        let point = GeoPoint::new(first.lat, first.lon)
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

        tracing::debug!(request_id, lat = point.lat, lng = point.lng, "geocode resolved");
        Ok(Outcome::Resolved(point))
    }

    /// Fetch the full candidate list for user disambiguation.
    ///
    /// Undebounced and unstamped; automatic resolution goes through
    /// [`resolve`](Self::resolve).
    pub async fn search(&self, text: &str) -> Result<Vec<GeocodeCandidate>, GeocodeError> {
        let url = format!(
            "{}/search?format=json&q={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(text)
        );

        tracing::debug!("geocoding query: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(GeocodeError::ServiceError(format!(
                "geocoding request failed: {}",
                response.status()
            )));
        }

        let candidates: Vec<GeocodeCandidate> = response.json().await?;
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_accepts_string_and_number_coordinates() {
        let as_strings = r#"{"lat": "12.9716", "lon": "77.5946", "display_name": "Bengaluru"}"#;
        let candidate: GeocodeCandidate = serde_json::from_str(as_strings).unwrap();
        assert!((candidate.lat - 12.9716).abs() < 1e-9);
        assert_eq!(candidate.display_name, "Bengaluru");

        let as_numbers = r#"{"lat": 19.2288, "lon": 72.8372}"#;
        let candidate: GeocodeCandidate = serde_json::from_str(as_numbers).unwrap();
        assert!((candidate.lon - 72.8372).abs() < 1e-9);
        assert_eq!(candidate.display_name, "");
    }

    #[test]
    fn test_candidate_rejects_unparsable_coordinate() {
        let bad = r#"{"lat": "not-a-number", "lon": "77.5946"}"#;
        assert!(serde_json::from_str::<GeocodeCandidate>(bad).is_err());
    }

    #[tokio::test]
    async fn test_blank_input_short_circuits() {
        // Unroutable base URL: a network call here would fail the test
        let resolver = GeocodeResolver::new("http://127.0.0.1:1".to_string(), 1, 1);

        let outcome = resolver.resolve("   ").await.unwrap();
        assert!(outcome.is_discarded());

        let outcome = resolver.resolve("").await.unwrap();
        assert!(outcome.is_discarded());
    }
}
