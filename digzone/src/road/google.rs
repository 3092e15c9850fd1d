//! Google Roads snap-to-road client.
//!
//! Uses the Roads API `snapToRoads` endpoint with a single-point path:
//!
//! `{base}/v1/snapToRoads?path={lat},{lng}&interpolate=false&key={API_KEY}`
//!
//! The response lists snapped points; an empty object means no road was
//! found near the input.

use serde::Deserialize;
use tracing::{trace, warn};

use super::{AsyncHttpClient, RoadSnapClient, RoadSnapError};
use crate::geo::GeoPoint;

/// Production Roads API host.
pub const DEFAULT_ROADS_BASE_URL: &str = "https://roads.googleapis.com";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapResponse {
    #[serde(default)]
    snapped_points: Vec<SnappedPoint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
struct SnappedPoint {
    location: LatLng,
    #[serde(default)]
    original_index: Option<u32>,
    #[serde(default)]
    place_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    latitude: f64,
    longitude: f64,
}

/// Road snapper backed by the Google Roads API.
///
/// Requires an API key with the Roads API enabled.
pub struct GoogleRoadsClient<C: AsyncHttpClient> {
    http_client: C,
    api_key: String,
    base_url: String,
}

impl<C: AsyncHttpClient> GoogleRoadsClient<C> {
    /// Creates a client against the production endpoint.
    pub fn new(http_client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(http_client, api_key, DEFAULT_ROADS_BASE_URL)
    }

    /// Creates a client against a custom host (proxies, test servers).
    pub fn with_base_url(
        http_client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            http_client,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn build_url(&self, point: &GeoPoint) -> String {
        format!(
            "{}/v1/snapToRoads?path={},{}&interpolate=false&key={}",
            self.base_url, point.lat, point.lng, self.api_key
        )
    }

    fn parse_response(body: &[u8]) -> Result<Option<GeoPoint>, RoadSnapError> {
        let response: SnapResponse = serde_json::from_slice(body)
            .map_err(|e| RoadSnapError::InvalidResponse(format!("Malformed JSON: {}", e)))?;

        Ok(response
            .snapped_points
            .first()
            .map(|p| GeoPoint::new(p.location.latitude, p.location.longitude)))
    }
}

impl<C: AsyncHttpClient> RoadSnapClient for GoogleRoadsClient<C> {
    async fn snap_to_road(&self, point: GeoPoint) -> Result<Option<GeoPoint>, RoadSnapError> {
        let url = self.build_url(&point);
        let body = self.http_client.get(&url).await?;

        match Self::parse_response(&body) {
            Ok(snapped) => {
                trace!(
                    lat = point.lat,
                    lng = point.lng,
                    snapped = snapped.is_some(),
                    "Road snap response"
                );
                Ok(snapped)
            }
            Err(e) => {
                warn!(error = %e, "Unreadable road snap response");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::road::MockAsyncHttpClient;

    const SNAPPED: &str = r#"{
        "snappedPoints": [
            {
                "location": {"latitude": -35.2784167, "longitude": 149.1294692},
                "originalIndex": 0,
                "placeId": "ChIJoR7CemhNFmsRQB9QbW7qABM"
            }
        ]
    }"#;

    #[test]
    fn test_url_construction() {
        let client = GoogleRoadsClient::new(MockAsyncHttpClient::json("{}"), "test_key");
        let url = client.build_url(&GeoPoint::new(-35.27801, 149.12958));

        assert_eq!(
            url,
            "https://roads.googleapis.com/v1/snapToRoads?path=-35.27801,149.12958&interpolate=false&key=test_key"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = GoogleRoadsClient::with_base_url(
            MockAsyncHttpClient::json("{}"),
            "k",
            "http://localhost:8080/",
        );
        let url = client.build_url(&GeoPoint::new(1.0, 2.0));
        assert!(url.starts_with("http://localhost:8080/v1/snapToRoads?"));
    }

    #[tokio::test]
    async fn test_snap_returns_first_point() {
        let mock = MockAsyncHttpClient::json(SNAPPED);
        let client = GoogleRoadsClient::new(mock.clone(), "secret_key_123");

        let snapped = client
            .snap_to_road(GeoPoint::new(-35.27801, 149.12958))
            .await
            .unwrap();

        assert_eq!(snapped, Some(GeoPoint::new(-35.2784167, 149.1294692)));
        assert!(mock.last_url().unwrap().contains("key=secret_key_123"));
    }

    #[tokio::test]
    async fn test_empty_object_means_no_snap() {
        let client = GoogleRoadsClient::new(MockAsyncHttpClient::json("{}"), "k");
        let snapped = client.snap_to_road(GeoPoint::new(0.0, 0.0)).await.unwrap();
        assert_eq!(snapped, None);
    }

    #[tokio::test]
    async fn test_empty_list_means_no_snap() {
        let client =
            GoogleRoadsClient::new(MockAsyncHttpClient::json(r#"{"snappedPoints":[]}"#), "k");
        let snapped = client.snap_to_road(GeoPoint::new(0.0, 0.0)).await.unwrap();
        assert_eq!(snapped, None);
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let client = GoogleRoadsClient::new(MockAsyncHttpClient::json("<html>"), "k");
        let result = client.snap_to_road(GeoPoint::new(0.0, 0.0)).await;
        assert!(matches!(result, Err(RoadSnapError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_http_error_propagates() {
        let mock = MockAsyncHttpClient::new(Err(RoadSnapError::Http("HTTP 403".to_string())));
        let client = GoogleRoadsClient::new(mock, "bad_key");

        let result = client.snap_to_road(GeoPoint::new(0.0, 0.0)).await;
        assert_eq!(result, Err(RoadSnapError::Http("HTTP 403".to_string())));
    }
}
