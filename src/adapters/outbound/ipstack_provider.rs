//! ipstack Provider
//!
//! Implements IpInfoProvider against an ipstack-shaped HTTP API:
//! `GET {base_url}/{ip}?access_key={key}` returning a flat JSON payload,
//! with errors reported through a `success: false` envelope.

use crate::domain::error::ProviderError;
use crate::domain::ports::{IpInfoProvider, ProviderPayload};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Error envelope the API attaches to rejected requests.
#[derive(Debug, Deserialize)]
struct ApiError {
    code: i64,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Raw response body: either an error envelope or a payload.
#[derive(Debug, Deserialize)]
struct RawResponse {
    success: Option<bool>,
    error: Option<ApiError>,
    #[serde(flatten)]
    payload: ProviderPayload,
}

/// HTTP client for the external geolocation provider.
pub struct IpstackProvider {
    client: reqwest::Client,
    base_url: String,
    access_key: String,
}

impl IpstackProvider {
    /// Create a provider client with a per-request timeout.
    pub fn new(
        base_url: impl Into<String>,
        access_key: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_key: access_key.into(),
        })
    }
}

#[async_trait]
impl IpInfoProvider for IpstackProvider {
    async fn fetch(&self, ip: &str) -> Result<Option<ProviderPayload>, ProviderError> {
        let url = format!("{}/{}", self.base_url, ip);

        let response = self
            .client
            .get(&url)
            .query(&[("access_key", self.access_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            // The provider's plain way of saying "no data for this IP"
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ProviderError::Status {
                code: status.as_u16(),
            });
        }

        let body: RawResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        if body.success == Some(false) {
            return match body.error {
                // 404 in the envelope is still a clean "not found"
                Some(error) if error.code == 404 => Ok(None),
                Some(error) => Err(ProviderError::Api {
                    code: error.code,
                    kind: error.kind.unwrap_or_else(|| "unknown_error".to_string()),
                }),
                None => Err(ProviderError::Decode(
                    "success=false without an error object".to_string(),
                )),
            };
        }

        let payload = body.payload;

        // An all-null payload is the provider's answer for unroutable or
        // unknown addresses
        if payload.country_code.is_none() && payload.latitude.is_none() && payload.longitude.is_none()
        {
            tracing::debug!("provider returned an empty payload for {}", ip);
            return Ok(None);
        }

        Ok(Some(payload))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> IpstackProvider {
        IpstackProvider::new(server.uri(), "test-key", Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mock_server = MockServer::start().await;

        let response_body = serde_json::json!({
            "ip": "8.8.8.8",
            "country_code": "US",
            "country_name": "United States",
            "region_code": "CA",
            "region_name": "California",
            "city": "Mountain View",
            "zip": "94043",
            "latitude": 37.386,
            "longitude": -122.0838
        });

        Mock::given(method("GET"))
            .and(path("/8.8.8.8"))
            .and(query_param("access_key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = provider_for(&mock_server);
        let payload = provider.fetch("8.8.8.8").await.unwrap().unwrap();

        assert_eq!(payload.country_code.as_deref(), Some("US"));
        assert_eq!(payload.city.as_deref(), Some("Mountain View"));
        assert_eq!(payload.latitude, Some(37.386));
    }

    #[tokio::test]
    async fn test_fetch_http_404_is_absent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/10.0.0.1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let provider = provider_for(&mock_server);
        let result = provider.fetch("10.0.0.1").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_a_fault() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/8.8.8.8"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&mock_server)
            .await;

        let provider = provider_for(&mock_server);
        let err = provider.fetch("8.8.8.8").await.unwrap_err();
        assert!(matches!(err, ProviderError::Status { code: 500 }));
    }

    #[tokio::test]
    async fn test_fetch_error_envelope_404_is_absent() {
        let mock_server = MockServer::start().await;

        let response_body = serde_json::json!({
            "success": false,
            "error": { "code": 404, "type": "404_not_found" }
        });

        Mock::given(method("GET"))
            .and(path("/10.0.0.1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&mock_server)
            .await;

        let provider = provider_for(&mock_server);
        let result = provider.fetch("10.0.0.1").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_fetch_error_envelope_is_a_fault() {
        let mock_server = MockServer::start().await;

        let response_body = serde_json::json!({
            "success": false,
            "error": { "code": 101, "type": "invalid_access_key" }
        });

        Mock::given(method("GET"))
            .and(path("/8.8.8.8"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&mock_server)
            .await;

        let provider = provider_for(&mock_server);
        let err = provider.fetch("8.8.8.8").await.unwrap_err();
        match err {
            ProviderError::Api { code, kind } => {
                assert_eq!(code, 101);
                assert_eq!(kind, "invalid_access_key");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_empty_payload_is_absent() {
        let mock_server = MockServer::start().await;

        // ipstack answers unroutable addresses with an all-null body
        let response_body = serde_json::json!({
            "ip": "127.0.0.1",
            "country_code": null,
            "country_name": null,
            "latitude": null,
            "longitude": null
        });

        Mock::given(method("GET"))
            .and(path("/127.0.0.1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&mock_server)
            .await;

        let provider = provider_for(&mock_server);
        let result = provider.fetch("127.0.0.1").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_fetch_malformed_body_is_a_fault() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/8.8.8.8"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let provider = provider_for(&mock_server);
        let err = provider.fetch("8.8.8.8").await.unwrap_err();
        assert!(matches!(err, ProviderError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_a_transport_fault() {
        // Port 1 on localhost is not listening
        let provider =
            IpstackProvider::new("http://127.0.0.1:1", "test-key", Duration::from_millis(500))
                .unwrap();

        let err = provider.fetch("8.8.8.8").await.unwrap_err();
        assert!(matches!(err, ProviderError::Transport(_)));
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash_is_normalized() {
        let mock_server = MockServer::start().await;

        let response_body = serde_json::json!({
            "ip": "8.8.8.8",
            "country_code": "US",
            "latitude": 37.386,
            "longitude": -122.0838
        });

        Mock::given(method("GET"))
            .and(path("/8.8.8.8"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&mock_server)
            .await;

        let provider = IpstackProvider::new(
            format!("{}/", mock_server.uri()),
            "test-key",
            Duration::from_secs(2),
        )
        .unwrap();

        let result = provider.fetch("8.8.8.8").await.unwrap();
        assert!(result.is_some());
    }
}
