//! IP Info Provider Port
//!
//! Defines the interface for the third-party geolocation data source.

use crate::domain::error::ProviderError;
use async_trait::async_trait;
use serde::Deserialize;

/// Provider-shaped geolocation payload (ipstack field names).
///
/// This is the wire shape of a provider answer. It is converted into a
/// domain record exclusively through `Geolocation::from_payload`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProviderPayload {
    /// IP address as echoed back by the provider
    pub ip: Option<String>,
    pub country_code: Option<String>,
    pub country_name: Option<String>,
    pub region_code: Option<String>,
    pub region_name: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Single-IP lookup against the external provider.
///
/// `Ok(None)` strictly means the provider answered cleanly and has no data
/// for this IP. Transport failures, timeouts, non-success statuses and
/// undecodable bodies are `Err(ProviderError)`; they must never be coerced
/// to absent, since the lookup did not run to completion.
#[async_trait]
pub trait IpInfoProvider: Send + Sync {
    async fn fetch(&self, ip: &str) -> Result<Option<ProviderPayload>, ProviderError>;
}
