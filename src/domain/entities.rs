//! Domain Entities - Core business objects
//!
//! These entities represent the core concepts of the ipgeo domain.

use crate::domain::ports::ProviderPayload;
use serde::{Deserialize, Serialize};

/// Resolved geolocation information for one IP address.
///
/// The IP address is the identity of the record: it is the cache key and
/// the primary key in the persistent store. All other fields are
/// provider-defined and opaque to the resolution pipeline. Records are
/// never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geolocation {
    /// IP address this record describes (unique identifier)
    pub ip: String,
    /// Country code (ISO 3166-1 alpha-2: BR, US, FR, etc)
    pub country_code: Option<String>,
    /// Country name
    pub country_name: Option<String>,
    /// Region/state code
    pub region_code: Option<String>,
    /// Region/state name
    pub region_name: Option<String>,
    /// City name
    pub city: Option<String>,
    /// Postal code
    pub zip: Option<String>,
    /// Latitude
    pub latitude: Option<f64>,
    /// Longitude
    pub longitude: Option<f64>,
}

impl Geolocation {
    /// Build a record from a provider payload.
    ///
    /// The key comes from the lookup, not from the payload: providers echo
    /// the requested IP back, but the store must be keyed by what was asked.
    pub fn from_payload(ip: impl Into<String>, payload: ProviderPayload) -> Self {
        Self {
            ip: ip.into(),
            country_code: payload.country_code,
            country_name: payload.country_name,
            region_code: payload.region_code,
            region_name: payload.region_name,
            city: payload.city,
            zip: payload.zip,
            latitude: payload.latitude,
            longitude: payload.longitude,
        }
    }
}
