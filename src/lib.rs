//! ipgeo Library
//!
//! This module exposes the ipgeo components for use in integration tests
//! and as a library.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;

// Re-export commonly used types
pub use adapters::outbound::{IpstackProvider, MemoryGeoCache, SqliteGeolocationStore};
pub use application::GeolocationResolver;
pub use config::load_config;
pub use domain::entities::Geolocation;
pub use domain::error::{ProviderError, ResolveError};
pub use domain::ports::{GeolocationCache, GeolocationStore, IpInfoProvider, ProviderPayload};
