//! Geolocation Cache Port
//!
//! Defines the get-or-populate contract the resolver builds on.

use crate::domain::entities::Geolocation;
use crate::domain::error::ResolveError;
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;

/// Future returned by a population callback.
pub type PopulateFuture =
    Pin<Box<dyn Future<Output = Result<Option<Geolocation>, ResolveError>> + Send>>;

/// Population callback supplied by the resolver on a cache miss.
pub type PopulateFn = Box<dyn FnOnce() -> PopulateFuture + Send>;

/// Cache providing get-or-populate semantics keyed by IP address.
///
/// Contract:
/// - A live entry for `key` is returned without invoking `populate`.
/// - On a miss, `populate` runs once per logical miss-resolution attempt;
///   an `Ok(Some(v))` result is stored under `key` (subject to the
///   implementation's TTL/capacity policy) and returned.
/// - `Ok(None)` is returned as-is and never stored: no negative caching.
/// - `Err` is propagated and never stored.
///
/// Eviction policy is the implementation's concern; the hit path must not
/// block on I/O. Implementations should collapse concurrent misses for the
/// same key into a single populate call.
#[async_trait]
pub trait GeolocationCache: Send + Sync {
    async fn get_or_populate(
        &self,
        key: &str,
        populate: PopulateFn,
    ) -> Result<Option<Geolocation>, ResolveError>;
}
