//! Geolocation Resolver - Main application use case
//!
//! Orchestrates the cache-aside resolution pipeline: serve from cache,
//! fall back to the persistent store, or fetch from the external provider
//! and persist. This is the primary interface for inbound callers.

use crate::domain::entities::Geolocation;
use crate::domain::error::ResolveError;
use crate::domain::ports::{
    GeolocationCache, GeolocationStore, IpInfoProvider, PopulateFn, PopulateFuture,
};
use std::sync::Arc;

/// Geolocation resolver - main application use case.
///
/// For a given IP address the resolver:
/// 1. Consults the cache; a live entry short-circuits everything.
/// 2. On a miss, checks the persistent store; a persisted record is served
///    without an external call, even after a cache eviction.
/// 3. Only when both miss does it fetch from the external provider, and it
///    serves the fetched record only after a confirmed single-row insert.
///
/// The resolver performs no locking of its own: same-key concurrency is
/// delegated to the cache, and the store's key uniqueness backstops any
/// populate race. It also performs no input validation; `ip` is assumed to
/// be a syntactically valid address.
pub struct GeolocationResolver {
    cache: Arc<dyn GeolocationCache>,
    store: Arc<dyn GeolocationStore>,
    provider: Arc<dyn IpInfoProvider>,
}

impl GeolocationResolver {
    /// Create a new resolver.
    pub fn new(
        cache: Arc<dyn GeolocationCache>,
        store: Arc<dyn GeolocationStore>,
        provider: Arc<dyn IpInfoProvider>,
    ) -> Self {
        Self {
            cache,
            store,
            provider,
        }
    }

    /// Resolve geolocation data for an IP address.
    ///
    /// Returns `Ok(None)` when neither the store nor the provider has data
    /// for this IP, and when a fetched record could not be confirmed as
    /// persisted. Provider faults propagate as errors: the lookup did not
    /// complete and a retry may succeed.
    pub async fn resolve(&self, ip: &str) -> Result<Option<Geolocation>, ResolveError> {
        let store = Arc::clone(&self.store);
        let provider = Arc::clone(&self.provider);
        let key = ip.to_string();

        let populate: PopulateFn = Box::new(move || {
            Box::pin(Self::populate(store, provider, key)) as PopulateFuture
        });

        self.cache.get_or_populate(ip, populate).await
    }

    /// Population path invoked by the cache on a miss.
    ///
    /// Queries the store first; when the record is not persisted yet,
    /// requests it from the provider and saves it. Store faults resolve to
    /// absent: they are logged and the record is never served or cached.
    async fn populate(
        store: Arc<dyn GeolocationStore>,
        provider: Arc<dyn IpInfoProvider>,
        ip: String,
    ) -> Result<Option<Geolocation>, ResolveError> {
        // Retrieve: a persisted record short-circuits the external call
        match store.find(&ip).await {
            Ok(Some(record)) => {
                tracing::debug!("store hit for {}", ip);
                return Ok(Some(record));
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!("store lookup failed for {}: {:?}", ip, e);
                return Ok(None);
            }
        }

        // Request
        let payload = match provider.fetch(&ip).await? {
            Some(payload) => payload,
            None => {
                tracing::debug!("provider has no data for {}", ip);
                return Ok(None);
            }
        };

        let record = Geolocation::from_payload(&ip, payload);

        // Store: serve the fetched record only once it is confirmed durable
        match store.insert(&record).await {
            Ok(1) => Ok(Some(record)),
            Ok(rows) => {
                tracing::error!("insert for {} affected {} rows, discarding result", ip, rows);
                Ok(None)
            }
            Err(e) => {
                tracing::error!("insert failed for {}: {:?}", ip, e);
                Ok(None)
            }
        }
    }
}
