mod geolocation_cache;
mod geolocation_store;
mod ip_info_provider;

pub use geolocation_cache::{GeolocationCache, PopulateFn, PopulateFuture};
pub use geolocation_store::GeolocationStore;
pub use ip_info_provider::{IpInfoProvider, ProviderPayload};
