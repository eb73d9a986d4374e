mod ipstack_provider;
mod memory_geo_cache;
mod sqlite_geolocation_store;

pub use ipstack_provider::IpstackProvider;
pub use memory_geo_cache::MemoryGeoCache;
pub use sqlite_geolocation_store::SqliteGeolocationStore;
