//! ipgeo - IP Geolocation Resolution Service
//!
//! This is the composition root that wires together all the components.

mod adapters;
mod application;
mod config;
mod domain;

use crate::adapters::outbound::{IpstackProvider, MemoryGeoCache, SqliteGeolocationStore};
use crate::application::GeolocationResolver;
use crate::config::load_config;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt().with_max_level(log_level).init();

    let ips: Vec<String> = std::env::args().skip(1).collect();
    if ips.is_empty() {
        anyhow::bail!("usage: ipgeo <ip> [ip ...]");
    }

    tracing::info!(
        "starting ipgeo db={} provider={}",
        cfg.db_path,
        cfg.provider_base_url
    );
    tracing::debug!(
        "batch worker settings: interval={}s job_batch={} item_batch={}",
        cfg.worker_interval_secs,
        cfg.worker_job_batch_size,
        cfg.worker_job_item_batch_size
    );

    // ===== COMPOSITION ROOT =====

    // 1. Create outbound adapters

    // Persistent store (SQLite)
    let store = Arc::new(SqliteGeolocationStore::open(&cfg.db_path)?);

    // External provider (ipstack)
    let provider = Arc::new(IpstackProvider::new(
        &cfg.provider_base_url,
        &cfg.provider_access_key,
        Duration::from_secs(cfg.provider_timeout_secs),
    )?);

    // In-memory cache
    let cache = Arc::new(MemoryGeoCache::new(
        Duration::from_secs(cfg.cache_ttl_secs),
        cfg.cache_capacity,
    ));
    cache.start_gc(Duration::from_secs(cfg.cache_gc_interval_secs));

    // 2. Create the resolver
    let resolver = GeolocationResolver::new(cache, store, provider);

    // 3. Resolve the requested addresses
    let mut failures = 0usize;
    for ip in &ips {
        match resolver.resolve(ip).await {
            Ok(Some(geo)) => println!("{}", serde_json::to_string_pretty(&geo)?),
            Ok(None) => {
                println!("{}", serde_json::json!({ "ip": ip, "found": false }));
            }
            Err(e) => {
                tracing::error!("resolve failed for {}: {:?}", ip, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} lookups failed", failures, ips.len());
    }
    Ok(())
}
