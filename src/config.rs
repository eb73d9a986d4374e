use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // Persistent store settings
    pub db_path: String,

    // Cache settings
    pub cache_ttl_secs: u64,
    pub cache_capacity: usize,
    pub cache_gc_interval_secs: u64,

    // External provider settings
    pub provider_base_url: String,
    pub provider_access_key: String,
    pub provider_timeout_secs: u64,

    // Batch update worker settings (consumed by the out-of-process worker)
    pub worker_interval_secs: u64,
    pub worker_job_batch_size: usize,
    pub worker_job_item_batch_size: usize,

    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: "geolocation.db".to_string(),
            cache_ttl_secs: 600,
            cache_capacity: 10_000,
            cache_gc_interval_secs: 60,
            provider_base_url: "http://api.ipstack.com".to_string(),
            provider_access_key: String::new(),
            provider_timeout_secs: 10,
            worker_interval_secs: 3600,
            worker_job_batch_size: 100,
            worker_job_item_batch_size: 10,
            debug: false,
        }
    }
}

pub fn load_config() -> anyhow::Result<Config> {
    let db_path = std::env::var("IPGEO_DB_PATH")
        .unwrap_or_else(|_| "geolocation.db".to_string());

    let cache_ttl_secs = std::env::var("IPGEO_CACHE_TTL_SECS")
        .unwrap_or_else(|_| "600".to_string())
        .parse()
        .unwrap_or(600);

    let cache_capacity = std::env::var("IPGEO_CACHE_CAPACITY")
        .unwrap_or_else(|_| "10000".to_string())
        .parse()
        .unwrap_or(10_000);

    let cache_gc_interval_secs = std::env::var("IPGEO_CACHE_GC_INTERVAL_SECS")
        .unwrap_or_else(|_| "60".to_string())
        .parse()
        .unwrap_or(60);

    let provider_base_url = std::env::var("IPGEO_PROVIDER_BASE_URL")
        .unwrap_or_else(|_| "http://api.ipstack.com".to_string());

    let provider_access_key = std::env::var("IPGEO_PROVIDER_ACCESS_KEY").unwrap_or_default();

    let provider_timeout_secs = std::env::var("IPGEO_PROVIDER_TIMEOUT_SECS")
        .unwrap_or_else(|_| "10".to_string())
        .parse()
        .unwrap_or(10);

    let worker_interval_secs = std::env::var("IPGEO_WORKER_INTERVAL_SECS")
        .unwrap_or_else(|_| "3600".to_string())
        .parse()
        .unwrap_or(3600);

    let worker_job_batch_size = std::env::var("IPGEO_WORKER_JOB_BATCH_SIZE")
        .unwrap_or_else(|_| "100".to_string())
        .parse()
        .unwrap_or(100);

    let worker_job_item_batch_size = std::env::var("IPGEO_WORKER_JOB_ITEM_BATCH_SIZE")
        .unwrap_or_else(|_| "10".to_string())
        .parse()
        .unwrap_or(10);

    let debug = std::env::var("DEBUG").is_ok();

    Ok(Config {
        db_path,
        cache_ttl_secs,
        cache_capacity,
        cache_gc_interval_secs,
        provider_base_url,
        provider_access_key,
        provider_timeout_secs,
        worker_interval_secs,
        worker_job_batch_size,
        worker_job_item_batch_size,
        debug,
    })
}
