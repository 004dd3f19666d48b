//! File persistence and serialization configuration

/// Configuration for API response caching on disk
pub struct ResponseCacheConfig {
    /// Directory path for storing cached responses
    pub directory: &'static str,
    /// Base filename for cache files (without extension)
    pub filename_base: &'static str,
    /// Current version of the cache serialization format
    pub version: f64,
    /// Cached responses older than this are ignored
    pub max_age_secs: i64,
}

/// Configuration for Application State Persistence
pub struct AppPersistenceConfig {
    /// Path for saving/loading application UI state
    pub state_path: &'static str,
}

/// The Master Persistence Configuration
pub struct PersistenceConfig {
    pub cache: ResponseCacheConfig,
    pub app: AppPersistenceConfig,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    cache: ResponseCacheConfig {
        directory: "cm_cache",
        filename_base: "cm",
        version: 1.0,
        max_age_secs: 12 * 60 * 60,
    },
    app: AppPersistenceConfig {
        state_path: ".states.json",
    },
};

/// Cache filename for one response key.
/// Example: "cm_series-btc-PriceUSD_v1.bin"
pub fn response_cache_filename(key: &str) -> String {
    let safe_key: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();

    format!(
        "{}_{}_v{}.bin",
        PERSISTENCE.cache.filename_base, safe_key, PERSISTENCE.cache.version
    )
}
