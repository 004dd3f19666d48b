//! Debugging feature flags.

#[allow(dead_code)]
pub struct LogFlags {
    /// Log every REST call (url + params) before it is sent.
    pub log_requests: bool,

    /// Disk cache hits, misses and writes.
    pub log_cache: bool,

    /// Rate limiter saturation waits.
    pub log_rate_limit: bool,

    /// Anything about handling the asset / metric selection
    pub log_selection: bool,

    /// Series worker queueing and completion.
    pub log_worker: bool,

    /// Activate slow-frame warnings
    pub log_performance: bool,
}

pub const DF: LogFlags = LogFlags {
    log_requests: false,
    log_cache: true,
    log_rate_limit: true,
    log_selection: false,
    log_worker: false,
    log_performance: false,
};
