use {
    crate::{
        config::{PERSISTENCE, response_cache_filename},
        utils::{how_many_seconds_ago, now_timestamp_ms},
    },
    anyhow::{Context, Result, bail},
    serde::{Deserialize, Serialize, de::DeserializeOwned},
    std::{
        fs::{self, File},
        io::{BufReader, BufWriter},
        path::{Path, PathBuf},
    },
};

#[cfg(debug_assertions)]
use crate::{config::DF, utils::format_duration};

/// Where a piece of data came from. Only API data is written back to disk.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataSource {
    #[default]
    Api,
    DiskCache,
    Memory,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let label = match self {
            DataSource::Api => "Coin Metrics API",
            DataSource::DiskCache => "disk cache",
            DataSource::Memory => "memory",
        };
        write!(f, "{}", label)
    }
}

/// Binary cache file wrapper with metadata
#[derive(Serialize, Deserialize, Debug)]
struct CacheFile<T> {
    version: f64,
    timestamp_ms: i64,
    key: String,
    data: T,
}

/// Bincode files, one per response key, under a single directory.
#[derive(Debug, Clone)]
pub struct DiskCache {
    directory: PathBuf,
    version: f64,
    max_age_secs: i64,
}

impl Default for DiskCache {
    fn default() -> Self {
        Self::new(
            PERSISTENCE.cache.directory,
            PERSISTENCE.cache.version,
            PERSISTENCE.cache.max_age_secs,
        )
    }
}

impl DiskCache {
    pub fn new(directory: impl Into<PathBuf>, version: f64, max_age_secs: i64) -> Self {
        Self {
            directory: directory.into(),
            version,
            max_age_secs,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.directory.join(response_cache_filename(key))
    }

    /// Read `key` back. Fails when the file is missing, from another format version, or too old.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let full_path = self.path_for(key);
        let file = File::open(&full_path).context(format!("Failed to open file: {:?}", full_path))?;
        let mut reader = BufReader::new(file);

        let cache: CacheFile<T> = bincode::deserialize_from(&mut reader)
            .context(format!("Failed to deserialize cache from: {:?}", full_path))?;

        if cache.version != self.version {
            bail!(
                "Cache version mismatch: file v{} vs required v{}",
                cache.version,
                self.version
            );
        }

        if cache.key != key {
            bail!("Cache key mismatch: file holds {:?}, expected {:?}", cache.key, key);
        }

        let seconds_ago = how_many_seconds_ago(cache.timestamp_ms);
        if seconds_ago > self.max_age_secs {
            bail!(
                "Cache too old: created {} seconds ago (limit: {} seconds)",
                seconds_ago,
                self.max_age_secs
            );
        }

        #[cfg(debug_assertions)]
        if DF.log_cache {
            log::info!(
                "Cache valid: {} v{}, {} old (limit {})",
                key,
                cache.version,
                format_duration(seconds_ago * 1000),
                format_duration(self.max_age_secs * 1000)
            );
        }

        Ok(cache.data)
    }

    /// Persist `data` under `key`, unless it did not come from the API.
    pub fn store<T: Serialize>(&self, key: &str, data: &T, source: DataSource) -> Result<()> {
        if source != DataSource::Api {
            #[cfg(debug_assertions)]
            if DF.log_cache {
                log::info!("Skipping cache write for {} (data from {})", key, source);
            }
            return Ok(());
        }
        self.write_stamped(key, data, now_timestamp_ms())
    }

    fn write_stamped<T: Serialize>(&self, key: &str, data: &T, timestamp_ms: i64) -> Result<()> {
        let full_path = self.path_for(key);
        let file = create_file_with_parents(&full_path)?;
        let writer = BufWriter::new(file);

        let cache = CacheFile {
            version: self.version,
            timestamp_ms,
            key: key.to_string(),
            data,
        };

        bincode::serialize_into(writer, &cache)
            .with_context(|| format!("Failed to serialize cache to: {}", full_path.display()))?;

        #[cfg(debug_assertions)]
        if DF.log_cache {
            log::info!("Cache written: {}", full_path.display());
        }
        Ok(())
    }

    /// Async wrapper for `store`. Runs on the blocking pool so the worker keeps serving requests.
    pub async fn store_async<T>(&self, key: String, data: T, source: DataSource) -> Result<()>
    where
        T: Serialize + Send + 'static,
    {
        let cache = self.clone();
        tokio::task::spawn_blocking(move || cache.store(&key, &data, source))
            .await
            .context("Cache write task panicked")?
    }
}

// Helper function to create a new file and any missing parent directories.
fn create_file_with_parents(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))
}
