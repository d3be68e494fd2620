use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use sled::Db;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use crate::error::{CatalogError, Result};
use crate::extract::SourceString;

const CACHE_DIR_NAME: &str = "tsq";
const FRONT_CACHE_CAP: usize = 512;
const MAX_CACHE_SIZE: u64 = 250_000_000;
const MAX_CACHE_AGE_SECS: u64 = 30 * 24 * 60 * 60;
const CLEANUP_INTERVAL_SECS: u64 = 6 * 60 * 60;

/// Cache value stored per scanned source file
#[derive(Serialize, Deserialize, Clone)]
struct CacheValue {
    mtime_secs: u64,
    file_size: u64,
    last_accessed: u64,
    strings: Vec<SourceString>,
}

/// Persistent per-file scan cache. Extraction results are keyed by file path
/// and invalidated on mtime or size change, so repeated runs over a plugin
/// tree only re-parse what changed.
pub struct ScanCache {
    db: Db,
    last_cleanup: SystemTime,
    front_cache: Mutex<HashMap<Vec<u8>, CacheValue>>,
    cache_dir: PathBuf,
}

impl ScanCache {
    fn default_cache_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CACHE_DIR_NAME)
    }

    /// Open the cache in the user's cache directory.
    /// `TSQ_DISABLE_CACHE` turns caching off entirely.
    pub fn new() -> Result<Self> {
        if std::env::var("TSQ_DISABLE_CACHE").is_ok() {
            return Err(CatalogError::Generic("cache disabled".to_string()));
        }
        Self::with_cache_dir(Self::default_cache_dir())
    }

    /// Test helper: open the cache in a specific directory
    pub fn with_cache_dir(cache_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&cache_dir)?;
        let db = sled::open(cache_dir.join("db"))
            .map_err(|e| CatalogError::Generic(format!("Failed to open cache: {}", e)))?;

        let last_cleanup = Self::read_last_cleanup_marker(&cache_dir);
        let cache = Self {
            db,
            last_cleanup,
            front_cache: Mutex::new(HashMap::new()),
            cache_dir,
        };
        cache.maybe_cleanup_on_open()?;
        Ok(cache)
    }

    pub fn get(
        &self,
        file: &Path,
        current_mtime: SystemTime,
        current_size: u64,
    ) -> Option<Vec<SourceString>> {
        let key = make_key(file);

        if let Some(strings) = self.front_get(&key, current_mtime, current_size) {
            return Some(strings);
        }

        let cached_bytes = self.db.get(&key).ok()??;
        let mut cached: CacheValue = bincode::deserialize(&cached_bytes).ok()?;

        let current_secs = current_mtime
            .duration_since(SystemTime::UNIX_EPOCH)
            .ok()?
            .as_secs();
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .ok()?
            .as_secs();

        // Lazy expiry
        if now.saturating_sub(cached.last_accessed) > MAX_CACHE_AGE_SECS {
            let _ = self.db.remove(&key);
            return None;
        }

        if cached.mtime_secs == current_secs && cached.file_size == current_size {
            cached.last_accessed = now;
            if let Ok(updated_bytes) = bincode::serialize(&cached) {
                let _ = self.db.insert(&key, updated_bytes);
            }
            self.front_set(key, cached.clone());
            Some(cached.strings)
        } else {
            // File changed, drop the stale entry
            let _ = self.db.remove(&key);
            None
        }
    }

    pub fn set(
        &self,
        file: &Path,
        mtime: SystemTime,
        file_size: u64,
        strings: &[SourceString],
    ) -> Result<()> {
        let key = make_key(file);

        let mtime_secs = mtime
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_err(|e| CatalogError::Generic(format!("Invalid mtime: {}", e)))?
            .as_secs();
        let last_accessed = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_err(|e| CatalogError::Generic(format!("Failed to get current time: {}", e)))?
            .as_secs();

        let value = CacheValue {
            mtime_secs,
            file_size,
            last_accessed,
            strings: strings.to_vec(),
        };

        let value_bytes = bincode::serialize(&value)
            .map_err(|e| CatalogError::Generic(format!("Failed to serialize cache: {}", e)))?;

        self.front_set(key.clone(), value);
        self.db
            .insert(key, value_bytes)
            .map_err(|e| CatalogError::Generic(format!("Failed to write cache: {}", e)))?;

        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.db
            .clear()
            .map_err(|e| CatalogError::Generic(format!("Failed to clear cache: {}", e)))?;
        if let Ok(mut map) = self.front_cache.lock() {
            map.clear();
        }
        let _ = fs::remove_file(meta_file_path(&self.cache_dir));
        Ok(())
    }

    fn front_get(
        &self,
        key: &[u8],
        current_mtime: SystemTime,
        current_size: u64,
    ) -> Option<Vec<SourceString>> {
        let guard = self.front_cache.lock().ok()?;
        let entry = guard.get(key)?;
        let current_secs = current_mtime
            .duration_since(SystemTime::UNIX_EPOCH)
            .ok()?
            .as_secs();
        if entry.mtime_secs == current_secs && entry.file_size == current_size {
            Some(entry.strings.clone())
        } else {
            None
        }
    }

    fn front_set(&self, key: Vec<u8>, value: CacheValue) {
        if let Ok(mut map) = self.front_cache.lock() {
            if map.len() >= FRONT_CACHE_CAP {
                if let Some(oldest_key) = map
                    .iter()
                    .min_by_key(|(_, v)| v.last_accessed)
                    .map(|(k, _)| k.clone())
                {
                    map.remove(&oldest_key);
                }
            }
            map.insert(key, value);
        }
    }

    fn maybe_cleanup_on_open(&self) -> Result<()> {
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_err(|e| CatalogError::Generic(format!("Failed to get current time: {}", e)))?
            .as_secs();

        let last = self
            .last_cleanup
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        if now.saturating_sub(last) >= CLEANUP_INTERVAL_SECS {
            self.cleanup_if_needed()?;
        }

        Ok(())
    }

    fn cleanup_if_needed(&self) -> Result<()> {
        let size = self
            .db
            .size_on_disk()
            .map_err(|e| CatalogError::Generic(format!("Failed to get cache size: {}", e)))?;

        // Expiry is handled lazily at read time; only react to size here
        if size <= MAX_CACHE_SIZE {
            return Ok(());
        }

        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_err(|e| CatalogError::Generic(format!("Failed to get current time: {}", e)))?
            .as_secs();

        let mut entries: Vec<(Vec<u8>, u64)> = self
            .db
            .iter()
            .flatten()
            .filter_map(|(key, value)| {
                bincode::deserialize::<CacheValue>(&value)
                    .ok()
                    .filter(|v| now.saturating_sub(v.last_accessed) <= MAX_CACHE_AGE_SECS)
                    .map(|v| (key.to_vec(), v.last_accessed))
            })
            .collect();

        entries.sort_by_key(|(_, last_accessed)| *last_accessed);

        for (key, _) in entries.iter() {
            if self
                .db
                .size_on_disk()
                .ok()
                .map(|s| s <= MAX_CACHE_SIZE)
                .unwrap_or(true)
            {
                break;
            }
            let _ = self.db.remove(key);
        }

        let _ = self.db.flush();
        self.write_last_cleanup_marker();
        Ok(())
    }

    fn write_last_cleanup_marker(&self) {
        let _ = fs::write(
            meta_file_path(&self.cache_dir),
            SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .map(|d| d.as_secs().to_string())
                .unwrap_or_else(|_| "0".to_string()),
        );
    }

    fn read_last_cleanup_marker(cache_dir: &Path) -> SystemTime {
        let contents = fs::read_to_string(meta_file_path(cache_dir)).ok();
        if let Some(s) = contents {
            if let Ok(secs) = s.trim().parse::<u64>() {
                return SystemTime::UNIX_EPOCH + Duration::from_secs(secs);
            }
        }
        SystemTime::UNIX_EPOCH
    }
}

fn meta_file_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join("meta.last")
}

fn make_key(file: &Path) -> Vec<u8> {
    file.display().to_string().into_bytes()
}
