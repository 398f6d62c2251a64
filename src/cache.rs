//! Dataset caching keyed by input content
//!
//! A cached [`Dataset`] is reused only while the resolved input files are
//! byte-for-byte unchanged and the loader is configured the same way. The cache is an ordinary value owned by the
//! caller; nothing here is global.

use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::config::DashboardConfig;
use crate::error::{Error, Result};
use crate::io::{InputSet, TableLoader};
use crate::pipeline::Dataset;

/// SHA-256 over every resolved path, the bytes behind it and the settings
/// that shape the build, hex encoded
///
/// Status vocabulary, table schemas and the quote-wrapped table list all
/// change the joined lines, so two loaders that differ in any of them never
/// share an entry.
pub fn fingerprint(inputs: &InputSet, config: &DashboardConfig) -> Result<String> {
    let mut hasher = Sha256::new();

    hasher.update(serde_json::to_vec(&config.vocabulary)?);
    hasher.update([0u8]);
    hasher.update(serde_json::to_vec(&config.schema)?);
    hasher.update([0u8]);
    hasher.update(serde_json::to_vec(&config.data.quote_wrapped)?);
    hasher.update([0u8]);

    for (table, path) in inputs.iter() {
        hasher.update(table.name().as_bytes());
        hasher.update([0u8]);
        hasher.update(path.to_string_lossy().as_bytes());
        hasher.update([0u8]);

        let mut file = File::open(path).map_err(Error::Io)?;
        let bytes = io::copy(&mut file, &mut hasher).map_err(Error::Io)?;
        hasher.update(bytes.to_le_bytes());
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Hit and miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Memoizes built datasets by input and configuration fingerprint
#[derive(Debug, Default)]
pub struct PipelineCache {
    entries: HashMap<String, Arc<Dataset>>,
    stats: CacheStats,
}

impl PipelineCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached dataset for the loader's current inputs, building it on a miss
    ///
    /// A failed build caches nothing.
    pub fn get_or_load(&mut self, loader: &TableLoader) -> Result<Arc<Dataset>> {
        let inputs = loader.resolve_all()?;
        let key = fingerprint(&inputs, loader.config())?;

        if let Some(dataset) = self.entries.get(&key) {
            self.stats.hits += 1;
            log::debug!("dataset cache hit for {}", key);
            return Ok(Arc::clone(dataset));
        }

        self.stats.misses += 1;
        log::info!("dataset cache miss for {}, loading", key);
        let dataset = Arc::new(Dataset::load_from(loader, inputs)?);
        self.entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Drop the entry for one fingerprint; returns whether it existed
    pub fn invalidate(&mut self, fingerprint: &str) -> bool {
        let removed = self.entries.remove(fingerprint).is_some();
        if removed {
            log::warn!("invalidated cached dataset {}", fingerprint);
        }
        removed
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            log::warn!("clearing {} cached datasets", self.entries.len());
        }
        self.entries.clear();
    }

    pub fn contains(&self, fingerprint: &str) -> bool {
        self.entries.contains_key(fingerprint)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
