use crate::config::loading::Config;
use crate::errors::ConfigResult;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loaded configs for one CLI invocation, keyed by the ordered source paths.
///
/// Owned by the command being run and passed down by reference; nothing is
/// shared between invocations.
#[derive(Debug, Default)]
pub struct ConfigCache {
    entries: HashMap<Vec<PathBuf>, Config>,
}

impl ConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached config for `paths`, loading it on first use.
    ///
    /// Failed loads are not cached.
    pub fn get_or_load<P: AsRef<Path>>(&mut self, paths: &[P]) -> ConfigResult<&Config> {
        let key: Vec<PathBuf> = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();

        match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                debug!(event = "core.config.cache_hit", file_count = entry.key().len());
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let config = Config::new_from_files(entry.key().as_slice())?;
                Ok(entry.insert(config))
            }
        }
    }

    /// Drop the entry for `paths`. Returns whether one existed.
    pub fn invalidate<P: AsRef<Path>>(&mut self, paths: &[P]) -> bool {
        let key: Vec<PathBuf> = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
        self.entries.remove(&key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
