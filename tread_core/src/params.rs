//! Runtime parameter store
//!
//! A flat key-value map (`serde_json::Value` entries) that can be loaded from
//! and saved to a YAML file. Keys are dotted, e.g. `odometry.wheelbase`.
//! Only system keys have built-in defaults; chassis constants come from
//! files or are set at runtime.

use crate::error::{TreadError, TreadResult};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File picked up by `RuntimeParams::init` when present in the working directory
pub const DEFAULT_PARAMS_FILE: &str = ".tread/params.yaml";

/// Shared parameter store. Clones share the same underlying map.
#[derive(Clone)]
pub struct RuntimeParams {
    params: Arc<RwLock<BTreeMap<String, Value>>>,
    persist_path: Option<PathBuf>,
}

impl RuntimeParams {
    /// Load `.tread/params.yaml` from the working directory if it exists,
    /// otherwise start from the built-in defaults
    pub fn init() -> TreadResult<Self> {
        let params_file = PathBuf::from(DEFAULT_PARAMS_FILE);
        if params_file.exists() {
            return Self::from_file(&params_file);
        }
        Ok(Self::with_defaults())
    }

    /// Built-in defaults only, nothing read from disk
    pub fn with_defaults() -> Self {
        Self {
            params: Arc::new(RwLock::new(default_params())),
            persist_path: None,
        }
    }

    /// Defaults overlaid with the entries of a YAML file
    pub fn from_file(path: &Path) -> TreadResult<Self> {
        let params = Self::with_defaults();
        params.load_from_disk(path)?;
        Ok(Self {
            persist_path: Some(path.to_path_buf()),
            ..params
        })
    }

    /// Get a parameter value
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        let params = self.params.read();
        let value = params.get(key)?;
        serde_json::from_value(value.clone()).ok()
    }

    /// Get a parameter, failing when it is missing or has the wrong type
    pub fn require<T: for<'de> Deserialize<'de>>(&self, key: &str) -> TreadResult<T> {
        let params = self.params.read();
        let value = params
            .get(key)
            .ok_or_else(|| TreadError::config(format!("missing parameter '{}'", key)))?;
        serde_json::from_value(value.clone()).map_err(|e| {
            TreadError::config(format!("parameter '{}' has the wrong type: {}", key, e))
        })
    }

    /// Get parameter with default
    pub fn get_or<T: for<'de> Deserialize<'de>>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    pub fn get_f64(&self, key: &str, default: f64) -> f64 {
        self.get_or(key, default)
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get_or(key, default)
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.get_or(key, default.to_string())
    }

    /// Set a parameter value
    pub fn set<T: Serialize>(&self, key: &str, value: T) -> TreadResult<()> {
        let json_value = serde_json::to_value(value)?;
        self.params.write().insert(key.to_string(), json_value);
        Ok(())
    }

    /// Check if a parameter exists
    pub fn has(&self, key: &str) -> bool {
        self.params.read().contains_key(key)
    }

    /// Remove a parameter
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.params.write().remove(key)
    }

    /// Clear all parameters and reset to defaults
    pub fn reset(&self) {
        *self.params.write() = default_params();
    }

    /// Save parameters to the YAML file they were loaded from, or to
    /// `DEFAULT_PARAMS_FILE`
    pub fn save_to_disk(&self) -> TreadResult<()> {
        let path = self
            .persist_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PARAMS_FILE));
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> TreadResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let yaml = serde_yaml::to_string(&*self.params.read())?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Merge the entries of a YAML file over the current values
    pub fn load_from_disk(&self, path: &Path) -> TreadResult<()> {
        let yaml_str = std::fs::read_to_string(path)?;
        let loaded: BTreeMap<String, Value> = serde_yaml::from_str(&yaml_str)?;
        log::debug!("loaded {} parameters from {}", loaded.len(), path.display());

        self.params.write().extend(loaded);
        Ok(())
    }
}

impl Default for RuntimeParams {
    fn default() -> Self {
        Self::init().unwrap_or_else(|e| {
            log::warn!("Failed to load runtime parameters: {}. Using defaults.", e);
            Self::with_defaults()
        })
    }
}

fn default_params() -> BTreeMap<String, Value> {
    let mut params = BTreeMap::new();

    // System defaults
    params.insert("tick_rate".to_string(), Value::from(50));
    params.insert("log_level".to_string(), Value::from("INFO"));

    params
}
