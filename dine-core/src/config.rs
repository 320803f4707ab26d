//! # Configuration
//!
//! A minimal string key/value store, `app.set()` / `app.get()` style.
//! Applications layer defaults, `.env` files and environment variables
//! on top of it.
//!
//! ```rust
//! use dine_core::DineConfig;
//!
//! let mut cfg = DineConfig::new();
//! cfg.set("http.port", "3030");
//! assert_eq!(cfg.get("http.port"), Some("3030"));
//! ```
//!
//! Environment overrides use a prefix and `__` as the key separator:
//! `DINE__TENANCY__BASE_DOMAIN=example.com` sets `tenancy.base_domain`.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct DineConfig {
    values: HashMap<String, String>,
}

impl DineConfig {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Overlay every `(key, value)` whose key starts with `prefix`.
    ///
    /// Returns how many keys were applied.
    pub fn load_vars<I>(&mut self, prefix: &str, vars: I) -> usize
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut applied = 0;
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(prefix) {
                let normalized = stripped.to_lowercase().replace("__", ".");
                if normalized.is_empty() {
                    continue;
                }
                self.values.insert(normalized, value);
                applied += 1;
            }
        }
        applied
    }

    /// Overlay the process environment, see [`DineConfig::load_vars`].
    pub fn load_env(&mut self, prefix: &str) -> usize {
        self.load_vars(prefix, std::env::vars())
    }

    pub fn snapshot(&self) -> DineConfigSnapshot {
        DineConfigSnapshot::new(self.values.clone())
    }
}

/// Read-only copy of the config handed to hooks.
#[derive(Debug, Clone, Default)]
pub struct DineConfigSnapshot {
    map: HashMap<String, String>,
}

impl DineConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.parse::<usize>().ok())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.parse::<bool>().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overlay_normalizes_keys() {
        let mut cfg = DineConfig::new();
        cfg.set("http.port", "3030");

        let applied = cfg.load_vars(
            "DINE__",
            vec![
                ("DINE__HTTP__PORT".to_string(), "8080".to_string()),
                ("DINE__TENANCY__BASE_DOMAIN".to_string(), "dine.test".to_string()),
                ("PATH".to_string(), "/usr/bin".to_string()),
            ],
        );

        assert_eq!(applied, 2);
        assert_eq!(cfg.get("http.port"), Some("8080"));
        assert_eq!(cfg.get("tenancy.base_domain"), Some("dine.test"));
        assert!(!cfg.has("path"));
    }

    #[test]
    fn snapshot_parses_typed_values() {
        let mut cfg = DineConfig::new();
        cfg.set("demo.seed_on_start", "true");
        cfg.set("paginate.max", "50");
        let snap = cfg.snapshot();
        assert_eq!(snap.get_bool("demo.seed_on_start"), Some(true));
        assert_eq!(snap.get_usize("paginate.max"), Some(50));
        assert_eq!(snap.get_usize("missing"), None);
    }
}
