//! Typed access to environment variables.
//!
//! Parsing is lenient: a value that is missing, empty or malformed falls back
//! to the supplied default. Numbers are parsed as-is, so surrounding
//! whitespace counts as malformed. Malformed numbers are reported with a
//! warning so the operator can see which key was ignored.

use std::collections::HashMap;
use std::env;

use tracing::warn;

/// Source of raw key/value settings.
///
/// Only `var` has to be provided; the typed accessors are built on top of it.
pub trait EnvSource {
    /// Returns the raw value for `key`, if set.
    fn var(&self, key: &str) -> Option<String>;

    /// Returns the value for `key`, or `default` when unset or empty.
    fn string(&self, key: &str, default: &str) -> String {
        match self.var(key) {
            Some(v) if !v.is_empty() => v,
            _ => default.to_string(),
        }
    }

    /// Returns the raw value for `key`, or an empty string when unset.
    fn secret(&self, key: &str) -> String {
        self.var(key).unwrap_or_default()
    }

    fn float(&self, key: &str, default: f64) -> f64 {
        let value = match self.var(key) {
            Some(v) if !v.is_empty() => v,
            _ => return default,
        };
        match value.parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                warn!(key, value = %value, default, "Invalid float value, using default");
                default
            }
        }
    }

    fn int(&self, key: &str, default: i64) -> i64 {
        let value = match self.var(key) {
            Some(v) if !v.is_empty() => v,
            _ => return default,
        };
        match value.parse::<i64>() {
            Ok(v) => v,
            Err(_) => {
                warn!(key, value = %value, default, "Invalid int value, using default");
                default
            }
        }
    }

    /// Accepts "true", "1" and "yes" (any case) as true. Any other non-empty
    /// value is false.
    fn boolean(&self, key: &str, default: bool) -> bool {
        match self.var(key) {
            Some(v) if !v.is_empty() => {
                matches!(v.to_lowercase().as_str(), "true" | "1" | "yes")
            }
            _ => default,
        }
    }
}

/// Reads from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

/// In-memory settings, mostly useful for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}
