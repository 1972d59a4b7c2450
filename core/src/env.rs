//! Environment access with defaults
//!
//! Every probe reads its connection settings through an [`EnvSource`], which
//! lets tests substitute a [`MapEnv`] instead of mutating the process
//! environment.

use std::collections::HashMap;

/// Values recognized as `true` by [`env_bool`] (compared lowercased)
pub const TRUTHY_VALUES: [&str; 4] = ["1", "true", "yes", "on"];

/// A source of configuration variables
pub trait EnvSource: Send + Sync {
    /// Raw value of `key`, or `None` if unset
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the real process environment
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        // Non-UTF-8 values are treated as unset.
        std::env::var(key).ok()
    }
}

/// In-memory environment
#[derive(Debug, Default, Clone)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// String value of `key`; unset or empty falls back to `default`
pub fn get_env(env: &dyn EnvSource, key: &str, default: &str) -> String {
    match env.var(key) {
        Some(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

/// Port-sized integer value of `key`; unset, empty or unparsable falls back to `default`
pub fn get_env_u16(env: &dyn EnvSource, key: &str, default: u16) -> u16 {
    env.var(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Boolean flag `key`
///
/// Unset uses `default`. A set value is truthy only if it is one of
/// [`TRUTHY_VALUES`] (case-insensitive); anything else, including the empty
/// string, is false.
pub fn env_bool(env: &dyn EnvSource, key: &str, default: bool) -> bool {
    match env.var(key) {
        Some(value) => {
            let lower = value.trim().to_lowercase();
            TRUTHY_VALUES.contains(&lower.as_str())
        }
        None => default,
    }
}
