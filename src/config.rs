//! Tracer configuration
//!
//! A single process-wide [`TracerConfig`] is read by every component while a
//! session runs. It can be changed at any time through the setters below;
//! changes take effect from the next delivered event.

use crate::error::{Result, TraceError};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Default maximum recorded depth
pub const DEFAULT_MAX_DEPTH: i64 = 4;

/// Path cuts that are always applied before user cuts
pub const DEFAULT_PATH_CUTS: &[&str] = &[];

/// Path filters that are always applied: host bootstrap/import machinery
/// and Rust standard library frames
pub const DEFAULT_PATH_FILTERS: &[&str] = &["frozen importlib", "/rustc/"];

/// Tracer configuration
///
/// ```
/// use calltrace::TracerConfig;
///
/// let config = TracerConfig::default();
/// assert_eq!(config.max_depth, 4);
/// assert!(config.path_cuts.is_empty());
/// assert_eq!(config.path_filters, vec!["frozen importlib", "/rustc/"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracerConfig {
    /// Events deeper than this are not recorded
    pub max_depth: i64,
    /// Ordered path cut markers used for display
    pub path_cuts: Vec<String>,
    /// Substrings that reject an event when found in caller or callee path
    pub path_filters: Vec<String>,
    /// Dump local bindings under each call
    pub show_args: bool,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            path_cuts: owned(DEFAULT_PATH_CUTS),
            path_filters: owned(DEFAULT_PATH_FILTERS),
            show_args: false,
        }
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn with_defaults<S: AsRef<str>>(defaults: &[&str], extra: &[S]) -> Vec<String> {
    let mut items = owned(defaults);
    items.extend(extra.iter().map(|s| s.as_ref().to_string()));
    items
}

/// User-facing configuration file shape; cuts/filters extend the defaults
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    max_depth: Option<i64>,
    path_cuts: Vec<String>,
    path_filters: Vec<String>,
    show_args: Option<bool>,
}

impl TracerConfig {
    /// Set the depth ceiling; negative values are clamped to 0
    pub fn set_max_depth(&mut self, max_depth: i64) {
        if max_depth < 0 {
            warn!(max_depth, "negative max_depth clamped to 0");
        }
        self.max_depth = max_depth.max(0);
    }

    /// Replace user cuts; the defaults stay in front
    pub fn set_path_cuts<S: AsRef<str>>(&mut self, cuts: &[S]) {
        self.path_cuts = with_defaults(DEFAULT_PATH_CUTS, cuts);
    }

    /// Replace user filters; the defaults stay in front
    pub fn set_path_filters<S: AsRef<str>>(&mut self, filters: &[S]) {
        self.path_filters = with_defaults(DEFAULT_PATH_FILTERS, filters);
    }

    pub fn set_show_args(&mut self, show_args: bool) {
        self.show_args = show_args;
    }

    /// Append cuts after the ones already configured
    pub fn extend_path_cuts<I: IntoIterator<Item = String>>(&mut self, cuts: I) {
        self.path_cuts.extend(cuts);
    }

    /// Append filters after the ones already configured
    pub fn extend_path_filters<I: IntoIterator<Item = String>>(&mut self, filters: I) {
        self.path_filters.extend(filters);
    }

    /// Parse a TOML configuration
    ///
    /// ```toml
    /// max_depth = 2
    /// path_cuts = ["src"]
    /// path_filters = ["vendor"]
    /// show_args = true
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| TraceError::Config(e.to_string()))?;
        if let Some(depth) = file.max_depth {
            if depth < 0 {
                return Err(TraceError::Config(format!(
                    "max_depth must be >= 0, got {}",
                    depth
                )));
            }
        }

        let mut config = Self::default();
        if let Some(depth) = file.max_depth {
            config.set_max_depth(depth);
        }
        config.set_path_cuts(&file.path_cuts);
        config.set_path_filters(&file.path_filters);
        if let Some(show_args) = file.show_args {
            config.set_show_args(show_args);
        }
        Ok(config)
    }

    /// Load a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Should an event between these paths be rejected?
    pub fn is_path_filtered(&self, caller_path: Option<&str>, callee_path: &str) -> bool {
        self.path_filters.iter().any(|filter| {
            callee_path.contains(filter.as_str())
                || caller_path.is_some_and(|path| path.contains(filter.as_str()))
        })
    }
}

static GLOBAL: Lazy<RwLock<TracerConfig>> = Lazy::new(|| RwLock::new(TracerConfig::default()));

/// Copy of the current process-wide configuration
pub fn snapshot() -> TracerConfig {
    GLOBAL.read().clone()
}

/// Run `f` with the process-wide configuration borrowed
pub fn with<R>(f: impl FnOnce(&TracerConfig) -> R) -> R {
    f(&GLOBAL.read())
}

/// Replace the process-wide configuration
pub fn replace(config: TracerConfig) {
    *GLOBAL.write() = config;
}

/// Restore the process-wide configuration to its defaults
pub fn reset() {
    replace(TracerConfig::default());
}

pub fn set_max_depth(max_depth: i64) {
    GLOBAL.write().set_max_depth(max_depth);
}

pub fn set_path_cuts<S: AsRef<str>>(cuts: &[S]) {
    GLOBAL.write().set_path_cuts(cuts);
}

pub fn set_path_filters<S: AsRef<str>>(filters: &[S]) {
    GLOBAL.write().set_path_filters(filters);
}

pub fn set_show_args(show_args: bool) {
    GLOBAL.write().set_show_args(show_args);
}
