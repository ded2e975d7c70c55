//! Project configuration for mutation runs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Project configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Status the unmodified request should return
    pub expected_status: u16,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Pause between consecutive requests in milliseconds
    pub delay_ms: u64,

    /// Use the sample object when an echo demo endpoint's body is unparseable
    pub echo_fallback: bool,

    /// Fixed seed for the fuzz passes (random when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Extra headers (auth, API keys); headers in the request text win
    pub headers: BTreeMap<String, String>,

    /// Which mutation categories to generate
    pub categories: CategoryToggles,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            expected_status: 201,
            timeout_secs: 15,
            delay_ms: 50,
            echo_fallback: true,
            seed: None,
            headers: BTreeMap::new(),
            categories: CategoryToggles::default(),
        }
    }
}

/// Per-category switches. Positive always runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryToggles {
    pub missing_field: bool,
    pub type_mismatch: bool,
    pub null_value: bool,
    pub empty_value: bool,
    pub security: bool,
    pub edge: bool,
    pub fuzz: bool,
    pub header_variant: bool,
    /// Off by default: most endpoints answer other verbs with 404, not 405
    pub method_variant: bool,
    /// Off by default: first-element edits and a 50x larger array
    pub array_element: bool,
    /// Off by default: sends a 1 MB body
    pub oversized_payload: bool,
}

impl Default for CategoryToggles {
    fn default() -> Self {
        Self {
            missing_field: true,
            type_mismatch: true,
            null_value: true,
            empty_value: true,
            security: true,
            edge: true,
            fuzz: true,
            header_variant: true,
            method_variant: false,
            array_element: false,
            oversized_payload: false,
        }
    }
}

impl Config {
    /// Load config from file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e.to_string()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
        }
    }

    /// Load from the first default location that exists, else defaults.
    ///
    /// # Errors
    ///
    /// Returns error if a config file exists but cannot be read or parsed
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_from_dir(Path::new("."))
    }

    /// Same as [`Config::load_default`], relative to `dir`.
    ///
    /// # Errors
    ///
    /// Returns error if a config file exists but cannot be read or parsed
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let candidates = [".curlprobe.toml", ".curlprobe.json", "curlprobe.toml"];

        for name in candidates {
            let path = dir.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }

        Ok(Self::default())
    }

    /// Create example config file
    #[must_use]
    pub fn example() -> &'static str {
        r#"# curlprobe configuration

# Status the unmodified request should return (200 and 201 always count)
expected_status = 201

# Per-request timeout in seconds
timeout_secs = 15

# Pause between requests in milliseconds
delay_ms = 50

# Substitute the sample object when the body sent to the
# api.restful-api.dev demo endpoint cannot be parsed
echo_fallback = true

# Fixed fuzz seed for reproducible runs
# seed = 42

# Extra HTTP headers (auth, api keys); headers in the curl text win
[headers]
# Authorization = "Bearer your-token-here"

# Mutation categories
[categories]
missing_field = true
type_mismatch = true
null_value = true
empty_value = true
security = true
edge = true
fuzz = true
header_variant = true
method_variant = false
array_element = false
oversized_payload = false
"#
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read {0}: {1}")]
    Io(PathBuf, String),
    #[error("Parse error: {0}")]
    Parse(String),
}
