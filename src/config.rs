use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{DiffError, Result};

/// Digest used for directory fingerprints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Sha256,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Unified diff rendering
    #[serde(default)]
    pub diff: DiffConfig,

    /// Structured value normalization
    #[serde(default)]
    pub json: JsonConfig,

    /// Directory fingerprinting
    #[serde(default)]
    pub hashing: HashingConfig,

    /// Golden file regeneration
    #[serde(default)]
    pub golden: GoldenConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffConfig {
    /// Unchanged lines shown around each change
    pub context_lines: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonConfig {
    /// Spaces per indentation level when re-encoding
    pub indent: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HashingConfig {
    pub algorithm: HashAlgorithm,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldenConfig {
    /// Rewrite fixtures from actual output when they differ
    pub update: bool,

    /// Environment variable that also switches update mode on
    pub update_env: String,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self { context_lines: 2 }
    }
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self { indent: 4 }
    }
}

impl Default for GoldenConfig {
    fn default() -> Self {
        Self {
            update: false,
            update_env: "GOLDEN_UPDATE".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            diff: DiffConfig::default(),
            json: JsonConfig::default(),
            hashing: HashingConfig::default(),
            golden: GoldenConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| DiffError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DiffError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration with fallback to default
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => {
                if p.as_ref().exists() {
                    Self::load(p)
                } else {
                    Ok(Self::default())
                }
            }
            None => {
                let candidates = ["golden-diff.toml", ".golden-diff.toml"];

                for candidate in &candidates {
                    if Path::new(candidate).exists() {
                        return Self::load(candidate);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    /// Whether fixtures should be rewritten, from the file or the environment
    pub fn update_enabled(&self) -> bool {
        if self.golden.update {
            return true;
        }
        match std::env::var(&self.golden.update_env) {
            Ok(value) => matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
            Err(_) => false,
        }
    }
}
