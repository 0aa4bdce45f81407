//! Build configuration for the point index.
//!
//! Every tunable is passed explicitly into [`crate::PartitionBuilder`]; there
//! is no process-wide state.

use serde::de::Error;

/// Points per leaf block used when nothing else is configured.
pub const DEFAULT_LEAF_SIZE: usize = 1024;
pub const MIN_LEAF_SIZE: usize = 1;

const LARGE_LEAF_SIZE: usize = 1 << 16;

/// Index configuration
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexConfig {
    /// Maximum number of points in a leaf block
    #[serde(default = "IndexConfig::default_leaf_size")]
    pub leaf_size: usize,

    /// Capacity hint for the ingestion buffer
    #[serde(default)]
    pub expected_points: Option<usize>,
}

impl IndexConfig {
    const fn default_leaf_size() -> usize {
        DEFAULT_LEAF_SIZE
    }

    pub fn with_leaf_size(mut self, leaf_size: usize) -> Self {
        assert!(
            leaf_size >= MIN_LEAF_SIZE,
            "Leaf size must be greater than zero"
        );

        if leaf_size > LARGE_LEAF_SIZE {
            log::warn!(
                "Leaf size of {} is very large; every partially covered leaf is scanned point by point",
                leaf_size
            );
        }

        self.leaf_size = leaf_size;
        self
    }

    pub fn with_expected_points(mut self, expected: usize) -> Self {
        self.expected_points = Some(expected);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.leaf_size < MIN_LEAF_SIZE {
            return Err("Leaf size must be greater than zero".to_string());
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: IndexConfig = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: IndexConfig = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            leaf_size: Self::default_leaf_size(),
            expected_points: None,
        }
    }
}
