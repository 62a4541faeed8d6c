//! Configuration for the emotion crafting core.
//!
//! Maps directly to `emocraft.toml`. Every field has a default, so an empty
//! file yields the stock setup: the six sample base emotions and the rule
//! and dimension tables compiled into the crate.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::dimensions::DimensionTable;
use crate::graph::DEFAULT_RATIO_DEPTH;
use crate::types::DEFAULT_BASE_EMOTIONS;

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmocraftConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Base layer and rule source.
    #[serde(default)]
    pub graph: GraphConfig,
    /// Composition ratio settings.
    #[serde(default)]
    pub ratios: RatioConfig,
    /// Dimension table source.
    #[serde(default)]
    pub dimensions: DimensionsConfig,
}

impl EmocraftConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `EmocraftError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::EmocraftError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Base layer and rule source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Ordered base emotions.
    #[serde(default = "default_base_emotions")]
    pub base_emotions: Vec<String>,
    /// Rule table file. `None` uses the embedded table.
    #[serde(default)]
    pub rules_path: Option<PathBuf>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            base_emotions: default_base_emotions(),
            rules_path: None,
        }
    }
}

/// Composition ratio settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatioConfig {
    /// Recursion depth beyond which ancestry is ignored.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
}

impl Default for RatioConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_RATIO_DEPTH,
        }
    }
}

/// Dimension table source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DimensionsConfig {
    /// Dimension table file. `None` uses the embedded table.
    #[serde(default)]
    pub table_path: Option<PathBuf>,
}

impl DimensionsConfig {
    /// Load the configured dimension table.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or holds invalid values.
    pub fn load(&self) -> crate::error::Result<DimensionTable> {
        match &self.table_path {
            Some(path) => DimensionTable::from_file(path),
            None => DimensionTable::embedded(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_base_emotions() -> Vec<String> { DEFAULT_BASE_EMOTIONS.iter().map(ToString::to_string).collect() }
fn default_max_depth() -> u32 { DEFAULT_RATIO_DEPTH }

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EmocraftError;
    use std::io::Write;

    #[test]
    fn empty_config_uses_defaults() {
        let config = EmocraftConfig::from_toml("").expect("empty config parses");
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.graph.base_emotions, DEFAULT_BASE_EMOTIONS);
        assert!(config.graph.rules_path.is_none());
        assert_eq!(config.ratios.max_depth, 10);
        assert!(config.dimensions.table_path.is_none());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = EmocraftConfig::from_toml(
            r#"
            [graph]
            base_emotions = ["Joy", "Anger"]

            [ratios]
            max_depth = 4
            "#,
        )
        .expect("valid config");
        assert_eq!(config.graph.base_emotions, vec!["Joy", "Anger"]);
        assert_eq!(config.ratios.max_depth, 4);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = EmocraftConfig::from_toml("[ratios]\nmax_depth = \"deep\"\n");
        assert!(matches!(err, Err(EmocraftError::Config(_))));
    }

    #[test]
    fn loads_from_file_and_builds() {
        let dir = tempfile::tempdir().expect("tempdir");
        let rules_path = dir.path().join("rules.toml");
        std::fs::write(&rules_path, "[Joy]\nAnger = \"Pride\"\n").expect("write rules");

        let config_path = dir.path().join("emocraft.toml");
        let mut file = std::fs::File::create(&config_path).expect("create config");
        writeln!(
            file,
            "[graph]\nbase_emotions = [\"Joy\", \"Anger\"]\nrules_path = {:?}",
            rules_path.display().to_string()
        )
        .expect("write config");
        drop(file);

        let config = EmocraftConfig::from_file(&config_path).expect("config loads");
        let out = crate::builder::build_from_config(&config).expect("build succeeds");
        assert_eq!(out.graph.get_combination("Anger", "Joy"), Some("Pride"));
        assert_eq!(out.graph.rule_count(), 1);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = EmocraftConfig::from_file(std::path::Path::new("/nonexistent/emocraft.toml"));
        assert!(matches!(err, Err(EmocraftError::Io(_))));
    }

    #[test]
    fn default_dimension_table_is_embedded() {
        let table = DimensionsConfig::default().load().expect("embedded table");
        assert!(!table.is_empty());
    }
}
