//! Configuration for file locations and document keys.
//!
//! Load order: `ccss.toml` in the project root → environment variables →
//! defaults. Command-line flags override all three.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "ccss.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CcssConfig {
    pub paths: PathsConfig,
    pub convert: ConvertConfig,
}

/// Input and output locations, relative to the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// K-8 standards; also the reference table for short identifiers.
    pub k8_standards: PathBuf,
    pub hs_standards: PathBuf,
    /// Raw relationship table (`source,target,relationship`).
    pub dependencies_csv: PathBuf,
    pub cleaned_csv: PathBuf,
    pub sanitized_json: PathBuf,
    pub graph_output: PathBuf,
}

/// Document keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Root key holding standards records in JSON documents.
    pub root_key: String,
    /// Root key of the sanitized relationship document.
    pub dependencies_key: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            k8_standards: PathBuf::from("json/ccssm-k8.json"),
            hs_standards: PathBuf::from("json/ccssm-hs.json"),
            dependencies_csv: PathBuf::from("ccss-dependencies.csv"),
            cleaned_csv: PathBuf::from("dependencies_cleaned.csv"),
            sanitized_json: PathBuf::from("json/ccssm-dependencies.json"),
            graph_output: PathBuf::from("graph_data.json"),
        }
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            root_key: "standards".to_string(),
            dependencies_key: "dependencies".to_string(),
        }
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(parsed) = v.parse()
    {
        *target = parsed;
    }
}

impl CcssConfig {
    /// Load config from `ccss.toml` in the project root, with env var overrides.
    /// Falls back to defaults if no config file exists.
    pub fn load(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(CONFIG_FILE);

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read {}", config_path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("failed to parse {}", config_path.display()))?
        } else {
            Self::default()
        };

        env_override("CCSS_ROOT_KEY", &mut config.convert.root_key);
        env_override("CCSS_K8_STANDARDS", &mut config.paths.k8_standards);
        env_override("CCSS_HS_STANDARDS", &mut config.paths.hs_standards);
        env_override("CCSS_DEPENDENCIES_CSV", &mut config.paths.dependencies_csv);
        env_override("CCSS_GRAPH_OUTPUT", &mut config.paths.graph_output);

        if config.convert.root_key.trim().is_empty() {
            anyhow::bail!("convert.root_key must not be empty");
        }
        if config.convert.dependencies_key.trim().is_empty() {
            anyhow::bail!("convert.dependencies_key must not be empty");
        }

        // Make every path absolute against the project root.
        for path in [
            &mut config.paths.k8_standards,
            &mut config.paths.hs_standards,
            &mut config.paths.dependencies_csv,
            &mut config.paths.cleaned_csv,
            &mut config.paths.sanitized_json,
            &mut config.paths.graph_output,
        ] {
            if path.is_relative() {
                *path = project_root.join(&*path);
            }
        }

        Ok(config)
    }
}
