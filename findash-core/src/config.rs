//! Dashboard configuration
//!
//! Everything has a built-in default; a TOML file only overrides what it
//! names. The conventional file name is looked up in the current directory
//! when no explicit path is given.

use crate::groups::{self, CUSTOM_GROUP, IndustryGroup};
use crate::names::{self, NameMap};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "findash.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Source spreadsheet.
    pub data_path: PathBuf,
    /// Directory for generated report documents.
    pub output_dir: PathBuf,
    pub chart: ChartConfig,
    /// Extra display-name -> data-name pairs merged over the built-in
    /// mapping. An override may replace a built-in display name but must
    /// keep the mapping bijective.
    pub name_overrides: BTreeMap<String, String>,
    /// Replaces the built-in industry groups when non-empty.
    pub groups: Vec<GroupConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConfig {
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/financial_data.xlsx"),
            output_dir: PathBuf::from("reports"),
            chart: ChartConfig::default(),
            name_overrides: BTreeMap::new(),
            groups: Vec::new(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 900,
            height: 540,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: DashboardConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Explicit path, else `findash.toml` in the current directory if it
    /// exists, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Self::from_file(&default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Built-in name mapping with the configured overrides applied.
    pub fn name_map(&self) -> Result<NameMap> {
        let mut pairs: BTreeMap<String, String> = names::default_pairs()
            .iter()
            .map(|(display, data)| (display.to_string(), data.to_string()))
            .collect();
        for (display, data) in &self.name_overrides {
            pairs.insert(display.clone(), data.clone());
        }
        let map = NameMap::new(pairs).context("Invalid name mapping override")?;
        Ok(map)
    }

    /// Configured industry groups, falling back to the built-in presets.
    /// The custom group is always present.
    pub fn industry_groups(&self) -> Vec<IndustryGroup> {
        if self.groups.is_empty() {
            return groups::default_groups();
        }
        let mut resolved: Vec<IndustryGroup> = self
            .groups
            .iter()
            .map(|g| IndustryGroup {
                name: g.name.clone(),
                members: g.members.clone(),
            })
            .collect();
        if !resolved.iter().any(|g| g.name == CUSTOM_GROUP) {
            resolved.push(IndustryGroup {
                name: CUSTOM_GROUP.to_string(),
                members: Vec::new(),
            });
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.data_path, PathBuf::from("data/financial_data.xlsx"));
        assert_eq!(config.chart.width, 900);
        assert_eq!(config.industry_groups().len(), 7);
        assert!(config.name_map().is_ok());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: DashboardConfig = toml::from_str(
            r#"
            data_path = "elsewhere.xlsx"

            [chart]
            width = 1200
            "#,
        )
        .unwrap();
        assert_eq!(config.data_path, PathBuf::from("elsewhere.xlsx"));
        assert_eq!(config.chart.width, 1200);
        // Unspecified fields keep their defaults.
        assert_eq!(config.chart.height, 540);
        assert_eq!(config.output_dir, PathBuf::from("reports"));
    }

    #[test]
    fn test_name_override_merges_over_defaults() {
        let mut config = DashboardConfig::default();
        config
            .name_overrides
            .insert("Example Holdings".to_string(), "Example".to_string());
        let map = config.name_map().unwrap();
        assert_eq!(map.to_data("Example Holdings"), "Example");
        // Built-ins survive.
        assert_eq!(map.to_data("U.S.M.H"), "USMH");
    }

    #[test]
    fn test_conflicting_override_is_rejected() {
        let mut config = DashboardConfig::default();
        // Same data name as a built-in pair under a second display name.
        config
            .name_overrides
            .insert("USMHの別名".to_string(), "USMH".to_string());
        assert!(config.name_map().is_err());
    }

    #[test]
    fn test_group_override_keeps_custom() {
        let config: DashboardConfig = toml::from_str(
            r#"
            [[groups]]
            name = "mine"
            members = ["A", "B"]
            "#,
        )
        .unwrap();
        let groups = config.industry_groups();
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().any(|g| g.name == CUSTOM_GROUP));
    }
}
