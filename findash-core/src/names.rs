//! Display-name / data-name translation
//!
//! A few companies are spelled differently in the UI and in the data file.
//! The map is fixed at startup and must be a bijection so that round trips
//! are lossless. Names outside the map pass through unchanged in both
//! directions.

use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NameMapError {
    #[error("duplicate display name '{0}' in name mapping")]
    DuplicateDisplayName(String),
    #[error("duplicate data name '{0}' in name mapping")]
    DuplicateDataName(String),
}

/// Built-in display-name -> data-name pairs for the companies whose spelling
/// differs between the two spaces.
pub fn default_pairs() -> &'static [(&'static str, &'static str)] {
    &[
        ("フジ・リテイリング", "フジ"),
        ("U.S.M.H", "USMH"),
        ("マックスバリュ東海", "マックスバリュー東海"),
    ]
}

#[derive(Debug, Clone)]
pub struct NameMap {
    forward: HashMap<String, String>,
    reverse: HashMap<String, String>,
}

impl NameMap {
    /// Build a map from (display, data) pairs, rejecting any pair that would
    /// break the bijection.
    pub fn new<I, S>(pairs: I) -> Result<Self, NameMapError>
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut forward = HashMap::new();
        let mut reverse = HashMap::new();
        for (display, data) in pairs {
            let display = display.into();
            let data = data.into();
            if forward.contains_key(&display) {
                return Err(NameMapError::DuplicateDisplayName(display));
            }
            if reverse.contains_key(&data) {
                return Err(NameMapError::DuplicateDataName(data));
            }
            forward.insert(display.clone(), data.clone());
            reverse.insert(data, display);
        }
        Ok(Self { forward, reverse })
    }

    /// Translate a display name to its data name; identity for unmapped names.
    pub fn to_data<'a>(&'a self, display: &'a str) -> &'a str {
        self.forward.get(display).map(String::as_str).unwrap_or(display)
    }

    /// Translate a data name to its display name; identity for unmapped names.
    pub fn to_display<'a>(&'a self, data: &'a str) -> &'a str {
        self.reverse.get(data).map(String::as_str).unwrap_or(data)
    }

    /// Element-wise [`NameMap::to_data`], preserving order.
    pub fn to_data_all(&self, names: &[String]) -> Vec<String> {
        names.iter().map(|n| self.to_data(n).to_string()).collect()
    }

    /// Element-wise [`NameMap::to_display`], preserving order.
    pub fn to_display_all(&self, names: &[String]) -> Vec<String> {
        names.iter().map(|n| self.to_display(n).to_string()).collect()
    }

    /// Display names that have a distinct data spelling.
    pub fn display_names(&self) -> impl Iterator<Item = &str> {
        self.forward.keys().map(String::as_str)
    }
}

impl Default for NameMap {
    fn default() -> Self {
        // The built-in pair set is bijective by construction.
        let mut forward = HashMap::new();
        let mut reverse = HashMap::new();
        for (display, data) in default_pairs() {
            forward.insert(display.to_string(), data.to_string());
            reverse.insert(data.to_string(), display.to_string());
        }
        Self { forward, reverse }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_on_mapped_domain() {
        let names = NameMap::default();
        for (display, _) in default_pairs() {
            assert_eq!(names.to_display(names.to_data(display)), *display);
            assert_eq!(
                names.to_data(names.to_display(names.to_data(display))),
                names.to_data(display)
            );
        }
    }

    #[test]
    fn test_identity_outside_mapping() {
        let names = NameMap::default();
        assert_eq!(names.to_data("ヤオコー"), "ヤオコー");
        assert_eq!(names.to_display("ヤオコー"), "ヤオコー");
    }

    #[test]
    fn test_batch_preserves_order() {
        let names = NameMap::default();
        let input = vec!["U.S.M.H".to_string(), "ツルハ".to_string()];
        assert_eq!(
            names.to_data_all(&input),
            vec!["USMH".to_string(), "ツルハ".to_string()]
        );
        assert_eq!(
            names.to_display_all(&names.to_data_all(&input)),
            input
        );
    }

    #[test]
    fn test_rejects_duplicate_data_name() {
        let result = NameMap::new([("A", "x"), ("B", "x")]);
        assert!(matches!(result, Err(NameMapError::DuplicateDataName(_))));
    }

    #[test]
    fn test_rejects_duplicate_display_name() {
        let result = NameMap::new([("A", "x"), ("A", "y")]);
        assert!(matches!(result, Err(NameMapError::DuplicateDisplayName(_))));
    }
}
