//! Comparison settings

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareOptions {
    /// Load and compare relationships of models, not only their columns
    pub check_relationships: bool,
    /// Values of different types are reported even when they compare equal
    pub strict: bool,
    /// Skip the `==` shortcut and always walk values
    pub ignore_eq: bool,
    /// Append the reports of nested differences
    pub recursive: bool,
    /// Compare lists as unordered collections
    pub ignore_order: bool,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    /// Prepended to the report as `<prefix>: `
    pub prefix: Option<String>,
    /// Attributes dropped from every model before comparison
    pub ignore_attributes: Vec<String>,
    /// Attributes dropped per model name
    pub ignore_model_attributes: BTreeMap<String, Vec<String>>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            check_relationships: false,
            strict: false,
            ignore_eq: false,
            recursive: true,
            ignore_order: false,
            x_label: None,
            y_label: None,
            prefix: None,
            ignore_attributes: Vec::new(),
            ignore_model_attributes: BTreeMap::new(),
        }
    }
}

impl CompareOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_check_relationships(mut self, check: bool) -> Self {
        self.check_relationships = check;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_ignore_eq(mut self, ignore_eq: bool) -> Self {
        self.ignore_eq = ignore_eq;
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_ignore_order(mut self, ignore_order: bool) -> Self {
        self.ignore_order = ignore_order;
        self
    }

    pub fn with_labels(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = Some(x_label.into());
        self.y_label = Some(y_label.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn ignoring(mut self, attribute: impl Into<String>) -> Self {
        self.ignore_attributes.push(attribute.into());
        self
    }

    pub fn ignoring_for(mut self, model: impl Into<String>, attribute: impl Into<String>) -> Self {
        self.ignore_model_attributes
            .entry(model.into())
            .or_default()
            .push(attribute.into());
        self
    }

    /// Attributes to drop from a model of the given name
    pub fn ignored_for<'a>(&'a self, model_name: &str) -> impl Iterator<Item = &'a str> {
        self.ignore_attributes
            .iter()
            .chain(
                self.ignore_model_attributes
                    .get(model_name)
                    .into_iter()
                    .flatten(),
            )
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CompareOptions::default();
        assert!(options.recursive);
        assert!(!options.check_relationships);
        assert!(!options.strict);
        assert_eq!(options.ignored_for("Model").count(), 0);
    }

    #[test]
    fn test_ignored_attributes() {
        let options = CompareOptions::new()
            .ignoring("updated_at")
            .ignoring_for("AnotherModel", "attr");
        let another: Vec<&str> = options.ignored_for("AnotherModel").collect();
        assert_eq!(another, vec!["updated_at", "attr"]);
        let model: Vec<&str> = options.ignored_for("Model").collect();
        assert_eq!(model, vec!["updated_at"]);
    }

    #[test]
    fn test_yaml_settings() {
        let options: CompareOptions = serde_yaml::from_str(
            "check_relationships: true\nx_label: db\ny_label: raw\nignore_model_attributes:\n  AnotherModel: [attr]\n",
        )
        .unwrap();
        assert!(options.check_relationships);
        assert!(options.recursive);
        assert_eq!(options.x_label.as_deref(), Some("db"));
        assert_eq!(options.ignored_for("AnotherModel").collect::<Vec<_>>(), vec!["attr"]);
    }
}
