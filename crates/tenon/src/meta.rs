//! Static model metadata
//!
//! One `ModelMeta` exists per model type. The derive macro builds it lazily
//! on first access; hand-written models can do the same with
//! `once_cell::sync::Lazy`.

use crate::config;
use crate::naming::NamingConvention;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelMeta {
    name: &'static str,
    table: String,
    primary_key: Vec<&'static str>,
    columns: Vec<&'static str>,
    relationships: Vec<&'static str>,
}

impl ModelMeta {
    /// Metadata for the type `name`, table named by the installed convention
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            table: config::current().naming.apply(name),
            primary_key: Vec::new(),
            columns: Vec::new(),
            relationships: Vec::new(),
        }
    }

    pub fn with_naming(mut self, naming: NamingConvention) -> Self {
        self.table = naming.apply(self.name);
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_primary_key(mut self, names: &[&'static str]) -> Self {
        self.primary_key = names.to_vec();
        self
    }

    pub fn with_columns(mut self, names: &[&'static str]) -> Self {
        self.columns = names.to_vec();
        self
    }

    pub fn with_relationships(mut self, names: &[&'static str]) -> Self {
        self.relationships = names.to_vec();
        self
    }

    /// Type name, e.g. `AnotherModel`
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn primary_key(&self) -> &[&'static str] {
        &self.primary_key
    }

    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    pub fn relationships(&self) -> &[&'static str] {
        &self.relationships
    }

    pub fn is_primary_key(&self, name: &str) -> bool {
        self.primary_key.iter().any(|pk| *pk == name)
    }
}
