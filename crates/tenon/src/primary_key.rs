//! Primary Key Mapping - Ordered primary-key field names and values
//!
//! Supports single and composite keys. The display form `id=1, other=2`
//! is what model representations are built from.

use std::fmt;

use crate::value::Value;

/// Ordered mapping of primary-key field names to values
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrimaryKey {
    fields: Vec<(&'static str, Value)>,
}

impl PrimaryKey {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, value: impl Into<Value>) -> Self {
        self.fields.push((name, value.into()));
        self
    }

    /// Pick the key fields, in key order, out of a model's column values.
    /// A key field with no column maps to null.
    pub fn from_columns(names: &[&'static str], columns: &[(&'static str, Value)]) -> Self {
        let fields = names
            .iter()
            .map(|name| {
                let value = columns
                    .iter()
                    .find(|(column, _)| column == name)
                    .map(|(_, value)| value.clone())
                    .unwrap_or(Value::Null);
                (*name, value)
            })
            .collect();
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|(name, _)| *name).collect()
    }

    pub fn values(&self) -> Vec<&Value> {
        self.fields.iter().map(|(_, value)| value).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether every key component is set
    pub fn is_complete(&self) -> bool {
        !self.fields.is_empty() && self.fields.iter().all(|(_, value)| !value.is_null())
    }

    /// Extract as i64 if this is a single integer key
    pub fn as_i64(&self) -> Option<i64> {
        match self.fields.as_slice() {
            [(_, value)] => value.as_i64(),
            _ => None,
        }
    }
}

impl fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self
            .fields
            .iter()
            .map(|(name, value)| format!("{}={}", name, value.repr()))
            .collect();
        write!(f, "{}", pairs.join(", "))
    }
}
