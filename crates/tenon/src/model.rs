//! Core Model Trait - The mixin behaviour shared by mapped entities
//!
//! Implementors provide metadata, column values and relationship handles.
//! Naming, primary-key extraction, equality and representation are derived
//! from those. The trait is object safe, so heterogeneous models can be
//! handled as `dyn Model`.

use std::any::Any;
use std::collections::BTreeMap;

use crate::meta::ModelMeta;
use crate::primary_key::PrimaryKey;
use crate::relation::Relationship;
use crate::value::Value;

/// Full field mapping used for equality: every column plus every loaded relationship
pub type FieldMap = BTreeMap<&'static str, Value>;

/// Upcast to `Any` through a trait object
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Mixin trait for mapped model types
pub trait Model: AsAny + Send + Sync {
    /// Static metadata for this model type
    fn meta() -> &'static ModelMeta
    where
        Self: Sized;

    /// Metadata reachable through a trait object
    fn model_meta(&self) -> &'static ModelMeta;

    /// Column values in declaration order
    fn column_values(&self) -> Vec<(&'static str, Value)>;

    /// Relationship handles in declaration order
    fn relationships(&self) -> Vec<(&'static str, &dyn Relationship)> {
        Vec::new()
    }

    /// Default table name derived from the type name unless set explicitly
    fn table_name() -> &'static str
    where
        Self: Sized,
    {
        Self::meta().table()
    }

    fn model_name(&self) -> &'static str {
        self.model_meta().name()
    }

    /// Primary-key field names mapped to their current values
    fn primary_key(&self) -> PrimaryKey {
        PrimaryKey::from_columns(self.model_meta().primary_key(), &self.column_values())
    }

    /// Columns plus loaded relationships. Unloaded relationships are absent
    /// and reading this mapping never triggers a load.
    fn field_map(&self) -> FieldMap {
        let mut fields: FieldMap = self.column_values().into_iter().collect();
        for (name, relationship) in self.relationships() {
            if let Some(value) = relationship.loaded_value() {
                fields.insert(name, value);
            }
        }
        fields
    }

    /// Whether `other` is the same concrete model type
    fn is_same_model(&self, other: &dyn Model) -> bool {
        self.as_any().type_id() == other.as_any().type_id()
    }

    /// Structural equality; different model types are never equal
    fn model_eq(&self, other: &dyn Model) -> bool {
        self.is_same_model(other) && self.field_map() == other.field_map()
    }

    /// Equality against an arbitrary value; anything that is not this model type is unequal
    fn eq_any(&self, other: &dyn Any) -> bool
    where
        Self: Sized,
    {
        match other.downcast_ref::<Self>() {
            Some(other) => self.model_eq(other),
            None => false,
        }
    }

    /// `Name(key=value, ...)` over the primary key
    fn repr(&self) -> String {
        format!("{}({})", self.model_name(), self.primary_key())
    }

    /// Column values as a JSON object
    fn to_fields(&self) -> serde_json::Map<String, serde_json::Value> {
        self.column_values()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.to_json()))
            .collect()
    }
}
