//! Relationship fields with lazy loading
//!
//! A relationship is in one of three states:
//!
//! - unset: nothing assigned and nothing to load from. Reads as `None`
//!   (or empty) and stays unloaded.
//! - pending: carries a loader that runs on first access.
//! - loaded: holds a value, either assigned directly, eagerly loaded by the
//!   ORM, or cached after a lazy load.
//!
//! Only loaded relationships take part in equality.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::ModelResult;
use crate::model::Model;
use crate::value::Value;

/// Loads the target of a relationship
pub trait RelationLoader<T>: Send + Sync {
    fn load(&self) -> ModelResult<T>;
}

impl<T, F> RelationLoader<T> for F
where
    F: Fn() -> ModelResult<T> + Send + Sync,
{
    fn load(&self) -> ModelResult<T> {
        self()
    }
}

/// Introspection hook over a relationship field
pub trait Relationship: Send + Sync {
    fn is_loaded(&self) -> bool;

    /// The current value if loaded; never triggers a load
    fn loaded_value(&self) -> Option<Value>;

    /// The value, running the loader first if needed
    fn load_value(&self) -> ModelResult<Value>;
}

/// To-one relationship
pub struct Related<T> {
    slot: OnceCell<Option<Arc<T>>>,
    loader: Option<Arc<dyn RelationLoader<Option<T>>>>,
}

impl<T> Related<T> {
    pub fn unset() -> Self {
        Self {
            slot: OnceCell::new(),
            loader: None,
        }
    }

    pub fn lazy<L>(loader: L) -> Self
    where
        L: RelationLoader<Option<T>> + 'static,
    {
        Self {
            slot: OnceCell::new(),
            loader: Some(Arc::new(loader)),
        }
    }

    pub fn loaded(value: Option<T>) -> Self {
        Self {
            slot: OnceCell::with_value(value.map(Arc::new)),
            loader: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.get().is_some()
    }

    pub fn is_pending(&self) -> bool {
        !self.is_loaded() && self.loader.is_some()
    }

    /// The related model, loading it on first access
    pub fn get(&self) -> ModelResult<Option<&T>> {
        Ok(self.get_arc()?.map(|model| &**model))
    }

    /// The related model if already loaded
    pub fn peek(&self) -> Option<Option<&T>> {
        self.slot.get().map(|value| value.as_deref())
    }

    pub fn set(&mut self, value: Option<T>) {
        self.slot = OnceCell::with_value(value.map(Arc::new));
    }

    pub fn take(&mut self) -> Option<Arc<T>> {
        self.slot.take().flatten()
    }

    /// Drop the loaded value; a pending relationship loads again on next access
    pub fn reset(&mut self) {
        self.slot = OnceCell::new();
    }

    fn get_arc(&self) -> ModelResult<Option<&Arc<T>>> {
        if let Some(value) = self.slot.get() {
            return Ok(value.as_ref());
        }
        let Some(loader) = &self.loader else {
            return Ok(None);
        };
        let value = self.slot.get_or_try_init(|| {
            tracing::debug!(target_type = std::any::type_name::<T>(), "loading to-one relationship");
            loader.load().map(|value| value.map(Arc::new)).map_err(|err| {
                tracing::warn!(target_type = std::any::type_name::<T>(), error = %err, "relationship load failed");
                err
            })
        })?;
        Ok(value.as_ref())
    }
}

impl<T> Default for Related<T> {
    fn default() -> Self {
        Self::unset()
    }
}

impl<T> Clone for Related<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
            loader: self.loader.clone(),
        }
    }
}

impl<T> From<T> for Related<T> {
    fn from(value: T) -> Self {
        Self::loaded(Some(value))
    }
}

impl<T: Model> fmt::Debug for Related<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot.get() {
            Some(Some(model)) => write!(f, "Related({})", model.repr()),
            Some(None) => f.write_str("Related(None)"),
            None if self.loader.is_some() => f.write_str("Related(<pending>)"),
            None => f.write_str("Related(<unset>)"),
        }
    }
}

impl<T: Model> Relationship for Related<T> {
    fn is_loaded(&self) -> bool {
        Related::is_loaded(self)
    }

    fn loaded_value(&self) -> Option<Value> {
        self.slot.get().map(|value| match value {
            Some(model) => Value::Model(model.clone()),
            None => Value::Null,
        })
    }

    fn load_value(&self) -> ModelResult<Value> {
        Ok(match self.get_arc()? {
            Some(model) => Value::Model(model.clone()),
            None => Value::Null,
        })
    }
}

/// To-many relationship
pub struct RelatedMany<T> {
    slot: OnceCell<Vec<Arc<T>>>,
    loader: Option<Arc<dyn RelationLoader<Vec<T>>>>,
}

impl<T> RelatedMany<T> {
    pub fn unset() -> Self {
        Self {
            slot: OnceCell::new(),
            loader: None,
        }
    }

    pub fn lazy<L>(loader: L) -> Self
    where
        L: RelationLoader<Vec<T>> + 'static,
    {
        Self {
            slot: OnceCell::new(),
            loader: Some(Arc::new(loader)),
        }
    }

    pub fn loaded(values: Vec<T>) -> Self {
        Self {
            slot: OnceCell::with_value(values.into_iter().map(Arc::new).collect()),
            loader: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.get().is_some()
    }

    pub fn is_pending(&self) -> bool {
        !self.is_loaded() && self.loader.is_some()
    }

    /// The related models, loading them on first access
    pub fn get(&self) -> ModelResult<&[Arc<T>]> {
        if let Some(values) = self.slot.get() {
            return Ok(values);
        }
        let Some(loader) = &self.loader else {
            return Ok(&[]);
        };
        let values = self.slot.get_or_try_init(|| {
            tracing::debug!(target_type = std::any::type_name::<T>(), "loading to-many relationship");
            loader
                .load()
                .map(|values| values.into_iter().map(Arc::new).collect())
                .map_err(|err| {
                    tracing::warn!(target_type = std::any::type_name::<T>(), error = %err, "relationship load failed");
                    err
                })
        })?;
        Ok(values)
    }

    pub fn peek(&self) -> Option<&[Arc<T>]> {
        self.slot.get().map(Vec::as_slice)
    }

    pub fn set(&mut self, values: Vec<T>) {
        self.slot = OnceCell::with_value(values.into_iter().map(Arc::new).collect());
    }

    pub fn push(&mut self, value: T) -> ModelResult<()> {
        let mut values = self.get()?.to_vec();
        values.push(Arc::new(value));
        self.slot = OnceCell::with_value(values);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.slot = OnceCell::new();
    }
}

impl<T> Default for RelatedMany<T> {
    fn default() -> Self {
        Self::unset()
    }
}

impl<T> Clone for RelatedMany<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
            loader: self.loader.clone(),
        }
    }
}

impl<T> From<Vec<T>> for RelatedMany<T> {
    fn from(values: Vec<T>) -> Self {
        Self::loaded(values)
    }
}

impl<T: Model> fmt::Debug for RelatedMany<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot.get() {
            Some(values) => {
                let reprs: Vec<String> = values.iter().map(|m| m.repr()).collect();
                write!(f, "RelatedMany([{}])", reprs.join(", "))
            }
            None if self.loader.is_some() => f.write_str("RelatedMany(<pending>)"),
            None => f.write_str("RelatedMany(<unset>)"),
        }
    }
}

fn list_value<T: Model>(values: &[Arc<T>]) -> Value {
    Value::List(
        values
            .iter()
            .map(|model| Value::Model(model.clone()))
            .collect(),
    )
}

impl<T: Model> Relationship for RelatedMany<T> {
    fn is_loaded(&self) -> bool {
        RelatedMany::is_loaded(self)
    }

    fn loaded_value(&self) -> Option<Value> {
        self.slot.get().map(|values| list_value(values))
    }

    fn load_value(&self) -> ModelResult<Value> {
        Ok(list_value(self.get()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::meta::ModelMeta;
    use crate::ToValue;
    use once_cell::sync::Lazy;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Debug)]
    struct Tag {
        name: String,
    }

    impl Model for Tag {
        fn meta() -> &'static ModelMeta {
            static META: Lazy<ModelMeta> = Lazy::new(|| {
                ModelMeta::new("Tag")
                    .with_primary_key(&["name"])
                    .with_columns(&["name"])
            });
            &META
        }

        fn model_meta(&self) -> &'static ModelMeta {
            Self::meta()
        }

        fn column_values(&self) -> Vec<(&'static str, Value)> {
            vec![("name", self.name.to_value())]
        }
    }

    fn tag(name: &str) -> Tag {
        Tag { name: name.to_string() }
    }

    #[test]
    fn test_unset_reads_as_none_without_loading() {
        let related: Related<Tag> = Related::default();
        assert!(!related.is_loaded());
        assert!(!related.is_pending());
        assert!(related.get().unwrap().is_none());
        assert!(!related.is_loaded());
        assert!(related.loaded_value().is_none());
        assert_eq!(related.load_value().unwrap(), Value::Null);
        assert_eq!(format!("{:?}", related), "Related(<unset>)");
    }

    #[test]
    fn test_lazy_loads_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let related: Related<Tag> = Related::lazy(move || -> ModelResult<Option<Tag>> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Some(tag("rust")))
        });

        assert!(related.is_pending());
        assert!(related.loaded_value().is_none());
        assert_eq!(format!("{:?}", related), "Related(<pending>)");

        assert_eq!(related.get().unwrap().map(|t| t.name.as_str()), Some("rust"));
        assert_eq!(related.load_value().unwrap().repr(), "Tag(name='rust')");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(related.is_loaded());
        assert_eq!(format!("{:?}", related), "Related(Tag(name='rust'))");
    }

    #[test]
    fn test_reset_reloads() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut related: Related<Tag> = Related::lazy(move || -> ModelResult<Option<Tag>> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Some(tag("x")))
        });
        related.get().unwrap();
        related.reset();
        assert!(related.is_pending());
        related.get().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_loader_failure_is_reported_and_not_cached() {
        let related: Related<Tag> =
            Related::lazy(|| -> ModelResult<Option<Tag>> { Err(ModelError::relationship("no session bound")) });
        let err = related.get().unwrap_err();
        assert!(matches!(err, ModelError::Relationship(_)));
        assert!(!related.is_loaded());
        assert!(related.load_value().is_err());
    }

    #[test]
    fn test_set_and_take() {
        let mut related = Related::from(tag("a"));
        assert_eq!(related.peek().flatten().map(|t| t.name.clone()), Some("a".to_string()));

        related.set(None);
        assert!(related.is_loaded());
        assert_eq!(related.loaded_value(), Some(Value::Null));

        related.set(Some(tag("b")));
        assert_eq!(related.take().map(|t| t.name.clone()), Some("b".to_string()));
        assert!(!related.is_loaded());
    }

    #[test]
    fn test_related_many() {
        let many: RelatedMany<Tag> = RelatedMany::default();
        assert!(many.get().unwrap().is_empty());
        assert!(many.loaded_value().is_none());

        let lazy: RelatedMany<Tag> = RelatedMany::lazy(|| -> ModelResult<Vec<Tag>> { Ok(vec![tag("a"), tag("b")]) });
        assert_eq!(lazy.load_value().unwrap().repr(), "[Tag(name='a'), Tag(name='b')]");
        assert!(lazy.is_loaded());

        let mut loaded = RelatedMany::from(vec![tag("a")]);
        loaded.push(tag("c")).unwrap();
        assert_eq!(loaded.peek().map(|v| v.len()), Some(2));
        assert_eq!(format!("{:?}", loaded), "RelatedMany([Tag(name='a'), Tag(name='c')])");
    }
}
