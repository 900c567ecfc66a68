//! Per-model comparers registered by the caller

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use tenon::Model;

use crate::context::CompareContext;
use crate::error::CompareResult;

/// Type-erased comparer for two models of one registered type
pub type CustomComparer = Arc<
    dyn Fn(&dyn Model, &dyn Model, &mut CompareContext<'_>) -> CompareResult<Option<String>>
        + Send
        + Sync,
>;

#[derive(Clone, Default)]
pub struct Registry {
    comparers: HashMap<TypeId, CustomComparer>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `comparer` for every pair of `T` instances met during a comparison
    pub fn register<T, F>(&mut self, comparer: F)
    where
        T: Model,
        F: Fn(&T, &T, &mut CompareContext<'_>) -> CompareResult<Option<String>> + Send + Sync + 'static,
    {
        let erased: CustomComparer = Arc::new(
            move |x: &dyn Model, y: &dyn Model, ctx: &mut CompareContext<'_>| {
                match (x.as_any().downcast_ref::<T>(), y.as_any().downcast_ref::<T>()) {
                    (Some(x), Some(y)) => comparer(x, y, ctx),
                    _ => crate::comparers::compare_model(x, y, ctx),
                }
            },
        );
        tracing::debug!(model = T::meta().name(), "registered custom comparer");
        self.comparers.insert(TypeId::of::<T>(), erased);
    }

    pub fn get(&self, type_id: TypeId) -> Option<CustomComparer> {
        self.comparers.get(&type_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.comparers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comparers.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("comparers", &self.comparers.len())
            .finish()
    }
}
