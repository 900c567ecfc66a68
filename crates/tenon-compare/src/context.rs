//! Comparison state threaded through the recursive walk
//!
//! Each call to [`CompareContext::different`] pushes a breadcrumb, runs the
//! comparer chosen for the pair of values and collects its report. Reports
//! of specific comparers below the root are prefixed with
//! `While comparing <path>: ` and appended after their parent's report.

use std::any::TypeId;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use tenon::{Model, Value};

use crate::comparers::{self, Comparer};
use crate::error::CompareResult;
use crate::options::CompareOptions;
use crate::registry::Registry;

pub struct CompareContext<'a> {
    options: &'a CompareOptions,
    registry: &'a Registry,
    breadcrumbs: Vec<String>,
    message: String,
    in_progress: HashSet<(Identity, Identity)>,
}

impl<'a> CompareContext<'a> {
    pub(crate) fn new(options: &'a CompareOptions, registry: &'a Registry) -> Self {
        Self {
            options,
            registry,
            breadcrumbs: Vec::new(),
            message: String::new(),
            in_progress: HashSet::new(),
        }
    }

    pub fn options(&self) -> &CompareOptions {
        self.options
    }

    /// Compare two values below the current path; true when they differ
    pub fn different(&mut self, x: &Value, y: &Value, breadcrumb: &str) -> CompareResult<bool> {
        let recursed = !self.breadcrumbs.is_empty();
        self.breadcrumbs.push(breadcrumb.to_string());
        let existing = std::mem::take(&mut self.message);

        let outcome = self.run(x, y, recursed);

        self.breadcrumbs.pop();
        match outcome {
            Ok(Some(current)) => {
                self.message = existing + &current;
                Ok(true)
            }
            Ok(None) => {
                self.message = existing;
                Ok(false)
            }
            Err(err) => {
                self.message = existing;
                Err(err)
            }
        }
    }

    fn run(&mut self, x: &Value, y: &Value, recursed: bool) -> CompareResult<Option<String>> {
        if !(self.options.strict || self.options.ignore_eq) && x == y {
            return Ok(None);
        }

        let comparer = self.lookup(x, y);
        tracing::trace!(comparer = comparer.name(), path = %self.path(), "dispatching comparer");

        let Some(result) = self.dispatch(&comparer, x, y)? else {
            return Ok(None);
        };

        // Nested simple differences are already described by their parent
        let mut current = String::new();
        if comparer.is_specific() && recursed {
            current.push_str(&format!("\n\nWhile comparing {}: ", self.path()));
        }
        if comparer.is_specific() || !recursed {
            current.push_str(&result);
            if self.options.recursive {
                current.push_str(&self.message);
            }
        }
        Ok(Some(current))
    }

    fn dispatch(&mut self, comparer: &Comparer, x: &Value, y: &Value) -> CompareResult<Option<String>> {
        match (comparer, x, y) {
            (Comparer::Model, Value::Model(a), Value::Model(b)) => {
                self.guarded(a, b, |ctx| comparers::compare_model(a.as_ref(), b.as_ref(), ctx))
            }
            (Comparer::Custom(custom), Value::Model(a), Value::Model(b)) => {
                let custom = custom.clone();
                self.guarded(a, b, |ctx| custom(a.as_ref(), b.as_ref(), ctx))
            }
            _ => comparers::run_builtin(comparer, x, y, self),
        }
    }

    /// Treat a pair of models already being compared further up as equal,
    /// so cyclic relationships terminate. Lazy loads hand out fresh copies
    /// of a row, so rows are identified by type and primary key.
    fn guarded<F>(&mut self, a: &Arc<dyn Model>, b: &Arc<dyn Model>, compare: F) -> CompareResult<Option<String>>
    where
        F: FnOnce(&mut Self) -> CompareResult<Option<String>>,
    {
        let key = (Identity::of(a), Identity::of(b));
        if self.in_progress.contains(&key) {
            tracing::trace!(path = %self.path(), "pair already being compared");
            return Ok(None);
        }
        self.in_progress.insert(key.clone());
        let result = compare(self);
        self.in_progress.remove(&key);
        result
    }

    fn lookup(&self, x: &Value, y: &Value) -> Comparer {
        if self.options.strict && !same_type(x, y) {
            return Comparer::WithType;
        }
        match (x, y) {
            (Value::Model(a), Value::Model(b)) => {
                if !a.as_ref().is_same_model(b.as_ref()) {
                    return Comparer::Simple;
                }
                match self.registry.get(a.as_ref().as_any().type_id()) {
                    Some(custom) => Comparer::Custom(custom),
                    None => Comparer::Model,
                }
            }
            (Value::Text(_), Value::Text(_)) => Comparer::Text,
            (Value::List(_), Value::List(_)) if self.options.ignore_order => Comparer::Unordered,
            (Value::List(_), Value::List(_)) => Comparer::Sequence,
            (Value::Set(_), Value::Set(_)) => Comparer::Set,
            (Value::Map(_), Value::Map(_)) => Comparer::Mapping,
            _ => Comparer::Simple,
        }
    }

    /// Attributes of a model as compared: columns, relationships when
    /// checked (loading lazy ones), minus ignored names
    pub fn model_attributes(&self, model: &dyn Model) -> CompareResult<BTreeMap<String, Value>> {
        let mut attributes: BTreeMap<String, Value> = model
            .column_values()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();

        if self.options.check_relationships {
            for (name, relationship) in model.relationships() {
                attributes.insert(name.to_string(), relationship.load_value()?);
            }
        }

        for ignored in self.options.ignored_for(model.model_name()) {
            attributes.remove(ignored);
        }
        Ok(attributes)
    }

    /// Compare two attribute mappings, reporting under `header` if given
    pub fn compare_mapping(
        &mut self,
        x: &BTreeMap<String, Value>,
        y: &BTreeMap<String, Value>,
        header: Option<&str>,
    ) -> CompareResult<Option<String>> {
        comparers::compare_mapping(x, y, header, self)
    }

    /// Render `repr` with the x label appended, if any
    pub fn label_x(&self, repr: String) -> String {
        label(repr, self.options.x_label.as_deref())
    }

    pub fn label_y(&self, repr: String) -> String {
        label(repr, self.options.y_label.as_deref())
    }

    pub fn x_name(&self) -> &str {
        self.options.x_label.as_deref().unwrap_or("first")
    }

    pub fn y_name(&self) -> &str {
        self.options.y_label.as_deref().unwrap_or("second")
    }

    fn path(&self) -> String {
        self.breadcrumbs.iter().skip(1).map(String::as_str).collect()
    }

    pub(crate) fn into_message(self) -> String {
        self.message
    }
}

/// A row when the primary key is complete, otherwise the instance itself
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Identity {
    Row(TypeId, String),
    Instance(usize),
}

impl Identity {
    fn of(model: &Arc<dyn Model>) -> Self {
        let key = model.as_ref().primary_key();
        if key.is_complete() {
            Identity::Row(model.as_ref().as_any().type_id(), key.to_string())
        } else {
            Identity::Instance(Arc::as_ptr(model) as *const () as usize)
        }
    }
}

fn label(repr: String, label: Option<&str>) -> String {
    match label {
        Some(label) => format!("{} ({})", repr, label),
        None => repr,
    }
}

fn same_type(x: &Value, y: &Value) -> bool {
    match (x, y) {
        (Value::Model(a), Value::Model(b)) => a.as_ref().is_same_model(b.as_ref()),
        _ => std::mem::discriminant(x) == std::mem::discriminant(y),
    }
}
