//! # tenon-compare
//!
//! Structural comparison of values and tenon models with failure messages
//! that say where two values differ, not only that they do.
//!
//! ```ignore
//! use tenon_compare::{compare_with, CompareOptions};
//!
//! let options = CompareOptions::new().with_check_relationships(true);
//! compare_with(&from_db, &expected, &options)?;
//! ```
//!
//! Model instances are compared attribute by attribute. Relationships are
//! only compared with `check_relationships`, in which case lazy ones are
//! loaded on demand.

pub mod comparers;
pub mod context;
pub mod diff;
pub mod error;
pub mod options;
pub mod registry;

pub use comparers::compare_model;
pub use context::CompareContext;
pub use error::{CompareError, CompareResult};
pub use options::CompareOptions;
pub use registry::{CustomComparer, Registry};

use tenon::{Model, ToValue, Value};

/// A configured comparison: options plus per-model comparers
#[derive(Debug, Clone, Default)]
pub struct Comparison {
    options: CompareOptions,
    registry: Registry,
}

impl Comparison {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CompareOptions) -> Self {
        Self {
            options,
            registry: Registry::new(),
        }
    }

    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    /// Replace the default comparison for model type `T`
    pub fn register<T, F>(mut self, comparer: F) -> Self
    where
        T: Model,
        F: Fn(&T, &T, &mut CompareContext<'_>) -> CompareResult<Option<String>> + Send + Sync + 'static,
    {
        self.registry.register::<T, F>(comparer);
        self
    }

    pub fn compare<X, Y>(&self, x: &X, y: &Y) -> CompareResult<()>
    where
        X: ToValue + ?Sized,
        Y: ToValue + ?Sized,
    {
        self.compare_values(&x.to_value(), &y.to_value())
    }

    pub fn compare_values(&self, x: &Value, y: &Value) -> CompareResult<()> {
        let mut ctx = CompareContext::new(&self.options, &self.registry);
        if !ctx.different(x, y, "")? {
            return Ok(());
        }

        let mut message = ctx.into_message();
        if let Some(prefix) = &self.options.prefix {
            message = format!("{}: {}", prefix, message);
        }
        tracing::debug!(x = %x, y = %y, "values differ");
        Err(CompareError::Mismatch(message))
    }
}

/// Compare two values with default options
pub fn compare<X, Y>(x: &X, y: &Y) -> CompareResult<()>
where
    X: ToValue + ?Sized,
    Y: ToValue + ?Sized,
{
    Comparison::new().compare(x, y)
}

pub fn compare_with<X, Y>(x: &X, y: &Y, options: &CompareOptions) -> CompareResult<()>
where
    X: ToValue + ?Sized,
    Y: ToValue + ?Sized,
{
    Comparison::with_options(options.clone()).compare(x, y)
}

/// Assert two values compare equal, panicking with the comparison report
///
/// ```ignore
/// assert_compare!(loaded, expected);
/// assert_compare!(loaded, expected, CompareOptions::new().with_strict(true));
/// ```
#[macro_export]
macro_rules! assert_compare {
    ($x:expr, $y:expr $(,)?) => {
        $crate::assert_compare!($x, $y, $crate::CompareOptions::default())
    };
    ($x:expr, $y:expr, $options:expr $(,)?) => {
        match $crate::compare_with(&$x, &$y, &$options) {
            Ok(()) => {}
            Err(err) => panic!("{}", err),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};

    fn mismatch(result: CompareResult<()>) -> String {
        match result {
            Err(CompareError::Mismatch(message)) => message,
            other => panic!("expected a mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_equal_values() {
        assert!(compare(&1i64, &1i64).is_ok());
        assert!(compare(&vec![1i64, 2], &vec![1i64, 2]).is_ok());
        assert!(compare("abc", "abc").is_ok());
    }

    #[test]
    fn test_simple() {
        assert_eq!(mismatch(compare(&1i64, &2i64)), "1 != 2");
        assert_eq!(mismatch(compare(&true, &Value::Null)), "True != None");
    }

    #[test]
    fn test_labels() {
        let options = CompareOptions::new().with_labels("expected", "actual");
        assert_eq!(
            mismatch(compare_with(&1i64, &2i64, &options)),
            "1 (expected) != 2 (actual)"
        );
    }

    #[test]
    fn test_prefix() {
        let options = CompareOptions::new().with_prefix("wrong");
        assert_eq!(mismatch(compare_with(&1i64, &2i64, &options)), "wrong: 1 != 2");
    }

    #[test]
    fn test_strict_types() {
        let options = CompareOptions::new().with_strict(true);
        assert!(compare(&1i64, &1.0f64).is_ok());
        assert_eq!(
            mismatch(compare_with(&1i64, &1.0f64, &options)),
            "1 (<class 'int'>) != 1.0 (<class 'float'>)"
        );
    }

    #[test]
    fn test_short_text() {
        assert_eq!(mismatch(compare("abc", "abd")), "'abc' != 'abd'");
    }

    #[test]
    fn test_long_text() {
        assert_eq!(
            mismatch(compare("this is long", "this is longer")),
            "\n'this is long'\n!=\n'this is longer'"
        );
    }

    #[test]
    fn test_multiline_text() {
        assert_eq!(
            mismatch(compare("line one\nline two", "line one\nline 2")),
            "\n--- first\n+++ second\n@@ -1,2 +1,2 @@\n line one\n-line two\n+line 2"
        );
    }

    #[test]
    fn test_sequence() {
        assert_eq!(
            mismatch(compare(&vec![1i64, 2, 3], &vec![1i64, 2, 4])),
            "sequence not as expected:\n\nsame:\n[1, 2]\n\nfirst:\n[3]\n\nsecond:\n[4]"
        );
    }

    #[test]
    fn test_nested_sequence_reports_path() {
        let x = vec![vec!["a".to_string()], vec!["b".to_string()]];
        let y = vec![vec!["a".to_string()], vec!["c".to_string()]];
        assert_eq!(
            mismatch(compare(&x, &y)),
            "sequence not as expected:\n\nsame:\n[['a']]\n\nfirst:\n[['b']]\n\nsecond:\n[['c']]\
             \n\nWhile comparing [1]: sequence not as expected:\n\nsame:\n[]\n\nfirst:\n['b']\n\nsecond:\n['c']\
             \n\nWhile comparing [1][0]: 'b' != 'c'"
        );
    }

    #[test]
    fn test_not_recursive() {
        let x = vec![vec![1i64]];
        let y = vec![vec![2i64]];
        let options = CompareOptions::new().with_recursive(false);
        assert_eq!(
            mismatch(compare_with(&x, &y, &options)),
            "sequence not as expected:\n\nsame:\n[]\n\nfirst:\n[[1]]\n\nsecond:\n[[2]]"
        );
    }

    #[test]
    fn test_ignore_order() {
        let options = CompareOptions::new().with_ignore_order(true);
        assert!(compare_with(&vec![1i64, 2], &vec![2i64, 1], &options).is_ok());
        assert_eq!(
            mismatch(compare_with(&vec![1i64, 2], &vec![2i64, 3], &options)),
            "sequence not as expected:\n\nin first but not second:\n[1]\n\nin second but not first:\n[3]\n\n"
        );
    }

    #[test]
    fn test_set() {
        let x: BTreeSet<i64> = [1, 2].into_iter().collect();
        let y: BTreeSet<i64> = [2, 3].into_iter().collect();
        assert_eq!(
            mismatch(compare(&x, &y)),
            "set not as expected:\n\nin first but not second:\n[1]\n\nin second but not first:\n[3]\n\n"
        );
    }

    #[test]
    fn test_dict() {
        let mut x = BTreeMap::new();
        x.insert("a".to_string(), 1i64);
        x.insert("b".to_string(), 2i64);
        let mut y = BTreeMap::new();
        y.insert("a".to_string(), 1i64);
        y.insert("b".to_string(), 3i64);
        y.insert("c".to_string(), 4i64);
        assert_eq!(
            mismatch(compare(&x, &y)),
            "dict not as expected:\n\nsame:\n['a']\n\nin second but not first:\n'c': 4\n\nvalues differ:\n'b': 2 != 3"
        );
    }

    #[test]
    fn test_mismatch_display() {
        let err = compare(&1i64, &2i64).unwrap_err();
        assert_eq!(err.to_string(), "1 != 2");
        assert_eq!(err.message(), Some("1 != 2"));
    }

    #[test]
    #[should_panic(expected = "1 != 2")]
    fn test_assert_compare_panics() {
        assert_compare!(1i64, 2i64);
    }
}
