//! # tenon: model mixin for ORM entities
//!
//! Adds the boilerplate every mapped entity needs on top of the ORM:
//!
//! - a default table name derived from the type name,
//! - structural equality between instances of the same model type,
//! - `Name(key=value, ...)` representations built from the primary key,
//! - introspection hooks (columns, lazy relationships) for structural
//!   comparison tools such as `tenon-compare`.
//!
//! ```ignore
//! use tenon::{Model, Related};
//!
//! #[derive(Clone, Model)]
//! struct AnotherModel {
//!     id: Option<i64>,
//!     attr: Option<i64>,
//!     other_id: Option<i64>,
//!     #[model(relationship)]
//!     other: Related<Parent>,
//! }
//!
//! assert_eq!(AnotherModel::table_name(), "anothermodel");
//! ```

extern crate self as tenon;

pub mod config;
pub mod error;
pub mod meta;
pub mod model;
pub mod naming;
pub mod primary_key;
pub mod relation;
pub mod value;

pub use config::MixinConfig;
pub use error::{ModelError, ModelResult};
pub use meta::ModelMeta;
pub use model::{AsAny, FieldMap, Model};
pub use naming::NamingConvention;
pub use primary_key::PrimaryKey;
pub use relation::{Related, RelatedMany, RelationLoader, Relationship};
pub use value::{ToValue, Value};

/// Derive macro generating `Model`, `PartialEq`, `Debug`, `Display` and `ToValue`
pub use tenon_derive::Model;

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
}
