//! # DataFold Store
//!
//! A permission-gated, path-addressable key/value store. A store is a
//! hierarchical object whose fields carry `read-only`, `write-only`,
//! `read-write` or `none` annotations, accessed through colon-delimited
//! paths (`"user:address:city"`) instead of direct field access.
//!
//! ## Core Components
//!
//! * `permissions` - The `Permission` annotation and the manager that
//!   resolves a field's effective permission
//! * `schema` - Per-type schemas (field → permission), a registry and a
//!   JSON loader
//! * `store` - The `Store` contract, the base `PermissionedStore` path engine
//!   and the delegating `AdminStore`
//! * `config` - TOML/environment configuration
//! * `logging` - Feature-targeted logging over the `log` facade
//! * `error` - Error types and handling
//!
//! ## Example
//!
//! ```rust
//! use datafold_store::{Permission, PermissionedStore, Store, StoreSchema};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let schema = Arc::new(StoreSchema::new("Settings").with_field("secret", Permission::None));
//! let mut store = PermissionedStore::builder(schema)
//!     .field("secret", json!("hunter2"))
//!     .field("profile", json!({ "address": { "city": "Lyon" } }))
//!     .build();
//!
//! assert!(store.read("secret").is_err());
//! assert_eq!(store.read("profile:address:city").unwrap().unwrap(), json!("Lyon"));
//! ```
//!
//! Stores are single-threaded: nested stores are shared through
//! `Rc<RefCell<_>>` handles and the graph has no internal locking.

pub mod config;
pub mod error;
pub mod logging;
pub mod permissions;
pub mod schema;
pub mod store;

// Re-export main types for convenience
pub use config::StoreConfig;
pub use error::{AccessKind, StoreError, StoreResult};
pub use permissions::{Permission, PermissionManager};
pub use schema::{SchemaRegistry, StoreSchema};
pub use store::{
    shared, AdminStore, Credentials, FieldMap, LazyValue, PermissionedStore, Store,
    StoreBuilder, StoreHandle, StoreValue,
};
