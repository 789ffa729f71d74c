//! # Permission-gated stores
//!
//! A store is a node in a tree of permission-annotated data. Every store
//! exposes the same contract, the [`Store`] trait: permission predicates,
//! colon-delimited path `read`/`write`, trusted bulk initialization through
//! `write_entries`, and the `entries` projection.
//!
//! The path engine lives in [`PermissionedStore`]; specialized stores such as
//! [`AdminStore`] wrap one and override the parts of the contract they
//! narrow.

pub mod admin;
pub mod permissioned;
pub mod value;

pub use admin::{AdminStore, Credentials};
pub use permissioned::{PermissionedStore, StoreBuilder};
pub use value::{shared, FieldMap, LazyValue, StoreHandle, StoreValue};

use crate::error::{AccessKind, StoreError, StoreResult};
use crate::permissions::{Permission, PermissionManager};
use crate::schema::StoreSchema;
use std::fmt;

/// Separator between the segments of a store path.
pub const PATH_SEPARATOR: char = ':';

/// Splits a path into its segments.
///
/// Empty segments are kept as literal field names; they normally resolve to
/// nothing and surface as `PathNotFound`.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split(PATH_SEPARATOR).collect()
}

/// The contract shared by every store.
///
/// Implementors only provide access to their underlying [`PermissionedStore`];
/// everything else has a default that runs the base engine. Specialized
/// stores override the predicates or the path operations and fall back to
/// [`read_path`] / [`write_path`] for the cases they do not change.
pub trait Store: fmt::Debug {
    /// The engine state (schema, default policy, fields) backing this store.
    fn core(&self) -> &PermissionedStore;

    fn core_mut(&mut self) -> &mut PermissionedStore;

    fn schema(&self) -> &StoreSchema {
        self.core().schema()
    }

    fn default_policy(&self) -> Permission {
        self.core().default_policy()
    }

    /// Changes the policy for undeclared fields. Stores already promoted from
    /// this one keep the policy they inherited.
    fn set_default_policy(&mut self, policy: Permission) {
        self.core_mut().set_default_policy(policy);
    }

    fn has_field(&self, key: &str) -> bool {
        self.core().contains(key)
    }

    /// Names of the fields currently set on this instance, sorted.
    fn field_names(&self) -> Vec<String> {
        self.core().names()
    }

    /// Declared permission of `key`, else the default policy.
    fn effective_permission(&self, key: &str) -> Permission {
        PermissionManager::new().effective_permission(self.schema(), self.default_policy(), key)
    }

    /// When true, `key` is inaccessible regardless of its permission.
    fn should_return_false_on_missing_key(&self, _key: &str) -> bool {
        false
    }

    fn allowed_to_read(&self, key: &str) -> bool {
        if self.should_return_false_on_missing_key(key) {
            return false;
        }
        PermissionManager::new().has_read_permission(self.schema(), self.default_policy(), key)
    }

    fn allowed_to_write(&self, key: &str) -> bool {
        if self.should_return_false_on_missing_key(key) {
            return false;
        }
        PermissionManager::new().has_write_permission(self.schema(), self.default_policy(), key)
    }

    /// Reads the value at `path`.
    ///
    /// Returns `Ok(None)` when the last segment names nothing. Lazy fields are
    /// resolved, and raw nested objects are promoted to stores on the way.
    fn read(&mut self, path: &str) -> StoreResult<Option<StoreValue>> {
        read_path(self, path)
    }

    /// Writes `value` at `path`, creating missing intermediate objects, and
    /// returns the value written.
    fn write(&mut self, path: &str, value: StoreValue) -> StoreResult<StoreValue> {
        write_path(self, path, value)
    }

    /// Reads a single field by name without path parsing, under the same
    /// policy as `read`.
    fn read_field(&mut self, key: &str) -> StoreResult<Option<StoreValue>> {
        ensure_readable(self, key)?;
        let inherited = self.default_policy();
        Ok(self.core_mut().resolve_field(key, inherited))
    }

    /// Writes a single field by name without path parsing, under the same
    /// policy as `write`.
    fn write_field(&mut self, key: &str, value: StoreValue) -> StoreResult<StoreValue> {
        ensure_writable(self, key)?;
        self.core_mut().insert(key, value.clone());
        Ok(value)
    }

    /// Trusted bulk initialization: assigns every entry, bypassing permissions.
    fn write_entries(&mut self, entries: FieldMap) {
        self.core_mut().extend(entries);
    }

    /// Snapshot of every field whose effective permission is not `none`.
    ///
    /// Fields that fail to read (write-only fields, for instance) are left
    /// out rather than failing the whole snapshot. Values are shallow: nested
    /// stores are returned as shared handles.
    fn entries(&mut self) -> FieldMap {
        let mut snapshot = FieldMap::new();
        for name in self.field_names() {
            if self.effective_permission(&name) == Permission::None {
                continue;
            }
            match self.read_field(&name) {
                Ok(Some(value)) => {
                    snapshot.insert(name, value);
                }
                Ok(None) => {}
                Err(e) => {
                    crate::log_store_debug!("Omitting '{}' from entries: {}", name, e);
                }
            }
        }
        snapshot
    }
}

fn ensure_readable<S: Store + ?Sized>(store: &S, key: &str) -> StoreResult<()> {
    if store.allowed_to_read(key) {
        return Ok(());
    }
    crate::log_permissions_warn!("Read denied on {}.{}", store.schema().name, key);
    Err(StoreError::denied(AccessKind::Read, key))
}

fn ensure_writable<S: Store + ?Sized>(store: &S, key: &str) -> StoreResult<()> {
    if store.allowed_to_write(key) {
        return Ok(());
    }
    crate::log_permissions_warn!("Write denied on {}.{}", store.schema().name, key);
    Err(StoreError::denied(AccessKind::Write, key))
}

/// The base read algorithm.
///
/// This store checks the first segment. Raw objects and JSON below it are
/// walked directly; a nested store receives the rest of the path through its
/// own `read` and checks it under its own policy.
pub fn read_path<S: Store + ?Sized>(store: &mut S, path: &str) -> StoreResult<Option<StoreValue>> {
    let segments = split_path(path);
    ensure_readable(store, segments[0])?;
    crate::log_store_debug!("Reading '{}' from {}", path, store.schema().name);
    store.core_mut().traverse(&segments)
}

/// The base write algorithm.
///
/// Permission is checked against the first segment, and again by any nested
/// store the rest of the path is handed to.
pub fn write_path<S: Store + ?Sized>(
    store: &mut S,
    path: &str,
    value: StoreValue,
) -> StoreResult<StoreValue> {
    let segments = split_path(path);
    ensure_writable(store, segments[0])?;
    crate::log_store_debug!("Writing '{}' on {}", path, store.schema().name);
    store.core_mut().assign(&segments, value.clone())?;
    Ok(value)
}
