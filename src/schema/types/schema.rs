use crate::permissions::Permission;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Declares the per-field permissions of a store type.
///
/// A schema belongs to a store *type*, not to an instance: it is built once
/// when the type is defined and every instance holds a shared reference to
/// it. Fields the schema does not mention fall back to the instance's
/// default policy.
///
/// Schemas are plain data and can be loaded from JSON:
///
/// ```json
/// { "name": "Admin", "fields": { "name": "none", "user": "read-only" } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreSchema {
    /// Name identifying this schema
    pub name: String,
    /// Declared permissions keyed by field name
    #[serde(default)]
    pub fields: HashMap<String, Permission>,
}

impl StoreSchema {
    /// Creates an empty schema with the specified name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: HashMap::new(),
        }
    }

    /// Builder method declaring the permission of one field.
    #[must_use]
    pub fn with_field(mut self, field_name: impl Into<String>, permission: Permission) -> Self {
        self.declare(field_name, permission);
        self
    }

    /// Declares the permission of a field, replacing any earlier declaration.
    pub fn declare(&mut self, field_name: impl Into<String>, permission: Permission) {
        self.fields.insert(field_name.into(), permission);
    }

    /// Declared permission for `field_name`, if any.
    #[must_use]
    pub fn permission_for(&self, field_name: &str) -> Option<Permission> {
        self.fields.get(field_name).copied()
    }

    #[must_use]
    pub fn declares(&self, field_name: &str) -> bool {
        self.fields.contains_key(field_name)
    }
}
