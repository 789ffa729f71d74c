use crate::permissions::types::policy::Permission;
use crate::schema::StoreSchema;

/// Resolves and enforces field permissions for a store.
///
/// The manager is stateless: every decision is derived from the store's
/// schema (declared per-field permissions) and the store's default policy,
/// which fills in for any field the schema does not mention.
#[derive(Debug, Default, Clone, Copy)]
pub struct PermissionManager {}

impl PermissionManager {
    /// Creates a new PermissionManager instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the permission actually enforced for `key`: the declared
    /// permission if the schema has one, otherwise `default_policy`.
    #[must_use]
    pub fn effective_permission(
        &self,
        schema: &StoreSchema,
        default_policy: Permission,
        key: &str,
    ) -> Permission {
        schema.permission_for(key).unwrap_or(default_policy)
    }

    /// Checks whether `key` may be read under the given schema and default.
    #[must_use]
    pub fn has_read_permission(
        &self,
        schema: &StoreSchema,
        default_policy: Permission,
        key: &str,
    ) -> bool {
        let permission = self.effective_permission(schema, default_policy, key);
        let allowed = permission.allows_read();
        crate::log_permissions_debug!(
            "Read check on {}.{}: {} -> {}",
            schema.name,
            key,
            permission,
            allowed
        );
        allowed
    }

    /// Checks whether `key` may be written under the given schema and default.
    #[must_use]
    pub fn has_write_permission(
        &self,
        schema: &StoreSchema,
        default_policy: Permission,
        key: &str,
    ) -> bool {
        let permission = self.effective_permission(schema, default_policy, key);
        let allowed = permission.allows_write();
        crate::log_permissions_debug!(
            "Write check on {}.{}: {} -> {}",
            schema.name,
            key,
            permission,
            allowed
        );
        allowed
    }
}
