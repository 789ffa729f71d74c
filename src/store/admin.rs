use crate::error::{AccessKind, StoreError, StoreResult};
use crate::permissions::Permission;
use crate::schema::StoreSchema;
use crate::store::permissioned::{normalize, PermissionedStore, StoreBuilder};
use crate::store::value::{LazyValue, StoreHandle, StoreValue};
use crate::store::{read_path, split_path, write_path, Store, PATH_SEPARATOR};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::sync::Arc;

/// Field holding the delegated user store.
pub const USER_FIELD: &str = "user";
/// Field holding the admin's own name, never externally accessible.
pub const NAME_FIELD: &str = "name";
/// Lazy field producing the admin's credential store.
pub const CREDENTIALS_FIELD: &str = "getCredentials";

static ADMIN_SCHEMA: Lazy<Arc<StoreSchema>> = Lazy::new(|| {
    Arc::new(
        StoreSchema::new("AdminStore")
            .with_field(NAME_FIELD, Permission::None)
            .with_field(USER_FIELD, Permission::ReadOnly)
            .with_field(CREDENTIALS_FIELD, Permission::ReadOnly),
    )
});

static CREDENTIALS_SCHEMA: Lazy<Arc<StoreSchema>> = Lazy::new(|| {
    Arc::new(
        StoreSchema::new("Credentials")
            .with_field("username", Permission::ReadOnly)
            .with_field("password", Permission::None),
    )
});

/// Username and password handed to the admin's credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Builds a fresh credential store from these credentials.
    pub fn into_store(self) -> PermissionedStore {
        StoreBuilder::new(Arc::clone(&CREDENTIALS_SCHEMA))
            .default_policy(Permission::None)
            .field("username", Value::String(self.username))
            .field("password", Value::String(self.password))
            .build()
    }
}

/// Store that delegates to a designated user store.
///
/// Paths starting with `user` are forwarded verbatim to the user store,
/// which enforces its own permissions. A lazy field may be reached one level
/// deep (`getCredentials:username`). Any other multi-segment path is refused
/// with `NestedAccessDenied`, and keys not set on this instance are never
/// accessible. Undeclared fields default to `none`.
#[derive(Debug)]
pub struct AdminStore {
    base: PermissionedStore,
}

impl AdminStore {
    pub fn new(name: impl Into<String>, user: StoreHandle, credentials: Credentials) -> Self {
        let base = StoreBuilder::new(Self::admin_schema())
            .default_policy(Permission::None)
            .field(NAME_FIELD, Value::String(name.into()))
            .field(USER_FIELD, StoreValue::Store(user))
            .field(
                CREDENTIALS_FIELD,
                LazyValue::memoized(move || credentials.clone().into_store().into()),
            )
            .build();
        crate::log_store_info!("Created admin store delegating to a user store");
        Self { base }
    }

    /// The schema shared by every admin store.
    pub fn admin_schema() -> Arc<StoreSchema> {
        Arc::clone(&ADMIN_SCHEMA)
    }

    /// The delegated user store, if the `user` field still holds one.
    pub fn user(&self) -> Option<StoreHandle> {
        self.base.get(USER_FIELD).and_then(StoreValue::as_store).cloned()
    }

    fn delegate(&self) -> StoreResult<StoreHandle> {
        self.user()
            .ok_or_else(|| StoreError::PathNotFound(USER_FIELD.to_string()))
    }

    /// One-level reach into the result of a lazy field.
    fn read_produced(&mut self, path: &str, segments: &[&str]) -> StoreResult<Option<StoreValue>> {
        let (field, key) = (segments[0], segments[1]);
        // A denied field is reported before the depth limit.
        if !self.allowed_to_read(field) {
            crate::log_permissions_warn!("Read denied on AdminStore.{}", field);
            return Err(StoreError::denied(AccessKind::Read, field));
        }
        if segments.len() > 2 {
            return Err(StoreError::NestedAccessDenied(path.to_string()));
        }

        let lazy = match self.base.get(field) {
            Some(StoreValue::Lazy(lazy)) => lazy.clone(),
            _ => return Err(StoreError::NestedAccessDenied(path.to_string())),
        };
        crate::log_store_debug!("AdminStore reading '{}' from produced value", key);

        let inherited = self.default_policy();
        match lazy.resolve() {
            StoreValue::Store(handle) => {
                let mut produced = handle
                    .try_borrow_mut()
                    .map_err(|_| StoreError::Reentrant(field.to_string()))?;
                Ok(produced.core_mut().resolve_field(key, inherited))
            }
            StoreValue::Object(mut raw) => Ok(raw
                .remove(key)
                .map(|member| normalize(member, inherited))),
            StoreValue::Json(Value::Object(mut map)) => Ok(map
                .remove(key)
                .map(|member| normalize(StoreValue::from(member), inherited))),
            _ => Err(StoreError::NestedAccessDenied(path.to_string())),
        }
    }

    fn is_lazy_field(&self, key: &str) -> bool {
        matches!(self.base.get(key), Some(StoreValue::Lazy(_)))
    }
}

/// Everything after the first separator, unchanged.
fn remainder(path: &str) -> &str {
    path.split_once(PATH_SEPARATOR)
        .map(|(_, rest)| rest)
        .unwrap_or_default()
}

impl Store for AdminStore {
    fn core(&self) -> &PermissionedStore {
        &self.base
    }

    fn core_mut(&mut self) -> &mut PermissionedStore {
        &mut self.base
    }

    fn should_return_false_on_missing_key(&self, key: &str) -> bool {
        !self.base.contains(key)
    }

    fn read(&mut self, path: &str) -> StoreResult<Option<StoreValue>> {
        let segments = split_path(path);
        if segments.len() == 1 {
            return read_path(self, path);
        }

        if segments[0] == USER_FIELD {
            let handle = self.delegate()?;
            crate::log_store_debug!("AdminStore forwarding read '{}' to user store", path);
            let mut user = handle
                .try_borrow_mut()
                .map_err(|_| StoreError::Reentrant(USER_FIELD.to_string()))?;
            return user.read(remainder(path));
        }

        if self.is_lazy_field(segments[0]) {
            return self.read_produced(path, &segments);
        }

        crate::log_permissions_warn!("AdminStore refused nested read '{}'", path);
        Err(StoreError::NestedAccessDenied(path.to_string()))
    }

    fn write(&mut self, path: &str, value: StoreValue) -> StoreResult<StoreValue> {
        let segments = split_path(path);
        if segments.len() == 1 {
            return write_path(self, path, value);
        }

        if segments[0] == USER_FIELD {
            let handle = self.delegate()?;
            crate::log_store_debug!("AdminStore forwarding write '{}' to user store", path);
            let mut user = handle
                .try_borrow_mut()
                .map_err(|_| StoreError::Reentrant(USER_FIELD.to_string()))?;
            return user.write(remainder(path), value);
        }

        crate::log_permissions_warn!("AdminStore refused nested write '{}'", path);
        Err(StoreError::NestedAccessDenied(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::value::FieldMap;
    use serde_json::json;

    fn user_store() -> StoreHandle {
        let schema = Arc::new(StoreSchema::new("User").with_field("role", Permission::ReadOnly));
        StoreBuilder::new(schema)
            .field("name", json!("Alice"))
            .field("role", json!("member"))
            .build_shared()
    }

    fn admin() -> AdminStore {
        AdminStore::new("root", user_store(), Credentials::new("user1", "pw1"))
    }

    #[test]
    fn default_policy_is_none() {
        assert_eq!(admin().default_policy(), Permission::None);
    }

    #[test]
    fn missing_keys_are_never_allowed() {
        let admin = admin();
        assert!(admin.should_return_false_on_missing_key("unknown"));
        assert!(!admin.allowed_to_read("unknown"));
        assert!(!admin.allowed_to_write("unknown"));
        assert!(!admin.should_return_false_on_missing_key(USER_FIELD));
    }

    #[test]
    fn name_is_declared_none() {
        let mut admin = admin();
        assert!(matches!(
            admin.read(NAME_FIELD),
            Err(StoreError::PermissionDenied { .. })
        ));
        assert!(matches!(
            admin.write(NAME_FIELD, json!("other").into()),
            Err(StoreError::PermissionDenied { .. })
        ));
    }

    #[test]
    fn user_paths_are_forwarded() {
        let mut admin = admin();
        assert_eq!(admin.read("user:name").unwrap().unwrap(), json!("Alice"));
        admin.write("user:age", json!(5).into()).unwrap();
        assert_eq!(admin.read("user:age").unwrap().unwrap(), json!(5));
    }

    #[test]
    fn forwarded_paths_use_the_user_store_policy() {
        let mut admin = admin();
        assert!(matches!(
            admin.write("user:role", json!("owner").into()),
            Err(StoreError::PermissionDenied { .. })
        ));
    }

    #[test]
    fn user_field_is_read_only_on_the_admin() {
        let mut admin = admin();
        let user = admin.read(USER_FIELD).unwrap().unwrap();
        assert_eq!(user, StoreValue::Store(admin.user().unwrap()));
        assert!(admin.write(USER_FIELD, json!(null).into()).is_err());
    }

    #[test]
    fn lazy_field_is_reached_one_level_deep() {
        let mut admin = admin();
        assert_eq!(admin.read("getCredentials:username").unwrap().unwrap(), json!("user1"));
        assert!(matches!(
            admin.read("getCredentials:username:len"),
            Err(StoreError::NestedAccessDenied(_))
        ));
    }

    #[test]
    fn credential_store_is_produced_once_per_admin() {
        let mut admin = admin();
        let first = admin.read(CREDENTIALS_FIELD).unwrap().unwrap();
        let second = admin.read(CREDENTIALS_FIELD).unwrap().unwrap();
        assert_eq!(first, second);

        let mut other = AdminStore::new("other", user_store(), Credentials::new("user1", "pw1"));
        let third = other.read(CREDENTIALS_FIELD).unwrap().unwrap();
        assert_ne!(first, third);
    }

    #[test]
    fn other_nested_paths_are_refused() {
        let mut admin = admin();
        assert!(matches!(
            admin.read("name:first"),
            Err(StoreError::NestedAccessDenied(_))
        ));
        assert!(matches!(
            admin.write("getCredentials:username", json!("x").into()),
            Err(StoreError::NestedAccessDenied(_))
        ));
    }

    #[test]
    fn entries_expose_only_readable_fields() {
        let mut admin = admin();
        let entries = admin.entries();
        assert!(entries.contains_key(USER_FIELD));
        assert!(entries.contains_key(CREDENTIALS_FIELD));
        assert!(!entries.contains_key(NAME_FIELD));
    }

    #[test]
    fn produced_members_are_resolved_and_promoted() {
        let mut admin = admin();
        admin.set_default_policy(Permission::ReadOnly);
        admin.write_entries(FieldMap::from([(
            "session".to_string(),
            StoreValue::Lazy(LazyValue::new(|| {
                let mut raw = FieldMap::new();
                raw.insert(
                    "token".to_string(),
                    LazyValue::new(|| json!("abc").into()).into(),
                );
                raw.insert("scope".to_string(), json!({ "level": 2 }).into());
                StoreValue::Object(raw)
            })),
        )]));

        let token = admin.read("session:token").unwrap().unwrap();
        assert!(!matches!(token, StoreValue::Lazy(_)));
        assert_eq!(token, json!("abc"));

        let scope = admin.read("session:scope").unwrap().unwrap();
        assert!(scope.as_store().is_some());
    }

    #[test]
    fn denied_lazy_field_wins_over_depth_limit() {
        let mut admin = admin();
        admin.write_entries(FieldMap::from([(
            "hidden".to_string(),
            StoreValue::Lazy(LazyValue::new(StoreValue::null)),
        )]));
        assert!(matches!(
            admin.read("hidden:a:b"),
            Err(StoreError::PermissionDenied { .. })
        ));
    }
}
