use datafold_store::{
    shared, AdminStore, Credentials, Permission, PermissionedStore, StoreBuilder, StoreHandle,
    StoreSchema,
};
use serde_json::json;
use std::sync::Arc;

/// Schema for the user fixture: `age` writable, `email` read-only,
/// `ssn` hidden, everything else read-write.
#[allow(dead_code)]
pub fn user_schema() -> Arc<StoreSchema> {
    Arc::new(
        StoreSchema::new("UserStore")
            .with_field("age", Permission::ReadWrite)
            .with_field("email", Permission::ReadOnly)
            .with_field("ssn", Permission::None),
    )
}

#[allow(dead_code)]
pub fn create_user_store(name: &str) -> PermissionedStore {
    StoreBuilder::new(user_schema())
        .field("name", json!(name))
        .field("email", json!("alice@example.com"))
        .field("ssn", json!("000-00-0000"))
        .field("address", json!({ "city": "Paris", "zip": "75001" }))
        .build()
}

#[allow(dead_code)]
pub fn create_shared_user_store(name: &str) -> StoreHandle {
    shared(create_user_store(name))
}

#[allow(dead_code)]
pub fn create_admin_store(user: StoreHandle) -> AdminStore {
    AdminStore::new("root-admin", user, Credentials::new("user1", "s3cret"))
}
