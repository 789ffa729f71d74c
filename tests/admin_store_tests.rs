use datafold_store::{
    shared, AdminStore, Credentials, Permission, PermissionedStore, Store, StoreError,
    StoreSchema, StoreValue,
};
use serde_json::json;
use std::rc::Rc;
use std::sync::Arc;

mod test_data;
use test_data::test_helpers::store_builder::{create_admin_store, create_shared_user_store};

#[test]
fn test_admin_reads_user_name_through_delegation() {
    let user = create_shared_user_store("Alice");
    let mut admin = create_admin_store(user);

    assert_eq!(admin.read("user:name").unwrap().unwrap(), json!("Alice"));
}

#[test]
fn test_admin_own_name_is_not_readable() {
    let mut admin = create_admin_store(create_shared_user_store("Alice"));

    assert!(!admin.allowed_to_read("name"));
    assert!(matches!(
        admin.read("name"),
        Err(StoreError::PermissionDenied { .. })
    ));
}

#[test]
fn test_writes_are_forwarded_to_the_user_store() {
    let user = create_shared_user_store("Alice");
    let mut admin = create_admin_store(Rc::clone(&user));

    admin.write("user:age", json!(42).into()).unwrap();

    assert_eq!(user.borrow_mut().read("age").unwrap().unwrap(), json!(42));
}

#[test]
fn test_user_store_policy_still_applies_when_delegated() {
    let mut admin = create_admin_store(create_shared_user_store("Alice"));

    assert!(matches!(
        admin.read("user:ssn"),
        Err(StoreError::PermissionDenied { .. })
    ));
    assert!(matches!(
        admin.write("user:email", json!("eve@example.com").into()),
        Err(StoreError::PermissionDenied { .. })
    ));
}

#[test]
fn test_delegated_nested_paths_reach_promoted_objects() {
    let mut admin = create_admin_store(create_shared_user_store("Alice"));

    assert_eq!(admin.read("user:address:city").unwrap().unwrap(), json!("Paris"));
    admin.write("user:address:city", json!("Lyon").into()).unwrap();
    assert_eq!(admin.read("user:address:city").unwrap().unwrap(), json!("Lyon"));
}

#[test]
fn test_credentials_are_reachable_one_level_deep() {
    let mut admin = create_admin_store(create_shared_user_store("Alice"));

    assert_eq!(
        admin.read("getCredentials:username").unwrap().unwrap(),
        json!("user1")
    );
}

#[test]
fn test_credentials_field_yields_a_store() {
    let mut admin = create_admin_store(create_shared_user_store("Alice"));

    let produced = admin.read("getCredentials").unwrap().unwrap();
    let handle = produced.as_store().expect("credentials should be a store");
    let mut credentials = handle.borrow_mut();

    assert_eq!(credentials.read("username").unwrap().unwrap(), json!("user1"));
    assert!(credentials.read("password").is_err());
}

#[test]
fn test_unknown_keys_are_inaccessible() {
    let mut admin = create_admin_store(create_shared_user_store("Alice"));

    assert!(!admin.allowed_to_read("anything"));
    assert!(!admin.allowed_to_write("anything"));
    assert!(admin.read("anything").is_err());
    assert!(admin.write("anything", json!(1).into()).is_err());
}

#[test]
fn test_other_nested_paths_are_refused() {
    let mut admin = create_admin_store(create_shared_user_store("Alice"));

    let err = admin.read("name:first").unwrap_err();
    assert!(matches!(err, StoreError::NestedAccessDenied(ref path) if path == "name:first"));
    assert!(matches!(
        admin.write("name:first", json!("x").into()),
        Err(StoreError::NestedAccessDenied(_))
    ));
}

#[test]
fn test_admin_of_an_admin_forwards_twice() {
    let inner = shared(create_admin_store(create_shared_user_store("Alice")));
    let mut outer = AdminStore::new("outer", inner, Credentials::new("root", "toor"));

    assert_eq!(outer.read("user:user:name").unwrap().unwrap(), json!("Alice"));
    assert!(matches!(
        outer.read("user:name"),
        Err(StoreError::PermissionDenied { .. })
    ));
}

#[test]
fn test_user_store_with_none_default() {
    let schema = Arc::new(StoreSchema::new("Locked").with_field("visible", Permission::ReadOnly));
    let user = PermissionedStore::builder(schema)
        .default_policy(Permission::None)
        .field("visible", json!("yes"))
        .field("hidden", json!("no"))
        .build_shared();
    let mut admin = AdminStore::new("root", user, Credentials::new("user1", "pw"));

    assert_eq!(admin.read("user:visible").unwrap().unwrap(), json!("yes"));
    assert!(admin.read("user:hidden").is_err());
}

#[test]
fn test_entries_hide_admin_name() {
    let mut admin = create_admin_store(create_shared_user_store("Alice"));
    let entries = admin.entries();

    assert!(!entries.contains_key("name"));
    assert!(matches!(entries.get("user"), Some(StoreValue::Store(_))));
}

#[test]
fn test_embedded_admin_keeps_its_narrowing() {
    let admin = create_admin_store(create_shared_user_store("Alice"));
    let mut root = PermissionedStore::builder(Arc::new(StoreSchema::new("Root")))
        .field("admin", shared(admin))
        .build();

    assert!(matches!(
        root.read("admin:name"),
        Err(StoreError::PermissionDenied { .. })
    ));
    assert!(matches!(
        root.write("admin:name", json!("eve").into()),
        Err(StoreError::PermissionDenied { .. })
    ));
    assert!(matches!(
        root.read("admin:anything"),
        Err(StoreError::PermissionDenied { .. })
    ));
    assert!(matches!(
        root.read("admin:getCredentials:username:len"),
        Err(StoreError::NestedAccessDenied(_))
    ));

    assert_eq!(root.read("admin:user:name").unwrap().unwrap(), json!("Alice"));
    assert_eq!(
        root.read("admin:getCredentials:username").unwrap().unwrap(),
        json!("user1")
    );
}
