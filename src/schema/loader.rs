use crate::error::StoreResult;
use crate::schema::registry::SchemaRegistry;
use crate::schema::types::schema::StoreSchema;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Loads a schema from a JSON file into a registry.
///
/// # Errors
///
/// Returns an error if:
/// * The file cannot be read
/// * The file content is not a valid schema definition
/// * A schema with the same name is already registered
pub fn load_schema_from_file<P: AsRef<Path>>(
    path: P,
    registry: &SchemaRegistry,
) -> StoreResult<Arc<StoreSchema>> {
    crate::log_schema_debug!("Loading schema from {}", path.as_ref().display());
    let schema_str = fs::read_to_string(path.as_ref())?;
    let schema: StoreSchema = serde_json::from_str(&schema_str)?;
    registry.register(schema)
}

/// Loads every `*.json` schema in a directory, in file-name order.
pub fn load_schemas_from_dir<P: AsRef<Path>>(
    dir: P,
    registry: &SchemaRegistry,
) -> StoreResult<Vec<Arc<StoreSchema>>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();

    paths
        .iter()
        .map(|path| load_schema_from_file(path, registry))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::permissions::Permission;

    #[test]
    fn loads_schema_file_into_registry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(
            &path,
            r#"{"name": "Credentials", "fields": {"password": "none"}}"#,
        )
        .unwrap();

        let registry = SchemaRegistry::new();
        let schema = load_schema_from_file(&path, &registry).unwrap();
        assert_eq!(schema.permission_for("password"), Some(Permission::None));
        assert!(registry.get("Credentials").is_ok());
    }

    #[test]
    fn invalid_permission_spelling_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"name": "Bad", "fields": {"x": "readonly"}}"#).unwrap();

        let err = load_schema_from_file(&path, &SchemaRegistry::new()).unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[test]
    fn directory_load_skips_non_json_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.json"), r#"{"name": "B"}"#).unwrap();
        fs::write(dir.path().join("a.json"), r#"{"name": "A"}"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let registry = SchemaRegistry::new();
        let loaded = load_schemas_from_dir(dir.path(), &registry).unwrap();
        let names: Vec<_> = loaded.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
