use crate::error::{StoreError, StoreResult};
use crate::schema::types::schema::StoreSchema;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Named collection of store schemas.
///
/// Applications that define their store types from data (rather than in
/// code) register each schema here once and hand out shared references to
/// every store instance of that type.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: RwLock<HashMap<String, Arc<StoreSchema>>>,
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema under its own name.
    ///
    /// Schemas are immutable once registered, so a second registration under
    /// the same name is rejected rather than silently replacing the first.
    pub fn register(&self, schema: StoreSchema) -> StoreResult<Arc<StoreSchema>> {
        let mut schemas = self
            .schemas
            .write()
            .map_err(|_| StoreError::Schema("schema registry lock poisoned".to_string()))?;

        if schemas.contains_key(&schema.name) {
            return Err(StoreError::Schema(format!(
                "Schema {} is already registered",
                schema.name
            )));
        }

        crate::log_schema_info!(
            "Registering schema {} with {} declared fields",
            schema.name,
            schema.fields.len()
        );
        let name = schema.name.clone();
        let schema = Arc::new(schema);
        schemas.insert(name, Arc::clone(&schema));
        Ok(schema)
    }

    /// Looks up a registered schema by name.
    pub fn get(&self, name: &str) -> StoreResult<Arc<StoreSchema>> {
        let schemas = self
            .schemas
            .read()
            .map_err(|_| StoreError::Schema("schema registry lock poisoned".to_string()))?;
        schemas
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::Schema(format!("Schema {} not found", name)))
    }

    /// Names of all registered schemas, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .schemas
            .read()
            .map(|schemas| schemas.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}
