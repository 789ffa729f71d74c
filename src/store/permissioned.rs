use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::permissions::Permission;
use crate::schema::StoreSchema;
use crate::store::value::{shared, FieldMap, StoreHandle, StoreValue};
use crate::store::{Store, PATH_SEPARATOR};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::sync::Arc;

/// Schema given to stores promoted from raw nested objects. It declares
/// nothing, so every field follows the inherited default policy.
static PROMOTED_SCHEMA: Lazy<Arc<StoreSchema>> = Lazy::new(|| Arc::new(StoreSchema::new("Object")));

/// The base store and path engine.
///
/// Holds a shared schema (declared per-field permissions), the default policy
/// for undeclared fields, and the live field values. Fields are private: all
/// access goes through the [`Store`] contract, and initialization that must
/// bypass permissions goes through [`StoreBuilder`] or `write_entries`.
#[derive(Debug, Clone)]
pub struct PermissionedStore {
    schema: Arc<StoreSchema>,
    default_policy: Permission,
    fields: FieldMap,
}

impl PermissionedStore {
    /// Creates an empty store of the given type with a `read-write` default.
    #[must_use]
    pub fn new(schema: Arc<StoreSchema>) -> Self {
        Self {
            schema,
            default_policy: Permission::default(),
            fields: FieldMap::new(),
        }
    }

    #[must_use]
    pub fn builder(schema: Arc<StoreSchema>) -> StoreBuilder {
        StoreBuilder::new(schema)
    }

    /// Converts a raw nested object into a store that inherits `inherited`
    /// as its default policy.
    pub fn promote(raw: FieldMap, inherited: Permission) -> StoreHandle {
        crate::log_store_debug!(
            "Promoting nested object with {} fields (default policy {})",
            raw.len(),
            inherited
        );
        shared(Self {
            schema: Arc::clone(&PROMOTED_SCHEMA),
            default_policy: inherited,
            fields: raw,
        })
    }

    pub fn schema(&self) -> &StoreSchema {
        &self.schema
    }

    pub fn default_policy(&self) -> Permission {
        self.default_policy
    }

    pub fn set_default_policy(&mut self, policy: Permission) {
        crate::log_permissions_info!(
            "Default policy of {} changed from {} to {}",
            self.schema.name,
            self.default_policy,
            policy
        );
        self.default_policy = policy;
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub(crate) fn names(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }

    pub(crate) fn get(&self, key: &str) -> Option<&StoreValue> {
        self.fields.get(key)
    }

    pub(crate) fn insert(&mut self, key: &str, value: StoreValue) {
        self.fields.insert(key.to_string(), value);
    }

    pub(crate) fn extend(&mut self, entries: FieldMap) {
        self.fields.extend(entries);
    }

    /// Looks up one field without any permission check.
    ///
    /// A lazy field yields its producer's result. A raw object (whether held
    /// directly or produced) is promoted; when held directly the promotion
    /// replaces the field, so later reads see the same store.
    pub(crate) fn resolve_field(&mut self, key: &str, inherited: Permission) -> Option<StoreValue> {
        let slot = self.fields.get_mut(key)?;
        match slot {
            StoreValue::Lazy(lazy) => {
                let lazy = lazy.clone();
                crate::log_store_debug!("Resolving lazy field '{}'", key);
                Some(normalize(lazy.resolve(), inherited))
            }
            StoreValue::Object(_) | StoreValue::Json(Value::Object(_)) => {
                let raw = std::mem::replace(slot, StoreValue::null());
                let promoted = normalize(raw, inherited);
                *slot = promoted.clone();
                Some(promoted)
            }
            other => Some(other.clone()),
        }
    }

    /// Walks `segments`, starting at this store's own fields.
    ///
    /// Once the walk reaches a nested store, the remaining segments are handed
    /// to that store's own `read`, so its policy and overrides apply.
    pub(crate) fn traverse(&mut self, segments: &[&str]) -> StoreResult<Option<StoreValue>> {
        let inherited = self.default_policy;
        let (first, rest) = match segments.split_first() {
            Some(split) => split,
            None => return Ok(None),
        };

        let mut current = found_or_missing(first, self.resolve_field(first, inherited))?;
        for (index, segment) in rest.iter().enumerate() {
            let node = match current {
                None => return Err(StoreError::PathNotFound(segment.to_string())),
                Some(value) if value.is_null() => {
                    return Err(StoreError::PathNotFound(segment.to_string()))
                }
                Some(value) => normalize(value, inherited),
            };

            let next = match node {
                StoreValue::Store(handle) => {
                    let mut child = handle.try_borrow_mut().map_err(|_| {
                        crate::log_store_warn!("Cyclic path reached '{}' twice", segment);
                        StoreError::Reentrant(segment.to_string())
                    })?;
                    return child.read(&join_path(&rest[index..]));
                }
                StoreValue::Json(value) => json_child(&value, segment).map(StoreValue::Json),
                StoreValue::Object(_) | StoreValue::Lazy(_) => None,
            };
            current = found_or_missing(segment, next)?;
        }
        Ok(current)
    }

    /// Assigns `value` at `segments` below this store, creating empty objects
    /// for missing or null intermediates. The caller has already checked the
    /// first segment; a nested store on the way gets the rest as a `write`.
    pub(crate) fn assign(&mut self, segments: &[&str], value: StoreValue) -> StoreResult<()> {
        assign_into(&mut self.fields, segments, value)
    }
}

impl Store for PermissionedStore {
    fn core(&self) -> &PermissionedStore {
        self
    }

    fn core_mut(&mut self) -> &mut PermissionedStore {
        self
    }
}

impl From<PermissionedStore> for StoreValue {
    fn from(store: PermissionedStore) -> Self {
        StoreValue::Store(shared(store))
    }
}

/// An empty segment that names nothing is reported rather than yielding
/// `None`, since it can only come from a malformed path.
fn found_or_missing(segment: &str, value: Option<StoreValue>) -> StoreResult<Option<StoreValue>> {
    if value.is_none() && segment.is_empty() {
        return Err(StoreError::PathNotFound(String::new()));
    }
    Ok(value)
}

fn join_path(segments: &[&str]) -> String {
    segments.join(&PATH_SEPARATOR.to_string())
}

/// Resolves producers and promotes raw objects, without storing the result.
pub(crate) fn normalize(value: StoreValue, inherited: Permission) -> StoreValue {
    match value {
        StoreValue::Lazy(lazy) => normalize(lazy.resolve(), inherited),
        StoreValue::Object(raw) => StoreValue::Store(PermissionedStore::promote(raw, inherited)),
        StoreValue::Json(Value::Object(map)) => {
            let raw = map
                .into_iter()
                .map(|(key, value)| (key, StoreValue::from(value)))
                .collect();
            StoreValue::Store(PermissionedStore::promote(raw, inherited))
        }
        other => other,
    }
}

/// Property lookup on JSON data: array elements by decimal index.
fn json_child(value: &Value, segment: &str) -> Option<Value> {
    match value {
        Value::Array(items) => segment
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index))
            .cloned(),
        Value::Object(map) => map.get(segment).cloned(),
        _ => None,
    }
}

fn assign_into(fields: &mut FieldMap, segments: &[&str], value: StoreValue) -> StoreResult<()> {
    let (key, rest) = match segments.split_first() {
        Some(split) => split,
        None => return Err(StoreError::PathNotFound(String::new())),
    };

    if rest.is_empty() {
        fields.insert(key.to_string(), value);
        return Ok(());
    }

    let slot = fields
        .entry(key.to_string())
        .or_insert_with(|| StoreValue::Object(FieldMap::new()));
    if slot.is_null() {
        *slot = StoreValue::Object(FieldMap::new());
    }
    if let StoreValue::Json(Value::Object(map)) = slot {
        let raw = std::mem::take(map)
            .into_iter()
            .map(|(key, value)| (key, StoreValue::from(value)))
            .collect();
        *slot = StoreValue::Object(raw);
    }

    match slot {
        StoreValue::Object(nested) => assign_into(nested, rest, value),
        StoreValue::Store(handle) => {
            let mut child = handle
                .try_borrow_mut()
                .map_err(|_| StoreError::Reentrant(key.to_string()))?;
            child.write(&join_path(rest), value).map(|_| ())
        }
        other => Err(StoreError::TypeMismatch {
            key: key.to_string(),
            found: other.kind_name(),
        }),
    }
}

/// One-time initialization phase for a store.
///
/// Fields set here bypass permission checks, so a `read-only` or `none`
/// field can be given its value. Once `build` returns, every write goes
/// through the store's policy.
#[derive(Debug)]
pub struct StoreBuilder {
    schema: Arc<StoreSchema>,
    default_policy: Permission,
    fields: FieldMap,
}

impl StoreBuilder {
    #[must_use]
    pub fn new(schema: Arc<StoreSchema>) -> Self {
        Self {
            schema,
            default_policy: Permission::default(),
            fields: FieldMap::new(),
        }
    }

    #[must_use]
    pub fn default_policy(mut self, policy: Permission) -> Self {
        self.default_policy = policy;
        self
    }

    /// Takes the default policy from configuration.
    #[must_use]
    pub fn with_config(self, config: &StoreConfig) -> Self {
        self.default_policy(config.default_policy)
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<StoreValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn entries(mut self, entries: FieldMap) -> Self {
        self.fields.extend(entries);
        self
    }

    #[must_use]
    pub fn build(self) -> PermissionedStore {
        crate::log_store_debug!(
            "Built {} store with {} fields (default policy {})",
            self.schema.name,
            self.fields.len(),
            self.default_policy
        );
        PermissionedStore {
            schema: self.schema,
            default_policy: self.default_policy,
            fields: self.fields,
        }
    }

    #[must_use]
    pub fn build_shared(self) -> StoreHandle {
        shared(self.build())
    }
}
