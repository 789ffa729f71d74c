use crate::store::Store;
use once_cell::unsync::OnceCell;
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Shared, single-threaded handle to a store in the object graph.
pub type StoreHandle = Rc<RefCell<dyn Store>>;

/// Field name to value mapping held by stores and raw nested objects.
pub type FieldMap = BTreeMap<String, StoreValue>;

/// Wraps a store into a shared handle.
pub fn shared<S: Store + 'static>(store: S) -> StoreHandle {
    Rc::new(RefCell::new(store))
}

/// A value held by a store field.
///
/// Nested data is tagged from the start: `Object` is raw data that has not
/// been traversed yet, `Store` is data with store semantics. Traversal turns
/// the former into the latter (see `PermissionedStore::promote`).
#[derive(Clone)]
pub enum StoreValue {
    /// A primitive or an array of JSON-compatible values
    Json(Value),
    /// A plain nested object, promoted to a store when first traversed
    Object(FieldMap),
    /// A nested store with its own schema and default policy
    Store(StoreHandle),
    /// A zero-argument producer, resolved when read
    Lazy(LazyValue),
}

impl StoreValue {
    pub fn null() -> Self {
        StoreValue::Json(Value::Null)
    }

    /// Short name of the value's shape, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            StoreValue::Json(Value::Null) => "null",
            StoreValue::Json(Value::Bool(_)) => "a boolean",
            StoreValue::Json(Value::Number(_)) => "a number",
            StoreValue::Json(Value::String(_)) => "a string",
            StoreValue::Json(Value::Array(_)) => "an array",
            StoreValue::Json(Value::Object(_)) | StoreValue::Object(_) => "an object",
            StoreValue::Store(_) => "a store",
            StoreValue::Lazy(_) => "a function",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, StoreValue::Json(Value::Null))
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            StoreValue::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_store(&self) -> Option<&StoreHandle> {
        match self {
            StoreValue::Store(handle) => Some(handle),
            _ => None,
        }
    }

    /// Renders the value as JSON for the caller's own serialization.
    ///
    /// Nested stores are rendered through their `entries()` projection, so
    /// fields the caller may not read are left out. Lazy values are resolved.
    /// A store that is already borrowed (a cycle back into a store being
    /// rendered) renders as `null`.
    pub fn to_json(&self) -> Value {
        match self {
            StoreValue::Json(value) => value.clone(),
            StoreValue::Object(fields) => fields_to_json(fields),
            StoreValue::Store(handle) => match handle.try_borrow_mut() {
                Ok(mut store) => fields_to_json(&store.entries()),
                Err(_) => Value::Null,
            },
            StoreValue::Lazy(lazy) => lazy.resolve().to_json(),
        }
    }
}

fn fields_to_json(fields: &FieldMap) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect::<Map<String, Value>>(),
    )
}

impl fmt::Debug for StoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreValue::Json(value) => f.debug_tuple("Json").field(value).finish(),
            StoreValue::Object(fields) => f.debug_tuple("Object").field(fields).finish(),
            StoreValue::Store(handle) => match handle.try_borrow() {
                Ok(store) => f.debug_tuple("Store").field(&&*store).finish(),
                Err(_) => f.write_str("Store(<borrowed>)"),
            },
            StoreValue::Lazy(lazy) => fmt::Debug::fmt(lazy, f),
        }
    }
}

/// Stores and producers compare by identity, data by value.
impl PartialEq for StoreValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (StoreValue::Json(a), StoreValue::Json(b)) => a == b,
            (StoreValue::Object(a), StoreValue::Object(b)) => a == b,
            (StoreValue::Store(a), StoreValue::Store(b)) => Rc::ptr_eq(a, b),
            (StoreValue::Lazy(a), StoreValue::Lazy(b)) => Rc::ptr_eq(&a.producer, &b.producer),
            _ => false,
        }
    }
}

impl PartialEq<Value> for StoreValue {
    fn eq(&self, other: &Value) -> bool {
        match self {
            StoreValue::Json(value) => value == other,
            _ => &self.to_json() == other,
        }
    }
}

/// JSON objects become raw `Object`s, recursively; everything else stays JSON.
impl From<Value> for StoreValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => StoreValue::Object(
                map.into_iter()
                    .map(|(key, value)| (key, StoreValue::from(value)))
                    .collect(),
            ),
            other => StoreValue::Json(other),
        }
    }
}

impl From<&str> for StoreValue {
    fn from(value: &str) -> Self {
        StoreValue::Json(Value::String(value.to_string()))
    }
}

impl From<String> for StoreValue {
    fn from(value: String) -> Self {
        StoreValue::Json(Value::String(value))
    }
}

impl From<StoreHandle> for StoreValue {
    fn from(handle: StoreHandle) -> Self {
        StoreValue::Store(handle)
    }
}

impl From<LazyValue> for StoreValue {
    fn from(lazy: LazyValue) -> Self {
        StoreValue::Lazy(lazy)
    }
}

/// A zero-argument producer held in a lazy field.
///
/// `new` re-invokes the producer on every resolution. `memoized` runs it once
/// per `LazyValue` (clones share the cached result), which is how a field
/// hands out the same sub-store on every read.
#[derive(Clone)]
pub struct LazyValue {
    producer: Rc<dyn Fn() -> StoreValue>,
}

impl LazyValue {
    pub fn new<F>(producer: F) -> Self
    where
        F: Fn() -> StoreValue + 'static,
    {
        Self {
            producer: Rc::new(producer),
        }
    }

    pub fn memoized<F>(producer: F) -> Self
    where
        F: Fn() -> StoreValue + 'static,
    {
        let cell: OnceCell<StoreValue> = OnceCell::new();
        Self::new(move || cell.get_or_init(&producer).clone())
    }

    /// Invokes the producer once.
    pub fn produce(&self) -> StoreValue {
        (self.producer)()
    }

    /// Invokes producers until the result is no longer a producer.
    pub fn resolve(&self) -> StoreValue {
        let mut value = self.produce();
        while let StoreValue::Lazy(next) = value {
            value = next.produce();
        }
        value
    }
}

impl fmt::Debug for LazyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Lazy(<producer>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    #[test]
    fn json_objects_become_raw_objects() {
        let value = StoreValue::from(json!({ "address": { "city": "Paris" }, "tags": [1, 2] }));
        let StoreValue::Object(fields) = value else {
            panic!("expected an object");
        };
        assert!(matches!(fields.get("address"), Some(StoreValue::Object(_))));
        assert_eq!(fields.get("tags"), Some(&StoreValue::Json(json!([1, 2]))));
    }

    #[test]
    fn plain_lazy_reinvokes_producer() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let lazy = LazyValue::new(move || {
            counter.set(counter.get() + 1);
            json!(counter.get()).into()
        });

        assert_eq!(lazy.produce(), json!(1));
        assert_eq!(lazy.produce(), json!(2));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn memoized_lazy_runs_once_across_clones() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let lazy = LazyValue::memoized(move || {
            counter.set(counter.get() + 1);
            json!("token").into()
        });
        let copy = lazy.clone();

        assert_eq!(lazy.produce(), json!("token"));
        assert_eq!(copy.produce(), json!("token"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn resolve_unwraps_nested_producers() {
        let lazy = LazyValue::new(|| LazyValue::new(|| json!(42).into()).into());
        assert_eq!(lazy.resolve(), json!(42));
    }

    #[test]
    fn kind_names_describe_shapes() {
        assert_eq!(StoreValue::from(json!("x")).kind_name(), "a string");
        assert_eq!(StoreValue::from(json!([1])).kind_name(), "an array");
        assert_eq!(StoreValue::from(json!({})).kind_name(), "an object");
        assert_eq!(StoreValue::Lazy(LazyValue::new(StoreValue::null)).kind_name(), "a function");
    }
}
