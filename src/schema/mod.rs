pub mod loader;
pub mod registry;
pub mod types;

pub use loader::{load_schema_from_file, load_schemas_from_dir};
pub use registry::SchemaRegistry;
pub use types::schema::StoreSchema;
