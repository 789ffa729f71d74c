pub mod schema;

pub use schema::StoreSchema;
