pub mod store_builder;
