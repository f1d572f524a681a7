//! Core schema type definitions.

pub mod schema;

pub use schema::{AdditionalSchema, BoundOrFlag, ItemsSchema, JsonSchema, SchemaTypeSet};
