//! Storage layer: projection schema, statement building, row decoding and
//! the `SeaORM` repository.
//!
//! Only column identifiers from [`schema`] reach statement text. Every
//! caller-supplied value is bound as a parameter.

pub mod predicate;
pub mod scanner;
pub mod schema;
pub mod statement;

mod instances_repo;

pub use instances_repo::SeaOrmInstancesRepository;
pub use schema::{InstanceSchema, TableName};
pub use statement::InstanceStatement;
