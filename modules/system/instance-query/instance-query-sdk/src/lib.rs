//! Instance Query SDK
//!
//! This crate provides the public API for the `instance-query` module:
//! - `InstanceQueryClient` trait
//! - `Instance` model and the narrower `InstanceIdentity` capability trait
//! - Predicate algebra (`SearchQuery`, `SearchRequest`, `InstanceSearchQueries`)
//! - Error type (`InstanceQueryError`)
//!
//! ## Usage
//!
//! ```ignore
//! use instance_query_sdk::{InstanceQueryClient, QueryContext};
//!
//! let ctx = QueryContext::new();
//! let instance = client.instance_by_host(&ctx, "tenant.example.com:443").await?;
//! let ids = instance_query_sdk::instance_ids_list_query(["a", "b"])?;
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod context;
pub mod error;
pub mod language;
pub mod models;
pub mod query;

pub use api::InstanceQueryClient;
pub use context::QueryContext;
pub use error::InstanceQueryError;
pub use language::LanguageTag;
pub use models::{Instance, InstanceIdentity, Instances, SetupStep};
pub use query::{
    FieldKind, FilterValue, InstanceField, InstanceSearchQueries, NumberComparison, Predicate,
    SearchQuery, SearchRequest, TextComparison, instance_ids_list_query,
};
