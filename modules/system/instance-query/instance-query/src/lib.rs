//! Instance Query Module
//!
//! Read side of the instance (tenant) projection:
//! - resolve an instance by id or by request host
//! - search instances with typed predicates and pagination
//! - look up an instance's default language, degrading to `und`
//!
//! All reads go straight to the projection tables through `SeaORM` with bound
//! parameters. The public API lives in `instance_query_sdk`; callers obtain an
//! `Arc<dyn InstanceQueryClient>` from [`InstanceQueryModule::init`].
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod module;

pub use config::InstanceQueryConfig;
pub use module::InstanceQueryModule;

#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
