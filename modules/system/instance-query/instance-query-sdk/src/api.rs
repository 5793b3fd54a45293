//! `InstanceQueryClient` trait definition.

use async_trait::async_trait;

use crate::context::QueryContext;
use crate::error::InstanceQueryError;
use crate::language::LanguageTag;
use crate::models::{Instance, Instances};
use crate::query::InstanceSearchQueries;

/// Public API trait for the `instance-query` module.
///
/// Every call reads the projection tables; nothing is cached.
///
/// ```ignore
/// let client: Arc<dyn InstanceQueryClient> = InstanceQueryModule::init(conn, &config);
/// let instance = client.instance(&ctx, instance_id, request_host).await?;
/// ```
#[async_trait]
pub trait InstanceQueryClient: Send + Sync {
    /// Resolve the instance a request was already authenticated for.
    ///
    /// `host` is echoed into [`Instance::host`] unaltered.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no instance has this id
    /// - `Internal` on store failure, cancellation or timeout
    async fn instance(
        &self,
        ctx: &QueryContext,
        id: &str,
        host: &str,
    ) -> Result<Instance, InstanceQueryError>;

    /// Resolve the instance bound to `host` (a trailing `:port` is ignored).
    ///
    /// The result is usually consumed through
    /// [`InstanceIdentity`](crate::models::InstanceIdentity).
    ///
    /// # Errors
    ///
    /// - `NotFound` if no domain binding matches exactly
    /// - `Internal` on store failure, cancellation or timeout
    async fn instance_by_host(
        &self,
        ctx: &QueryContext,
        host: &str,
    ) -> Result<Instance, InstanceQueryError>;

    /// Search instances.
    ///
    /// An empty result is not an error.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the statement cannot be built
    /// - `Internal` on store failure, cancellation or timeout
    async fn search_instances(
        &self,
        ctx: &QueryContext,
        queries: &InstanceSearchQueries,
    ) -> Result<Instances, InstanceQueryError>;

    /// Default language of the instance, or `und` if it cannot be resolved.
    async fn default_language(&self, ctx: &QueryContext, id: &str) -> LanguageTag;
}
