use async_trait::async_trait;
use instance_query_sdk::{Instance, InstanceSearchQueries, Instances, QueryContext};

use crate::domain::error::DomainError;

/// Read access to the instance projection.
///
/// Implementations execute every call against the store under the context's
/// cancellation token and timeout.
#[async_trait]
pub trait InstancesRepository: Send + Sync {
    /// Load the instance with `id`; `host` is echoed into the result.
    async fn find_by_id(
        &self,
        ctx: &QueryContext,
        id: &str,
        host: &str,
    ) -> Result<Instance, DomainError>;

    /// Load the instance bound to `domain` (exact match); `host` is echoed
    /// into the result.
    async fn find_by_domain(
        &self,
        ctx: &QueryContext,
        domain: &str,
        host: &str,
    ) -> Result<Instance, DomainError>;

    /// Load all instances matching the search, with the total match count.
    async fn search(
        &self,
        ctx: &QueryContext,
        queries: &InstanceSearchQueries,
    ) -> Result<Instances, DomainError>;
}
