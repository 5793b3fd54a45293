use std::sync::Arc;

use instance_query_sdk::{
    Instance, InstanceSearchQueries, Instances, LanguageTag, QueryContext,
};
use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::repo::InstancesRepository;

/// Instance resolution and search.
pub struct Service<R: InstancesRepository> {
    repo: Arc<R>,
}

impl<R: InstancesRepository> Service<R> {
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Resolve the instance a request was authenticated for.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the id does not exist in the projection
    /// - `Database`, `Decode`, `Canceled`, `TimedOut` on store failures
    #[tracing::instrument(skip_all, fields(instance.id = %id, request_id = ?ctx.request_id()))]
    pub async fn instance(
        &self,
        ctx: &QueryContext,
        id: &str,
        host: &str,
    ) -> Result<Instance, DomainError> {
        debug!("Resolving instance by id");
        self.repo.find_by_id(ctx, id, host).await
    }

    /// Resolve the instance bound to the domain part of `host`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no domain binding matches
    /// - `Database`, `Decode`, `Canceled`, `TimedOut` on store failures
    #[tracing::instrument(skip_all, fields(host = %host, request_id = ?ctx.request_id()))]
    pub async fn instance_by_host(
        &self,
        ctx: &QueryContext,
        host: &str,
    ) -> Result<Instance, DomainError> {
        let domain = strip_port(host);
        debug!(domain, "Resolving instance by host");
        self.repo.find_by_domain(ctx, domain, host).await
    }

    /// Search instances.
    ///
    /// # Errors
    ///
    /// - `InvalidQuery` if the statement cannot be built
    /// - `Database`, `Decode`, `Canceled`, `TimedOut` on store failures
    #[tracing::instrument(
        skip_all,
        fields(predicates = queries.queries.len(), request_id = ?ctx.request_id())
    )]
    pub async fn search_instances(
        &self,
        ctx: &QueryContext,
        queries: &InstanceSearchQueries,
    ) -> Result<Instances, DomainError> {
        debug!("Searching instances");
        let found = self.repo.search(ctx, queries).await?;
        debug!(count = found.count, returned = found.instances.len(), "Search finished");
        Ok(found)
    }

    /// Default language of the instance; `und` if it cannot be resolved.
    pub async fn default_language(&self, ctx: &QueryContext, id: &str) -> LanguageTag {
        match self.instance(ctx, id, "").await {
            Ok(instance) => instance.default_language,
            Err(e) => {
                debug!(instance.id = %id, error = %e, "Falling back to undefined default language");
                LanguageTag::undefined()
            }
        }
    }
}

/// Drop a trailing `:port` from a host header value.
///
/// Splits on the first colon, so bracketed IPv6 literals are not supported.
#[must_use]
pub fn strip_port(host: &str) -> &str {
    host.split_once(':').map_or(host, |(domain, _)| domain)
}
