//! Local (in-process) client for the instance query module.

use std::sync::Arc;

use async_trait::async_trait;
use instance_query_sdk::{
    Instance, InstanceQueryClient, InstanceQueryError, InstanceSearchQueries, Instances,
    LanguageTag, QueryContext,
};

use super::{DomainError, InstancesRepository, Service};

/// Local client wrapping the instance query service.
pub struct InstanceQueryLocalClient<R: InstancesRepository> {
    svc: Arc<Service<R>>,
}

impl<R: InstancesRepository> InstanceQueryLocalClient<R> {
    #[must_use]
    pub fn new(svc: Arc<Service<R>>) -> Self {
        Self { svc }
    }
}

fn log_and_convert(op: &str, e: DomainError) -> InstanceQueryError {
    if e.is_not_found() {
        tracing::debug!(operation = op, error = %e, "instance-query lookup found nothing");
    } else {
        tracing::error!(operation = op, error = ?e, "instance-query call failed");
    }
    e.into()
}

#[async_trait]
impl<R: InstancesRepository + 'static> InstanceQueryClient for InstanceQueryLocalClient<R> {
    async fn instance(
        &self,
        ctx: &QueryContext,
        id: &str,
        host: &str,
    ) -> Result<Instance, InstanceQueryError> {
        self.svc
            .instance(ctx, id, host)
            .await
            .map_err(|e| log_and_convert("instance", e))
    }

    async fn instance_by_host(
        &self,
        ctx: &QueryContext,
        host: &str,
    ) -> Result<Instance, InstanceQueryError> {
        self.svc
            .instance_by_host(ctx, host)
            .await
            .map_err(|e| log_and_convert("instance_by_host", e))
    }

    async fn search_instances(
        &self,
        ctx: &QueryContext,
        queries: &InstanceSearchQueries,
    ) -> Result<Instances, InstanceQueryError> {
        self.svc
            .search_instances(ctx, queries)
            .await
            .map_err(|e| log_and_convert("search_instances", e))
    }

    async fn default_language(&self, ctx: &QueryContext, id: &str) -> LanguageTag {
        self.svc.default_language(ctx, id).await
    }
}
