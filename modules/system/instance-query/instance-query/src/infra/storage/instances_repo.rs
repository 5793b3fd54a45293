use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use instance_query_sdk::{
    Instance, InstanceField, InstanceSearchQueries, Instances, QueryContext, SearchQuery,
};
use sea_orm::{ConnectionTrait, DbErr};
use tracing::trace;

use crate::domain::error::{DomainError, Lookup};
use crate::domain::repo::InstancesRepository;
use crate::infra::storage::scanner::{scan_instance, scan_instances};
use crate::infra::storage::schema::InstanceSchema;
use crate::infra::storage::statement::InstanceStatement;

/// `SeaORM`-backed repository over the instance projection tables.
pub struct SeaOrmInstancesRepository<C> {
    conn: C,
    schema: Arc<InstanceSchema>,
    query_timeout: Duration,
}

impl<C: ConnectionTrait> SeaOrmInstancesRepository<C> {
    #[must_use]
    pub fn new(conn: C, schema: Arc<InstanceSchema>, query_timeout: Duration) -> Self {
        Self {
            conn,
            schema,
            query_timeout,
        }
    }

    fn timeout(&self, ctx: &QueryContext) -> Duration {
        ctx.timeout().unwrap_or(self.query_timeout)
    }

    async fn lookup_one(
        &self,
        ctx: &QueryContext,
        statement: &InstanceStatement<'_>,
        host: &str,
        lookup: Lookup,
    ) -> Result<Instance, DomainError> {
        let stmt = statement.build(self.conn.get_database_backend())?;
        trace!(sql = %stmt.sql, "Executing instance lookup");
        let row = guarded(ctx, self.timeout(ctx), &lookup, self.conn.query_one(stmt)).await?;
        scan_instance(row, host, lookup)
    }
}

#[async_trait]
impl<C> InstancesRepository for SeaOrmInstancesRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(
        &self,
        ctx: &QueryContext,
        id: &str,
        host: &str,
    ) -> Result<Instance, DomainError> {
        let lookup = Lookup::by_id(id);
        let predicate = SearchQuery::equals(InstanceField::Id, id)
            .map_err(|e| DomainError::from_sdk(e, &lookup))?;
        let statement = InstanceStatement::single(&self.schema).filter(predicate);
        self.lookup_one(ctx, &statement, host, lookup).await
    }

    async fn find_by_domain(
        &self,
        ctx: &QueryContext,
        domain: &str,
        host: &str,
    ) -> Result<Instance, DomainError> {
        let lookup = Lookup::by_host(host);
        let predicate = SearchQuery::equals(InstanceField::Domain, domain)
            .map_err(|e| DomainError::from_sdk(e, &lookup))?;
        let statement = InstanceStatement::single(&self.schema)
            .join_domains()
            .filter(predicate);
        self.lookup_one(ctx, &statement, host, lookup).await
    }

    async fn search(
        &self,
        ctx: &QueryContext,
        queries: &InstanceSearchQueries,
    ) -> Result<Instances, DomainError> {
        let lookup = Lookup::search(search_key(queries));
        let stmt = InstanceStatement::collection(&self.schema)
            .filters(queries.queries.iter().cloned())
            .request(queries.request.clone())
            .build(self.conn.get_database_backend())?;
        trace!(sql = %stmt.sql, "Executing instance search");

        // query_all drains the cursor before returning; a failure while
        // releasing it comes back as this call's error.
        let rows = guarded(ctx, self.timeout(ctx), &lookup, self.conn.query_all(stmt)).await?;
        scan_instances(rows, &lookup)
    }
}

/// Field names of the search predicates, for errors and logs.
fn search_key(queries: &InstanceSearchQueries) -> String {
    if queries.queries.is_empty() {
        return "*".to_owned();
    }
    queries
        .queries
        .iter()
        .map(|q| q.field().name())
        .collect::<Vec<_>>()
        .join(",")
}

/// Run a store call under the context's cancellation token and `timeout`.
///
/// Cancellation wins over a result that becomes ready at the same time.
async fn guarded<T, F>(
    ctx: &QueryContext,
    timeout: Duration,
    lookup: &Lookup,
    call: F,
) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DbErr>>,
{
    tokio::select! {
        biased;

        () = ctx.cancellation().cancelled() => Err(DomainError::canceled(lookup.clone())),
        res = tokio::time::timeout(timeout, call) => match res {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(DomainError::database(lookup.clone(), e)),
            Err(_) => Err(DomainError::timed_out(lookup.clone(), timeout)),
        },
    }
}
