use std::sync::Arc;

use instance_query_sdk::InstanceQueryClient;
use sea_orm::ConnectionTrait;
use tracing::info;

use crate::config::InstanceQueryConfig;
use crate::domain::local_client::InstanceQueryLocalClient;
use crate::domain::service::Service;
use crate::infra::storage::schema::ProjectionTable;
use crate::infra::storage::{InstanceSchema, SeaOrmInstancesRepository};

/// Instance query module.
///
/// Wires the `SeaORM` repository, the domain service and the local client
/// over an existing connection. The module owns no tables; the projection
/// is written elsewhere.
pub struct InstanceQueryModule;

impl InstanceQueryModule {
    /// Build the client over `conn`.
    #[must_use]
    pub fn init<C>(conn: C, config: &InstanceQueryConfig) -> Arc<dyn InstanceQueryClient>
    where
        C: ConnectionTrait + Send + Sync + 'static,
    {
        info!("Initializing instance_query module");

        let schema = Arc::new(InstanceSchema::from_config(config));
        info!(
            instances = %schema.table_name(ProjectionTable::Instances),
            instance_domains = %schema.table_name(ProjectionTable::InstanceDomains),
            query_timeout = ?config.query_timeout,
            "Instance projection tables configured"
        );

        let repo = SeaOrmInstancesRepository::new(conn, schema, config.query_timeout);
        let service = Arc::new(Service::new(Arc::new(repo)));
        let client: Arc<dyn InstanceQueryClient> = Arc::new(InstanceQueryLocalClient::new(service));

        info!("instance_query module initialized");
        client
    }
}
