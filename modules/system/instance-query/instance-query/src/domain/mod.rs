//! Domain layer for the instance query module.

pub mod error;
pub mod local_client;
pub mod repo;
pub mod service;

pub use error::{DomainError, Lookup};
pub use local_client::InstanceQueryLocalClient;
pub use repo::InstancesRepository;
pub use service::Service;
