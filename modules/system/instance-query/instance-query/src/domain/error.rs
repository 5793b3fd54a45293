use std::fmt;
use std::time::Duration;

use instance_query_sdk::InstanceQueryError;
use sea_orm::DbErr;
use thiserror::Error;

/// Identifies a lookup in errors and logs: which operation, which key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    operation: &'static str,
    key: String,
}

impl Lookup {
    #[must_use]
    pub fn by_id(id: &str) -> Self {
        Self {
            operation: "instance_by_id",
            key: id.to_owned(),
        }
    }

    #[must_use]
    pub fn by_host(host: &str) -> Self {
        Self {
            operation: "instance_by_host",
            key: host.to_owned(),
        }
    }

    #[must_use]
    pub fn search(key: impl Into<String>) -> Self {
        Self {
            operation: "search_instances",
            key: key.into(),
        }
    }

    #[must_use]
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.operation, self.key)
    }
}

/// Domain-specific errors using thiserror.
///
/// Driver errors are kept as sources for logging and dropped when converting
/// into the public [`InstanceQueryError`].
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid query: {message}")]
    InvalidQuery { message: String },

    #[error("instance not found: {lookup}")]
    NotFound { lookup: Lookup },

    #[error("database error in {lookup}")]
    Database {
        lookup: Lookup,
        #[source]
        source: DbErr,
    },

    #[error("failed to decode column `{column}` in {lookup}")]
    Decode {
        lookup: Lookup,
        column: &'static str,
        #[source]
        source: DbErr,
    },

    #[error("{lookup} was canceled")]
    Canceled { lookup: Lookup },

    #[error("{lookup} timed out after {}ms", .after.as_millis())]
    TimedOut { lookup: Lookup, after: Duration },
}

impl DomainError {
    #[must_use]
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(lookup: Lookup) -> Self {
        Self::NotFound { lookup }
    }

    #[must_use]
    pub fn database(lookup: Lookup, source: DbErr) -> Self {
        Self::Database { lookup, source }
    }

    #[must_use]
    pub fn decode(lookup: Lookup, column: &'static str, source: DbErr) -> Self {
        Self::Decode {
            lookup,
            column,
            source,
        }
    }

    #[must_use]
    pub fn canceled(lookup: Lookup) -> Self {
        Self::Canceled { lookup }
    }

    #[must_use]
    pub fn timed_out(lookup: Lookup, after: Duration) -> Self {
        Self::TimedOut { lookup, after }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Map an SDK error raised while preparing `lookup` back into the domain.
    #[must_use]
    pub fn from_sdk(error: InstanceQueryError, lookup: &Lookup) -> Self {
        match error {
            InstanceQueryError::InvalidArgument { message } => Self::InvalidQuery { message },
            InstanceQueryError::NotFound { .. } => Self::not_found(lookup.clone()),
            e @ InstanceQueryError::Internal { .. } => {
                Self::database(lookup.clone(), DbErr::Custom(e.to_string()))
            }
        }
    }
}

/// Convert domain errors to SDK errors for public API consumption.
impl From<DomainError> for InstanceQueryError {
    fn from(domain_error: DomainError) -> Self {
        match domain_error {
            DomainError::InvalidQuery { message } => InstanceQueryError::invalid_argument(message),
            DomainError::NotFound { lookup } => InstanceQueryError::not_found(lookup.key),
            DomainError::Database { lookup, .. }
            | DomainError::Decode { lookup, .. }
            | DomainError::Canceled { lookup }
            | DomainError::TimedOut { lookup, .. } => {
                InstanceQueryError::internal(lookup.operation, lookup.key)
            }
        }
    }
}
