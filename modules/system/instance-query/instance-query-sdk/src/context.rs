//! Per-request execution context.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Context handed to every query operation.
///
/// It carries only cancellation and tracing metadata. Which instance to read
/// is always an explicit argument of the operation.
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    cancellation: CancellationToken,
    timeout: Option<Duration>,
    request_id: Option<String>,
}

impl QueryContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the context to the caller's cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Override the module's default statement timeout for this request.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}
