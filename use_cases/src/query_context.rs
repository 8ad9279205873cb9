use crate::errors::{ResolutionError, Upstream};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(2);

/// Caller-supplied limits for one query. Every upstream call made on its behalf gets the
/// full `upstream_timeout` and stops early once `cancellation` fires.
#[derive(Debug, Clone)]
pub struct QueryContext {
    upstream_timeout: Duration,
    cancellation: CancellationToken,
}

impl Default for QueryContext {
    fn default() -> Self {
        Self::new(DEFAULT_UPSTREAM_TIMEOUT)
    }
}

impl QueryContext {
    pub fn new(upstream_timeout: Duration) -> Self {
        Self {
            upstream_timeout,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(self, cancellation: CancellationToken) -> Self {
        Self {
            cancellation,
            ..self
        }
    }

    pub(crate) async fn call<T, F>(&self, upstream: Upstream, call: F) -> Result<T, ResolutionError>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => Err(ResolutionError::Cancelled),
            result = tokio::time::timeout(self.upstream_timeout, call) => match result {
                Err(_elapsed) => {
                    tracing::warn!(%upstream, timeout_ms = self.upstream_timeout.as_millis() as u64, "upstream call timed out");
                    Err(ResolutionError::UpstreamTimeout(upstream))
                }
                Ok(Err(source)) => {
                    tracing::error!(%upstream, error = ?source, "upstream call failed");
                    Err(ResolutionError::UpstreamUnavailable { upstream, source })
                }
                Ok(Ok(value)) => Ok(value),
            },
        }
    }
}
