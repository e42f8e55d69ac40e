//! Single-shot remote calls with failure classification.
//!
//! Every outbound call runs on a background tokio task. Whatever goes wrong is
//! folded into an [`ApiFailure`]: either a network failure (nothing usable came
//! back) or a service failure (the server answered with a non-success status).
//! The gateway never retries; screens expose a retry event that re-issues the
//! same call.

use std::future::Future;

use thiserror::Error;
use tracing::{debug, warn};

/// Raised by HTTP clients when the server answers with a non-success status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("HTTP {status}: {body}")]
pub struct HttpStatusError {
    pub status: u16,
    pub body: String,
}

impl HttpStatusError {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Classified failure of a remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiFailure {
    /// Transport-level failure: no connectivity, timeout, DNS, undecodable body.
    #[error("Network error: {0}")]
    Network(String),

    /// The call completed with a non-success status.
    #[error("Service error {status_code}{}", .error_body.as_deref().map(|b| format!(": {b}")).unwrap_or_default())]
    Service {
        status_code: u16,
        error_body: Option<String>,
    },
}

impl ApiFailure {
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Network(_) => None,
            Self::Service { status_code, .. } => Some(*status_code),
        }
    }

    #[must_use]
    pub fn error_body(&self) -> Option<&str> {
        match self {
            Self::Network(_) => None,
            Self::Service { error_body, .. } => error_body.as_deref(),
        }
    }

    /// Maps an arbitrary error chain onto the two failure classes.
    ///
    /// Only an error carrying an HTTP status is a service failure; everything
    /// else counts as a network failure.
    #[must_use]
    pub fn classify(err: &anyhow::Error) -> Self {
        for cause in err.chain() {
            if let Some(http) = cause.downcast_ref::<HttpStatusError>() {
                return Self::Service {
                    status_code: http.status,
                    error_body: Some(http.body.clone()).filter(|b| !b.is_empty()),
                };
            }

            if let Some(status) = cause
                .downcast_ref::<reqwest::Error>()
                .and_then(reqwest::Error::status)
            {
                return Self::Service {
                    status_code: status.as_u16(),
                    error_body: None,
                };
            }
        }

        Self::Network(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiFailure>;

/// Runs remote calls off the interactive task and tags their outcome.
#[derive(Debug, Clone)]
pub struct RemoteGateway {
    service: &'static str,
}

impl Default for RemoteGateway {
    fn default() -> Self {
        Self::new("remote")
    }
}

impl RemoteGateway {
    #[must_use]
    pub const fn new(service: &'static str) -> Self {
        Self { service }
    }

    pub async fn call<T, Fut>(&self, action: Fut) -> ApiResult<T>
    where
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let outcome = match tokio::spawn(action).await {
            Ok(result) => result.map_err(|e| ApiFailure::classify(&e)),
            Err(join_err) => Err(ApiFailure::Network(format!(
                "background task failed: {join_err}"
            ))),
        };

        match &outcome {
            Ok(_) => debug!(service = self.service, "Remote call succeeded"),
            Err(failure) => warn!(service = self.service, "Remote call failed: {failure}"),
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn success_is_wrapped() {
        let gateway = RemoteGateway::new("test");
        let result = gateway.call(async { Ok::<_, anyhow::Error>(42) }).await;
        assert_eq!(result, Ok(42));
    }

    #[tokio::test]
    async fn connectivity_failure_is_a_network_error() {
        let gateway = RemoteGateway::new("test");
        let result: ApiResult<()> = gateway
            .call(async { Err(anyhow::anyhow!("connection refused")) })
            .await;

        let failure = result.unwrap_err();
        assert!(failure.is_network_error());
        assert_eq!(failure.status_code(), None);
        assert_eq!(failure.error_body(), None);
    }

    #[tokio::test]
    async fn http_status_is_a_service_error_with_body() {
        let gateway = RemoteGateway::new("test");
        let result: ApiResult<()> = gateway
            .call(async {
                Err(anyhow::Error::from(HttpStatusError::new(
                    404,
                    r#"{"status_message":"not found"}"#,
                )))
            })
            .await;

        let failure = result.unwrap_err();
        assert!(!failure.is_network_error());
        assert_eq!(failure.status_code(), Some(404));
        assert_eq!(failure.error_body(), Some(r#"{"status_message":"not found"}"#));
    }

    #[tokio::test]
    async fn http_status_is_found_behind_context() {
        let err = anyhow::Error::from(HttpStatusError::new(500, "")).context("loading trending");
        let failure = ApiFailure::classify(&err);
        assert_eq!(failure.status_code(), Some(500));
        assert_eq!(failure.error_body(), None);
    }

    #[tokio::test]
    async fn panicking_task_is_reported_not_propagated() {
        let gateway = RemoteGateway::new("test");
        let result: ApiResult<()> = gateway
            .call(async {
                if true {
                    panic!("decoder exploded");
                }
                Ok(())
            })
            .await;
        assert!(result.unwrap_err().is_network_error());
    }
}
