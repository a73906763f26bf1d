//! Error types for control-plane calls.
//!
//! Every failure a call can produce is one variant of [`Error`]. Variants that were
//! caused by an HTTP response keep that response (headers and drained body) so callers
//! can inspect exactly what the service sent.

use crate::response::RawResponse;
use http::StatusCode;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// The main error type for control-plane calls.
///
/// # Examples
///
/// ```no_run
/// use coreservices::compute::{ComputeClient, GetInstanceRequest};
/// use coreservices::{Error, StaticConfigurationProvider};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Error> {
/// let config = StaticConfigurationProvider::from_env()?;
/// let client = ComputeClient::new(config)?;
/// let request = GetInstanceRequest {
///     instance_id: "ocid1.instance.oc1..example".to_string(),
///     ..Default::default()
/// };
///
/// match client.get_instance(&CancellationToken::new(), request).await {
///     Ok(response) => println!("instance: {:?}", response.instance),
///     Err(Error::Service(failure)) => {
///         eprintln!("{} {}: {}", failure.status, failure.code, failure.message);
///     }
///     Err(e) => eprintln!("call failed: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The client was built from an incomplete or malformed configuration.
    #[error("Configuration error: {0}")]
    InvalidConfiguration(String),

    /// The request could not be composed: a mandatory field is missing, a path
    /// parameter is empty, or the body slots conflict. Nothing was sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A network-level error occurred (connection refused, DNS failure, reset stream).
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A single attempt ran longer than the per-attempt timeout.
    #[error("Request attempt timed out after {0:?}")]
    Timeout(Duration),

    /// The service answered with a non-2xx status.
    #[error("{0}")]
    Service(Box<ServiceError>),

    /// A 2xx response arrived but its headers or body could not be decoded.
    ///
    /// The raw response is preserved so the payload can be inspected.
    #[error("Failed to decode response (status {status}): {reason}")]
    Decode {
        /// What failed to decode
        reason: String,
        /// The HTTP status code
        status: StatusCode,
        /// The response, with its body already drained
        raw: Box<RawResponse>,
    },

    /// The caller's cancellation token fired.
    #[error("Request was cancelled")]
    Cancelled,

    /// Every attempt allowed by the retry policy failed with a retryable error.
    #[error("Retries exhausted after {attempts} attempts: {last_error}")]
    RetryExhausted {
        /// The number of attempts made
        attempts: u32,
        /// The error of the final attempt
        last_error: Box<Error>,
    },

    /// The next backoff would have crossed the overall deadline of the retry policy.
    #[error("Retry deadline of {deadline:?} exceeded: {last_error}")]
    DeadlineExceeded {
        /// The configured overall deadline
        deadline: Duration,
        /// The error of the final attempt
        last_error: Box<Error>,
    },

    /// The request body could not be serialized to JSON.
    #[error("Failed to serialize request: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<url::ParseError> for Error {
    fn from(error: url::ParseError) -> Self {
        Error::InvalidConfiguration(format!("invalid endpoint URL: {}", error))
    }
}

impl Error {
    /// Returns `true` if this error is transient.
    ///
    /// Transport failures, attempt timeouts, 429 and the 5xx statuses 500, 502, 503
    /// and 504 are retryable. Everything else, 409 included, is not.
    ///
    /// # Examples
    ///
    /// ```
    /// use coreservices::Error;
    /// use std::time::Duration;
    ///
    /// assert!(Error::Timeout(Duration::from_secs(1)).is_retryable());
    /// assert!(!Error::Cancelled.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(_) => true,
            Error::Timeout(_) => true,
            Error::Service(failure) => {
                matches!(failure.status.as_u16(), 429 | 500 | 502 | 503 | 504)
            }
            Error::InvalidConfiguration(_)
            | Error::InvalidRequest(_)
            | Error::Decode { .. }
            | Error::Cancelled
            | Error::RetryExhausted { .. }
            | Error::DeadlineExceeded { .. }
            | Error::Serialization(_) => false,
        }
    }

    /// Returns the HTTP status code if a response was received.
    ///
    /// For `RetryExhausted` and `DeadlineExceeded` this is the status of the final attempt.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Service(failure) => Some(failure.status),
            Error::Decode { status, .. } => Some(*status),
            Error::RetryExhausted { last_error, .. }
            | Error::DeadlineExceeded { last_error, .. } => {
                last_error.status()
            }
            _ => None,
        }
    }

    /// Returns the raw response if one was received.
    pub fn raw_response(&self) -> Option<&RawResponse> {
        match self {
            Error::Service(failure) => Some(&failure.raw),
            Error::Decode { raw, .. } => Some(raw),
            Error::RetryExhausted { last_error, .. }
            | Error::DeadlineExceeded { last_error, .. } => {
                last_error.raw_response()
            }
            _ => None,
        }
    }

    /// Returns the service-assigned request id, if the service sent one.
    pub fn opc_request_id(&self) -> Option<&str> {
        match self {
            Error::Service(failure) => failure.opc_request_id.as_deref(),
            _ => self.raw_response()?.header("opc-request-id"),
        }
    }

    /// Returns the machine-readable error code from a service error body.
    pub fn service_code(&self) -> Option<&str> {
        match self {
            Error::Service(failure) => Some(&failure.code),
            Error::RetryExhausted { last_error, .. }
            | Error::DeadlineExceeded { last_error, .. } => {
                last_error.service_code()
            }
            _ => None,
        }
    }
}

/// A non-2xx answer from the service.
#[derive(Debug, Clone)]
pub struct ServiceError {
    /// The HTTP status code
    pub status: StatusCode,
    /// The `code` field of the error body, or the status reason when the body has none
    pub code: String,
    /// The `message` field of the error body, or the body text when it is not JSON
    pub message: String,
    /// The `opc-request-id` response header
    pub opc_request_id: Option<String>,
    /// The response, with its body already drained
    pub raw: RawResponse,
}

#[derive(Deserialize)]
struct ServiceErrorBody {
    code: Option<String>,
    message: Option<String>,
}

impl ServiceError {
    /// Builds the error from a non-2xx response.
    pub fn from_raw(raw: RawResponse) -> Self {
        let parsed = serde_json::from_slice::<ServiceErrorBody>(&raw.body).ok();
        let (code, message) = match parsed {
            Some(body) => (body.code, body.message),
            None => (None, None),
        };

        ServiceError {
            status: raw.status,
            code: code.unwrap_or_else(|| {
                raw.status
                    .canonical_reason()
                    .unwrap_or("Unknown")
                    .to_string()
            }),
            message: message.unwrap_or_else(|| raw.text().into_owned()),
            opc_request_id: raw.header("opc-request-id").map(str::to_owned),
            raw,
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Service error {} ({}): {}", self.status, self.code, self.message)?;
        if let Some(id) = &self.opc_request_id {
            write!(f, " [opc-request-id: {}]", id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ServiceError {}

impl From<ServiceError> for Error {
    fn from(error: ServiceError) -> Self {
        Error::Service(Box::new(error))
    }
}

/// A specialized `Result` type for control-plane calls.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderMap;

    fn raw(status: u16, body: &str) -> RawResponse {
        let mut headers = HeaderMap::new();
        headers.insert("opc-request-id", "req-1".parse().unwrap());
        RawResponse::new(
            StatusCode::from_u16(status).unwrap(),
            headers,
            url::Url::parse("http://localhost/").unwrap(),
            body.as_bytes().to_vec(),
        )
    }

    #[test]
    fn test_service_error_parses_body() {
        let body = r#"{"code":"NotAuthorizedOrNotFound","message":"gone"}"#;
        let error: Error = ServiceError::from_raw(raw(404, body)).into();

        assert_eq!(error.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(error.service_code(), Some("NotAuthorizedOrNotFound"));
        assert_eq!(error.opc_request_id(), Some("req-1"));
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_service_error_tolerates_non_json_body() {
        let failure = ServiceError::from_raw(raw(502, "upstream unavailable"));
        assert_eq!(failure.code, "Bad Gateway");
        assert_eq!(failure.message, "upstream unavailable");
        assert!(Error::from(failure).is_retryable());
    }

    #[test]
    fn test_conflict_is_not_retryable() {
        let error: Error = ServiceError::from_raw(raw(409, "{}")).into();
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_exhausted_delegates_to_last_error() {
        let error = Error::RetryExhausted {
            attempts: 3,
            last_error: Box::new(ServiceError::from_raw(raw(503, r#"{"code":"Busy"}"#)).into()),
        };
        assert_eq!(error.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
        assert_eq!(error.service_code(), Some("Busy"));
        assert!(error.raw_response().is_some());
        assert!(!error.is_retryable());
    }
}
