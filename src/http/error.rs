//! Error types for peer client operations.
//!
//! Two layers are distinguished:
//!
//! - [`HttpError`] describes why a single request to the peer failed
//!   (bad URL, unreachable peer, non-success status, unparseable body).
//! - [`PeerError`] is what the public [`PeerClient`](super::PeerClient)
//!   returns. Its [`External`](PeerError::External) variant wraps the
//!   transport cause, so callers can tell "peer unreachable" apart from
//!   "peer returned partial data" (which is never an error).

use thiserror::Error;

/// Errors that can occur while talking to the peer over HTTP(S).
///
/// # Error Categories
///
/// - **Network errors**: [`RequestFailed`](HttpError::RequestFailed),
///   [`MiddlewareError`](HttpError::MiddlewareError)
/// - **Server errors**: [`ServerError`](HttpError::ServerError)
/// - **Client errors**: [`UrlError`](HttpError::UrlError),
///   [`JsonError`](HttpError::JsonError)
///
/// # Example
///
/// ```rust,no_run
/// use obc_client::http::HttpError;
///
/// fn handle_error(err: HttpError) {
///     match err {
///         HttpError::ServerError { status, body } => {
///             eprintln!("Peer returned {}: {}", status, body);
///         }
///         HttpError::RequestFailed(e) => {
///             eprintln!("Network error: {}", e);
///         }
///         _ => eprintln!("Other error: {}", err),
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum HttpError {
    /// The HTTP request failed due to a network or connection error.
    ///
    /// This typically indicates:
    /// - Connection refused (peer not running)
    /// - Connection timeout
    /// - DNS resolution failure
    /// - TLS handshake errors, e.g. TLS enabled against a plain-HTTP peer
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// An error occurred in the HTTP middleware layer.
    ///
    /// When retries are configured this may mean all attempts were exhausted.
    #[error("Middleware error: {0}")]
    MiddlewareError(#[from] reqwest_middleware::Error),

    /// The peer returned a non-success HTTP status code.
    #[error("Server error {status}: {body}")]
    ServerError {
        /// The HTTP status code returned by the peer.
        status: reqwest::StatusCode,
        /// The response body, which may contain error details.
        body: String,
    },

    /// The configured host and port do not form a valid URL.
    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    /// The peer answered with a body that is not JSON.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Errors returned by [`PeerClient`](super::PeerClient) operations.
///
/// Missing or malformed fields in a response are not errors; they leave the
/// affected field at its default value.
#[derive(Debug, Error)]
pub enum PeerError {
    /// The request to the peer could not be completed.
    #[error("External operation failed: {0}")]
    External(#[from] HttpError),

    /// The request body could not be encoded.
    #[error("Failed to encode request body: {0}")]
    Body(#[source] serde_json::Error),
}

impl PeerError {
    /// Returns the HTTP status when the peer answered with a non-success code.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            PeerError::External(HttpError::ServerError { status, .. }) => Some(*status),
            _ => None,
        }
    }
}
