//! HTTP client module for a ledger peer's REST API.
//!
//! # Architecture
//!
//! - [`PeerClient`] - High-level facade: one method per peer operation
//! - [`PeerTransport`] - The I/O seam: GET, POST and DELETE returning JSON.
//!   [`HttpTransport`] implements it with reqwest
//! - [`Resource`] - The peer's REST paths and URL construction
//! - Request bodies ([`ChaincodeSpec`], [`ChaincodeInvocation`],
//!   [`RegistrarRequest`]) serialized with serde
//! - [`HttpError`] / [`PeerError`] - Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use obc_client::config::ClientConfig;
//! use obc_client::http::PeerClient;
//!
//! # async fn example() -> Result<(), anyhow::Error> {
//! let config = ClientConfig::new("127.0.0.1", 5000).with_enrollment("jim", "6avZQLwcUe9b");
//! let client = PeerClient::new(config)?;
//!
//! if client.register_user().await?.is_success() {
//!     let response = client
//!         .invoke("GOLANG", "mycc", "invoke", &["a".into(), "b".into(), "10".into()])
//!         .await?;
//!     println!("{response}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! A missing or malformed response field is never an error: the field keeps
//! its default value. Every operation returns [`PeerError::External`] when the
//! exchange with the peer fails:
//!
//! - Malformed host or port
//! - Network failures (connection refused, timeouts, TLS)
//! - Non-success status codes
//! - Bodies that are not JSON

mod endpoints;
mod error;
mod peer_client;
mod transport;
mod types;

pub use endpoints::Resource;
pub use error::{HttpError, PeerError};
pub use peer_client::PeerClient;
pub use transport::{HttpTransport, PeerTransport};
pub use types::{ChaincodeId, ChaincodeInput, ChaincodeInvocation, ChaincodeSpec, RegistrarOutcome, RegistrarRequest};
