//! High-level client for a ledger peer's REST API.
//!
//! [`PeerClient`] issues one request per call and translates the peer's JSON
//! into domain messages with [`ResponseTranslator`]. Fields the peer leaves
//! out are defaulted, never treated as errors; only a failed exchange with the
//! peer produces a [`PeerError`].
//!
//! # Example
//!
//! ```rust,no_run
//! use obc_client::config::ClientConfig;
//! use obc_client::http::PeerClient;
//!
//! # async fn example() -> Result<(), anyhow::Error> {
//! let client = PeerClient::new(ClientConfig::new("127.0.0.1", 5000))?;
//!
//! let info = client.get_blockchain_info().await?;
//! let tip = client.get_block((info.height - 1) as u64).await?;
//! println!("{} transactions in the latest block", tip.transactions.len());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::ClientConfig;
use crate::models::{Block, BlockchainInfo, PeersMessage, Transaction};
use crate::translate::{FieldReader, ResponseTranslator};

use super::endpoints::Resource;
use super::error::PeerError;
use super::transport::{HttpTransport, PeerTransport};
use super::types::{ChaincodeId, ChaincodeInvocation, ChaincodeSpec, RegistrarOutcome, RegistrarRequest};

const LOGIN_SUCCESSFUL: &str = "Login successful";
const LOGIN_DELETED: &str = "Deleted login token and directory for user";
const ALREADY_LOGGED_IN: &str = "is already logged in.";

/// Client for one peer.
///
/// The configuration is owned by the client and only changes through
/// [`enable_tls`](PeerClient::enable_tls) and
/// [`disable_missing_field_alert`](PeerClient::disable_missing_field_alert),
/// which take `&mut self`; a shared client is therefore read-only.
pub struct PeerClient<T = HttpTransport> {
    config: ClientConfig,
    transport: T,
}

impl PeerClient<HttpTransport> {
    /// Creates a client backed by reqwest, using the timeout and retry
    /// settings of `config`.
    pub fn new(config: ClientConfig) -> Result<Self, PeerError> {
        let transport = HttpTransport::with_config(config.max_retries, Duration::from_secs(config.timeout_secs))?;
        Ok(Self::with_transport(config, transport))
    }

    /// Round-trip time of the most recent request, if any was made.
    pub async fn last_request_latency(&self) -> Option<Duration> {
        self.transport.get_latency().await
    }
}

impl<T: PeerTransport> PeerClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Stops logging and collecting skipped response fields. Results are unchanged.
    pub fn disable_missing_field_alert(&mut self) {
        self.config.alert_missing_fields = false;
    }

    /// Switches all subsequent requests to `https`.
    pub fn enable_tls(&mut self) {
        self.config.tls = true;
    }

    /// A fresh translator configured like this client, for documents the
    /// caller already holds.
    pub fn translator(&self) -> ResponseTranslator {
        ResponseTranslator::new(self.config.alert_missing_fields, self.config.bytes_encoding)
    }

    pub async fn get_block(&self, block_number: u64) -> Result<Block, PeerError> {
        let json = self.get(Resource::Block(block_number)).await?;
        Ok(self.translator().block(&json))
    }

    pub async fn get_blockchain_info(&self) -> Result<BlockchainInfo, PeerError> {
        let json = self.get(Resource::Chain).await?;
        Ok(self.translator().blockchain_info(&json))
    }

    pub async fn get_transaction(&self, uuid: &str) -> Result<Transaction, PeerError> {
        let json = self.get(Resource::Transaction(uuid)).await?;
        Ok(self.translator().transaction(&json))
    }

    /// Lists the peers known to the queried peer, read from the `peers` key.
    pub async fn get_peers(&self) -> Result<PeersMessage, PeerError> {
        let json = self.get(Resource::Peers).await?;
        Ok(self.translator().peers_message(&json))
    }

    /// Deploys the chaincode at `path`. Returns the peer's raw answer.
    pub async fn deploy(
        &self,
        chaincode_type: &str,
        path: &str,
        function: &str,
        args: &[String],
    ) -> Result<Value, PeerError> {
        let spec = self.chaincode_spec(chaincode_type, ChaincodeId::Path(path.to_string()), function, args);
        info!(path = path, function = function; "Deploying chaincode");
        self.post(Resource::Deploy, &spec).await
    }

    /// Invokes `function` on the deployed chaincode `name`. Returns the peer's raw answer.
    pub async fn invoke(
        &self,
        chaincode_type: &str,
        name: &str,
        function: &str,
        args: &[String],
    ) -> Result<Value, PeerError> {
        let invocation = ChaincodeInvocation {
            chaincode_spec: self.chaincode_spec(chaincode_type, ChaincodeId::Name(name.to_string()), function, args),
        };
        info!(chaincode = name, function = function; "Invoking chaincode");
        self.post(Resource::Invoke, &invocation).await
    }

    /// Queries the deployed chaincode `name`. Returns the peer's raw answer.
    pub async fn query(&self, chaincode_type: &str, name: &str, function: &str, args: &[String]) -> Result<Value, PeerError> {
        let invocation = ChaincodeInvocation {
            chaincode_spec: self.chaincode_spec(chaincode_type, ChaincodeId::Name(name.to_string()), function, args),
        };
        debug!(chaincode = name, function = function; "Querying chaincode");
        self.post(Resource::Query, &invocation).await
    }

    /// Logs the configured enrollment identity in with the peer's registrar.
    pub async fn register_user(&self) -> Result<RegistrarOutcome<bool>, PeerError> {
        let Some(credentials) = &self.config.enrollment else {
            return Ok(RegistrarOutcome::NotApplicable);
        };

        let request = RegistrarRequest {
            enroll_id: credentials.enroll_id.clone(),
            enroll_secret: credentials.enroll_secret.clone(),
        };
        let json = self.post(Resource::Registrar, &request).await?;
        Ok(RegistrarOutcome::Completed(self.acknowledged(&json, LOGIN_SUCCESSFUL)))
    }

    /// Removes the login token of `enrollment_id` from the peer.
    pub async fn delete_user(&self, enrollment_id: &str) -> Result<RegistrarOutcome<bool>, PeerError> {
        if !self.config.security_enabled() {
            return Ok(RegistrarOutcome::NotApplicable);
        }

        let url = self.url(Resource::RegistrarUser(enrollment_id))?;
        debug!(url:% = url; "DELETE");
        let json = self.transport.delete_json(url).await.inspect_err(log_failure)?;
        Ok(RegistrarOutcome::Completed(self.acknowledged(&json, LOGIN_DELETED)))
    }

    /// Whether `enrollment_id` is currently logged in at the peer.
    pub async fn get_registrar(&self, enrollment_id: &str) -> Result<RegistrarOutcome<bool>, PeerError> {
        if !self.config.security_enabled() {
            return Ok(RegistrarOutcome::NotApplicable);
        }

        let json = self.get(Resource::RegistrarUser(enrollment_id)).await?;
        Ok(RegistrarOutcome::Completed(self.acknowledged(&json, ALREADY_LOGGED_IN)))
    }

    /// The enrollment certificate of `enrollment_id`, as the peer's `OK` text.
    pub async fn get_enrollment_certificate(
        &self,
        enrollment_id: &str,
    ) -> Result<RegistrarOutcome<Option<String>>, PeerError> {
        if !self.config.security_enabled() {
            return Ok(RegistrarOutcome::NotApplicable);
        }

        let json = self.get(Resource::EnrollmentCertificate(enrollment_id)).await?;
        let certificate = self.reader().string(&json, "OK").map(str::to_string);
        Ok(RegistrarOutcome::Completed(certificate))
    }

    fn chaincode_spec(&self, chaincode_type: &str, id: ChaincodeId, function: &str, args: &[String]) -> ChaincodeSpec {
        let mut spec = ChaincodeSpec::new(chaincode_type, id, function, args);
        spec.secure_context = self.config.enrollment.as_ref().map(|c| c.enroll_id.clone());
        spec
    }

    // The registrar answers in prose; success is recognised by substring.
    fn acknowledged(&self, json: &Value, expected: &str) -> bool {
        self.reader()
            .string(json, "OK")
            .is_some_and(|message| message.contains(expected))
    }

    fn reader(&self) -> FieldReader {
        FieldReader::new(self.config.alert_missing_fields, self.config.bytes_encoding)
    }

    fn url(&self, resource: Resource<'_>) -> Result<Url, PeerError> {
        Ok(resource.url(&self.config).inspect_err(log_failure)?)
    }

    async fn get(&self, resource: Resource<'_>) -> Result<Value, PeerError> {
        let url = self.url(resource)?;
        debug!(url:% = url; "GET");
        Ok(self.transport.get_json(url).await.inspect_err(log_failure)?)
    }

    async fn post<B: Serialize + Sync>(&self, resource: Resource<'_>, body: &B) -> Result<Value, PeerError> {
        let url = self.url(resource)?;
        let body = serde_json::to_string(body).map_err(PeerError::Body)?;
        debug!(url:% = url; "POST");
        Ok(self.transport.post_json(url, body).await.inspect_err(log_failure)?)
    }
}

fn log_failure(error: &super::error::HttpError) {
    warn!(error:% = error; "Peer request failed");
}
