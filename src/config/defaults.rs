use serde::{Deserialize, Serialize};

use crate::cli::ConnectionArgs;
use crate::translate::BytesEncoding;

/// Enrollment identity used when the peer runs with security enabled.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EnrollmentCredentials {
    pub enroll_id: String,
    pub enroll_secret: String,
}

/// Settings for a single peer connection.
///
/// Security mode is on exactly when [`ClientConfig::enrollment`] is set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    /// Talk to the peer over `https` instead of `http`.
    pub tls: bool,
    /// Log and collect every field that had to be skipped while translating a response.
    pub alert_missing_fields: bool,
    pub bytes_encoding: BytesEncoding,
    pub timeout_secs: u64,
    /// Retries for transient transport failures. Zero means every call makes exactly one attempt.
    pub max_retries: u32,
    pub enrollment: Option<EnrollmentCredentials>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            tls: false,
            alert_missing_fields: true,
            bytes_encoding: BytesEncoding::Utf8,
            timeout_secs: 30,
            max_retries: 0,
            enrollment: None,
        }
    }
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Enables security mode with the given enrollment identity.
    pub fn with_enrollment(mut self, enroll_id: impl Into<String>, enroll_secret: impl Into<String>) -> Self {
        self.enrollment = Some(EnrollmentCredentials {
            enroll_id: enroll_id.into(),
            enroll_secret: enroll_secret.into(),
        });
        self
    }

    pub fn security_enabled(&self) -> bool {
        self.enrollment.is_some()
    }

    pub fn server(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Applies command-line overrides on top of file and environment settings.
    pub fn apply_args(&mut self, args: &ConnectionArgs) {
        if let Some(host) = &args.host {
            self.host = host.clone();
        }
        if let Some(port) = args.port {
            self.port = port;
        }
        if args.tls {
            self.tls = true;
        }
        if args.quiet_missing_fields {
            self.alert_missing_fields = false;
        }
        if let Some(bytes_encoding) = args.bytes_encoding {
            self.bytes_encoding = bytes_encoding;
        }
        if let (Some(enroll_id), Some(enroll_secret)) = (&args.enroll_id, &args.enroll_secret) {
            self.enrollment = Some(EnrollmentCredentials {
                enroll_id: enroll_id.clone(),
                enroll_secret: enroll_secret.clone(),
            });
        }
    }
}
