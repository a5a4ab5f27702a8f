use serde::Serialize;

/// How a chaincode is addressed: by source path when deploying, by name afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChaincodeId {
    Path(String),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChaincodeInput {
    pub function: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChaincodeSpec {
    #[serde(rename = "type")]
    pub chaincode_type: String,
    #[serde(rename = "chaincodeID")]
    pub chaincode_id: ChaincodeId,
    #[serde(rename = "ctorMsg")]
    pub ctor_msg: ChaincodeInput,
    /// Enrollment id of the caller; only sent in security mode.
    #[serde(rename = "secureContext", skip_serializing_if = "Option::is_none")]
    pub secure_context: Option<String>,
}

impl ChaincodeSpec {
    pub fn new(chaincode_type: &str, chaincode_id: ChaincodeId, function: &str, args: &[String]) -> Self {
        Self {
            chaincode_type: chaincode_type.to_string(),
            chaincode_id,
            ctor_msg: ChaincodeInput {
                function: function.to_string(),
                args: args.to_vec(),
            },
            secure_context: None,
        }
    }
}

/// Body of `/devops/invoke` and `/devops/query`; deploy sends the bare spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChaincodeInvocation {
    #[serde(rename = "chaincodeSpec")]
    pub chaincode_spec: ChaincodeSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrarRequest {
    #[serde(rename = "enrollID")]
    pub enroll_id: String,
    #[serde(rename = "enrollSecret")]
    pub enroll_secret: String,
}

/// Result of a registrar operation.
///
/// Registrar operations only exist when the client runs in security mode;
/// otherwise they are [`NotApplicable`](RegistrarOutcome::NotApplicable) and
/// no request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrarOutcome<T> {
    NotApplicable,
    Completed(T),
}

impl<T> RegistrarOutcome<T> {
    pub fn is_applicable(&self) -> bool {
        matches!(self, RegistrarOutcome::Completed(_))
    }

    pub fn completed(self) -> Option<T> {
        match self {
            RegistrarOutcome::Completed(value) => Some(value),
            RegistrarOutcome::NotApplicable => None,
        }
    }
}

impl RegistrarOutcome<bool> {
    pub fn is_success(&self) -> bool {
        matches!(self, RegistrarOutcome::Completed(true))
    }
}
