use serde::Serialize;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// A peer-supplied code that does not belong to the closed set of the target enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unrecognized {kind} value: {value}")]
pub struct UnrecognizedValue {
    pub kind: &'static str,
    pub value: String,
}

impl UnrecognizedValue {
    fn new(kind: &'static str, value: impl ToString) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Kind of a chaincode transaction, as numbered by the peer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    #[default]
    Undefined = 0,
    ChaincodeNew = 1,
    ChaincodeUpdate = 2,
    ChaincodeExecute = 3,
    ChaincodeQuery = 4,
    ChaincodeTerminate = 5,
}

impl TryFrom<i64> for TransactionType {
    type Error = UnrecognizedValue;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(TransactionType::Undefined),
            1 => Ok(TransactionType::ChaincodeNew),
            2 => Ok(TransactionType::ChaincodeUpdate),
            3 => Ok(TransactionType::ChaincodeExecute),
            4 => Ok(TransactionType::ChaincodeQuery),
            5 => Ok(TransactionType::ChaincodeTerminate),
            _ => Err(UnrecognizedValue::new("transaction type", code)),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Undefined => write!(f, "UNDEFINED"),
            TransactionType::ChaincodeNew => write!(f, "CHAINCODE_NEW"),
            TransactionType::ChaincodeUpdate => write!(f, "CHAINCODE_UPDATE"),
            TransactionType::ChaincodeExecute => write!(f, "CHAINCODE_EXECUTE"),
            TransactionType::ChaincodeQuery => write!(f, "CHAINCODE_QUERY"),
            TransactionType::ChaincodeTerminate => write!(f, "CHAINCODE_TERMINATE"),
        }
    }
}

/// Visibility classification the peer assigns to a transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidentialityLevel {
    #[default]
    Public = 0,
    Confidential = 1,
}

impl FromStr for ConfidentialityLevel {
    type Err = UnrecognizedValue;

    /// Exact, case-sensitive match on the peer's level names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PUBLIC" => Ok(ConfidentialityLevel::Public),
            "CONFIDENTIAL" => Ok(ConfidentialityLevel::Confidential),
            _ => Err(UnrecognizedValue::new("confidentiality level", s)),
        }
    }
}

impl Display for ConfidentialityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfidentialityLevel::Public => write!(f, "PUBLIC"),
            ConfidentialityLevel::Confidential => write!(f, "CONFIDENTIAL"),
        }
    }
}

/// Role of a peer in the network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeerType {
    #[default]
    Undefined = 0,
    Validator = 1,
    NonValidator = 2,
}

impl FromStr for PeerType {
    type Err = UnrecognizedValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UNDEFINED" => Ok(PeerType::Undefined),
            "VALIDATOR" => Ok(PeerType::Validator),
            "NON_VALIDATOR" => Ok(PeerType::NonValidator),
            _ => Err(UnrecognizedValue::new("peer type", s)),
        }
    }
}

// Some peer builds serialize the enum by its wire number instead of its name.
impl TryFrom<i64> for PeerType {
    type Error = UnrecognizedValue;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(PeerType::Undefined),
            1 => Ok(PeerType::Validator),
            2 => Ok(PeerType::NonValidator),
            _ => Err(UnrecognizedValue::new("peer type", code)),
        }
    }
}

impl Display for PeerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeerType::Undefined => write!(f, "UNDEFINED"),
            PeerType::Validator => write!(f, "VALIDATOR"),
            PeerType::NonValidator => write!(f, "NON_VALIDATOR"),
        }
    }
}
