//! Domain messages returned by the peer client.
//!
//! These types mirror the peer's protocol messages. They are plain value
//! objects: every field has a zero default, so an entity can always be built
//! even from an empty JSON document.
//!
//! # Key Types
//!
//! - [`Block`] - A block with its metadata and transactions
//! - [`Transaction`] - A chaincode transaction
//! - [`BlockchainInfo`] - Current height and tip hashes of the chain
//! - [`PeerEndpoint`] / [`PeersMessage`] - Network membership as seen by the peer
//! - [`Timestamp`] - Seconds and nanoseconds since the Unix epoch
//!
//! Enumerations ([`TransactionType`], [`ConfidentialityLevel`], [`PeerType`])
//! live in [`enums`] together with their mappings from peer codes.

use chrono::{DateTime, Utc};
use serde::Serialize;

pub mod enums;
pub use enums::{ConfidentialityLevel, PeerType, TransactionType, UnrecognizedValue};

/// Point in time as seconds and nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

impl Timestamp {
    pub fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    /// Converts to a UTC date-time, or `None` when the value is out of range
    /// (including negative nanos).
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let nanos = u32::try_from(self.nanos).ok()?;
        DateTime::from_timestamp(self.seconds, nanos)
    }
}

/// A chaincode transaction as recorded by the peer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Transaction {
    pub tx_type: TransactionType,
    pub chaincode_id: Vec<u8>,
    pub payload: Vec<u8>,
    pub metadata: Vec<u8>,
    pub uuid: String,
    /// Only present when the peer sent a `timestamp` object.
    pub timestamp: Option<Timestamp>,
    pub confidentiality_level: ConfidentialityLevel,
    pub nonce: Vec<u8>,
    pub cert: Vec<u8>,
    pub signature: Vec<u8>,
}

/// Block metadata that is excluded from the block hash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NonHashData {
    pub local_ledger_commit_timestamp: Timestamp,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Block {
    pub version: i32,
    pub consensus_metadata: Vec<u8>,
    pub non_hash_data: Option<NonHashData>,
    pub previous_block_hash: Vec<u8>,
    pub state_hash: Vec<u8>,
    pub timestamp: Timestamp,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlockchainInfo {
    pub height: i64,
    pub current_block_hash: Vec<u8>,
    pub previous_block_hash: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeerId {
    pub name: String,
}

/// A network member known to the queried peer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeerEndpoint {
    pub id: PeerId,
    pub address: String,
    pub peer_type: PeerType,
    pub pki_id: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeersMessage {
    pub peers: Vec<PeerEndpoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_to_datetime() {
        let ts = Timestamp::new(1_700_000_000, 500);
        let dt = ts.to_datetime().unwrap();
        assert_eq!(dt.timestamp(), 1_700_000_000);
        assert_eq!(dt.timestamp_subsec_nanos(), 500);

        assert!(Timestamp::new(0, -1).to_datetime().is_none());
        assert!(Timestamp::new(i64::MAX, 0).to_datetime().is_none());
    }

    #[test]
    fn test_defaults_are_zero_values() {
        let block = Block::default();
        assert_eq!(block.version, 0);
        assert!(block.non_hash_data.is_none());
        assert!(block.transactions.is_empty());

        let tx = Transaction::default();
        assert_eq!(tx.tx_type, TransactionType::Undefined);
        assert_eq!(tx.confidentiality_level, ConfidentialityLevel::Public);
        assert!(tx.uuid.is_empty());

        assert_eq!(PeerEndpoint::default().peer_type, PeerType::Undefined);
    }
}
