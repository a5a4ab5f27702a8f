use serde_json::Value;

use crate::models::{
    Block, BlockchainInfo, ConfidentialityLevel, NonHashData, PeerEndpoint, PeerId, PeerType, PeersMessage, Timestamp,
    Transaction, TransactionType,
};

use super::bytes::BytesEncoding;
use super::reader::{FieldIssue, FieldReader, IssueKind};

/// Assembles domain messages from peer JSON, one field at a time.
///
/// Each builder starts from the message's default value and fills in every
/// field it can read. A missing or malformed field only leaves that field at
/// its default; building itself never fails.
///
/// ```rust
/// use obc_client::translate::{BytesEncoding, ResponseTranslator};
/// use serde_json::json;
///
/// let mut translator = ResponseTranslator::new(true, BytesEncoding::Utf8);
/// let info = translator.blockchain_info(&json!({"height": 7}));
///
/// assert_eq!(info.height, 7);
/// assert_eq!(translator.issues().len(), 2);
/// ```
#[derive(Debug)]
pub struct ResponseTranslator {
    reader: FieldReader,
}

impl ResponseTranslator {
    pub fn new(alert: bool, encoding: BytesEncoding) -> Self {
        Self {
            reader: FieldReader::new(alert, encoding),
        }
    }

    pub fn issues(&self) -> &[FieldIssue] {
        self.reader.issues()
    }

    pub fn into_issues(self) -> Vec<FieldIssue> {
        self.reader.into_issues()
    }

    pub fn timestamp(&mut self, json: &Value) -> Timestamp {
        let mut timestamp = Timestamp::default();
        if let Some(seconds) = self.reader.int64(json, "seconds") {
            timestamp.seconds = seconds;
        }
        if let Some(nanos) = self.reader.int32(json, "nanos") {
            timestamp.nanos = nanos;
        }
        timestamp
    }

    pub fn transaction(&mut self, json: &Value) -> Transaction {
        let mut tx = Transaction::default();

        if let Some(code) = self.reader.int64(json, "type") {
            match TransactionType::try_from(code) {
                Ok(tx_type) => tx.tx_type = tx_type,
                Err(e) => self.reader.report("type", IssueKind::Unrecognized { value: e.value }),
            }
        }
        if let Some(chaincode_id) = self.reader.bytes(json, "chaincodeID") {
            tx.chaincode_id = chaincode_id;
        }
        if let Some(payload) = self.reader.bytes(json, "payload") {
            tx.payload = payload;
        }
        if let Some(metadata) = self.reader.bytes(json, "metadata") {
            tx.metadata = metadata;
        }
        if let Some(uuid) = self.reader.string(json, "uuid") {
            tx.uuid = uuid.to_string();
        }
        if self.reader.object(json, "timestamp").is_some() {
            tx.timestamp = Some(self.nested("timestamp", |t| t.timestamp(&json["timestamp"])));
        }
        if let Some(level) = self.reader.string(json, "confidentialityLevel") {
            match level.parse::<ConfidentialityLevel>() {
                Ok(level) => tx.confidentiality_level = level,
                Err(e) => self
                    .reader
                    .report("confidentialityLevel", IssueKind::Unrecognized { value: e.value }),
            }
        }
        if let Some(nonce) = self.reader.bytes(json, "nonce") {
            tx.nonce = nonce;
        }
        if let Some(cert) = self.reader.bytes(json, "cert") {
            tx.cert = cert;
        }
        if let Some(signature) = self.reader.bytes(json, "signature") {
            tx.signature = signature;
        }

        tx
    }

    pub fn block(&mut self, json: &Value) -> Block {
        let mut block = Block::default();

        if let Some(version) = self.reader.int32(json, "version") {
            block.version = version;
        }
        if let Some(consensus_metadata) = self.reader.bytes(json, "consensusMetadata") {
            block.consensus_metadata = consensus_metadata;
        }
        block.non_hash_data = self.non_hash_data(json);
        if let Some(previous_block_hash) = self.reader.bytes(json, "previousBlockHash") {
            block.previous_block_hash = previous_block_hash;
        }
        if let Some(state_hash) = self.reader.bytes(json, "stateHash") {
            block.state_hash = state_hash;
        }
        // The peer flattens the block timestamp into the block document itself.
        block.timestamp = self.timestamp(json);
        if let Some(transactions) = self.reader.objects(json, "transactions") {
            block.transactions = self.each("transactions", transactions, Self::transaction);
        }

        block
    }

    pub fn blockchain_info(&mut self, json: &Value) -> BlockchainInfo {
        let mut info = BlockchainInfo::default();
        if let Some(height) = self.reader.int64(json, "height") {
            info.height = height;
        }
        if let Some(current_block_hash) = self.reader.bytes(json, "currentBlockHash") {
            info.current_block_hash = current_block_hash;
        }
        if let Some(previous_block_hash) = self.reader.bytes(json, "previousBlockHash") {
            info.previous_block_hash = previous_block_hash;
        }
        info
    }

    pub fn peer_endpoint(&mut self, json: &Value) -> PeerEndpoint {
        let mut peer = PeerEndpoint::default();

        let id_key = present_key(json, &["peerID", "ID"]);
        if self.reader.object(json, id_key).is_some() {
            let name = self.nested(id_key, |t| t.reader.string(&json[id_key], "name"));
            if let Some(name) = name {
                peer.id = PeerId { name: name.to_string() };
            }
        }
        if let Some(address) = self.reader.string(json, "address") {
            peer.address = address.to_string();
        }
        let type_key = present_key(json, &["type", "Type"]);
        if let Some(peer_type) = self.peer_type(json, type_key) {
            peer.peer_type = peer_type;
        }
        if let Some(pki_id) = self.reader.bytes(json, "pkiID") {
            peer.pki_id = pki_id;
        }

        peer
    }

    pub fn peers_message(&mut self, json: &Value) -> PeersMessage {
        let mut message = PeersMessage::default();
        if let Some(peers) = self.reader.objects(json, "peers") {
            message.peers = self.each("peers", peers, Self::peer_endpoint);
        }
        message
    }

    /// Only populated when both `nonHashData` and its commit timestamp are objects.
    fn non_hash_data(&mut self, json: &Value) -> Option<NonHashData> {
        self.reader.object(json, "nonHashData")?;
        let non_hash = &json["nonHashData"];
        self.nested("nonHashData", |t| {
            t.reader.object(non_hash, "localLedgerCommitTimestamp")?;
            let local_ledger_commit_timestamp = t.nested("localLedgerCommitTimestamp", |t| {
                t.timestamp(&non_hash["localLedgerCommitTimestamp"])
            });
            Some(NonHashData {
                local_ledger_commit_timestamp,
            })
        })
    }

    // Accepts both the enum name and its wire number.
    fn peer_type(&mut self, json: &Value, key: &str) -> Option<PeerType> {
        let parsed = match json.get(key) {
            Some(Value::Number(_)) => PeerType::try_from(self.reader.int64(json, key)?),
            _ => self.reader.string(json, key)?.parse::<PeerType>(),
        };
        match parsed {
            Ok(peer_type) => Some(peer_type),
            Err(e) => {
                self.reader.report(key, IssueKind::Unrecognized { value: e.value });
                None
            },
        }
    }

    fn nested<R>(&mut self, segment: &str, build: impl FnOnce(&mut Self) -> R) -> R {
        self.reader.enter(segment);
        let built = build(self);
        self.reader.leave();
        built
    }

    fn each<T>(&mut self, field: &str, items: Vec<&Value>, build: fn(&mut Self, &Value) -> T) -> Vec<T> {
        self.nested(field, |t| {
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| t.nested(&format!("[{}]", index), |t| build(t, item)))
                .collect()
        })
    }
}

/// Picks the first candidate key present in `json`, falling back to the first
/// candidate so that absence is reported under the documented name.
fn present_key<'k>(json: &Value, candidates: &[&'k str]) -> &'k str {
    candidates
        .iter()
        .copied()
        .find(|key| json.get(*key).is_some_and(|v| !v.is_null()))
        .or_else(|| candidates.first().copied())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn translator() -> ResponseTranslator {
        ResponseTranslator::new(true, BytesEncoding::Utf8)
    }

    fn paths(t: &ResponseTranslator) -> Vec<String> {
        t.issues().iter().map(|i| i.path.clone()).collect()
    }

    #[test]
    fn test_timestamp_from_seconds_and_nanos() {
        let mut t = translator();
        let ts = t.timestamp(&json!({"seconds": 1234, "nanos": 5678}));
        assert_eq!(ts, Timestamp::new(1234, 5678));
        assert!(t.issues().is_empty());
    }

    #[test]
    fn test_timestamp_survives_serialization() {
        let original = Timestamp::new(1234, 5678);
        let mut t = translator();

        let rebuilt = t.timestamp(&serde_json::to_value(original).unwrap());

        assert_eq!(rebuilt, original);
        assert!(t.issues().is_empty());
    }

    #[test]
    fn test_timestamp_fields_default_independently() {
        let mut t = translator();
        assert_eq!(t.timestamp(&json!({"seconds": 9})), Timestamp::new(9, 0));
        assert_eq!(t.timestamp(&json!({"nanos": 3})), Timestamp::new(0, 3));
        assert_eq!(t.timestamp(&json!({})), Timestamp::default());
    }

    #[test]
    fn test_every_entity_builds_from_empty_document() {
        let empty = json!({});
        let mut t = translator();

        assert_eq!(t.transaction(&empty), Transaction::default());
        assert_eq!(t.blockchain_info(&empty), BlockchainInfo::default());
        assert_eq!(t.peer_endpoint(&empty), PeerEndpoint::default());
        assert_eq!(t.peers_message(&empty), PeersMessage::default());
        assert_eq!(t.block(&empty), Block::default());
    }

    #[test]
    fn test_full_transaction() {
        let doc = json!({
            "type": 3,
            "chaincodeID": "mycc",
            "payload": "payload-bytes",
            "metadata": "meta",
            "uuid": "5b9a2f0e-1",
            "timestamp": {"seconds": 1460000000, "nanos": 42},
            "confidentialityLevel": "CONFIDENTIAL",
            "nonce": "n0nce",
            "cert": "cert",
            "signature": "sig"
        });
        let mut t = translator();
        let tx = t.transaction(&doc);

        assert_eq!(tx.tx_type, TransactionType::ChaincodeExecute);
        assert_eq!(tx.chaincode_id, b"mycc");
        assert_eq!(tx.payload, b"payload-bytes");
        assert_eq!(tx.metadata, b"meta");
        assert_eq!(tx.uuid, "5b9a2f0e-1");
        assert_eq!(tx.timestamp, Some(Timestamp::new(1460000000, 42)));
        assert_eq!(tx.confidentiality_level, ConfidentialityLevel::Confidential);
        assert_eq!(tx.nonce, b"n0nce");
        assert_eq!(tx.cert, b"cert");
        assert_eq!(tx.signature, b"sig");
        assert!(t.issues().is_empty());
    }

    #[test]
    fn test_unrecognized_codes_leave_fields_unset() {
        let mut t = translator();
        let tx = t.transaction(&json!({"type": 9, "confidentialityLevel": "secret", "uuid": "u"}));

        assert_eq!(tx.tx_type, TransactionType::Undefined);
        assert_eq!(tx.confidentiality_level, ConfidentialityLevel::Public);
        assert_eq!(tx.uuid, "u");

        let unrecognized: Vec<_> = t
            .issues()
            .iter()
            .filter(|i| matches!(i.kind, IssueKind::Unrecognized { .. }))
            .map(|i| i.path.as_str())
            .collect();
        assert_eq!(unrecognized, vec!["type", "confidentialityLevel"]);
    }

    #[test]
    fn test_block_keeps_transaction_order() {
        let doc = json!({
            "version": 1,
            "transactions": [{"uuid": "a"}, {"uuid": "b"}, {"uuid": "c"}]
        });
        let mut t = translator();
        let block = t.block(&doc);

        let uuids: Vec<_> = block.transactions.iter().map(|tx| tx.uuid.as_str()).collect();
        assert_eq!(uuids, vec!["a", "b", "c"]);
        assert_eq!(block.version, 1);
    }

    #[test]
    fn test_block_reads_timestamp_from_top_level() {
        let doc = json!({"seconds": 77, "nanos": 1, "timestamp": {"seconds": 5}});
        let block = translator().block(&doc);
        assert_eq!(block.timestamp, Timestamp::new(77, 1));
    }

    #[test]
    fn test_block_non_hash_data_requires_full_path() {
        let mut t = translator();

        let full = t.block(&json!({"nonHashData": {"localLedgerCommitTimestamp": {"seconds": 10, "nanos": 20}}}));
        assert_eq!(
            full.non_hash_data,
            Some(NonHashData {
                local_ledger_commit_timestamp: Timestamp::new(10, 20)
            })
        );

        let partial = t.block(&json!({"nonHashData": {}}));
        assert_eq!(partial.non_hash_data, None);

        let wrong_shape = t.block(&json!({"nonHashData": {"localLedgerCommitTimestamp": 5}}));
        assert_eq!(wrong_shape.non_hash_data, None);
    }

    #[test]
    fn test_block_issue_paths_are_nested() {
        let doc = json!({"transactions": [{"uuid": "a", "timestamp": {"seconds": 1}}]});
        let mut t = translator();
        t.block(&doc);

        let paths = paths(&t);
        assert!(paths.contains(&"transactions[0].timestamp.nanos".to_string()));
        assert!(paths.contains(&"transactions[0].payload".to_string()));
        assert!(paths.contains(&"nonHashData".to_string()));
    }

    #[test]
    fn test_blockchain_info() {
        let doc = json!({"height": 42, "currentBlockHash": "cur", "previousBlockHash": "prev"});
        let info = translator().blockchain_info(&doc);
        assert_eq!(
            info,
            BlockchainInfo {
                height: 42,
                current_block_hash: b"cur".to_vec(),
                previous_block_hash: b"prev".to_vec(),
            }
        );
    }

    #[test]
    fn test_peer_endpoint_documented_keys() {
        let doc = json!({
            "peerID": {"name": "vp1"},
            "address": "172.17.0.3:30303",
            "type": "VALIDATOR",
            "pkiID": "pki"
        });
        let peer = translator().peer_endpoint(&doc);

        assert_eq!(peer.id.name, "vp1");
        assert_eq!(peer.address, "172.17.0.3:30303");
        assert_eq!(peer.peer_type, PeerType::Validator);
        assert_eq!(peer.pki_id, b"pki");
    }

    #[test]
    fn test_peer_endpoint_capitalised_keys_and_numeric_type() {
        let doc = json!({"ID": {"name": "vp2"}, "address": "10.0.0.2:30303", "Type": 2});
        let mut t = translator();
        let peer = t.peer_endpoint(&doc);

        assert_eq!(peer.id.name, "vp2");
        assert_eq!(peer.peer_type, PeerType::NonValidator);
        assert_eq!(paths(&t), vec!["pkiID"]);
    }

    #[test]
    fn test_peer_endpoint_unknown_type() {
        let mut t = translator();
        let peer = t.peer_endpoint(&json!({"type": "OBSERVER"}));
        assert_eq!(peer.peer_type, PeerType::Undefined);
        assert!(t.issues().iter().any(|i| i.path == "type"
            && i.kind
                == IssueKind::Unrecognized {
                    value: "OBSERVER".to_string()
                }));
    }

    #[test]
    fn test_peers_message() {
        let doc = json!({"peers": [
            {"peerID": {"name": "vp0"}, "address": "a:1", "type": "VALIDATOR"},
            {"peerID": {"name": "vp1"}, "address": "b:1", "type": "NON_VALIDATOR"}
        ]});
        let message = translator().peers_message(&doc);

        let names: Vec<_> = message.peers.iter().map(|p| p.id.name.as_str()).collect();
        assert_eq!(names, vec!["vp0", "vp1"]);
    }

    #[test]
    fn test_disabling_alert_suppresses_issues_but_not_values() {
        let doc = json!({"type": 17, "uuid": 5, "timestamp": {"seconds": "x"}});

        let mut alerted = ResponseTranslator::new(true, BytesEncoding::Utf8);
        let mut silent = ResponseTranslator::new(false, BytesEncoding::Utf8);
        let from_alerted = alerted.transaction(&doc);
        let from_silent = silent.transaction(&doc);

        assert_eq!(from_alerted, from_silent);
        assert!(!alerted.issues().is_empty());
        assert!(silent.into_issues().is_empty());
    }

    #[test]
    fn test_hex_encoding_applies_to_all_byte_fields() {
        let mut t = ResponseTranslator::new(true, BytesEncoding::Hex);
        let info = t.blockchain_info(&json!({"height": 1, "currentBlockHash": "0aff", "previousBlockHash": "nothex"}));

        assert_eq!(info.current_block_hash, vec![0x0a, 0xff]);
        assert!(info.previous_block_hash.is_empty());
        assert_eq!(paths(&t), vec!["previousBlockHash"]);
    }
}
