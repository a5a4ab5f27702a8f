pub mod cli;
pub mod config;
pub mod http;
pub mod log;
pub mod models;
pub mod translate;

pub use crate::config::ClientConfig;
pub use crate::http::{PeerClient, PeerError, RegistrarOutcome};
pub use crate::models::{Block, BlockchainInfo, PeersMessage, Transaction};
