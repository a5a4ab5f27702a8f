use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::translate::BytesEncoding;

#[derive(Parser)]
#[command(name = "obc")]
#[command(about = "Client for an OpenBlockchain peer's REST API", long_about = None)]
pub struct Cli {
    #[arg(
        short,
        long,
        global = true,
        help = "Path to the configuration file",
        default_value = "data/config.toml"
    )]
    pub config: PathBuf,
    #[command(flatten)]
    pub connection: ConnectionArgs,
    #[command(subcommand)]
    pub command: Commands,
}

/// Connection settings that override the configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    #[arg(long, global = true, help = "Host name or address of the peer")]
    pub host: Option<String>,
    #[arg(short, long, global = true, help = "REST port of the peer")]
    pub port: Option<u16>,
    #[arg(long, global = true, help = "Connect over https")]
    pub tls: bool,
    #[arg(long, global = true, help = "Do not log fields missing from peer responses")]
    pub quiet_missing_fields: bool,
    #[arg(long, global = true, help = "Encoding of byte fields in responses: utf8, base64 or hex")]
    pub bytes_encoding: Option<BytesEncoding>,
    #[arg(long, global = true, requires = "enroll_secret", help = "Enrollment id; enables security mode")]
    pub enroll_id: Option<String>,
    #[arg(long, global = true, requires = "enroll_id", help = "Enrollment secret")]
    pub enroll_secret: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ChaincodeArgs {
    #[arg(short = 't', long = "type", help = "Chaincode language", default_value = "GOLANG")]
    pub chaincode_type: String,
    #[arg(short, long, help = "Function to call")]
    pub function: String,
    #[arg(short, long, num_args = 0.., help = "Arguments passed to the function")]
    pub args: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a block by number
    Block {
        #[arg(help = "Block number")]
        number: u64,
    },
    /// Show the chain height and tip hashes
    Chain,
    /// Fetch a transaction by uuid
    Transaction {
        #[arg(help = "Transaction uuid")]
        uuid: String,
    },
    /// List the peers known to the peer
    Peers,
    /// Deploy a chaincode from its source path
    Deploy {
        #[arg(long, help = "Path of the chaincode source")]
        path: String,
        #[command(flatten)]
        chaincode: ChaincodeArgs,
    },
    /// Invoke a function on a deployed chaincode
    Invoke {
        #[arg(short, long, help = "Name of the deployed chaincode")]
        name: String,
        #[command(flatten)]
        chaincode: ChaincodeArgs,
    },
    /// Query a deployed chaincode
    Query {
        #[arg(short, long, help = "Name of the deployed chaincode")]
        name: String,
        #[command(flatten)]
        chaincode: ChaincodeArgs,
    },
    /// Log the configured enrollment identity in
    Register,
    /// Remove the login token of a user
    DeleteUser {
        #[arg(help = "Enrollment id")]
        enrollment_id: String,
    },
    /// Check whether a user is logged in
    Registrar {
        #[arg(help = "Enrollment id")]
        enrollment_id: String,
    },
    /// Fetch the enrollment certificate of a user
    Ecert {
        #[arg(help = "Enrollment id")]
        enrollment_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_invoke_with_global_overrides() {
        let cli = Cli::try_parse_from([
            "obc", "--host", "10.0.0.5", "invoke", "--name", "mycc", "--function", "invoke", "--args", "a", "b", "10",
            "--tls",
        ])
        .unwrap();

        assert_eq!(cli.connection.host.as_deref(), Some("10.0.0.5"));
        assert!(cli.connection.tls);
        match cli.command {
            Commands::Invoke { name, chaincode } => {
                assert_eq!(name, "mycc");
                assert_eq!(chaincode.chaincode_type, "GOLANG");
                assert_eq!(chaincode.function, "invoke");
                assert_eq!(chaincode.args, vec!["a", "b", "10"]);
            },
            _ => panic!("expected invoke"),
        }
    }

    #[test]
    fn test_enrollment_requires_both_values() {
        assert!(Cli::try_parse_from(["obc", "--enroll-id", "jim", "register"]).is_err());

        let cli = Cli::try_parse_from(["obc", "--enroll-id", "jim", "--enroll-secret", "6avZQLwcUe9b", "register"]).unwrap();
        assert_eq!(cli.connection.enroll_secret.as_deref(), Some("6avZQLwcUe9b"));
    }

    #[test]
    fn test_bytes_encoding_flag() {
        let cli = Cli::try_parse_from(["obc", "block", "3", "--bytes-encoding", "base64"]).unwrap();
        assert_eq!(cli.connection.bytes_encoding, Some(BytesEncoding::Base64));
        assert!(matches!(cli.command, Commands::Block { number: 3 }));
    }
}
