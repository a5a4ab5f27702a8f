use clap::Parser;
use log::{debug, info};
use serde::Serialize;

use obc_client::cli::{ChaincodeArgs, Cli, Commands};
use obc_client::config::load_configuration;
use obc_client::http::{PeerClient, RegistrarOutcome};
use obc_client::log::init_logging;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    init_logging()?;

    let mut config = load_configuration(&cli.config)?;
    config.apply_args(&cli.connection);
    info!(
        server:% = config.server(),
        tls = config.tls,
        security = config.security_enabled();
        "Connecting to peer"
    );

    let client = PeerClient::new(config)?;

    match cli.command {
        Commands::Block { number } => print_json(&client.get_block(number).await?),
        Commands::Chain => print_json(&client.get_blockchain_info().await?),
        Commands::Transaction { uuid } => print_json(&client.get_transaction(&uuid).await?),
        Commands::Peers => print_json(&client.get_peers().await?),
        Commands::Deploy { path, chaincode } => {
            let ChaincodeArgs {
                chaincode_type,
                function,
                args,
            } = chaincode;
            print_json(&client.deploy(&chaincode_type, &path, &function, &args).await?)
        },
        Commands::Invoke { name, chaincode } => {
            print_json(&client.invoke(&chaincode.chaincode_type, &name, &chaincode.function, &chaincode.args).await?)
        },
        Commands::Query { name, chaincode } => {
            print_json(&client.query(&chaincode.chaincode_type, &name, &chaincode.function, &chaincode.args).await?)
        },
        Commands::Register => print_outcome(client.register_user().await?),
        Commands::DeleteUser { enrollment_id } => print_outcome(client.delete_user(&enrollment_id).await?),
        Commands::Registrar { enrollment_id } => print_outcome(client.get_registrar(&enrollment_id).await?),
        Commands::Ecert { enrollment_id } => print_outcome(client.get_enrollment_certificate(&enrollment_id).await?),
    }?;

    if let Some(latency) = client.last_request_latency().await {
        debug!(latency:? = latency; "Request complete");
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), anyhow::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_outcome<T: Serialize>(outcome: RegistrarOutcome<T>) -> Result<(), anyhow::Error> {
    match outcome {
        RegistrarOutcome::Completed(value) => print_json(&value),
        RegistrarOutcome::NotApplicable => {
            eprintln!("Security is disabled; pass --enroll-id and --enroll-secret or set [enrollment] in the config");
            Ok(())
        },
    }
}
