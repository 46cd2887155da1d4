use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use k256::ecdsa::SigningKey;
use serde_json::{json, Value};
use smart_wallet::{
    utils::{
        crypto::{public_key_address, sign_digest},
        parse::{parse_digest, parse_hex},
    },
    ChainRegistry, PoolSettings, ProviderPool, SmartWalletService, TransactionProposal,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Operator tooling for multi-chain Safe smart wallets.
///
/// Everything except `info` is computed locally; `info` reads the deployed wallet through
/// the chain's RPC endpoint.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Provider API key substituted into the chain endpoint templates.
    #[arg(long, env = "ALCHEMY_API_KEY", default_value = "", hide_env_values = true)]
    api_key: String,

    /// Per-request RPC timeout in milliseconds.
    #[arg(long, env = "RPC_TIMEOUT_MS", default_value_t = 10_000)]
    rpc_timeout_ms: u64,

    /// JSON chain table replacing the built-in one.
    #[arg(long, env = "CHAINS_FILE")]
    chains_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List supported chains.
    Chains,

    /// Validate an owner/threshold/chain configuration.
    Validate {
        #[arg(long = "owner", required = true)]
        owners: Vec<String>,
        #[arg(long)]
        threshold: u64,
        #[arg(long)]
        chain: u64,
    },

    /// Predict the wallet address for a configuration.
    Predict {
        #[arg(long = "owner", required = true)]
        owners: Vec<String>,
        #[arg(long)]
        threshold: u64,
        #[arg(long)]
        chain: u64,
        /// Decimal salt nonce.
        #[arg(long, default_value = "0")]
        salt: String,
    },

    /// Compute the digest owners sign for a wallet transaction.
    Hash {
        #[arg(long)]
        wallet: String,
        #[arg(long)]
        to: String,
        /// Wei, decimal.
        #[arg(long, default_value = "0")]
        value: String,
        /// Hex call data.
        #[arg(long, default_value = "0x")]
        data: String,
        /// 0 = call, 1 = delegate call.
        #[arg(long, default_value_t = 0)]
        operation: u8,
        #[arg(long)]
        nonce: String,
        #[arg(long)]
        chain: u64,
    },

    /// Sign a digest with a local key. For test networks only.
    Sign {
        #[arg(long)]
        digest: String,
        /// Private key (hex string, 0x...).
        #[arg(long, env = "PKEY", hide_env_values = true)]
        private_key: String,
    },

    /// Check that a signature over a digest was produced by a claimed owner.
    Verify {
        #[arg(long)]
        digest: String,
        #[arg(long)]
        signature: String,
        #[arg(long)]
        signer: String,
    },

    /// Read owners, threshold, nonce and balance of a deployed wallet.
    Info {
        #[arg(long)]
        wallet: String,
        #[arg(long)]
        chain: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let service = build_service(&cli)?;
    let output = run(&service, cli.command).await?;

    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("failed serialising output")?
    );
    Ok(())
}

fn build_service(cli: &Cli) -> Result<SmartWalletService> {
    let registry = match cli.chains_file {
        Some(ref path) => ChainRegistry::from_json_file(path)
            .with_context(|| format!("failed loading chain table {}", path.display()))?,
        None => ChainRegistry::builtin(),
    };
    debug!(chains = registry.supported_chains().len(), "chain table loaded");

    let settings = PoolSettings {
        api_key: cli.api_key.clone(),
        request_timeout: Duration::from_millis(cli.rpc_timeout_ms),
    };
    let pool = ProviderPool::connect(Arc::new(registry), &settings)
        .context("failed creating providers")?;
    Ok(SmartWalletService::new(Arc::new(pool)))
}

async fn run(service: &SmartWalletService, command: Command) -> Result<Value> {
    let output = match command {
        Command::Chains => {
            let chains: Vec<Value> = service
                .supported_chains()
                .into_iter()
                .map(|(chain_id, name)| json!({ "chain_id": chain_id, "name": name }))
                .collect();
            json!(chains)
        }

        Command::Validate {
            owners,
            threshold,
            chain,
        } => match service.validate_config(&owners, threshold, chain) {
            Ok(config) => json!({ "valid": true, "config": config }),
            Err(errors) => json!({
                "valid": false,
                "errors": errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
            }),
        },

        Command::Predict {
            owners,
            threshold,
            chain,
            salt,
        } => {
            let predicted = service.predict_address(&owners, threshold, chain, Some(&salt))?;
            json!({
                "address": predicted.address.to_checksum(None),
                "scheme": predicted.scheme,
                "owners": predicted.owners,
                "threshold": predicted.threshold,
                "chain_id": predicted.chain_id,
                "salt": predicted.salt.to_string(),
            })
        }

        Command::Hash {
            wallet,
            to,
            value,
            data,
            operation,
            nonce,
            chain,
        } => {
            let proposal = TransactionProposal {
                to,
                value,
                data,
                operation,
                ..Default::default()
            };
            let digest = service.compute_transaction_hash(&wallet, &proposal, &nonce, chain)?;
            json!({ "digest": format!("0x{}", hex::encode(digest)) })
        }

        Command::Sign {
            digest,
            private_key,
        } => {
            let digest = parse_digest(&digest)?;
            let key_bytes = parse_hex(&private_key).context("private key is not hex")?;
            let signing_key = SigningKey::from_slice(&key_bytes)
                .map_err(|_| anyhow!("private key is not a valid secp256k1 scalar"))?;
            let signature = sign_digest(&signing_key, &digest)
                .map_err(|e| anyhow!("signing failed: {e}"))?;
            json!({
                "signer": public_key_address(signing_key.verifying_key()).to_checksum(None),
                "signature": format!("0x{}", hex::encode(&signature)),
            })
        }

        Command::Verify {
            digest,
            signature,
            signer,
        } => json!({ "valid": service.verify_signature(&digest, &signature, &signer) }),

        Command::Info { wallet, chain } => {
            let info = service.wallet_info(&wallet, chain).await?;
            json!({
                "address": info.address.to_checksum(None),
                "chain_id": info.chain_id,
                "owners": info
                    .owners
                    .iter()
                    .map(|owner| owner.to_checksum(None))
                    .collect::<Vec<_>>(),
                "threshold": info.threshold,
                "nonce": info.nonce,
                "balance": info.balance,
            })
        }
    };
    Ok(output)
}
