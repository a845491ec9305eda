//! Prints basic properties of the connected node: chain id, block
//! height and the managed accounts with their balances. Useful to
//! verify connectivity and the account setup before deploying.

use {
    alloy::providers::Provider,
    anyhow::{Context, Result, ensure},
    clap::Parser,
    url::Url,
};

#[derive(Parser)]
struct Arguments {
    /// The Ethereum node URL to connect to.
    #[clap(long, env, default_value = "http://localhost:8545")]
    node_url: Url,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Arguments::parse();
    observe::tracing::initialize("warn", tracing::Level::ERROR.into());

    let provider = ethnode::provider(&args.node_url);
    println!("Node URL: {}", args.node_url);
    println!(
        "Chain id: {}",
        provider.get_chain_id().await.context("eth_chainId")?
    );
    println!(
        "Latest block: {}",
        provider.get_block_number().await.context("eth_blockNumber")?
    );

    let accounts = provider.get_accounts().await.context("eth_accounts")?;
    ensure!(
        !accounts.is_empty(),
        "the node manages no accounts; create and unlock one before deploying"
    );
    println!("Accounts:");
    for (i, account) in accounts.iter().enumerate() {
        let balance = provider
            .get_balance(*account)
            .await
            .context("eth_getBalance")?;
        println!("\t[{i}]: {account} (balance: {balance} wei)");
    }
    Ok(())
}
