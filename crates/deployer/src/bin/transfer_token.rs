//! Interactive transfer of JoyTokens from the contracts owner account
//! recorded in the address table. Prompts for the recipient and the
//! amount, submits the transfer with a boosted gas price and waits for
//! its confirmation.

use {
    alloy::{primitives::U256, sol, sol_types::SolCall},
    anyhow::{Context, Result, ensure},
    clap::Parser,
    deployer::{
        arguments::duration_from_seconds,
        config::AddressTable,
        executor,
        node::NodeClient,
        plan::Contract,
        traits::ChainClient,
    },
    std::{
        io::{BufRead, Write},
        path::PathBuf,
        time::Duration,
    },
    url::Url,
};

/// Multiplier on the node's gas price to get fast confirmations.
const GAS_PRICE_BOOST: u128 = 5;

sol! {
    function transfer(address to, uint256 value) returns (bool success);
}

#[derive(Parser)]
struct Arguments {
    /// Address table holding the owner account and the deployed token
    /// address.
    #[clap(long, env, default_value = "deploy.json")]
    config: PathBuf,

    /// The Ethereum node URL to connect to.
    #[clap(long, env, default_value = "http://localhost:8545")]
    node_url: Url,

    /// Maximum time in seconds to wait for the transaction receipt.
    #[clap(long, env, default_value = "600", value_parser = duration_from_seconds)]
    receipt_timeout: Duration,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Arguments::parse();
    observe::tracing::initialize(
        "warn,transfer_token=debug,deployer=debug",
        tracing::Level::ERROR.into(),
    );

    let table = AddressTable::load(&args.config)?;
    let accounts = table.validate_accounts()?;
    let token = Contract::JoyToken
        .deployed(&table)?
        .context("the token is not deployed yet, run the deployer first")?;

    let client = NodeClient::new(ethnode::provider(&args.node_url));
    let available = client.accounts().await?;
    ensure!(
        available.contains(&accounts.contracts_owner),
        "the owner account {} is not available from the connected node",
        accounts.contracts_owner,
    );

    println!("This script transfers JoyTokens; abort now if that is not what you want.");
    let to = ethnode::parse_address(&prompt("Specify address: ")?)?;
    let value: U256 = prompt("Specify amount: ")?
        .parse()
        .context("amount is not a number")?;

    println!("Tokens will be sent:");
    println!("From: {}", accounts.contracts_owner);
    println!("To: {to}");
    println!("Value: {value}");

    let gas_price = client.gas_price().await? * GAS_PRICE_BOOST;
    let input = transferCall { to, value }.abi_encode();
    let tx = client
        .submit_call(
            accounts.contracts_owner,
            token,
            input.into(),
            Some(gas_price),
        )
        .await?;
    println!("Transaction hash: {tx}");

    executor::confirm_transaction(&client, "transfer", tx, args.receipt_timeout).await?;
    println!("Transaction was confirmed");
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("reading stdin")?;
    Ok(line.trim().to_string())
}
