pub mod arguments;
pub mod artifacts;
pub mod config;
pub mod executor;
pub mod node;
pub mod plan;
pub mod traits;

use {
    crate::{
        arguments::Arguments,
        artifacts::Artifacts,
        config::{AddressTable, ConfigError},
        executor::{ExecuteError, Executor},
        plan::Contract,
        traits::ChainClient,
    },
    alloy::primitives::Address,
    std::sync::Arc,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(
        "account {account} ({purpose}) is not available from the connected node; available \
         accounts: [{}]",
        .available.iter().map(|account| account.to_string()).collect::<Vec<_>>().join(", ")
    )]
    AccountUnavailable {
        account: Address,
        purpose: &'static str,
        available: Vec<Address>,
    },
    #[error(transparent)]
    Execute(#[from] ExecuteError),
    #[error(transparent)]
    Node(#[from] anyhow::Error),
}

pub async fn run(args: Arguments) -> Result<(), Error> {
    let provider = ethnode::provider(&args.node_url);
    let client = Arc::new(node::NodeClient::new(provider));
    run_with(args, client).await
}

/// The full workflow against an explicit chain client: load and
/// validate the address table, plan the pending deployments and
/// execute them in order, persisting the table after each completed
/// step.
pub async fn run_with(args: Arguments, client: Arc<dyn ChainClient>) -> Result<(), Error> {
    let mut table = AddressTable::load(&args.config)?;
    let accounts = table.validate_accounts()?;

    // Without control over the owner account the node could not sign a
    // single deployment, so abort before submitting anything.
    let available = client.accounts().await?;
    if !available.contains(&accounts.contracts_owner) {
        return Err(Error::AccountUnavailable {
            account: accounts.contracts_owner,
            purpose: "contracts owner",
            available,
        });
    }

    for contract in Contract::ALL {
        match contract.deployed(&table)? {
            Some(address) => {
                tracing::info!(contract = contract.artifact(), %address, "already deployed")
            }
            None => tracing::info!(contract = contract.artifact(), "pending deployment"),
        }
    }

    let plan = plan::plan(&table)?;
    if plan.is_empty() {
        tracing::info!("every contract already has an address, nothing to deploy");
        return Ok(());
    }

    let executor = Executor {
        client,
        artifacts: Artifacts::new(args.artifacts.clone()),
        receipt_timeout: args.receipt_timeout,
    };
    executor
        .run_plan(&plan, &mut table, &accounts, |table| {
            table.store(&args.config)
        })
        .await?;
    tracing::info!(config = ?args.config, "deployment complete, address table updated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::traits::MockChainClient,
        std::time::Duration,
    };

    fn arguments(config: std::path::PathBuf) -> Arguments {
        Arguments {
            config,
            artifacts: "build/contracts".into(),
            node_url: "http://localhost:8545".parse().unwrap(),
            receipt_timeout: Duration::from_secs(600),
        }
    }

    fn write_config(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deploy.json");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn missing_owner_fails_without_touching_the_node() {
        let (_dir, path) = write_config(
            r#"{
                "AccountAddress": {
                    "platformReserve": "0x0202020202020202020202020202020202020202",
                    "gameDeveloper": "0x0303030303030303030303030303030303030303"
                }
            }"#,
        );
        // No expectations: any RPC call would fail the test.
        let client = Arc::new(MockChainClient::new());
        let result = run_with(arguments(path), client).await;
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingAccount(
                "AccountAddress.contractsOwner"
            )))
        ));
    }

    #[tokio::test]
    async fn unavailable_owner_aborts_listing_the_node_accounts() {
        let (_dir, path) = write_config(
            r#"{
                "AccountAddress": {
                    "contractsOwner": "0x0101010101010101010101010101010101010101",
                    "platformReserve": "0x0202020202020202020202020202020202020202",
                    "gameDeveloper": "0x0303030303030303030303030303030303030303"
                }
            }"#,
        );
        let node_accounts = vec![Address::repeat_byte(0xaa), Address::repeat_byte(0xbb)];
        let mut client = MockChainClient::new();
        let accounts = node_accounts.clone();
        client
            .expect_accounts()
            .times(1)
            .returning(move || Ok(accounts.clone()));
        // No submission expectations: deploying anyway would fail the
        // test.
        let result = run_with(arguments(path), Arc::new(client)).await;
        match result {
            Err(Error::AccountUnavailable { available, .. }) => {
                assert_eq!(available, node_accounts);
            }
            other => panic!("expected AccountUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fully_deployed_table_is_a_no_op() {
        let (_dir, path) = write_config(
            r#"{
                "AccountAddress": {
                    "contractsOwner": "0x0101010101010101010101010101010101010101",
                    "platformReserve": "0x0202020202020202020202020202020202020202",
                    "gameDeveloper": "0x0303030303030303030303030303030303030303"
                },
                "ContractAddress": {
                    "joyToken": "0x1111111111111111111111111111111111111111",
                    "deposit": "0x1212121212121212121212121212121212121212",
                    "demoGame": "0x1313131313131313131313131313131313131313",
                    "subscription": {
                        "ether": "0x1414141414141414141414141414141414141414",
                        "joyToken": "0x1515151515151515151515151515151515151515"
                    }
                }
            }"#,
        );
        let mut client = MockChainClient::new();
        client.expect_accounts().times(1).returning(|| {
            Ok(vec![
                "0x0101010101010101010101010101010101010101"
                    .parse()
                    .unwrap(),
            ])
        });
        run_with(arguments(path), Arc::new(client)).await.unwrap();
    }
}
