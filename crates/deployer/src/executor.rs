//! Deployment execution: submits one deployment transaction at a
//! time, blocks until its receipt is available and records the
//! resulting address before moving to the next step, so that an
//! aborted run can be resumed without re-deploying anything.

use {
    crate::{
        artifacts::Artifacts,
        config::{Accounts, AddressTable, ConfigError},
        plan::Contract,
        traits::{ChainClient, Receipt},
    },
    alloy::primitives::{Address, B256, Bytes},
    std::{sync::Arc, time::Duration},
};

/// How long to wait between receipt queries for a pending transaction.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum ExecuteError {
    #[error(
        "{label}: transaction {tx} consumed its entire gas allowance of {gas_used}, which is the \
         chain's signal of an aborted execution"
    )]
    DeploymentFailed { label: String, tx: B256, gas_used: u64 },
    #[error(
        "{label}: no receipt for transaction {tx} within {timeout:?}; check the chain state \
         manually before re-running, the transaction may still be mined"
    )]
    ReceiptTimeout {
        label: String,
        tx: B256,
        timeout: Duration,
    },
    #[error("{label}: receipt for transaction {tx} carries no contract address")]
    NoContractAddress { label: String, tx: B256 },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Node(#[from] anyhow::Error),
}

/// Waits for the receipt of `tx` and verifies that the execution went
/// through. The chain refunds unused gas on success, so a receipt
/// whose gas consumption equals the supplied gas means the execution
/// was aborted; success requires consumption strictly below the
/// supplied gas.
///
/// A timeout is not retried here: the transaction may still be mined
/// later, and resubmitting would risk paying for a second deployment.
pub async fn confirm_transaction(
    client: &dyn ChainClient,
    label: &str,
    tx: B256,
    timeout: Duration,
) -> Result<Receipt, ExecuteError> {
    let deadline = tokio::time::Instant::now() + timeout;
    let receipt = loop {
        if let Some(receipt) = client.find_receipt(tx).await? {
            break receipt;
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(ExecuteError::ReceiptTimeout {
                label: label.to_string(),
                tx,
                timeout,
            });
        }
        tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
    };
    let gas_limit = client.transaction_gas_limit(tx).await?;
    if receipt.gas_used >= gas_limit {
        return Err(ExecuteError::DeploymentFailed {
            label: label.to_string(),
            tx,
            gas_used: receipt.gas_used,
        });
    }
    Ok(receipt)
}

pub struct Executor {
    pub client: Arc<dyn ChainClient>,
    pub artifacts: Artifacts,
    pub receipt_timeout: Duration,
}

impl Executor {
    /// Deploys a single contract and returns its on-chain address.
    pub async fn deploy(
        &self,
        contract: Contract,
        args: &[Address],
        from: Address,
    ) -> Result<Address, ExecuteError> {
        let artifact = self.artifacts.load(contract.artifact())?;
        let code = deployment_code(&artifact.bytecode, args);
        let tx = self.client.submit_deployment(from, code).await?;
        tracing::info!(contract = contract.artifact(), ?tx, "deployment submitted");
        let receipt =
            confirm_transaction(self.client.as_ref(), contract.artifact(), tx, self.receipt_timeout)
                .await?;
        let address = receipt
            .contract_address
            .ok_or(ExecuteError::NoContractAddress {
                label: contract.artifact().to_string(),
                tx,
            })?;
        tracing::info!(contract = contract.artifact(), %address, "deployed");
        Ok(address)
    }

    /// Runs the planner's step list strictly in order. Constructor
    /// arguments are resolved against the table as it is updated, so
    /// later steps see the addresses earlier steps produced. The table
    /// is persisted through `persist` after every success; the first
    /// failure aborts the remaining steps, with everything deployed so
    /// far already recorded for the next run.
    pub async fn run_plan(
        &self,
        plan: &[Contract],
        table: &mut AddressTable,
        accounts: &Accounts,
        mut persist: impl FnMut(&AddressTable) -> Result<(), ConfigError>,
    ) -> Result<(), ExecuteError> {
        for &contract in plan {
            let args = contract.constructor_args(table, accounts)?;
            let address = self.deploy(contract, &args, accounts.contracts_owner).await?;
            contract.record(table, address);
            persist(table)?;
        }
        Ok(())
    }
}

/// Appends the ABI encoding of the constructor arguments to the
/// creation bytecode. All constructors in this contract set take
/// statically encoded address arguments, one 32 byte word each.
fn deployment_code(bytecode: &Bytes, args: &[Address]) -> Bytes {
    let mut code = bytecode.to_vec();
    for arg in args {
        code.extend_from_slice(arg.into_word().as_slice());
    }
    code.into()
}
