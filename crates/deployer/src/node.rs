//! The production [`ChainClient`] backed by a node connection.

use {
    crate::traits::{ChainClient, Receipt},
    alloy::{
        consensus::Transaction as _,
        network::TransactionBuilder,
        primitives::{Address, B256, Bytes},
        providers::Provider,
        rpc::types::TransactionRequest,
    },
    anyhow::{Context, Result, anyhow},
    ethnode::AlloyProvider,
};

pub struct NodeClient {
    provider: AlloyProvider,
}

impl NodeClient {
    pub fn new(provider: AlloyProvider) -> Self {
        Self { provider }
    }
}

#[async_trait::async_trait]
impl ChainClient for NodeClient {
    async fn accounts(&self) -> Result<Vec<Address>> {
        self.provider.get_accounts().await.context("eth_accounts")
    }

    async fn submit_deployment(&self, from: Address, code: Bytes) -> Result<B256> {
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_deploy_code(code);
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .context("eth_sendTransaction")?;
        Ok(*pending.tx_hash())
    }

    async fn submit_call(
        &self,
        from: Address,
        to: Address,
        input: Bytes,
        gas_price: Option<u128>,
    ) -> Result<B256> {
        let mut tx = TransactionRequest::default()
            .with_from(from)
            .with_to(to)
            .with_input(input);
        if let Some(gas_price) = gas_price {
            tx = tx.with_gas_price(gas_price);
        }
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .context("eth_sendTransaction")?;
        Ok(*pending.tx_hash())
    }

    async fn find_receipt(&self, tx: B256) -> Result<Option<Receipt>> {
        let receipt = self
            .provider
            .get_transaction_receipt(tx)
            .await
            .context("eth_getTransactionReceipt")?;
        Ok(receipt.map(|receipt| Receipt {
            contract_address: receipt.contract_address,
            gas_used: receipt.gas_used,
        }))
    }

    async fn transaction_gas_limit(&self, tx: B256) -> Result<u64> {
        let transaction = self
            .provider
            .get_transaction_by_hash(tx)
            .await
            .context("eth_getTransactionByHash")?
            .ok_or_else(|| anyhow!("transaction {tx} is unknown to the node"))?;
        Ok(transaction.gas_limit())
    }

    async fn gas_price(&self) -> Result<u128> {
        self.provider.get_gas_price().await.context("eth_gasPrice")
    }
}
