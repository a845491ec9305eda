//! Trait definition for the chain-node boundary.
//!
//! Abstracts transaction submission and receipt queries so the
//! planning and execution logic can be unit tested with mocks.

use {
    alloy::primitives::{Address, B256, Bytes},
    anyhow::Result,
};

/// Confirmation record the chain produces for a mined transaction,
/// reduced to the fields the tools consume.
#[derive(Clone, Copy, Debug)]
pub struct Receipt {
    /// Address of the created contract, for contract-creation
    /// transactions.
    pub contract_address: Option<Address>,
    /// Gas the execution consumed.
    pub gas_used: u64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ChainClient: Send + Sync {
    /// The accounts the connected node can sign transactions for.
    async fn accounts(&self) -> Result<Vec<Address>>;

    /// Submits a contract-creation transaction and returns its hash.
    async fn submit_deployment(&self, from: Address, code: Bytes) -> Result<B256>;

    /// Submits a call to `to`, optionally overriding the node's gas
    /// price.
    async fn submit_call(
        &self,
        from: Address,
        to: Address,
        input: Bytes,
        gas_price: Option<u128>,
    ) -> Result<B256>;

    /// The receipt of `tx`, or `None` while it is not mined yet.
    async fn find_receipt(&self, tx: B256) -> Result<Option<Receipt>>;

    /// The gas supplied to an already submitted transaction.
    async fn transaction_gas_limit(&self, tx: B256) -> Result<u64>;

    /// The gas price the node would currently use.
    async fn gas_price(&self) -> Result<u128>;
}
