//! Thin wrapper around the provider (the client communicating with the
//! chain node) plus address-string handling shared by the binaries.

use {
    alloy::{
        primitives::Address,
        providers::{DynProvider, Provider, ProviderBuilder},
    },
    anyhow::{Context, Result, anyhow, ensure},
    url::Url,
};

pub type AlloyProvider = DynProvider;

/// Create a provider speaking JSON-RPC over HTTP to the given node.
pub fn provider(url: &Url) -> AlloyProvider {
    ProviderBuilder::new().connect_http(url.clone()).erased()
}

/// Parses an address string the way the node-side `isAddress` check
/// treats user input: uniform-case hex is accepted as-is, mixed-case
/// hex must carry a valid EIP-55 checksum.
pub fn parse_address(s: &str) -> Result<Address> {
    let hex = s.strip_prefix("0x").unwrap_or(s);
    ensure!(
        hex.len() == Address::len_bytes() * 2,
        "{s:?} is not a 40 hex digit address"
    );
    let mixed_case = hex.bytes().any(|b| b.is_ascii_uppercase())
        && hex.bytes().any(|b| b.is_ascii_lowercase());
    if mixed_case {
        Address::parse_checksummed(format!("0x{hex}"), None)
            .map_err(|_| anyhow!("{s:?} has an invalid EIP-55 checksum"))
    } else {
        hex.parse()
            .with_context(|| format!("{s:?} is not a hex address"))
    }
}
