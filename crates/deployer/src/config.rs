//! The persisted address table: the JSON document mapping account
//! roles and contract names to chain addresses that drives and records
//! the deployment workflow.

use {
    alloy::primitives::Address,
    serde::{Deserialize, Serialize},
    std::path::{Path, PathBuf},
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required field {0:?} is missing from the address table")]
    MissingAccount(&'static str),
    #[error("required field {0:?} in the address table is empty")]
    EmptyAccount(&'static str),
    #[error("field {field:?} holds {value:?} which is not a valid address")]
    InvalidAddress {
        field: String,
        value: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("{contract} requires the {dependency} address which is not recorded in the table")]
    MissingDependency {
        contract: &'static str,
        dependency: &'static str,
    },
    #[error("failed to read address table from {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write address table to {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("address table at {path:?} is not valid JSON")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The on-disk document. Raw strings are kept as loaded so that a
/// store after a partial run only changes the fields this run touched;
/// an empty contract entry means "not deployed yet".
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct AddressTable {
    #[serde(rename = "AccountAddress", default)]
    pub accounts: AccountAddresses,
    #[serde(rename = "ContractAddress", default)]
    pub contracts: ContractAddresses,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountAddresses {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contracts_owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_reserve: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_developer: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractAddresses {
    #[serde(default)]
    pub joy_token: String,
    #[serde(default)]
    pub deposit: String,
    #[serde(default)]
    pub demo_game: String,
    #[serde(default)]
    pub subscription: SubscriptionAddresses,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionAddresses {
    #[serde(default)]
    pub ether: String,
    #[serde(default)]
    pub joy_token: String,
}

/// Account addresses validated for a deployment run.
#[derive(Clone, Copy, Debug)]
pub struct Accounts {
    pub contracts_owner: Address,
    pub platform_reserve: Address,
    pub game_developer: Address,
}

impl AddressTable {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
            path: path.to_owned(),
            source,
        })
    }

    /// Writes the table back in a stable, human-diffable format (field
    /// order as in the original document, 4 space indent).
    pub fn store(&self, path: &Path) -> Result<(), ConfigError> {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(Vec::new(), formatter);
        self.serialize(&mut serializer)
            .map_err(|source| ConfigError::Json {
                path: path.to_owned(),
                source,
            })?;
        let mut json = serializer.into_inner();
        json.push(b'\n');
        std::fs::write(path, json).map_err(|source| ConfigError::Write {
            path: path.to_owned(),
            source,
        })
    }

    /// Checks that every required account role is present, non-empty
    /// and a well-formed address, and returns the typed addresses.
    pub fn validate_accounts(&self) -> Result<Accounts, ConfigError> {
        Ok(Accounts {
            contracts_owner: require_account(
                "AccountAddress.contractsOwner",
                &self.accounts.contracts_owner,
            )?,
            platform_reserve: require_account(
                "AccountAddress.platformReserve",
                &self.accounts.platform_reserve,
            )?,
            game_developer: require_account(
                "AccountAddress.gameDeveloper",
                &self.accounts.game_developer,
            )?,
        })
    }
}

fn require_account(field: &'static str, value: &Option<String>) -> Result<Address, ConfigError> {
    let value = value.as_ref().ok_or(ConfigError::MissingAccount(field))?;
    if value.is_empty() {
        return Err(ConfigError::EmptyAccount(field));
    }
    ethnode::parse_address(value).map_err(|source| ConfigError::InvalidAddress {
        field: field.to_string(),
        value: value.clone(),
        source,
    })
}
