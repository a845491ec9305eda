//! Deployment planning: classifies each contract of the platform as
//! deployed or pending and orders the pending ones so that every
//! constructor dependency is resolved before it is needed.

use {
    crate::config::{Accounts, AddressTable, ConfigError},
    alloy::primitives::Address,
};

/// The contracts this tool deploys, in canonical deployment order.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Contract {
    JoyToken,
    Deposit,
    DemoGame,
    SubscriptionEther,
    SubscriptionJoyToken,
}

/// Contracts whose constructors consume their predecessor's address.
/// A contract here can only be deployed after everything before it.
const MAIN_CHAIN: [Contract; 3] = [Contract::JoyToken, Contract::Deposit, Contract::DemoGame];

/// Contracts that can be deployed independently of the main chain and
/// of each other.
const INDEPENDENT: [Contract; 2] = [Contract::SubscriptionEther, Contract::SubscriptionJoyToken];

impl Contract {
    pub const ALL: [Self; 5] = [
        Self::JoyToken,
        Self::Deposit,
        Self::DemoGame,
        Self::SubscriptionEther,
        Self::SubscriptionJoyToken,
    ];

    /// Name of the compiled artifact to deploy.
    pub fn artifact(&self) -> &'static str {
        match self {
            Self::JoyToken => "JoyToken",
            Self::Deposit => "PlatformDeposit",
            Self::DemoGame => "JoyGameDemo",
            Self::SubscriptionEther => "SubscriptionWithEther",
            Self::SubscriptionJoyToken => "SubscriptionWithJoyToken",
        }
    }

    /// JSON path of this contract's entry in the address table.
    pub fn field(&self) -> &'static str {
        match self {
            Self::JoyToken => "ContractAddress.joyToken",
            Self::Deposit => "ContractAddress.deposit",
            Self::DemoGame => "ContractAddress.demoGame",
            Self::SubscriptionEther => "ContractAddress.subscription.ether",
            Self::SubscriptionJoyToken => "ContractAddress.subscription.joyToken",
        }
    }

    fn recorded<'t>(&self, table: &'t AddressTable) -> &'t str {
        match self {
            Self::JoyToken => &table.contracts.joy_token,
            Self::Deposit => &table.contracts.deposit,
            Self::DemoGame => &table.contracts.demo_game,
            Self::SubscriptionEther => &table.contracts.subscription.ether,
            Self::SubscriptionJoyToken => &table.contracts.subscription.joy_token,
        }
    }

    /// Returns the recorded address, `None` while the contract is
    /// pending. A populated entry that does not parse as an address is
    /// a configuration error, not a pending contract.
    pub fn deployed(&self, table: &AddressTable) -> Result<Option<Address>, ConfigError> {
        let recorded = self.recorded(table);
        if recorded.is_empty() {
            return Ok(None);
        }
        ethnode::parse_address(recorded)
            .map(Some)
            .map_err(|source| ConfigError::InvalidAddress {
                field: self.field().to_string(),
                value: recorded.to_string(),
                source,
            })
    }

    /// Records a freshly deployed address in the in-memory table.
    pub fn record(&self, table: &mut AddressTable, address: Address) {
        let slot = match self {
            Self::JoyToken => &mut table.contracts.joy_token,
            Self::Deposit => &mut table.contracts.deposit,
            Self::DemoGame => &mut table.contracts.demo_game,
            Self::SubscriptionEther => &mut table.contracts.subscription.ether,
            Self::SubscriptionJoyToken => &mut table.contracts.subscription.joy_token,
        };
        *slot = address.to_string();
    }

    /// Resolves the constructor arguments from the current table
    /// state. Dependencies deployed earlier in the same run are
    /// visible here because the executor records each address before
    /// resolving the next step.
    pub fn constructor_args(
        &self,
        table: &AddressTable,
        accounts: &Accounts,
    ) -> Result<Vec<Address>, ConfigError> {
        let dependency = |contract: Contract| {
            contract
                .deployed(table)?
                .ok_or(ConfigError::MissingDependency {
                    contract: self.artifact(),
                    dependency: contract.artifact(),
                })
        };
        Ok(match self {
            Self::JoyToken | Self::SubscriptionEther => vec![],
            Self::Deposit => vec![dependency(Self::JoyToken)?, accounts.platform_reserve],
            Self::DemoGame => vec![dependency(Self::Deposit)?, accounts.game_developer],
            Self::SubscriptionJoyToken => vec![dependency(Self::JoyToken)?],
        })
    }
}

/// Computes the ordered list of pending deployment steps for the given
/// table. Running the plan and then planning again yields an empty
/// list.
pub fn plan(table: &AddressTable) -> Result<Vec<Contract>, ConfigError> {
    let mut steps = Vec::new();
    // Once a contract in the chain needs deploying, everything after
    // it is redeployed as well: a recorded downstream address would
    // reference the stale predecessor.
    let mut chain_broken = false;
    for contract in MAIN_CHAIN {
        if chain_broken || contract.deployed(table)?.is_none() {
            chain_broken = true;
            steps.push(contract);
        }
    }
    for contract in INDEPENDENT {
        if contract.deployed(table)?.is_none() {
            steps.push(contract);
        }
    }
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::config::{AccountAddresses, ContractAddresses, SubscriptionAddresses},
    };

    fn address(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    fn accounts() -> Accounts {
        Accounts {
            contracts_owner: address(0xa0),
            platform_reserve: address(0xa1),
            game_developer: address(0xa2),
        }
    }

    fn fully_deployed_table() -> AddressTable {
        AddressTable {
            accounts: AccountAddresses::default(),
            contracts: ContractAddresses {
                joy_token: address(1).to_string(),
                deposit: address(2).to_string(),
                demo_game: address(3).to_string(),
                subscription: SubscriptionAddresses {
                    ether: address(4).to_string(),
                    joy_token: address(5).to_string(),
                },
            },
        }
    }

    #[test]
    fn empty_table_plans_every_contract_in_order() {
        let steps = plan(&AddressTable::default()).unwrap();
        assert_eq!(steps, Contract::ALL);
    }

    #[test]
    fn fully_deployed_table_plans_nothing_twice() {
        let table = fully_deployed_table();
        assert_eq!(plan(&table).unwrap(), vec![]);
        assert_eq!(plan(&table).unwrap(), vec![]);
    }

    #[test]
    fn resumes_after_the_token_step() {
        let mut table = fully_deployed_table();
        table.contracts.deposit = String::new();
        table.contracts.demo_game = String::new();
        assert_eq!(
            plan(&table).unwrap(),
            vec![Contract::Deposit, Contract::DemoGame]
        );
    }

    #[test]
    fn pending_chain_predecessor_replans_recorded_successors() {
        // The deposit entry is (incorrectly) still populated, but its
        // token dependency is about to change, so it must be redeployed
        // along with everything after it.
        let mut table = fully_deployed_table();
        table.contracts.joy_token = String::new();
        assert_eq!(
            plan(&table).unwrap(),
            vec![Contract::JoyToken, Contract::Deposit, Contract::DemoGame]
        );
    }

    #[test]
    fn subscriptions_are_planned_independently() {
        let mut table = fully_deployed_table();
        table.contracts.subscription.joy_token = String::new();
        assert_eq!(plan(&table).unwrap(), vec![Contract::SubscriptionJoyToken]);
    }

    #[test]
    fn populated_entry_with_garbage_is_an_error() {
        let mut table = fully_deployed_table();
        table.contracts.demo_game = "0x1234".to_string();
        assert!(matches!(
            plan(&table),
            Err(ConfigError::InvalidAddress { field, .. })
                if field == "ContractAddress.demoGame"
        ));
    }

    #[test]
    fn constructor_args_come_from_table_and_accounts() {
        let table = fully_deployed_table();
        let accounts = accounts();
        assert_eq!(
            Contract::Deposit.constructor_args(&table, &accounts).unwrap(),
            vec![address(1), accounts.platform_reserve]
        );
        assert_eq!(
            Contract::DemoGame.constructor_args(&table, &accounts).unwrap(),
            vec![address(2), accounts.game_developer]
        );
        assert_eq!(
            Contract::SubscriptionJoyToken
                .constructor_args(&table, &accounts)
                .unwrap(),
            vec![address(1)]
        );
        assert_eq!(
            Contract::JoyToken.constructor_args(&table, &accounts).unwrap(),
            Vec::<Address>::new()
        );
    }

    #[test]
    fn unresolved_dependency_is_an_error() {
        let mut table = fully_deployed_table();
        table.contracts.joy_token = String::new();
        assert!(matches!(
            Contract::Deposit.constructor_args(&table, &accounts()),
            Err(ConfigError::MissingDependency {
                contract: "PlatformDeposit",
                dependency: "JoyToken",
            })
        ));
    }
}
