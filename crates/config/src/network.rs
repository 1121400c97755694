//! Network type, per-network configuration and the registry that selects one.

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Key selecting the production network. Every other key selects testnet.
pub const MAIN_NETWORK_KEY: &str = "main";

/// Default mainnet block explorer.
pub const MAINNET_EXPLORER_URL: &str = "https://hederaexplorer.io";
/// Default testnet block explorer.
pub const TESTNET_EXPLORER_URL: &str = "https://testnet.hederaexplorer.io";
/// Default mainnet mirror transactions endpoint.
pub const MAINNET_MIRROR_URL: &str =
    "https://mainnet-public.mirrornode.hedera.com/api/v1/transactions/";
/// Default testnet mirror transactions endpoint.
pub const TESTNET_MIRROR_URL: &str = "https://testnet.mirrornode.hedera.com/api/v1/transactions/";

/// Hedera ledger environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    /// Production network
    MainNet,
    /// Public test network
    #[default]
    TestNet,
}

impl NetworkType {
    /// Selects a network by caller-supplied key.
    ///
    /// Only the exact key `"main"` selects mainnet; anything else, including
    /// `"mainnet"` or `"MAIN"`, falls back to testnet.
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        if key == MAIN_NETWORK_KEY {
            Self::MainNet
        } else {
            Self::TestNet
        }
    }

    /// Ledger environment name understood by the node SDK.
    #[must_use]
    pub const fn network_name(&self) -> &'static str {
        match self {
            Self::MainNet => "mainnet",
            Self::TestNet => "testnet",
        }
    }

    /// Default explorer base URL.
    #[must_use]
    pub const fn explorer_url(&self) -> &'static str {
        match self {
            Self::MainNet => MAINNET_EXPLORER_URL,
            Self::TestNet => TESTNET_EXPLORER_URL,
        }
    }

    /// Default mirror transactions endpoint.
    #[must_use]
    pub const fn mirror_url(&self) -> &'static str {
        match self {
            Self::MainNet => MAINNET_MIRROR_URL,
            Self::TestNet => TESTNET_MIRROR_URL,
        }
    }
}

impl std::fmt::Display for NetworkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.network_name())
    }
}

/// Network-specific configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network type
    pub network_type: NetworkType,

    /// Ledger environment name (`mainnet`, `testnet`)
    pub network_name: String,

    /// Block explorer base URL
    pub explorer_url: String,

    /// Mirror transactions endpoint; lookups append the transaction id
    pub mirror_url: Option<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::for_network(NetworkType::TestNet)
    }
}

impl NetworkConfig {
    /// Create the built-in configuration for a network type
    #[must_use]
    pub fn for_network(network_type: NetworkType) -> Self {
        Self {
            network_type,
            network_name: network_type.network_name().to_string(),
            explorer_url: network_type.explorer_url().to_string(),
            mirror_url: Some(network_type.mirror_url().to_string()),
        }
    }

    /// Explorer page for a transaction
    #[must_use]
    pub fn transaction_link(&self, transaction_id: &str) -> String {
        format!(
            "{}/search-details/transaction/{transaction_id}",
            self.explorer_base()
        )
    }

    /// Explorer page for an account
    #[must_use]
    pub fn wallet_link(&self, address: &str) -> String {
        format!("{}/search-details/account/{address}", self.explorer_base())
    }

    /// Mirror endpoint, if one is configured
    #[must_use]
    pub fn mirror_url(&self) -> Option<&str> {
        self.mirror_url.as_deref()
    }

    fn explorer_base(&self) -> &str {
        self.explorer_url.trim_end_matches('/')
    }
}

/// The fixed main/test configuration table.
///
/// Built once at start-up and shared by reference; resolution never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkRegistry {
    main: NetworkConfig,
    test: NetworkConfig,
}

impl Default for NetworkRegistry {
    fn default() -> Self {
        Self::new(
            NetworkConfig::for_network(NetworkType::MainNet),
            NetworkConfig::for_network(NetworkType::TestNet),
        )
    }
}

impl NetworkRegistry {
    /// Creates a registry from explicit entries.
    #[must_use]
    pub fn new(main: NetworkConfig, test: NetworkConfig) -> Self {
        Self { main, test }
    }

    /// Resolves a caller-supplied network key, see [`NetworkType::from_key`].
    #[must_use]
    pub fn resolve(&self, key: &str) -> &NetworkConfig {
        let config = self.get(NetworkType::from_key(key));
        trace!(key, network = %config.network_name, "resolved network");
        config
    }

    /// Entry for a network type.
    #[must_use]
    pub fn get(&self, network_type: NetworkType) -> &NetworkConfig {
        match network_type {
            NetworkType::MainNet => &self.main,
            NetworkType::TestNet => &self.test,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_resolve_main_and_test() {
        let registry = NetworkRegistry::default();
        assert_eq!(registry.resolve("main").network_name, "mainnet");
        assert_eq!(registry.resolve("testnet").network_name, "testnet");
        assert_eq!(registry.resolve("test").network_type, NetworkType::TestNet);
    }

    #[test]
    fn test_resolve_falls_back_to_testnet() {
        let registry = NetworkRegistry::default();
        for key in ["", "mainnet", "MAIN", " main", "main ", "prod"] {
            assert_eq!(registry.resolve(key).network_type, NetworkType::TestNet, "{key:?}");
        }
    }

    #[test]
    fn test_links() {
        let registry = NetworkRegistry::default();
        assert_eq!(
            registry
                .resolve("main")
                .transaction_link("0.0.1234-1662631612-548883749"),
            "https://hederaexplorer.io/search-details/transaction/0.0.1234-1662631612-548883749"
        );
        assert_eq!(
            registry.resolve("test").wallet_link("0.0.1234"),
            "https://testnet.hederaexplorer.io/search-details/account/0.0.1234"
        );
    }

    #[test]
    fn test_trailing_slash_in_explorer_url() {
        let mut config = NetworkConfig::for_network(NetworkType::TestNet);
        config.explorer_url = "https://explorer.example/".to_string();
        assert_eq!(
            config.wallet_link("0.0.1"),
            "https://explorer.example/search-details/account/0.0.1"
        );
    }

    proptest! {
        #[test]
        fn every_other_key_is_testnet(key in any::<String>()) {
            prop_assume!(key != MAIN_NETWORK_KEY);
            let registry = NetworkRegistry::default();
            prop_assert_eq!(registry.resolve(&key).network_type, NetworkType::TestNet);
        }
    }
}
