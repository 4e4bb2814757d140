use serde::{Serialize, Deserialize};

/// Network environment enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkType {
    /// Ethereum mainnet, where the collection is deployed
    Mainnet,
}

/// Network configuration: chain, contract and the outbound link bases
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub network_type: NetworkType,
    pub chain_id: u64,
    pub contract_address: &'static str,
    pub explorer_base_url: &'static str,
    pub marketplace_base_url: &'static str,
    pub collection_slug: &'static str,
}

impl NetworkConfig {
    /// Mainnet configuration
    const MAINNET: NetworkConfig = NetworkConfig {
        network_type: NetworkType::Mainnet,
        chain_id: 1,
        contract_address: "0x9E33B16db8F972E57b9cB0da9438d840A5C9f7A0",
        explorer_base_url: "https://etherscan.io",
        marketplace_base_url: "https://opensea.io",
        collection_slug: "stupid-faces-nft",
    };

    /// Get network configuration for specific network type
    pub fn for_network(network: NetworkType) -> &'static NetworkConfig {
        match network {
            NetworkType::Mainnet => &Self::MAINNET,
        }
    }

    /// Chain id as the hex quantity wallets report through `eth_chainId`
    pub fn chain_id_hex(&self) -> String {
        format!("0x{:x}", self.chain_id)
    }

    pub fn is_expected_chain(&self, chain_id: u64) -> bool {
        self.chain_id == chain_id
    }
}

impl NetworkType {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkType::Mainnet => "mainnet",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;
    use std::str::FromStr;

    #[test]
    fn test_mainnet_contract_address_parses() {
        let config = NetworkConfig::for_network(NetworkType::Mainnet);
        assert!(Address::from_str(config.contract_address).is_ok());
        assert_eq!(config.chain_id, 1);
    }

    #[test]
    fn test_chain_id_hex() {
        let config = NetworkConfig::for_network(NetworkType::Mainnet);
        assert_eq!(config.chain_id_hex(), "0x1");
        assert!(config.is_expected_chain(1));
        assert!(!config.is_expected_chain(137));
    }
}
