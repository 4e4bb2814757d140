use alloy_primitives::{Address, TxHash};
use super::network_config::NetworkConfig;

/// Marketplace page listing the items collected by `address`
pub fn marketplace_url(config: &NetworkConfig, address: &Address) -> String {
    format!("{}/{}?tab=collected", config.marketplace_base_url, address)
}

/// Block explorer page for a transaction
pub fn explorer_url(config: &NetworkConfig, hash: &TxHash) -> String {
    format!("{}/tx/{}", config.explorer_base_url, hash)
}

/// Marketplace page of the whole collection
pub fn collection_url(config: &NetworkConfig) -> String {
    format!("{}/collection/{}", config.marketplace_base_url, config.collection_slug)
}

/// `0x1234...abcd` form used on the connect button
pub fn short_address(address: &Address) -> String {
    let full = address.to_string();
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}
