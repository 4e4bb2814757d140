pub mod constants;
pub mod network_config;
pub mod abi;
pub mod pricing;
pub mod error;
pub mod call;
pub mod provider;
pub mod ethereum;
pub mod transaction;
pub mod controller;
pub mod mint_flow;
pub mod celebration;
pub mod links;

pub use network_config::{NetworkType, NetworkConfig};
pub use controller::{MintController, MintView, SuccessView};
pub use provider::WalletHandle;
pub use ethereum::InjectedWallet;
pub use pricing::Quantity;
