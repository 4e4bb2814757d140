//! Capability surface of the external wallet.
//!
//! The page never talks to `window.ethereum` directly; it goes through this
//! trait so the whole mint flow can run against a fake wallet in tests.

use std::rc::Rc;
use async_trait::async_trait;
use alloy_primitives::{Address, TxHash};

use super::call::{CallDescriptor, PreparedCall};
use super::error::{ExecutionError, PreparationError, WalletError};

/// Callback invoked with the new address whenever the wallet switches
/// accounts or disconnects
pub type AddressListener = Box<dyn Fn(Option<Address>)>;

/// Callback invoked with the new chain id whenever the wallet switches networks
pub type ChainListener = Box<dyn Fn(u64)>;

/// What the chain said about an included transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    Success,
    Reverted,
}

#[async_trait(?Send)]
pub trait WalletProvider {
    /// Currently exposed account, without prompting the user
    async fn current_address(&self) -> Result<Option<Address>, WalletError>;

    /// Prompt the user to connect and return the selected account
    async fn request_connection(&self) -> Result<Option<Address>, WalletError>;

    /// Register for account changes (including disconnection)
    fn subscribe_address_changes(&self, listener: AddressListener) -> Result<(), WalletError>;

    /// Chain the wallet is currently pointed at
    async fn chain_id(&self) -> Result<u64, WalletError>;

    /// Ask the wallet to move to the page's network
    async fn switch_network(&self) -> Result<(), WalletError>;

    /// Register for network switches
    fn subscribe_chain_changes(&self, listener: ChainListener) -> Result<(), WalletError>;

    /// Simulate the call and return it ready for submission. Fails with
    /// `WrongNetwork` if the wallet is not on the page's network.
    async fn prepare_call(&self, descriptor: &CallDescriptor) -> Result<PreparedCall, PreparationError>;

    /// Ask the wallet to sign and broadcast; resolves once the hash is known.
    /// Re-checks the network before sending.
    async fn submit_call(&self, prepared: &PreparedCall) -> Result<TxHash, ExecutionError>;

    /// Wait until the transaction is included. Never times out.
    async fn watch_transaction(&self, hash: TxHash) -> Result<ReceiptStatus, WalletError>;
}

/// Shared handle to the wallet, cheap to clone into closures and context
#[derive(Clone)]
pub struct WalletHandle(pub Rc<dyn WalletProvider>);

impl WalletHandle {
    pub fn new(provider: impl WalletProvider + 'static) -> Self {
        Self(Rc::new(provider))
    }

    pub fn provider(&self) -> &dyn WalletProvider {
        self.0.as_ref()
    }
}
