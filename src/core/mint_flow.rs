//! Async steps of the mint page: connect, follow the network, prepare,
//! execute, watch.
//!
//! Each step reads what it needs from the controller, awaits the wallet,
//! then writes the result back through a short `update_mint` call. Nothing
//! holds a borrow of the controller across an await.

use std::cell::RefCell;
use alloy_primitives::TxHash;

use super::controller::MintController;
use super::error::WalletError;
use super::provider::WalletProvider;

/// Somewhere the page's `MintController` lives (a reactive signal in the
/// app, a `RefCell` in tests)
pub trait MintStore {
    /// Run `f` against the controller. `None` if the store is gone.
    fn update_mint<R>(&self, f: impl FnOnce(&mut MintController) -> R) -> Option<R>;
}

impl MintStore for RefCell<MintController> {
    fn update_mint<R>(&self, f: impl FnOnce(&mut MintController) -> R) -> Option<R> {
        let mut controller = self.try_borrow_mut().ok()?;
        Some(f(&mut controller))
    }
}

/// Pick up an already-authorized account, and the network it is on, on page load
pub async fn sync_address(provider: &dyn WalletProvider, store: &impl MintStore) {
    match provider.current_address().await {
        Ok(address) => {
            store.update_mint(|c| c.set_address(address));
            sync_chain(provider, store).await;
        }
        Err(WalletError::ProviderNotFound) => log::info!("No injected wallet detected"),
        Err(e) => log::warn!("Failed to read wallet address: {}", e),
    }
}

/// Read the wallet's current chain into the controller
pub async fn sync_chain(provider: &dyn WalletProvider, store: &impl MintStore) {
    match provider.chain_id().await {
        Ok(chain_id) => {
            store.update_mint(|c| c.set_chain_id(Some(chain_id)));
        }
        Err(e) => log::warn!("Failed to read wallet network: {}", e),
    }
}

/// Prompt the wallet for an account
pub async fn connect_wallet(provider: &dyn WalletProvider, store: &impl MintStore) -> Result<(), WalletError> {
    let address = provider.request_connection().await?;
    store.update_mint(|c| c.set_address(address));
    sync_chain(provider, store).await;
    Ok(())
}

/// Ask the wallet to move to the page's network
pub async fn switch_network(provider: &dyn WalletProvider, store: &impl MintStore) -> Result<(), WalletError> {
    provider.switch_network().await?;
    sync_chain(provider, store).await;
    Ok(())
}

/// Simulate the call for the current quantity and address
pub async fn refresh_preparation(provider: &dyn WalletProvider, store: &impl MintStore) {
    let Some(Some(request)) = store.update_mint(|c| c.begin_preparation()) else {
        return;
    };
    log::debug!(
        "Preparing mint: value {} wei from {}",
        request.descriptor.value, request.descriptor.sender
    );
    let result = provider.prepare_call(&request.descriptor).await;
    store.update_mint(|c| c.finish_preparation(request.generation, result));
}

/// Submit the prepared call and follow it until it is included.
/// Does nothing if the controller does not allow minting right now.
pub async fn execute_mint(provider: &dyn WalletProvider, store: &impl MintStore) {
    let Some(Some(ticket)) = store.update_mint(|c| c.begin_execute()) else {
        return;
    };

    match provider.submit_call(&ticket.prepared).await {
        Ok(hash) => {
            store.update_mint(|c| c.record_submitted(ticket.attempt, hash));
            watch_confirmation(provider, store, hash).await;
        }
        Err(error) => {
            store.update_mint(|c| c.record_failure(ticket.attempt, error));
        }
    }
}

/// Wait for `hash` to be included and record the outcome
pub async fn watch_confirmation(provider: &dyn WalletProvider, store: &impl MintStore, hash: TxHash) {
    match provider.watch_transaction(hash).await {
        Ok(status) => {
            store.update_mint(|c| c.record_receipt(hash, status));
        }
        Err(e) => log::error!("Stopped watching {}: {}", hash, e),
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use async_trait::async_trait;
    use alloy_primitives::{Address, TxHash, U256};
    use tokio::sync::oneshot;

    use crate::core::call::{CallDescriptor, PreparedCall};
    use crate::core::error::{ExecutionError, PreparationError, WalletError};
    use crate::core::provider::{AddressListener, ChainListener, ReceiptStatus, WalletProvider};

    pub const MAINNET_CHAIN_ID: u64 = 1;

    /// Scriptable wallet used by the flow tests
    #[derive(Default)]
    pub struct FakeWallet {
        pub address: Cell<Option<Address>>,
        pub chain_id: Cell<u64>,
        pub balance: Cell<U256>,
        pub submissions: RefCell<VecDeque<Result<TxHash, ExecutionError>>>,
        pub receipts: RefCell<Vec<(TxHash, oneshot::Receiver<ReceiptStatus>)>>,
        pub listeners: RefCell<Vec<AddressListener>>,
        pub chain_listeners: RefCell<Vec<ChainListener>>,
        pub prepare_calls: Cell<usize>,
        pub submit_calls: Cell<usize>,
    }

    impl FakeWallet {
        pub fn with_balance(address: Address, balance: U256) -> Self {
            let wallet = Self::default();
            wallet.address.set(Some(address));
            wallet.chain_id.set(MAINNET_CHAIN_ID);
            wallet.balance.set(balance);
            wallet
        }

        pub fn queue_submission(&self, result: Result<TxHash, ExecutionError>) {
            self.submissions.borrow_mut().push_back(result);
        }

        /// Register a pending receipt; completing the sender confirms it
        pub fn pending_receipt(&self, hash: TxHash) -> oneshot::Sender<ReceiptStatus> {
            let (tx, rx) = oneshot::channel();
            self.receipts.borrow_mut().push((hash, rx));
            tx
        }

        pub fn emit_address(&self, address: Option<Address>) {
            self.address.set(address);
            for listener in self.listeners.borrow().iter() {
                listener(address);
            }
        }

        pub fn emit_chain(&self, chain_id: u64) {
            self.chain_id.set(chain_id);
            for listener in self.chain_listeners.borrow().iter() {
                listener(chain_id);
            }
        }

        fn on_mainnet(&self) -> Result<(), (u64, u64)> {
            match self.chain_id.get() {
                MAINNET_CHAIN_ID => Ok(()),
                actual => Err((MAINNET_CHAIN_ID, actual)),
            }
        }
    }

    #[async_trait(?Send)]
    impl WalletProvider for FakeWallet {
        async fn current_address(&self) -> Result<Option<Address>, WalletError> {
            Ok(self.address.get())
        }

        async fn request_connection(&self) -> Result<Option<Address>, WalletError> {
            self.address.get().map(Some).ok_or(WalletError::Rejected)
        }

        fn subscribe_address_changes(&self, listener: AddressListener) -> Result<(), WalletError> {
            self.listeners.borrow_mut().push(listener);
            Ok(())
        }

        async fn chain_id(&self) -> Result<u64, WalletError> {
            Ok(self.chain_id.get())
        }

        async fn switch_network(&self) -> Result<(), WalletError> {
            self.emit_chain(MAINNET_CHAIN_ID);
            Ok(())
        }

        fn subscribe_chain_changes(&self, listener: ChainListener) -> Result<(), WalletError> {
            self.chain_listeners.borrow_mut().push(listener);
            Ok(())
        }

        async fn prepare_call(&self, descriptor: &CallDescriptor) -> Result<PreparedCall, PreparationError> {
            self.prepare_calls.set(self.prepare_calls.get() + 1);
            if let Err((expected, actual)) = self.on_mainnet() {
                return Err(PreparationError::WrongNetwork { expected, actual });
            }
            if descriptor.value > self.balance.get() {
                return Err(PreparationError::InsufficientFunds);
            }
            Ok(PreparedCall { descriptor: descriptor.clone(), gas_limit: U256::from(120_000u64) })
        }

        async fn submit_call(&self, _prepared: &PreparedCall) -> Result<TxHash, ExecutionError> {
            self.submit_calls.set(self.submit_calls.get() + 1);
            if let Err((expected, actual)) = self.on_mainnet() {
                return Err(ExecutionError::WrongNetwork { expected, actual });
            }
            self.submissions
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(ExecutionError::Wallet("no scripted submission".to_string())))
        }

        async fn watch_transaction(&self, hash: TxHash) -> Result<ReceiptStatus, WalletError> {
            let receiver = {
                let mut receipts = self.receipts.borrow_mut();
                let idx = receipts
                    .iter()
                    .position(|(h, _)| *h == hash)
                    .ok_or_else(|| WalletError::InvalidResponse(format!("unknown hash {}", hash)))?;
                receipts.remove(idx).1
            };
            receiver
                .await
                .map_err(|_| WalletError::JavaScriptError("receipt channel closed".to_string()))
        }
    }
}
