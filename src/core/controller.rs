//! State of the mint page.
//!
//! `MintController` owns every piece of page state (connected address,
//! quantity, call preparation, the session's mint attempt) and exposes
//! small synchronous transitions. Async work lives in `mint_flow` and only
//! touches the controller through those transitions, so the page can never
//! hold a combination of flags the state machine does not allow.

use std::collections::HashMap;
use alloy_primitives::{Address, TxHash};

use super::call::{CallDescriptor, PreparedCall};
use super::error::{ExecutionError, PreparationError};
use super::links::{explorer_url, marketplace_url};
use super::network_config::NetworkConfig;
use super::pricing::Quantity;
use super::provider::ReceiptStatus;
use super::transaction::TransactionState;

/// Outcome of simulating the call for the current quantity and address
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Preparation {
    #[default]
    Idle,
    Pending,
    Ready(PreparedCall),
    Failed(PreparationError),
}

/// The session's mint attempt, remembered together with the wallet that
/// started it so a reconnect can restore its progress
#[derive(Debug, Clone, PartialEq)]
pub struct MintAttempt {
    pub id: u64,
    pub owner: Address,
    pub state: TransactionState,
}

/// Handed to the async preparer; its result is dropped if `generation` is stale
#[derive(Debug, Clone)]
pub struct PreparationRequest {
    pub generation: u64,
    pub descriptor: CallDescriptor,
}

/// Handed to the async executor once the attempt entered awaiting approval
#[derive(Debug, Clone)]
pub struct ExecutionTicket {
    pub attempt: u64,
    pub prepared: PreparedCall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintStatus {
    WaitingForApproval,
    Minting,
    OtherWalletMinting,
}

impl MintStatus {
    pub fn text(&self) -> &'static str {
        match self {
            MintStatus::WaitingForApproval => "Waiting for approval...",
            MintStatus::Minting => "Minting...",
            MintStatus::OtherWalletMinting => "Another wallet has a mint in progress...",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub quantity: Quantity,
    pub total: String,
    pub slider_enabled: bool,
    pub mint_enabled: bool,
    pub status: Option<MintStatus>,
    pub transaction_url: Option<String>,
    pub wrong_network: bool,
    pub preparation_error: Option<&'static str>,
    pub mint_error: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuccessView {
    pub marketplace_url: String,
    pub transaction_url: String,
}

/// What the page should render right now
#[derive(Debug, Clone, PartialEq)]
pub enum MintView {
    Disconnected,
    Form(FormView),
    Success(SuccessView),
}

#[derive(Debug, Clone)]
pub struct MintController {
    config: &'static NetworkConfig,
    address: Option<Address>,
    chain_id: Option<u64>,
    quantity: Quantity,
    preparation: Preparation,
    generation: u64,
    attempt: Option<MintAttempt>,
    // confirmed mints stay terminal for their owner until reload
    confirmed: HashMap<Address, TxHash>,
    next_attempt_id: u64,
}

impl MintController {
    pub fn new(config: &'static NetworkConfig) -> Self {
        Self {
            config,
            address: None,
            chain_id: None,
            quantity: Quantity::default(),
            preparation: Preparation::Idle,
            generation: 0,
            attempt: None,
            confirmed: HashMap::new(),
            next_attempt_id: 1,
        }
    }

    pub fn config(&self) -> &'static NetworkConfig {
        self.config
    }

    // ------------------------------------------------------------------
    // Connection
    // ------------------------------------------------------------------

    pub fn address(&self) -> Option<Address> {
        self.address
    }

    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    /// Track the wallet's address. Returns true if it changed.
    pub fn set_address(&mut self, address: Option<Address>) -> bool {
        if self.address == address {
            return false;
        }
        match address {
            Some(addr) => log::info!("Wallet connected: {}", addr),
            None => log::info!("Wallet disconnected"),
        }
        self.address = address;
        self.invalidate_preparation();
        true
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    /// Track the wallet's network. Returns true if it changed.
    pub fn set_chain_id(&mut self, chain_id: Option<u64>) -> bool {
        if self.chain_id == chain_id {
            return false;
        }
        if let Some(id) = chain_id {
            log::info!("Wallet on chain {}", id);
        }
        self.chain_id = chain_id;
        self.invalidate_preparation();
        true
    }

    /// The wallet reported a chain other than the page's network
    pub fn wrong_network(&self) -> bool {
        self.chain_id.map(|id| !self.config.is_expected_chain(id)).unwrap_or(false)
    }

    // ------------------------------------------------------------------
    // Quantity
    // ------------------------------------------------------------------

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn slider_enabled(&self) -> bool {
        !self.transaction_state().is_in_flight()
    }

    /// Change the quantity. Ignored while the current attempt is in flight.
    pub fn set_quantity(&mut self, quantity: Quantity) -> bool {
        if !self.slider_enabled() || self.quantity == quantity {
            return false;
        }
        log::debug!("Quantity set to {}", quantity);
        self.quantity = quantity;
        self.invalidate_preparation();
        true
    }

    // ------------------------------------------------------------------
    // Preparation
    // ------------------------------------------------------------------

    pub fn preparation_error(&self) -> Option<&PreparationError> {
        match &self.preparation {
            Preparation::Failed(error) => Some(error),
            _ => None,
        }
    }

    fn invalidate_preparation(&mut self) {
        self.generation += 1;
        self.preparation = Preparation::Idle;
    }

    /// Build the descriptor for the current inputs and mark preparation pending.
    /// On a known wrong network the preparation fails without asking the wallet.
    pub fn begin_preparation(&mut self) -> Option<PreparationRequest> {
        let sender = self.address?;
        self.generation += 1;

        if let Some(actual) = self.chain_id.filter(|id| !self.config.is_expected_chain(*id)) {
            log::warn!("Not preparing mint on chain {}", actual);
            self.preparation = Preparation::Failed(PreparationError::WrongNetwork {
                expected: self.config.chain_id,
                actual,
            });
            return None;
        }

        match CallDescriptor::mint(self.config, self.quantity, sender) {
            Ok(descriptor) => {
                self.preparation = Preparation::Pending;
                Some(PreparationRequest { generation: self.generation, descriptor })
            }
            Err(e) => {
                log::error!("Failed to build mint call: {}", e);
                self.preparation = Preparation::Failed(PreparationError::Simulation(e.to_string()));
                None
            }
        }
    }

    /// Apply a simulation result. Returns false if the result was stale.
    pub fn finish_preparation(
        &mut self,
        generation: u64,
        result: Result<PreparedCall, PreparationError>,
    ) -> bool {
        if generation != self.generation {
            log::debug!("Dropping stale preparation {} (current {})", generation, self.generation);
            return false;
        }
        self.preparation = match result {
            Ok(prepared) => {
                log::debug!("Mint call prepared, gas limit {}", prepared.gas_limit);
                Preparation::Ready(prepared)
            }
            Err(error) => {
                log::warn!("Mint preparation failed: {}", error);
                Preparation::Failed(error)
            }
        };
        true
    }

    // ------------------------------------------------------------------
    // Execution
    // ------------------------------------------------------------------

    /// State of the attempt as seen by the connected wallet
    pub fn transaction_state(&self) -> TransactionState {
        match (&self.attempt, self.address) {
            (Some(attempt), Some(address)) if attempt.owner == address => attempt.state.clone(),
            (_, Some(address)) => self
                .confirmed
                .get(&address)
                .map(|hash| TransactionState::Confirmed { hash: *hash })
                .unwrap_or_default(),
            _ => TransactionState::Idle,
        }
    }

    /// The session's attempt is in flight for a wallet other than the connected one
    pub fn other_wallet_in_flight(&self) -> bool {
        match (&self.attempt, self.address) {
            (Some(attempt), Some(address)) => attempt.owner != address && attempt.state.is_in_flight(),
            _ => false,
        }
    }

    /// Whether the session's attempt (whoever owns it) has been confirmed
    pub fn is_minted(&self) -> bool {
        self.attempt.as_ref().map(|a| a.state.is_minted()).unwrap_or(false)
    }

    pub fn can_mint(&self) -> bool {
        if !self.is_connected() || self.wrong_network() || !matches!(self.preparation, Preparation::Ready(_)) {
            return false;
        }
        let session_busy = self.attempt.as_ref().map(|a| a.state.is_in_flight()).unwrap_or(false);
        !session_busy && !self.transaction_state().is_minted()
    }

    /// Enter awaiting approval. Returns `None` (no-op) if minting is not allowed.
    pub fn begin_execute(&mut self) -> Option<ExecutionTicket> {
        if !self.can_mint() {
            log::debug!("Mint requested but not allowed in the current state");
            return None;
        }
        let owner = self.address?;
        let prepared = match &self.preparation {
            Preparation::Ready(prepared) => prepared.clone(),
            _ => return None,
        };

        let current = self.transaction_state();
        let state = match current.start() {
            Ok(state) => state,
            Err(e) => {
                log::error!("{}", e);
                return None;
            }
        };

        let id = self.next_attempt_id;
        self.next_attempt_id += 1;
        log::info!("Mint attempt {} started: {} tokens for {}", id, self.quantity, owner);
        self.attempt = Some(MintAttempt { id, owner, state });

        Some(ExecutionTicket { attempt: id, prepared })
    }

    fn attempt_mut(&mut self, id: u64) -> Option<&mut MintAttempt> {
        self.attempt.as_mut().filter(|a| a.id == id)
    }

    /// Wallet approved and broadcast the transaction
    pub fn record_submitted(&mut self, attempt_id: u64, hash: TxHash) -> bool {
        let Some(attempt) = self.attempt_mut(attempt_id) else {
            log::debug!("Ignoring submission for unknown attempt {}", attempt_id);
            return false;
        };
        match attempt.state.approve(hash) {
            Ok(state) => {
                log::info!("Mint transaction submitted: {}", hash);
                attempt.state = state;
                true
            }
            Err(e) => {
                log::error!("{}", e);
                false
            }
        }
    }

    /// Signing or broadcast failed
    pub fn record_failure(&mut self, attempt_id: u64, error: ExecutionError) -> bool {
        let Some(attempt) = self.attempt_mut(attempt_id) else {
            log::debug!("Ignoring failure for unknown attempt {}", attempt_id);
            return false;
        };
        match attempt.state.fail(error.clone()) {
            Ok(state) => {
                log::error!("Mint attempt {} failed: {}", attempt_id, error);
                attempt.state = state;
                true
            }
            Err(e) => {
                log::error!("{}", e);
                false
            }
        }
    }

    /// The watcher found a receipt for `hash`. Stale hashes are ignored.
    pub fn record_receipt(&mut self, hash: TxHash, status: ReceiptStatus) -> bool {
        let Some(attempt) = self.attempt.as_mut().filter(|a| a.state.hash() == Some(hash)) else {
            log::debug!("Ignoring receipt for stale transaction {}", hash);
            return false;
        };
        let next = match status {
            ReceiptStatus::Success => attempt.state.confirm(hash),
            ReceiptStatus::Reverted => attempt.state.fail(ExecutionError::Reverted(hash)),
        };
        match next {
            Ok(state) => {
                log::info!("Mint transaction {} is now {}", hash, state.name());
                if state.is_minted() {
                    self.confirmed.insert(attempt.owner, hash);
                }
                attempt.state = state;
                true
            }
            Err(e) => {
                log::debug!("{}", e);
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // View
    // ------------------------------------------------------------------

    pub fn view(&self) -> MintView {
        let Some(address) = self.address else {
            return MintView::Disconnected;
        };

        let state = self.transaction_state();
        if let TransactionState::Confirmed { hash } = state {
            return MintView::Success(SuccessView {
                marketplace_url: marketplace_url(self.config, &address),
                transaction_url: explorer_url(self.config, &hash),
            });
        }

        let status = match &state {
            TransactionState::AwaitingApproval => Some(MintStatus::WaitingForApproval),
            TransactionState::Submitted { .. } => Some(MintStatus::Minting),
            _ if self.other_wallet_in_flight() => Some(MintStatus::OtherWalletMinting),
            _ => None,
        };

        MintView::Form(FormView {
            quantity: self.quantity,
            total: self.quantity.display_total(),
            slider_enabled: self.slider_enabled(),
            mint_enabled: self.can_mint(),
            status,
            transaction_url: state.hash().map(|hash| explorer_url(self.config, &hash)),
            wrong_network: self.wrong_network(),
            preparation_error: self.preparation_error().map(|e| e.user_message()),
            mint_error: state.error().map(|e| e.user_message()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::network_config::NetworkType;
    use alloy_primitives::{address, b256, U256};

    const ALICE: Address = address!("00000000000000000000000000000000000000a1");
    const BOB: Address = address!("00000000000000000000000000000000000000b0");
    const HASH_1: TxHash = b256!("0000000000000000000000000000000000000000000000000000000000000001");
    const HASH_2: TxHash = b256!("0000000000000000000000000000000000000000000000000000000000000002");

    fn controller() -> MintController {
        MintController::new(NetworkConfig::for_network(NetworkType::Mainnet))
    }

    /// Connected as `address` with a successfully prepared call
    fn ready(address: Address) -> MintController {
        let mut c = controller();
        c.set_address(Some(address));
        prepare_ok(&mut c);
        c
    }

    fn prepare_ok(c: &mut MintController) {
        let request = c.begin_preparation().unwrap();
        let prepared = PreparedCall { descriptor: request.descriptor, gas_limit: U256::from(100_000u64) };
        assert!(c.finish_preparation(request.generation, Ok(prepared)));
    }

    fn qty(n: i64) -> Quantity {
        Quantity::new(n).unwrap()
    }

    fn confirm(c: &mut MintController, hash: TxHash) {
        let ticket = c.begin_execute().unwrap();
        assert!(c.record_submitted(ticket.attempt, hash));
        assert!(c.record_receipt(hash, ReceiptStatus::Success));
    }

    fn form(c: &MintController) -> FormView {
        match c.view() {
            MintView::Form(form) => form,
            other => panic!("expected form view, got {:?}", other),
        }
    }

    #[test]
    fn test_connection_tracking() {
        let mut c = controller();
        assert!(!c.is_connected());
        assert_eq!(c.view(), MintView::Disconnected);

        assert!(c.set_address(Some(ALICE)));
        assert!(c.is_connected());
        assert!(!c.set_address(Some(ALICE)));

        assert!(c.set_address(None));
        assert!(!c.is_connected());
        assert_eq!(c.view(), MintView::Disconnected);
    }

    #[test]
    fn test_quantity_changes() {
        let mut c = controller();
        assert_eq!(c.quantity().get(), 3);
        assert!(c.set_quantity(qty(1)));
        assert!(c.set_quantity(qty(10)));
        assert!(!c.set_quantity(qty(10)));
        assert_eq!(c.quantity().get(), 10);
    }

    #[test]
    fn test_mint_disabled_when_disconnected() {
        let mut c = controller();
        assert!(!c.can_mint());
        assert!(c.begin_preparation().is_none());
        assert!(c.begin_execute().is_none());
    }

    #[test]
    fn test_mint_disabled_on_preparation_error() {
        let mut c = controller();
        c.set_address(Some(ALICE));
        let request = c.begin_preparation().unwrap();
        c.finish_preparation(request.generation, Err(PreparationError::InsufficientFunds));

        let view = form(&c);
        assert!(!view.mint_enabled);
        assert!(view.preparation_error.unwrap().contains("enough funds"));
        assert!(c.begin_execute().is_none());

        // quantity can still be adjusted to clear the condition
        assert!(view.slider_enabled);
        assert!(c.set_quantity(qty(1)));
        assert!(c.preparation_error().is_none());
    }

    #[test]
    fn test_stale_preparation_is_dropped() {
        let mut c = controller();
        c.set_address(Some(ALICE));
        let old = c.begin_preparation().unwrap();
        c.set_quantity(qty(5));
        let new = c.begin_preparation().unwrap();

        assert!(!c.finish_preparation(old.generation, Err(PreparationError::InsufficientFunds)));
        assert_eq!(c.preparation, Preparation::Pending);

        let prepared = PreparedCall { descriptor: new.descriptor, gas_limit: U256::from(1u64) };
        assert!(c.finish_preparation(new.generation, Ok(prepared)));
        assert!(c.can_mint());
    }

    #[test]
    fn test_mint_disabled_while_loading_and_started() {
        let mut c = ready(ALICE);
        assert!(form(&c).mint_enabled);

        let ticket = c.begin_execute().unwrap();
        let view = form(&c);
        assert!(!view.mint_enabled);
        assert!(!view.slider_enabled);
        assert_eq!(view.status, Some(MintStatus::WaitingForApproval));
        assert!(c.begin_execute().is_none());

        c.record_submitted(ticket.attempt, HASH_1);
        let view = form(&c);
        assert!(!view.mint_enabled);
        assert_eq!(view.status, Some(MintStatus::Minting));
        assert!(view.transaction_url.unwrap().ends_with(&HASH_1.to_string()));
        assert!(c.begin_execute().is_none());
    }

    #[test]
    fn test_slider_locked_while_in_flight() {
        let mut c = ready(ALICE);
        c.begin_execute().unwrap();
        assert!(!c.set_quantity(qty(7)));
        assert_eq!(c.quantity().get(), 3);
    }

    #[test]
    fn test_failure_allows_retry() {
        let mut c = ready(ALICE);
        let ticket = c.begin_execute().unwrap();
        assert!(c.record_failure(ticket.attempt, ExecutionError::Rejected));

        let view = form(&c);
        assert!(view.mint_error.is_some());
        assert!(view.mint_enabled);

        let retry = c.begin_execute().unwrap();
        assert_ne!(retry.attempt, ticket.attempt);
        assert_eq!(c.transaction_state(), TransactionState::AwaitingApproval);
        assert!(form(&c).mint_error.is_none());
    }

    #[test]
    fn test_stale_hash_does_not_mint() {
        let mut c = ready(ALICE);
        let first = c.begin_execute().unwrap();
        c.record_submitted(first.attempt, HASH_1);
        c.record_receipt(HASH_1, ReceiptStatus::Reverted);

        let second = c.begin_execute().unwrap();
        c.record_submitted(second.attempt, HASH_2);

        assert!(!c.record_receipt(HASH_1, ReceiptStatus::Success));
        assert!(!c.is_minted());

        assert!(c.record_receipt(HASH_2, ReceiptStatus::Success));
        assert!(c.is_minted());
    }

    #[test]
    fn test_late_result_for_old_attempt_ignored() {
        let mut c = ready(ALICE);
        let first = c.begin_execute().unwrap();
        c.record_failure(first.attempt, ExecutionError::Rejected);
        let _second = c.begin_execute().unwrap();

        assert!(!c.record_submitted(first.attempt, HASH_1));
        assert_eq!(c.transaction_state(), TransactionState::AwaitingApproval);
    }

    #[test]
    fn test_on_chain_revert_is_recoverable() {
        let mut c = ready(ALICE);
        let ticket = c.begin_execute().unwrap();
        c.record_submitted(ticket.attempt, HASH_1);
        c.record_receipt(HASH_1, ReceiptStatus::Reverted);

        assert_eq!(
            c.transaction_state().error(),
            Some(&ExecutionError::Reverted(HASH_1))
        );
        assert!(c.can_mint());
    }

    #[test]
    fn test_success_view() {
        let mut c = ready(ALICE);
        let ticket = c.begin_execute().unwrap();
        c.record_submitted(ticket.attempt, HASH_1);
        c.record_receipt(HASH_1, ReceiptStatus::Success);

        match c.view() {
            MintView::Success(success) => {
                assert!(success.marketplace_url.contains(&ALICE.to_string()));
                assert!(success.transaction_url.ends_with(&HASH_1.to_string()));
            }
            other => panic!("expected success view, got {:?}", other),
        }
        assert!(!c.can_mint());
        assert!(c.begin_execute().is_none());
    }

    #[test]
    fn test_disconnect_and_reconnect_restores_progress() {
        let mut c = ready(ALICE);
        let ticket = c.begin_execute().unwrap();
        c.record_submitted(ticket.attempt, HASH_1);

        c.set_address(None);
        assert_eq!(c.view(), MintView::Disconnected);
        assert!(matches!(c.attempt.as_ref().unwrap().state, TransactionState::Submitted { .. }));

        c.set_address(Some(ALICE));
        let view = form(&c);
        assert_eq!(view.status, Some(MintStatus::Minting));
        assert!(!view.mint_enabled);
    }

    #[test]
    fn test_confirmation_while_disconnected_shows_success_on_return() {
        let mut c = ready(ALICE);
        let ticket = c.begin_execute().unwrap();
        c.record_submitted(ticket.attempt, HASH_1);
        c.set_address(None);

        assert!(c.record_receipt(HASH_1, ReceiptStatus::Success));
        assert!(c.is_minted());

        c.set_address(Some(ALICE));
        assert!(matches!(c.view(), MintView::Success(_)));
    }

    #[test]
    fn test_other_wallet_blocked_while_in_flight() {
        let mut c = ready(ALICE);
        let ticket = c.begin_execute().unwrap();
        c.record_submitted(ticket.attempt, HASH_1);

        c.set_address(Some(BOB));
        prepare_ok(&mut c);
        let view = form(&c);
        assert_eq!(view.status, Some(MintStatus::OtherWalletMinting));
        assert!(!view.mint_enabled);
        assert!(view.transaction_url.is_none());

        c.record_receipt(HASH_1, ReceiptStatus::Success);
        assert!(form(&c).mint_enabled);
        assert!(c.begin_execute().is_some());
        assert_eq!(c.attempt.as_ref().unwrap().owner, BOB);
    }

    #[test]
    fn test_confirmed_mint_survives_another_wallet_minting() {
        let mut c = ready(ALICE);
        confirm(&mut c, HASH_1);
        assert!(matches!(c.view(), MintView::Success(_)));

        c.set_address(Some(BOB));
        prepare_ok(&mut c);
        let ticket = c.begin_execute().unwrap();
        c.record_submitted(ticket.attempt, HASH_2);

        c.set_address(Some(ALICE));
        match c.view() {
            MintView::Success(success) => {
                assert!(success.marketplace_url.contains(&ALICE.to_string()));
                assert!(success.transaction_url.ends_with(&HASH_1.to_string()));
            }
            other => panic!("expected alice's success view, got {:?}", other),
        }
        assert!(c.begin_execute().is_none());

        // bob's confirmation does not overwrite alice's
        c.record_receipt(HASH_2, ReceiptStatus::Success);
        assert_eq!(c.transaction_state(), TransactionState::Confirmed { hash: HASH_1 });
        c.set_address(Some(BOB));
        assert_eq!(c.transaction_state(), TransactionState::Confirmed { hash: HASH_2 });
    }

    #[test]
    fn test_wrong_network_disables_mint() {
        let mut c = controller();
        c.set_address(Some(ALICE));
        c.set_chain_id(Some(137));

        assert!(c.begin_preparation().is_none());
        assert_eq!(
            c.preparation_error(),
            Some(&PreparationError::WrongNetwork { expected: 1, actual: 137 })
        );
        let view = form(&c);
        assert!(view.wrong_network);
        assert!(!view.mint_enabled);
        assert!(view.preparation_error.unwrap().contains("Wrong network"));

        c.set_chain_id(Some(1));
        assert!(!form(&c).wrong_network);
        prepare_ok(&mut c);
        assert!(c.can_mint());
    }

    #[test]
    fn test_network_switch_invalidates_ready_call() {
        let mut c = ready(ALICE);
        c.set_chain_id(Some(1));
        prepare_ok(&mut c);
        assert!(c.can_mint());

        assert!(c.set_chain_id(Some(10)));
        assert!(!c.can_mint());
        assert!(c.begin_execute().is_none());
    }

    #[test]
    fn test_stale_preparation_after_network_switch_is_dropped() {
        let mut c = controller();
        c.set_address(Some(ALICE));
        let request = c.begin_preparation().unwrap();
        c.set_chain_id(Some(137));

        let prepared = PreparedCall { descriptor: request.descriptor, gas_limit: U256::from(1u64) };
        assert!(!c.finish_preparation(request.generation, Ok(prepared)));
        assert!(!c.can_mint());
    }
}
