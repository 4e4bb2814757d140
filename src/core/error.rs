use std::fmt;
use alloy_primitives::TxHash;

/// EIP-1193 code for "user rejected the request"
pub const USER_REJECTED_CODE: i64 = 4001;

/// Errors raised while talking to the injected wallet
#[derive(Debug, Clone, PartialEq)]
pub enum WalletError {
    ProviderNotFound,
    JavaScriptError(String),
    Rejected,
    Rpc { code: i64, message: String },
    InvalidResponse(String),
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletError::ProviderNotFound => write!(f, "No Ethereum wallet found in this browser"),
            WalletError::JavaScriptError(msg) => write!(f, "JavaScript error: {}", msg),
            WalletError::Rejected => write!(f, "Request rejected by the user"),
            WalletError::Rpc { code, message } => write!(f, "Wallet RPC error {}: {}", code, message),
            WalletError::InvalidResponse(msg) => write!(f, "Invalid wallet response: {}", msg),
        }
    }
}

impl WalletError {
    /// Build from an EIP-1193 error object's code and message
    pub fn from_rpc(code: i64, message: impl Into<String>) -> Self {
        if code == USER_REJECTED_CODE {
            WalletError::Rejected
        } else {
            WalletError::Rpc { code, message: message.into() }
        }
    }
}

/// Raised before submission, while simulating the mint call
#[derive(Debug, Clone, PartialEq)]
pub enum PreparationError {
    WrongNetwork { expected: u64, actual: u64 },
    InsufficientFunds,
    Reverted(String),
    Simulation(String),
}

impl fmt::Display for PreparationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreparationError::WrongNetwork { expected, actual } => write!(
                f,
                "Wallet is on chain {}, expected chain {}",
                actual, expected
            ),
            PreparationError::InsufficientFunds => write!(f, "Insufficient funds for mint value and gas"),
            PreparationError::Reverted(reason) => write!(f, "Mint would revert: {}", reason),
            PreparationError::Simulation(msg) => write!(f, "Simulation failed: {}", msg),
        }
    }
}

impl PreparationError {
    /// Message shown on the page. Detailed reasons only go to the log.
    pub fn user_message(&self) -> &'static str {
        match self {
            PreparationError::WrongNetwork { .. } => "Wrong network. Switch your wallet to Ethereum Mainnet to mint.",
            _ => "An error occurred while preparing the transaction. Make sure that you have \
                  enough funds and that you haven\u{2019}t reached your limit of 10 tokens.",
        }
    }
}

impl From<WalletError> for PreparationError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::Rpc { message, .. } => classify_simulation_failure(&message),
            other => PreparationError::Simulation(other.to_string()),
        }
    }
}

/// Sort a node's simulation error message into a preparation error
pub fn classify_simulation_failure(message: &str) -> PreparationError {
    let lower = message.to_ascii_lowercase();
    if lower.contains("insufficient funds") {
        PreparationError::InsufficientFunds
    } else if let Some(idx) = lower.find("execution reverted") {
        let reason = message[idx + "execution reverted".len()..]
            .trim_start_matches(':')
            .trim();
        if reason.is_empty() {
            PreparationError::Reverted("no reason given".to_string())
        } else {
            PreparationError::Reverted(reason.to_string())
        }
    } else {
        PreparationError::Simulation(message.to_string())
    }
}

/// Raised during or after wallet submission
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionError {
    Rejected,
    WrongNetwork { expected: u64, actual: u64 },
    Wallet(String),
    Reverted(TxHash),
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionError::Rejected => write!(f, "Transaction rejected in wallet"),
            ExecutionError::WrongNetwork { expected, actual } => write!(
                f,
                "Refusing to send on chain {}, expected chain {}",
                actual, expected
            ),
            ExecutionError::Wallet(msg) => write!(f, "Wallet error: {}", msg),
            ExecutionError::Reverted(hash) => write!(f, "Transaction {} reverted on chain", hash),
        }
    }
}

impl ExecutionError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ExecutionError::Reverted(_) => "The transaction was included but reverted. You can try again.",
            ExecutionError::WrongNetwork { .. } => "Your wallet changed networks. Switch back to Ethereum Mainnet and try again.",
            _ => "An error occurred while accessing your wallet or processing the transaction.",
        }
    }
}

impl From<WalletError> for ExecutionError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::Rejected => ExecutionError::Rejected,
            other => ExecutionError::Wallet(other.to_string()),
        }
    }
}
