use std::fmt;
use alloy_primitives::TxHash;
use super::error::ExecutionError;

/// Lifecycle of a single mint attempt
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TransactionState {
    #[default]
    Idle,
    AwaitingApproval,
    Submitted { hash: TxHash },
    Confirmed { hash: TxHash },
    Failed { error: ExecutionError },
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvalidTransition {
    pub from: &'static str,
    pub event: &'static str,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cannot apply '{}' while {}", self.event, self.from)
    }
}

impl TransactionState {
    pub fn name(&self) -> &'static str {
        match self {
            TransactionState::Idle => "idle",
            TransactionState::AwaitingApproval => "awaiting approval",
            TransactionState::Submitted { .. } => "submitted",
            TransactionState::Confirmed { .. } => "confirmed",
            TransactionState::Failed { .. } => "failed",
        }
    }

    /// Waiting on the wallet or on the chain
    pub fn is_in_flight(&self) -> bool {
        matches!(self, TransactionState::AwaitingApproval | TransactionState::Submitted { .. })
    }

    pub fn is_minted(&self) -> bool {
        matches!(self, TransactionState::Confirmed { .. })
    }

    /// Hash of the broadcast transaction, if there is one
    pub fn hash(&self) -> Option<TxHash> {
        match self {
            TransactionState::Submitted { hash } | TransactionState::Confirmed { hash } => Some(*hash),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ExecutionError> {
        match self {
            TransactionState::Failed { error } => Some(error),
            _ => None,
        }
    }

    fn invalid(&self, event: &'static str) -> InvalidTransition {
        InvalidTransition { from: self.name(), event }
    }

    /// idle | failed -> awaiting approval
    pub fn start(&self) -> Result<Self, InvalidTransition> {
        match self {
            TransactionState::Idle | TransactionState::Failed { .. } => Ok(TransactionState::AwaitingApproval),
            _ => Err(self.invalid("start")),
        }
    }

    /// awaiting approval -> submitted
    pub fn approve(&self, hash: TxHash) -> Result<Self, InvalidTransition> {
        match self {
            TransactionState::AwaitingApproval => Ok(TransactionState::Submitted { hash }),
            _ => Err(self.invalid("approve")),
        }
    }

    /// awaiting approval | submitted -> failed
    pub fn fail(&self, error: ExecutionError) -> Result<Self, InvalidTransition> {
        match self {
            TransactionState::AwaitingApproval | TransactionState::Submitted { .. } => {
                Ok(TransactionState::Failed { error })
            }
            _ => Err(self.invalid("fail")),
        }
    }

    /// submitted(hash) -> confirmed(hash); any other hash is stale
    pub fn confirm(&self, hash: TxHash) -> Result<Self, InvalidTransition> {
        match self {
            TransactionState::Submitted { hash: current } if *current == hash => {
                Ok(TransactionState::Confirmed { hash })
            }
            _ => Err(self.invalid("confirm")),
        }
    }
}
