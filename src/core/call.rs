use std::str::FromStr;
use alloy_primitives::{Address, U256};
use serde::Serialize;

use super::abi::{contract_abi, AbiError};
use super::constants::MINT_FUNCTION;
use super::network_config::NetworkConfig;
use super::pricing::Quantity;

/// Everything needed to ask the wallet for a mint transaction
#[derive(Debug, Clone, PartialEq)]
pub struct CallDescriptor {
    pub target: Address,
    pub function: &'static str,
    pub args: Vec<U256>,
    pub value: U256,
    pub sender: Address,
}

impl CallDescriptor {
    /// Descriptor for `mint(quantity)` paying `quantity * price`
    pub fn mint(config: &NetworkConfig, quantity: Quantity, sender: Address) -> Result<Self, AbiError> {
        let target = Address::from_str(config.contract_address)
            .map_err(|e| AbiError::Parse(format!("contract address: {}", e)))?;
        let value = quantity.value_wei();
        contract_abi()?.check_value(MINT_FUNCTION, value)?;
        Ok(Self {
            target,
            function: MINT_FUNCTION,
            args: vec![U256::from(quantity.get())],
            value,
            sender,
        })
    }

    pub fn calldata(&self) -> Result<Vec<u8>, AbiError> {
        contract_abi()?.encode_call(self.function, &self.args)
    }

    /// JSON-RPC transaction object used by `eth_estimateGas` and `eth_sendTransaction`
    pub fn to_transaction_request(&self) -> Result<TransactionRequest, AbiError> {
        Ok(TransactionRequest {
            from: self.sender,
            to: self.target,
            value: self.value,
            data: format!("0x{}", hex::encode(self.calldata()?)),
            gas: None,
        })
    }
}

/// A descriptor that survived simulation
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedCall {
    pub descriptor: CallDescriptor,
    pub gas_limit: U256,
}

impl PreparedCall {
    pub fn to_transaction_request(&self) -> Result<TransactionRequest, AbiError> {
        let mut request = self.descriptor.to_transaction_request()?;
        request.gas = Some(self.gas_limit);
        Ok(request)
    }
}

/// Wire shape of an Ethereum transaction request (hex quantities)
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<U256>,
}
