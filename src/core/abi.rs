use std::fmt;
use serde::{Serialize, Deserialize};
use alloy_primitives::{keccak256, U256};
use once_cell::sync::Lazy;

/// ABI of the collection contract, bundled at build time
const CONTRACT_ABI_JSON: &str = include_str!("../../abi/contract-abi.json");

#[derive(Debug, Clone, PartialEq)]
pub enum AbiError {
    Parse(String),
    FunctionNotFound(String),
    ArgumentMismatch { function: String, expected: usize, got: usize },
    UnsupportedType(String),
    NotPayable(String),
}

impl fmt::Display for AbiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiError::Parse(msg) => write!(f, "Failed to parse ABI: {}", msg),
            AbiError::FunctionNotFound(name) => write!(f, "Function '{}' not found in ABI", name),
            AbiError::ArgumentMismatch { function, expected, got } => write!(
                f,
                "Function '{}' takes {} arguments, got {}",
                function, expected, got
            ),
            AbiError::UnsupportedType(ty) => write!(f, "Unsupported ABI type: {}", ty),
            AbiError::NotPayable(name) => write!(f, "Function '{}' does not accept a value", name),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "internalType", default)]
    pub internal_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AbiEntry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default)]
    pub outputs: Vec<AbiParam>,
    #[serde(default)]
    pub state_mutability: Option<String>,
}

impl AbiEntry {
    pub fn is_payable(&self) -> bool {
        self.state_mutability.as_deref() == Some("payable")
    }

    /// Canonical signature, e.g. `mint(uint256)`
    pub fn signature(&self) -> String {
        let inputs: Vec<&str> = self.inputs.iter().map(|p| p.kind.as_str()).collect();
        format!("{}({})", self.name.as_deref().unwrap_or_default(), inputs.join(","))
    }

    /// First four bytes of the keccak hash of the signature
    pub fn selector(&self) -> [u8; 4] {
        let hash = keccak256(self.signature().as_bytes());
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&hash[..4]);
        selector
    }
}

/// Parsed contract interface
#[derive(Debug, Clone)]
pub struct ContractAbi {
    entries: Vec<AbiEntry>,
}

impl ContractAbi {
    pub fn from_json(json: &str) -> Result<Self, AbiError> {
        let entries: Vec<AbiEntry> = serde_json::from_str(json)
            .map_err(|e| AbiError::Parse(e.to_string()))?;
        Ok(Self { entries })
    }

    pub fn function(&self, name: &str) -> Result<&AbiEntry, AbiError> {
        self.entries
            .iter()
            .find(|e| e.kind == "function" && e.name.as_deref() == Some(name))
            .ok_or_else(|| AbiError::FunctionNotFound(name.to_string()))
    }

    /// Reject a non-zero `value` for a function that is not payable
    pub fn check_value(&self, name: &str, value: U256) -> Result<(), AbiError> {
        if value.is_zero() || self.function(name)?.is_payable() {
            Ok(())
        } else {
            Err(AbiError::NotPayable(name.to_string()))
        }
    }

    /// Encode a call to `name` whose inputs are all unsigned integers
    pub fn encode_call(&self, name: &str, args: &[U256]) -> Result<Vec<u8>, AbiError> {
        let function = self.function(name)?;
        if function.inputs.len() != args.len() {
            return Err(AbiError::ArgumentMismatch {
                function: name.to_string(),
                expected: function.inputs.len(),
                got: args.len(),
            });
        }
        if let Some(param) = function.inputs.iter().find(|p| !p.kind.starts_with("uint")) {
            return Err(AbiError::UnsupportedType(param.kind.clone()));
        }

        let mut data = Vec::with_capacity(4 + 32 * args.len());
        data.extend_from_slice(&function.selector());
        for arg in args {
            data.extend_from_slice(&arg.to_be_bytes::<32>());
        }
        Ok(data)
    }
}

static BUNDLED_ABI: Lazy<Result<ContractAbi, AbiError>> =
    Lazy::new(|| ContractAbi::from_json(CONTRACT_ABI_JSON));

/// The collection contract's ABI
pub fn contract_abi() -> Result<&'static ContractAbi, AbiError> {
    BUNDLED_ABI.as_ref().map_err(|e| e.clone())
}
