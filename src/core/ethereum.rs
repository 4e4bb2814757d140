use std::str::FromStr;
use async_trait::async_trait;
use alloy_primitives::{Address, TxHash, U256};
use gloo_timers::future::TimeoutFuture;
use gloo_utils::format::JsValueSerdeExt;
use js_sys::Promise;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::window;

use super::call::{CallDescriptor, PreparedCall};
use super::constants::{GAS_LIMIT_BUFFER_PERCENT, RECEIPT_POLL_INTERVAL_MS};
use super::error::{ExecutionError, PreparationError, WalletError};
use super::network_config::NetworkConfig;
use super::provider::{AddressListener, ChainListener, ReceiptStatus, WalletProvider};

/// Subset of a transaction receipt we care about
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionReceipt {
    transaction_hash: TxHash,
    #[serde(default)]
    block_number: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

/// Gas limit sent with the transaction: the node's estimate plus a safety margin
pub fn buffered_gas_limit(estimate: U256) -> U256 {
    estimate * U256::from(100 + GAS_LIMIT_BUFFER_PERCENT) / U256::from(100u64)
}

/// Outcome of an included transaction; `None` while it is still pending
fn receipt_status(receipt: &TransactionReceipt) -> Option<ReceiptStatus> {
    receipt.block_number.as_ref()?;
    Some(match receipt.status.as_deref() {
        Some("0x0") => ReceiptStatus::Reverted,
        _ => ReceiptStatus::Success,
    })
}

/// Parse the hex quantity returned by `eth_chainId` and sent with `chainChanged`
pub fn parse_chain_id(raw: &str) -> Result<u64, WalletError> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .ok_or_else(|| WalletError::InvalidResponse(format!("chain id {}", raw)))?;
    u64::from_str_radix(digits, 16)
        .map_err(|e| WalletError::InvalidResponse(format!("chain id {}: {}", raw, e)))
}

/// Browser wallet injected as `window.ethereum` (EIP-1193)
pub struct InjectedWallet {
    config: &'static NetworkConfig,
}

impl InjectedWallet {
    pub fn new(config: &'static NetworkConfig) -> Self {
        Self { config }
    }

    /// Check if an Ethereum wallet extension is installed
    pub fn is_installed() -> bool {
        Self::provider_object().is_ok()
    }

    fn provider_object() -> Result<JsValue, WalletError> {
        let window = window().ok_or(WalletError::JavaScriptError("No window object".to_string()))?;

        let ethereum = js_sys::Reflect::get(&window, &JsValue::from_str("ethereum"))
            .map_err(|e| WalletError::JavaScriptError(format!("Failed to get ethereum: {:?}", e)))?;

        if ethereum.is_null() || ethereum.is_undefined() {
            return Err(WalletError::ProviderNotFound);
        }
        Ok(ethereum)
    }

    fn method(provider: &JsValue, name: &str) -> Result<js_sys::Function, WalletError> {
        let func = js_sys::Reflect::get(provider, &JsValue::from_str(name))
            .map_err(|e| WalletError::JavaScriptError(format!("Failed to get {}: {:?}", name, e)))?;

        if !func.is_function() {
            return Err(WalletError::JavaScriptError(format!("{} is not a function", name)));
        }
        Ok(js_sys::Function::from(func))
    }

    /// Turn a rejected request into a wallet error, keeping the EIP-1193 code
    fn error_from_js(err: JsValue) -> WalletError {
        let code = js_sys::Reflect::get(&err, &JsValue::from_str("code"))
            .ok()
            .and_then(|c| c.as_f64());
        let message = js_sys::Reflect::get(&err, &JsValue::from_str("message"))
            .ok()
            .and_then(|m| m.as_string())
            .unwrap_or_else(|| format!("{:?}", err));

        match code {
            Some(code) => WalletError::from_rpc(code as i64, message),
            None => WalletError::JavaScriptError(message),
        }
    }

    /// `ethereum.request({ method, params })`
    async fn request<P, R>(&self, method: &str, params: P) -> Result<R, WalletError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let provider = Self::provider_object()?;
        let request_fn = Self::method(&provider, "request")?;

        let params = JsValue::from_serde(&params)
            .map_err(|e| WalletError::JavaScriptError(format!("Failed to serialize params: {}", e)))?;
        let args = js_sys::Object::new();
        js_sys::Reflect::set(&args, &JsValue::from_str("method"), &JsValue::from_str(method))
            .map_err(|e| WalletError::JavaScriptError(format!("{:?}", e)))?;
        js_sys::Reflect::set(&args, &JsValue::from_str("params"), &params)
            .map_err(|e| WalletError::JavaScriptError(format!("{:?}", e)))?;

        log::debug!("Wallet request: {}", method);

        let promise = request_fn
            .call1(&provider, &args)
            .map_err(Self::error_from_js)?;
        let result = JsFuture::from(Promise::from(promise))
            .await
            .map_err(Self::error_from_js)?;

        result
            .into_serde::<R>()
            .map_err(|e| WalletError::InvalidResponse(format!("{}: {}", method, e)))
    }

    /// Switch the wallet to the configured chain if it is elsewhere
    async fn ensure_chain(&self) -> Result<(), WalletError> {
        let current = self.chain_id().await?;
        if self.config.is_expected_chain(current) {
            return Ok(());
        }

        let expected = self.config.chain_id_hex();
        log::info!("Wallet on chain {}, switching to {}", current, expected);
        let _: Option<serde_json::Value> = self
            .request("wallet_switchEthereumChain", json!([{ "chainId": expected }]))
            .await?;
        Ok(())
    }

    /// `Err((expected, actual))` unless the wallet is on the configured chain
    async fn check_chain(&self) -> Result<Result<(), (u64, u64)>, WalletError> {
        let actual = self.chain_id().await?;
        if self.config.is_expected_chain(actual) {
            Ok(Ok(()))
        } else {
            Ok(Err((self.config.chain_id, actual)))
        }
    }

    /// Register `callback` for an EIP-1193 provider event; it lives as long as the page
    fn on_event(&self, event: &str, callback: Closure<dyn FnMut(JsValue)>) -> Result<(), WalletError> {
        let provider = Self::provider_object()?;
        let on = Self::method(&provider, "on")?;
        on.call2(&provider, &JsValue::from_str(event), callback.as_ref().unchecked_ref())
            .map_err(Self::error_from_js)?;
        callback.forget();
        Ok(())
    }

    fn parse_accounts(accounts: Vec<String>) -> Result<Option<Address>, WalletError> {
        match accounts.first() {
            Some(account) => Address::from_str(account)
                .map(Some)
                .map_err(|e| WalletError::InvalidResponse(format!("account {}: {}", account, e))),
            None => Ok(None),
        }
    }
}

#[async_trait(?Send)]
impl WalletProvider for InjectedWallet {
    async fn current_address(&self) -> Result<Option<Address>, WalletError> {
        let accounts: Vec<String> = self.request("eth_accounts", json!([])).await?;
        Self::parse_accounts(accounts)
    }

    async fn request_connection(&self) -> Result<Option<Address>, WalletError> {
        let accounts: Vec<String> = self.request("eth_requestAccounts", json!([])).await?;
        let address = Self::parse_accounts(accounts)?;
        if address.is_some() {
            self.ensure_chain().await?;
        }
        Ok(address)
    }

    fn subscribe_address_changes(&self, listener: AddressListener) -> Result<(), WalletError> {
        let callback = Closure::wrap(Box::new(move |accounts: JsValue| {
            let accounts: Vec<String> = accounts.into_serde().unwrap_or_default();
            match Self::parse_accounts(accounts) {
                Ok(address) => listener(address),
                Err(e) => log::warn!("Ignoring accountsChanged event: {}", e),
            }
        }) as Box<dyn FnMut(JsValue)>);
        self.on_event("accountsChanged", callback)
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        let raw: String = self.request("eth_chainId", json!([])).await?;
        parse_chain_id(&raw)
    }

    async fn switch_network(&self) -> Result<(), WalletError> {
        self.ensure_chain().await
    }

    fn subscribe_chain_changes(&self, listener: ChainListener) -> Result<(), WalletError> {
        let callback = Closure::wrap(Box::new(move |chain: JsValue| {
            let raw = chain.as_string().unwrap_or_default();
            match parse_chain_id(&raw) {
                Ok(chain_id) => listener(chain_id),
                Err(e) => log::warn!("Ignoring chainChanged event: {}", e),
            }
        }) as Box<dyn FnMut(JsValue)>);
        self.on_event("chainChanged", callback)
    }

    async fn prepare_call(&self, descriptor: &CallDescriptor) -> Result<PreparedCall, PreparationError> {
        if let Err((expected, actual)) = self.check_chain().await? {
            return Err(PreparationError::WrongNetwork { expected, actual });
        }

        let request = descriptor
            .to_transaction_request()
            .map_err(|e| PreparationError::Simulation(e.to_string()))?;

        let estimate: U256 = self.request("eth_estimateGas", json!([request])).await?;
        Ok(PreparedCall { descriptor: descriptor.clone(), gas_limit: buffered_gas_limit(estimate) })
    }

    async fn submit_call(&self, prepared: &PreparedCall) -> Result<TxHash, ExecutionError> {
        if let Err((expected, actual)) = self.check_chain().await? {
            return Err(ExecutionError::WrongNetwork { expected, actual });
        }

        let request = prepared
            .to_transaction_request()
            .map_err(|e| ExecutionError::Wallet(e.to_string()))?;

        let hash: TxHash = self.request("eth_sendTransaction", json!([request])).await?;
        Ok(hash)
    }

    async fn watch_transaction(&self, hash: TxHash) -> Result<ReceiptStatus, WalletError> {
        loop {
            let receipt: Result<Option<TransactionReceipt>, WalletError> =
                self.request("eth_getTransactionReceipt", json!([hash])).await;

            match receipt {
                Ok(Some(receipt)) => match receipt_status(&receipt) {
                    Some(status) => {
                        log::debug!(
                            "Receipt for {} in block {:?}",
                            receipt.transaction_hash, receipt.block_number
                        );
                        return Ok(status);
                    }
                    None => log::debug!("Transaction {} not included yet", hash),
                },
                Ok(None) => log::debug!("Transaction {} not included yet", hash),
                Err(WalletError::ProviderNotFound) => return Err(WalletError::ProviderNotFound),
                Err(e) => log::warn!("Receipt poll for {} failed: {}", hash, e),
            }

            TimeoutFuture::new(RECEIPT_POLL_INTERVAL_MS).await;
        }
    }
}
