use std::fmt;
use alloy_primitives::U256;
use alloy_primitives::utils::parse_ether;
use super::constants::*;

/// Number of tokens to mint, always within `MIN_QUANTITY..=MAX_QUANTITY`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(u8);

#[derive(Debug, Clone, PartialEq)]
pub enum QuantityError {
    OutOfRange(i64),
    NotANumber(String),
}

impl fmt::Display for QuantityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantityError::OutOfRange(value) => write!(
                f,
                "Quantity {} is outside {}..={}",
                value, MIN_QUANTITY, MAX_QUANTITY
            ),
            QuantityError::NotANumber(raw) => write!(f, "Quantity '{}' is not a number", raw),
        }
    }
}

impl Quantity {
    pub fn new(value: i64) -> Result<Self, QuantityError> {
        if value < MIN_QUANTITY as i64 || value > MAX_QUANTITY as i64 {
            return Err(QuantityError::OutOfRange(value));
        }
        Ok(Self(value as u8))
    }

    /// Snap any value onto the slider's range, the way the range input does
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(MIN_QUANTITY as i64, MAX_QUANTITY as i64) as u8)
    }

    /// Parse a decimal quantity, rejecting values outside the range
    pub fn parse(raw: &str) -> Result<Self, QuantityError> {
        let value = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| QuantityError::NotANumber(raw.to_string()))?;
        Self::new(value)
    }

    /// Value of the range input; out-of-range values snap onto the range
    pub fn from_slider(raw: &str) -> Result<Self, QuantityError> {
        match Self::parse(raw) {
            Err(QuantityError::OutOfRange(value)) => Ok(Self::clamped(value)),
            other => other,
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Total price for display, rounded to 3 decimals
    pub fn display_price(self) -> f64 {
        (self.0 as f64 * PRICE_PER_UNIT_DISPLAY * DISPLAY_PRICE_SCALE).round() / DISPLAY_PRICE_SCALE
    }

    /// Human readable total, e.g. "0.003 ETH"
    pub fn display_total(self) -> String {
        format!("{} {}", self.display_price(), NATIVE_SYMBOL)
    }

    /// Exact value sent with the transaction, in wei
    pub fn value_wei(self) -> U256 {
        price_per_unit_wei() * U256::from(self.0)
    }

    /// "NFT" or "NFTs" depending on quantity
    pub fn noun(self) -> &'static str {
        if self.0 > 1 { "NFTs" } else { "NFT" }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self(DEFAULT_QUANTITY)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unit price in wei, parsed from the decimal ETH constant
pub fn price_per_unit_wei() -> U256 {
    // The constant is a valid decimal literal, so this never falls back in practice
    parse_ether(PRICE_PER_UNIT_ETH).unwrap_or(U256::from(1_000_000_000_000_000u64))
}
