/// Shared constants used across the mint page
///
/// Everything the page needs that never changes at runtime lives here,
/// so pricing, bounds and metadata are defined exactly once.

// ============================================================================
// Pricing
// ============================================================================

/// Price of a single token in ETH, as a decimal string so it can be parsed
/// into wei without going through floating point
pub const PRICE_PER_UNIT_ETH: &str = "0.001";

/// Same price as a float, only used for the displayed total
pub const PRICE_PER_UNIT_DISPLAY: f64 = 0.001;

/// Number of decimals kept in the displayed total (0.001 granularity)
pub const DISPLAY_PRICE_SCALE: f64 = 1000.0;

/// Symbol of the chain's native currency
pub const NATIVE_SYMBOL: &str = "ETH";

// ============================================================================
// Quantity Constraints
// ============================================================================

/// Smallest quantity the slider allows
pub const MIN_QUANTITY: u8 = 1;

/// Largest quantity the slider allows (also the contract's per-wallet cap)
pub const MAX_QUANTITY: u8 = 10;

/// Quantity selected when the page loads
pub const DEFAULT_QUANTITY: u8 = 3;

// ============================================================================
// Contract
// ============================================================================

/// Name of the payable function invoked on the collection contract
pub const MINT_FUNCTION: &str = "mint";

// ============================================================================
// Gas and Polling
// ============================================================================

/// Extra gas added on top of the wallet's estimate, in percent
pub const GAS_LIMIT_BUFFER_PERCENT: u64 = 10;

/// Interval between receipt polls while waiting for inclusion (milliseconds)
pub const RECEIPT_POLL_INTERVAL_MS: u32 = 4_000;

// ============================================================================
// Collection Metadata
// ============================================================================

pub const COLLECTION_NAME: &str = "Stupid Faces";
