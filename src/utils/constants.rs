use alloy::primitives::U256;

/// Standard WAD (10^18)
pub const WAD_U256: U256 = U256::from_limbs([1000000000000000000, 0, 0, 0]);

/// Scale of Cauldron rate constants (COLLATERIZATION_RATE, LIQUIDATION_MULTIPLIER, BORROW_OPENING_FEE).
pub const RATE_PRECISION: u64 = 100_000;

/// 3.154e7: Julian-year approximation used when annualizing the per-second interest rate.
pub const SECONDS_PER_YEAR: u64 = 31_540_000;

/// Gas limit of the five-step borrow cook.
pub const COOK_GAS_LIMIT: u64 = 400_000;

/// ETH credited to a fork wallet by `tenderly_addBalance` (1 ETH).
pub const FORK_FUNDING_WEI: U256 = WAD_U256;
