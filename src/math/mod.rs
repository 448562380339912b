//! Fixed-point helpers shared by the borrow calculator and the currency converter.
//! Rule: every arithmetic step goes through a [`Precision`] so results are rounded the
//! same way everywhere.

pub mod borrow;
pub mod currency;
pub mod precision;

pub use borrow::BorrowMath;
pub use currency::{to_fixed_string, CurrencyConverter};
pub use precision::Precision;

use bigdecimal::BigDecimal;

/// 10^18, the scale of on-chain token amounts and exchange rates.
pub fn wad() -> BigDecimal {
    BigDecimal::from(1_000_000_000_000_000_000u64)
}

/// 10^5, the scale of Cauldron rate constants (collateralization, liquidation, fees).
pub fn rate_precision() -> BigDecimal {
    BigDecimal::from(crate::utils::constants::RATE_PRECISION)
}
