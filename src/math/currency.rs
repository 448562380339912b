use super::precision::Precision;
use super::wad;
use crate::error::MathError;
use alloy::primitives::U256;
use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};

/// Number of fractional digits of an on-chain token amount.
pub const TOKEN_DECIMALS: u32 = 18;

/// Converts between decimal token quantities and 1e18-scaled on-chain integers.
#[derive(Debug, Clone, Default)]
pub struct CurrencyConverter {
    precision: Precision,
}

impl CurrencyConverter {
    pub fn new(precision: Precision) -> Self {
        Self { precision }
    }

    /// `qty * 1e18` as an on-chain integer.
    ///
    /// Negative values and values that still carry a fraction of a wei are rejected,
    /// as is anything above `uint256`.
    pub fn to_on_chain_amount(&self, qty: &BigDecimal) -> Result<U256, MathError> {
        let scaled = self.precision.mul(qty, &wad());
        if scaled.sign() == Sign::Minus {
            return Err(MathError::NegativeAmount(to_fixed_string(qty)));
        }
        if !scaled.is_integer() {
            return Err(MathError::FractionalWei(to_fixed_string(&scaled)));
        }
        let (integer, _) = scaled.with_scale(0).into_bigint_and_exponent();
        let (_, bytes) = integer.to_bytes_be();
        U256::try_from_be_slice(&bytes)
            .ok_or_else(|| MathError::Overflow(format!("{} wei exceeds uint256", integer)))
    }

    /// `amount / 1e18` rounded to the configured precision.
    pub fn to_decimal(&self, amount: U256) -> BigDecimal {
        self.precision.apply(scaled_decimal(amount, TOKEN_DECIMALS))
    }

    /// Raw integer as an exact decimal, without scaling (rates, constants).
    pub fn from_raw(&self, raw: U256) -> BigDecimal {
        scaled_decimal(raw, 0)
    }

    pub fn precision(&self) -> &Precision {
        &self.precision
    }
}

fn scaled_decimal(raw: U256, scale: u32) -> BigDecimal {
    let integer = BigInt::from_bytes_be(Sign::Plus, &raw.to_be_bytes::<32>());
    BigDecimal::new(integer, i64::from(scale))
}

/// Plain positional notation with trailing zeros removed; never an exponent, so the
/// output is safe both for on-chain parsing and string assertions.
pub fn to_fixed_string(value: &BigDecimal) -> String {
    value.normalized().to_plain_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(raw: &str) -> BigDecimal {
        BigDecimal::from_str(raw).unwrap()
    }

    #[test]
    fn test_to_on_chain_amount_scales_by_wad() {
        let converter = CurrencyConverter::default();
        assert_eq!(
            converter.to_on_chain_amount(&d("1000000")).unwrap(),
            U256::from(10u64).pow(U256::from(24u64))
        );
        assert_eq!(
            converter.to_on_chain_amount(&d("1.630047509018786")).unwrap(),
            U256::from(1_630_047_509_018_786_000u64)
        );
        assert_eq!(converter.to_on_chain_amount(&d("0")).unwrap(), U256::ZERO);
    }

    #[test]
    fn test_to_on_chain_amount_rejects_negative_and_sub_wei() {
        let converter = CurrencyConverter::default();
        assert!(matches!(
            converter.to_on_chain_amount(&d("-1")),
            Err(MathError::NegativeAmount(_))
        ));
        assert!(matches!(
            converter.to_on_chain_amount(&d("0.0000000000000000005")),
            Err(MathError::FractionalWei(_))
        ));
    }

    #[test]
    fn test_amounts_beyond_96_bits_convert_both_ways() {
        let converter = CurrencyConverter::default();
        let hundred_billion = converter.to_on_chain_amount(&d("100000000000")).unwrap();
        assert_eq!(hundred_billion, U256::from(10u64).pow(U256::from(29u64)));
        assert_eq!(converter.to_decimal(hundred_billion), d("100000000000"));

        let whale = U256::from_str("123456789012345678000000000000000000000").unwrap();
        assert_eq!(converter.to_decimal(whale), d("123456789012345678000"));
        assert_eq!(
            converter
                .to_on_chain_amount(&converter.to_decimal(whale))
                .unwrap(),
            whale
        );
    }

    #[test]
    fn test_to_on_chain_amount_rejects_values_above_uint256() {
        let converter = CurrencyConverter::default();
        assert!(matches!(
            converter.to_on_chain_amount(&d("1e60")),
            Err(MathError::Overflow(_))
        ));
    }

    #[test]
    fn test_to_decimal_rounds_to_configured_precision() {
        let converter = CurrencyConverter::default();
        let balance = U256::from_str("1000000000000000000000000000").unwrap();
        assert_eq!(converter.to_decimal(balance), d("1000000000"));
        let borrowed = U256::from(1_630_047_509_018_785_949u64);
        assert_eq!(
            to_fixed_string(&converter.to_decimal(borrowed)),
            "1.63004750901878595"
        );
        assert_eq!(
            to_fixed_string(&converter.to_decimal(U256::MAX)),
            "115792089237316195000000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_to_fixed_string_never_uses_exponent() {
        assert_eq!(to_fixed_string(&d("1e24")), "1000000000000000000000000");
        assert_eq!(
            to_fixed_string(&d("0.000000000000000001")),
            "0.000000000000000001"
        );
        assert_eq!(to_fixed_string(&d("70.00")), "70");
    }
}
