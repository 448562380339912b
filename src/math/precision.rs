use crate::error::MathError;
use bigdecimal::{BigDecimal, RoundingMode};
use num_traits::Zero;
use std::num::NonZeroU64;

pub const DEFAULT_SIGNIFICANT_DIGITS: u64 = 18;

const DEFAULT_DIGITS: NonZeroU64 = match NonZeroU64::new(DEFAULT_SIGNIFICANT_DIGITS) {
    Some(digits) => digits,
    None => panic!("default significant digits must be non-zero"),
};

/// Arithmetic configuration handed to every calculator instead of a global setting.
///
/// Each operation rounds its result to `significant_digits`, half away from zero.
/// Magnitude is unbounded; only the number of significant digits is limited.
/// `epsilon` is the tolerance used by [`Precision::approx_eq`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Precision {
    significant_digits: NonZeroU64,
    epsilon: BigDecimal,
}

impl Default for Precision {
    fn default() -> Self {
        Self {
            significant_digits: DEFAULT_DIGITS,
            epsilon: BigDecimal::new(1.into(), 30),
        }
    }
}

impl Precision {
    pub fn new(significant_digits: u64, epsilon: BigDecimal) -> Result<Self, MathError> {
        let significant_digits = NonZeroU64::new(significant_digits)
            .ok_or(MathError::InvalidPrecision(significant_digits))?;
        Ok(Self {
            significant_digits,
            epsilon: epsilon.abs(),
        })
    }

    pub fn significant_digits(&self) -> u64 {
        self.significant_digits.get()
    }

    pub fn epsilon(&self) -> &BigDecimal {
        &self.epsilon
    }

    /// Round `value` to the configured significant digits.
    pub fn apply(&self, value: BigDecimal) -> BigDecimal {
        if value.is_zero() {
            return BigDecimal::zero();
        }
        value.with_precision_round(self.significant_digits, RoundingMode::HalfUp)
    }

    pub fn add(&self, a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
        self.apply(a + b)
    }

    pub fn sub(&self, a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
        self.apply(a - b)
    }

    pub fn mul(&self, a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
        self.apply(a * b)
    }

    /// `a / b` rounded; `op` names the caller in the error.
    pub fn div(
        &self,
        op: &'static str,
        a: &BigDecimal,
        b: &BigDecimal,
    ) -> Result<BigDecimal, MathError> {
        if b.is_zero() {
            return Err(MathError::DivisionByZero(op));
        }
        Ok(self.apply(a / b))
    }

    pub fn approx_eq(&self, a: &BigDecimal, b: &BigDecimal) -> bool {
        (a - b).abs() <= self.epsilon
    }
}

/// Round to `places` decimals, half away from zero, and drop trailing zeros.
pub fn round_dp(value: &BigDecimal, places: i64) -> BigDecimal {
    value.with_scale_round(places, RoundingMode::HalfUp).normalized()
}
