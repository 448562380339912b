use super::precision::{round_dp, Precision};
use super::{rate_precision, wad};
use crate::error::MathError;
use crate::utils::constants::SECONDS_PER_YEAR;
use bigdecimal::BigDecimal;
use num_traits::{One, Zero};

/// Borrow-side figures derived from raw Cauldron values.
///
/// Inputs and outputs are decimals; raw contract integers are expected to be converted
/// with [`crate::math::CurrencyConverter::from_raw`] first. Every intermediate result is
/// rounded to the configured precision.
#[derive(Debug, Clone, Default)]
pub struct BorrowMath {
    precision: Precision,
}

impl BorrowMath {
    pub fn new(precision: Precision) -> Self {
        Self { precision }
    }

    pub fn precision(&self) -> &Precision {
        &self.precision
    }

    /// `raw_rate / precision`, e.g. 70000 with 1e5 -> 0.7.
    pub fn collateralization_ratio(
        &self,
        raw_rate: &BigDecimal,
        precision: &BigDecimal,
    ) -> Result<BigDecimal, MathError> {
        self.precision
            .div("collateralization_ratio", raw_rate, precision)
    }

    pub fn real_exchange_rate(
        &self,
        raw_exchange_rate: &BigDecimal,
        precision: &BigDecimal,
    ) -> Result<BigDecimal, MathError> {
        self.precision
            .div("real_exchange_rate", raw_exchange_rate, precision)
    }

    /// `(collateral_ratio / real_exchange_rate) * collateral_qty`.
    ///
    /// The exchange rate is collateral units per borrow unit, so dividing first keeps
    /// the intermediate value small.
    pub fn max_borrowable(
        &self,
        real_exchange_rate: &BigDecimal,
        collateral_ratio: &BigDecimal,
        collateral_qty: &BigDecimal,
    ) -> Result<BigDecimal, MathError> {
        let per_unit =
            self.precision
                .div("max_borrowable", collateral_ratio, real_exchange_rate)?;
        Ok(self.precision.mul(&per_unit, collateral_qty))
    }

    /// Whole-percent annual rate from a per-second rate scaled by 1e18.
    pub fn annual_interest(&self, interest_per_second: &BigDecimal) -> Result<BigDecimal, MathError> {
        let per_year = self
            .precision
            .mul(interest_per_second, &BigDecimal::from(SECONDS_PER_YEAR));
        let fraction = self.precision.div("annual_interest", &per_year, &wad())?;
        let percent = self.precision.mul(&fraction, &BigDecimal::from(100u32));
        Ok(round_dp(&percent, 0))
    }

    /// Price of one collateral token in borrow units, rounded to 6 places.
    pub fn unit_price(&self, real_exchange_rate: &BigDecimal) -> Result<BigDecimal, MathError> {
        let price = self
            .precision
            .div("unit_price", &BigDecimal::one(), real_exchange_rate)?;
        Ok(round_dp(&price, 6))
    }

    pub fn percent(&self, ratio: &BigDecimal) -> BigDecimal {
        self.precision.mul(ratio, &BigDecimal::from(100u32))
    }

    /// Liquidation bonus in percent: `(raw / precision - 1) * 100`.
    pub fn liquidation_fee_percent(
        &self,
        raw_multiplier: &BigDecimal,
        precision: &BigDecimal,
    ) -> Result<BigDecimal, MathError> {
        let multiplier = self
            .precision
            .div("liquidation_fee_percent", raw_multiplier, precision)?;
        let bonus = self.precision.sub(&multiplier, &BigDecimal::one());
        Ok(self.percent(&bonus))
    }

    pub fn borrow_fee_percent(
        &self,
        raw_fee: &BigDecimal,
        precision: &BigDecimal,
    ) -> Result<BigDecimal, MathError> {
        let fee = self.precision.div("borrow_fee_percent", raw_fee, precision)?;
        Ok(self.percent(&fee))
    }

    /// Value of `collateral_qty` in borrow units, from the raw 1e18 exchange rate.
    pub fn collateral_value(
        &self,
        raw_exchange_rate: &BigDecimal,
        collateral_qty: &BigDecimal,
    ) -> Result<BigDecimal, MathError> {
        let price = self
            .precision
            .div("collateral_value", &wad(), raw_exchange_rate)?;
        Ok(self.precision.mul(&price, collateral_qty))
    }

    /// Debt of one account: its borrow part scaled by the market's elastic/base ratio.
    pub fn user_borrow_amount(
        &self,
        borrow_part: &BigDecimal,
        total_base: &BigDecimal,
        total_elastic: &BigDecimal,
    ) -> Result<BigDecimal, MathError> {
        if total_base.is_zero() {
            return Ok(BigDecimal::zero());
        }
        let share = self
            .precision
            .div("user_borrow_amount", borrow_part, total_base)?;
        Ok(self.precision.mul(&share, total_elastic))
    }

    /// New debt after borrowing `amount`: `amount * (1 + fee) + existing_debt`.
    pub fn borrow_with_opening_fee(
        &self,
        amount: &BigDecimal,
        existing_debt: &BigDecimal,
        raw_fee: &BigDecimal,
        precision: &BigDecimal,
    ) -> Result<BigDecimal, MathError> {
        let fee = self
            .precision
            .div("borrow_with_opening_fee", raw_fee, precision)?;
        let factor = self.precision.add(&BigDecimal::one(), &fee);
        let charged = self.precision.mul(amount, &factor);
        Ok(self.precision.add(&charged, existing_debt))
    }

    /// Collateral price at which the position reaches the maximum LTV.
    pub fn liquidation_price(
        &self,
        debt: &BigDecimal,
        max_ltv: &BigDecimal,
        collateral_qty: &BigDecimal,
    ) -> Result<BigDecimal, MathError> {
        let required_value = self.precision.div("liquidation_price", debt, max_ltv)?;
        self.precision
            .div("liquidation_price", &required_value, collateral_qty)
    }

    /// Both ratios are compared at the configured precision.
    pub fn within_ltv(&self, chosen_ltv: &BigDecimal, max_ltv: &BigDecimal) -> bool {
        self.precision.apply(chosen_ltv.clone()) <= self.precision.apply(max_ltv.clone())
    }

    /// Convenience for the common 1e5-scaled Cauldron constants.
    pub fn max_ltv(&self, raw_collateralization_rate: &BigDecimal) -> Result<BigDecimal, MathError> {
        self.collateralization_ratio(raw_collateralization_rate, &rate_precision())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::to_fixed_string;
    use std::str::FromStr;

    fn d(raw: &str) -> BigDecimal {
        BigDecimal::from_str(raw).unwrap()
    }

    #[test]
    fn test_collateralization_ratio_normalizes_rate() {
        let math = BorrowMath::default();
        let ratio = math
            .collateralization_ratio(&d("70000"), &d("100000"))
            .unwrap();
        assert_eq!(ratio, d("0.7"));
        let shown = format!("{}%", to_fixed_string(&math.percent(&ratio)));
        assert_eq!(shown, "70%");
    }

    #[test]
    fn test_annual_interest_rounds_to_whole_percent() {
        let math = BorrowMath::default();
        // 6% a year expressed per second at 1e18.
        assert_eq!(math.annual_interest(&d("1902587519")).unwrap(), d("6"));
        assert_eq!(math.annual_interest(&d("0")).unwrap(), d("0"));
    }

    #[test]
    fn test_annual_interest_uses_julian_year_approximation() {
        let math = BorrowMath::default();
        // 1.5% on 3.154e7 seconds lands exactly on the midpoint and rounds up.
        let per_second = Precision::default()
            .div("per_second", &d("15000000000000000"), &d("31540000"))
            .unwrap();
        assert_eq!(math.annual_interest(&per_second).unwrap(), d("2"));
    }

    #[test]
    fn test_unit_price_rounds_to_six_places() {
        let math = BorrowMath::default();
        let rate = math
            .real_exchange_rate(&d("122695810332786463898758"), &wad())
            .unwrap();
        assert_eq!(to_fixed_string(&math.unit_price(&rate).unwrap()), "0.000008");
    }

    #[test]
    fn test_fee_percentages() {
        let math = BorrowMath::default();
        let liquidation = math
            .liquidation_fee_percent(&d("112500"), &rate_precision())
            .unwrap();
        assert_eq!(to_fixed_string(&liquidation), "12.5");
        let opening = math
            .borrow_fee_percent(&d("500"), &rate_precision())
            .unwrap();
        assert_eq!(to_fixed_string(&opening), "0.5");
    }

    #[test]
    fn test_user_borrow_amount_of_empty_market_is_zero() {
        let math = BorrowMath::default();
        assert_eq!(
            math.user_borrow_amount(&d("0"), &d("0"), &d("0")).unwrap(),
            BigDecimal::zero()
        );
        assert_eq!(
            math.user_borrow_amount(&d("10"), &d("100"), &d("110"))
                .unwrap(),
            d("11")
        );
    }

    #[test]
    fn test_max_borrowable_rejects_zero_rate() {
        let math = BorrowMath::default();
        assert!(matches!(
            math.max_borrowable(&BigDecimal::zero(), &d("0.2"), &d("1000000")),
            Err(MathError::DivisionByZero("max_borrowable"))
        ));
    }

    #[test]
    fn test_max_borrowable_keeps_digits_for_large_rates() {
        let math = BorrowMath::default();
        // Quotient around 1e-40 still carries 18 significant digits.
        let per_unit = math
            .max_borrowable(&d("3e39"), &d("0.2"), &d("1"))
            .unwrap();
        assert_eq!(per_unit, d("6.66666666666666667e-41"));
    }

    #[test]
    fn test_within_ltv() {
        let math = BorrowMath::default();
        assert!(math.within_ltv(&d("0.2"), &d("0.7")));
        assert!(math.within_ltv(&d("0.7"), &d("0.7")));
        assert!(!math.within_ltv(&d("0.71"), &d("0.7")));
    }

    #[test]
    fn test_within_ltv_compares_at_configured_precision() {
        let coarse = BorrowMath::new(Precision::new(4, BigDecimal::zero()).unwrap());
        assert!(coarse.within_ltv(&d("0.70001"), &d("0.7")));
        assert!(!BorrowMath::default().within_ltv(&d("0.70001"), &d("0.7")));
    }
}
