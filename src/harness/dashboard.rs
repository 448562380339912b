use super::market::MarketSnapshot;
use crate::error::Result;
use crate::math::precision::round_dp;
use crate::math::{rate_precision, to_fixed_string, wad, BorrowMath, CurrencyConverter};
use alloy::primitives::U256;
use bigdecimal::BigDecimal;
use serde::{Serialize, Serializer};

/// What the user picked on the borrow screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowInputs {
    pub chosen_ltv: BigDecimal,
    /// Collateral to deposit, in whole tokens.
    pub chosen_collateral: BigDecimal,
}

fn plain<S: Serializer>(value: &BigDecimal, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_fixed_string(value))
}

/// Readable figures for one market snapshot and one set of inputs.
///
/// Percentages are already multiplied by 100. Display roundings follow the borrow
/// screen: 4 places for amounts, 2 for collateral value, 6 for prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BorrowDashboard {
    #[serde(serialize_with = "plain")]
    pub max_ltv: BigDecimal,
    #[serde(serialize_with = "plain")]
    pub max_ltv_percent: BigDecimal,
    #[serde(serialize_with = "plain")]
    pub liquidation_fee_percent: BigDecimal,
    #[serde(serialize_with = "plain")]
    pub borrow_fee_percent: BigDecimal,
    #[serde(serialize_with = "plain")]
    pub annual_interest_percent: BigDecimal,
    #[serde(serialize_with = "plain")]
    pub unit_price: BigDecimal,
    #[serde(serialize_with = "plain")]
    pub max_borrowable: BigDecimal,
    #[serde(serialize_with = "plain")]
    pub collateral_deposit: BigDecimal,
    #[serde(serialize_with = "plain")]
    pub existing_debt: BigDecimal,
    #[serde(serialize_with = "plain")]
    pub debt_after_borrow: BigDecimal,
    #[serde(serialize_with = "plain")]
    pub collateral_value: BigDecimal,
    #[serde(serialize_with = "plain")]
    pub liquidation_price: BigDecimal,
    pub within_ltv: bool,
}

impl BorrowDashboard {
    pub fn compute(
        math: &BorrowMath,
        converter: &CurrencyConverter,
        snapshot: &MarketSnapshot,
        inputs: &BorrowInputs,
    ) -> Result<Self> {
        let raw = |value: U256| converter.from_raw(value);

        let max_ltv = math.max_ltv(&raw(snapshot.collateralization_rate))?;
        let liquidation_fee_percent = math
            .liquidation_fee_percent(&raw(snapshot.liquidation_multiplier), &rate_precision())?;
        let borrow_fee_percent =
            math.borrow_fee_percent(&raw(snapshot.borrow_opening_fee), &rate_precision())?;
        let annual_interest_percent =
            math.annual_interest(&BigDecimal::from(snapshot.interest_per_second))?;

        let raw_exchange_rate = raw(snapshot.exchange_rate);
        let real_exchange_rate = math.real_exchange_rate(&raw_exchange_rate, &wad())?;
        let unit_price = math.unit_price(&real_exchange_rate)?;
        let max_borrowable = math.max_borrowable(
            &real_exchange_rate,
            &inputs.chosen_ltv,
            &inputs.chosen_collateral,
        )?;

        let deposited = converter.to_decimal(snapshot.user_collateral_amount);
        let collateral_deposit = math.precision().add(&inputs.chosen_collateral, &deposited);

        let existing_debt = math.user_borrow_amount(
            &converter.to_decimal(snapshot.user_borrow_part),
            &converter.to_decimal(U256::from(snapshot.total_borrow_base)),
            &converter.to_decimal(U256::from(snapshot.total_borrow_elastic)),
        )?;
        let debt_after_borrow = math.borrow_with_opening_fee(
            &max_borrowable,
            &existing_debt,
            &raw(snapshot.borrow_opening_fee),
            &rate_precision(),
        )?;

        let collateral_value =
            math.collateral_value(&raw_exchange_rate, &inputs.chosen_collateral)?;
        let liquidation_price =
            math.liquidation_price(&debt_after_borrow, &max_ltv, &inputs.chosen_collateral)?;
        let within_ltv = math.within_ltv(&inputs.chosen_ltv, &max_ltv);

        Ok(Self {
            max_ltv_percent: math.percent(&max_ltv).normalized(),
            max_ltv,
            liquidation_fee_percent: liquidation_fee_percent.normalized(),
            borrow_fee_percent: borrow_fee_percent.normalized(),
            annual_interest_percent,
            unit_price,
            max_borrowable,
            collateral_deposit: round_dp(&collateral_deposit, 4),
            existing_debt,
            debt_after_borrow,
            collateral_value: round_dp(&collateral_value, 2),
            liquidation_price: round_dp(&liquidation_price, 6),
            within_ltv,
        })
    }
}
