use crate::config::deployment::Deployment;
use crate::contracts::{eth_call, IBentoBox, ICauldron, IERC20};
use alloy::primitives::{Address, U256};
use alloy::providers::Provider;
use alloy::transports::Transport;

/// Raw on-chain state of one market as seen by one account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarketSnapshot {
    /// Max LTV scaled by 1e5.
    pub collateralization_rate: U256,
    /// `1e5 + liquidation bonus`, scaled by 1e5.
    pub liquidation_multiplier: U256,
    pub borrow_opening_fee: U256,
    /// Interest per second scaled by 1e18.
    pub interest_per_second: u64,
    pub fees_earned: u128,
    pub last_accrued: u64,
    /// Collateral units per borrow unit, scaled by 1e18.
    pub exchange_rate: U256,
    pub user_collateral_share: U256,
    pub user_collateral_amount: U256,
    pub user_borrow_part: U256,
    pub total_borrow_elastic: u128,
    pub total_borrow_base: u128,
    pub collateral_balance: U256,
    pub borrow_token_balance: U256,
}

impl MarketSnapshot {
    pub async fn read<T, P>(provider: &P, deployment: &Deployment, user: Address) -> anyhow::Result<Self>
    where
        T: Transport + Clone,
        P: Provider<T>,
    {
        let cauldron = deployment.cauldron;

        let collateralization_rate =
            eth_call(provider, cauldron, ICauldron::COLLATERIZATION_RATECall {}).await?._0;
        let liquidation_multiplier =
            eth_call(provider, cauldron, ICauldron::LIQUIDATION_MULTIPLIERCall {}).await?._0;
        let borrow_opening_fee =
            eth_call(provider, cauldron, ICauldron::BORROW_OPENING_FEECall {}).await?._0;
        let accrue = eth_call(provider, cauldron, ICauldron::accrueInfoCall {}).await?;
        let exchange_rate = eth_call(provider, cauldron, ICauldron::exchangeRateCall {}).await?._0;

        let user_collateral_share =
            eth_call(provider, cauldron, ICauldron::userCollateralShareCall { user })
                .await?
                ._0;
        let user_collateral_amount = eth_call(
            provider,
            deployment.bento_box,
            IBentoBox::toAmountCall {
                token: deployment.collateral_token,
                share: user_collateral_share,
                roundUp: false,
            },
        )
        .await?
        .amount;
        let user_borrow_part =
            eth_call(provider, cauldron, ICauldron::userBorrowPartCall { user })
                .await?
                ._0;
        let total_borrow = eth_call(provider, cauldron, ICauldron::totalBorrowCall {}).await?;

        let collateral_balance = token_balance(provider, deployment.collateral_token, user).await?;
        let borrow_token_balance = token_balance(provider, deployment.borrow_token, user).await?;

        let snapshot = Self {
            collateralization_rate,
            liquidation_multiplier,
            borrow_opening_fee,
            interest_per_second: accrue.INTEREST_PER_SECOND,
            fees_earned: accrue.feesEarned,
            last_accrued: accrue.lastAccrued,
            exchange_rate,
            user_collateral_share,
            user_collateral_amount,
            user_borrow_part,
            total_borrow_elastic: total_borrow.elastic,
            total_borrow_base: total_borrow.base,
            collateral_balance,
            borrow_token_balance,
        };
        tracing::debug!(
            "[MARKET] cauldron={:#x} user={:#x} exchange_rate={} collateral_share={} borrow_part={}",
            cauldron,
            user,
            snapshot.exchange_rate,
            snapshot.user_collateral_share,
            snapshot.user_borrow_part
        );
        Ok(snapshot)
    }
}

pub async fn token_balance<T, P>(provider: &P, token: Address, owner: Address) -> anyhow::Result<U256>
where
    T: Transport + Clone,
    P: Provider<T>,
{
    Ok(eth_call(provider, token, IERC20::balanceOfCall { owner })
        .await?
        .balance)
}
