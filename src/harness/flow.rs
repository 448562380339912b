use crate::approval::{build_approval_message, recover_signer, sign_approval, split_signature, SplitSignature};
use crate::config::deployment::Deployment;
use crate::contracts::{eth_call, send_call, IBentoBox, IERC20};
use crate::cook::{CookAction, CookBatch};
use crate::error::SignatureError;
use crate::math::CurrencyConverter;
use crate::utils::constants::COOK_GAS_LIMIT;
use alloy::primitives::{Address, U256};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionReceipt;
use alloy::signers::Signer;
use alloy::transports::Transport;
use anyhow::Context;
use bigdecimal::BigDecimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowanceOutcome {
    AlreadySufficient { allowance: U256 },
    Approved { before: U256, after: U256 },
}

impl AllowanceOutcome {
    /// `Some` when `allowance` already covers `required`; `None` means an approve is due.
    pub fn check(allowance: U256, required: U256) -> Option<Self> {
        (allowance >= required).then_some(Self::AlreadySufficient { allowance })
    }

    /// Outcome of a confirmed approve, given the allowance read before and after it.
    pub fn after_approve(before: U256, after: U256, required: U256) -> anyhow::Result<Self> {
        if after < required {
            anyhow::bail!(
                "approve confirmed but allowance={} is still below required={}",
                after,
                required
            );
        }
        Ok(Self::Approved { before, after })
    }
}

/// Make sure BentoBox may pull `required` collateral from `owner`.
///
/// When the current allowance already covers `required` nothing is sent; otherwise one
/// `approve(bentoBox, required)` is submitted and the allowance is read again.
pub async fn ensure_allowance<T, P>(
    provider: &P,
    deployment: &Deployment,
    owner: Address,
    required: U256,
) -> anyhow::Result<AllowanceOutcome>
where
    T: Transport + Clone,
    P: Provider<T>,
{
    let token = deployment.collateral_token;
    let spender = deployment.bento_box;
    let before = eth_call(provider, token, IERC20::allowanceCall { owner, spender })
        .await?
        .remaining;
    if let Some(outcome) = AllowanceOutcome::check(before, required) {
        tracing::debug!(
            "[ALLOWANCE] token={:#x} allowance={} covers required={}",
            token,
            before,
            required
        );
        return Ok(outcome);
    }

    tracing::info!(
        "[ALLOWANCE] token={:#x} allowance={} below required={}; approving",
        token,
        before,
        required
    );
    send_call(
        provider,
        owner,
        token,
        IERC20::approveCall {
            spender,
            amount: required,
        },
        None,
    )
    .await?;

    let after = eth_call(provider, token, IERC20::allowanceCall { owner, spender })
        .await?
        .remaining;
    AllowanceOutcome::after_approve(before, after, required)
        .with_context(|| format!("allowance of token={token:#x}"))
}

/// Read the user's BentoBox nonce, sign the master-contract approval and check that the
/// signature recovers to `signer`.
pub async fn sign_master_contract_approval<T, P, S>(
    provider: &P,
    signer: &S,
    deployment: &Deployment,
) -> anyhow::Result<SplitSignature>
where
    T: Transport + Clone,
    P: Provider<T>,
    S: Signer + Send + Sync,
{
    let user = signer.address();
    let nonce = eth_call(provider, deployment.bento_box, IBentoBox::noncesCall { user })
        .await?
        ._0;
    let request = build_approval_message(deployment, user, nonce);
    let raw = sign_approval(signer, &request).await?;
    let split = split_signature(&raw)?;

    let recovered = recover_signer(&request, &split)?;
    if recovered != user {
        return Err(SignatureError::Recovery(format!(
            "recovered {recovered:#x}, expected {user:#x}"
        ))
        .into());
    }
    tracing::info!("[SIGN] master contract approval signed user={:#x} nonce={}", user, nonce);
    Ok(split)
}

/// Amounts and shares behind a prepared borrow cook, in on-chain units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCook {
    pub batch: CookBatch,
    pub collateral_amount: U256,
    pub collateral_share: U256,
    pub borrow_amount: U256,
    pub borrow_share: U256,
}

/// Build the five-step borrow cook: approve, deposit, add collateral, borrow, withdraw.
pub async fn prepare_borrow_cook<T, P>(
    provider: &P,
    deployment: &Deployment,
    converter: &CurrencyConverter,
    user: Address,
    approval: &SplitSignature,
    collateral_qty: &BigDecimal,
    borrow_qty: &BigDecimal,
) -> anyhow::Result<PreparedCook>
where
    T: Transport + Clone,
    P: Provider<T>,
{
    let collateral_amount = converter.to_on_chain_amount(collateral_qty)?;
    let borrow_amount = converter.to_on_chain_amount(borrow_qty)?;

    let collateral_share = eth_call(
        provider,
        deployment.bento_box,
        IBentoBox::toShareCall {
            token: deployment.collateral_token,
            amount: collateral_amount,
            roundUp: false,
        },
    )
    .await?
    .share;
    let borrow_share = eth_call(
        provider,
        deployment.bento_box,
        IBentoBox::toShareCall {
            token: deployment.borrow_token,
            amount: borrow_amount,
            roundUp: false,
        },
    )
    .await?
    .share;

    let mut batch = CookBatch::new();
    batch
        .push(CookAction::set_approval(user, deployment.master_contract, approval))?
        .push(CookAction::deposit_collateral(
            deployment.collateral_token,
            user,
            collateral_amount,
            collateral_share,
        )?)?
        .push(CookAction::add_collateral(collateral_share, user)?)?
        .push(CookAction::borrow(borrow_amount, user)?)?
        .push(CookAction::withdraw(
            deployment.borrow_token,
            user,
            borrow_amount,
            borrow_share,
        )?)?;

    Ok(PreparedCook {
        batch,
        collateral_amount,
        collateral_share,
        borrow_amount,
        borrow_share,
    })
}

/// Submit `batch` as one `cook` transaction and require a successful receipt.
pub async fn submit_cook<T, P>(
    provider: &P,
    deployment: &Deployment,
    from: Address,
    batch: CookBatch,
) -> anyhow::Result<TransactionReceipt>
where
    T: Transport + Clone,
    P: Provider<T>,
{
    tracing::info!(
        "[COOK] submitting actions={:?} cauldron={:#x}",
        batch.actions(),
        deployment.cauldron
    );
    let receipt = send_call(
        provider,
        from,
        deployment.cauldron,
        batch.into_call(),
        Some(COOK_GAS_LIMIT),
    )
    .await?;
    tracing::info!(
        "[COOK] confirmed tx={:#x} gas_used={}",
        receipt.transaction_hash,
        receipt.gas_used
    );
    Ok(receipt)
}

/// Credit `wei` to `address` on a tenderly fork.
pub async fn fund_wallet<T, P>(provider: &P, address: Address, wei: U256) -> anyhow::Result<()>
where
    T: Transport + Clone,
    P: Provider<T>,
{
    let params = (vec![address], format!("{wei:#x}"));
    let _: serde_json::Value = provider
        .raw_request("tenderly_addBalance".into(), params)
        .await
        .map_err(|err| anyhow::anyhow!("tenderly_addBalance failed for {:#x}: {}", address, err))?;
    tracing::info!("[FORK] funded {:#x} with {} wei", address, wei);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sufficient_allowance_skips_approve() {
        let required = U256::from(1_000u64);
        assert_eq!(
            AllowanceOutcome::check(required, required),
            Some(AllowanceOutcome::AlreadySufficient { allowance: required })
        );
        assert_eq!(
            AllowanceOutcome::check(U256::MAX, required),
            Some(AllowanceOutcome::AlreadySufficient { allowance: U256::MAX })
        );
    }

    #[test]
    fn test_short_allowance_requires_approve() {
        assert_eq!(
            AllowanceOutcome::check(U256::from(999u64), U256::from(1_000u64)),
            None
        );
    }

    #[test]
    fn test_after_approve_reports_before_and_after() {
        let outcome =
            AllowanceOutcome::after_approve(U256::ZERO, U256::from(1_000u64), U256::from(1_000u64))
                .unwrap();
        assert_eq!(
            outcome,
            AllowanceOutcome::Approved {
                before: U256::ZERO,
                after: U256::from(1_000u64)
            }
        );
    }

    #[test]
    fn test_after_approve_still_short_is_an_error() {
        let err =
            AllowanceOutcome::after_approve(U256::ZERO, U256::from(999u64), U256::from(1_000u64))
                .unwrap_err();
        assert!(err.to_string().contains("still below required=1000"));
    }
}
