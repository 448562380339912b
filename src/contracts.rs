//! ABI surface of the remote contracts and the two call paths used against them:
//! read-only `eth_call` and a signed transaction that must succeed.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes};
use alloy::providers::Provider;
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::sol_types::SolCall;
use alloy::transports::Transport;
use anyhow::Context;

alloy::sol! {
    interface ICauldron {
        function COLLATERIZATION_RATE() external view returns (uint256);
        function LIQUIDATION_MULTIPLIER() external view returns (uint256);
        function BORROW_OPENING_FEE() external view returns (uint256);
        function accrueInfo() external view returns (uint64 lastAccrued, uint128 feesEarned, uint64 INTEREST_PER_SECOND);
        function exchangeRate() external view returns (uint256);
        function userCollateralShare(address user) external view returns (uint256);
        function userBorrowPart(address user) external view returns (uint256);
        function totalBorrow() external view returns (uint128 elastic, uint128 base);
        function cook(
            uint8[] calldata actions,
            uint256[] calldata values,
            bytes[] calldata datas
        ) external payable returns (uint256 value1, uint256 value2);
    }

    interface IBentoBox {
        function nonces(address user) external view returns (uint256);
        function toAmount(address token, uint256 share, bool roundUp) external view returns (uint256 amount);
        function toShare(address token, uint256 amount, bool roundUp) external view returns (uint256 share);
    }

    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256 balance);
        function allowance(address owner, address spender) external view returns (uint256 remaining);
        function approve(address spender, uint256 amount) external returns (bool);
    }
}

/// `eth_call` of `call` against `to`, decoded into the call's return type.
pub async fn eth_call<T, P, C>(provider: &P, to: Address, call: C) -> anyhow::Result<C::Return>
where
    T: Transport + Clone,
    P: Provider<T>,
    C: SolCall,
{
    let request = TransactionRequest::default()
        .with_to(to)
        .with_input(Bytes::from(call.abi_encode()));
    let raw = provider
        .call(&request)
        .await
        .map_err(|err| anyhow::anyhow!("eth_call {} failed for to={:#x}: {}", C::SIGNATURE, to, err))?;
    C::abi_decode_returns(raw.as_ref(), true).map_err(|err| {
        anyhow::anyhow!("{} decode failed for to={:#x}: {}", C::SIGNATURE, to, err)
    })
}

/// Send `call` to `to` from `from` and wait for a successful receipt.
///
/// The provider is expected to carry a wallet for `from`; nonce, fees and signing are
/// left to its fillers.
pub async fn send_call<T, P, C>(
    provider: &P,
    from: Address,
    to: Address,
    call: C,
    gas_limit: Option<u64>,
) -> anyhow::Result<TransactionReceipt>
where
    T: Transport + Clone,
    P: Provider<T>,
    C: SolCall,
{
    let mut request = TransactionRequest::default()
        .with_from(from)
        .with_to(to)
        .with_input(Bytes::from(call.abi_encode()));
    if let Some(gas) = gas_limit {
        request = request.with_gas_limit(gas.into());
    }

    let pending = provider
        .send_transaction(request)
        .await
        .with_context(|| format!("{} submission failed for to={:#x}", C::SIGNATURE, to))?;
    let tx_hash = *pending.tx_hash();
    tracing::debug!("[TX] {} sent tx={:#x}", C::SIGNATURE, tx_hash);

    let receipt = pending
        .get_receipt()
        .await
        .with_context(|| format!("{} receipt unavailable for tx={:#x}", C::SIGNATURE, tx_hash))?;
    if !receipt.status() {
        anyhow::bail!("{} reverted tx={:#x}", C::SIGNATURE, tx_hash);
    }
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{keccak256, U256};

    fn selector(signature: &str) -> [u8; 4] {
        let hash = keccak256(signature.as_bytes());
        [hash[0], hash[1], hash[2], hash[3]]
    }

    #[test]
    fn test_cook_selector_matches_cauldron_abi() {
        assert_eq!(
            ICauldron::cookCall::SELECTOR,
            selector("cook(uint8[],uint256[],bytes[])")
        );
        assert_eq!(
            IBentoBox::toShareCall::SELECTOR,
            selector("toShare(address,uint256,bool)")
        );
    }

    #[test]
    fn test_accrue_info_decodes_named_fields() {
        let mut words = Vec::new();
        for value in [7u64, 9, 1_902_587_519] {
            words.extend_from_slice(&U256::from(value).to_be_bytes::<32>());
        }
        let decoded = ICauldron::accrueInfoCall::abi_decode_returns(&words, true).unwrap();
        assert_eq!(decoded.lastAccrued, 7);
        assert_eq!(decoded.feesEarned, 9);
        assert_eq!(decoded.INTEREST_PER_SECOND, 1_902_587_519);
    }
}
