//! Off-chain BentoBox master-contract approval (EIP-712).
//!
//! The user signs `SetMasterContractApproval` once; the signature is then replayed inside
//! the cook as its first action instead of a separate `setMasterContractApproval` tx.

use crate::config::deployment::Deployment;
use crate::error::SignatureError;
use alloy::primitives::{Address, Signature, B256, U256};
use alloy::signers::Signer;
use alloy::sol_types::{Eip712Domain, SolStruct};
use std::borrow::Cow;

pub const BENTO_BOX_DOMAIN_NAME: &str = "BentoBox V1";
pub const APPROVAL_WARNING: &str = "Give FULL access to funds in (and approved to) BentoBox?";

alloy::sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct SetMasterContractApproval {
        string warning;
        address user;
        address masterContract;
        bool approved;
        uint256 nonce;
    }
}

/// Domain plus message of one approval, ready to hash or sign.
#[derive(Debug, Clone)]
pub struct ApprovalRequest {
    pub domain: Eip712Domain,
    pub message: SetMasterContractApproval,
}

impl ApprovalRequest {
    pub fn new(
        chain_id: u64,
        bento_box: Address,
        user: Address,
        master_contract: Address,
        nonce: U256,
    ) -> Self {
        let domain = Eip712Domain::new(
            Some(Cow::Borrowed(BENTO_BOX_DOMAIN_NAME)),
            None,
            Some(U256::from(chain_id)),
            Some(bento_box),
            None,
        );
        let message = SetMasterContractApproval {
            warning: APPROVAL_WARNING.to_string(),
            user,
            masterContract: master_contract,
            approved: true,
            nonce,
        };
        Self { domain, message }
    }

    /// EIP-712 digest: `keccak256(0x1901 || domainSeparator || hashStruct(message))`.
    pub fn signing_hash(&self) -> B256 {
        self.message.eip712_signing_hash(&self.domain)
    }
}

/// Approval message for `user` against the deployment's BentoBox and master contract.
/// `nonce` is the user's current `BentoBox.nonces(user)`.
pub fn build_approval_message(deployment: &Deployment, user: Address, nonce: U256) -> ApprovalRequest {
    ApprovalRequest::new(
        deployment.chain_id,
        deployment.bento_box,
        user,
        deployment.master_contract,
        nonce,
    )
}

/// `r || s || v` components of a 65-byte signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitSignature {
    pub r: B256,
    pub s: B256,
    /// 27 or 28.
    pub v: u8,
}

impl SplitSignature {
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(self.r.as_slice());
        out[32..64].copy_from_slice(self.s.as_slice());
        out[64] = self.v;
        out
    }
}

/// Split a 65-byte signature at fixed offsets: r = 0..32, s = 32..64, v = 64.
/// A raw recovery id (0/1) is lifted to the 27/28 form `ecrecover` expects.
pub fn split_signature(raw: &[u8]) -> Result<SplitSignature, SignatureError> {
    let bytes: &[u8; 65] = raw
        .try_into()
        .map_err(|_| SignatureError::Length(raw.len()))?;
    let (r, rest) = bytes.split_at(32);
    let (s, v) = rest.split_at(32);
    let v = match v[0] {
        0 | 1 => v[0] + 27,
        27 | 28 => v[0],
        other => return Err(SignatureError::RecoveryId(other)),
    };
    Ok(SplitSignature {
        r: B256::from_slice(r),
        s: B256::from_slice(s),
        v,
    })
}

/// Sign the approval digest with `signer` and return the 65-byte `r || s || v` blob.
pub async fn sign_approval<S>(signer: &S, request: &ApprovalRequest) -> Result<[u8; 65], SignatureError>
where
    S: Signer + Send + Sync,
{
    let hash = request.signing_hash();
    let signature = signer
        .sign_hash(&hash)
        .await
        .map_err(|e| SignatureError::Signing(e.to_string()))?;
    Ok(signature.as_bytes())
}

/// Recompute the digest and recover the address that produced `signature`.
pub fn recover_signer(
    request: &ApprovalRequest,
    signature: &SplitSignature,
) -> Result<Address, SignatureError> {
    let bytes = signature.to_bytes();
    let parsed = Signature::try_from(&bytes[..])
        .map_err(|e| SignatureError::Recovery(e.to_string()))?;
    parsed
        .recover_address_from_prehash(&request.signing_hash())
        .map_err(|e| SignatureError::Recovery(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const USER: Address = address!("1111111111111111111111111111111111111111");

    #[test]
    fn test_encode_type_lists_fields_in_declaration_order() {
        assert_eq!(
            SetMasterContractApproval::eip712_encode_type(),
            "SetMasterContractApproval(string warning,address user,address masterContract,bool approved,uint256 nonce)"
        );
    }

    #[test]
    fn test_domain_has_no_version_field() {
        let request = build_approval_message(&Deployment::mainnet_shib(), USER, U256::ZERO);
        assert_eq!(request.domain.name.as_deref(), Some(BENTO_BOX_DOMAIN_NAME));
        assert!(request.domain.version.is_none());
        assert_eq!(request.domain.chain_id, Some(U256::from(1u64)));
        assert_eq!(
            request.domain.verifying_contract,
            Some(Deployment::mainnet_shib().bento_box)
        );
    }

    #[test]
    fn test_nonce_changes_the_digest() {
        let deployment = Deployment::mainnet_shib();
        let first = build_approval_message(&deployment, USER, U256::ZERO);
        let second = build_approval_message(&deployment, USER, U256::from(1u64));
        assert_ne!(first.signing_hash(), second.signing_hash());
    }

    #[test]
    fn test_split_signature_uses_fixed_offsets() {
        let mut raw = [0u8; 65];
        raw[..32].fill(0x11);
        raw[32..64].fill(0x22);
        raw[64] = 28;
        let split = split_signature(&raw).unwrap();
        assert_eq!(split.r, B256::repeat_byte(0x11));
        assert_eq!(split.s, B256::repeat_byte(0x22));
        assert_eq!(split.v, 28);
        assert_eq!(split.to_bytes(), raw);
    }

    #[test]
    fn test_split_signature_normalizes_parity_and_rejects_bad_input() {
        let mut raw = [0u8; 65];
        raw[64] = 1;
        assert_eq!(split_signature(&raw).unwrap().v, 28);
        raw[64] = 35;
        assert!(matches!(
            split_signature(&raw),
            Err(SignatureError::RecoveryId(35))
        ));
        assert!(matches!(
            split_signature(&raw[..64]),
            Err(SignatureError::Length(64))
        ));
    }
}
