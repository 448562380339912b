use alloy::primitives::{address, keccak256, Address, U256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use alloy::sol_types::SolStruct;
use cauldron_cook::approval::{
    build_approval_message, recover_signer, sign_approval, split_signature, ApprovalRequest,
    SetMasterContractApproval, APPROVAL_WARNING,
};
use cauldron_cook::config::deployment::Deployment;

#[tokio::test]
async fn test_signature_recovers_to_signer() {
    let signer = PrivateKeySigner::random();
    let deployment = Deployment::mainnet_shib();
    let request = build_approval_message(&deployment, signer.address(), U256::from(3u64));

    let raw = sign_approval(&signer, &request).await.unwrap();
    let split = split_signature(&raw).unwrap();
    assert!(split.v == 27 || split.v == 28);
    assert_eq!(recover_signer(&request, &split).unwrap(), signer.address());
}

#[tokio::test]
async fn test_signature_does_not_verify_for_other_nonce() {
    let signer = PrivateKeySigner::random();
    let deployment = Deployment::mainnet_shib();
    let signed = build_approval_message(&deployment, signer.address(), U256::ZERO);
    let replayed = build_approval_message(&deployment, signer.address(), U256::from(1u64));

    let split = split_signature(&sign_approval(&signer, &signed).await.unwrap()).unwrap();
    let recovered = recover_signer(&replayed, &split).unwrap();
    assert_ne!(recovered, signer.address());
}

#[test]
fn test_signing_hash_follows_eip712_layout() {
    let user = address!("1111111111111111111111111111111111111111");
    let deployment = Deployment::mainnet_shib();
    let request = ApprovalRequest::new(
        deployment.chain_id,
        deployment.bento_box,
        user,
        deployment.master_contract,
        U256::from(7u64),
    );

    let domain_type = keccak256("EIP712Domain(string name,uint256 chainId,address verifyingContract)");
    let mut domain_words = Vec::with_capacity(4 * 32);
    domain_words.extend_from_slice(domain_type.as_slice());
    domain_words.extend_from_slice(keccak256("BentoBox V1").as_slice());
    domain_words.extend_from_slice(&U256::from(1u64).to_be_bytes::<32>());
    domain_words.extend_from_slice(&[0u8; 12]);
    domain_words.extend_from_slice(deployment.bento_box.as_slice());
    let domain_separator = keccak256(&domain_words);
    assert_eq!(request.domain.separator(), domain_separator);

    let mut preimage = vec![0x19, 0x01];
    preimage.extend_from_slice(domain_separator.as_slice());
    preimage.extend_from_slice(request.message.eip712_hash_struct().as_slice());
    assert_eq!(request.signing_hash(), keccak256(&preimage));
}

#[test]
fn test_message_carries_fixed_warning_and_approval() {
    let deployment = Deployment::mainnet_shib();
    let user = Address::repeat_byte(0x42);
    let request = build_approval_message(&deployment, user, U256::ZERO);
    let SetMasterContractApproval {
        warning,
        user: message_user,
        masterContract: master,
        approved,
        nonce,
    } = request.message;
    assert_eq!(warning, APPROVAL_WARNING);
    assert_eq!(message_user, user);
    assert_eq!(master, deployment.master_contract);
    assert!(approved);
    assert_eq!(nonce, U256::ZERO);
}
