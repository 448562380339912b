use alloy::primitives::{address, Address};

/// Contract addresses of one Cauldron market and the BentoBox it settles through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub chain_id: u64,
    pub name: String,
    pub cauldron: Address,
    pub bento_box: Address,
    /// Cauldron master contract the user approves on BentoBox.
    pub master_contract: Address,
    pub collateral_token: Address,
    /// MIM.
    pub borrow_token: Address,
}

impl Deployment {
    pub fn get(chain_id: u64) -> Option<Self> {
        match chain_id {
            1 => Some(Self::mainnet_shib()),
            _ => None,
        }
    }

    /// SHIB collateral / MIM borrow market on Ethereum mainnet.
    pub fn mainnet_shib() -> Self {
        Self {
            chain_id: 1,
            name: "Ethereum Mainnet SHIB/MIM".to_string(),
            cauldron: address!("252dcf1b621cc53bc22c256255d2be5c8c32eae4"),
            bento_box: address!("f5bce5077908a1b7370b9ae04adc565ebd643966"),
            master_contract: address!("476b1e35dde474cb9aa1f6b85c9cc589bfa85c1f"),
            collateral_token: address!("95ad61b0a150d79219dcf64e1e6cc01f0b64c4ce"),
            borrow_token: address!("99d8a9c45b2eca8864373a26d1459e3dff1e17f3"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_chain_has_no_default_deployment() {
        assert!(Deployment::get(1).is_some());
        assert!(Deployment::get(8453).is_none());
    }
}
