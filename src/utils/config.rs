use crate::config::deployment::Deployment;
use crate::error::{ConfigError, Result};
use crate::utils::hex::is_private_key_hex;
use alloy::primitives::Address;
use bigdecimal::BigDecimal;
use num_bigint::Sign;
use std::env;
use std::str::FromStr;

const DEFAULT_CHOSEN_LTV: &str = "0.2";
const DEFAULT_CHOSEN_COLLATERAL: &str = "1000000";

pub struct Config {
    pub rpc_url: String,
    pub private_key: Option<String>,
    pub chain_id: u64,
    pub deployment: Deployment,
    pub chosen_ltv: BigDecimal,
    pub chosen_collateral: BigDecimal,
    pub fund_wallet: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("rpc_url", &self.rpc_url)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("chain_id", &self.chain_id)
            .field("deployment", &self.deployment)
            .field("chosen_ltv", &self.chosen_ltv)
            .field("chosen_collateral", &self.chosen_collateral)
            .field("fund_wallet", &self.fund_wallet)
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_http_url(name: &str, raw: &str) -> Result<()> {
    let parsed = raw.parse::<reqwest::Url>().map_err(|e| {
        ConfigError::Invalid(format!("{name} must be a valid URL, got `{raw}`: {e}"))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::Invalid(format!(
            "{name} must use http(s) scheme, got `{other}`"
        ))
        .into()),
    }
}

fn address_override(name: &str, default: Address) -> Result<Address> {
    match non_empty_var(name) {
        Some(raw) => Address::from_str(&raw).map_err(|e| {
            ConfigError::Invalid(format!("{name} must be a 20-byte hex address, got `{raw}`: {e}"))
                .into()
        }),
        None => Ok(default),
    }
}

fn decimal_var(name: &str, default: &str) -> Result<BigDecimal> {
    let raw = non_empty_var(name).unwrap_or_else(|| default.to_string());
    let value = BigDecimal::from_str(&raw)
        .map_err(|e| ConfigError::Invalid(format!("{name} must be a decimal, got `{raw}`: {e}")))?;
    if value.sign() != Sign::Plus {
        return Err(ConfigError::Invalid(format!("{name} must be positive, got `{raw}`")).into());
    }
    Ok(value)
}

fn flag_var(name: &str) -> bool {
    non_empty_var(name)
        .map(|v| {
            matches!(
                v.to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
        .unwrap_or(false)
}

impl Config {
    pub fn load() -> Result<Self> {
        let rpc_url = non_empty_var("ETH_RPC_URL")
            .or_else(|| non_empty_var("PROVIDER_URL"))
            .ok_or_else(|| ConfigError::Missing("ETH_RPC_URL must be set".to_string()))?;
        validate_http_url("ETH_RPC_URL", &rpc_url)?;

        let private_key = non_empty_var("ETH_PRIVATE_KEY").or_else(|| non_empty_var("PRIVATE_KEY"));
        if let Some(pk) = private_key.as_deref() {
            if !is_private_key_hex(pk) {
                return Err(ConfigError::Invalid(
                    "ETH_PRIVATE_KEY must be 32 bytes of hex (optionally 0x-prefixed)".to_string(),
                )
                .into());
            }
        }

        let chain_id = match non_empty_var("CHAIN_ID") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                ConfigError::Invalid(format!("CHAIN_ID must be a valid u64, got `{raw}`"))
            })?,
            None => 1,
        };

        let base = Deployment::get(chain_id).ok_or_else(|| {
            ConfigError::Missing(format!("no default deployment for chain_id={chain_id}"))
        })?;
        let deployment = Deployment {
            cauldron: address_override("CAULDRON_ADDRESS", base.cauldron)?,
            bento_box: address_override("BENTO_BOX_ADDRESS", base.bento_box)?,
            master_contract: address_override("MASTER_CONTRACT_ADDRESS", base.master_contract)?,
            collateral_token: address_override("COLLATERAL_TOKEN_ADDRESS", base.collateral_token)?,
            borrow_token: address_override("BORROW_TOKEN_ADDRESS", base.borrow_token)?,
            ..base
        };

        Ok(Self {
            rpc_url,
            private_key,
            chain_id,
            deployment,
            chosen_ltv: decimal_var("CHOSEN_LTV", DEFAULT_CHOSEN_LTV)?,
            chosen_collateral: decimal_var("CHOSEN_COLLATERAL", DEFAULT_CHOSEN_COLLATERAL)?,
            fund_wallet: flag_var("FUND_WALLET"),
        })
    }
}
