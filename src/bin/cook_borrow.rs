use alloy::network::EthereumWallet;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use anyhow::{anyhow, Context, Result};
use bigdecimal::RoundingMode;
use cauldron_cook::harness::{
    ensure_allowance, fund_wallet, prepare_borrow_cook, sign_master_contract_approval,
    submit_cook, token_balance, AllowanceOutcome, BorrowDashboard, BorrowInputs, MarketSnapshot,
};
use cauldron_cook::math::currency::TOKEN_DECIMALS;
use cauldron_cook::math::{to_fixed_string, BorrowMath, CurrencyConverter};
use cauldron_cook::utils::config::Config;
use cauldron_cook::utils::constants::FORK_FUNDING_WEI;
use cauldron_cook::utils::env_guard::load_dot_env;
use cauldron_cook::utils::hex::clean_hex;
use std::str::FromStr;
use std::time::Duration;

const CHAIN_ID_TIMEOUT: Duration = Duration::from_millis(1_500);

#[derive(Debug, Default)]
struct Args {
    dry_run: bool,
    fund: bool,
}

fn print_usage() {
    eprintln!(
        "usage: cook_borrow [--dry-run] [--fund]\n\
         --dry-run  read the market and print the borrow figures without sending transactions\n\
         --fund     credit the wallet with 1 ETH via tenderly_addBalance first (same as FUND_WALLET=1)\n\
         env: ETH_RPC_URL, ETH_PRIVATE_KEY, CHOSEN_LTV, CHOSEN_COLLATERAL, CAULDRON_ADDRESS, ..."
    );
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            "--dry-run" | "-n" => args.dry_run = true,
            "--fund" => args.fund = true,
            other => return Err(anyhow!("unknown argument '{other}'")),
        }
    }
    Ok(args)
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args().inspect_err(|_| print_usage())?;
    load_dot_env();
    init_tracing();

    let config = Config::load()?;
    tracing::info!("[STARTUP] {:?}", config);
    let deployment = &config.deployment;

    let private_key = config
        .private_key
        .as_deref()
        .ok_or_else(|| anyhow!("ETH_PRIVATE_KEY (or PRIVATE_KEY) is required"))?;
    let signer = PrivateKeySigner::from_str(clean_hex(private_key))
        .map_err(|e| anyhow!("invalid private key: {e}"))?;
    let user = signer.address();

    let provider = ProviderBuilder::new()
        .with_recommended_fillers()
        .wallet(EthereumWallet::from(signer.clone()))
        .on_http(config.rpc_url.parse().context("invalid ETH_RPC_URL")?);

    let remote_chain_id = tokio::time::timeout(CHAIN_ID_TIMEOUT, provider.get_chain_id())
        .await
        .map_err(|_| anyhow!("timed out reading chain id from RPC"))?
        .context("failed to read chain id from RPC")?;
    if remote_chain_id != config.chain_id {
        tracing::warn!(
            "[STARTUP] RPC reports chain_id={} but deployment expects {}",
            remote_chain_id,
            config.chain_id
        );
    }
    tracing::info!("[STARTUP] market={} user={:#x}", deployment.name, user);

    if args.fund || config.fund_wallet {
        fund_wallet(&provider, user, FORK_FUNDING_WEI).await?;
    }

    let math = BorrowMath::default();
    let converter = CurrencyConverter::default();
    let snapshot = MarketSnapshot::read(&provider, deployment, user).await?;
    let inputs = BorrowInputs {
        chosen_ltv: config.chosen_ltv.clone(),
        chosen_collateral: config.chosen_collateral.clone(),
    };
    let dashboard = BorrowDashboard::compute(&math, &converter, &snapshot, &inputs)?;
    println!("{}", serde_json::to_string_pretty(&dashboard)?);

    if !dashboard.within_ltv {
        return Err(anyhow!(
            "chosen LTV {} exceeds the market max LTV {}",
            to_fixed_string(&config.chosen_ltv),
            to_fixed_string(&dashboard.max_ltv)
        ));
    }
    if args.dry_run {
        tracing::info!("[STARTUP] dry run; no transactions sent");
        return Ok(());
    }

    let collateral_amount = converter.to_on_chain_amount(&config.chosen_collateral)?;
    if snapshot.collateral_balance < collateral_amount {
        return Err(anyhow!(
            "collateral balance {} is below the chosen deposit {}",
            snapshot.collateral_balance,
            collateral_amount
        ));
    }
    match ensure_allowance(&provider, deployment, user, collateral_amount).await? {
        AllowanceOutcome::AlreadySufficient { allowance } => {
            tracing::info!("[ALLOWANCE] existing allowance {} is enough", allowance)
        }
        AllowanceOutcome::Approved { before, after } => {
            tracing::info!("[ALLOWANCE] raised {} -> {}", before, after)
        }
    }

    let approval = sign_master_contract_approval(&provider, &signer, deployment).await?;
    let borrow_qty = dashboard
        .max_borrowable
        .with_scale_round(i64::from(TOKEN_DECIMALS), RoundingMode::Down);
    let prepared = prepare_borrow_cook(
        &provider,
        deployment,
        &converter,
        user,
        &approval,
        &config.chosen_collateral,
        &borrow_qty,
    )
    .await?;
    tracing::info!(
        "[COOK] collateral amount={} share={} borrow amount={} share={}",
        prepared.collateral_amount,
        prepared.collateral_share,
        prepared.borrow_amount,
        prepared.borrow_share
    );

    let balance_before = snapshot.borrow_token_balance;
    submit_cook(&provider, deployment, user, prepared.batch).await?;

    let balance_after = token_balance(&provider, deployment.borrow_token, user).await?;
    let received = converter.to_decimal(balance_after.saturating_sub(balance_before));
    tracing::info!(
        "[COOK] borrow token balance {} -> {} (received {})",
        balance_before,
        balance_after,
        to_fixed_string(&received)
    );
    Ok(())
}
