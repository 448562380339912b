//! Network-facing borrow flow: market reads, the readable dashboard, allowance and
//! approval handling, and cook submission.

pub mod dashboard;
pub mod flow;
pub mod market;

pub use dashboard::{BorrowDashboard, BorrowInputs};
pub use flow::{
    ensure_allowance, fund_wallet, prepare_borrow_cook, sign_master_contract_approval, submit_cook,
    AllowanceOutcome, PreparedCook,
};
pub use market::{token_balance, MarketSnapshot};
