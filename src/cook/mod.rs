//! Cook batch construction.
//!
//! A cook is one `cook(actions, values, datas)` call that the Cauldron executes step by
//! step. Only the five actions needed to open a borrow position are modelled.

pub mod params;

use crate::approval::SplitSignature;
use crate::contracts::ICauldron;
use crate::error::EncodeError;
use alloy::primitives::{Address, Bytes, I256, U256};
use alloy::sol_types::SolType;
use params::{
    AddCollateralParams, BentoDepositParams, BentoWithdrawParams, BorrowParams, SetApprovalParams,
};

/// Cauldron action ids understood by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CookOpcode {
    Borrow = 5,
    AddCollateral = 10,
    BentoDeposit = 20,
    BentoWithdraw = 21,
    BentoSetApproval = 24,
}

impl CookOpcode {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Borrow => "borrow",
            Self::AddCollateral => "add_collateral",
            Self::BentoDeposit => "bento_deposit",
            Self::BentoWithdraw => "bento_withdraw",
            Self::BentoSetApproval => "bento_set_approval",
        }
    }

    /// Position in a borrow cook. Actions must appear in non-decreasing stage order.
    pub const fn stage(self) -> u8 {
        match self {
            Self::BentoSetApproval => 0,
            Self::BentoDeposit => 1,
            Self::AddCollateral => 2,
            Self::Borrow => 3,
            Self::BentoWithdraw => 4,
        }
    }
}

impl TryFrom<u8> for CookOpcode {
    type Error = EncodeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            5 => Ok(Self::Borrow),
            10 => Ok(Self::AddCollateral),
            20 => Ok(Self::BentoDeposit),
            21 => Ok(Self::BentoWithdraw),
            24 => Ok(Self::BentoSetApproval),
            other => Err(EncodeError::UnknownOpcode(other)),
        }
    }
}

/// One typed cook step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookAction {
    SetApproval(SetApprovalParams),
    DepositCollateral(BentoDepositParams),
    AddCollateral(AddCollateralParams),
    Borrow(BorrowParams),
    Withdraw(BentoWithdrawParams),
}

fn to_int256(field: &str, value: U256) -> Result<I256, EncodeError> {
    I256::try_from(value).map_err(|_| EncodeError::IntOutOfRange(format!("{field}={value}")))
}

impl CookAction {
    /// Approve `master_contract` for `user` on BentoBox with an off-chain signature.
    pub fn set_approval(user: Address, master_contract: Address, signature: &SplitSignature) -> Self {
        Self::SetApproval(SetApprovalParams {
            user,
            masterContract: master_contract,
            approved: true,
            v: signature.v,
            r: signature.r,
            s: signature.s,
        })
    }

    /// Deposit `amount` of `token` into BentoBox for `to`.
    pub fn deposit_collateral(
        token: Address,
        to: Address,
        amount: U256,
        share: U256,
    ) -> Result<Self, EncodeError> {
        Ok(Self::DepositCollateral(BentoDepositParams {
            token,
            to,
            amount: to_int256("amount", amount)?,
            share: to_int256("share", share)?,
        }))
    }

    /// Move `share` already sitting in BentoBox into the Cauldron as collateral.
    pub fn add_collateral(share: U256, to: Address) -> Result<Self, EncodeError> {
        Ok(Self::AddCollateral(AddCollateralParams {
            share: to_int256("share", share)?,
            to,
            skim: false,
        }))
    }

    pub fn borrow(amount: U256, to: Address) -> Result<Self, EncodeError> {
        Ok(Self::Borrow(BorrowParams {
            amount: to_int256("amount", amount)?,
            to,
        }))
    }

    /// Withdraw the borrowed `token` out of BentoBox to `to`.
    pub fn withdraw(
        token: Address,
        to: Address,
        amount: U256,
        share: U256,
    ) -> Result<Self, EncodeError> {
        Ok(Self::Withdraw(BentoWithdrawParams {
            token,
            to,
            amount: to_int256("amount", amount)?,
            share: to_int256("share", share)?,
        }))
    }

    pub fn opcode(&self) -> CookOpcode {
        match self {
            Self::SetApproval(_) => CookOpcode::BentoSetApproval,
            Self::DepositCollateral(_) => CookOpcode::BentoDeposit,
            Self::AddCollateral(_) => CookOpcode::AddCollateral,
            Self::Borrow(_) => CookOpcode::Borrow,
            Self::Withdraw(_) => CookOpcode::BentoWithdraw,
        }
    }

    pub fn encode(&self) -> CookInstruction {
        let data = match self {
            Self::SetApproval(p) => SetApprovalParams::abi_encode(p),
            Self::DepositCollateral(p) => BentoDepositParams::abi_encode(p),
            Self::AddCollateral(p) => AddCollateralParams::abi_encode(p),
            Self::Borrow(p) => BorrowParams::abi_encode(p),
            Self::Withdraw(p) => BentoWithdrawParams::abi_encode(p),
        };
        CookInstruction {
            opcode: self.opcode(),
            value: U256::ZERO,
            data: Bytes::from(data),
        }
    }
}

/// Encoded cook step: `{action id, msg.value share, payload}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookInstruction {
    pub opcode: CookOpcode,
    pub value: U256,
    pub data: Bytes,
}

impl CookInstruction {
    /// Decode the payload back into its typed action. Dirty address padding and
    /// non-boolean words are rejected.
    pub fn decode(&self) -> Result<CookAction, EncodeError> {
        let data = self.data.as_ref();
        let action = match self.opcode {
            CookOpcode::BentoSetApproval => {
                CookAction::SetApproval(SetApprovalParams::abi_decode(data, true)?)
            }
            CookOpcode::BentoDeposit => {
                CookAction::DepositCollateral(BentoDepositParams::abi_decode(data, true)?)
            }
            CookOpcode::AddCollateral => {
                CookAction::AddCollateral(AddCollateralParams::abi_decode(data, true)?)
            }
            CookOpcode::Borrow => CookAction::Borrow(BorrowParams::abi_decode(data, true)?),
            CookOpcode::BentoWithdraw => {
                CookAction::Withdraw(BentoWithdrawParams::abi_decode(data, true)?)
            }
        };
        Ok(action)
    }
}

/// Ordered list of cook steps submitted atomically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookBatch {
    instructions: Vec<CookInstruction>,
}

impl CookBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `action`, rejecting it when it would run before an already queued stage.
    pub fn push(&mut self, action: CookAction) -> Result<&mut Self, EncodeError> {
        let next = action.opcode();
        if let Some(last) = self.instructions.last() {
            if next.stage() < last.opcode.stage() {
                return Err(EncodeError::OutOfOrder {
                    last: last.opcode.name(),
                    next: next.name(),
                });
            }
        }
        self.instructions.push(action.encode());
        Ok(self)
    }

    pub fn instructions(&self) -> &[CookInstruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn actions(&self) -> Vec<u8> {
        self.instructions.iter().map(|i| i.opcode.code()).collect()
    }

    pub fn values(&self) -> Vec<U256> {
        self.instructions.iter().map(|i| i.value).collect()
    }

    pub fn datas(&self) -> Vec<Bytes> {
        self.instructions.iter().map(|i| i.data.clone()).collect()
    }

    pub fn into_call(self) -> ICauldron::cookCall {
        ICauldron::cookCall {
            actions: self.actions(),
            values: self.values(),
            datas: self.datas(),
        }
    }
}
