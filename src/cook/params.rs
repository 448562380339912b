//! Payload schemas of the supported cook actions.
//!
//! Each payload is the plain ABI encoding of a static tuple (no offset word), matching
//! what the Cauldron decodes with `abi.decode(datas[i], (...))`.

alloy::sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct SetApprovalParams {
        address user;
        address masterContract;
        bool approved;
        uint8 v;
        bytes32 r;
        bytes32 s;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct BentoDepositParams {
        address token;
        address to;
        int256 amount;
        int256 share;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct AddCollateralParams {
        int256 share;
        address to;
        bool skim;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct BorrowParams {
        int256 amount;
        address to;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct BentoWithdrawParams {
        address token;
        address to;
        int256 amount;
        int256 share;
    }
}
