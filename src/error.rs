use thiserror::Error;

pub type Result<T> = std::result::Result<T, CookError>;

#[derive(Debug, Error)]
pub enum CookError {
    #[error("math error: {0}")]
    Math(#[from] MathError),
    #[error("encoding error: {0}")]
    Encode(#[from] EncodeError),
    #[error("signature error: {0}")]
    Signature(#[from] SignatureError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum MathError {
    #[error("division by zero in {0}")]
    DivisionByZero(&'static str),
    #[error("decimal range exceeded: {0}")]
    Overflow(String),
    #[error("negative amount cannot be sent on-chain: {0}")]
    NegativeAmount(String),
    #[error("amount has a fractional wei component: {0}")]
    FractionalWei(String),
    #[error("invalid precision: {0} significant digits")]
    InvalidPrecision(u64),
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("abi codec failure: {0}")]
    Abi(#[from] alloy::sol_types::Error),
    #[error("value does not fit in int256: {0}")]
    IntOutOfRange(String),
    #[error("unknown cook opcode {0}")]
    UnknownOpcode(u8),
    #[error("cook action {next} cannot follow {last}")]
    OutOfOrder { last: &'static str, next: &'static str },
}

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("signature must be 65 bytes, got {0}")]
    Length(usize),
    #[error("invalid recovery id v={0}")]
    RecoveryId(u8),
    #[error("signer recovery failed: {0}")]
    Recovery(String),
    #[error("signing failed: {0}")]
    Signing(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    Missing(String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
