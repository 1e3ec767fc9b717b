//! Error handling for the engine

use thiserror::Error;

use crate::shared::types::TokenId;

/// Engine-level errors.
///
/// Every variant aborts the whole in-flight call; staged holdings are
/// returned to the caller before the error propagates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient allowance for {token}: need {needed}, approved {approved}")]
    InsufficientAllowance {
        token: TokenId,
        needed: u64,
        approved: u64,
    },

    #[error("Insufficient liquidity on venue {venue} for {token_in} -> {token_out}")]
    InsufficientLiquidity {
        venue: String,
        token_in: TokenId,
        token_out: TokenId,
    },

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Unknown venue: {0}")]
    UnknownVenue(String),

    #[error("Swap returned zero output on venue {venue}")]
    SwapFailed { venue: String },

    #[error("Return {amount} below floor {floor} after hop {hop}")]
    InsufficientReturn { hop: usize, amount: u64, floor: u64 },

    #[error("Profit threshold not met: final {final_amount}, required above {required}")]
    ProfitThresholdNotMet { final_amount: u64, required: u64 },

    #[error("Guard rejected token {0}")]
    GuardRejected(TokenId),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Reentrancy detected")]
    ReentrancyDetected,
}
