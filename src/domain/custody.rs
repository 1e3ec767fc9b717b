//! Token custody boundary

use async_trait::async_trait;

use crate::shared::errors::EngineError;
use crate::shared::types::{AccountId, TokenId};

/// Custody/transfer primitive the engine stages funds through.
///
/// Funds pulled into custody belong to the in-flight run until the engine
/// pushes them back out; no other run may observe or touch them.
#[async_trait]
pub trait TokenCustody: Send + Sync {
    /// Current approved allowance of `owner` for the engine
    async fn allowance(&self, owner: &AccountId, token: &TokenId) -> u64;

    /// Pull `amount` of `token` from `owner` into engine custody.
    /// Requires an approved allowance of at least `amount`.
    async fn pull(
        &self,
        owner: &AccountId,
        token: &TokenId,
        amount: u64,
    ) -> Result<(), EngineError>;

    /// Push `amount` of `token` from engine custody back to `owner`
    async fn push(
        &self,
        owner: &AccountId,
        token: &TokenId,
        amount: u64,
    ) -> Result<(), EngineError>;
}
