//! Cross-chain settlement boundary

use async_trait::async_trait;

use crate::shared::types::{AccountId, ChainLabel, TokenId};

/// Fire-and-forget handoff of a run's final output to a cross-chain
/// transfer mechanism.
///
/// The engine does not wait for bridge-side finality and does not retry;
/// delivery guarantees are the mechanism's own contract.
#[async_trait]
pub trait SettlementDispatcher: Send + Sync {
    async fn transfer(
        &self,
        token: &TokenId,
        recipient: &AccountId,
        amount: u64,
        destination: &ChainLabel,
    );
}
