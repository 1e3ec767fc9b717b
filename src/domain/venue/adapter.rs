//! Venue adapter trait

use async_trait::async_trait;

use crate::shared::errors::EngineError;
use crate::shared::types::TokenId;

use super::{LiquiditySnapshot, VenueKind};

/// Common interface for all venue implementations
#[async_trait]
pub trait VenueAdapter: Send + Sync {
    /// The liquidity model this venue exposes
    fn kind(&self) -> VenueKind;

    /// Read-only probe of the venue's tradable liquidity for a pair
    async fn probe_liquidity(
        &self,
        token_in: &TokenId,
        token_out: &TokenId,
    ) -> Result<LiquiditySnapshot, EngineError>;

    /// Execute a single swap and return the received amount.
    ///
    /// A venue that cannot satisfy `min_amount_out` consumes nothing and
    /// returns 0.
    async fn swap(
        &self,
        token_in: &TokenId,
        token_out: &TokenId,
        amount_in: u64,
        min_amount_out: u64,
    ) -> Result<u64, EngineError>;
}
