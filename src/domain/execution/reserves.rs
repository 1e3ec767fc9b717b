//! Reserve and liquidity validation

use crate::domain::venue::{LiquiditySnapshot, RegisteredVenue, VenueKind};
use crate::shared::errors::EngineError;
use crate::shared::types::TokenId;

/// Rejects a hop before any funds are committed when the venue lacks
/// tradable liquidity
pub struct ReserveValidator;

impl ReserveValidator {
    /// Probe the venue for the pair and require strictly positive liquidity.
    ///
    /// Pair-reserve venues are judged on the output-side reserve only, the
    /// side the hop will draw from; aggregate venues on the single figure.
    pub async fn validate(
        venue: &RegisteredVenue,
        token_in: &TokenId,
        token_out: &TokenId,
    ) -> Result<LiquiditySnapshot, EngineError> {
        let snapshot = venue.adapter.probe_liquidity(token_in, token_out).await?;

        let tradable = match (venue.info.kind, &snapshot) {
            (VenueKind::PairReserves, LiquiditySnapshot::PairReserves { reserve_out, .. }) => {
                *reserve_out
            }
            (VenueKind::AggregateLiquidity, LiquiditySnapshot::Aggregate { liquidity }) => {
                *liquidity
            }
            _ => {
                return Err(EngineError::InvalidInput(format!(
                    "venue {} returned a probe not matching its kind",
                    venue.info.id
                )))
            }
        };

        if tradable == 0 {
            return Err(EngineError::InsufficientLiquidity {
                venue: venue.info.id.to_string(),
                token_in: token_in.clone(),
                token_out: token_out.clone(),
            });
        }

        Ok(snapshot)
    }
}
