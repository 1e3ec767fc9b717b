//! Aggregate-liquidity venue simulation

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::venue::{LiquiditySnapshot, VenueAdapter, VenueKind};
use crate::shared::errors::EngineError;
use crate::shared::types::TokenId;

struct ClmmPool {
    liquidity: u64,
    rate_num: u64,
    rate_den: u64,
}

/// Concentrated-liquidity-style venue exposing a single liquidity figure
/// per directional pair and quoting at a fixed rate.
///
/// Output is capped by the pool's remaining liquidity; a fill that would
/// exceed it consumes nothing and returns 0.
pub struct ClmmVenue {
    pools: RwLock<HashMap<(TokenId, TokenId), ClmmPool>>,
}

impl ClmmVenue {
    pub fn new() -> Self {
        Self {
            pools: RwLock::new(HashMap::new()),
        }
    }

    pub async fn add_pool(
        &self,
        token_in: TokenId,
        token_out: TokenId,
        liquidity: u64,
        rate_num: u64,
        rate_den: u64,
    ) {
        self.pools.write().await.insert(
            (token_in, token_out),
            ClmmPool {
                liquidity,
                rate_num,
                rate_den,
            },
        );
    }

    pub async fn liquidity(&self, token_in: &TokenId, token_out: &TokenId) -> u64 {
        let pools = self.pools.read().await;
        pools
            .get(&(token_in.clone(), token_out.clone()))
            .map(|pool| pool.liquidity)
            .unwrap_or(0)
    }
}

impl Default for ClmmVenue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VenueAdapter for ClmmVenue {
    fn kind(&self) -> VenueKind {
        VenueKind::AggregateLiquidity
    }

    async fn probe_liquidity(
        &self,
        token_in: &TokenId,
        token_out: &TokenId,
    ) -> Result<LiquiditySnapshot, EngineError> {
        Ok(LiquiditySnapshot::Aggregate {
            liquidity: self.liquidity(token_in, token_out).await,
        })
    }

    async fn swap(
        &self,
        token_in: &TokenId,
        token_out: &TokenId,
        amount_in: u64,
        min_amount_out: u64,
    ) -> Result<u64, EngineError> {
        let mut pools = self.pools.write().await;
        let pool = match pools.get_mut(&(token_in.clone(), token_out.clone())) {
            Some(pool) => pool,
            None => return Ok(0),
        };
        if pool.rate_den == 0 {
            return Ok(0);
        }

        let amount_out =
            (amount_in as u128 * pool.rate_num as u128 / pool.rate_den as u128) as u64;
        if amount_out == 0 || amount_out < min_amount_out || amount_out > pool.liquidity {
            debug!(
                token_in = %token_in,
                token_out = %token_out,
                amount_in,
                amount_out,
                min_amount_out,
                liquidity = pool.liquidity,
                "clmm swap not filled"
            );
            return Ok(0);
        }

        pool.liquidity -= amount_out;
        Ok(amount_out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn y() -> TokenId {
        TokenId::from("Y")
    }

    fn z() -> TokenId {
        TokenId::from("Z")
    }

    #[tokio::test]
    async fn test_fixed_rate_quote_and_drawdown() {
        let venue = ClmmVenue::new();
        // 1.04 rate
        venue.add_pool(y(), z(), 1_000_000, 104, 100).await;

        let out = venue.swap(&y(), &z(), 1000, 0).await.unwrap();
        assert_eq!(out, 1040);
        assert_eq!(venue.liquidity(&y(), &z()).await, 998_960);
    }

    #[tokio::test]
    async fn test_fill_beyond_liquidity_returns_zero() {
        let venue = ClmmVenue::new();
        venue.add_pool(y(), z(), 500, 1, 1).await;

        let out = venue.swap(&y(), &z(), 1000, 0).await.unwrap();
        assert_eq!(out, 0);
        assert_eq!(venue.liquidity(&y(), &z()).await, 500);
    }

    #[tokio::test]
    async fn test_probe_reports_aggregate_liquidity() {
        let venue = ClmmVenue::new();
        venue.add_pool(y(), z(), 42, 1, 1).await;

        let snapshot = venue.probe_liquidity(&y(), &z()).await.unwrap();
        assert_eq!(snapshot, LiquiditySnapshot::Aggregate { liquidity: 42 });

        let missing = venue.probe_liquidity(&z(), &y()).await.unwrap();
        assert_eq!(missing, LiquiditySnapshot::Aggregate { liquidity: 0 });
    }

    #[tokio::test]
    async fn test_missed_min_out_consumes_nothing() {
        let venue = ClmmVenue::new();
        venue.add_pool(y(), z(), 1_000_000, 1, 1).await;

        let out = venue.swap(&y(), &z(), 1000, 2000).await.unwrap();
        assert_eq!(out, 0);
        assert_eq!(venue.liquidity(&y(), &z()).await, 1_000_000);
    }
}
