//! Constant-product pair-reserve venue simulation

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::venue::{LiquiditySnapshot, VenueAdapter, VenueKind};
use crate::shared::errors::EngineError;
use crate::shared::types::TokenId;

struct CpmmPool {
    token_a: TokenId,
    token_b: TokenId,
    reserve_a: u64,
    reserve_b: u64,
}

/// x * y = k venue over two-sided reserve pools.
///
/// Swaps are atomic: a missed `min_amount_out` consumes nothing and
/// returns 0.
pub struct CpmmVenue {
    fee_bps: u32,
    pools: RwLock<HashMap<(TokenId, TokenId), CpmmPool>>,
}

fn pair_key(a: &TokenId, b: &TokenId) -> (TokenId, TokenId) {
    if a.0 <= b.0 {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

fn constant_product_quote(reserve_in: u64, reserve_out: u64, amount_in: u64, fee_bps: u32) -> u64 {
    let amount_in_with_fee = amount_in as u128 * (10_000 - fee_bps) as u128 / 10_000;
    let denominator = reserve_in as u128 + amount_in_with_fee;
    if denominator == 0 {
        return 0;
    }
    (reserve_out as u128 * amount_in_with_fee / denominator) as u64
}

impl CpmmVenue {
    pub fn new(fee_bps: u32) -> Self {
        Self {
            fee_bps,
            pools: RwLock::new(HashMap::new()),
        }
    }

    pub async fn add_pool(
        &self,
        token_a: TokenId,
        token_b: TokenId,
        reserve_a: u64,
        reserve_b: u64,
    ) {
        let key = pair_key(&token_a, &token_b);
        self.pools.write().await.insert(
            key,
            CpmmPool {
                token_a,
                token_b,
                reserve_a,
                reserve_b,
            },
        );
    }

    pub async fn reserves(&self, token_a: &TokenId, token_b: &TokenId) -> Option<(u64, u64)> {
        let pools = self.pools.read().await;
        pools.get(&pair_key(token_a, token_b)).map(|pool| {
            if pool.token_a == *token_a {
                (pool.reserve_a, pool.reserve_b)
            } else {
                (pool.reserve_b, pool.reserve_a)
            }
        })
    }
}

#[async_trait]
impl VenueAdapter for CpmmVenue {
    fn kind(&self) -> VenueKind {
        VenueKind::PairReserves
    }

    async fn probe_liquidity(
        &self,
        token_in: &TokenId,
        token_out: &TokenId,
    ) -> Result<LiquiditySnapshot, EngineError> {
        // An unknown pair reads as empty reserves; the validator rejects it.
        let (reserve_in, reserve_out) = self.reserves(token_in, token_out).await.unwrap_or((0, 0));
        Ok(LiquiditySnapshot::PairReserves {
            reserve_in,
            reserve_out,
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
        let pool = match pools.get_mut(&pair_key(token_in, token_out)) {
            Some(pool) => pool,
            None => return Ok(0),
        };

        let (reserve_in, reserve_out) = if pool.token_a == *token_in {
            (pool.reserve_a, pool.reserve_b)
        } else {
            (pool.reserve_b, pool.reserve_a)
        };

        let amount_out = constant_product_quote(reserve_in, reserve_out, amount_in, self.fee_bps);
        if amount_out == 0 || amount_out < min_amount_out {
            debug!(
                token_in = %token_in,
                token_out = %token_out,
                amount_in,
                amount_out,
                min_amount_out,
                "cpmm swap not filled"
            );
            return Ok(0);
        }

        let new_reserve_in = reserve_in
            .checked_add(amount_in)
            .ok_or(EngineError::ArithmeticOverflow)?;
        let new_reserve_out = reserve_out - amount_out;
        if pool.token_a == *token_in {
            pool.reserve_a = new_reserve_in;
            pool.reserve_b = new_reserve_out;
        } else {
            pool.reserve_b = new_reserve_in;
            pool.reserve_a = new_reserve_out;
        }

        Ok(amount_out)
    }
}
