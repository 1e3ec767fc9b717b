//! Hop execution - the atomic unit of a chain

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::custody::TokenCustody;
use crate::domain::guard::TokenGuard;
use crate::domain::venue::{VenueId, VenueRegistry};
use crate::shared::errors::EngineError;
use crate::shared::types::{AccountId, TokenId};

use super::{HopResult, ReserveValidator, SlippageGuard, StagedFunds};

/// Per-hop state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HopState {
    Pending,
    FundsLocked,
    VenueInvoked,
    Settled,
    RolledBack,
}

/// A single hop of a chain
#[derive(Debug, Clone)]
pub struct HopRequest {
    pub index: usize,
    pub venue: VenueId,
    pub token_in: TokenId,
    pub token_out: TokenId,
    pub amount_in: u64,
    pub slippage_pct: u8,
    /// First hop pulls from the caller; later hops consume the staged
    /// output of the previous hop
    pub pull_from_caller: bool,
}

/// Executes one hop: secures the input, validates reserves, invokes the
/// venue and validates the received amount.
///
/// Failures leave `staged` describing the funds still held for the run;
/// the chain executor unwinds them to the caller.
pub struct HopExecutor {
    registry: Arc<VenueRegistry>,
    custody: Arc<dyn TokenCustody>,
    guard: Option<Arc<dyn TokenGuard>>,
}

impl HopExecutor {
    pub fn new(registry: Arc<VenueRegistry>, custody: Arc<dyn TokenCustody>) -> Self {
        Self {
            registry,
            custody,
            guard: None,
        }
    }

    pub fn with_guard(mut self, guard: Arc<dyn TokenGuard>) -> Self {
        self.guard = Some(guard);
        self
    }

    pub async fn execute(
        &self,
        caller: &AccountId,
        request: &HopRequest,
        staged: &mut Option<StagedFunds>,
    ) -> Result<HopResult, EngineError> {
        let mut state = HopState::Pending;
        debug!(hop = request.index, venue = %request.venue, state = ?state, "hop accepted");

        if request.pull_from_caller {
            // The hop never starts without a sufficient pre-approved allowance.
            let approved = self.custody.allowance(caller, &request.token_in).await;
            if approved < request.amount_in {
                return Err(EngineError::InsufficientAllowance {
                    token: request.token_in.clone(),
                    needed: request.amount_in,
                    approved,
                });
            }
            self.custody
                .pull(caller, &request.token_in, request.amount_in)
                .await?;
            *staged = Some(StagedFunds {
                token: request.token_in.clone(),
                amount: request.amount_in,
            });
        } else {
            // The input must be exactly the staged output of the previous hop.
            match staged {
                Some(funds)
                    if funds.token == request.token_in && funds.amount == request.amount_in => {}
                _ => {
                    return Err(EngineError::InvalidInput(format!(
                        "hop {} input does not match staged funds",
                        request.index
                    )))
                }
            }
        }
        state = HopState::FundsLocked;
        debug!(hop = request.index, state = ?state, "input secured");

        let venue = self.registry.resolve(&request.venue)?;
        if request.slippage_pct > venue.info.max_slippage_pct {
            return Err(EngineError::InvalidInput(format!(
                "slippage {} above venue {} ceiling {}",
                request.slippage_pct, venue.info.id, venue.info.max_slippage_pct
            )));
        }

        let snapshot =
            ReserveValidator::validate(venue, &request.token_in, &request.token_out).await?;
        debug!(hop = request.index, venue = %venue.info.id, snapshot = ?snapshot, "liquidity validated");

        let min_out = SlippageGuard::min_out(request.amount_in, request.slippage_pct)?;

        state = HopState::VenueInvoked;
        debug!(hop = request.index, state = ?state, min_out, "dispatching to venue");
        let amount_out = venue
            .adapter
            .swap(
                &request.token_in,
                &request.token_out,
                request.amount_in,
                min_out,
            )
            .await?;

        if amount_out == 0 {
            state = HopState::RolledBack;
            debug!(hop = request.index, state = ?state, "venue returned zero output");
            return Err(EngineError::SwapFailed {
                venue: venue.info.id.to_string(),
            });
        }

        // Holdings switch to the output token before the guard runs, so an
        // abort from here on unwinds the output side.
        *staged = Some(StagedFunds {
            token: request.token_out.clone(),
            amount: amount_out,
        });

        if let Some(guard) = &self.guard {
            if guard.is_unsafe(&request.token_out).await {
                return Err(EngineError::GuardRejected(request.token_out.clone()));
            }
        }

        state = HopState::Settled;
        info!(
            hop = request.index,
            venue = %venue.info.id,
            token_in = %request.token_in,
            token_out = %request.token_out,
            amount_in = request.amount_in,
            amount_out,
            state = ?state,
            "hop settled"
        );

        Ok(HopResult {
            venue: venue.info.id.clone(),
            token_in: request.token_in.clone(),
            token_out: request.token_out.clone(),
            amount_in: request.amount_in,
            amount_out,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::venue::{LiquiditySnapshot, VenueAdapter, VenueInfo, VenueKind};
    use crate::infrastructure::custody::LedgerCustody;
    use async_trait::async_trait;

    struct FixedQuoteAdapter {
        quote: u64,
        reserve_out: u64,
    }

    #[async_trait]
    impl VenueAdapter for FixedQuoteAdapter {
        fn kind(&self) -> VenueKind {
            VenueKind::PairReserves
        }

        async fn probe_liquidity(
            &self,
            _token_in: &TokenId,
            _token_out: &TokenId,
        ) -> Result<LiquiditySnapshot, EngineError> {
            Ok(LiquiditySnapshot::PairReserves {
                reserve_in: 1_000_000,
                reserve_out: self.reserve_out,
            })
        }

        async fn swap(
            &self,
            _token_in: &TokenId,
            _token_out: &TokenId,
            _amount_in: u64,
            min_amount_out: u64,
        ) -> Result<u64, EngineError> {
            if self.quote < min_amount_out {
                return Ok(0);
            }
            Ok(self.quote)
        }
    }

    fn registry(quote: u64, reserve_out: u64, max_slippage_pct: u8) -> Arc<VenueRegistry> {
        let mut registry = VenueRegistry::new();
        registry.register(
            VenueInfo {
                id: VenueId::from("v1"),
                name: "venue one".to_string(),
                kind: VenueKind::PairReserves,
                max_slippage_pct,
                is_active: true,
            },
            Arc::new(FixedQuoteAdapter { quote, reserve_out }),
        );
        Arc::new(registry)
    }

    async fn funded_custody(caller: &AccountId, amount: u64) -> Arc<LedgerCustody> {
        let custody = Arc::new(LedgerCustody::new());
        custody.seed_balance(caller, &TokenId::from("X"), amount).await;
        custody.approve(caller, &TokenId::from("X"), amount).await;
        custody
    }

    fn request(amount_in: u64) -> HopRequest {
        HopRequest {
            index: 0,
            venue: VenueId::from("v1"),
            token_in: TokenId::from("X"),
            token_out: TokenId::from("Y"),
            amount_in,
            slippage_pct: 1,
            pull_from_caller: true,
        }
    }

    #[tokio::test]
    async fn test_settled_hop_stages_output() {
        let caller = AccountId::from("alice");
        let custody = funded_custody(&caller, 1000).await;
        let executor = HopExecutor::new(registry(1010, 1_000_000, 100), custody.clone());

        let mut staged = None;
        let result = executor
            .execute(&caller, &request(1000), &mut staged)
            .await
            .unwrap();

        assert_eq!(result.amount_out, 1010);
        assert_eq!(
            staged,
            Some(StagedFunds {
                token: TokenId::from("Y"),
                amount: 1010
            })
        );
        assert_eq!(custody.balance_of(&caller, &TokenId::from("X")).await, 0);
    }

    #[tokio::test]
    async fn test_insufficient_allowance_never_starts() {
        let caller = AccountId::from("alice");
        let custody = Arc::new(LedgerCustody::new());
        custody
            .seed_balance(&caller, &TokenId::from("X"), 1000)
            .await;
        custody.approve(&caller, &TokenId::from("X"), 500).await;
        let executor = HopExecutor::new(registry(1010, 1_000_000, 100), custody.clone());

        let mut staged = None;
        let err = executor
            .execute(&caller, &request(1000), &mut staged)
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::InsufficientAllowance { .. }));
        assert!(staged.is_none());
        assert_eq!(custody.balance_of(&caller, &TokenId::from("X")).await, 1000);
    }

    #[tokio::test]
    async fn test_unknown_venue_is_fatal() {
        let caller = AccountId::from("alice");
        let custody = funded_custody(&caller, 1000).await;
        let executor = HopExecutor::new(registry(1010, 1_000_000, 100), custody);

        let mut staged = None;
        let mut req = request(1000);
        req.venue = VenueId::from("v9");
        let err = executor.execute(&caller, &req, &mut staged).await.unwrap_err();

        assert_eq!(err, EngineError::UnknownVenue("v9".to_string()));
        // Funds were already locked; the chain executor unwinds them.
        assert!(staged.is_some());
    }

    #[tokio::test]
    async fn test_slippage_above_venue_ceiling_rejected() {
        let caller = AccountId::from("alice");
        let custody = funded_custody(&caller, 1000).await;
        let executor = HopExecutor::new(registry(1010, 1_000_000, 2), custody);

        let mut staged = None;
        let mut req = request(1000);
        req.slippage_pct = 5;
        let err = executor.execute(&caller, &req, &mut staged).await.unwrap_err();

        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_zero_output_rolls_back() {
        let caller = AccountId::from("alice");
        let custody = funded_custody(&caller, 1000).await;
        let executor = HopExecutor::new(registry(0, 1_000_000, 100), custody);

        let mut staged = None;
        let err = executor
            .execute(&caller, &request(1000), &mut staged)
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::SwapFailed { .. }));
        // Input side still staged for the chain-level refund.
        assert_eq!(
            staged,
            Some(StagedFunds {
                token: TokenId::from("X"),
                amount: 1000
            })
        );
    }

    #[tokio::test]
    async fn test_guard_rejects_flagged_output() {
        use crate::infrastructure::guard::DenylistGuard;

        let caller = AccountId::from("alice");
        let custody = funded_custody(&caller, 1000).await;
        let guard = Arc::new(DenylistGuard::new());
        guard.deny(TokenId::from("Y")).await;
        let executor =
            HopExecutor::new(registry(1010, 1_000_000, 100), custody).with_guard(guard);

        let mut staged = None;
        let err = executor
            .execute(&caller, &request(1000), &mut staged)
            .await
            .unwrap_err();

        assert_eq!(err, EngineError::GuardRejected(TokenId::from("Y")));
        // The flagged output is what gets unwound.
        assert_eq!(
            staged,
            Some(StagedFunds {
                token: TokenId::from("Y"),
                amount: 1010
            })
        );
    }
}
