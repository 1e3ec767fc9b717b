//! Application services and use cases

use std::sync::Arc;

use tracing::info;

use crate::domain::execution::{ChainExecutor, ChainRequest};
use crate::domain::venue::VenueId;
use crate::report::RunReport;
use crate::shared::errors::EngineError;
use crate::shared::types::{AccountId, ChainLabel, EngineParameters, TokenId};

/// Caller-facing facade over the chain executor.
///
/// Adds the administrative authorization check on top of the engine's own
/// validation; everything else delegates.
pub struct EngineService {
    executor: Arc<ChainExecutor>,
    admin: AccountId,
}

impl EngineService {
    pub fn new(executor: Arc<ChainExecutor>, admin: AccountId) -> Self {
        Self { executor, admin }
    }

    /// Execute a chain and pay the final amount out to the caller
    pub async fn execute_chain(
        &self,
        caller: &AccountId,
        tokens: Vec<TokenId>,
        venues: Vec<VenueId>,
        amount_in: u64,
        min_return_floor: u64,
        slippage_pct: Vec<u8>,
    ) -> Result<RunReport, EngineError> {
        let request = ChainRequest {
            tokens,
            venues,
            slippage_pct,
            amount_in,
            min_return_floor,
        };
        self.executor.execute_chain(caller, request).await
    }

    /// Execute a chain and hand the final amount to the cross-chain
    /// settlement mechanism, with the caller as recipient.
    ///
    /// Carries no minimum-return floor; only the profit threshold gates
    /// the run.
    pub async fn execute_chain_with_settlement(
        &self,
        caller: &AccountId,
        tokens: Vec<TokenId>,
        venues: Vec<VenueId>,
        amount_in: u64,
        slippage_pct: Vec<u8>,
        destination: ChainLabel,
    ) -> Result<(), EngineError> {
        let request = ChainRequest {
            tokens,
            venues,
            slippage_pct,
            amount_in,
            min_return_floor: 0,
        };
        let report = self
            .executor
            .execute_chain_with_settlement(caller, request, destination)
            .await?;
        info!(run_id = report.run_id, "settlement run completed");
        Ok(())
    }

    /// Replace the process-wide parameters; administrative callers only
    pub async fn update_parameters(
        &self,
        caller: &AccountId,
        params: EngineParameters,
    ) -> Result<(), EngineError> {
        if *caller != self.admin {
            return Err(EngineError::Unauthorized);
        }
        self.executor.update_parameters(params).await
    }

    /// Current parameters, as the next run would snapshot them
    pub async fn parameters(&self) -> EngineParameters {
        self.executor.parameters().await
    }
}
