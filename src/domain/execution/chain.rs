//! Chain execution - drives an ordered sequence of hops

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::custody::TokenCustody;
use crate::domain::guard::TokenGuard;
use crate::domain::settlement::SettlementDispatcher;
use crate::domain::venue::VenueRegistry;
use crate::report::{HopRecord, RunReport};
use crate::shared::errors::EngineError;
use crate::shared::types::{AccountId, ChainLabel, EngineParameters};

use super::{ChainRequest, HopExecutor, HopRequest, StagedFunds};

/// Where a committed run's final output goes
enum Payout {
    Caller,
    Settlement(ChainLabel),
}

/// Drives hops strictly sequentially in array order; each hop's output is
/// a hard dependency of the next hop's input.
///
/// The executor is transactional: intermediate outputs stay staged in
/// engine custody, the caller is paid only after the final profit check,
/// and any failure unwinds the staged holdings back to the caller.
pub struct ChainExecutor {
    registry: Arc<VenueRegistry>,
    custody: Arc<dyn TokenCustody>,
    dispatcher: Option<Arc<dyn SettlementDispatcher>>,
    params: RwLock<EngineParameters>,
    run_lock: Mutex<()>,
    next_run_id: AtomicU64,
    hops: HopExecutor,
}

impl ChainExecutor {
    pub fn new(
        registry: Arc<VenueRegistry>,
        custody: Arc<dyn TokenCustody>,
        params: EngineParameters,
    ) -> Self {
        let hops = HopExecutor::new(Arc::clone(&registry), Arc::clone(&custody));
        Self {
            registry,
            custody,
            dispatcher: None,
            params: RwLock::new(params),
            run_lock: Mutex::new(()),
            next_run_id: AtomicU64::new(0),
            hops,
        }
    }

    pub fn with_guard(mut self, guard: Arc<dyn TokenGuard>) -> Self {
        self.hops = HopExecutor::new(Arc::clone(&self.registry), Arc::clone(&self.custody))
            .with_guard(guard);
        self
    }

    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn SettlementDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Current parameters, as the next run would snapshot them
    pub async fn parameters(&self) -> EngineParameters {
        self.params.read().await.clone()
    }

    /// Replace the process-wide parameters.
    ///
    /// Waits for any in-flight run to finish; updates and runs are mutually
    /// exclusive at the granularity of the whole call.
    pub async fn update_parameters(&self, params: EngineParameters) -> Result<(), EngineError> {
        params.validate()?;
        let _permit = self.run_lock.lock().await;
        *self.params.write().await = params;
        info!("engine parameters updated");
        Ok(())
    }

    /// Execute a chain and pay the final amount out to the caller
    pub async fn execute_chain(
        &self,
        caller: &AccountId,
        request: ChainRequest,
    ) -> Result<RunReport, EngineError> {
        self.execute(caller, request, Payout::Caller).await
    }

    /// Execute a chain and hand the final amount to the settlement
    /// dispatcher for the given destination chain
    pub async fn execute_chain_with_settlement(
        &self,
        caller: &AccountId,
        request: ChainRequest,
        destination: ChainLabel,
    ) -> Result<RunReport, EngineError> {
        if self.dispatcher.is_none() {
            return Err(EngineError::InvalidInput(
                "no settlement dispatcher configured".to_string(),
            ));
        }
        self.execute(caller, request, Payout::Settlement(destination))
            .await
    }

    async fn execute(
        &self,
        caller: &AccountId,
        request: ChainRequest,
        payout: Payout,
    ) -> Result<RunReport, EngineError> {
        // One in-flight run per engine; nested re-entry from a venue or
        // guard callback lands here and is rejected.
        let _permit = self
            .run_lock
            .try_lock()
            .map_err(|_| EngineError::ReentrancyDetected)?;

        // Snapshot once; hops never observe a mid-run parameter change.
        let params = self.params.read().await.clone();
        request.validate(&params)?;
        let required_return = Self::required_return(request.amount_in, &params)?;

        let run_id = self.next_run_id.fetch_add(1, Ordering::SeqCst);
        let started_at = Utc::now();
        info!(
            run_id,
            route = %request.route_label(),
            amount_in = request.amount_in,
            "run accepted"
        );

        let mut records = Vec::with_capacity(request.venues.len());
        let mut staged: Option<StagedFunds> = None;
        let final_funds = match self
            .drive(caller, &request, required_return, &mut records, &mut staged)
            .await
        {
            Ok(funds) => funds,
            Err(err) => {
                self.unwind(caller, run_id, staged.take(), &err).await;
                return Err(err);
            }
        };

        // Commit: the caller (or the bridge) sees funds only from here on.
        let settled_to = match payout {
            Payout::Caller => {
                self.custody
                    .push(caller, &final_funds.token, final_funds.amount)
                    .await?;
                None
            }
            Payout::Settlement(destination) => {
                if let Some(dispatcher) = &self.dispatcher {
                    dispatcher
                        .transfer(&final_funds.token, caller, final_funds.amount, &destination)
                        .await;
                }
                Some(destination)
            }
        };

        let report = RunReport {
            run_id,
            route: request.route_label(),
            tokens: request.tokens,
            venues: request.venues,
            amount_in: request.amount_in,
            final_amount: final_funds.amount,
            gross_profit: final_funds.amount.saturating_sub(request.amount_in),
            required_return,
            settled_to,
            hops: records,
            started_at,
            finished_at: Utc::now(),
        };
        info!(
            run_id,
            final_amount = report.final_amount,
            profit = report.gross_profit,
            "run completed"
        );
        Ok(report)
    }

    async fn drive(
        &self,
        caller: &AccountId,
        request: &ChainRequest,
        required_return: u64,
        records: &mut Vec<HopRecord>,
        staged: &mut Option<StagedFunds>,
    ) -> Result<StagedFunds, EngineError> {
        let mut current = request.amount_in;

        for i in 0..request.venues.len() {
            let hop_request = HopRequest {
                index: i,
                venue: request.venues[i].clone(),
                token_in: request.tokens[i].clone(),
                token_out: request.tokens[i + 1].clone(),
                amount_in: current,
                slippage_pct: request.slippage_pct[i],
                pull_from_caller: i == 0,
            };
            let result = self.hops.execute(caller, &hop_request, staged).await?;
            current = result.amount_out;
            records.push(HopRecord {
                id: Uuid::new_v4(),
                index: i,
                venue: result.venue,
                token_in: result.token_in,
                token_out: result.token_out,
                amount_in: result.amount_in,
                amount_out: result.amount_out,
            });

            if current < request.min_return_floor {
                return Err(EngineError::InsufficientReturn {
                    hop: i,
                    amount: current,
                    floor: request.min_return_floor,
                });
            }
        }

        if current <= required_return {
            return Err(EngineError::ProfitThresholdNotMet {
                final_amount: current,
                required: required_return,
            });
        }

        match staged.take() {
            Some(funds) => Ok(funds),
            None => Err(EngineError::InvalidInput(
                "run finished with no staged funds".to_string(),
            )),
        }
    }

    /// `amount * (100 + fee) / 100 + min_profit_threshold`, checked
    fn required_return(amount_in: u64, params: &EngineParameters) -> Result<u64, EngineError> {
        let scaled = amount_in
            .checked_mul(100 + params.fee_percent)
            .ok_or(EngineError::ArithmeticOverflow)?;
        (scaled / 100)
            .checked_add(params.min_profit_threshold)
            .ok_or(EngineError::ArithmeticOverflow)
    }

    async fn unwind(
        &self,
        caller: &AccountId,
        run_id: u64,
        staged: Option<StagedFunds>,
        err: &EngineError,
    ) {
        warn!(run_id, error = %err, "run aborted");
        if let Some(funds) = staged {
            // Executed swaps are not reversible; the staged transfer is.
            match self.custody.push(caller, &funds.token, funds.amount).await {
                Ok(()) => info!(
                    run_id,
                    token = %funds.token,
                    amount = funds.amount,
                    "staged funds returned to caller"
                ),
                Err(push_err) => error!(
                    run_id,
                    error = %push_err,
                    "failed to return staged funds"
                ),
            }
        }
    }
}
