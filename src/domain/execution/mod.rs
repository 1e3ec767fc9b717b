//! Execution domain - hop and chain execution

mod chain;
mod hop;
mod reserves;
mod slippage;

pub use chain::ChainExecutor;
pub use hop::{HopExecutor, HopRequest, HopState};
pub use reserves::ReserveValidator;
pub use slippage::SlippageGuard;

use serde::{Deserialize, Serialize};

use crate::domain::venue::VenueId;
use crate::shared::errors::EngineError;
use crate::shared::types::{EngineParameters, TokenId};

/// One end-to-end execution request.
///
/// Constructed from caller input at call time, alive for the duration of
/// one run, never persisted beyond the emitted report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainRequest {
    pub tokens: Vec<TokenId>,
    pub venues: Vec<VenueId>,
    pub slippage_pct: Vec<u8>,
    pub amount_in: u64,
    pub min_return_floor: u64,
}

impl ChainRequest {
    /// Route label for records, e.g. `SOL -> USDC -> SOL`
    pub fn route_label(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    /// Validate the request against the parameter snapshot.
    ///
    /// Runs before any transfer; a violation rejects the call without
    /// consuming a run id.
    pub fn validate(&self, params: &EngineParameters) -> Result<(), EngineError> {
        if self.tokens.len() < 2 {
            return Err(EngineError::InvalidInput(format!(
                "chain needs at least 2 tokens, got {}",
                self.tokens.len()
            )));
        }
        if self.venues.len() != self.tokens.len() - 1 {
            return Err(EngineError::InvalidInput(format!(
                "expected {} venues for {} tokens, got {}",
                self.tokens.len() - 1,
                self.tokens.len(),
                self.venues.len()
            )));
        }
        if self.slippage_pct.len() != self.venues.len() {
            return Err(EngineError::InvalidInput(format!(
                "expected {} slippage entries, got {}",
                self.venues.len(),
                self.slippage_pct.len()
            )));
        }
        if self.amount_in == 0 {
            return Err(EngineError::InvalidInput("zero input amount".to_string()));
        }
        for (i, pct) in self.slippage_pct.iter().enumerate() {
            if *pct > 100 {
                return Err(EngineError::InvalidInput(format!(
                    "slippage {} out of range [0, 100] at hop {}",
                    pct, i
                )));
            }
            if *pct > params.max_slippage_pct {
                return Err(EngineError::InvalidInput(format!(
                    "slippage {} above ceiling {} at hop {}",
                    pct, params.max_slippage_pct, i
                )));
            }
        }
        Ok(())
    }
}

/// Output of a single settled hop, consumed immediately by the chain
/// executor to feed the next hop or finalize the run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HopResult {
    pub venue: VenueId,
    pub token_in: TokenId,
    pub token_out: TokenId,
    pub amount_in: u64,
    pub amount_out: u64,
}

/// Funds currently staged in engine custody for the in-flight run.
///
/// Unwound to the caller in full on any failure after the initial pull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFunds {
    pub token: TokenId,
    pub amount: u64,
}
