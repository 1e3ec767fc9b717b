//! Run reports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::venue::VenueId;
use crate::shared::types::{ChainLabel, TokenId};

/// Per-hop execution record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HopRecord {
    pub id: Uuid,
    pub index: usize,
    pub venue: VenueId,
    pub token_in: TokenId,
    pub token_out: TokenId,
    pub amount_in: u64,
    pub amount_out: u64,
}

/// Run-level completion record, returned to the caller and good for
/// correlating an execution with its emitted logs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: u64,
    pub route: String,
    pub tokens: Vec<TokenId>,
    pub venues: Vec<VenueId>,
    pub amount_in: u64,
    pub final_amount: u64,
    pub gross_profit: u64,
    /// The fee-and-threshold bound this run had to beat
    pub required_return: u64,
    pub settled_to: Option<ChainLabel>,
    pub hops: Vec<HopRecord>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> RunReport {
        RunReport {
            run_id: 0,
            route: "X -> Y -> Z".to_string(),
            tokens: vec![TokenId::from("X"), TokenId::from("Y"), TokenId::from("Z")],
            venues: vec![VenueId::from("v1"), VenueId::from("v2")],
            amount_in: 1000,
            final_amount: 1050,
            gross_profit: 50,
            required_return: 1000,
            settled_to: None,
            hops: vec![HopRecord {
                id: Uuid::new_v4(),
                index: 0,
                venue: VenueId::from("v1"),
                token_in: TokenId::from("X"),
                token_out: TokenId::from("Y"),
                amount_in: 1000,
                amount_out: 1010,
            }],
            started_at: Utc::now(),
            finished_at: Utc::now(),
        }
    }

    #[test]
    fn test_report_serialization_roundtrip() {
        let report = report();
        let json = report.to_json().unwrap();
        let deserialized: RunReport = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.run_id, report.run_id);
        assert_eq!(deserialized.final_amount, report.final_amount);
        assert_eq!(deserialized.hops.len(), 1);
        assert_eq!(deserialized.hops[0].amount_out, 1010);
    }
}
