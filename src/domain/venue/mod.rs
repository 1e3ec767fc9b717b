//! Venue domain - liquidity venue integrations

mod adapter;
mod registry;

pub use adapter::VenueAdapter;
pub use registry::{RegisteredVenue, VenueRegistry};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Venue identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VenueId(pub String);

impl VenueId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VenueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VenueId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Capability tag for a venue's liquidity model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VenueKind {
    /// Two-sided pair reserves, validated on the output-side reserve
    PairReserves,
    /// Single aggregate liquidity figure
    AggregateLiquidity,
}

impl VenueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VenueKind::PairReserves => "pair_reserves",
            VenueKind::AggregateLiquidity => "aggregate_liquidity",
        }
    }
}

impl FromStr for VenueKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pair_reserves" | "pair" | "cpmm" => Ok(VenueKind::PairReserves),
            "aggregate_liquidity" | "aggregate" | "clmm" => Ok(VenueKind::AggregateLiquidity),
            _ => Err(anyhow::anyhow!("Unknown venue kind: {}", s)),
        }
    }
}

/// Venue metadata held by the registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueInfo {
    pub id: VenueId,
    pub name: String,
    pub kind: VenueKind,
    pub max_slippage_pct: u8,
    pub is_active: bool,
}

/// Ephemeral read of a venue's tradable liquidity.
///
/// Taken at the moment of a hop and never cached across hops; the time
/// between hops is adversarial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiquiditySnapshot {
    PairReserves { reserve_in: u64, reserve_out: u64 },
    Aggregate { liquidity: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_venue_kind_from_str() {
        assert_eq!(
            "pair_reserves".parse::<VenueKind>().unwrap(),
            VenueKind::PairReserves
        );
        assert_eq!("clmm".parse::<VenueKind>().unwrap(), VenueKind::AggregateLiquidity);
        assert!("orderbook".parse::<VenueKind>().is_err());
    }
}
