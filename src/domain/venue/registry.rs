//! Venue registry - maps venue identifiers to adapters and metadata

use std::collections::HashMap;
use std::sync::Arc;

use crate::shared::errors::EngineError;

use super::{VenueAdapter, VenueId, VenueInfo};

/// A venue registered with the engine
#[derive(Clone)]
pub struct RegisteredVenue {
    pub info: VenueInfo,
    pub adapter: Arc<dyn VenueAdapter>,
}

impl std::fmt::Debug for RegisteredVenue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredVenue")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

/// Registry of known venues.
///
/// Hop dispatch goes through this mapping; an identifier that does not
/// resolve is a fatal `UnknownVenue`, never a silent fallback.
#[derive(Default)]
pub struct VenueRegistry {
    venues: HashMap<VenueId, RegisteredVenue>,
}

impl VenueRegistry {
    pub fn new() -> Self {
        Self {
            venues: HashMap::new(),
        }
    }

    pub fn register(&mut self, info: VenueInfo, adapter: Arc<dyn VenueAdapter>) {
        let id = info.id.clone();
        self.venues.insert(id, RegisteredVenue { info, adapter });
    }

    /// Resolve a venue identifier. Inactive venues resolve like unknown ones.
    pub fn resolve(&self, id: &VenueId) -> Result<&RegisteredVenue, EngineError> {
        match self.venues.get(id) {
            Some(venue) if venue.info.is_active => Ok(venue),
            _ => Err(EngineError::UnknownVenue(id.to_string())),
        }
    }

    pub fn contains(&self, id: &VenueId) -> bool {
        self.venues.contains_key(id)
    }

    pub fn venue_ids(&self) -> Vec<VenueId> {
        self.venues.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::venue::{LiquiditySnapshot, VenueKind};
    use crate::shared::types::TokenId;
    use async_trait::async_trait;

    struct NullAdapter;

    #[async_trait]
    impl VenueAdapter for NullAdapter {
        fn kind(&self) -> VenueKind {
            VenueKind::PairReserves
        }

        async fn probe_liquidity(
            &self,
            _token_in: &TokenId,
            _token_out: &TokenId,
        ) -> Result<LiquiditySnapshot, EngineError> {
            Ok(LiquiditySnapshot::PairReserves {
                reserve_in: 0,
                reserve_out: 0,
            })
        }

        async fn swap(
            &self,
            _token_in: &TokenId,
            _token_out: &TokenId,
            _amount_in: u64,
            _min_amount_out: u64,
        ) -> Result<u64, EngineError> {
            Ok(0)
        }
    }

    fn info(id: &str, is_active: bool) -> VenueInfo {
        VenueInfo {
            id: VenueId::from(id),
            name: id.to_string(),
            kind: VenueKind::PairReserves,
            max_slippage_pct: 100,
            is_active,
        }
    }

    #[test]
    fn test_resolve_registered_venue() {
        let mut registry = VenueRegistry::new();
        registry.register(info("v1", true), Arc::new(NullAdapter));

        let venue = registry.resolve(&VenueId::from("v1")).unwrap();
        assert_eq!(venue.info.name, "v1");
    }

    #[test]
    fn test_unknown_venue_is_fatal() {
        let registry = VenueRegistry::new();
        let err = registry.resolve(&VenueId::from("v9")).unwrap_err();
        assert_eq!(err, EngineError::UnknownVenue("v9".to_string()));
    }

    #[test]
    fn test_inactive_venue_resolves_like_unknown() {
        let mut registry = VenueRegistry::new();
        registry.register(info("v1", false), Arc::new(NullAdapter));

        assert!(registry.contains(&VenueId::from("v1")));
        let err = registry.resolve(&VenueId::from("v1")).unwrap_err();
        assert_eq!(err, EngineError::UnknownVenue("v1".to_string()));
    }
}
