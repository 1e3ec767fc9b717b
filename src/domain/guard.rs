//! Flash-loan guard oracle boundary

use async_trait::async_trait;

use crate::shared::types::TokenId;

/// Optional token safety oracle, consulted after every hop.
///
/// A flagged output token aborts the hop with `GuardRejected`.
#[async_trait]
pub trait TokenGuard: Send + Sync {
    async fn is_unsafe(&self, token: &TokenId) -> bool;
}
