//! Logging settlement dispatcher

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::settlement::SettlementDispatcher;
use crate::shared::types::{AccountId, ChainLabel, TokenId};

/// A transfer handed to the bridge
#[derive(Debug, Clone)]
pub struct DispatchedTransfer {
    pub token: TokenId,
    pub recipient: AccountId,
    pub amount: u64,
    pub destination: ChainLabel,
    pub at: DateTime<Utc>,
}

/// Records and logs settlement handoffs; stand-in for a real bridge client
pub struct LoggingDispatcher {
    dispatched: RwLock<Vec<DispatchedTransfer>>,
}

impl LoggingDispatcher {
    pub fn new() -> Self {
        Self {
            dispatched: RwLock::new(Vec::new()),
        }
    }

    pub async fn dispatched(&self) -> Vec<DispatchedTransfer> {
        self.dispatched.read().await.clone()
    }
}

impl Default for LoggingDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettlementDispatcher for LoggingDispatcher {
    async fn transfer(
        &self,
        token: &TokenId,
        recipient: &AccountId,
        amount: u64,
        destination: &ChainLabel,
    ) {
        info!(
            token = %token,
            recipient = %recipient,
            amount,
            destination = %destination,
            "settlement dispatched"
        );
        self.dispatched.write().await.push(DispatchedTransfer {
            token: token.clone(),
            recipient: recipient.clone(),
            amount,
            destination: destination.clone(),
            at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dispatch_is_recorded() {
        let dispatcher = LoggingDispatcher::new();
        dispatcher
            .transfer(
                &TokenId::from("Z"),
                &AccountId::from("alice"),
                1050,
                &ChainLabel::from("base"),
            )
            .await;

        let dispatched = dispatcher.dispatched().await;
        assert_eq!(dispatched.len(), 1);
        assert_eq!(dispatched[0].amount, 1050);
        assert_eq!(dispatched[0].destination, ChainLabel::from("base"));
    }
}
