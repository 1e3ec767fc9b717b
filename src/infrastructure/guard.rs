//! Denylist-backed token guard

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::guard::TokenGuard;
use crate::shared::types::TokenId;

/// Flags tokens on a maintained denylist
pub struct DenylistGuard {
    denied: RwLock<HashSet<TokenId>>,
}

impl DenylistGuard {
    pub fn new() -> Self {
        Self {
            denied: RwLock::new(HashSet::new()),
        }
    }

    pub async fn deny(&self, token: TokenId) {
        self.denied.write().await.insert(token);
    }

    pub async fn allow(&self, token: &TokenId) {
        self.denied.write().await.remove(token);
    }
}

impl Default for DenylistGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenGuard for DenylistGuard {
    async fn is_unsafe(&self, token: &TokenId) -> bool {
        self.denied.read().await.contains(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_denylist_flags_and_clears() {
        let guard = DenylistGuard::new();
        let token = TokenId::from("SCAM");
        assert!(!guard.is_unsafe(&token).await);

        guard.deny(token.clone()).await;
        assert!(guard.is_unsafe(&token).await);

        guard.allow(&token).await;
        assert!(!guard.is_unsafe(&token).await);
    }
}
