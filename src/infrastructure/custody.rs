//! In-memory custody ledger

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::custody::TokenCustody;
use crate::shared::errors::EngineError;
use crate::shared::types::{AccountId, TokenId};

/// Balances and allowances per account and token.
///
/// `pull` debits both the owner's balance and their allowance; engine
/// custody is the implicit difference until `push` credits funds back out.
pub struct LedgerCustody {
    balances: RwLock<HashMap<(AccountId, TokenId), u64>>,
    allowances: RwLock<HashMap<(AccountId, TokenId), u64>>,
}

impl LedgerCustody {
    pub fn new() -> Self {
        Self {
            balances: RwLock::new(HashMap::new()),
            allowances: RwLock::new(HashMap::new()),
        }
    }

    pub async fn seed_balance(&self, owner: &AccountId, token: &TokenId, amount: u64) {
        let mut balances = self.balances.write().await;
        *balances.entry((owner.clone(), token.clone())).or_insert(0) += amount;
    }

    pub async fn approve(&self, owner: &AccountId, token: &TokenId, amount: u64) {
        let mut allowances = self.allowances.write().await;
        allowances.insert((owner.clone(), token.clone()), amount);
    }

    pub async fn balance_of(&self, owner: &AccountId, token: &TokenId) -> u64 {
        let balances = self.balances.read().await;
        *balances.get(&(owner.clone(), token.clone())).unwrap_or(&0)
    }
}

impl Default for LedgerCustody {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenCustody for LedgerCustody {
    async fn allowance(&self, owner: &AccountId, token: &TokenId) -> u64 {
        let allowances = self.allowances.read().await;
        *allowances.get(&(owner.clone(), token.clone())).unwrap_or(&0)
    }

    async fn pull(
        &self,
        owner: &AccountId,
        token: &TokenId,
        amount: u64,
    ) -> Result<(), EngineError> {
        let mut allowances = self.allowances.write().await;
        let mut balances = self.balances.write().await;

        let key = (owner.clone(), token.clone());
        let approved = *allowances.get(&key).unwrap_or(&0);
        if approved < amount {
            return Err(EngineError::InsufficientAllowance {
                token: token.clone(),
                needed: amount,
                approved,
            });
        }
        let balance = *balances.get(&key).unwrap_or(&0);
        if balance < amount {
            return Err(EngineError::InvalidInput(format!(
                "insufficient balance of {}: have {}, need {}",
                token, balance, amount
            )));
        }

        allowances.insert(key.clone(), approved - amount);
        balances.insert(key, balance - amount);
        debug!(owner = %owner, token = %token, amount, "pulled into custody");
        Ok(())
    }

    async fn push(
        &self,
        owner: &AccountId,
        token: &TokenId,
        amount: u64,
    ) -> Result<(), EngineError> {
        let mut balances = self.balances.write().await;
        let key = (owner.clone(), token.clone());
        let balance = *balances.get(&key).unwrap_or(&0);
        let credited = balance
            .checked_add(amount)
            .ok_or(EngineError::ArithmeticOverflow)?;
        balances.insert(key, credited);
        debug!(owner = %owner, token = %token, amount, "pushed out of custody");
        Ok(())
    }
}
