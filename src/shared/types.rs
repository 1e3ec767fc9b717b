//! Common types used across the engine

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::shared::errors::EngineError;

/// Token identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenId(pub String);

impl TokenId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TokenId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Account identifier for callers and recipients
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Destination chain label for settlement dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLabel(pub String);

impl fmt::Display for ChainLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChainLabel {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Token representation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub symbol: String,
    pub decimals: u8,
}

impl Token {
    /// Wrap a raw value in this token's precision
    pub fn amount(&self, value: u64) -> Amount {
        Amount::new(value, self.decimals)
    }
}

/// Amount representation with precision
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount {
    pub value: u64,
    pub decimals: u8,
}

impl Amount {
    pub fn new(value: u64, decimals: u8) -> Self {
        Self { value, decimals }
    }

    pub fn to_ui(&self) -> f64 {
        self.value as f64 / 10_f64.powi(self.decimals as i32)
    }
}

/// Process-wide fee and profit parameters.
///
/// Owned by the administrative surface; the engine reads one consistent
/// snapshot at run start and never re-reads it mid-run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineParameters {
    pub fee_percent: u64,
    pub min_profit_threshold: u64,
    pub max_gas_budget: u64,
    pub max_slippage_pct: u8,
}

impl EngineParameters {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.fee_percent > 100 {
            return Err(EngineError::InvalidInput(format!(
                "fee percent {} out of range [0, 100]",
                self.fee_percent
            )));
        }
        if self.max_slippage_pct > 100 {
            return Err(EngineError::InvalidInput(format!(
                "max slippage {} out of range [0, 100]",
                self.max_slippage_pct
            )));
        }
        Ok(())
    }
}

impl Default for EngineParameters {
    fn default() -> Self {
        Self {
            fee_percent: 0,
            min_profit_threshold: 0,
            max_gas_budget: 1_000_000,
            max_slippage_pct: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_to_ui() {
        let amount = Amount::new(1_500_000_000, 9);
        assert_eq!(amount.to_ui(), 1.5);
    }

    #[test]
    fn test_parameters_validation() {
        assert!(EngineParameters::default().validate().is_ok());

        let bad_fee = EngineParameters {
            fee_percent: 101,
            ..EngineParameters::default()
        };
        assert!(bad_fee.validate().is_err());

        let bad_slippage = EngineParameters {
            max_slippage_pct: 101,
            ..EngineParameters::default()
        };
        assert!(bad_slippage.validate().is_err());
    }
}
