use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::shared::types::EngineParameters;

#[derive(Debug, Clone, Deserialize)]
pub struct EngineCfg {
    pub admin: String,
    pub fee_percent: u64,
    pub min_profit_threshold: u64,
    pub max_gas_budget: u64,
    pub max_slippage_pct: u8,
    pub denylist: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenCfg {
    pub id: String,
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolCfg {
    pub token_a: String,
    pub token_b: String,
    // pair-reserve venues
    pub reserve_a: Option<u64>,
    pub reserve_b: Option<u64>,
    // aggregate venues, quoting token_a -> token_b
    pub liquidity: Option<u64>,
    pub rate_num: Option<u64>,
    pub rate_den: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VenueCfg {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub max_slippage_pct: u8,
    pub fee_bps: Option<u32>,
    #[serde(default)]
    pub pools: Vec<PoolCfg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TradeCfg {
    pub caller: String,
    pub tokens: Vec<String>,
    pub venues: Vec<String>,
    pub amount_in: u64,
    pub min_return_floor: u64,
    pub slippage_pct: Vec<u8>,
    pub seed_balance: u64,
    pub allowance: Option<u64>,
    pub settle_to: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub engine: EngineCfg,
    pub tokens: Vec<TokenCfg>,
    pub venues: Vec<VenueCfg>,
    pub trade: TradeCfg,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path.as_ref())
            .with_context(|| format!("read {}", path.as_ref().display()))?;
        let cfg: Self = toml::from_str(&s).context("parse Config.toml")?;
        Ok(cfg)
    }
}

impl From<EngineCfg> for EngineParameters {
    fn from(cfg: EngineCfg) -> Self {
        Self {
            fee_percent: cfg.fee_percent,
            min_profit_threshold: cfg.min_profit_threshold,
            max_gas_budget: cfg.max_gas_budget,
            max_slippage_pct: cfg.max_slippage_pct,
        }
    }
}
