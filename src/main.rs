use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use dehops::config::Config;
use dehops::domain::execution::ChainExecutor;
use dehops::domain::venue::{VenueAdapter, VenueId, VenueInfo, VenueKind, VenueRegistry};
use dehops::infrastructure::custody::LedgerCustody;
use dehops::infrastructure::guard::DenylistGuard;
use dehops::infrastructure::settlement::LoggingDispatcher;
use dehops::infrastructure::venues::{ClmmVenue, CpmmVenue};
use dehops::report::RunReport;
use dehops::shared::types::{AccountId, ChainLabel, EngineParameters, Token, TokenId};
use dehops::EngineService;

#[derive(Parser, Debug)]
#[command(version, about = "Multi-hop swap execution engine with pluggable venue support")]
struct Args {
    /// Path to config file
    #[arg(long, default_value = "Config.toml")]
    config: String,

    /// Amount to trade, in base units (overrides config)
    #[arg(long)]
    amount_in: Option<u64>,

    /// Minimum return floor enforced after every hop (overrides config)
    #[arg(long)]
    min_return_floor: Option<u64>,

    /// Destination chain for settlement handoff (overrides config)
    #[arg(long)]
    settle_to: Option<String>,

    /// Emit the run report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let cfg = Config::from_file(&args.config)?;

    // CLI args take priority over the config file
    let amount_in = args.amount_in.unwrap_or(cfg.trade.amount_in);
    let min_return_floor = args.min_return_floor.unwrap_or(cfg.trade.min_return_floor);
    let settle_to = args.settle_to.clone().or_else(|| cfg.trade.settle_to.clone());

    let params = EngineParameters::from(cfg.engine.clone());
    params.validate()?;

    // Seed the demo ledger with the caller's input-token balance
    let custody = Arc::new(LedgerCustody::new());
    let caller = AccountId::new(cfg.trade.caller.clone());
    let first_token = cfg
        .trade
        .tokens
        .first()
        .cloned()
        .context("trade.tokens must not be empty")?;
    custody
        .seed_balance(&caller, &TokenId::new(first_token.clone()), cfg.trade.seed_balance)
        .await;
    custody
        .approve(
            &caller,
            &TokenId::new(first_token),
            cfg.trade.allowance.unwrap_or(amount_in),
        )
        .await;

    let registry = build_registry(&cfg).await?;

    let mut executor = ChainExecutor::new(Arc::new(registry), custody.clone(), params)
        .with_dispatcher(Arc::new(LoggingDispatcher::new()));
    if let Some(denylist) = &cfg.engine.denylist {
        let guard = Arc::new(DenylistGuard::new());
        for token in denylist {
            guard.deny(TokenId::new(token.clone())).await;
        }
        executor = executor.with_guard(guard);
    }
    let service = EngineService::new(Arc::new(executor), AccountId::new(cfg.engine.admin.clone()));

    let tokens: Vec<TokenId> = cfg.trade.tokens.iter().map(|t| TokenId::new(t.clone())).collect();
    let venues: Vec<VenueId> = cfg.trade.venues.iter().map(|v| VenueId::new(v.clone())).collect();

    if let Some(destination) = settle_to {
        service
            .execute_chain_with_settlement(
                &caller,
                tokens,
                venues,
                amount_in,
                cfg.trade.slippage_pct.clone(),
                ChainLabel(destination.clone()),
            )
            .await?;
        println!("✅ Chain executed, final output handed to settlement ({})", destination);
        return Ok(());
    }

    let report = service
        .execute_chain(
            &caller,
            tokens,
            venues,
            amount_in,
            min_return_floor,
            cfg.trade.slippage_pct.clone(),
        )
        .await?;

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print_summary(&cfg, &report);
    }
    Ok(())
}

async fn build_registry(cfg: &Config) -> Result<VenueRegistry> {
    let mut registry = VenueRegistry::new();
    for venue_cfg in &cfg.venues {
        let kind = VenueKind::from_str(&venue_cfg.kind)?;
        let info = VenueInfo {
            id: VenueId::new(venue_cfg.id.clone()),
            name: venue_cfg.name.clone(),
            kind,
            max_slippage_pct: venue_cfg.max_slippage_pct,
            is_active: true,
        };

        let adapter: Arc<dyn VenueAdapter> = match kind {
            VenueKind::PairReserves => {
                let venue = Arc::new(CpmmVenue::new(venue_cfg.fee_bps.unwrap_or(0)));
                for pool in &venue_cfg.pools {
                    let reserve_a = pool.reserve_a.with_context(|| {
                        format!("pool {}/{} missing reserve_a", pool.token_a, pool.token_b)
                    })?;
                    let reserve_b = pool.reserve_b.with_context(|| {
                        format!("pool {}/{} missing reserve_b", pool.token_a, pool.token_b)
                    })?;
                    venue
                        .add_pool(
                            TokenId::new(pool.token_a.clone()),
                            TokenId::new(pool.token_b.clone()),
                            reserve_a,
                            reserve_b,
                        )
                        .await;
                }
                venue
            }
            VenueKind::AggregateLiquidity => {
                let venue = Arc::new(ClmmVenue::new());
                for pool in &venue_cfg.pools {
                    let liquidity = pool.liquidity.with_context(|| {
                        format!("pool {}/{} missing liquidity", pool.token_a, pool.token_b)
                    })?;
                    venue
                        .add_pool(
                            TokenId::new(pool.token_a.clone()),
                            TokenId::new(pool.token_b.clone()),
                            liquidity,
                            pool.rate_num.unwrap_or(1),
                            pool.rate_den.unwrap_or(1),
                        )
                        .await;
                }
                venue
            }
        };
        registry.register(info, adapter);
    }
    Ok(registry)
}

fn print_summary(cfg: &Config, report: &RunReport) {
    let token_table: HashMap<String, Token> = cfg
        .tokens
        .iter()
        .map(|t| {
            (
                t.id.clone(),
                Token {
                    id: TokenId::new(t.id.clone()),
                    symbol: t.symbol.clone(),
                    decimals: t.decimals,
                },
            )
        })
        .collect();
    let ui = |token: &TokenId, value: u64| -> String {
        match token_table.get(token.as_str()) {
            Some(token) => format!("{} {}", token.amount(value).to_ui(), token.symbol),
            None => format!("{} {}", value, token),
        }
    };

    println!("✅ Run {} completed", report.run_id);
    println!("   Route: {}", report.route);
    for hop in &report.hops {
        println!(
            "   Hop {}: {} -> {} via {}",
            hop.index,
            ui(&hop.token_in, hop.amount_in),
            ui(&hop.token_out, hop.amount_out),
            hop.venue
        );
    }
    let first = &report.tokens[0];
    let last = &report.tokens[report.tokens.len() - 1];
    println!("   In:  {}", ui(first, report.amount_in));
    println!("   Out: {}", ui(last, report.final_amount));
    println!("   Profit: {}", ui(last, report.gross_profit));
}
