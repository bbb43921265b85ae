//! Drops scenario runner.
//!
//! Replays the deployment script in-process: issues a cash asset with 1000
//! units to the admin, creates the pool, approves, then mints, enrolls,
//! transfers and withdraws, checking every balance the script asserts.
//! Exits non-zero on the first mismatch. On success prints one line per
//! enrolled account with its balance, shares, claim and signed debt basis.

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use drops_core::constants::UNLIMITED_ALLOWANCE;
use drops_core::error::DropsError;
use drops_core::traits::CashAsset;
use drops_core::types::Address;
use drops_core::units::{format_signed_units, format_units, parse_units};
use drops_pool::{DropsPool, MemoryCash, PoolConfig};
use tracing::info;

/// Replay the Drops deployment scenario against an in-memory cash asset.
#[derive(Parser, Debug)]
#[command(name = "drops-sim", version, about = "Replay the Drops deployment scenario")]
struct Args {
    /// Decimal precision of the cash asset
    #[arg(long, default_value_t = 18)]
    cash_decimals: u8,

    /// Decimal precision of the Drops native unit (must be even)
    #[arg(long, default_value_t = 18)]
    decimals: u8,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format ("text" or "json")
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Print the final pool snapshot as JSON
    #[arg(long)]
    json: bool,

    /// Write the final pool snapshot as JSON to this file
    #[arg(long)]
    snapshot_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, &args.log_format);

    info!("Drops scenario runner v{}", env!("CARGO_PKG_VERSION"));
    let pool = run(args.cash_decimals, args.decimals)?;

    for line in account_table(&pool).context("failed to render accounts")? {
        println!("{line}");
    }

    let snapshot = pool.snapshot().context("failed to snapshot pool")?;
    if args.json {
        println!("{}", snapshot.to_json().context("failed to encode snapshot")?);
    }
    if let Some(path) = &args.snapshot_out {
        snapshot
            .write_to(path)
            .with_context(|| format!("failed to write snapshot to {}", path.display()))?;
        info!("snapshot written to {}", path.display());
    }
    println!("scenario passed");
    Ok(())
}

/// Accounts of the deployment script.
struct Actors {
    admin: Address,
    alice: Address,
    bob: Address,
}

fn run(cash_decimals: u8, decimals: u8) -> Result<DropsPool<MemoryCash>> {
    let actors = Actors {
        admin: Address::repeat(0xAD),
        alice: Address::repeat(0xA1),
        bob: Address::repeat(0xB2),
    };
    let cash_units = |s: &str| amount(s, cash_decimals).with_context(|| format!("bad cash amount {s}"));
    let drop_units = |s: &str| amount(s, decimals).with_context(|| format!("bad drops amount {s}"));

    // Deploy cash and issue the initial supply to the admin.
    let mut cash = MemoryCash::new("Kovan Umbrella Cash", "kUCSH", cash_decimals);
    cash.issue(&actors.admin, cash_units("1000")?)
        .context("failed to issue initial cash supply")?;
    info!(
        "{} deployed, admin balance {}",
        cash.symbol(),
        format_units(cash.balance_of(&actors.admin), cash_decimals)
    );

    // Deploy the pool and give it an unlimited approval.
    let config = PoolConfig {
        name: "Kovan Drops".into(),
        symbol: "kDROP".into(),
        decimals,
        cash_decimals,
        ..PoolConfig::default()
    };
    cash.approve(&actors.admin, &config.custody, UNLIMITED_ALLOWANCE);
    let mut pool = DropsPool::new(config, cash).context("invalid pool configuration")?;
    let share_decimals = pool.share_decimals();

    // 1. Unenrolled minter deposits 100.
    pool.mint(&actors.admin, &actors.admin, cash_units("100")?)
        .context("first mint failed")?;
    expect(pool.balance_of(&actors.admin), decimals, "100.0", "admin drops balance")?;
    expect(pool.pool_cash(), cash_decimals, "100.0", "pool cash after first mint")?;
    ensure!(pool.total_weighted_shares() == 0, "shares counted before enrollment");

    // 2.
    pool.enroll(actors.alice).context("enroll alice failed")?;
    pool.enroll(actors.bob).context("enroll bob failed")?;
    ensure!(pool.total_weighted_shares() == 0, "empty enrollment moved total shares");

    // 3.
    pool.transfer(&actors.admin, &actors.alice, drop_units("1.0")?)
        .context("transfer to alice failed")?;
    expect(pool.share_balance_of(&actors.alice), share_decimals, "1.0", "alice shares")?;
    expect(withdrawable(&pool, &actors.alice)?, cash_decimals, "100.0", "alice claim")?;

    // 4.
    pool.withdraw(&actors.alice, cash_units("1.0")?)
        .context("alice withdrawal failed")?;
    expect(pool.pool_cash(), cash_decimals, "99.0", "pool cash after alice withdrawal")?;

    // 5.
    pool.transfer(&actors.admin, &actors.bob, drop_units("1.0")?)
        .context("transfer to bob failed")?;
    expect(pool.share_balance_of(&actors.bob), share_decimals, "1.0", "bob shares")?;
    expect(withdrawable(&pool, &actors.bob)?, cash_decimals, "0.0", "bob claim after joining")?;

    // 6.
    pool.mint(&actors.admin, &actors.admin, cash_units("100")?)
        .context("second mint failed")?;
    expect(pool.pool_cash(), cash_decimals, "199.0", "pool cash after second mint")?;
    expect(withdrawable(&pool, &actors.bob)?, cash_decimals, "50.0", "bob claim after second mint")?;

    // 7.
    pool.withdraw(&actors.bob, cash_units("50.0")?)
        .context("bob withdrawal failed")?;
    expect(withdrawable(&pool, &actors.bob)?, cash_decimals, "0.0", "bob final claim")?;
    expect(withdrawable(&pool, &actors.alice)?, cash_decimals, "99.0", "alice final claim")?;

    ensure!(
        pool.custody_cash() == pool.pool_cash(),
        "custody holds {} but pool cash is {}",
        pool.custody_cash(),
        pool.pool_cash()
    );
    Ok(pool)
}

fn amount(input: &str, decimals: u8) -> Result<u128, DropsError> {
    Ok(parse_units(input, decimals)?)
}

/// One line per enrolled account: address, balance, shares, claim, debt.
fn account_table(pool: &DropsPool<MemoryCash>) -> Result<Vec<String>, DropsError> {
    let cash_decimals = pool.cash_decimals();
    let mut lines = Vec::with_capacity(pool.member_count());
    for address in pool.members() {
        let record = pool.account(address);
        let claim = pool.withdrawable_cash_of(address)?;
        lines.push(format!(
            "{address}  balance {}  shares {}  claim {}  debt {}",
            format_units(record.raw_balance, pool.decimals()),
            format_units(record.weighted_shares, pool.share_decimals()),
            format_units(claim, cash_decimals),
            format_signed_units(record.debt, cash_decimals),
        ));
    }
    Ok(lines)
}

fn withdrawable(pool: &DropsPool<MemoryCash>, account: &Address) -> Result<u128> {
    pool.withdrawable_cash_of(account)
        .with_context(|| format!("failed to read claim of {account}"))
}

/// Compare `actual` against its expected display form.
fn expect(actual: u128, decimals: u8, expected: &str, what: &str) -> Result<()> {
    let shown = format_units(actual, decimals);
    ensure!(shown == expected, "{what}: expected {expected}, got {shown}");
    info!("{what}: {shown}");
    Ok(())
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// Pass `format = "json"` for structured JSON output. Any other value
/// defaults to human-readable text.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_level(true))
            .init();
    }
}
