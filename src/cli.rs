//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvPriceAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::system_clock::SystemClock;
use crate::domain::config_validation::{validate_engine_config, ENGINE, INDICATORS, SIGNALS};
use crate::domain::engine::{Engine, EngineConfig, Evaluation, Status};
use crate::domain::error::StoError;
use crate::domain::execution::ExecutionParams;
use crate::domain::indicator::IndicatorPeriods;
use crate::domain::journal::DEFAULT_JOURNAL_CAPACITY;
use crate::domain::metrics::TradeSummary;
use crate::domain::signal::{DecisionMode, SignalThresholds};
use crate::ports::clock_port::ClockPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;

#[derive(Parser, Debug)]
#[command(name = "sto", version, about = "Trading decision and paper-execution engine")]
pub struct Cli {
    /// Emit log lines as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate a price series once
    Evaluate {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        prices: PathBuf,
        /// Only use the trailing N prices
        #[arg(long)]
        last: Option<usize>,
    },
    /// Replay a price series bar by bar, as repeated polling would
    Replay {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        prices: PathBuf,
        /// Evaluate trailing windows of W prices instead of growing prefixes
        #[arg(long)]
        window: Option<usize>,
        /// Number of journal entries to print
        #[arg(long, default_value_t = 20)]
        journal: usize,
    },
    /// Validate an engine configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Evaluate {
            config,
            prices,
            last,
        } => run_evaluate(&config, &prices, last),
        Command::Replay {
            config,
            prices,
            window,
            journal,
        } => run_replay(&config, &prices, window, journal),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Validate then read every engine setting, falling back to defaults for
/// missing keys.
pub fn build_engine_config(adapter: &dyn ConfigPort) -> Result<EngineConfig, StoError> {
    validate_engine_config(adapter)?;

    let decision_mode = match adapter.get_string(ENGINE, "decision_mode") {
        Some(raw) => raw
            .parse::<DecisionMode>()
            .map_err(|reason| StoError::ConfigInvalid {
                section: ENGINE.into(),
                key: "decision_mode".into(),
                reason,
            })?,
        None => DecisionMode::default(),
    };

    let execution = ExecutionParams {
        risk_per_trade: adapter.get_double(ENGINE, "risk_per_trade", 0.02),
        take_profit_pct: adapter.get_double(ENGINE, "take_profit_pct", 0.03),
        stop_loss_pct: adapter.get_double(ENGINE, "stop_loss_pct", 0.015),
    };

    let periods = IndicatorPeriods {
        ema_fast: adapter.get_int(INDICATORS, "ema_fast_period", 10) as usize,
        ema_slow: adapter.get_int(INDICATORS, "ema_slow_period", 20) as usize,
        rsi: adapter.get_int(INDICATORS, "rsi_period", 14) as usize,
    };

    let thresholds = SignalThresholds {
        buy_rsi: adapter.get_double(SIGNALS, "buy_rsi", 60.0),
        sell_rsi: adapter.get_double(SIGNALS, "sell_rsi", 40.0),
        oversold_rsi: adapter.get_double(SIGNALS, "oversold_rsi", 30.0),
        overbought_rsi: adapter.get_double(SIGNALS, "overbought_rsi", 70.0),
    };

    Ok(EngineConfig {
        decision_mode,
        initial_capital: adapter.get_double(ENGINE, "initial_capital", 1000.0),
        execution,
        daily_threshold: adapter.get_int(ENGINE, "daily_threshold", 5) as u32,
        confirmation_threshold: adapter.get_int(SIGNALS, "confirmation_threshold", 2) as usize,
        history_capacity: adapter.get_int(SIGNALS, "history_capacity", 5) as usize,
        periods,
        thresholds,
        exit_on_sell_signal: adapter.get_bool(ENGINE, "exit_on_sell_signal", true),
        journal_capacity: adapter.get_int(
            ENGINE,
            "journal_capacity",
            DEFAULT_JOURNAL_CAPACITY as i64,
        ) as usize,
    })
}

/// The trailing `last` prices, or the whole series.
pub fn trailing(prices: &[f64], last: Option<usize>) -> &[f64] {
    match last {
        Some(n) => &prices[prices.len().saturating_sub(n)..],
        None => prices,
    }
}

/// Evaluate the series one bar at a time. Each step sees either every price
/// up to that bar or, with `window`, the trailing `window` prices.
pub fn replay_series<C: ClockPort>(
    engine: &mut Engine<C>,
    prices: &[f64],
    window: Option<usize>,
) -> Result<Vec<Evaluation>, StoError> {
    let mut evaluations = Vec::with_capacity(prices.len());
    for end in 1..=prices.len() {
        let start = window.map_or(0, |w| end.saturating_sub(w.max(1)));
        evaluations.push(engine.evaluate(&prices[start..end])?);
    }
    Ok(evaluations)
}

fn load_engine_inputs(
    config_path: &Path,
    prices_path: &Path,
) -> Result<(EngineConfig, Vec<f64>), ExitCode> {
    let adapter = load_config(config_path)?;
    let config = build_engine_config(&adapter).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;

    let prices = CsvPriceAdapter::new(prices_path).load_prices().map_err(|e| {
        eprintln!("error: {}: {e}", prices_path.display());
        ExitCode::from(&e)
    })?;
    eprintln!("Loaded {} prices from {}", prices.len(), prices_path.display());
    Ok((config, prices))
}

fn run_evaluate(config_path: &Path, prices_path: &Path, last: Option<usize>) -> ExitCode {
    let (config, prices) = match load_engine_inputs(config_path, prices_path) {
        Ok(inputs) => inputs,
        Err(code) => return code,
    };

    let mut engine = Engine::new(config, SystemClock);
    match engine.evaluate(trailing(&prices, last)) {
        Ok(evaluation) => {
            print_evaluation(&evaluation);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_replay(
    config_path: &Path,
    prices_path: &Path,
    window: Option<usize>,
    journal: usize,
) -> ExitCode {
    let (config, prices) = match load_engine_inputs(config_path, prices_path) {
        Ok(inputs) => inputs,
        Err(code) => return code,
    };

    let mut engine = Engine::new(config, SystemClock);
    if let Err(e) = replay_series(&mut engine, &prices, window) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    println!("Decisions (last {journal}):");
    for record in engine.last_decisions(journal) {
        println!("  {record}");
    }

    let trades = engine.last_trades(journal);
    println!("\nClosed trades ({}):", trades.len());
    for trade in &trades {
        println!(
            "  #{} {} {:.6} @ {:.2} -> {:.2} pnl={:.4} ({})",
            trade.id,
            trade.side,
            trade.quantity,
            trade.entry_price,
            trade.exit_price,
            trade.pnl,
            trade.exit_reason,
        );
    }

    print_summary(&engine.summary());
    print_status(&engine.status());
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match build_engine_config(&adapter) {
        Ok(config) => {
            println!("Decision mode:      {}", config.decision_mode);
            println!("Initial capital:    {:.2}", config.initial_capital);
            println!(
                "Risk / TP / SL:     {} / {} / {}",
                config.execution.risk_per_trade,
                config.execution.take_profit_pct,
                config.execution.stop_loss_pct
            );
            println!(
                "Indicators:         {}",
                config
                    .periods
                    .indicator_types()
                    .iter()
                    .map(|i| i.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            println!(
                "Confirmation:       {} of last {}",
                config.confirmation_threshold, config.history_capacity
            );
            println!("Daily entry limit:  {}", config.daily_threshold);
            eprintln!("\nConfiguration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn print_evaluation(evaluation: &Evaluation) {
    println!(
        "#{} {} {}{}",
        evaluation.id,
        evaluation.timestamp.format("%Y-%m-%d %H:%M:%S"),
        evaluation.signal,
        if evaluation.confirmed { " (confirmed)" } else { "" }
    );
    println!("  price:         {:.2}", evaluation.price);
    println!("  indicators:    {}", evaluation.indicators);
    println!("  gate:          {}", evaluation.gate);
    println!("  action:        {}", evaluation.action);
    match &evaluation.position {
        Some(pos) => println!(
            "  position:      {} {:.6} @ {:.2} (tp {:.2}, sl {:.2})",
            pos.side, pos.quantity, pos.entry_price, pos.take_profit, pos.stop_loss
        ),
        None => println!("  position:      flat"),
    }
    if let Some(pnl) = evaluation.trade_outcome {
        println!("  trade pnl:     {pnl:.4}");
    }
    println!("  capital:       {:.2}", evaluation.capital);
    println!("  position size: {:.2}", evaluation.position_size);
    println!("  entries today: {}", evaluation.daily_count);
    println!("  reason:        {}", evaluation.reason);
}

fn print_summary(summary: &TradeSummary) {
    println!("\nSummary:");
    println!(
        "  trades {}  wins {}  losses {}  breakeven {}",
        summary.total_trades, summary.wins, summary.losses, summary.breakeven
    );
    println!("  win rate {:.1}%", summary.win_rate * 100.0);
    println!(
        "  total pnl {:.4}  largest win {:.4}  largest loss {:.4}",
        summary.total_pnl, summary.largest_win, summary.largest_loss
    );
}

fn print_status(status: &Status) {
    println!("\nStatus:");
    println!("  version        {}", status.version);
    println!("  mode           {}", status.decision_mode);
    println!(
        "  capital        {:.2} (initial {:.2})",
        status.capital, status.initial_capital
    );
    println!(
        "  equity         {:.2} (return {:.2}%)",
        status.equity,
        status.total_return * 100.0
    );
    println!("  entries left   {} today", status.entries_remaining_today);
    match status.last_action {
        Some(signal) => println!("  last action    {signal}: {}", status.reason),
        None => println!("  last action    none: {}", status.reason),
    }
    println!(
        "  position       {}",
        if status.open_position.is_some() { "open" } else { "flat" }
    );
    println!(
        "  decisions      {}  trades closed {}",
        status.decisions_recorded, status.trades_closed
    );
}
