//! CLI integration tests.
//!
//! Tests cover:
//! - Building an `EngineConfig` from INI content (defaults, overrides, errors)
//! - Price file loading through the CSV adapter
//! - Series helpers used by `evaluate` and `replay`
//! - Running subcommands end to end against temp files

mod common;

use clap::Parser;
use common::*;
use sto::adapters::csv_adapter::CsvPriceAdapter;
use sto::adapters::file_config_adapter::FileConfigAdapter;
use sto::cli::{self, Cli, Command};
use sto::domain::engine::{Engine, EngineConfig};
use sto::domain::error::StoError;
use sto::domain::journal::{Action, Gate};
use sto::domain::signal::DecisionMode;
use sto::ports::price_port::PricePort;

fn config_from(content: &str) -> Result<EngineConfig, StoError> {
    cli::build_engine_config(&FileConfigAdapter::from_string(content).unwrap())
}

mod build_engine_config {
    use super::*;

    #[test]
    fn empty_config_gives_defaults() {
        let config = config_from("[engine]\n").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn overrides_every_section() {
        let config = config_from(
            r#"
[engine]
decision_mode = semi
initial_capital = 5000
risk_per_trade = 0.05
take_profit_pct = 0.04
stop_loss_pct = 0.02
daily_threshold = 2
exit_on_sell_signal = false
journal_capacity = 50

[indicators]
ema_fast_period = 5
ema_slow_period = 15
rsi_period = 7

[signals]
confirmation_threshold = 3
history_capacity = 4
buy_rsi = 55
sell_rsi = 45
oversold_rsi = 25
overbought_rsi = 75
"#,
        )
        .unwrap();

        assert_eq!(config.decision_mode, DecisionMode::Reversal);
        assert_eq!(config.initial_capital, 5000.0);
        assert_eq!(config.execution.risk_per_trade, 0.05);
        assert_eq!(config.execution.take_profit_pct, 0.04);
        assert_eq!(config.execution.stop_loss_pct, 0.02);
        assert_eq!(config.daily_threshold, 2);
        assert!(!config.exit_on_sell_signal);
        assert_eq!(config.journal_capacity, 50);
        assert_eq!(config.periods.ema_fast, 5);
        assert_eq!(config.periods.ema_slow, 15);
        assert_eq!(config.periods.rsi, 7);
        assert_eq!(config.confirmation_threshold, 3);
        assert_eq!(config.history_capacity, 4);
        assert_eq!(config.thresholds.buy_rsi, 55.0);
        assert_eq!(config.thresholds.sell_rsi, 45.0);
        assert_eq!(config.thresholds.oversold_rsi, 25.0);
        assert_eq!(config.thresholds.overbought_rsi, 75.0);
    }

    #[test]
    fn mode_letters_map_to_modes() {
        for (raw, mode) in [
            ("A", DecisionMode::Passive),
            ("b", DecisionMode::Reversal),
            ("C", DecisionMode::Momentum),
            ("aggressive", DecisionMode::Momentum),
        ] {
            let config = config_from(&format!("[engine]\ndecision_mode = {raw}\n")).unwrap();
            assert_eq!(config.decision_mode, mode, "mode {raw}");
        }
    }

    #[test]
    fn invalid_value_is_config_error() {
        let err = config_from("[engine]\ndaily_threshold = 0\n").unwrap_err();
        assert!(matches!(err, StoError::ConfigInvalid { ref key, .. } if key == "daily_threshold"));
        assert_eq!(err.exit_status(), 2);
    }

    #[test]
    fn non_finite_capital_is_config_error() {
        let err = config_from("[engine]\ninitial_capital = inf\n").unwrap_err();
        assert!(matches!(err, StoError::ConfigInvalid { ref key, .. } if key == "initial_capital"));
        assert_eq!(err.exit_status(), 2);
    }

    #[test]
    fn oversized_history_is_config_error() {
        let err = config_from("[signals]\nhistory_capacity = 100000000000000\n").unwrap_err();
        assert!(matches!(err, StoError::ConfigInvalid { ref key, .. } if key == "history_capacity"));
    }

    #[test]
    fn unknown_mode_is_config_error() {
        let err = config_from("[engine]\ndecision_mode = Z\n").unwrap_err();
        assert!(matches!(err, StoError::ConfigInvalid { ref key, .. } if key == "decision_mode"));
    }
}

mod price_files {
    use super::*;

    #[test]
    fn loads_generated_csv() {
        let prices = rising(100.0, 0.5, 30);
        let file = write_temp_file(&price_csv(&prices));
        let loaded = CsvPriceAdapter::new(file.path()).load_prices().unwrap();
        assert_eq!(loaded, prices);
    }

    #[test]
    fn rejects_text_cells() {
        let file = write_temp_file("date,close\n2024-01-01,100\n2024-01-02,n/a\n");
        let err = CsvPriceAdapter::new(file.path()).load_prices().unwrap_err();
        assert!(matches!(err, StoError::InvalidInput { index: 1, .. }));
        assert_eq!(err.exit_status(), 4);
    }
}

mod series_helpers {
    use super::*;

    #[test]
    fn trailing_takes_last_n() {
        let prices = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(cli::trailing(&prices, Some(2)), &[3.0, 4.0]);
        assert_eq!(cli::trailing(&prices, Some(10)), &prices);
        assert_eq!(cli::trailing(&prices, None), &prices);
    }

    #[test]
    fn replay_evaluates_every_prefix() {
        let (mut engine, _clock) = engine_with(EngineConfig::default());
        let prices = rising(100.0, 1.0, 25);

        let evaluations = cli::replay_series(&mut engine, &prices, None).unwrap();
        assert_eq!(evaluations.len(), 25);
        assert!(evaluations[..19].iter().all(|e| e.gate == Gate::InsufficientData));
        assert_eq!(evaluations[19].gate, Gate::Passed);
        assert_eq!(engine.last_decisions(100).len(), 25);
        assert!(evaluations.iter().any(|e| e.action == Action::Opened));
    }

    #[test]
    fn replay_with_window_uses_trailing_prices() {
        let (mut engine, _clock) = engine_with(EngineConfig::default());
        let prices = rising(100.0, 1.0, 30);

        let evaluations = cli::replay_series(&mut engine, &prices, Some(20)).unwrap();
        assert_eq!(evaluations.len(), 30);
        assert_eq!(evaluations[18].gate, Gate::InsufficientData);
        assert!(evaluations[19..].iter().all(|e| e.gate == Gate::Passed));
        assert_eq!(evaluations[29].price, 129.0);
    }

    #[test]
    fn replay_stops_on_invalid_series() {
        let clock = ManualClock::at(2024, 3, 1, 9, 0);
        let mut engine = Engine::new(EngineConfig::default(), clock);
        let err = cli::replay_series(&mut engine, &[100.0, 0.0, 101.0], None).unwrap_err();
        assert!(matches!(err, StoError::InvalidInput { index: 1, .. }));
        assert_eq!(engine.last_decisions(10).len(), 2);
    }
}

mod subcommands {
    use super::*;

    fn run_args(args: &[&str]) -> String {
        let cli = Cli::try_parse_from(args).unwrap();
        // ExitCode has no PartialEq; compare through its Debug output.
        format!("{:?}", cli::run(cli))
    }

    fn success() -> String {
        format!("{:?}", std::process::ExitCode::SUCCESS)
    }

    #[test]
    fn parses_replay_arguments() {
        let cli = Cli::try_parse_from([
            "sto", "replay", "-c", "e.ini", "-p", "p.csv", "--window", "30", "--log-json",
        ])
        .unwrap();
        assert!(cli.log_json);
        match cli.command {
            Command::Replay {
                window, journal, ..
            } => {
                assert_eq!(window, Some(30));
                assert_eq!(journal, 20);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn validate_accepts_good_config() {
        let ini = write_temp_file("[engine]\ndecision_mode = C\n");
        let path = ini.path().to_str().unwrap();
        assert_eq!(run_args(&["sto", "validate", "--config", path]), success());
    }

    #[test]
    fn validate_rejects_bad_config() {
        let ini = write_temp_file("[indicators]\nema_fast_period = 30\n");
        let path = ini.path().to_str().unwrap();
        assert_ne!(run_args(&["sto", "validate", "--config", path]), success());
    }

    #[test]
    fn validate_missing_file_fails() {
        assert_ne!(
            run_args(&["sto", "validate", "--config", "/nonexistent/sto.ini"]),
            success()
        );
    }

    #[test]
    fn evaluate_and_replay_succeed() {
        let ini = write_temp_file("[engine]\ndaily_threshold = 3\n");
        let csv = write_temp_file(&price_csv(&rising(100.0, 1.0, 40)));
        let ini_path = ini.path().to_str().unwrap();
        let csv_path = csv.path().to_str().unwrap();

        assert_eq!(
            run_args(&["sto", "evaluate", "-c", ini_path, "-p", csv_path, "--last", "25"]),
            success()
        );
        assert_eq!(
            run_args(&["sto", "replay", "-c", ini_path, "-p", csv_path, "--journal", "5"]),
            success()
        );
    }

    #[test]
    fn evaluate_with_bad_prices_fails() {
        let ini = write_temp_file("[engine]\n");
        let csv = write_temp_file("close\n100\nabc\n");
        assert_ne!(
            run_args(&[
                "sto",
                "evaluate",
                "-c",
                ini.path().to_str().unwrap(),
                "-p",
                csv.path().to_str().unwrap(),
            ]),
            success()
        );
    }
}
