//! Tests for config module.

use super::*;

fn credentials() -> MapEnv {
    MapEnv::new()
        .with("API_KEY", "key")
        .with("API_SECRET", "secret")
}

fn valid_config() -> Config {
    let mut cfg = Config::default();
    cfg.trading.api_key = "key".to_string();
    cfg.trading.api_secret = "secret".to_string();
    cfg
}

fn assert_field(result: Result<(), ConfigError>, field: &str) {
    let err = result.expect_err("expected validation to fail");
    assert_eq!(err.field(), field, "unexpected error: {}", err);
}

// ==================== Environment accessor tests ====================

#[test]
fn test_env_string_default_when_unset_or_empty() {
    let env = MapEnv::new().with("EMPTY", "");
    assert_eq!(env.string("MISSING", "fallback"), "fallback");
    assert_eq!(env.string("EMPTY", "fallback"), "fallback");
}

#[test]
fn test_env_float_parses_value() {
    let env = MapEnv::new().with("RATE", "0.25");
    assert_eq!(env.float("RATE", 1.0), 0.25);
}

#[test]
fn test_env_float_invalid_uses_default() {
    let env = MapEnv::new().with("RATE", "abc");
    assert_eq!(env.float("RATE", 1.5), 1.5);
}

#[test]
fn test_env_int_invalid_uses_default() {
    let env = MapEnv::new().with("COUNT", "3.5");
    assert_eq!(env.int("COUNT", 7), 7);
}

#[test]
fn test_env_numbers_with_whitespace_use_default() {
    let env = MapEnv::new().with("COUNT", " 5").with("RATIO", "0.5 ");
    assert_eq!(env.int("COUNT", 7), 7);
    assert_eq!(env.float("RATIO", 0.25), 0.25);
}

#[test]
fn test_env_int_accepts_negative() {
    let env = MapEnv::new().with("COUNT", "-2");
    assert_eq!(env.int("COUNT", 7), -2);
}

#[test]
fn test_env_boolean_truthy_values() {
    for value in ["true", "TRUE", "1", "yes", "Yes"] {
        let env = MapEnv::new().with("FLAG", value);
        assert!(env.boolean("FLAG", false), "{} should be true", value);
    }
}

#[test]
fn test_env_boolean_other_values_are_false() {
    for value in ["false", "0", "no", "on", "enabled"] {
        let env = MapEnv::new().with("FLAG", value);
        assert!(!env.boolean("FLAG", true), "{} should be false", value);
    }
}

#[test]
fn test_env_boolean_empty_uses_default() {
    let env = MapEnv::new().with("FLAG", "");
    assert!(env.boolean("FLAG", true));
    assert!(!env.boolean("MISSING", false));
}

#[test]
fn test_env_secret_empty_when_unset() {
    assert_eq!(MapEnv::new().secret("API_KEY"), "");
}

// ==================== Loading tests ====================

#[test]
fn test_load_defaults_with_credentials() {
    let cfg = Config::from_source(&credentials()).unwrap();
    assert_eq!(cfg, valid_config());
}

#[test]
fn test_default_values() {
    let cfg = Config::default();

    assert_eq!(cfg.capital.total_capital, 1000.0);
    assert_eq!(cfg.capital.risk_percentage, 0.05);
    assert_eq!(cfg.capital.minimum_capital, 10.0);
    assert_eq!(cfg.capital.max_capital_per_trade, 500.0);
    assert!(!cfg.capital.dynamic_allocation_enabled);

    assert!(cfg.exit_policy.enabled);
    assert_eq!(cfg.exit_policy.max_hold_minutes, 240);
    assert_eq!(cfg.exit_policy.trailing_stop_percentage, 0.5);

    assert_eq!(cfg.risk.max_risk_percentage, 0.02);
    assert_eq!(cfg.risk.max_consecutive_losses, 5);
    assert_eq!(cfg.risk.max_drawdown_percentage, 0.15);
    assert_eq!(cfg.risk.minimum_equity_level, 500.0);

    assert_eq!(cfg.trading.pair, "BNBUSDT");
    assert!(!cfg.trading.testnet_enabled);
    assert_eq!(cfg.trading.order_timeout_seconds, 30);

    assert_eq!(cfg.logging.level, "INFO");
    assert_eq!(cfg.logging.file_path, "./logs/bot.log");

    assert_eq!(cfg.refresh_interval_seconds, 5);
    assert!(!cfg.dry_run_enabled);
    assert!(cfg.notifications_enabled);
    assert!(cfg.webhook_url.is_empty());
}

#[test]
fn test_default_tier_ladder() {
    let tiers = &Config::default().exit_policy.tiers;
    let expected = [(0.5, 0.2), (1.0, 0.3), (1.5, 0.25), (2.0, 0.25)];

    assert_eq!(tiers.len(), expected.len());
    for (tier, (profit, close)) in tiers.iter().zip(expected) {
        assert_eq!(tier.profit_percentage, profit);
        assert_eq!(tier.close_percentage, close);
        assert!(tier.enabled);
    }
}

#[test]
fn test_load_overrides_from_env() {
    let env = credentials()
        .with("FIXED_CAPITAL_TOTAL", "5000")
        .with("FIXED_CAPITAL_MAX_PER_TRADE", "1000")
        .with("MULTI_TIER_ENABLED", "no")
        .with("RISK_MAX_CONSECUTIVE_LOSSES", "3")
        .with("TRADING_PAIR", "ETHUSDT")
        .with("TRADING_TESTNET_ENABLED", "yes")
        .with("LOG_LEVEL", "DEBUG")
        .with("REFRESH_INTERVAL_SECONDS", "15")
        .with("DRY_RUN_MODE", "1")
        .with("WEBHOOK_URL", "https://hooks.example.com/abc");

    let cfg = Config::from_source(&env).unwrap();

    assert_eq!(cfg.capital.total_capital, 5000.0);
    assert_eq!(cfg.capital.max_capital_per_trade, 1000.0);
    assert!(!cfg.exit_policy.enabled);
    assert_eq!(cfg.risk.max_consecutive_losses, 3);
    assert_eq!(cfg.trading.pair, "ETHUSDT");
    assert!(cfg.trading.testnet_enabled);
    assert_eq!(cfg.logging.level, "DEBUG");
    assert_eq!(cfg.refresh_interval_seconds, 15);
    assert!(cfg.dry_run_enabled);
    assert_eq!(cfg.webhook_url, "https://hooks.example.com/abc");
    assert_eq!(cfg.trading.api_key, "key");
}

#[test]
fn test_load_tiers_not_overridable() {
    let env = credentials().with("MULTI_TIER_MAX_HOLD_TIME", "60");
    let cfg = Config::from_source(&env).unwrap();

    assert_eq!(cfg.exit_policy.max_hold_minutes, 60);
    assert_eq!(cfg.exit_policy.tiers, DEFAULT_EXIT_TIERS.to_vec());
}

#[test]
fn test_load_malformed_number_falls_back_to_default() {
    let env = credentials().with("FIXED_CAPITAL_TOTAL", "lots");
    let cfg = Config::from_source(&env).unwrap();
    assert_eq!(cfg.capital.total_capital, 1000.0);
}

#[test]
fn test_load_without_credentials_fails() {
    let result = Config::from_source(&MapEnv::new());
    let err = result.unwrap_err();
    assert_eq!(err.field(), "trading.api_key");
    assert!(err.to_string().contains("API key and secret"));
}

#[test]
fn test_load_testnet_without_credentials() {
    let env = MapEnv::new().with("TRADING_TESTNET_ENABLED", "true");
    let cfg = Config::from_source(&env).unwrap();
    assert!(cfg.trading.api_key.is_empty());
}

#[test]
fn test_load_returns_first_error() {
    let env = credentials()
        .with("FIXED_CAPITAL_TOTAL", "-1")
        .with("REFRESH_INTERVAL_SECONDS", "0");
    let err = Config::from_source(&env).unwrap_err();
    assert_eq!(err.field(), "capital.total_capital");
}

// ==================== Capital validation tests ====================

#[test]
fn test_validate_default_with_credentials() {
    assert!(valid_config().validate().is_ok());
}

#[test]
fn test_validate_total_capital() {
    let mut cfg = valid_config();
    cfg.capital.total_capital = 0.0;
    assert_field(cfg.validate(), "capital.total_capital");
}

#[test]
fn test_validate_risk_percentage_bounds() {
    for value in [0.0, -0.1, 1.01] {
        let mut cfg = valid_config();
        cfg.capital.risk_percentage = value;
        assert_field(cfg.validate(), "capital.risk_percentage");
    }

    let mut cfg = valid_config();
    cfg.capital.risk_percentage = 1.0;
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_validate_minimum_capital() {
    let mut cfg = valid_config();
    cfg.capital.minimum_capital = 0.0;
    assert_field(cfg.validate(), "capital.minimum_capital");
}

#[test]
fn test_validate_max_capital_per_trade_positive() {
    let mut cfg = valid_config();
    cfg.capital.max_capital_per_trade = -5.0;
    assert_field(cfg.validate(), "capital.max_capital_per_trade");
}

#[test]
fn test_validate_max_capital_per_trade_exceeds_total() {
    let mut cfg = valid_config();
    cfg.capital.max_capital_per_trade = 1500.0;

    let err = cfg.validate().unwrap_err();
    assert_eq!(err.field(), "capital.max_capital_per_trade");
    assert!(err.to_string().contains("cannot exceed total capital"));
    assert!(err.to_string().contains("1500"));
}

#[test]
fn test_validate_max_capital_per_trade_equal_total() {
    let mut cfg = valid_config();
    cfg.capital.max_capital_per_trade = cfg.capital.total_capital;
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_validate_win_rates() {
    let mut cfg = valid_config();
    cfg.capital.min_win_rate_for_increase = 0.0;
    assert_field(cfg.validate(), "capital.min_win_rate_for_increase");

    let mut cfg = valid_config();
    cfg.capital.max_win_rate_threshold = 1.2;
    assert_field(cfg.validate(), "capital.max_win_rate_threshold");
}

#[test]
fn test_validate_nan_rejected() {
    let mut cfg = valid_config();
    cfg.capital.risk_percentage = f64::NAN;
    assert_field(cfg.validate(), "capital.risk_percentage");
}

// ==================== Exit policy validation tests ====================

#[test]
fn test_validate_empty_tiers() {
    let mut cfg = valid_config();
    cfg.exit_policy.tiers.clear();

    let err = cfg.validate().unwrap_err();
    assert_eq!(err.field(), "exit_policy.tiers");
    assert!(err.to_string().contains("at least one profit tier"));
}

#[test]
fn test_validate_tier_profit_reports_index() {
    let mut cfg = valid_config();
    cfg.exit_policy.tiers[2].profit_percentage = 0.0;

    let err = cfg.validate().unwrap_err();
    assert_eq!(
        err,
        ConfigError::InvalidTier {
            index: 2,
            field: "profit_percentage",
            constraint: "positive",
            value: 0.0,
        }
    );
    assert!(err.to_string().contains("tiers[2].profit_percentage"));
}

#[test]
fn test_validate_first_failing_tier_wins() {
    let mut cfg = valid_config();
    cfg.exit_policy.tiers[1].close_percentage = 1.5;
    cfg.exit_policy.tiers[3].profit_percentage = -1.0;

    match cfg.validate().unwrap_err() {
        ConfigError::InvalidTier { index, field, .. } => {
            assert_eq!(index, 1);
            assert_eq!(field, "close_percentage");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_validate_max_hold_minutes() {
    let mut cfg = valid_config();
    cfg.exit_policy.max_hold_minutes = 0;
    assert_field(cfg.validate(), "exit_policy.max_hold_minutes");
}

#[test]
fn test_validate_trailing_stop() {
    let mut cfg = valid_config();
    cfg.exit_policy.trailing_stop_percentage = -0.1;
    assert_field(cfg.validate(), "exit_policy.trailing_stop_percentage");

    let mut cfg = valid_config();
    cfg.exit_policy.trailing_stop_percentage = 0.0;
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_validate_disabled_exit_policy_skipped() {
    let mut cfg = valid_config();
    cfg.exit_policy.enabled = false;
    cfg.exit_policy.tiers = vec![ExitTier::new(-1.0, 3.0)];
    cfg.exit_policy.max_hold_minutes = -10;
    cfg.exit_policy.trailing_stop_percentage = -1.0;
    assert!(cfg.validate().is_ok());

    cfg.exit_policy.tiers.clear();
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_validate_descending_tiers_accepted() {
    let mut cfg = valid_config();
    cfg.exit_policy.tiers.reverse();
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_exit_plan_closes_fraction_of_remaining() {
    let policy = TieredExitPolicy::default();
    let plan = policy.exit_plan(100.0);

    assert_eq!(plan.len(), 4);
    assert!((plan[0].quantity - 20.0).abs() < 1e-9);
    assert!((plan[1].quantity - 24.0).abs() < 1e-9);
    assert!((plan[2].quantity - 14.0).abs() < 1e-9);
    assert!((plan[3].quantity - 10.5).abs() < 1e-9);
    assert_eq!(plan[3].profit_percentage, 2.0);
}

#[test]
fn test_exit_plan_skips_disabled_tiers() {
    let mut policy = TieredExitPolicy::default();
    policy.tiers[0].enabled = false;

    let plan = policy.exit_plan(10.0);
    assert_eq!(plan.len(), 3);
    assert_eq!(plan[0].index, 1);
    assert!((plan[0].quantity - 3.0).abs() < 1e-9);
}

#[test]
fn test_exit_plan_empty_when_disabled() {
    let policy = TieredExitPolicy {
        enabled: false,
        ..TieredExitPolicy::default()
    };
    assert!(policy.exit_plan(10.0).is_empty());
}

// ==================== Risk validation tests ====================

#[test]
fn test_validate_risk_fractions() {
    let cases: [(fn(&mut Config), &str); 4] = [
        (|c| c.risk.max_risk_percentage = 0.0, "risk.max_risk_percentage"),
        (|c| c.risk.max_daily_loss_percentage = 1.5, "risk.max_daily_loss_percentage"),
        (|c| c.risk.stop_loss_percentage = -0.01, "risk.stop_loss_percentage"),
        (|c| c.risk.max_position_size = 0.0, "risk.max_position_size"),
    ];
    for (mutate, field) in cases {
        let mut cfg = valid_config();
        mutate(&mut cfg);
        assert_field(cfg.validate(), field);
    }
}

#[test]
fn test_validate_stop_loss_zero_allowed() {
    let mut cfg = valid_config();
    cfg.risk.stop_loss_percentage = 0.0;
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_validate_consecutive_losses_and_pause() {
    let mut cfg = valid_config();
    cfg.risk.max_consecutive_losses = 0;
    assert_field(cfg.validate(), "risk.max_consecutive_losses");

    let mut cfg = valid_config();
    cfg.risk.pause_duration_minutes = -5;
    assert_field(cfg.validate(), "risk.pause_duration_minutes");
}

#[test]
fn test_validate_break_even_threshold() {
    let mut cfg = valid_config();
    cfg.risk.break_even_threshold = -0.5;
    assert_field(cfg.validate(), "risk.break_even_threshold");
}

#[test]
fn test_validate_correlation_only_when_enabled() {
    let mut cfg = valid_config();
    cfg.risk.max_correlation_threshold = 1.5;
    assert_field(cfg.validate(), "risk.max_correlation_threshold");

    cfg.risk.correlation_check_enabled = false;
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_validate_drawdown_only_when_enabled() {
    let mut cfg = valid_config();
    cfg.risk.max_drawdown_percentage = 0.0;
    assert_field(cfg.validate(), "risk.max_drawdown_percentage");

    cfg.risk.drawdown_monitoring_enabled = false;
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_validate_equity_protection_only_when_enabled() {
    let mut cfg = valid_config();
    cfg.risk.minimum_equity_level = -1.0;
    assert_field(cfg.validate(), "risk.minimum_equity_level");

    cfg.risk.equity_protection_enabled = false;
    assert!(cfg.validate().is_ok());
}

// ==================== Trading validation tests ====================

#[test]
fn test_validate_empty_pair() {
    let mut cfg = valid_config();
    cfg.trading.pair.clear();
    assert_field(cfg.validate(), "trading.pair");
}

#[test]
fn test_validate_missing_secret_for_live_trading() {
    let mut cfg = valid_config();
    cfg.trading.api_secret.clear();
    assert_field(cfg.validate(), "trading.api_key");

    cfg.trading.testnet_enabled = true;
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_validate_order_quantities() {
    let mut cfg = valid_config();
    cfg.trading.min_order_quantity = 0.0;
    assert_field(cfg.validate(), "trading.min_order_quantity");

    let mut cfg = valid_config();
    cfg.trading.max_order_quantity = -1.0;
    assert_field(cfg.validate(), "trading.max_order_quantity");

    let mut cfg = valid_config();
    cfg.trading.min_order_quantity = 5.0;
    cfg.trading.max_order_quantity = 1.0;
    let err = cfg.validate().unwrap_err();
    assert_eq!(err.field(), "trading.max_order_quantity");
    assert!(err.to_string().contains("cannot be less than min order quantity"));
}

#[test]
fn test_validate_slippage_timeout_and_fees() {
    let mut cfg = valid_config();
    cfg.trading.slippage_tolerance = 1.1;
    assert_field(cfg.validate(), "trading.slippage_tolerance");

    let mut cfg = valid_config();
    cfg.trading.order_timeout_seconds = 0;
    assert_field(cfg.validate(), "trading.order_timeout_seconds");

    let mut cfg = valid_config();
    cfg.trading.maker_fee = -0.001;
    assert_field(cfg.validate(), "trading.maker_fee");

    let mut cfg = valid_config();
    cfg.trading.taker_fee = 2.0;
    assert_field(cfg.validate(), "trading.taker_fee");
}

#[test]
fn test_trading_debug_redacts_credentials() {
    let cfg = valid_config();
    let out = format!("{:?}", cfg.trading);
    assert!(!out.contains("secret\""));
    assert!(out.contains("<redacted>"));
}

// ==================== Logging and top-level validation tests ====================

#[test]
fn test_validate_log_file_path_required() {
    let mut cfg = valid_config();
    cfg.logging.file_path.clear();
    assert_field(cfg.validate(), "logging.file_path");

    cfg.logging.file_logging_enabled = false;
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_validate_log_file_size_and_backups() {
    let mut cfg = valid_config();
    cfg.logging.max_file_size_mb = 0;
    assert_field(cfg.validate(), "logging.max_file_size_mb");

    let mut cfg = valid_config();
    cfg.logging.max_backup_files = -1;
    assert_field(cfg.validate(), "logging.max_backup_files");

    let mut cfg = valid_config();
    cfg.logging.max_backup_files = 0;
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_validate_refresh_interval() {
    let mut cfg = valid_config();
    cfg.refresh_interval_seconds = 0;
    assert_field(cfg.validate(), "refresh_interval_seconds");
}

#[test]
fn test_validate_block_order() {
    // Capital is reported before anything else.
    let mut cfg = valid_config();
    cfg.refresh_interval_seconds = 0;
    cfg.logging.max_file_size_mb = 0;
    cfg.trading.pair.clear();
    cfg.risk.max_risk_percentage = 0.0;
    cfg.exit_policy.max_hold_minutes = 0;
    cfg.capital.total_capital = 0.0;

    let order = [
        "capital.total_capital",
        "exit_policy.max_hold_minutes",
        "risk.max_risk_percentage",
        "trading.pair",
        "logging.max_file_size_mb",
        "refresh_interval_seconds",
    ];
    for field in order {
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.field(), field);
        match field {
            "capital.total_capital" => cfg.capital.total_capital = 1000.0,
            "exit_policy.max_hold_minutes" => cfg.exit_policy.max_hold_minutes = 240,
            "risk.max_risk_percentage" => cfg.risk.max_risk_percentage = 0.02,
            "trading.pair" => cfg.trading.pair = "BNBUSDT".to_string(),
            "logging.max_file_size_mb" => cfg.logging.max_file_size_mb = 10,
            _ => cfg.refresh_interval_seconds = 5,
        }
    }
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_filter_directive() {
    let mut settings = LoggingSettings::default();
    assert_eq!(settings.filter_directive(), "info");

    settings.level = "DEBUG".to_string();
    assert_eq!(settings.filter_directive(), "debug");

    settings.level = "warning".to_string();
    assert_eq!(settings.filter_directive(), "warn");

    settings.level = "verbose".to_string();
    assert_eq!(settings.filter_directive(), "info");
}

#[test]
fn test_notification_webhook() {
    let mut cfg = valid_config();
    assert_eq!(cfg.notification_webhook(), None);

    cfg.webhook_url = "https://hooks.example.com/x".to_string();
    assert_eq!(cfg.notification_webhook(), Some("https://hooks.example.com/x"));

    cfg.notifications_enabled = false;
    assert_eq!(cfg.notification_webhook(), None);
}

#[test]
fn test_serialize_skips_secrets() {
    let mut cfg = valid_config();
    cfg.webhook_url = "https://hooks.example.com/token".to_string();

    let json = serde_json::to_string(&cfg).unwrap();
    assert!(json.contains("\"pair\":\"BNBUSDT\""));
    assert!(!json.contains("api_key"));
    assert!(!json.contains("hooks.example.com"));
}
