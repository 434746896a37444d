use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use pretty_assertions::assert_eq;
use quicksale_core::config::{SupabaseConfig, SyncSettings};
use quicksale_core::models::{SaleRow, Sku};
use quicksale_core::remote::{RemoteError, SupabaseStore};
use quicksale_core::storage::SqliteStore;
use quicksale_core::sync::{Connectivity, FlushOutcome, SyncCoordinator};
use quicksale_core::{SaleId, SaleInput};
use rust_decimal_macros::dec;
use tokio::sync::watch;

use crate::cli::{Cli, Commands, CompletionShell, ConfigCommands, SkuCommands};
use crate::commands::common::{
    format_flush_outcome, format_record_outcome, format_sku_line, AppContext, ContextOptions,
    SaleItem, SalesRemote,
};
use crate::commands::completions::render_completions;
use crate::commands::config::{apply_init, describe_config};
use crate::commands::export::write_export;
use crate::commands::flush::run_flush;
use crate::commands::pending::pending_report;
use crate::commands::today::fetch_today;
use crate::commands::watch::publish_connectivity;
use crate::config::{CliConfig, DB_PATH_ENV, SUPABASE_ANON_KEY_ENV, SUPABASE_URL_ENV};
use crate::error::CliError;

fn offline_context() -> AppContext {
    let config = SupabaseConfig::new("http://127.0.0.1:9", "anon-key").unwrap();
    let remote =
        SalesRemote::Supabase(SupabaseStore::new(config, &SyncSettings::default()).unwrap());
    let store = SqliteStore::open_in_memory().unwrap();
    let coordinator =
        SyncCoordinator::open(store, remote.clone(), SyncSettings::default()).unwrap();
    AppContext {
        coordinator: Arc::new(coordinator),
        remote,
        connectivity: Connectivity::Offline,
    }
}

fn configured() -> CliConfig {
    CliConfig {
        version: 1,
        supabase_url: Some("https://demo.supabase.co".to_string()),
        supabase_anon_key: Some("anon-key".to_string()),
        ..CliConfig::default()
    }
}

#[test]
fn sell_command_parses_decimal_quantities() {
    let cli = Cli::try_parse_from([
        "quicksale", "sell", "--sku", "Rice", "--qty", "0.5", "--price", "20", "--offline",
    ])
    .unwrap();

    assert!(cli.offline);
    match cli.command {
        Commands::Sell {
            sku,
            quantity,
            price,
        } => {
            assert_eq!(sku, "Rice");
            assert_eq!(quantity, dec!(0.5));
            assert_eq!(price, dec!(20));
        }
        _ => panic!("expected sell command"),
    }
}

#[test]
fn sell_command_rejects_non_numeric_price() {
    let result = Cli::try_parse_from([
        "quicksale", "sell", "--sku", "Rice", "--qty", "1", "--price", "cheap",
    ]);
    assert!(result.is_err());
}

#[test]
fn skus_subcommands_parse_ids() {
    let cli = Cli::try_parse_from(["quicksale", "skus", "disable", "42"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Skus {
            command: SkuCommands::Disable { id: 42 }
        }
    ));
}

#[test]
fn config_init_parses_queue_db() {
    let cli = Cli::try_parse_from(["quicksale", "config", "init", "--queue-db", "/tmp/q.db"])
        .unwrap();
    match cli.command {
        Commands::Config {
            command: ConfigCommands::Init { queue_db, .. },
        } => assert_eq!(queue_db, Some(PathBuf::from("/tmp/q.db"))),
        _ => panic!("expected config init"),
    }
}

#[test]
fn missing_config_file_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = CliConfig::load_from_path(&dir.path().join("config.json")).unwrap();
    assert_eq!(config.version, 1);
    assert_eq!(config.supabase_url, None);
    assert_eq!(config.sync, SyncSettings::default());
}

#[test]
fn config_round_trips_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");
    let mut config = configured();
    config.supabase_url = Some(" https://demo.supabase.co/ ".to_string());
    config.sync.idempotent_inserts = true;

    config.save_to_path(&path).unwrap();
    let loaded = CliConfig::load_from_path(&path).unwrap();

    assert_eq!(loaded.supabase_url.as_deref(), Some("https://demo.supabase.co"));
    assert!(loaded.sync.idempotent_inserts);
}

#[test]
fn config_with_invalid_json_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    let error = CliConfig::load_from_path(&path).err().unwrap();
    assert!(matches!(error, CliError::Config(message) if message.contains("config.json")));
}

#[test]
fn zero_sync_intervals_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"sync": {"retry_interval": 0}}"#).unwrap();

    let error = CliConfig::load_from_path(&path).err().unwrap();
    assert!(matches!(
        error,
        CliError::Core(quicksale_core::Error::Config(message)) if message.contains("retry_interval")
    ));
}

#[test]
fn env_overrides_win_over_file_values() {
    let mut config = configured();
    config.apply_env_overrides(|name| match name {
        SUPABASE_URL_ENV => Some("https://other.supabase.co".to_string()),
        SUPABASE_ANON_KEY_ENV => Some("   ".to_string()),
        DB_PATH_ENV => Some("/var/lib/pos/queue.db".to_string()),
        _ => None,
    });

    assert_eq!(config.supabase_url.as_deref(), Some("https://other.supabase.co"));
    assert_eq!(config.supabase_anon_key.as_deref(), Some("anon-key"));
    assert_eq!(config.resolve_db_path(None), PathBuf::from("/var/lib/pos/queue.db"));
}

#[test]
fn explicit_db_path_wins() {
    let mut config = configured();
    config.db_path = Some(PathBuf::from("/from/config.db"));
    assert_eq!(
        config.resolve_db_path(Some(PathBuf::from("/from/flag.db"))),
        PathBuf::from("/from/flag.db")
    );
}

#[test]
fn supabase_requires_url_and_key() {
    let mut config = configured();
    assert!(config.supabase().is_ok());

    config.supabase_anon_key = None;
    assert!(matches!(config.supabase(), Err(CliError::NotConfigured)));
}

#[test]
fn apply_init_keeps_existing_values_and_validates_url() {
    let updated = apply_init(configured(), None, Some("new-key".to_string()), None).unwrap();
    assert_eq!(updated.supabase_url.as_deref(), Some("https://demo.supabase.co"));
    assert_eq!(updated.supabase_anon_key.as_deref(), Some("new-key"));

    let error = apply_init(configured(), Some("demo.supabase.co".to_string()), None, None);
    assert!(matches!(error, Err(CliError::Config(_))));
}

#[test]
fn describe_config_redacts_anon_key() {
    let lines = describe_config(&configured(), &PathBuf::from("/etc/quicksale.json"));
    let joined = lines.join("\n");
    assert!(joined.contains("https://demo.supabase.co"));
    assert!(joined.contains("[REDACTED]"));
    assert!(!joined.contains("anon-key"));
}

#[tokio::test(flavor = "current_thread")]
async fn offline_sale_is_reported_as_pending() {
    let context = offline_context();
    let outcome = context
        .coordinator
        .record_sale(&SaleInput::new("Milk", dec!(2), dec!(50)), context.connectivity)
        .await
        .unwrap();

    let message = format_record_outcome(&outcome);
    assert!(message.starts_with("saved locally, will sync"));
    assert!(message.ends_with("(offline)"));

    let report = pending_report(&context).await.unwrap();
    assert_eq!(report.count, 1);
    assert_eq!(report.sales[0].sku_name, "Milk");
    assert_eq!(report.sales[0].total_amount, dec!(100));
    assert_eq!(report.sales[0].id, outcome.record().id().to_string());
}

#[tokio::test(flavor = "current_thread")]
async fn offline_context_skips_remote_commands() {
    let context = offline_context();

    context.startup_flush().await.unwrap();
    run_flush(&context).await.unwrap();
    assert!(matches!(fetch_today(&context).await, Err(CliError::Offline)));
}

#[tokio::test(flavor = "current_thread")]
async fn unconfigured_context_keeps_sales_locally() {
    let dir = tempfile::tempdir().unwrap();
    let options = ContextOptions {
        db_path: dir.path().join("queue.db"),
        force_offline: false,
    };
    let context = AppContext::open(&CliConfig::default(), &options).await.unwrap();
    assert_eq!(context.connectivity, Connectivity::Offline);

    let outcome = context
        .coordinator
        .record_sale(&SaleInput::new("Milk", dec!(1), dec!(50)), context.connectivity)
        .await
        .unwrap();
    assert!(!outcome.is_committed());
    assert_eq!(context.coordinator.pending_count(), 1);

    context.startup_flush().await.unwrap();
    assert!(matches!(run_flush(&context).await, Err(CliError::NotConfigured)));
    assert!(matches!(fetch_today(&context).await, Err(CliError::NotConfigured)));
}

#[test]
fn flush_outcomes_format_counts() {
    assert_eq!(
        format_flush_outcome(&FlushOutcome::Flushed { count: 3 }),
        "Synced 3 offline sales"
    );
    assert_eq!(
        format_flush_outcome(&FlushOutcome::NothingToFlush),
        "Nothing to sync"
    );
    assert_eq!(
        format_flush_outcome(&FlushOutcome::FlushFailed {
            pending: 1,
            error: RemoteError::Timeout,
        }),
        format!("Sync failed, 1 sale still pending: {}", RemoteError::Timeout)
    );
}

#[test]
fn sale_item_prefers_client_sale_id() {
    let client_id = SaleId::new();
    let mut row = SaleRow {
        id: Some(7),
        client_sale_id: Some(client_id),
        sku_name: "Rice".to_string(),
        quantity: dec!(0.5),
        price_per_unit: dec!(20),
        total_amount: dec!(10),
        sale_timestamp: chrono::Utc::now(),
    };
    assert_eq!(SaleItem::from(&row).id, client_id.to_string());

    row.client_sale_id = None;
    assert_eq!(SaleItem::from(&row).id, "7");
}

#[test]
fn sku_line_shows_status() {
    let sku = Sku {
        id: 3,
        sku_name: "Eggs".to_string(),
        is_active: false,
        created_at: None,
    };
    let line = format_sku_line(&sku);
    assert!(line.contains("Eggs"));
    assert!(line.ends_with("disabled"));
}

#[test]
fn publish_connectivity_only_signals_changes() {
    let (sender, receiver) = watch::channel(Connectivity::Offline);

    assert!(!publish_connectivity(&sender, Connectivity::Offline));
    assert!(publish_connectivity(&sender, Connectivity::Online));
    assert_eq!(*receiver.borrow(), Connectivity::Online);
}

#[test]
fn write_export_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reports").join("today_sales.csv");

    write_export(&path, "SKU Name,Quantity").unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "SKU Name,Quantity");
}

#[test]
fn completions_name_the_binary() {
    let script = String::from_utf8(render_completions(CompletionShell::Bash)).unwrap();
    assert!(script.contains("quicksale"));
}
