use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use quicksale_core::models::{SaleRow, Sku};
use quicksale_core::remote::{RemoteError, RemoteResult, RemoteStore, SupabaseStore};
use quicksale_core::storage::SqliteStore;
use quicksale_core::sync::{
    AutoFlush, Connectivity, FlushOutcome, QueueReason, RecordOutcome, SyncCoordinator,
};
use quicksale_core::SaleRecord;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::CliConfig;
use crate::error::CliError;

pub type Coordinator = SyncCoordinator<SqliteStore, SalesRemote>;

/// Remote side of the coordinator. Without Supabase settings every write
/// fails, so sales land in the local queue until the CLI is configured.
#[derive(Clone)]
pub enum SalesRemote {
    Supabase(SupabaseStore),
    Unconfigured,
}

impl SalesRemote {
    const fn store(&self) -> Option<&SupabaseStore> {
        match self {
            Self::Supabase(store) => Some(store),
            Self::Unconfigured => None,
        }
    }
}

impl RemoteStore for SalesRemote {
    async fn insert_one(&self, record: &SaleRecord) -> RemoteResult<()> {
        match self {
            Self::Supabase(store) => store.insert_one(record).await,
            Self::Unconfigured => Err(unconfigured_remote()),
        }
    }

    async fn insert_many(&self, records: &[SaleRecord]) -> RemoteResult<()> {
        match self {
            Self::Supabase(store) => store.insert_many(records).await,
            Self::Unconfigured => Err(unconfigured_remote()),
        }
    }
}

fn unconfigured_remote() -> RemoteError {
    RemoteError::InvalidConfiguration("Supabase URL and anon key are not set".to_string())
}

pub struct ContextOptions {
    pub db_path: PathBuf,
    pub force_offline: bool,
}

/// Everything a command needs: the coordinator over the local queue, the
/// remote client for catalog and reporting reads, and the connectivity
/// observed at startup.
pub struct AppContext {
    pub coordinator: Arc<Coordinator>,
    pub remote: SalesRemote,
    pub connectivity: Connectivity,
}

impl AppContext {
    pub async fn open(config: &CliConfig, options: &ContextOptions) -> Result<Self, CliError> {
        let remote = match config.supabase_if_configured()? {
            Some(supabase) => SalesRemote::Supabase(SupabaseStore::new(supabase, &config.sync)?),
            None => {
                tracing::warn!("Supabase is not configured; sales are kept locally");
                SalesRemote::Unconfigured
            }
        };
        let store = SqliteStore::open(&options.db_path)?;
        let coordinator = SyncCoordinator::open(store, remote.clone(), config.sync)?;

        let connectivity = match remote.store() {
            Some(store) if !options.force_offline => Connectivity::from_online(store.probe().await),
            _ => Connectivity::Offline,
        };
        tracing::debug!(
            "Opened queue at {} ({connectivity:?})",
            options.db_path.display()
        );

        Ok(Self {
            coordinator: Arc::new(coordinator),
            remote,
            connectivity,
        })
    }

    /// Flush whatever a previous run left behind before doing anything else.
    pub async fn startup_flush(&self) -> Result<(), CliError> {
        let outcome = AutoFlush::new(Arc::clone(&self.coordinator))
            .on_startup(self.connectivity)
            .await?;
        if let FlushOutcome::Flushed { .. } | FlushOutcome::FlushFailed { .. } = outcome {
            eprintln!("{}", format_flush_outcome(&outcome));
        }
        Ok(())
    }

    /// The Supabase client, for commands that cannot run without one.
    pub fn supabase(&self) -> Result<&SupabaseStore, CliError> {
        self.remote.store().ok_or(CliError::NotConfigured)
    }

    /// The Supabase client, provided the server answered at startup.
    pub fn require_online(&self) -> Result<&SupabaseStore, CliError> {
        let store = self.supabase()?;
        if self.connectivity.is_online() {
            Ok(store)
        } else {
            Err(CliError::Offline)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SaleItem {
    pub id: String,
    pub sku_name: String,
    pub quantity: Decimal,
    pub price_per_unit: Decimal,
    pub total_amount: Decimal,
    pub sale_timestamp: DateTime<Utc>,
}

impl From<&SaleRecord> for SaleItem {
    fn from(record: &SaleRecord) -> Self {
        Self {
            id: record.id().to_string(),
            sku_name: record.sku_name().to_string(),
            quantity: record.quantity(),
            price_per_unit: record.price_per_unit(),
            total_amount: record.total_amount(),
            sale_timestamp: record.sale_timestamp(),
        }
    }
}

impl From<&SaleRow> for SaleItem {
    fn from(row: &SaleRow) -> Self {
        let id = row
            .client_sale_id
            .map(|id| id.to_string())
            .or_else(|| row.id.map(|id| id.to_string()))
            .unwrap_or_default();
        Self {
            id,
            sku_name: row.sku_name.clone(),
            quantity: row.quantity,
            price_per_unit: row.price_per_unit,
            total_amount: row.total_amount,
            sale_timestamp: row.sale_timestamp,
        }
    }
}

pub fn format_record_outcome(outcome: &RecordOutcome) -> String {
    let record = outcome.record();
    match outcome {
        RecordOutcome::Committed(_) => format!(
            "committed {} ({} x {} = {})",
            record.id(),
            record.quantity(),
            record.price_per_unit(),
            record.total_amount()
        ),
        RecordOutcome::QueuedLocally { reason, .. } => {
            let detail = match reason {
                QueueReason::Offline => "offline".to_string(),
                QueueReason::RemoteFailed(error) => error.to_string(),
            };
            format!("saved locally, will sync {} ({detail})", record.id())
        }
    }
}

pub fn format_flush_outcome(outcome: &FlushOutcome) -> String {
    match outcome {
        FlushOutcome::Flushed { count } => format!("Synced {count} offline {}", plural(*count)),
        FlushOutcome::NothingToFlush => "Nothing to sync".to_string(),
        FlushOutcome::FlushFailed { pending, error } => {
            format!("Sync failed, {pending} {} still pending: {error}", plural(*pending))
        }
    }
}

pub fn format_sale_line(item: &SaleItem) -> String {
    format!(
        "{}  {:<24} {:>8} x {:>10} = {:>10}",
        item.sale_timestamp.with_timezone(&Local).format("%H:%M:%S"),
        item.sku_name,
        item.quantity,
        item.price_per_unit,
        item.total_amount
    )
}

pub fn format_sku_line(sku: &Sku) -> String {
    let status = if sku.is_active { "active" } else { "disabled" };
    format!("{:>6}  {:<32} {status}", sku.id, sku.sku_name)
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

const fn plural(count: usize) -> &'static str {
    if count == 1 {
        "sale"
    } else {
        "sales"
    }
}
