//! Supabase (PostgREST) client for the sales and SKU tables.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{RemoteError, RemoteResult, RemoteStore};
use crate::config::{SupabaseConfig, SyncSettings};
use crate::models::{NewSku, SaleId, SaleRecord, SaleRow, Sku};
use crate::util::compact_text;

const SALES_TABLE: &str = "quick_sales";
const SKUS_TABLE: &str = "retail_skus";
const CLIENT_ID_COLUMN: &str = "client_sale_id";

#[derive(Clone)]
pub struct SupabaseStore {
    config: SupabaseConfig,
    client: reqwest::Client,
    idempotent_inserts: bool,
}

impl SupabaseStore {
    pub fn new(config: SupabaseConfig, settings: &SyncSettings) -> RemoteResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.remote_timeout)
            .build()
            .map_err(|error| RemoteError::InvalidConfiguration(error.to_string()))?;
        Ok(Self {
            config,
            client,
            idempotent_inserts: settings.idempotent_inserts,
        })
    }

    /// Reachability check: any HTTP answer at all counts as online.
    pub async fn probe(&self) -> bool {
        match self
            .request(Method::GET, format!("{}/", self.config.rest_url()))
            .send()
            .await
        {
            Ok(response) => {
                tracing::debug!("Connectivity probe answered with {}", response.status());
                true
            }
            Err(error) => {
                tracing::debug!("Connectivity probe failed: {error}");
                false
            }
        }
    }

    /// Active SKUs ordered by name, for the sale picker.
    pub async fn list_active_skus(&self) -> RemoteResult<Vec<Sku>> {
        let response = self
            .request(Method::GET, self.table_url(SKUS_TABLE))
            .query(&[
                ("select", "*"),
                ("is_active", "eq.true"),
                ("order", "sku_name"),
            ])
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }

    /// Every SKU, newest first.
    pub async fn list_skus(&self) -> RemoteResult<Vec<Sku>> {
        let response = self
            .request(Method::GET, self.table_url(SKUS_TABLE))
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }

    pub async fn add_sku(&self, sku_name: &str) -> RemoteResult<()> {
        let payload = NewSku::new(sku_name).ok_or_else(|| {
            RemoteError::InvalidRequest("SKU name must not be empty".to_string())
        })?;

        let response = self
            .request(Method::POST, self.table_url(SKUS_TABLE))
            .header("Prefer", "return=minimal")
            .json(&payload)
            .send()
            .await?;
        check_status(response).await?;
        tracing::info!("Added SKU {}", payload.sku_name);
        Ok(())
    }

    pub async fn set_sku_active(&self, id: i64, is_active: bool) -> RemoteResult<()> {
        #[derive(Serialize)]
        struct ActivePatch {
            is_active: bool,
        }

        let response = self
            .request(Method::PATCH, self.table_url(SKUS_TABLE))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=minimal")
            .json(&ActivePatch { is_active })
            .send()
            .await?;
        check_status(response).await?;
        tracing::info!("SKU {id} active={is_active}");
        Ok(())
    }

    /// Sales recorded at or after `since`, newest first.
    pub async fn list_sales_since(&self, since: DateTime<Utc>) -> RemoteResult<Vec<SaleRow>> {
        let response = self
            .request(Method::GET, self.table_url(SALES_TABLE))
            .query(&[
                ("select", "*".to_string()),
                ("sale_timestamp", sale_timestamp_filter(since)),
                ("order", "sale_timestamp.desc".to_string()),
            ])
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{table}", self.config.rest_url())
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&self.config.anon_key)
            .header("Accept", "application/json")
    }

    /// Row written to `quick_sales`. The client id column only exists on
    /// tables prepared for idempotent inserts, so it is omitted otherwise.
    fn insert_row<'a>(&self, record: &'a SaleRecord) -> SaleInsert<'a> {
        SaleInsert {
            client_sale_id: self.idempotent_inserts.then_some(record.id()),
            sku_name: record.sku_name(),
            quantity: record.quantity(),
            price_per_unit: record.price_per_unit(),
            total_amount: record.total_amount(),
            sale_timestamp: record.sale_timestamp(),
        }
    }

    fn insert_request<T: Serialize + ?Sized>(&self, body: &T) -> RequestBuilder {
        let request = self.request(Method::POST, self.table_url(SALES_TABLE));
        let request = if self.idempotent_inserts {
            request
                .query(&[("on_conflict", CLIENT_ID_COLUMN)])
                .header("Prefer", "return=minimal,resolution=ignore-duplicates")
        } else {
            request.header("Prefer", "return=minimal")
        };
        request.json(body)
    }

    async fn insert_sales<T: Serialize + ?Sized + Sync>(&self, body: &T) -> RemoteResult<()> {
        let response = self.insert_request(body).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

impl RemoteStore for SupabaseStore {
    async fn insert_one(&self, record: &SaleRecord) -> RemoteResult<()> {
        self.insert_sales(&self.insert_row(record)).await
    }

    async fn insert_many(&self, records: &[SaleRecord]) -> RemoteResult<()> {
        let rows: Vec<SaleInsert<'_>> = records
            .iter()
            .map(|record| self.insert_row(record))
            .collect();
        // PostgREST inserts a JSON array in one statement, so it commits atomically
        self.insert_sales(rows.as_slice()).await
    }
}

#[derive(Debug, Serialize)]
struct SaleInsert<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    client_sale_id: Option<SaleId>,
    sku_name: &'a str,
    quantity: Decimal,
    price_per_unit: Decimal,
    total_amount: Decimal,
    sale_timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    message: Option<String>,
    error: Option<String>,
    details: Option<String>,
}

async fn check_status(response: Response) -> RemoteResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::Api {
        status: status.as_u16(),
        message: parse_api_error(status, &body),
    })
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<PostgrestErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return match payload.details.filter(|details| !details.trim().is_empty()) {
                Some(details) => format!("{} - {}", message.trim(), compact_text(&details)),
                None => message.trim().to_string(),
            };
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        compact_text(trimmed)
    }
}

fn sale_timestamp_filter(since: DateTime<Utc>) -> String {
    format!("gte.{}", since.to_rfc3339_opts(SecondsFormat::Millis, true))
}
