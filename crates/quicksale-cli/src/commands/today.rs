use chrono::Utc;
use quicksale_core::export::DailySales;
use quicksale_core::util::local_day_start;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::commands::common::{format_sale_line, print_json, AppContext, SaleItem};
use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct TodayReport {
    pub count: usize,
    pub total: Decimal,
    pub sales: Vec<SaleItem>,
}

impl From<&DailySales> for TodayReport {
    fn from(daily: &DailySales) -> Self {
        Self {
            count: daily.rows.len(),
            total: daily.total,
            sales: daily.rows.iter().map(SaleItem::from).collect(),
        }
    }
}

/// Sales the server has recorded since local midnight, newest first.
pub async fn fetch_today(context: &AppContext) -> Result<DailySales, CliError> {
    let rows = context
        .require_online()?
        .list_sales_since(local_day_start(Utc::now()))
        .await?;
    Ok(DailySales::from_rows(rows))
}

pub async fn run_today(context: &AppContext, json: bool) -> Result<(), CliError> {
    let daily = fetch_today(context).await?;
    let report = TodayReport::from(&daily);
    if json {
        return print_json(&report);
    }

    if report.count == 0 {
        println!("No sales recorded today");
    } else {
        for sale in &report.sales {
            println!("{}", format_sale_line(sale));
        }
    }
    println!("Total: {:.2}", report.total);

    let pending = context.coordinator.pending_count();
    if pending > 0 {
        println!("({pending} offline not yet synced)");
    }
    Ok(())
}
