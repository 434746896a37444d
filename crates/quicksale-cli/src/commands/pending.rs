use serde::Serialize;

use crate::commands::common::{format_sale_line, print_json, AppContext, SaleItem};
use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct PendingReport {
    pub count: usize,
    pub sales: Vec<SaleItem>,
}

pub async fn pending_report(context: &AppContext) -> Result<PendingReport, CliError> {
    let records = context.coordinator.pending_records().await?;
    Ok(PendingReport {
        count: records.len(),
        sales: records.iter().map(SaleItem::from).collect(),
    })
}

pub async fn run_pending(context: &AppContext, json: bool) -> Result<(), CliError> {
    let report = pending_report(context).await?;
    if json {
        return print_json(&report);
    }

    if report.count == 0 {
        println!("No sales waiting to sync");
        return Ok(());
    }

    for sale in &report.sales {
        println!("{}", format_sale_line(sale));
    }
    println!("{} pending", report.count);
    Ok(())
}
