use std::path::Path;

use quicksale_core::export::{render_sales_csv, DEFAULT_EXPORT_FILE_NAME};

use crate::commands::common::AppContext;
use crate::commands::today::fetch_today;
use crate::error::CliError;

pub async fn run_export(context: &AppContext, output_path: Option<&Path>) -> Result<(), CliError> {
    let daily = fetch_today(context).await?;
    let Some(csv) = render_sales_csv(&daily.rows) else {
        println!("No sales to export");
        return Ok(());
    };

    let path = output_path.unwrap_or_else(|| Path::new(DEFAULT_EXPORT_FILE_NAME));
    write_export(path, &csv)?;
    println!("{}", path.display());
    Ok(())
}

pub fn write_export(path: &Path, csv: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, csv)?;
    Ok(())
}
