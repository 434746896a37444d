//! Daily sales summary and CSV export helpers shared by front-ends.

use std::fmt::Write as _;

use chrono::{Local, TimeZone};
use rust_decimal::Decimal;

use crate::models::SaleRow;

/// Default file name for the daily CSV export
pub const DEFAULT_EXPORT_FILE_NAME: &str = "today_sales.csv";

const CSV_HEADERS: [&str; 5] = [
    "SKU Name",
    "Quantity",
    "Price Per Unit",
    "Total Amount",
    "Time",
];

/// Sales recorded since the start of the day, with their summed total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySales {
    pub rows: Vec<SaleRow>,
    pub total: Decimal,
}

impl DailySales {
    /// Sum stored totals; amounts are never recomputed from quantity and price.
    #[must_use]
    pub fn from_rows(rows: Vec<SaleRow>) -> Self {
        let total = rows
            .iter()
            .map(|row| row.total_amount)
            .fold(Decimal::ZERO, |sum, amount| sum + amount);
        Self { rows, total }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Render sales as CSV, formatting times in the local time zone.
///
/// Returns `None` when there is nothing to export.
#[must_use]
pub fn render_sales_csv(rows: &[SaleRow]) -> Option<String> {
    render_sales_csv_in(rows, &Local)
}

/// Render sales as CSV, formatting times in `tz`.
#[must_use]
pub fn render_sales_csv_in<Tz: TimeZone>(rows: &[SaleRow], tz: &Tz) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    if rows.is_empty() {
        return None;
    }

    let mut output = CSV_HEADERS.join(",");
    for row in rows {
        let time = row.sale_timestamp.with_timezone(tz).format("%H:%M:%S");
        let _ = write!(
            output,
            "\n{},{},{},{},{}",
            escape_csv_field(&row.sku_name),
            row.quantity,
            row.price_per_unit,
            row.total_amount,
            time
        );
    }

    Some(output)
}

fn escape_csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn row(name: &str, quantity: Decimal, price: Decimal, total: Decimal, hms: (u32, u32, u32)) -> SaleRow {
        SaleRow {
            id: None,
            client_sale_id: None,
            sku_name: name.to_string(),
            quantity,
            price_per_unit: price,
            total_amount: total,
            sale_timestamp: Utc
                .with_ymd_and_hms(2026, 10, 16, hms.0, hms.1, hms.2)
                .unwrap(),
        }
    }

    #[test]
    fn daily_sales_sums_stored_totals() {
        let daily = DailySales::from_rows(vec![
            row("Milk", dec!(2), dec!(50), dec!(100), (9, 0, 0)),
            row("Rice", dec!(0.5), dec!(20), dec!(10), (9, 5, 0)),
        ]);
        assert_eq!(daily.total, dec!(110));
        assert!(!daily.is_empty());
    }

    #[test]
    fn render_sales_csv_matches_column_layout() {
        let rows = vec![
            row("Milk", dec!(2), dec!(50), dec!(100.00), (9, 15, 0)),
            row("Rice", dec!(0.5), dec!(20), dec!(10.00), (18, 2, 30)),
        ];

        let csv = render_sales_csv_in(&rows, &Utc).unwrap();
        assert_eq!(
            csv,
            "SKU Name,Quantity,Price Per Unit,Total Amount,Time\n\
             Milk,2,50,100.00,09:15:00\n\
             Rice,0.5,20,10.00,18:02:30"
        );
    }

    #[test]
    fn render_sales_csv_quotes_awkward_names() {
        let rows = vec![row("Eggs, \"large\"", dec!(1), dec!(6), dec!(6), (7, 0, 0))];
        let csv = render_sales_csv_in(&rows, &Utc).unwrap();
        assert!(csv.ends_with("\"Eggs, \"\"large\"\"\",1,6,6,07:00:00"));
    }

    #[test]
    fn render_sales_csv_skips_empty_exports() {
        assert_eq!(render_sales_csv(&[]), None);
    }
}
