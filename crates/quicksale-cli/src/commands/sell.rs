use quicksale_core::SaleInput;
use rust_decimal::Decimal;

use crate::commands::common::{format_record_outcome, AppContext};
use crate::error::CliError;

pub async fn run_sell(
    context: &AppContext,
    sku: &str,
    quantity: Decimal,
    price: Decimal,
) -> Result<(), CliError> {
    let input = SaleInput::new(sku, quantity, price);
    let outcome = context
        .coordinator
        .record_sale(&input, context.connectivity)
        .await?;

    println!("{}", format_record_outcome(&outcome));
    if !outcome.is_committed() {
        println!("{} pending", context.coordinator.pending_count());
    }
    Ok(())
}
