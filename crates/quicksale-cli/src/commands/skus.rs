use quicksale_core::models::{NewSku, Sku};
use quicksale_core::remote::SupabaseStore;

use crate::cli::SkuCommands;
use crate::commands::common::{format_sku_line, print_json, AppContext};
use crate::error::CliError;

pub async fn run_skus(context: &AppContext, command: SkuCommands) -> Result<(), CliError> {
    let remote = context.require_online()?;
    match command {
        SkuCommands::List { all, json } => {
            let skus = list_skus(remote, all).await?;
            if json {
                return print_json(&skus);
            }
            if skus.is_empty() {
                println!("No SKUs found");
            }
            for sku in &skus {
                println!("{}", format_sku_line(sku));
            }
        }
        SkuCommands::Add { name } => {
            let sku = NewSku::new(&name).ok_or(CliError::EmptySkuName)?;
            remote.add_sku(&sku.sku_name).await?;
            println!("Added {}", sku.sku_name);
        }
        SkuCommands::Enable { id } => {
            remote.set_sku_active(id, true).await?;
            println!("Enabled SKU {id}");
        }
        SkuCommands::Disable { id } => {
            remote.set_sku_active(id, false).await?;
            println!("Disabled SKU {id}");
        }
    }
    Ok(())
}

async fn list_skus(remote: &SupabaseStore, all: bool) -> Result<Vec<Sku>, CliError> {
    let skus = if all {
        remote.list_skus().await?
    } else {
        remote.list_active_skus().await?
    };
    Ok(skus)
}
