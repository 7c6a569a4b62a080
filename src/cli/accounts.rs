use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::api::Api;
use crate::error::{AppError, Result};
use crate::fmt;
use crate::models::{AccountType, NewAccount};

pub fn add(api: &dyn Api, name: &str, account_type: AccountType) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Account name is required".into()));
    }
    let account = api
        .create_account(&NewAccount {
            account_name: name.to_string(),
            account_type,
        })
        .map_err(|e| AppError::Other(e.notice_text("Failed to create account")))?;
    tracing::info!("created account {} ({})", account.account_name, account.id);
    println!(
        "{} account: {} ({}) [ID {}]",
        "Added".green(),
        account.account_name,
        account.account_type,
        account.id
    );
    Ok(())
}

pub fn list(api: &dyn Api) -> Result<()> {
    let accounts = api
        .list_accounts()
        .map_err(|e| AppError::Other(e.notice_text("Failed to load accounts")))?;
    if accounts.is_empty() {
        println!("No accounts found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Type", "Created At"]);
    for a in accounts {
        table.add_row(vec![
            Cell::new(a.id),
            Cell::new(a.account_name),
            Cell::new(a.account_type),
            Cell::new(fmt::timestamp(a.created_at.as_deref())),
        ]);
    }
    println!("Accounts\n{table}");
    Ok(())
}
