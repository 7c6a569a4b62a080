use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::api::Api;
use crate::cli::{confirm, report};
use crate::error::{AppError, Result};
use crate::pages::expense_files::{DownloadOutcome, ExpenseFilesPage, EMPTY_MESSAGE};
use crate::preview::preview_file;

/// Build the page for an upload without touching the network, so bad input
/// fails even when the backend is unreachable.
fn upload_page(path: Option<&Path>, user: Option<i64>, account: Option<i64>) -> Result<ExpenseFilesPage> {
    let mut page = ExpenseFilesPage::new();
    page.select_user(user);
    page.select_account(account);
    if let Some(p) = path {
        page.choose_file(p);
    }
    page.validate()?;
    Ok(page)
}

pub fn upload(
    api: &dyn Api,
    path: Option<&Path>,
    user: Option<i64>,
    account: Option<i64>,
) -> Result<()> {
    let mut page = upload_page(path, user, account)?;
    let Some(request) = page.begin_upload() else {
        report(page.notice())?;
        return Err(AppError::Other("Upload failed".into()));
    };
    println!("{}", page.submit_label());
    page.finish_upload(api, request);
    report(page.notice())
}

pub fn list(api: &dyn Api) -> Result<()> {
    let mut page = ExpenseFilesPage::new();
    page.refresh_files(api);
    report(page.notice())?;

    let rows = page.rows();
    if rows.is_empty() {
        println!("{EMPTY_MESSAGE}");
        return Ok(());
    }
    let mut table = Table::new();
    table.set_header(vec!["ID", "File Name", "User", "Account", "Uploaded At"]);
    for r in rows {
        table.add_row(vec![
            Cell::new(r.id),
            Cell::new(r.file_name),
            Cell::new(r.user),
            Cell::new(r.account),
            Cell::new(r.uploaded_at),
        ]);
    }
    println!("Uploaded Files\n{table}");
    Ok(())
}

pub fn download(api: &dyn Api, id: i64, output_dir: &Path, yes: bool) -> Result<()> {
    let mut page = ExpenseFilesPage::new();
    page.refresh_files(api);
    report(page.notice())?;

    match page.download(api, id, output_dir) {
        DownloadOutcome::Saved(_) => report(page.notice()),
        DownloadOutcome::Failed => {
            report(page.notice())?;
            Err(AppError::Other("Download failed".into()))
        }
        DownloadOutcome::ConfirmRemoval => {
            let prompt = page.pending().map(|p| p.prompt()).unwrap_or_default();
            if !confirm(prompt, yes)? {
                page.confirm(api, false);
                println!("Record kept.");
                return Ok(());
            }
            page.confirm(api, true);
            report(page.notice())?;
            println!("{} record {id}", "Removed".red());
            Ok(())
        }
    }
}

pub fn delete(api: &dyn Api, id: i64, yes: bool) -> Result<()> {
    let mut page = ExpenseFilesPage::new();
    page.refresh_files(api);
    report(page.notice())?;

    page.request_delete(id);
    let Some(pending) = page.pending().cloned() else {
        return Err(AppError::Other(format!("No file with ID {id}")));
    };
    let confirmed = confirm(pending.prompt(), yes)?;
    page.confirm(api, confirmed);
    report(page.notice())?;
    if confirmed {
        println!("{} file {id}", "Deleted".red());
    } else {
        println!("Cancelled.");
    }
    Ok(())
}

pub fn preview(path: &Path, rows: usize) -> Result<()> {
    let p = preview_file(path, rows)?;
    let mut table = Table::new();
    table.set_header(p.headers.clone());
    for row in &p.rows {
        table.add_row(row.clone());
    }
    println!("{table}");
    println!("Showing {} of {} rows", p.rows.len(), p.total_rows);
    Ok(())
}
