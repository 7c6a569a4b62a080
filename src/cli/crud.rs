use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::api::Api;
use crate::cli::{confirm, report};
use crate::error::{AppError, Result};
use crate::pages::crud::{CrudPage, Resource};

fn loaded<R: Resource>(api: &dyn Api) -> Result<CrudPage<R>> {
    let mut page = CrudPage::<R>::new();
    page.load(api);
    report(page.notice())?;
    Ok(page)
}

fn not_found<R: Resource>(id: i64) -> AppError {
    AppError::Other(format!("No {} with ID {id}", R::SINGULAR))
}

pub fn list<R: Resource>(api: &dyn Api) -> Result<()> {
    let page = loaded::<R>(api)?;
    if page.items().is_empty() {
        println!("{}", CrudPage::<R>::empty_message());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(R::HEADERS.to_vec());
    for item in page.items() {
        table.add_row(R::row(item).into_iter().map(Cell::new).collect::<Vec<_>>());
    }
    println!("{table}");
    Ok(())
}

/// `values` are in form-field order.
pub fn add<R: Resource>(api: &dyn Api, values: &[String]) -> Result<()> {
    let mut page = CrudPage::<R>::new();
    page.open_create();
    for (i, value) in values.iter().enumerate() {
        page.set_value(i, value);
    }
    if !page.submit(api) {
        report(page.notice())?;
        return Err(AppError::Other(format!("Failed to save {}", R::SINGULAR)));
    }
    println!("{} {}", "Added".green(), R::SINGULAR);
    Ok(())
}

/// `overrides` are in form-field order; `None` keeps the stored value.
pub fn update<R: Resource>(api: &dyn Api, id: i64, overrides: &[Option<String>]) -> Result<()> {
    let mut page = loaded::<R>(api)?;
    if !page.open_edit(id) {
        return Err(not_found::<R>(id));
    }
    for (i, value) in overrides.iter().enumerate() {
        if let Some(v) = value {
            page.set_value(i, v);
        }
    }
    if !page.submit(api) {
        report(page.notice())?;
        return Err(AppError::Other(format!("Failed to save {}", R::SINGULAR)));
    }
    println!("{} {} {id}", "Updated".green(), R::SINGULAR);
    Ok(())
}

pub fn delete<R: Resource>(api: &dyn Api, id: i64, yes: bool) -> Result<()> {
    let mut page = loaded::<R>(api)?;
    let label = page.item(id).map(R::label).ok_or_else(|| not_found::<R>(id))?;
    page.request_delete(id);
    let prompt = page.delete_prompt().unwrap_or_default();

    let confirmed = confirm(&format!("{prompt} ({label})"), yes)?;
    page.confirm_delete(api, confirmed);
    report(page.notice())?;
    if confirmed {
        println!("{} {} {label}", "Deleted".red(), R::SINGULAR);
    } else {
        println!("Cancelled.");
    }
    Ok(())
}
