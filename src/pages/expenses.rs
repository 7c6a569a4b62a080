use chrono::NaiveDate;

use crate::api::Api;
use crate::error::{AppError, Result};
use crate::fmt;
use crate::models::{Expense, ExpenseInput};
use crate::pages::crud::{required, Resource};

pub struct Expenses;

impl Resource for Expenses {
    type Item = Expense;
    type Payload = ExpenseInput;

    const SINGULAR: &'static str = "expense";
    const PLURAL: &'static str = "expenses";
    const HEADERS: &'static [&'static str] = &["ID", "Title", "Category", "Amount", "Expense Date"];
    const FIELDS: &'static [&'static str] = &["Title", "Amount", "Category", "Expense Date"];

    fn id(item: &Expense) -> i64 {
        item.id
    }

    fn row(item: &Expense) -> Vec<String> {
        vec![
            item.id.to_string(),
            item.title.clone(),
            item.category.clone(),
            fmt::amount(item.amount),
            fmt::date(item.expense_date.as_deref()),
        ]
    }

    fn label(item: &Expense) -> String {
        item.title.clone()
    }

    fn form_values(item: &Expense) -> Vec<String> {
        vec![
            item.title.clone(),
            item.amount.map(|a| a.to_string()).unwrap_or_default(),
            item.category.clone(),
            fmt::date(item.expense_date.as_deref()),
        ]
    }

    fn payload(values: &[String]) -> Result<ExpenseInput> {
        let v = required(values, Self::FIELDS)?;
        let amount: f64 = v[1]
            .parse()
            .ok()
            .filter(|a: &f64| a.is_finite())
            .ok_or_else(|| AppError::Validation(format!("Amount '{}' is not a number", v[1])))?;
        let date = NaiveDate::parse_from_str(v[3], "%Y-%m-%d").map_err(|_| {
            AppError::Validation(format!("Expense date '{}' must be YYYY-MM-DD", v[3]))
        })?;
        Ok(ExpenseInput {
            title: v[0].to_string(),
            amount,
            category: v[2].to_string(),
            expense_date: date.format("%Y-%m-%d").to_string(),
        })
    }

    fn list(api: &dyn Api) -> Result<Vec<Expense>> {
        api.list_expenses()
    }

    fn create(api: &dyn Api, payload: &ExpenseInput) -> Result<()> {
        api.create_expense(payload).map(|_| ())
    }

    fn update(api: &dyn Api, id: i64, payload: &ExpenseInput) -> Result<()> {
        api.update_expense(id, payload).map(|_| ())
    }

    fn delete(api: &dyn Api, id: i64) -> Result<()> {
        api.delete_expense(id)
    }
}
