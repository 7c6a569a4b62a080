use std::path::Path;

use crate::error::{AppError, Result};
use crate::pages::expense_files::has_allowed_extension;

/// First rows of a local statement, read before it is uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Data rows in the whole file, not just the ones shown.
    pub total_rows: usize,
}

pub fn preview_file(path: &Path, limit: usize) -> Result<Preview> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    if !has_allowed_extension(&name) {
        return Err(AppError::Validation("Only .csv and .xlsx files are allowed".into()));
    }
    let is_xlsx = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"));
    if is_xlsx {
        preview_xlsx(path, limit)
    } else {
        preview_csv(path, limit)
    }
}

fn preview_csv(path: &Path, limit: usize) -> Result<Preview> {
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));
    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut total_rows = 0;
    for result in rdr.records() {
        let record = result?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        total_rows += 1;
        if rows.len() < limit {
            rows.push(record.iter().map(|f| f.trim().to_string()).collect());
        }
    }
    Ok(Preview {
        headers,
        rows,
        total_rows,
    })
}

#[cfg(feature = "xlsx")]
fn preview_xlsx(path: &Path, limit: usize) -> Result<Preview> {
    use calamine::{Data, Reader};

    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|e| AppError::Spreadsheet(format!("Failed to open XLSX: {e}")))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::Spreadsheet("Workbook has no sheets".into()))?
        .map_err(|e| AppError::Spreadsheet(e.to_string()))?;

    let cell = |c: &Data| c.to_string().trim().to_string();
    let mut iter = range.rows();
    let headers: Vec<String> = iter
        .next()
        .map(|r| r.iter().map(cell).collect())
        .unwrap_or_default();

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut total_rows = 0;
    for row in iter {
        if row.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }
        total_rows += 1;
        if rows.len() < limit {
            rows.push(row.iter().map(cell).collect());
        }
    }
    Ok(Preview {
        headers,
        rows,
        total_rows,
    })
}

#[cfg(not(feature = "xlsx"))]
fn preview_xlsx(_path: &Path, _limit: usize) -> Result<Preview> {
    Err(AppError::Spreadsheet(
        "XLSX preview requires the `xlsx` feature".into(),
    ))
}
