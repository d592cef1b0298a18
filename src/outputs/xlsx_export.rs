use super::{ensure_parent_dir, tabulate};
use crate::models::ListingRecord;
use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use serde_json::Value;
use std::path::Path;

const SHEET_NAME: &str = "listings";

/// Write listings as a single-sheet workbook, one column per field.
///
/// No records gives an empty sheet.
pub async fn export_xlsx(listings: &[ListingRecord], path: &Path) -> Result<()> {
    ensure_parent_dir(path).await?;

    let bytes = render_xlsx(listings)?;
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn render_xlsx(listings: &[ListingRecord]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    if !listings.is_empty() {
        let (header, rows) = tabulate(listings)?;
        let bold = Format::new().set_bold();

        for (col, key) in header.iter().enumerate() {
            let col = u16::try_from(col).context("Too many spreadsheet columns")?;
            worksheet.write_string_with_format(0, col, key, &bold)?;
        }

        for (idx, row) in rows.iter().enumerate() {
            let line = u32::try_from(idx + 1).context("Too many spreadsheet rows")?;
            for (col, key) in header.iter().enumerate() {
                let col = u16::try_from(col).context("Too many spreadsheet columns")?;
                write_cell(worksheet, line, col, row.get(key))?;
            }
        }
    }

    workbook
        .save_to_buffer()
        .context("Failed to render spreadsheet")
}

/// Numbers and booleans keep their type, lists are written as JSON text
fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, value: Option<&Value>) -> Result<()> {
    match value {
        None | Some(Value::Null) => {}
        Some(Value::String(s)) => {
            worksheet.write_string(row, col, s)?;
        }
        Some(Value::Bool(b)) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        Some(Value::Number(n)) => match n.as_f64() {
            Some(n) => {
                worksheet.write_number(row, col, n)?;
            }
            None => {
                worksheet.write_string(row, col, n.to_string())?;
            }
        },
        Some(other) => {
            worksheet.write_string(row, col, other.to_string())?;
        }
    }
    Ok(())
}
