//! File parsing for word lists (spreadsheets and CSV)

use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::path::Path;

/// Header row plus data rows, every cell rendered as text
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Read the first sheet (or the CSV body) of a word list
pub fn read_table(path: &Path) -> Result<RawTable, String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xlsm" | "xls" | "ods" => read_workbook(path),
        "csv" => read_csv(path),
        _ => Err(format!("Unsupported file format: .{}", extension)),
    }
}

fn read_workbook(path: &Path) -> Result<RawTable, String> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| format!("Failed to open spreadsheet: {}", e))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or("No sheets found in spreadsheet")?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format!("Failed to read sheet '{}': {}", sheet_name, e))?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .ok_or("Empty sheet - no header row")?
        .iter()
        .map(get_cell_string)
        .collect();

    let rows = rows
        .map(|row| row.iter().map(get_cell_string).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

fn read_csv(path: &Path) -> Result<RawTable, String> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| format!("Failed to open CSV file: {}", e))?;

    let headers = reader
        .headers()
        .map_err(|e| format!("Failed to read CSV headers: {}", e))?
        .iter()
        .map(|s| s.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| format!("Failed to read CSV row: {}", e))?;
        rows.push(record.iter().map(|s| s.trim().to_string()).collect());
    }

    Ok(RawTable { headers, rows })
}

/// Helper to extract string from a spreadsheet cell
fn get_cell_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}
