use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::Workbook;
use thiserror::Error;

use crate::models::Entry;

pub const SHEET_NAME: &str = "TrainingData";

/// Column order mirrors the Entry fields. Import looks columns up by these
/// exact names, case-sensitive.
const HEADERS: [&str; 6] = ["week", "exercise", "weight", "reps", "rir", "e1rm"];

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("could not build workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),
    #[error("could not read workbook: {0}")]
    Read(#[from] calamine::XlsxError),
    #[error("workbook has no sheets")]
    NoSheet,
}

/// Serialize the full sequence into one `TrainingData` sheet and return the
/// finished `.xlsx` bytes.
pub fn export_workbook(entries: &[Entry]) -> Result<Vec<u8>, SheetError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write(0, col as u16, *header)?;
    }

    for (row, entry) in entries.iter().enumerate() {
        let row = row as u32 + 1;
        sheet.write(row, 0, entry.week)?;
        sheet.write(row, 1, entry.exercise.as_str())?;
        sheet.write(row, 2, entry.weight)?;
        sheet.write(row, 3, entry.reps)?;
        sheet.write(row, 4, entry.rir)?;
        sheet.write(row, 5, entry.e1rm)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Parse the first sheet of `bytes` into entries. Columns are located by
/// exact header name; a missing column leaves its field zero/empty, extra
/// columns are ignored, cells coerce permissively. Rows are never rejected.
pub fn import_workbook(bytes: &[u8]) -> Result<Vec<Entry>, SheetError> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))?;
    let range = workbook.worksheet_range_at(0).ok_or(SheetError::NoSheet)??;

    let mut rows = range.rows();
    let columns: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(header_text).collect(),
        None => return Ok(Vec::new()),
    };
    let column = |name: &str| columns.iter().position(|c| c == name);

    let week = column("week");
    let exercise = column("exercise");
    let weight = column("weight");
    let reps = column("reps");
    let rir = column("rir");
    let e1rm = column("e1rm");

    let mut entries = Vec::new();
    for row in rows {
        entries.push(Entry {
            week: cell_i32(row, week),
            exercise: cell_string(row, exercise),
            weight: cell_f64(row, weight),
            reps: cell_i32(row, reps),
            rir: cell_i32(row, rir),
            e1rm: cell_f64(row, e1rm),
        });
    }
    Ok(entries)
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn cell<'a>(row: &'a [Data], col: Option<usize>) -> Option<&'a Data> {
    col.and_then(|c| row.get(c))
}

fn cell_f64(row: &[Data], col: Option<usize>) -> f64 {
    match cell(row, col) {
        Some(Data::Float(f)) => *f,
        Some(Data::Int(i)) => *i as f64,
        Some(Data::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn cell_i32(row: &[Data], col: Option<usize>) -> i32 {
    cell_f64(row, col) as i32
}

fn cell_string(row: &[Data], col: Option<usize>) -> String {
    match cell(row, col) {
        Some(Data::String(s)) => s.clone(),
        Some(Data::Float(f)) => f.to_string(),
        Some(Data::Int(i)) => i.to_string(),
        _ => String::new(),
    }
}
