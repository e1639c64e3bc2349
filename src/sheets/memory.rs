//! In-process spreadsheet emulation.
//!
//! Holds a grid of string cells per sheet behind a mutex. Reads follow the
//! Sheets API shape: trailing empty cells and trailing empty rows are dropped,
//! interior empty rows come back as empty vectors. Data is lost on exit.

use std::sync::{Arc, Mutex};

use super::{A1Range, Rows, SheetsError};

#[derive(Debug, Default)]
struct Sheet {
    title: String,
    rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct MemorySheets {
    sheets: Arc<Mutex<Vec<Sheet>>>,
}

impl MemorySheets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_values(&self, range: &A1Range) -> Result<Rows, SheetsError> {
        let (c0, c1) = range.column_span()?;
        self.with_sheet(range, |sheet| {
            let first = range.start_row.map_or(0, |r| r.saturating_sub(1) as usize);
            let last = range
                .end_row
                .map_or(sheet.rows.len(), |r| (r as usize).min(sheet.rows.len()));

            let mut out: Rows = (first..last)
                .map(|i| {
                    let row = &sheet.rows[i];
                    let mut cells: Vec<String> = (c0..=c1)
                        .map(|c| row.get(c).cloned().unwrap_or_default())
                        .collect();
                    while cells.last().is_some_and(|c| c.is_empty()) {
                        cells.pop();
                    }
                    cells
                })
                .collect();
            while out.last().is_some_and(|r| r.is_empty()) {
                out.pop();
            }
            Ok(out)
        })
    }

    /// Writes below the last row that has a value in the range's columns.
    pub fn append_values(&self, range: &A1Range, rows: Rows) -> Result<(), SheetsError> {
        let (c0, c1) = range.column_span()?;
        self.with_sheet_mut(range, |sheet| {
            let used = sheet
                .rows
                .iter()
                .rposition(|row| (c0..=c1).any(|c| row.get(c).is_some_and(|v| !v.is_empty())))
                .map_or(0, |i| i + 1);
            let floor = range.start_row.map_or(0, |r| r.saturating_sub(1) as usize);
            write_block(&mut sheet.rows, used.max(floor), c0, rows);
            Ok(())
        })
    }

    pub fn update_values(&self, range: &A1Range, rows: Rows) -> Result<(), SheetsError> {
        let (c0, _) = range.column_span()?;
        self.with_sheet_mut(range, |sheet| {
            let start = range.start_row.map_or(0, |r| r.saturating_sub(1) as usize);
            write_block(&mut sheet.rows, start, c0, rows);
            Ok(())
        })
    }

    pub fn clear_values(&self, range: &A1Range) -> Result<(), SheetsError> {
        let (c0, c1) = range.column_span()?;
        self.with_sheet_mut(range, |sheet| {
            let first = range.start_row.map_or(0, |r| r.saturating_sub(1) as usize);
            let last = range
                .end_row
                .map_or(sheet.rows.len(), |r| (r as usize).min(sheet.rows.len()));
            for row in sheet.rows.iter_mut().take(last).skip(first) {
                for c in c0..=c1 {
                    if let Some(cell) = row.get_mut(c) {
                        cell.clear();
                    }
                }
            }
            Ok(())
        })
    }

    pub fn sheet_titles(&self) -> Result<Vec<String>, SheetsError> {
        let sheets = self.sheets.lock().map_err(|_| SheetsError::Lock)?;
        Ok(sheets.iter().map(|s| s.title.clone()).collect())
    }

    pub fn spreadsheet_title(&self) -> String {
        "In-memory spreadsheet".to_string()
    }

    pub fn add_sheet(&self, title: &str) -> Result<(), SheetsError> {
        let mut sheets = self.sheets.lock().map_err(|_| SheetsError::Lock)?;
        if sheets.iter().any(|s| s.title == title) {
            return Err(SheetsError::Status {
                status: 400,
                body: format!("A sheet with the name \"{title}\" already exists."),
            });
        }
        sheets.push(Sheet { title: title.to_string(), rows: Vec::new() });
        Ok(())
    }

    fn with_sheet<T>(
        &self,
        range: &A1Range,
        f: impl FnOnce(&Sheet) -> Result<T, SheetsError>,
    ) -> Result<T, SheetsError> {
        let sheets = self.sheets.lock().map_err(|_| SheetsError::Lock)?;
        let sheet = sheets
            .iter()
            .find(|s| s.title == range.sheet)
            .ok_or_else(|| unknown_sheet(range))?;
        f(sheet)
    }

    fn with_sheet_mut<T>(
        &self,
        range: &A1Range,
        f: impl FnOnce(&mut Sheet) -> Result<T, SheetsError>,
    ) -> Result<T, SheetsError> {
        let mut sheets = self.sheets.lock().map_err(|_| SheetsError::Lock)?;
        let sheet = sheets
            .iter_mut()
            .find(|s| s.title == range.sheet)
            .ok_or_else(|| unknown_sheet(range))?;
        f(sheet)
    }
}

fn unknown_sheet(range: &A1Range) -> SheetsError {
    SheetsError::Status {
        status: 400,
        body: format!("Unable to parse range: {range}"),
    }
}

fn write_block(grid: &mut Vec<Vec<String>>, start_row: usize, start_col: usize, rows: Rows) {
    for (offset, values) in rows.into_iter().enumerate() {
        let r = start_row + offset;
        if grid.len() <= r {
            grid.resize_with(r + 1, Vec::new);
        }
        let row = &mut grid[r];
        for (k, value) in values.into_iter().enumerate() {
            let c = start_col + k;
            if row.len() <= c {
                row.resize(c + 1, String::new());
            }
            row[c] = value;
        }
    }
}
