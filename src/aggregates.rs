//! Cleaning of the timekeeping spreadsheet export and the two running totals
//! the projection needs.
//!
//! The export carries a metadata block above the real header row, padding
//! columns with no header, and two summary rows at the bottom of the
//! `Weighted Date Diff` column. [`CleanedSheet::from_reader`] strips all of
//! that so the sums only see per-entry rows.

use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

use crate::models::AggregateTotals;

pub const WEIGHTED_DATE_DIFF: &str = "Weighted Date Diff";
pub const HOURS_WORKED: &str = "Hours Worked";

/// Raw records above the header row in the export.
const METADATA_ROWS: usize = 3;

/// Summary rows that close the weighted column.
const TRAILING_SUMMARY_ROWS: usize = 2;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Spreadsheet has no header row after the metadata block")]
    NoHeader,

    #[error("Spreadsheet is missing the `{0}` column")]
    MissingColumn(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CleanedSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CleanedSheet {
    pub fn from_path(path: &Path) -> Result<Self, AggregateError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, AggregateError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            records.push(record.iter().map(|cell| cell.trim().to_string()).collect::<Vec<_>>());
        }

        let mut remaining = records.into_iter().skip(METADATA_ROWS);
        let headers = remaining.next().ok_or(AggregateError::NoHeader)?;
        let width = headers.len();
        let rows: Vec<Vec<String>> = remaining
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        let sheet = Self { headers, rows }
            .drop_padding_columns()
            .drop_blank_rows()
            .drop_trailing_summary();
        debug!(
            columns = sheet.headers.len(),
            rows = sheet.rows.len(),
            "cleaned spreadsheet"
        );
        Ok(sheet)
    }

    fn drop_padding_columns(self) -> Self {
        let keep: Vec<usize> = (0..self.headers.len())
            .filter(|&index| {
                let header = &self.headers[index];
                let has_name = !header.is_empty() && !header.starts_with("Unnamed");
                let has_data = self.rows.iter().any(|row| !row[index].is_empty());
                has_name && has_data
            })
            .collect();

        let headers = keep.iter().map(|&index| self.headers[index].clone()).collect();
        let rows = self
            .rows
            .into_iter()
            .map(|row| keep.iter().map(|&index| row[index].clone()).collect())
            .collect();
        Self { headers, rows }
    }

    fn drop_blank_rows(mut self) -> Self {
        self.rows.retain(|row| row.iter().any(|cell| !cell.is_empty()));
        self
    }

    fn drop_trailing_summary(mut self) -> Self {
        let Some(column) = self.column_index(WEIGHTED_DATE_DIFF) else {
            return self;
        };
        if let Some(last) = self.rows.iter().rposition(|row| !row[column].is_empty()) {
            let keep = (last + 1).saturating_sub(TRAILING_SUMMARY_ROWS);
            debug!(dropped = self.rows.len() - keep, "trimmed trailing summary rows");
            self.rows.truncate(keep);
        }
        self
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Sum of the numeric cells in `name`; non-numeric cells are skipped.
    pub fn sum_column(&self, name: &str) -> Result<f64, AggregateError> {
        let column = self
            .column_index(name)
            .ok_or_else(|| AggregateError::MissingColumn(name.to_string()))?;

        let mut skipped = 0usize;
        let mut total = 0.0;
        for row in &self.rows {
            match parse_number(&row[column]) {
                Some(value) => total += value,
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            warn!(column = name, skipped, "skipped non-numeric cells");
        }
        Ok(total)
    }

    pub fn totals(&self) -> Result<AggregateTotals, AggregateError> {
        Ok(AggregateTotals {
            weighted_delay_sum: self.sum_column(WEIGHTED_DATE_DIFF)?,
            hours_worked_sum: self.sum_column(HOURS_WORKED)?,
        })
    }

    pub fn write_csv(&self, path: &Path) -> Result<(), AggregateError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn parse_number(cell: &str) -> Option<f64> {
    let cleaned: String = cell.chars().filter(|c| *c != ',').collect();
    cleaned.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "\
Time Entry Report,,,,
Generated 2024-10-01,,,,
,,,,
Date,Hours Worked,,Weighted Date Diff,Notes
2024-09-02,8,,16,
2024-09-03,7.5,,7.5,late
,,,,
2024-09-04,4,,0,
Subtotal,19.5,,23.5,
Total,19.5,,23.5,
";

    fn sheet() -> CleanedSheet {
        CleanedSheet::from_reader(EXPORT.as_bytes()).unwrap()
    }

    #[test]
    fn promotes_header_after_metadata_block() {
        let sheet = sheet();
        assert_eq!(sheet.headers[0], "Date");
        assert_eq!(sheet.column_index(HOURS_WORKED), Some(1));
    }

    #[test]
    fn drops_unnamed_and_empty_columns() {
        let sheet = sheet();
        assert_eq!(sheet.headers, vec!["Date", "Hours Worked", "Weighted Date Diff", "Notes"]);
        assert!(sheet.rows.iter().all(|row| row.len() == 4));
    }

    #[test]
    fn drops_blank_rows_and_trailing_summary() {
        let sheet = sheet();
        let dates: Vec<&str> = sheet.rows.iter().map(|row| row[0].as_str()).collect();
        assert_eq!(dates, vec!["2024-09-02", "2024-09-03", "2024-09-04"]);
    }

    #[test]
    fn totals_sum_per_entry_rows() {
        let totals = sheet().totals().unwrap();
        assert!((totals.weighted_delay_sum - 23.5).abs() < 1e-9);
        assert!((totals.hours_worked_sum - 19.5).abs() < 1e-9);
    }

    #[test]
    fn non_numeric_cells_are_skipped() {
        let sheet = CleanedSheet {
            headers: vec![HOURS_WORKED.to_string()],
            rows: vec![
                vec!["1,000".to_string()],
                vec!["n/a".to_string()],
                vec!["2.5".to_string()],
            ],
        };
        assert_eq!(sheet.sum_column(HOURS_WORKED).unwrap(), 1002.5);
    }

    #[test]
    fn missing_column_is_reported() {
        let export = "a\nb\nc\nDate,Hours Worked\n2024-09-02,8\n";
        let sheet = CleanedSheet::from_reader(export.as_bytes()).unwrap();
        assert!(matches!(
            sheet.totals(),
            Err(AggregateError::MissingColumn(name)) if name == WEIGHTED_DATE_DIFF
        ));
    }

    #[test]
    fn short_export_has_no_header() {
        let export = "a\nb\nc\n";
        assert!(matches!(
            CleanedSheet::from_reader(export.as_bytes()),
            Err(AggregateError::NoHeader)
        ));
    }

    #[test]
    fn written_csv_reads_back_with_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned.csv");
        sheet().write_csv(&path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.get(2), Some(WEIGHTED_DATE_DIFF));
        assert_eq!(reader.records().count(), 3);
    }
}
