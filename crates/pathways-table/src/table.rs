//! In-memory row-level table with order-preserving columns.
//!
//! Columns the pipeline does not know about pass through untouched, so the
//! exported table is always the input table plus appended columns.

use std::io;
use std::path::Path;

use tracing::info;

use pathways_core::{Error, Result};

use crate::columns;

/// A loaded ToC table: a header row and string cells, in file order.
#[derive(Debug, Clone, Default)]
pub struct TocTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TocTable {
    /// Build a table from headers and rows. Row widths must match the header.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(Error::Input(format!(
                    "row {} has {} cells, expected {}",
                    i + 1,
                    row.len(),
                    headers.len()
                )));
            }
        }
        Ok(Self { headers, rows })
    }

    /// Load a table from a CSV file.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Input(format!(
                "input file not found: {}",
                path.display()
            )));
        }
        let mut reader = csv::Reader::from_path(path)?;
        let table = Self::from_csv_reader(&mut reader)?;
        info!(
            "Loaded {} rows x {} columns from {}",
            table.row_count(),
            table.headers.len(),
            path.display()
        );
        Ok(table)
    }

    /// Load a table from any CSV reader.
    pub fn from_csv_reader<R: io::Read>(reader: &mut csv::Reader<R>) -> Result<Self> {
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self { headers, rows })
    }

    /// Write the table as CSV.
    pub fn write_csv_path(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        self.write_csv(&mut writer)?;
        info!("Wrote {} rows to {}", self.row_count(), path.display());
        Ok(())
    }

    /// Write the table to any CSV writer.
    pub fn write_csv<W: io::Write>(&self, writer: &mut csv::Writer<W>) -> Result<()> {
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by exact header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of a column that must exist.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    /// Check that every contract column is present.
    pub fn validate_contract(&self) -> Result<()> {
        for name in columns::REQUIRED {
            self.require_column(name)?;
        }
        Ok(())
    }

    /// Cell value at (row, column index). Empty string if out of range.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// All values of one column, in row order.
    pub fn column_values(&self, col: usize) -> Vec<&str> {
        self.rows.iter().map(|r| r[col].as_str()).collect()
    }

    /// Unique non-empty indicator strings, first-seen order preserved.
    ///
    /// The clustering passes depend on this ordering; it anchors which
    /// indicator seeds each greedy lexical cluster.
    pub fn unique_indicators(&self) -> Result<Vec<String>> {
        let col = self.require_column(columns::INDICATOR)?;
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for row in &self.rows {
            let value = row[col].trim();
            if value.is_empty() {
                continue;
            }
            if seen.insert(value.to_string()) {
                out.push(value.to_string());
            }
        }
        Ok(out)
    }

    /// Append a new column. Fails if the name is taken or lengths mismatch.
    pub fn append_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        if self.column_index(name).is_some() {
            return Err(Error::Internal(format!("column already exists: {}", name)));
        }
        if values.len() != self.rows.len() {
            return Err(Error::Internal(format!(
                "column {} has {} values for {} rows",
                name,
                values.len(),
                self.rows.len()
            )));
        }
        self.headers.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }

    /// Replace an existing column's values, or append the column if absent.
    ///
    /// Only the enrichment columns owned by the pipeline go through here;
    /// everything else is append-only.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        match self.column_index(name) {
            Some(col) => {
                if values.len() != self.rows.len() {
                    return Err(Error::Internal(format!(
                        "column {} has {} values for {} rows",
                        name,
                        values.len(),
                        self.rows.len()
                    )));
                }
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[col] = value;
                }
                Ok(())
            }
            None => self.append_column(name, values),
        }
    }
}
