use std::{
    collections::{BTreeSet, HashMap},
    io::Read,
    path::Path,
};
use tracing::warn;

use crate::error::{CatalogError, Result};
use crate::source::{self, RawTable};

/// An in-memory, read-only tab-separated table.
///
/// Every row has exactly as many cells as the header. Filtering produces a new
/// table that owns copies of the matching rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    /// Column name → index. With duplicate names the last one wins.
    index_of: HashMap<String, usize>,
}

impl Table {
    /// Build a table from a header and data rows, checking every row's length.
    /// Line numbers in errors count the header as line 1.
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        for (i, row) in rows.iter().enumerate() {
            check_shape(&header, i as u64 + 2, row)?;
        }
        Ok(Self::from_checked(header, rows))
    }

    pub fn from_raw(raw: RawTable) -> Result<Self> {
        let RawTable { headers, rows } = raw;
        let mut data = Vec::with_capacity(rows.len());
        for (line, row) in rows {
            check_shape(&headers, line, &row)?;
            data.push(row);
        }
        Ok(Self::from_checked(headers, data))
    }

    /// Load a table from any tab-separated reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_raw(source::read_tsv(reader)?)
    }

    /// Load a table from a `.tsv` file or a zipped catalog download.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_raw(source::read_path(path)?)
    }

    fn from_checked(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut index_of = HashMap::with_capacity(header.len());
        for (i, name) in header.iter().enumerate() {
            if let Some(prev) = index_of.insert(name.clone(), i) {
                warn!(column = %name, first = prev, kept = i, "duplicate column name");
            }
        }
        Self {
            header,
            rows,
            index_of,
        }
    }

    /// Exact, case-sensitive lookup of a column by name.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.index_of
            .get(name)
            .copied()
            .ok_or_else(|| CatalogError::unknown_column(name))
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Panics if `row` or `col` is out of range.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        &self.rows[row][col]
    }

    /// Panics if `i` is out of range.
    pub fn row(&self, i: usize) -> &[String] {
        &self.rows[i]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Distinct values of a column.
    pub fn unique_values(&self, col: usize) -> BTreeSet<String> {
        self.rows.iter().map(|r| r[col].clone()).collect()
    }

    /// Number of rows holding each distinct value of a column.
    pub fn value_counts(&self, col: usize) -> HashMap<String, usize> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for row in &self.rows {
            *counts.entry(row[col].clone()).or_default() += 1;
        }
        counts
    }

    /// Rows whose cell at `col` is exactly `value`, in their original order.
    /// No match gives an empty table with the same header.
    pub fn filter_rows(&self, col: usize, value: &str) -> Table {
        self.filter_rows_all(&[(col, value)])
    }

    /// Rows matching every `(col, value)` pair. Equivalent to chaining
    /// [`Table::filter_rows`] once per pair.
    pub fn filter_rows_all(&self, predicates: &[(usize, &str)]) -> Table {
        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .filter(|row| predicates.iter().all(|(col, value)| row[*col] == *value))
            .cloned()
            .collect();

        Table {
            header: self.header.clone(),
            rows,
            index_of: self.index_of.clone(),
        }
    }
}

fn check_shape(header: &[String], line: u64, row: &[String]) -> Result<()> {
    if row.len() != header.len() {
        return Err(CatalogError::RowShapeMismatch {
            line,
            expected: header.len(),
            actual: row.len(),
        });
    }
    Ok(())
}
