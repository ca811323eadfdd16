//! Core table types shared by parsers, the merger and exporters

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

static NULL: CellValue = CellValue::Null;

/// An ordered set of named columns and the rows filling them
///
/// Every row holds exactly one cell per column, so a row can be read as a
/// mapping from column name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Column definitions
    pub columns: Vec<Column>,
    /// Row data
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a new empty table with no columns
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table with the given column names
    pub fn with_columns<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for name in names {
            table.push_column(name)?;
        }
        Ok(table)
    }

    /// Append a column, filling existing rows with nulls
    pub fn push_column(&mut self, name: impl Into<String>) -> Result<usize> {
        let name = name.into();
        if self.find_column(&name).is_some() {
            return Err(Error::DuplicateColumn(name));
        }
        let index = self.columns.len();
        self.columns.push(Column::new(name, index));
        for row in &mut self.rows {
            row.cells.push(CellValue::Null);
        }
        Ok(index)
    }

    /// Append a row; it must have one cell per column
    pub fn push_row(&mut self, cells: Vec<CellValue>) -> Result<()> {
        if cells.len() != self.columns.len() {
            return Err(Error::RowWidth {
                expected: self.columns.len(),
                found: cells.len(),
            });
        }
        self.rows.push(Row::new(cells));
        Ok(())
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows (it may still have columns)
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find a column by name
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Get a cell by row index and column name
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let col = self.find_column(column)?;
        self.rows.get(row).and_then(|r| r.get(col.index))
    }

    /// All values of one column, top to bottom
    pub fn column_values(&self, column: &str) -> Option<Vec<&CellValue>> {
        let col = self.find_column(column)?;
        Some(
            self.rows
                .iter()
                .map(|r| r.get(col.index).unwrap_or(&NULL))
                .collect(),
        )
    }

    /// Check that every row has exactly one cell per column
    pub fn check_widths(&self) -> Result<()> {
        match self.rows.iter().find(|r| r.cells.len() != self.columns.len()) {
            Some(row) => Err(Error::RowWidth {
                expected: self.columns.len(),
                found: row.cells.len(),
            }),
            None => Ok(()),
        }
    }

    /// Set every row's value in `name` to `value`
    ///
    /// An existing column keeps its position and is overwritten; otherwise
    /// the column is appended. Returns `true` when a column was overwritten.
    pub fn fill_column(&mut self, name: &str, value: CellValue) -> bool {
        let (index, existed) = match self.find_column(name) {
            Some(col) => (col.index, true),
            None => {
                let index = self.columns.len();
                self.columns.push(Column::new(name.to_string(), index));
                (index, false)
            }
        };

        for row in &mut self.rows {
            if existed {
                row.cells[index] = value.clone();
            } else {
                row.cells.push(value.clone());
            }
        }

        existed
    }
}

/// A column definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name (e.g., "Subject" or "rt")
    pub name: String,
    /// Column index (0-based)
    pub index: usize,
}

impl Column {
    /// Create a new column
    pub fn new(name: String, index: usize) -> Self {
        Self { name, index }
    }
}

/// A row of data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Cell values for each column
    pub cells: Vec<CellValue>,
}

impl Row {
    /// Create a new row
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }
}

/// A cell value with type detection
///
/// Types are decided per cell, so a column may hold numbers from one file
/// and text from another after merging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Missing value
    Null,
    /// Logical value
    Bool(bool),
    /// Integer value
    Integer(i64),
    /// Floating-point value
    Float(f64),
    /// String value
    String(String),
}

impl CellValue {
    /// Parse a string into a CellValue, detecting the type
    pub fn parse(s: &str) -> Self {
        Self::detect(s, false)
    }

    /// Like [`CellValue::parse`], but text cells keep surrounding whitespace
    pub fn parse_untrimmed(s: &str) -> Self {
        Self::detect(s, true)
    }

    fn detect(s: &str, keep_whitespace: bool) -> Self {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return CellValue::Null;
        }

        if let Ok(i) = trimmed.parse::<i64>() {
            return CellValue::Integer(i);
        }

        // NaN and infinities stay text
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() {
                return CellValue::Float(f);
            }
        }

        match trimmed {
            "TRUE" | "True" | "true" => CellValue::Bool(true),
            "FALSE" | "False" | "false" => CellValue::Bool(false),
            _ if keep_whitespace => CellValue::String(s.to_string()),
            _ => CellValue::String(trimmed.to_string()),
        }
    }

    /// Check if the cell is missing
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Convert to a display string, rendering nulls as `na`
    pub fn to_string_or(&self, na: &str) -> String {
        match self {
            CellValue::Null => na.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Null => write!(f, ""),
            CellValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Integer(i) => write!(f, "{}", i),
            // Debug keeps the decimal point on whole numbers (1.0, not 1)
            CellValue::Float(fl) => write!(f, "{:?}", fl),
            CellValue::String(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_parse_integer() {
        assert_eq!(CellValue::parse("42"), CellValue::Integer(42));
        assert_eq!(CellValue::parse("-123"), CellValue::Integer(-123));
        assert_eq!(CellValue::parse(" 7 "), CellValue::Integer(7));
    }

    #[test]
    fn test_cell_value_parse_float() {
        assert_eq!(CellValue::parse("0.25"), CellValue::Float(0.25));
        assert_eq!(CellValue::parse("-2.5"), CellValue::Float(-2.5));
    }

    #[test]
    fn test_cell_value_parse_bool_and_string() {
        assert_eq!(CellValue::parse("TRUE"), CellValue::Bool(true));
        assert_eq!(CellValue::parse("false"), CellValue::Bool(false));
        assert_eq!(CellValue::parse("left"), CellValue::from("left"));
    }

    #[test]
    fn test_non_finite_numbers_stay_text() {
        assert_eq!(CellValue::parse("NaN"), CellValue::from("NaN"));
        assert_eq!(CellValue::parse("inf"), CellValue::from("inf"));
        assert_eq!(CellValue::parse("-Infinity"), CellValue::from("-Infinity"));
    }

    #[test]
    fn test_parse_untrimmed_keeps_text_whitespace() {
        assert_eq!(CellValue::parse_untrimmed("  left "), CellValue::from("  left "));
        assert_eq!(CellValue::parse_untrimmed(" 12 "), CellValue::Integer(12));
        assert_eq!(CellValue::parse_untrimmed("   "), CellValue::Null);
    }

    #[test]
    fn test_whole_float_displays_with_decimal_point() {
        assert_eq!(CellValue::Float(1.0).to_string(), "1.0");
        assert_eq!(CellValue::Float(-2.5).to_string(), "-2.5");
        assert_eq!(CellValue::parse(&CellValue::Float(3.0).to_string()), CellValue::Float(3.0));
    }

    #[test]
    fn test_check_widths() {
        let mut table = Table::with_columns(["a", "b"]).unwrap();
        table.push_row(vec![CellValue::Integer(1), CellValue::Integer(2)]).unwrap();
        assert!(table.check_widths().is_ok());

        table.rows.push(Row::new(vec![CellValue::Integer(3)]));
        assert!(matches!(
            table.check_widths(),
            Err(Error::RowWidth { expected: 2, found: 1 })
        ));
    }

    #[test]
    fn test_cell_value_parse_null() {
        assert_eq!(CellValue::parse(""), CellValue::Null);
        assert_eq!(CellValue::parse("   "), CellValue::Null);
        assert!(CellValue::Null.is_null());
        assert!(!CellValue::Integer(0).is_null());
    }

    #[test]
    fn test_push_row_checks_width() {
        let mut table = Table::with_columns(["a", "b"]).unwrap();
        table.push_row(vec![CellValue::Integer(1), CellValue::Integer(2)]).unwrap();

        let err = table.push_row(vec![CellValue::Integer(1)]).unwrap_err();
        assert!(matches!(err, Error::RowWidth { expected: 2, found: 1 }));
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let err = Table::with_columns(["a", "a"]).unwrap_err();
        assert!(matches!(err, Error::DuplicateColumn(name) if name == "a"));
    }

    #[test]
    fn test_fill_column_appends_then_overwrites() {
        let mut table = Table::with_columns(["rt"]).unwrap();
        table.push_row(vec![CellValue::Integer(350)]).unwrap();
        table.push_row(vec![CellValue::Integer(410)]).unwrap();

        assert!(!table.fill_column("File", "s01.csv".into()));
        assert_eq!(table.column_names(), vec!["rt", "File"]);
        assert_eq!(table.value(1, "File"), Some(&CellValue::from("s01.csv")));

        assert!(table.fill_column("rt", CellValue::Null));
        assert_eq!(table.column_names(), vec!["rt", "File"]);
        assert_eq!(
            table.column_values("rt").unwrap(),
            vec![&CellValue::Null, &CellValue::Null]
        );
    }

    #[test]
    fn test_push_column_pads_existing_rows() {
        let mut table = Table::with_columns(["a"]).unwrap();
        table.push_row(vec![CellValue::Integer(1)]).unwrap();
        table.push_column("b").unwrap();

        assert_eq!(table.value(0, "b"), Some(&CellValue::Null));
    }
}
