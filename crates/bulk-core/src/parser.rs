//! Pluggable per-file parsers and the default delimited-text reader

use crate::error::{Error, Result};
use crate::table::{CellValue, Table};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Anything that turns one file into one table
///
/// Extra parsing parameters live on the implementing value (or are captured
/// by a closure), so the loader only ever hands over the path.
pub trait TableParser {
    /// Parse the file at `path` into a table
    fn parse(&self, path: &Path) -> Result<Table>;
}

impl<F> TableParser for F
where
    F: Fn(&Path) -> Result<Table>,
{
    fn parse(&self, path: &Path) -> Result<Table> {
        self(path)
    }
}

/// Delimited text reader with a header line, the default parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelimitedParser {
    /// Field delimiter
    pub delimiter: char,
    /// Quote character
    pub quote: char,
    /// Whether the first record names the columns
    pub has_headers: bool,
    /// Lines starting with this character are skipped
    pub comment: Option<char>,
    /// Cell contents read as missing values
    pub na_values: Vec<String>,
    /// Trim surrounding whitespace from fields and headers
    pub trim: bool,
}

impl Default for DelimitedParser {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
            has_headers: true,
            comment: None,
            na_values: vec!["NA".to_string()],
            trim: true,
        }
    }
}

impl DelimitedParser {
    /// Tab-separated variant of the default parser
    pub fn tsv() -> Self {
        Self {
            delimiter: '\t',
            ..Self::default()
        }
    }

    /// Check options that must be single ASCII bytes
    pub fn validate(&self) -> Result<()> {
        ascii_byte("delimiter", self.delimiter)?;
        ascii_byte("quote", self.quote)?;
        if let Some(comment) = self.comment {
            ascii_byte("comment", comment)?;
        }
        Ok(())
    }

    fn reader_builder(&self) -> Result<csv::ReaderBuilder> {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(ascii_byte("delimiter", self.delimiter)?)
            .quote(ascii_byte("quote", self.quote)?)
            .comment(self.comment.map(|c| ascii_byte("comment", c)).transpose()?)
            .trim(if self.trim {
                csv::Trim::All
            } else {
                csv::Trim::None
            })
            // Header row is handled by us so headerless files work the same way
            .has_headers(false)
            .flexible(true); // Allow varying number of fields
        Ok(builder)
    }

    /// Parse delimited text from any reader; `source` is used in messages
    pub fn parse_reader<R: Read>(&self, reader: R, source: &Path) -> Result<Table> {
        let mut csv_reader = self.reader_builder()?.from_reader(reader);
        let mut records = csv_reader.records();

        let csv_err = |e: csv::Error| Error::Csv {
            path: source.to_path_buf(),
            source: e,
        };

        let first = match records.next() {
            Some(record) => record.map_err(csv_err)?,
            // Nothing at all in the input
            None => return Ok(Table::new()),
        };

        let (names, pending) = if self.has_headers {
            (first.iter().map(str::to_string).collect::<Vec<_>>(), None)
        } else {
            let names = (1..=first.len()).map(|i| format!("V{}", i)).collect();
            (names, Some(first))
        };

        if names.is_empty() {
            return Err(Error::CsvParse {
                path: source.to_path_buf(),
                message: "no columns found in header".to_string(),
            });
        }

        let mut table = Table::with_columns(make_unique(names))?;
        let width = table.column_count();

        for (row_idx, result) in pending.into_iter().map(Ok).chain(records).enumerate() {
            let record = result.map_err(csv_err)?;

            let mut cells: Vec<CellValue> = record.iter().map(|s| self.cell(s)).collect();

            if cells.len() > width {
                tracing::warn!(
                    row = row_idx + 1,
                    file = %source.display(),
                    "row has more cells than columns, truncating"
                );
                cells.truncate(width);
            }
            cells.resize(width, CellValue::Null);

            table.push_row(cells)?;
        }

        Ok(table)
    }

    fn cell(&self, raw: &str) -> CellValue {
        let key = if self.trim { raw.trim() } else { raw };
        if self.na_values.iter().any(|na| na == key) {
            CellValue::Null
        } else if self.trim {
            CellValue::parse(raw)
        } else {
            CellValue::parse_untrimmed(raw)
        }
    }
}

impl TableParser for DelimitedParser {
    fn parse(&self, path: &Path) -> Result<Table> {
        let file = File::open(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.parse_reader(BufReader::new(file), path)
    }
}

/// Parse a CSV file into a Table with default options
pub fn parse_csv<P: AsRef<Path>>(path: P) -> Result<Table> {
    DelimitedParser::default().parse(path.as_ref())
}

/// Parse CSV from a string (useful for testing)
pub fn parse_csv_str(content: &str, source_name: &str) -> Result<Table> {
    DelimitedParser::default().parse_reader(content.as_bytes(), Path::new(source_name))
}

fn ascii_byte(option: &str, c: char) -> Result<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(Error::InvalidArgument(format!(
            "{} must be a single ASCII character, got '{}'",
            option, c
        )))
    }
}

/// Suffix repeated header names so every column is addressable: a, a.1, a.2
fn make_unique(names: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = names.iter().cloned().collect();
    let mut emitted: HashSet<String> = HashSet::new();

    names
        .into_iter()
        .map(|name| {
            if emitted.insert(name.clone()) {
                return name;
            }
            let mut n = 1;
            loop {
                let candidate = format!("{}.{}", name, n);
                if !seen.contains(&candidate) {
                    seen.insert(candidate.clone());
                    emitted.insert(candidate.clone());
                    return candidate;
                }
                n += 1;
            }
        })
        .collect()
}
