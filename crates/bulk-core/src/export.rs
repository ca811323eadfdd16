//! Writing merged tables out as CSV or JSON records

use crate::error::Result;
use crate::table::{Row, Table};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Null marker written to CSV by default; the default parser reads it back
pub const DEFAULT_NA: &str = "NA";

/// Write `table` as CSV with a header line, rendering nulls as `na`
pub fn write_csv<W: Write>(table: &Table, writer: W, na: &str) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(table.columns.iter().map(|c| c.name.as_str()))?;
    for row in &table.rows {
        csv_writer.write_record(row.cells.iter().map(|c| c.to_string_or(na)))?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write `table` as CSV to a file
pub fn write_csv_file<P: AsRef<Path>>(table: &Table, path: P, na: &str) -> Result<()> {
    let file = File::create(path)?;
    write_csv(table, BufWriter::new(file), na)
}

/// Serializes a table as an array of `{column: value}` objects in column order
pub struct Records<'a>(pub &'a Table);

struct RecordRow<'a> {
    table: &'a Table,
    row: &'a Row,
}

impl Serialize for Records<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.row_count()))?;
        for row in &self.0.rows {
            seq.serialize_element(&RecordRow { table: self.0, row })?;
        }
        seq.end()
    }
}

impl Serialize for RecordRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.table.column_count()))?;
        for (column, value) in self.table.columns.iter().zip(&self.row.cells) {
            map.serialize_entry(&column.name, value)?;
        }
        map.end()
    }
}

/// Write `table` as a pretty-printed JSON array of records
pub fn write_json<W: Write>(table: &Table, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, &Records(table))?;
    writeln!(writer)?;
    Ok(())
}
