//! Column-union merge of heterogeneous tables
//!
//! The merged column list is every input column, in order of first
//! appearance. Rows keep their table order and their order within each
//! table; cells for columns a table never had are null.

use crate::table::{CellValue, Column, Row, Table};
use std::collections::{HashMap, HashSet};

/// Union of the column names of `tables`, in first-appearance order
pub fn union_columns(tables: &[Table]) -> Vec<String> {
    let mut column_names: Vec<String> = Vec::new();
    let mut seen_columns: HashSet<&str> = HashSet::new();

    for table in tables {
        for col in &table.columns {
            if seen_columns.insert(col.name.as_str()) {
                column_names.push(col.name.clone());
            }
        }
    }

    column_names
}

/// Merge tables into one by column union and row concatenation
///
/// Tables without rows still contribute their columns.
pub fn merge_tables<I>(tables: I) -> Table
where
    I: IntoIterator<Item = Table>,
{
    let tables: Vec<Table> = tables.into_iter().collect();

    let columns: Vec<Column> = union_columns(&tables)
        .into_iter()
        .enumerate()
        .map(|(i, name)| Column::new(name, i))
        .collect();

    // Build column name -> index mapping for the unified columns
    let col_index: HashMap<&str, usize> = columns
        .iter()
        .map(|c| (c.name.as_str(), c.index))
        .collect();

    let total_rows = tables.iter().map(Table::row_count).sum();
    let mut rows: Vec<Row> = Vec::with_capacity(total_rows);

    for table in tables {
        // Position of each of this table's columns in the unified layout
        let targets: Vec<usize> = table
            .columns
            .iter()
            .map(|c| col_index[c.name.as_str()])
            .collect();

        for row in table.rows {
            let mut cells = vec![CellValue::Null; columns.len()];
            for (value, &target) in row.cells.into_iter().zip(&targets) {
                cells[target] = value;
            }
            rows.push(Row::new(cells));
        }
    }

    Table { columns, rows }
}
