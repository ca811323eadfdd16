//! bulk-core: Core library for reading many similar data files into one table
//!
//! This library provides functionality to:
//! - List data files in a directory or in its subdirectories, filtered by name
//! - Parse each file with a pluggable parser (CSV by default)
//! - Tag every row with its source file and subdirectory
//! - Merge tables with differing columns by column union
//! - Attach the result of an earlier run in front of the new rows

pub mod bulk;
pub mod combiner;
pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod merger;
pub mod parser;
pub mod reporter;
pub mod scanner;
pub mod table;

pub use bulk::{plan, read_bulk, read_bulk_csv, BulkOptions, Pass};
pub use combiner::combine_with_prior;
pub use config::MergeConfig;
pub use error::{Error, Result};
pub use export::{write_csv, write_csv_file, write_json, Records, DEFAULT_NA};
pub use loader::{CollisionPolicy, Loader, FILE_COLUMN, SUBDIRECTORY_COLUMN};
pub use merger::{merge_tables, union_columns};
pub use parser::{parse_csv, parse_csv_str, DelimitedParser, TableParser};
pub use reporter::{Event, NullReporter, RecordingReporter, Reporter, TracingReporter};
pub use scanner::{list_files, FileFilter, SubdirSpec};
pub use table::{CellValue, Column, Row, Table};
