//! Loads one file into a table and tags its rows with where they came from

use crate::error::{Error, Result};
use crate::parser::TableParser;
use crate::reporter::{Event, Reporter};
use crate::table::{CellValue, Table};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Provenance column holding the source file name
pub const FILE_COLUMN: &str = "File";

/// Provenance column holding the subdirectory name
pub const SUBDIRECTORY_COLUMN: &str = "Subdirectory";

/// What to do when a source file already has a provenance column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Replace the source values and report a warning
    #[default]
    Overwrite,
    /// Abort the batch
    Error,
}

/// Parses files one at a time on behalf of a batch
pub struct Loader<'a> {
    parser: &'a dyn TableParser,
    reporter: &'a dyn Reporter,
    verbose: bool,
    collision: CollisionPolicy,
}

impl<'a> Loader<'a> {
    pub fn new(parser: &'a dyn TableParser, reporter: &'a dyn Reporter) -> Self {
        Self {
            parser,
            reporter,
            verbose: true,
            collision: CollisionPolicy::default(),
        }
    }

    /// Report each file before parsing it
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn on_collision(mut self, policy: CollisionPolicy) -> Self {
        self.collision = policy;
        self
    }

    /// Parse `path` and tag its rows
    ///
    /// Parser errors propagate unchanged, as does a table whose rows do not
    /// match its columns. A table without rows is returned untagged after a
    /// warning.
    pub fn load(&self, path: &Path, subdirectory: Option<&str>) -> Result<Table> {
        if self.verbose {
            self.reporter.report(&Event::ReadingFile(path.to_path_buf()));
        }

        let mut table = self.parser.parse(path)?;
        table.check_widths()?;

        if table.is_empty() {
            self.reporter.report(&Event::EmptyFile(path.to_path_buf()));
            return Ok(table);
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.tag(&mut table, path, FILE_COLUMN, &file_name)?;
        if let Some(subdirectory) = subdirectory {
            self.tag(&mut table, path, SUBDIRECTORY_COLUMN, subdirectory)?;
        }

        tracing::debug!(file = %path.display(), rows = table.row_count(), "loaded");
        Ok(table)
    }

    fn tag(&self, table: &mut Table, path: &Path, column: &str, value: &str) -> Result<()> {
        if self.collision == CollisionPolicy::Error && table.find_column(column).is_some() {
            return Err(Error::ColumnCollision {
                path: path.to_path_buf(),
                column: column.to_string(),
            });
        }

        if table.fill_column(column, CellValue::from(value)) {
            self.reporter.report(&Event::ColumnOverwritten {
                file: path.to_path_buf(),
                column: column.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_csv_str;
    use crate::reporter::RecordingReporter;
    use std::path::PathBuf;

    fn fixed(content: &'static str) -> impl Fn(&Path) -> Result<Table> {
        move |path: &Path| parse_csv_str(content, &path.to_string_lossy())
    }

    #[test]
    fn test_tags_file_and_subdirectory() {
        let parser = fixed("rt\n300\n310\n");
        let reporter = RecordingReporter::new();
        let loader = Loader::new(&parser, &reporter);

        let table = loader.load(Path::new("data/s1/a.csv"), Some("s1")).unwrap();

        assert_eq!(table.column_names(), vec!["rt", "File", "Subdirectory"]);
        for row in 0..2 {
            assert_eq!(table.value(row, "File"), Some(&CellValue::from("a.csv")));
            assert_eq!(table.value(row, "Subdirectory"), Some(&CellValue::from("s1")));
        }
        assert_eq!(
            reporter.events(),
            vec![Event::ReadingFile(PathBuf::from("data/s1/a.csv"))]
        );
    }

    #[test]
    fn test_no_subdirectory_column_without_subdirectory() {
        let parser = fixed("rt\n300\n");
        let loader = Loader::new(&parser, &crate::reporter::NullReporter);

        let table = loader.load(Path::new("a.csv"), None).unwrap();

        assert_eq!(table.column_names(), vec!["rt", "File"]);
    }

    #[test]
    fn test_empty_file_warns_and_stays_untagged() {
        let parser = fixed("rt\n");
        let reporter = RecordingReporter::new();
        let loader = Loader::new(&parser, &reporter).verbose(false);

        let table = loader.load(Path::new("empty.csv"), Some("s1")).unwrap();

        assert_eq!(table.column_names(), vec!["rt"]);
        assert_eq!(
            reporter.events(),
            vec![Event::EmptyFile(PathBuf::from("empty.csv"))]
        );
    }

    #[test]
    fn test_parser_error_propagates() {
        let parser = |path: &Path| -> Result<Table> {
            Err(Error::CsvParse {
                path: path.to_path_buf(),
                message: "broken".to_string(),
            })
        };
        let loader = Loader::new(&parser, &crate::reporter::NullReporter);

        assert!(matches!(
            loader.load(Path::new("bad.csv"), None),
            Err(Error::CsvParse { .. })
        ));
    }

    #[test]
    fn test_ragged_table_from_parser_is_an_error() {
        let parser = |_: &Path| -> Result<Table> {
            let mut table = Table::with_columns(["rt", "File"])?;
            table.rows.push(crate::table::Row::new(vec![CellValue::Integer(300)]));
            Ok(table)
        };
        let loader = Loader::new(&parser, &crate::reporter::NullReporter);

        let err = loader.load(Path::new("a.csv"), None).unwrap_err();
        assert!(matches!(err, Error::RowWidth { expected: 2, found: 1 }));
    }

    #[test]
    fn test_existing_file_column_is_overwritten_with_warning() {
        let parser = fixed("File,rt\nold,300\n");
        let reporter = RecordingReporter::new();
        let loader = Loader::new(&parser, &reporter).verbose(false);

        let table = loader.load(Path::new("a.csv"), None).unwrap();

        assert_eq!(table.column_names(), vec!["File", "rt"]);
        assert_eq!(table.value(0, "File"), Some(&CellValue::from("a.csv")));
        assert_eq!(
            reporter.warnings(),
            vec![Event::ColumnOverwritten {
                file: PathBuf::from("a.csv"),
                column: "File".to_string(),
            }]
        );
    }

    #[test]
    fn test_collision_policy_error() {
        let parser = fixed("Subdirectory,rt\nx,300\n");
        let loader = Loader::new(&parser, &crate::reporter::NullReporter)
            .on_collision(CollisionPolicy::Error);

        let err = loader.load(Path::new("a.csv"), Some("s1")).unwrap_err();
        assert!(matches!(err, Error::ColumnCollision { column, .. } if column == "Subdirectory"));
    }
}
