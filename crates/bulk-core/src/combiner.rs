//! Attaches the result of an earlier run in front of a new batch

use crate::merger::merge_tables;
use crate::reporter::{Event, Reporter};
use crate::table::Table;
use std::path::Path;

/// Prepend `prior` to `batch` by column union; without prior data the batch
/// passes through unchanged
pub fn combine_with_prior(prior: Option<Table>, batch: Table) -> Table {
    match prior {
        Some(prior) => merge_tables([prior, batch]),
        None => batch,
    }
}

/// Combine with prior data and warn when the outcome has no rows
pub fn finish(
    prior: Option<Table>,
    batch: Table,
    directory: &Path,
    reporter: &dyn Reporter,
) -> Table {
    let result = combine_with_prior(prior, batch);
    if result.is_empty() {
        reporter.report(&Event::EmptyResult(directory.to_path_buf()));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_csv_str;
    use crate::reporter::RecordingReporter;
    use crate::table::CellValue;
    use std::path::PathBuf;

    #[test]
    fn test_prior_rows_come_first() {
        let prior = parse_csv_str("p\n1\n2\n", "prior.csv").unwrap();
        let batch = parse_csv_str("b\n3\n4\n5\n", "batch.csv").unwrap();

        let result = combine_with_prior(Some(prior), batch);

        assert_eq!(result.row_count(), 5);
        assert_eq!(result.column_names(), vec!["p", "b"]);
        assert_eq!(result.value(1, "p"), Some(&CellValue::Integer(2)));
        assert_eq!(result.value(1, "b"), Some(&CellValue::Null));
        assert_eq!(result.value(2, "b"), Some(&CellValue::Integer(3)));
        assert_eq!(result.value(4, "p"), Some(&CellValue::Null));
    }

    #[test]
    fn test_no_prior_passes_batch_through() {
        let batch = parse_csv_str("b\n3\n", "batch.csv").unwrap();

        assert_eq!(combine_with_prior(None, batch.clone()), batch);
    }

    #[test]
    fn test_empty_result_warns() {
        let reporter = RecordingReporter::new();

        let result = finish(None, Table::new(), Path::new("data"), &reporter);

        assert!(result.is_empty());
        assert_eq!(reporter.events(), vec![Event::EmptyResult(PathBuf::from("data"))]);
    }

    #[test]
    fn test_prior_rows_prevent_empty_warning() {
        let reporter = RecordingReporter::new();
        let prior = parse_csv_str("p\n1\n", "prior.csv").unwrap();

        let result = finish(Some(prior), Table::new(), Path::new("data"), &reporter);

        assert_eq!(result.row_count(), 1);
        assert!(reporter.events().is_empty());
    }
}
