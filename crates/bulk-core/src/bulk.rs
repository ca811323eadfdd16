//! Reads a directory of data files into one merged table

use crate::combiner;
use crate::error::Result;
use crate::loader::{CollisionPolicy, Loader};
use crate::merger::merge_tables;
use crate::parser::{DelimitedParser, TableParser};
use crate::reporter::{Event, Reporter, TracingReporter};
use crate::scanner::{list_files, FileFilter, SubdirSpec};
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Options for one bulk read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkOptions {
    /// Root directory
    pub directory: PathBuf,
    /// Subdirectory traversal mode
    pub subdirectories: SubdirSpec,
    /// Keep only file names containing this string
    pub fixed: Option<String>,
    /// Keep only file names matching this regular expression
    pub pattern: Option<String>,
    /// Keep only file names ending in this string
    pub extension: Option<String>,
    /// Report progress per subdirectory and file
    pub verbose: bool,
    /// Handling of source columns named like a provenance column
    pub on_collision: CollisionPolicy,
}

impl Default for BulkOptions {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            subdirectories: SubdirSpec::Disabled,
            fixed: None,
            pattern: None,
            extension: None,
            verbose: true,
            on_collision: CollisionPolicy::Overwrite,
        }
    }
}

impl BulkOptions {
    /// Options reading `directory` with everything else at its default
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    /// Validate options and compile the file filter
    pub fn file_filter(&self) -> Result<FileFilter> {
        self.subdirectories.validate()?;
        FileFilter::from_options(
            self.fixed.as_deref(),
            self.pattern.as_deref(),
            self.extension.as_deref(),
        )
    }
}

/// Files one subdirectory pass will load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pass {
    /// Subdirectory name, `None` for the root itself
    pub subdirectory: Option<String>,
    /// Directory being listed
    pub directory: PathBuf,
    /// Files in load order
    pub files: Vec<PathBuf>,
}

/// List the files every pass would load, without parsing anything
pub fn plan(options: &BulkOptions) -> Result<Vec<Pass>> {
    let filter = options.file_filter()?;
    options
        .subdirectories
        .resolve(&options.directory)?
        .into_iter()
        .map(|subdirectory| -> Result<Pass> {
            let directory = pass_directory(&options.directory, subdirectory.as_deref());
            let files = list_files(&directory, &filter)?;
            Ok(Pass {
                subdirectory,
                directory,
                files,
            })
        })
        .collect()
}

/// Read, tag and merge every matching file, then attach `prior` in front
///
/// Configuration is checked before any file system access. The first
/// parser error aborts the whole batch.
pub fn read_bulk(
    options: &BulkOptions,
    parser: &dyn TableParser,
    prior: Option<Table>,
    reporter: &dyn Reporter,
) -> Result<Table> {
    let filter = options.file_filter()?;
    if let Some(prior) = &prior {
        prior.check_widths()?;
    }

    let loader = Loader::new(parser, reporter)
        .verbose(options.verbose)
        .on_collision(options.on_collision);

    let mut per_subdirectory = Vec::new();
    for subdirectory in options.subdirectories.resolve(&options.directory)? {
        if let Some(name) = subdirectory.as_ref().filter(|_| options.verbose) {
            reporter.report(&Event::Subdirectory(name.clone()));
        }

        let directory = pass_directory(&options.directory, subdirectory.as_deref());
        let files = list_files(&directory, &filter)?;

        let tables = files
            .iter()
            .map(|path| loader.load(path, subdirectory.as_deref()))
            .collect::<Result<Vec<_>>>()?;

        let merged = merge_tables(tables);
        tracing::debug!(
            directory = %directory.display(),
            files = files.len(),
            rows = merged.row_count(),
            "merged pass"
        );
        per_subdirectory.push(merged);
    }

    let batch = merge_tables(per_subdirectory);
    Ok(combiner::finish(prior, batch, &options.directory, reporter))
}

/// [`read_bulk`] with the default CSV parser, reporting through `tracing`
pub fn read_bulk_csv(options: &BulkOptions, prior: Option<Table>) -> Result<Table> {
    read_bulk(options, &DelimitedParser::default(), prior, &TracingReporter)
}

fn pass_directory(root: &Path, subdirectory: Option<&str>) -> PathBuf {
    match subdirectory {
        Some(name) => root.join(name),
        None => root.to_path_buf(),
    }
}
