//! Directory scanner for discovering data files, optionally per subdirectory

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use walkdir::WalkDir;

/// Which subdirectories of the root to read
///
/// In JSON this is `false`, `true`, or an array of names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum SubdirSpec {
    /// Read files directly inside the root
    #[default]
    Disabled,
    /// Read every directory directly inside the root, in name order
    All,
    /// Read these subdirectories, in this order
    Named(Vec<String>),
}

impl SubdirSpec {
    /// Whether rows get a `Subdirectory` column
    pub fn is_active(&self) -> bool {
        !matches!(self, SubdirSpec::Disabled)
    }

    /// Reject an empty list and names that are not a single path component
    pub fn validate(&self) -> Result<()> {
        if let SubdirSpec::Named(names) = self {
            if names.is_empty() {
                return Err(Error::InvalidArgument(
                    "subdirectory list is empty".to_string(),
                ));
            }
            for name in names {
                let single = Path::new(name).components().count() == 1;
                if name.is_empty() || name == "." || name == ".." || !single {
                    return Err(Error::InvalidArgument(format!(
                        "subdirectory '{}' is not a plain directory name",
                        name
                    )));
                }
            }
        }
        Ok(())
    }

    /// The subdirectory passes to run under `root`
    ///
    /// `None` is the single pass over the root itself.
    pub fn resolve(&self, root: &Path) -> Result<Vec<Option<String>>> {
        match self {
            SubdirSpec::Disabled => Ok(vec![None]),
            SubdirSpec::Named(names) => Ok(names.iter().cloned().map(Some).collect()),
            SubdirSpec::All => {
                let mut names = Vec::new();
                for entry in WalkDir::new(root)
                    .min_depth(1)
                    .max_depth(1)
                    .follow_links(true)
                    .sort_by_file_name()
                {
                    let entry = entry?;
                    if entry.file_type().is_dir() {
                        names.push(Some(entry.file_name().to_string_lossy().into_owned()));
                    }
                }
                Ok(names)
            }
        }
    }
}

impl TryFrom<Value> for SubdirSpec {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Bool(false) => Ok(SubdirSpec::Disabled),
            Value::Bool(true) => Ok(SubdirSpec::All),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(name) => Ok(name),
                    other => Err(Error::InvalidArgument(format!(
                        "subdirectory names must be strings, got {}",
                        other
                    ))),
                })
                .collect::<Result<Vec<_>>>()
                .map(SubdirSpec::Named),
            other => Err(Error::InvalidArgument(format!(
                "subdirectories must be true, false or a list of names, got {}",
                other
            ))),
        }
    }
}

impl From<SubdirSpec> for Value {
    fn from(spec: SubdirSpec) -> Self {
        match spec {
            SubdirSpec::Disabled => Value::Bool(false),
            SubdirSpec::All => Value::Bool(true),
            SubdirSpec::Named(names) => Value::Array(names.into_iter().map(Value::String).collect()),
        }
    }
}

impl FromStr for SubdirSpec {
    type Err = Error;

    /// `true`, `false`, or a comma-separated list of names
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "TRUE" | "True" | "true" => Ok(SubdirSpec::All),
            "FALSE" | "False" | "false" => Ok(SubdirSpec::Disabled),
            list => {
                let spec = SubdirSpec::Named(
                    list.split(',')
                        .map(|name| name.trim().to_string())
                        .filter(|name| !name.is_empty())
                        .collect(),
                );
                spec.validate()?;
                Ok(spec)
            }
        }
    }
}

/// Narrows a directory listing by file name
///
/// Each configured criterion is applied in turn: fixed substring, then
/// regular expression, then literal extension suffix.
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    fixed: Option<String>,
    pattern: Option<Regex>,
    extension: Option<String>,
}

impl FileFilter {
    /// A filter that keeps everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a filter from raw option values
    pub fn from_options(
        fixed: Option<&str>,
        pattern: Option<&str>,
        extension: Option<&str>,
    ) -> Result<Self> {
        let mut filter = Self::new();
        if let Some(fixed) = fixed {
            filter = filter.with_fixed(fixed);
        }
        if let Some(pattern) = pattern {
            filter = filter.with_pattern(pattern)?;
        }
        if let Some(extension) = extension {
            filter = filter.with_extension(extension);
        }
        Ok(filter)
    }

    /// Keep names containing `fixed`
    pub fn with_fixed(mut self, fixed: impl Into<String>) -> Self {
        self.fixed = Some(fixed.into());
        self
    }

    /// Keep names matching the regular expression `pattern` anywhere
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| {
            Error::InvalidArgument(format!("invalid file pattern '{}': {}", pattern, e))
        })?;
        self.pattern = Some(regex);
        Ok(self)
    }

    /// Keep names ending in `extension`
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Filter names, preserving their order
    pub fn apply(&self, mut names: Vec<String>) -> Vec<String> {
        if let Some(fixed) = &self.fixed {
            names.retain(|n| n.contains(fixed.as_str()));
        }
        if let Some(pattern) = &self.pattern {
            names.retain(|n| pattern.is_match(n));
        }
        if let Some(extension) = &self.extension {
            names.retain(|n| n.ends_with(extension.as_str()));
        }
        names
    }
}

/// List the files directly inside `dir` that pass `filter`, sorted by name
pub fn list_files(dir: &Path, filter: &FileFilter) -> Result<Vec<PathBuf>> {
    let mut names = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    Ok(filter
        .apply(names)
        .into_iter()
        .map(|name| dir.join(name))
        .collect())
}
