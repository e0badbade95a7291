use std::{
    fs,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use anyhow::{Context, Result};

/// Reported for class indices the label list does not cover.
pub const UNKNOWN_LABEL: &str = "?";

/// Ordered class names; position `i` names the classifier's class `i`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Labels {
    names: Vec<String>,
}

impl Labels {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// One label per line. Surrounding whitespace is trimmed and blank lines
    /// are skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut names = Vec::new();
        for line in BufReader::new(reader).lines() {
            let line = line.context("failed to read label line")?;
            let name = line.trim();
            if !name.is_empty() {
                names.push(name.to_string());
            }
        }
        Ok(Self { names })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)
            .with_context(|| format!("failed to open label file {}", path.display()))?;
        let labels = Self::from_reader(file)
            .with_context(|| format!("failed to read label file {}", path.display()))?;
        log::info!("loaded {} labels from {}", labels.len(), path.display());
        Ok(labels)
    }

    /// `A` through `Z`, for alphabet models shipped without a label file.
    pub fn alphabet() -> Self {
        Self::new(('A'..='Z').map(|c| c.to_string()))
    }

    pub fn resolve(&self, index: usize) -> &str {
        self.names
            .get(index)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_LABEL)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
