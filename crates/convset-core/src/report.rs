//! Batch reports for the download and inspection passes.
//!
//! A batch never stops on a bad dataset. Each dataset yields an
//! [`Outcome`], the outcomes are collected into a report, and the report is
//! rendered once at the end through its [`Display`](std::fmt::Display) impl.

use crate::inspector::{FieldOverview, Preview, Summary};
use crate::store::DatasetFile;
use std::fmt;
use std::path::PathBuf;

const RULE_WIDTH: usize = 80;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of processing one dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Done(T),
    Failed { reason: String },
}

impl<T> Outcome<T> {
    pub fn failed(reason: impl fmt::Display) -> Self {
        Outcome::Failed { reason: reason.to_string() }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done(_))
    }

    pub fn done(&self) -> Option<&T> {
        match self {
            Outcome::Done(value) => Some(value),
            Outcome::Failed { .. } => None,
        }
    }
}

impl<T, E: fmt::Display> From<Result<T, E>> for Outcome<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::Done(value),
            Err(e) => Outcome::failed(e),
        }
    }
}

/// A named outcome inside a batch report.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<T> {
    pub name: String,
    pub outcome: Outcome<T>,
}

// ---------------------------------------------------------------------------
// Download report
// ---------------------------------------------------------------------------

/// What one successful download produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Downloaded {
    pub id: String,
    pub path: PathBuf,
    pub records: usize,
    /// Row count of the whole split, when the source reported one.
    pub total_available: Option<u64>,
    /// Field names of the first record.
    pub fields: Vec<String>,
    pub overview: Vec<FieldOverview>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DownloadReport {
    pub output_dir: PathBuf,
    pub entries: Vec<Entry<Downloaded>>,
    /// Every dataset document in `output_dir` once the batch finished.
    pub files: Vec<DatasetFile>,
}

impl DownloadReport {
    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_done()).count()
    }

    pub fn total_size_mb(&self) -> f64 {
        self.files.iter().map(DatasetFile::size_mb).sum()
    }
}

impl fmt::Display for DownloadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        banner(f, "Downloading conversation datasets")?;

        let n = self.entries.len();
        for (i, entry) in self.entries.iter().enumerate() {
            writeln!(f, "\n[{}/{}] {}", i + 1, n, entry.name)?;
            match &entry.outcome {
                Outcome::Done(d) => {
                    writeln!(f, "✓ {} downloaded ({})", entry.name, d.id)?;
                    writeln!(f, "  Records saved: {}", group_thousands(d.records as u64))?;
                    if let Some(total) = d.total_available {
                        writeln!(f, "  Total available: {}", group_thousands(total))?;
                    }
                    writeln!(f, "  Saved to: {}", d.path.display())?;
                    if !d.fields.is_empty() {
                        writeln!(f, "  Fields: {}", d.fields.join(", "))?;
                    }
                    if !d.overview.is_empty() {
                        writeln!(f, "\n  Example record:")?;
                        for line in &d.overview {
                            writeln!(f, "    {line}")?;
                        }
                    }
                }
                Outcome::Failed { reason } => writeln!(f, "✗ Error downloading {}: {reason}", entry.name)?,
            }
        }

        writeln!(f)?;
        banner(f, "Download Summary")?;
        writeln!(f, "Location: {}", self.output_dir.display())?;
        writeln!(f, "\nFiles:")?;
        for file in &self.files {
            writeln!(f, "  - {:<50} {:>8.2} MB", file.name, file.size_mb())?;
        }
        writeln!(f, "\nTotal size: {:.2} MB", self.total_size_mb())?;
        writeln!(f, "\n{}/{} datasets downloaded", self.succeeded(), n)
    }
}

impl fmt::Display for FieldOverview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldOverview::Collection { key, kind, items } => {
                write!(f, "{key}: {kind} with {items} items")
            }
            FieldOverview::Scalar { key, preview, truncated } => {
                write!(f, "{key}: {preview}{}", if *truncated { "..." } else { "" })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Inspection report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct InspectionReport {
    pub dir: PathBuf,
    pub entries: Vec<Entry<Summary>>,
}

impl InspectionReport {
    pub fn failed(&self) -> usize {
        self.entries.iter().filter(|e| !e.outcome.is_done()).count()
    }
}

impl fmt::Display for InspectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        banner(f, "CONVERSATION DATASETS INSPECTION")?;
        writeln!(f, "\nFound {} datasets in {}", self.entries.len(), self.dir.display())?;

        for entry in &self.entries {
            match &entry.outcome {
                Outcome::Done(summary) => {
                    writeln!(f)?;
                    banner(f, &entry.name)?;
                    write!(f, "{summary}")?;
                }
                Outcome::Failed { reason } => {
                    writeln!(f, "\n✗ Error inspecting {}: {reason}", entry.name)?;
                }
            }
        }

        writeln!(f)?;
        banner(f, "✓ Inspection complete!")
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total items: {}", group_thousands(self.count as u64))?;
        if self.is_empty() {
            return writeln!(f, "Empty dataset!");
        }

        writeln!(f, "\nFields: {}", self.fields.join(", "))?;

        if let Some(turns) = &self.turns {
            writeln!(f, "\nConversation turn statistics:")?;
            writeln!(f, "  Min turns: {}", turns.min)?;
            writeln!(f, "  Max turns: {}", turns.max)?;
            writeln!(f, "  Avg turns: {:.1}", turns.mean)?;
        }

        if let Some(languages) = &self.languages {
            writeln!(f, "\nTop {} languages:", crate::inspector::TOP_LANGUAGES)?;
            for lang in languages {
                writeln!(
                    f,
                    "  {}: {} ({:.1}%)",
                    lang.value,
                    group_thousands(lang.count as u64),
                    lang.percent
                )?;
            }
        }

        if let Some(preview) = &self.preview {
            writeln!(f, "\nExample conversation:")?;
            write!(f, "{preview}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preview::Turns { turns, .. } => {
                for turn in turns {
                    writeln!(f, "  [{}]: {}...", turn.role, turn.content)?;
                }
                Ok(())
            }
            Preview::Chosen(text) => writeln!(f, "  [chosen]: {text}..."),
            Preview::Structure(text) => writeln!(f, "  Structure: {text}..."),
        }
    }
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

fn banner(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(f, "{rule}")?;
    writeln!(f, "{title}")?;
    writeln!(f, "{rule}")
}

/// `1234567` → `1,234,567`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
