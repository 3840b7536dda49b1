//! The results table: CSV export/import and terminal rendering.

use coursecraft_error::{Error, ErrorKind, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name offered for the download
pub const DEFAULT_EXPORT_FILE: &str = "campaign_recommendations.csv";

/// One student's description and the model's course picks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "Customer")]
    pub description: String,
    #[serde(rename = "Targeted Courses")]
    pub courses: String,
}

/// Recommendations in roster order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultsTable {
    rows: Vec<Recommendation>,
}

impl ResultsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: Recommendation) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Recommendation] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// UTF-8 CSV with a header row and no index column
    pub fn to_csv(&self) -> Result<Vec<u8>> {
        if self.is_empty() {
            return Err(Error::invalid_argument(
                "no data to download, generate recommendations first",
            )
            .with_operation("export::to_csv"));
        }

        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in &self.rows {
            writer.serialize(row).map_err(|e| {
                Error::serialization_failed(format!("failed to write row: {}", e))
                    .with_operation("export::to_csv")
                    .set_source(e)
            })?;
        }
        writer.into_inner().map_err(|e| {
            Error::new(ErrorKind::IoFailed, "failed to flush CSV buffer")
                .with_operation("export::to_csv")
                .set_source(e.into_error())
        })
    }

    /// Read a table previously written by `to_csv`
    pub fn from_csv(bytes: &[u8]) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(bytes);
        let mut rows = Vec::new();
        for (i, row) in reader.deserialize::<Recommendation>().enumerate() {
            let row = row.map_err(|e| {
                Error::parse_failed(format!("failed to read results row {}: {}", i + 1, e))
                    .with_operation("export::from_csv")
                    .with_context("row", (i + 1).to_string())
                    .set_source(e)
            })?;
            rows.push(row);
        }
        Ok(Self { rows })
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let bytes = self.to_csv()?;
        std::fs::write(path, bytes).map_err(|e| {
            Error::from(e)
                .with_operation("export::write_csv")
                .with_context("path", path.display().to_string())
        })
    }

    pub fn read_csv(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            Error::from(e)
                .with_operation("export::read_csv")
                .with_context("path", path.display().to_string())
        })?;
        Self::from_csv(&bytes)
    }

    /// Plain-text table for the terminal; multi-line cells wrap onto
    /// continuation lines.
    pub fn render(&self) -> String {
        let left: Vec<Vec<&str>> = self.rows.iter().map(|r| r.description.lines().collect()).collect();
        let width = left
            .iter()
            .flatten()
            .map(|line| line.chars().count())
            .chain(std::iter::once("Customer".len()))
            .max()
            .unwrap_or(0);
        let index_width = self.rows.len().to_string().len().max(1);

        let mut out = String::new();
        out.push_str(&format!(
            "{:>iw$} | {:<w$} | Targeted Courses\n",
            "#",
            "Customer",
            iw = index_width,
            w = width
        ));
        out.push_str(&format!(
            "{}-+-{}-+-{}\n",
            "-".repeat(index_width),
            "-".repeat(width),
            "-".repeat(16)
        ));

        for (i, (row, desc_lines)) in self.rows.iter().zip(&left).enumerate() {
            let course_lines: Vec<&str> = row.courses.lines().collect();
            let height = desc_lines.len().max(course_lines.len()).max(1);
            for line in 0..height {
                let index = if line == 0 { (i + 1).to_string() } else { String::new() };
                let desc = desc_lines.get(line).copied().unwrap_or("");
                let courses = course_lines.get(line).copied().unwrap_or("");
                let pad = width.saturating_sub(desc.chars().count());
                out.push_str(&format!(
                    "{:>iw$} | {}{} | {}",
                    index,
                    desc,
                    " ".repeat(pad),
                    courses,
                    iw = index_width
                ));
                out.push('\n');
            }
        }

        out
    }
}

impl FromIterator<Recommendation> for ResultsTable {
    fn from_iter<I: IntoIterator<Item = Recommendation>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}
