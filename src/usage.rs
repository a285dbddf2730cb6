//! Token usage ledger
//!
//! Appends one CSV row per completed remote call, attributed to the company and
//! keyword of the current run. The `Iteration` column restarts at 0 on every
//! `Initial` row and otherwise counts up from the last row in the file. Writes
//! are serialized behind a mutex; the ledger is the only process-wide shared
//! mutable state.

use crate::error::ApiError;
use crate::provider::TokenUsage;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Price charged per token.
pub const PRICE_PER_TOKEN: f64 = 0.000004;

/// Named step of a generation run, as written to the `Stage` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Initial,
    IndustryIdentification,
    LocationIdentification,
    KeywordClusters,
    TitleGeneration,
    MetaDescription,
    ContentGeneration,
    LogoDescription,
    ImageDescription,
    Complete,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Initial => "Initial",
            Stage::IndustryIdentification => "Industry Identification",
            Stage::LocationIdentification => "Location Identification",
            Stage::KeywordClusters => "Keyword Clusters Search",
            Stage::TitleGeneration => "Title Generation",
            Stage::MetaDescription => "Meta Description Generation",
            Stage::ContentGeneration => "Content Generation",
            Stage::LogoDescription => "Logo Description Generation",
            Stage::ImageDescription => "Image Description Generation",
            Stage::Complete => "Complete",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who a usage row is billed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageContext {
    pub company: String,
    pub keyword: String,
}

/// One row of the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRow {
    #[serde(rename = "Company Name")]
    pub company: String,
    #[serde(rename = "Keyword")]
    pub keyword: String,
    #[serde(rename = "Iteration")]
    pub iteration: u64,
    #[serde(rename = "Stage")]
    pub stage: String,
    #[serde(rename = "Prompt Tokens")]
    pub prompt_tokens: u32,
    #[serde(rename = "Completion Tokens")]
    pub completion_tokens: u32,
    #[serde(rename = "Total Tokens")]
    pub total_tokens: u32,
    #[serde(rename = "Price")]
    pub price: f64,
}

/// Per-stage totals over a ledger
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageTotals {
    pub calls: usize,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    pub price: f64,
}

/// Append-only CSV token usage ledger
pub struct UsageLedger {
    path: PathBuf,
    last_iteration: Mutex<Option<u64>>,
}

impl UsageLedger {
    pub const FILE_NAME: &'static str = "token_usage.csv";

    /// Open (or prepare to create) the ledger at `path`, resuming the iteration count.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ApiError> {
        let path = path.into();
        let last_iteration = if path.exists() {
            Self::read_rows(&path)?.last().map(|row| row.iteration)
        } else {
            None
        };
        Ok(Self {
            path,
            last_iteration: Mutex::new(last_iteration),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a row for `stage` and return what was written.
    pub fn record(
        &self,
        context: &UsageContext,
        stage: Stage,
        usage: TokenUsage,
    ) -> Result<UsageRow, ApiError> {
        let mut last_iteration = self.last_iteration.lock();
        let iteration = match stage {
            Stage::Initial => 0,
            _ => last_iteration.map(|i| i + 1).unwrap_or(0),
        };

        let row = UsageRow {
            company: context.company.clone(),
            keyword: context.keyword.clone(),
            iteration,
            stage: stage.as_str().to_string(),
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
            price: PRICE_PER_TOKEN * f64::from(usage.total_tokens),
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let needs_header = file.metadata()?.len() == 0;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(&row)?;
        writer.flush()?;

        *last_iteration = Some(iteration);
        Ok(row)
    }

    /// Read every row of a ledger file.
    pub fn read_rows(path: &Path) -> Result<Vec<UsageRow>, ApiError> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row?);
        }
        Ok(rows)
    }
}

/// Sum rows per stage, keyed by stage name.
pub fn summarize(rows: &[UsageRow]) -> BTreeMap<String, StageTotals> {
    let mut totals: BTreeMap<String, StageTotals> = BTreeMap::new();
    for row in rows {
        let entry = totals.entry(row.stage.clone()).or_default();
        entry.calls += 1;
        entry.prompt_tokens += u64::from(row.prompt_tokens);
        entry.completion_tokens += u64::from(row.completion_tokens);
        entry.total_tokens += u64::from(row.total_tokens);
        entry.price += row.price;
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn context() -> UsageContext {
        UsageContext {
            company: "Acme".to_string(),
            keyword: "coffee".to_string(),
        }
    }

    fn tokens(total: u32) -> TokenUsage {
        TokenUsage {
            prompt_tokens: total / 2,
            completion_tokens: total - total / 2,
            total_tokens: total,
        }
    }

    #[test]
    fn initial_row_resets_iteration() {
        let temp = TempDir::new().unwrap();
        let ledger = UsageLedger::open(temp.path().join(UsageLedger::FILE_NAME)).unwrap();

        let rows = [
            ledger.record(&context(), Stage::Initial, TokenUsage::default()),
            ledger.record(&context(), Stage::IndustryIdentification, tokens(10)),
            ledger.record(&context(), Stage::TitleGeneration, tokens(20)),
            ledger.record(&context(), Stage::Initial, TokenUsage::default()),
            ledger.record(&context(), Stage::MetaDescription, tokens(30)),
        ];
        let iterations: Vec<u64> = rows.into_iter().map(|r| r.unwrap().iteration).collect();
        assert_eq!(iterations, vec![0, 1, 2, 0, 1]);
    }

    #[test]
    fn iteration_resumes_from_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(UsageLedger::FILE_NAME);
        {
            let ledger = UsageLedger::open(&path).unwrap();
            ledger
                .record(&context(), Stage::Initial, TokenUsage::default())
                .unwrap();
            ledger
                .record(&context(), Stage::ContentGeneration, tokens(100))
                .unwrap();
        }

        let reopened = UsageLedger::open(&path).unwrap();
        let row = reopened
            .record(&context(), Stage::ImageDescription, tokens(40))
            .unwrap();
        assert_eq!(row.iteration, 2);

        let rows = UsageLedger::read_rows(&path).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].stage, "Image Description Generation");
    }

    #[test]
    fn price_is_derived_from_total_tokens() {
        let temp = TempDir::new().unwrap();
        let ledger = UsageLedger::open(temp.path().join("usage.csv")).unwrap();
        let row = ledger
            .record(&context(), Stage::ContentGeneration, tokens(1000))
            .unwrap();
        assert!((row.price - 0.004).abs() < 1e-12);
    }

    #[test]
    fn header_written_once() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("usage.csv");
        let ledger = UsageLedger::open(&path).unwrap();
        ledger
            .record(&context(), Stage::Initial, TokenUsage::default())
            .unwrap();
        ledger
            .record(&context(), Stage::Complete, TokenUsage::default())
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next(),
            Some("Company Name,Keyword,Iteration,Stage,Prompt Tokens,Completion Tokens,Total Tokens,Price")
        );
        assert_eq!(contents.matches("Company Name").count(), 1);
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn summarize_groups_by_stage() {
        let temp = TempDir::new().unwrap();
        let ledger = UsageLedger::open(temp.path().join("usage.csv")).unwrap();
        for _ in 0..3 {
            ledger
                .record(&context(), Stage::ImageDescription, tokens(10))
                .unwrap();
        }
        ledger
            .record(&context(), Stage::ContentGeneration, tokens(50))
            .unwrap();

        let rows = UsageLedger::read_rows(ledger.path()).unwrap();
        let totals = summarize(&rows);
        let images = &totals["Image Description Generation"];
        assert_eq!(images.calls, 3);
        assert_eq!(images.total_tokens, 30);
        assert_eq!(totals["Content Generation"].calls, 1);
    }
}
