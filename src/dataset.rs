//! Dataset records and JSON glue.
//!
//! Records mirror the VoiceAssistant-style rows the pipeline works on: one
//! question/answer pair plus the answer audio stored as a SNAC token string.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// One dataset row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnacRecord {
    #[serde(default)]
    pub index: u64,
    #[serde(default)]
    pub split_name: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    /// Answer audio as a `#`-delimited SNAC token string
    #[serde(default)]
    pub answer_snac: String,
}

impl SnacRecord {
    /// Identifier used when reporting per-record failures.
    pub fn id(&self) -> String {
        format!("{}/{}", self.split_name, self.index)
    }
}

/// Read records from a JSON Lines file. Blank lines are skipped.
pub fn load_jsonl<P: AsRef<Path>>(path: P) -> Result<Vec<SnacRecord>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open dataset: {}", path.display()))?;

    let mut records = Vec::new();
    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: SnacRecord = serde_json::from_str(&line).with_context(|| {
            format!("Failed to parse record at {}:{}", path.display(), line_no + 1)
        })?;
        records.push(record);
    }

    tracing::info!(path = %path.display(), records = records.len(), "loaded dataset");
    Ok(records)
}

/// Records belonging to `split_name`.
pub fn filter_split<'a>(records: &'a [SnacRecord], split_name: &str) -> Vec<&'a SnacRecord> {
    records
        .iter()
        .filter(|r| r.split_name == split_name)
        .collect()
}

/// The `answer_snac` column.
pub fn extract_snac_tokens<'a, I>(records: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a SnacRecord>,
{
    records
        .into_iter()
        .map(|r| r.answer_snac.as_str())
        .collect()
}

/// Write any serializable value as pretty JSON.
pub fn write_json<P: AsRef<Path>, T: Serialize + ?Sized>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write JSON to {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

/// Read a JSON array of strings (translated texts, audio path lists).
pub fn read_json_strings<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse string list from {}", path.display()))
}
