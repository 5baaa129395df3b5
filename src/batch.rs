//! Per-item failure isolation for batches of records.
//!
//! A malformed record yields a failure entry for that record only; the rest
//! of the batch is processed normally. Nothing is retried.

use crate::codec::{self, CodeHierarchy};
use crate::dataset::SnacRecord;
use crate::error::RecordError;

/// Outcome of reconstructing one record.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub id: String,
    pub result: Result<CodeHierarchy, RecordError>,
}

impl BatchItem {
    /// The reconstructed hierarchy, if the record was valid.
    pub fn ok(&self) -> Option<&CodeHierarchy> {
        self.result.as_ref().ok()
    }
}

/// Success/failure counts for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    /// Count successes and failures.
    pub fn from_items(items: &[BatchItem]) -> Self {
        let failed = items.iter().filter(|i| i.result.is_err()).count();
        Self {
            succeeded: items.len() - failed,
            failed,
        }
    }
}

/// Reconstruct the `answer_snac` column of every record.
pub fn reconstruct_batch<'a, I>(records: I) -> Vec<BatchItem>
where
    I: IntoIterator<Item = &'a SnacRecord>,
{
    records
        .into_iter()
        .map(|record| {
            let id = record.id();
            let result = codec::reconstruct_str(&record.answer_snac).map_err(|source| {
                let err = RecordError::new(id.clone(), source);
                tracing::warn!(record = %id, kind = ?err.kind(), "skipping record: {}", err.source);
                err
            });
            BatchItem { id, result }
        })
        .collect()
}

/// Flatten raw per-level codes for many items; failures become `None`.
/// Items are consumed; each hierarchy moves into validation.
pub fn flatten_batch(items: Vec<(String, Vec<Vec<i64>>)>) -> Vec<(String, Option<String>)> {
    items
        .into_iter()
        .map(|(id, levels)| {
            let tokens = match codec::make_snac_tokens(levels) {
                Ok(tokens) => Some(tokens),
                Err(err) => {
                    tracing::warn!(record = %id, "skipping item: {}", err);
                    None
                }
            };
            (id, tokens)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn record(index: u64, snac: &str) -> SnacRecord {
        SnacRecord {
            index,
            split_name: "identity".to_string(),
            question: String::new(),
            answer: String::new(),
            answer_snac: snac.to_string(),
        }
    }

    #[test]
    fn test_bad_record_does_not_affect_siblings() {
        let records = vec![
            record(0, "# 1 2 3 4 5 6 7"),
            record(1, "# 1 2 3 4 5 6"),
            record(2, "# 9 9 9 9 9 9 9 # 8 8 8 8 8 8 8"),
        ];
        let items = reconstruct_batch(&records);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].ok().unwrap().num_frames(), 1);
        assert_eq!(items[2].ok().unwrap().num_frames(), 2);

        let err = items[1].result.as_ref().unwrap_err();
        assert_eq!(err.record_id, "identity/1");
        assert_eq!(err.kind(), ErrorKind::Format);

        assert_eq!(
            BatchSummary::from_items(&items),
            BatchSummary {
                succeeded: 2,
                failed: 1,
            }
        );
    }

    #[test]
    fn test_flatten_batch_marks_failures() {
        let items = vec![
            ("good".to_string(), vec![vec![1], vec![2, 3], vec![4, 5, 6, 7]]),
            ("bad".to_string(), vec![vec![1], vec![2, 3]]),
        ];
        let out = flatten_batch(items);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], ("good".to_string(), Some("# 1 2 4 5 3 6 7".to_string())));
        assert_eq!(out[1], ("bad".to_string(), None));
    }
}
