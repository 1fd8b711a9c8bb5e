//! Seeded synthetic highlighter exports.

use crate::fixtures::HighlightRow;

/// Shape of a generated export.
#[derive(Debug, Clone)]
pub struct ExportShape {
    pub documents: usize,
    /// Raters per document are drawn from `1..=max_raters`.
    pub max_raters: usize,
    pub topics: usize,
    /// Rows per (document, rater) are drawn from `1..=max_spans`.
    pub max_spans: usize,
    pub max_document_length: u64,
}

impl Default for ExportShape {
    fn default() -> Self {
        ExportShape {
            documents: 20,
            max_raters: 5,
            topics: 4,
            max_spans: 6,
            max_document_length: 400,
        }
    }
}

/// Generates a random export. The same `seed` and `shape` always produce the
/// same rows.
///
/// Rows of one document are contiguous. Spans overlap freely, and every
/// document carries a task run count of at least its rater count.
pub fn generate_export(seed: u64, shape: &ExportShape) -> Vec<HighlightRow> {
    assert!(shape.max_raters > 0 && shape.topics > 0 && shape.max_spans > 0);
    assert!(shape.max_document_length > 0);

    let mut rng = fastrand::Rng::with_seed(seed);
    let mut rows = Vec::new();
    for doc in 0..shape.documents {
        let document_id = format!("{:016x}", rng.u64(..));
        let length = rng.u64(1..=shape.max_document_length);
        let raters = rng.usize(1..=shape.max_raters);
        let taskruns = (raters + rng.usize(0..=2)) as u64;
        for rater in 0..raters {
            let rater_id = format!("rater-{}", rng.usize(0..shape.max_raters * 4) * 100 + rater);
            for _ in 0..rng.usize(1..=shape.max_spans) {
                let a = rng.u64(0..=length);
                let b = rng.u64(0..=length);
                rows.push(HighlightRow {
                    document_id: document_id.clone(),
                    rater_id: rater_id.clone(),
                    topic_name: format!("Topic {}", rng.usize(0..shape.topics)),
                    start: a.min(b),
                    end: a.max(b),
                    document_length: length,
                    created: format!(
                        "2021-03-{:02}T{:02}:{:02}:00Z",
                        doc % 28 + 1,
                        rng.u32(0..24),
                        rng.u32(0..60)
                    ),
                    taskrun_count: Some(taskruns),
                });
            }
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let shape = ExportShape::default();
        assert_eq!(generate_export(42, &shape), generate_export(42, &shape));
        assert_ne!(generate_export(42, &shape), generate_export(43, &shape));
    }

    #[test]
    fn test_rows_are_valid() {
        let rows = generate_export(1, &ExportShape::default());
        assert!(!rows.is_empty());
        for row in rows {
            assert!(row.start <= row.end && row.end <= row.document_length);
        }
    }
}
