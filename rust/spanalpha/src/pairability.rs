//! Removal of documents that cannot contribute to a reliability estimate.
//!
//! Alpha compares the values two raters assigned to the same unit, so a
//! document seen by a single rater carries no pairable values.

use spanalpha_common::{Result, verify_arg};

use crate::{padding::TaskRunPadding, record::AnnotationSet};

#[derive(Debug, Clone, Copy)]
pub struct PairabilityFilter {
    min_raters: usize,
}

/// Documents kept and ids of the documents removed, in input order.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub retained: AnnotationSet,
    pub discarded: Vec<String>,
}

impl PairabilityFilter {
    pub const DEFAULT_MIN_RATERS: usize = 2;

    pub fn new(min_raters: usize) -> Result<PairabilityFilter> {
        verify_arg!(min_raters, min_raters >= 2);
        Ok(PairabilityFilter { min_raters })
    }

    pub fn min_raters(&self) -> usize {
        self.min_raters
    }

    /// Splits `set` into pairable and discarded documents. Phantom raters from
    /// `padding` count as raters.
    pub fn apply(&self, mut set: AnnotationSet, padding: &TaskRunPadding) -> FilterOutcome {
        let removed = set.retain(|doc| {
            doc.rater_count() + padding.phantom_raters(doc.id()) >= self.min_raters
        });
        let discarded: Vec<String> = removed.iter().map(|doc| doc.id().to_string()).collect();
        if !discarded.is_empty() {
            log::info!(
                "Removing {} documents with less than {} raters",
                discarded.len(),
                self.min_raters
            );
        }
        FilterOutcome {
            retained: set,
            discarded,
        }
    }
}

impl Default for PairabilityFilter {
    fn default() -> Self {
        PairabilityFilter {
            min_raters: Self::DEFAULT_MIN_RATERS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AnnotationRow;

    fn row(doc: &str, rater: &str, taskruns: Option<u64>) -> AnnotationRow {
        AnnotationRow {
            row_number: 1,
            document_id: doc.to_string(),
            rater_id: rater.to_string(),
            topic_name: "Claim".to_string(),
            start: 0,
            end: 1,
            document_length: 10,
            created: "2021".to_string(),
            taskrun_count: taskruns,
        }
    }

    fn sample() -> AnnotationSet {
        let mut set = AnnotationSet::new();
        set.push_row(row("solo", "u1", Some(3))).unwrap();
        set.push_row(row("solo", "u1", Some(3))).unwrap();
        set.push_row(row("pair", "u1", None)).unwrap();
        set.push_row(row("pair", "u2", None)).unwrap();
        set.push_row(row("trio", "u1", None)).unwrap();
        set.push_row(row("trio", "u2", None)).unwrap();
        set.push_row(row("trio", "u3", None)).unwrap();
        set
    }

    #[test]
    fn test_single_rater_document_discarded() {
        let outcome = PairabilityFilter::default().apply(sample(), &TaskRunPadding::none());
        assert_eq!(outcome.discarded, vec!["solo".to_string()]);
        assert!(outcome.retained.get("solo").is_none());
        assert_eq!(outcome.retained.len(), 2);
    }

    #[test]
    fn test_higher_threshold() {
        let filter = PairabilityFilter::new(3).unwrap();
        let outcome = filter.apply(sample(), &TaskRunPadding::none());
        assert_eq!(outcome.discarded, vec!["solo".to_string(), "pair".to_string()]);
        assert_eq!(outcome.retained.documents()[0].id(), "trio");
    }

    #[test]
    fn test_phantom_raters_count() {
        let set = sample();
        let padding = TaskRunPadding::from_annotations(&set);
        let outcome = PairabilityFilter::default().apply(set, &padding);
        assert!(outcome.discarded.is_empty());
    }

    #[test]
    fn test_threshold_below_two_rejected() {
        assert!(PairabilityFilter::new(1).is_err());
    }
}
