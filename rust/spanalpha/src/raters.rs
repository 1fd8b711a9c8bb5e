//! Per-document rater slots.
//!
//! The reliability matrix has one row per rater *slot*, not per rater: the
//! first rater to annotate a document gets slot 0, the second slot 1, and so
//! on. Two documents may map the same slot to different raters.

use std::ops::Range;

use ahash::AHashMap;

use crate::{padding::TaskRunPadding, record::Document};

/// Slot assignment for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RaterSlots {
    /// Rater ids indexed by slot.
    raters: Vec<String>,
    /// Phantom raters, occupying the slots after the real ones.
    phantom: usize,
}

impl RaterSlots {
    /// Assigns slots by first annotation time. Rows with equal timestamps keep
    /// their input order.
    pub fn assign(document: &Document, phantom: usize) -> RaterSlots {
        let mut rows: Vec<_> = document.rows().iter().collect();
        rows.sort_by(|a, b| a.created.cmp(&b.created));

        let mut raters: Vec<String> = Vec::new();
        for row in rows {
            if !raters.iter().any(|rater| *rater == row.rater_id) {
                raters.push(row.rater_id.clone());
            }
        }
        RaterSlots { raters, phantom }
    }

    pub fn slot(&self, rater_id: &str) -> Option<usize> {
        self.raters.iter().position(|rater| rater == rater_id)
    }

    pub fn rater(&self, slot: usize) -> Option<&str> {
        self.raters.get(slot).map(String::as_str)
    }

    /// Real raters in slot order.
    pub fn raters(&self) -> &[String] {
        &self.raters
    }

    pub fn phantom_slots(&self) -> Range<usize> {
        self.raters.len()..self.raters.len() + self.phantom
    }

    /// Number of occupied slots, phantom raters included.
    pub fn len(&self) -> usize {
        self.raters.len() + self.phantom
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Slot assignments of all documents.
#[derive(Debug, Clone, Default)]
pub struct RaterSequence {
    slots: AHashMap<String, RaterSlots>,
    max_raters: usize,
}

impl RaterSequence {
    pub fn build<'a, I>(documents: I, padding: &TaskRunPadding) -> RaterSequence
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let mut slots = AHashMap::new();
        let mut max_raters = 0;
        for doc in documents {
            let assigned = RaterSlots::assign(doc, padding.phantom_raters(doc.id()));
            max_raters = max_raters.max(assigned.len());
            slots.insert(doc.id().to_string(), assigned);
        }
        log::info!("Maximum raters for a document: {max_raters}");
        RaterSequence { slots, max_raters }
    }

    pub fn for_document(&self, document_id: &str) -> Option<&RaterSlots> {
        self.slots.get(document_id)
    }

    /// The largest slot count of any document; the row count of the matrix.
    pub fn max_raters(&self) -> usize {
        self.max_raters
    }
}
