//! Task-run padding.
//!
//! A document scheduled for `n` task runs but annotated by fewer raters had
//! raters who read it and highlighted nothing (their task runs produced no
//! rows). When enabled, those raters are restored as phantom raters: they take
//! the rater slots after the real raters and project as
//! [`Label::NoAnnotation`](crate::Label::NoAnnotation) over the whole document.

use ahash::AHashMap;

use crate::record::AnnotationSet;

/// Number of phantom raters per document.
#[derive(Debug, Clone, Default)]
pub struct TaskRunPadding {
    phantom: AHashMap<String, usize>,
}

impl TaskRunPadding {
    /// No padding at all.
    pub fn none() -> TaskRunPadding {
        Default::default()
    }

    /// Computes the missing task runs of every document that carries an
    /// expected task run count.
    pub fn from_annotations(set: &AnnotationSet) -> TaskRunPadding {
        let mut phantom = AHashMap::new();
        for doc in set.documents() {
            let raters = doc.rater_count() as u64;
            match doc.expected_taskruns() {
                Some(expected) if raters > 0 && raters < expected => {
                    phantom.insert(doc.id().to_string(), (expected - raters) as usize);
                }
                _ => (),
            }
        }
        if !phantom.is_empty() {
            log::info!(
                "Added phantom task runs to {} documents",
                phantom.len()
            );
        }
        TaskRunPadding { phantom }
    }

    pub fn phantom_raters(&self, document_id: &str) -> usize {
        self.phantom.get(document_id).copied().unwrap_or(0)
    }

    pub fn padded_documents(&self) -> usize {
        self.phantom.len()
    }
}
