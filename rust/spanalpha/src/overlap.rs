//! Overlap resolution within one (document, rater, topic) group.
//!
//! A rater may highlight the same text twice under one topic. The spans are
//! swept left to right in `(start, end)` order and every span is clamped so it
//! starts no earlier than the furthest end seen so far. The earliest-starting
//! span keeps its extent; later ones lose their overlapping prefix, and spans
//! fully contained in an earlier one collapse to zero length (void).

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

use ahash::AHashMap;
use spanalpha_common::{Result, error::Error};

use crate::{
    record::{AnnotationSet, Document},
    topics::{TopicCode, TopicMap},
};

/// One clamp applied by the sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trim {
    pub document_id: String,
    pub rater_id: String,
    pub topic: TopicCode,
    pub before: Range<u64>,
    pub after: Range<u64>,
}

impl fmt::Display for Trim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} trimmed to {}:{}",
            self.before.start, self.before.end, self.after.start, self.after.end
        )
    }
}

/// Clamps `spans` in place so that no two overlap.
///
/// Returns the `(before, after)` pair of every span that changed. On return
/// `spans` is sorted by start and non-overlapping; void spans (`start == end`)
/// remain in the slice.
pub fn sweep_trim(spans: &mut [Range<u64>]) -> Vec<(Range<u64>, Range<u64>)> {
    spans.sort_by_key(|span| (span.start, span.end));
    let mut trims = Vec::new();
    let Some(first) = spans.first() else {
        return trims;
    };
    let mut max_pos = first.end;
    for span in spans.iter_mut().skip(1) {
        let before = span.clone();
        if span.start < max_pos {
            span.start = max_pos;
        }
        if span.end < max_pos {
            span.end = max_pos;
        }
        if *span != before {
            trims.push((before, span.clone()));
        }
        max_pos = max_pos.max(span.end);
    }
    trims
}

/// Resolved spans of one document, keyed by rater and topic.
#[derive(Debug, Clone, Default)]
pub struct DocumentSpans {
    groups: BTreeMap<(String, TopicCode), Vec<Range<u64>>>,
}

impl DocumentSpans {
    /// All resolved spans of the group in start order, void ones included.
    pub fn spans_for(&self, rater_id: &str, topic: TopicCode) -> &[Range<u64>] {
        self.groups
            .get(&(rater_id.to_string(), topic))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Spans of the group that cover at least one position.
    pub fn covered(&self, rater_id: &str, topic: TopicCode) -> impl Iterator<Item = Range<u64>> {
        self.spans_for(rater_id, topic)
            .iter()
            .filter(|span| !span.is_empty())
            .cloned()
    }

    pub fn void_count(&self) -> usize {
        self.groups
            .values()
            .flatten()
            .filter(|span| span.is_empty())
            .count()
    }
}

/// Resolves all groups of one document, appending the trims to `trims`.
pub fn resolve_document(
    document: &Document,
    topics: &TopicMap,
    trims: &mut Vec<Trim>,
) -> Result<DocumentSpans> {
    let mut groups: BTreeMap<(String, TopicCode), Vec<Range<u64>>> = BTreeMap::new();
    for row in document.rows() {
        let topic = topics.code(&row.topic_name).ok_or_else(|| {
            Error::invalid_operation(format!("resolve unmapped topic '{}'", row.topic_name))
        })?;
        groups
            .entry((row.rater_id.clone(), topic))
            .or_default()
            .push(row.range());
    }

    for ((rater_id, topic), spans) in groups.iter_mut() {
        for (before, after) in sweep_trim(spans) {
            let trim = Trim {
                document_id: document.id().to_string(),
                rater_id: rater_id.clone(),
                topic: *topic,
                before,
                after,
            };
            log::debug!("{trim}");
            trims.push(trim);
        }
    }
    Ok(DocumentSpans { groups })
}

/// Resolved spans of every document of a run plus the trim audit.
#[derive(Debug, Clone, Default)]
pub struct ResolvedCorpus {
    documents: AHashMap<String, DocumentSpans>,
    trims: Vec<Trim>,
}

impl ResolvedCorpus {
    pub fn resolve(set: &AnnotationSet, topics: &TopicMap) -> Result<ResolvedCorpus> {
        let mut documents = AHashMap::with_capacity(set.len());
        let mut trims = Vec::new();
        for doc in set.documents() {
            let spans = resolve_document(doc, topics, &mut trims)?;
            documents.insert(doc.id().to_string(), spans);
        }
        if !trims.is_empty() {
            log::info!("Trimmed {} overlapping spans", trims.len());
        }
        Ok(ResolvedCorpus { documents, trims })
    }

    pub fn document(&self, document_id: &str) -> Option<&DocumentSpans> {
        self.documents.get(document_id)
    }

    /// Trims in document order, then by rater and topic.
    pub fn trims(&self) -> &[Trim] {
        &self.trims
    }
}

#[cfg(test)]
#[allow(clippy::single_range_in_vec_init)]
mod tests {
    use super::*;
    use crate::record::AnnotationRow;

    fn row(rater: &str, topic: &str, start: u64, end: u64) -> AnnotationRow {
        AnnotationRow {
            row_number: 1,
            document_id: "doc".to_string(),
            rater_id: rater.to_string(),
            topic_name: topic.to_string(),
            start,
            end,
            document_length: 100,
            created: "2021".to_string(),
            taskrun_count: None,
        }
    }

    #[test]
    fn test_partial_overlap_trimmed() {
        let mut spans = vec![20..40, 10..30];
        let trims = sweep_trim(&mut spans);
        assert_eq!(spans, vec![10..30, 30..40]);
        assert_eq!(trims, vec![(20..40, 30..40)]);
    }

    #[test]
    fn test_contained_span_becomes_void() {
        let mut spans = vec![10..50, 20..30, 45..60];
        let trims = sweep_trim(&mut spans);
        assert_eq!(spans, vec![10..50, 50..50, 50..60]);
        assert_eq!(trims.len(), 2);
        assert!(spans[1].is_empty());
    }

    #[test]
    fn test_adjacent_spans_untouched() {
        let mut spans = vec![0..10, 10..20, 25..30];
        assert!(sweep_trim(&mut spans).is_empty());
        assert_eq!(spans, vec![0..10, 10..20, 25..30]);
    }

    #[test]
    fn test_earliest_start_wins() {
        // The longer span starting later is cut, not merged.
        let mut spans = vec![5..15, 0..10];
        sweep_trim(&mut spans);
        assert_eq!(spans, vec![0..10, 10..15]);
    }

    #[test]
    fn test_sweep_result_is_ordered_and_disjoint() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..200 {
            let mut spans: Vec<Range<u64>> = (0..8)
                .map(|_| {
                    let a = rng.u64(0..100);
                    let b = rng.u64(0..100);
                    a.min(b)..a.max(b)
                })
                .collect();
            sweep_trim(&mut spans);
            let covered: Vec<_> = spans.iter().filter(|s| !s.is_empty()).collect();
            for pair in covered.windows(2) {
                assert!(pair[0].end <= pair[1].start, "{covered:?}");
            }
        }
    }

    #[test]
    fn test_groups_resolved_independently() {
        let mut doc = Document::new("doc", 100);
        doc.push_row(row("u1", "Claim", 10, 30)).unwrap();
        doc.push_row(row("u1", "Claim", 20, 40)).unwrap();
        doc.push_row(row("u1", "Evidence", 15, 25)).unwrap();
        doc.push_row(row("u2", "Claim", 25, 35)).unwrap();
        let topics = TopicMap::from_names(["Claim", "Evidence"]);

        let mut trims = Vec::new();
        let spans = resolve_document(&doc, &topics, &mut trims).unwrap();
        let claim = topics.code("Claim").unwrap();
        let evidence = topics.code("Evidence").unwrap();
        assert_eq!(spans.spans_for("u1", claim), [10..30, 30..40]);
        assert_eq!(spans.spans_for("u1", evidence), [15..25]);
        assert_eq!(spans.spans_for("u2", claim), [25..35]);
        assert!(spans.spans_for("u2", evidence).is_empty());

        assert_eq!(trims.len(), 1);
        assert_eq!(trims[0].rater_id, "u1");
        assert_eq!(trims[0].topic, claim);
        assert_eq!(trims[0].to_string(), "20:40 trimmed to 30:40");
    }

    #[test]
    fn test_void_spans_not_covered() {
        let mut doc = Document::new("doc", 100);
        doc.push_row(row("u1", "Claim", 10, 50)).unwrap();
        doc.push_row(row("u1", "Claim", 20, 30)).unwrap();
        let topics = TopicMap::from_names(["Claim"]);
        let spans = resolve_document(&doc, &topics, &mut Vec::new()).unwrap();
        let covered: Vec<_> = spans.covered("u1", TopicCode(0)).collect();
        assert_eq!(covered, vec![10..50]);
        assert_eq!(spans.void_count(), 1);
    }

    #[test]
    fn test_resolve_corpus() {
        let mut set = AnnotationSet::new();
        set.push_row(row("u1", "Claim", 0, 10)).unwrap();
        set.push_row(row("u1", "Claim", 5, 12)).unwrap();
        let topics = TopicMap::from_annotations(&set);
        let resolved = ResolvedCorpus::resolve(&set, &topics).unwrap();
        assert_eq!(resolved.trims().len(), 1);
        assert!(resolved.document("doc").is_some());
        assert!(resolved.document("other").is_none());
    }

    #[test]
    fn test_unmapped_topic_rejected() {
        let mut doc = Document::new("doc", 100);
        doc.push_row(row("u1", "Claim", 0, 10)).unwrap();
        let topics = TopicMap::from_names(["Evidence"]);
        assert!(resolve_document(&doc, &topics, &mut Vec::new()).is_err());
    }
}
