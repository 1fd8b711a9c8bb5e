//! Gap synthesis and projection into virtual corpus coordinates.
//!
//! A projection is built for one topic. For every document and every rater
//! slot participating in it, the rater's resolved spans of that topic are
//! interleaved with [`Label::NoAnnotation`] gaps so that together they tile
//! the whole document, and the result is shifted by the document offset.

use std::ops::Range;

use itertools::Itertools;
use spanalpha_common::{Result, error::Error};
use spanalpha_ranges::{RangeIteratorsExt, complement_ranges, is_exact_tiling};

use crate::{
    corpus::VirtualCorpus,
    matrix::ReliabilityMatrix,
    overlap::ResolvedCorpus,
    raters::RaterSequence,
    topics::TopicCode,
};

/// Exchange code written for [`Label::NoAnnotation`].
pub const NO_ANNOTATION_CODE: u32 = 9999;

/// The value a rater assigned to a character position.
///
/// Ordering puts every topic before `NoAnnotation`, which matches the order of
/// the exchange codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    Topic(TopicCode),
    NoAnnotation,
}

impl Label {
    /// The numeric code of the label in exchange output.
    pub fn code(self) -> u32 {
        match self {
            Label::Topic(TopicCode(code)) => code,
            Label::NoAnnotation => NO_ANNOTATION_CODE,
        }
    }

    pub fn value(self) -> f64 {
        self.code() as f64
    }
}

/// A labeled range of the virtual corpus attributed to one rater slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedSpan {
    pub document_id: String,
    pub slot: usize,
    pub label: Label,
    pub range: Range<u64>,
}

/// Splits `[0, length)` into the `covered` spans (labeled `topic`) and the
/// uncovered gaps between them.
///
/// `covered` must be sorted by start and non-overlapping.
pub fn tile_document(
    length: u64,
    topic: TopicCode,
    covered: &[Range<u64>],
) -> Vec<(Label, Range<u64>)> {
    let gaps = complement_ranges(length, covered.iter().cloned())
        .map(|range| (Label::NoAnnotation, range));
    let spans = covered
        .iter()
        .cloned()
        .map(|range| (Label::Topic(topic), range));
    let tiles: Vec<_> = spans
        .merge_by(gaps, |a, b| a.1.start <= b.1.start)
        .collect();
    debug_assert!(is_exact_tiling(
        length,
        tiles.iter().map(|(_, range)| range.clone())
    ));
    tiles
}

/// All projected spans of one topic.
#[derive(Debug, Clone)]
pub struct Projection {
    topic: TopicCode,
    raters: usize,
    units: u64,
    spans: Vec<ProjectedSpan>,
}

impl Projection {
    /// Projects `topic` over the whole corpus.
    ///
    /// Spans are ordered by document (corpus order), then slot, then position.
    pub fn build(
        topic: TopicCode,
        corpus: &VirtualCorpus,
        sequence: &RaterSequence,
        resolved: &ResolvedCorpus,
    ) -> Result<Projection> {
        let mut spans = Vec::new();
        for entry in corpus.entries() {
            let id = entry.document_id.as_str();
            let slots = sequence.for_document(id).ok_or_else(|| {
                Error::invalid_operation(format!("project unsequenced document '{id}'"))
            })?;
            let document = resolved.document(id).ok_or_else(|| {
                Error::invalid_operation(format!("project unresolved document '{id}'"))
            })?;

            for (slot, rater_id) in slots.raters().iter().enumerate() {
                let covered: Vec<_> = document.covered(rater_id, topic).collect();
                let tiles = tile_document(entry.length, topic, &covered);
                push_shifted(&mut spans, id, slot, entry.offset, tiles);
            }
            for slot in slots.phantom_slots() {
                let tiles = tile_document(entry.length, topic, &[]);
                push_shifted(&mut spans, id, slot, entry.offset, tiles);
            }
        }

        Ok(Projection {
            topic,
            raters: sequence.max_raters(),
            units: corpus.total_length(),
            spans,
        })
    }

    pub fn topic(&self) -> TopicCode {
        self.topic
    }

    /// Row count of the matrix.
    pub fn raters(&self) -> usize {
        self.raters
    }

    /// Column count of the matrix (virtual corpus length).
    pub fn units(&self) -> u64 {
        self.units
    }

    pub fn spans(&self) -> &[ProjectedSpan] {
        &self.spans
    }

    pub fn matrix(&self) -> Result<ReliabilityMatrix> {
        ReliabilityMatrix::from_spans(self.raters, self.units, &self.spans)
    }
}

fn push_shifted(
    spans: &mut Vec<ProjectedSpan>,
    document_id: &str,
    slot: usize,
    offset: u64,
    tiles: Vec<(Label, Range<u64>)>,
) {
    let (labels, ranges): (Vec<_>, Vec<_>) = tiles.into_iter().unzip();
    spans.extend(
        labels
            .into_iter()
            .zip(ranges.into_iter().shift_up(offset))
            .map(|(label, range)| ProjectedSpan {
                document_id: document_id.to_string(),
                slot,
                label,
                range,
            }),
    );
}
