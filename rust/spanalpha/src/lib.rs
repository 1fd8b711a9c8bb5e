//! Reliability matrices for crowdsourced span highlights.
//!
//! Highlight exports list one row per (document, rater, topic, span). This
//! crate turns such an export into per-topic reliability matrices suitable for
//! Krippendorff's alpha:
//!
//! 1. [`loader`] parses the rows and groups them by document.
//! 2. [`topics`] assigns every topic name a small integer code.
//! 3. [`padding`] optionally adds phantom raters for missing task runs.
//! 4. [`pairability`] drops documents seen by too few raters.
//! 5. [`corpus`] lays the retained documents end to end in one virtual corpus.
//! 6. [`raters`] numbers the raters of each document by first annotation time.
//! 7. [`overlap`] trims overlapping spans of the same rater and topic.
//! 8. [`projection`] fills un-highlighted text with [`Label::NoAnnotation`] and
//!    moves every span into virtual corpus coordinates; [`matrix`] holds the
//!    resulting dense [rater × position] grid.
//! 9. [`emit`] hands a matrix to an [`AlphaRoutine`] or writes the spans in the
//!    exchange CSV format.
//!
//! [`pipeline::ReliabilityPipeline`] runs steps 2–7 and produces projections
//! on demand.

pub mod corpus;
pub mod emit;
pub mod loader;
pub mod matrix;
pub mod options;
pub mod overlap;
pub mod padding;
pub mod pairability;
pub mod pipeline;
pub mod projection;
pub mod raters;
pub mod record;
pub mod topics;

pub use corpus::{DocumentOrder, VirtualCorpus};
pub use emit::{AlphaRoutine, ExchangeRow, LevelOfMeasurement};
pub use matrix::ReliabilityMatrix;
pub use options::PipelineOptions;
pub use pipeline::{PipelineOutput, ReliabilityPipeline};
pub use projection::{Label, NO_ANNOTATION_CODE, Projection};
pub use record::{AnnotationRow, AnnotationSet, Document};
pub use topics::{TopicCode, TopicMap};
