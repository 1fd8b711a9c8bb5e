//! End-to-end reliability pipeline over a loaded [`AnnotationSet`].

use ahash::AHashMap;
use spanalpha_common::{Result, error::Error};

use crate::{
    corpus::VirtualCorpus,
    emit::{AlphaRoutine, compute_alpha},
    options::PipelineOptions,
    overlap::{ResolvedCorpus, Trim},
    padding::TaskRunPadding,
    pairability::PairabilityFilter,
    projection::{NO_ANNOTATION_CODE, Projection},
    raters::RaterSequence,
    record::AnnotationSet,
    topics::{TopicCode, TopicMap},
};

pub struct ReliabilityPipeline {
    options: PipelineOptions,
    filter: PairabilityFilter,
}

impl ReliabilityPipeline {
    pub fn new(options: PipelineOptions) -> Result<ReliabilityPipeline> {
        options.validate()?;
        let filter = PairabilityFilter::new(options.min_raters)?;
        Ok(ReliabilityPipeline { options, filter })
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Normalizes topics, filters, indexes, sequences and resolves `set`.
    ///
    /// Topic codes are assigned over the whole input, before filtering, so a
    /// topic keeps its code even if all of its documents are discarded.
    pub fn run(&self, set: AnnotationSet) -> Result<PipelineOutput> {
        let topics = TopicMap::from_annotations(&set);
        if topics.len() >= NO_ANNOTATION_CODE as usize {
            return Err(Error::invalid_arg(
                "topic_name",
                format!(
                    "{} distinct topics collide with the no-annotation code {}",
                    topics.len(),
                    NO_ANNOTATION_CODE
                ),
            ));
        }

        let padding = if self.options.pad_missing_taskruns {
            TaskRunPadding::from_annotations(&set)
        } else {
            TaskRunPadding::none()
        };
        let outcome = self.filter.apply(set, &padding);
        let retained = outcome.retained;

        let corpus = VirtualCorpus::build(retained.documents(), self.options.document_order);
        let sequence = RaterSequence::build(retained.documents(), &padding);
        let resolved = ResolvedCorpus::resolve(&retained, &topics)?;

        Ok(PipelineOutput {
            options: self.options.clone(),
            topics,
            corpus,
            sequence,
            resolved,
            discarded: outcome.discarded,
            padded_documents: padding.padded_documents(),
        })
    }
}

/// Everything derived from one run; projections are built on demand.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub options: PipelineOptions,
    pub topics: TopicMap,
    pub corpus: VirtualCorpus,
    pub sequence: RaterSequence,
    pub resolved: ResolvedCorpus,
    /// Ids of documents removed for having too few raters, in input order.
    pub discarded: Vec<String>,
    pub padded_documents: usize,
}

impl PipelineOutput {
    pub fn project(&self, topic: TopicCode) -> Result<Projection> {
        if self.topics.name(topic).is_none() {
            return Err(Error::invalid_arg("topic", format!("unknown topic code {topic}")));
        }
        Projection::build(topic, &self.corpus, &self.sequence, &self.resolved)
    }

    /// One projection per topic, in code order.
    pub fn projections(&self) -> impl Iterator<Item = Result<(TopicCode, Projection)>> + '_ {
        self.topics
            .iter()
            .map(|(code, _)| self.project(code).map(|projection| (code, projection)))
    }

    pub fn alpha(&self, routine: &dyn AlphaRoutine, topic: TopicCode) -> Result<f64> {
        let matrix = self.project(topic)?.matrix()?;
        compute_alpha(routine, &matrix, self.options.level_of_measurement)
    }

    pub fn trims(&self) -> &[Trim] {
        self.resolved.trims()
    }

    /// Trim count per topic.
    pub fn trims_by_topic(&self) -> AHashMap<TopicCode, usize> {
        let mut counts = AHashMap::new();
        for trim in self.trims() {
            *counts.entry(trim.topic).or_insert(0) += 1;
        }
        counts
    }
}
