use serde::{Deserialize, Serialize};
use spanalpha_common::{Result, verify_arg};

use crate::{corpus::DocumentOrder, emit::LevelOfMeasurement, pairability::PairabilityFilter};

/// Run options of a [`ReliabilityPipeline`](crate::ReliabilityPipeline).
///
/// Missing fields take their defaults when deserialized, so a JSON options
/// file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Documents with fewer raters are discarded.
    pub min_raters: usize,
    pub document_order: DocumentOrder,
    /// Add phantom raters for task runs that left no rows.
    pub pad_missing_taskruns: bool,
    pub level_of_measurement: LevelOfMeasurement,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            min_raters: PairabilityFilter::DEFAULT_MIN_RATERS,
            document_order: DocumentOrder::Insertion,
            pad_missing_taskruns: false,
            level_of_measurement: LevelOfMeasurement::Nominal,
        }
    }
}

impl PipelineOptions {
    pub fn validate(&self) -> Result<()> {
        verify_arg!(min_raters, self.min_raters >= 2);
        Ok(())
    }
}
