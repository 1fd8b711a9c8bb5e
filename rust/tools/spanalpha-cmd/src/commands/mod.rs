//! Command implementations for spanalpha-cmd

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use spanalpha::{
    DocumentOrder, LevelOfMeasurement, PipelineOptions, PipelineOutput, ReliabilityPipeline,
    loader,
};

use crate::utils;

pub mod inspect;
pub mod split;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OrderArg {
    /// Order of first appearance in the export
    Insertion,
    /// Ascending document id
    Id,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LevelArg {
    Nominal,
    Ordinal,
    Interval,
    Ratio,
}

/// Pipeline settings shared by all commands. Flags override values read from
/// the options file.
#[derive(Debug, Clone, Default, Args)]
pub struct PipelineArgs {
    /// JSON file with pipeline options
    #[arg(long)]
    pub options: Option<String>,

    /// Minimum number of raters for a document to be kept
    #[arg(long)]
    pub min_raters: Option<usize>,

    /// Order in which documents are laid out in the virtual corpus
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,

    /// Add phantom raters for task runs that produced no highlights
    #[arg(long)]
    pub pad_taskruns: bool,

    /// Level of measurement handed to the alpha routine
    #[arg(long, value_enum)]
    pub level: Option<LevelArg>,
}

impl PipelineArgs {
    pub fn resolve(&self) -> Result<PipelineOptions> {
        let mut options = match &self.options {
            Some(path) => {
                utils::validate_file_exists(path)?;
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read options file: {path}"))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("Failed to parse options file: {path}"))?
            }
            None => PipelineOptions::default(),
        };
        if let Some(min_raters) = self.min_raters {
            options.min_raters = min_raters;
        }
        if let Some(order) = self.order {
            options.document_order = match order {
                OrderArg::Insertion => DocumentOrder::Insertion,
                OrderArg::Id => DocumentOrder::ById,
            };
        }
        if self.pad_taskruns {
            options.pad_missing_taskruns = true;
        }
        if let Some(level) = self.level {
            options.level_of_measurement = match level {
                LevelArg::Nominal => LevelOfMeasurement::Nominal,
                LevelArg::Ordinal => LevelOfMeasurement::Ordinal,
                LevelArg::Interval => LevelOfMeasurement::Interval,
                LevelArg::Ratio => LevelOfMeasurement::Ratio,
            };
        }
        options.validate().context("Invalid pipeline options")?;
        Ok(options)
    }
}

/// Size of the loaded export, before filtering.
#[derive(Debug, Clone, Copy)]
pub struct InputSummary {
    pub documents: usize,
    pub rows: usize,
}

/// Loads `input_file` and runs the pipeline over it.
pub fn load_and_run(
    input_file: &str,
    args: &PipelineArgs,
) -> Result<(InputSummary, PipelineOutput)> {
    utils::validate_file_exists(input_file)?;
    let options = args.resolve()?;
    let set = loader::load_path(input_file)
        .with_context(|| format!("Failed to load highlights from {input_file}"))?;
    let summary = InputSummary {
        documents: set.len(),
        rows: set.row_count(),
    };
    let output = ReliabilityPipeline::new(options)?
        .run(set)
        .context("Failed to build reliability data")?;
    Ok((summary, output))
}
