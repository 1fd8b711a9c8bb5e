//! Inspect command implementation

use anyhow::{Context, Result};
use serde::Serialize;

use crate::commands::{PipelineArgs, load_and_run};

#[derive(Serialize)]
struct InspectSummary {
    input: InputInfo,
    options: spanalpha::PipelineOptions,
    corpus: CorpusInfo,
    topics: Vec<TopicInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    discarded_documents: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    trims: Vec<TrimInfo>,
}

#[derive(Serialize)]
struct InputInfo {
    path: String,
    documents: usize,
    rows: usize,
}

#[derive(Serialize)]
struct CorpusInfo {
    documents: usize,
    discarded: usize,
    padded: usize,
    length: u64,
    max_raters: usize,
}

#[derive(Serialize)]
struct TopicInfo {
    code: u32,
    name: String,
    spans: usize,
    observed_cells: usize,
    pairable_values: usize,
    value_domain: Vec<u32>,
    trims: usize,
}

#[derive(Serialize)]
struct TrimInfo {
    document: String,
    rater: String,
    topic: u32,
    before: String,
    after: String,
}

pub fn run(verbose: u8, input_file: String, args: PipelineArgs) -> Result<()> {
    println!("Inspecting highlights: {input_file}");
    let (input, output) = load_and_run(&input_file, &args)?;
    let trims = output.trims_by_topic();

    let mut topics = Vec::with_capacity(output.topics.len());
    for projection in output.projections() {
        let (code, projection) = projection?;
        let matrix = projection
            .matrix()
            .with_context(|| format!("Failed to build the matrix of topic {code}"))?;
        topics.push(TopicInfo {
            code: code.0,
            name: output.topics.name(code).unwrap_or_default().to_string(),
            spans: projection.spans().len(),
            observed_cells: matrix.observed_count(),
            pairable_values: matrix.pairable_values(),
            value_domain: matrix.value_domain().into_iter().map(|l| l.code()).collect(),
            trims: trims.get(&code).copied().unwrap_or(0),
        });
    }

    let summary = InspectSummary {
        input: InputInfo {
            path: input_file,
            documents: input.documents,
            rows: input.rows,
        },
        options: output.options.clone(),
        corpus: CorpusInfo {
            documents: output.corpus.len(),
            discarded: output.discarded.len(),
            padded: output.padded_documents,
            length: output.corpus.total_length(),
            max_raters: output.sequence.max_raters(),
        },
        topics,
        discarded_documents: if verbose > 0 {
            output.discarded.clone()
        } else {
            Vec::new()
        },
        trims: if verbose > 1 {
            output
                .trims()
                .iter()
                .map(|trim| TrimInfo {
                    document: trim.document_id.clone(),
                    rater: trim.rater_id.clone(),
                    topic: trim.topic.0,
                    before: format!("{}:{}", trim.before.start, trim.before.end),
                    after: format!("{}:{}", trim.after.start, trim.after.end),
                })
                .collect()
        } else {
            Vec::new()
        },
    };

    let json = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
    println!("{json}");
    Ok(())
}
