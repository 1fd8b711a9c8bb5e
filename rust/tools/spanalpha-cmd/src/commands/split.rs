//! Split command implementation

use anyhow::{Context, Result};
use spanalpha::emit::{exchange_rows, write_exchange};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use crate::commands::{PipelineArgs, load_and_run};
use crate::utils;

pub fn run(input_file: String, output_dir: String, args: PipelineArgs) -> Result<()> {
    println!("Splitting highlights by topic: {input_file}");
    let (input, output) = load_and_run(&input_file, &args)?;

    let output_dir = Path::new(&output_dir);
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;
    let batch = utils::batch_name(Path::new(&input_file));
    let trims = output.trims_by_topic();

    let mut written = 0;
    for projection in output.projections() {
        let (code, projection) = projection?;
        let name = output.topics.name(code).unwrap_or_default();
        let path = utils::topic_output_path(output_dir, &batch, name);
        println!("Saving topic '{}' to '{}'", name, path.display());

        let rows = exchange_rows(&projection);
        let file = File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        write_exchange(&rows, BufWriter::new(file))
            .with_context(|| format!("Failed to write {}", path.display()))?;

        let matrix = projection.matrix()?;
        println!(
            "  {} spans, {} raters x {} units, {} pairable values, {} trims",
            rows.len(),
            matrix.raters(),
            matrix.units(),
            matrix.pairable_values(),
            trims.get(&code).copied().unwrap_or(0)
        );
        written += 1;
    }

    println!("Split completed:");
    println!("  Documents loaded: {}", input.documents);
    println!("  Rows loaded: {}", input.rows);
    println!("  Documents discarded: {}", output.discarded.len());
    println!("  Corpus length: {}", output.corpus.total_length());
    println!("  Topic files written: {written}");
    Ok(())
}
