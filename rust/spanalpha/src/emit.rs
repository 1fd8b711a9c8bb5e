//! Reliability output: alpha routine input and the exchange CSV format.
//!
//! The exchange format has one headerless row per projected span:
//!
//! ```text
//! u0,0,9999,,0,10
//! u1,0,2,,10,30
//! ```
//!
//! with columns row label, rater slot, label code (9999 for no annotation), an
//! always-empty placeholder, virtual start and virtual end.

use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;

use arrow_array::{ArrayRef, RecordBatch, StringArray, UInt32Array, UInt64Array};
use arrow_schema::{DataType, Field, Schema};
use serde::{Deserialize, Serialize};
use spanalpha_common::{Result, error::Error};

use crate::{matrix::ReliabilityMatrix, projection::Projection};

/// How distances between values are measured by the alpha routine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelOfMeasurement {
    #[default]
    Nominal,
    Ordinal,
    Interval,
    Ratio,
}

impl fmt::Display for LevelOfMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LevelOfMeasurement::Nominal => "nominal",
            LevelOfMeasurement::Ordinal => "ordinal",
            LevelOfMeasurement::Interval => "interval",
            LevelOfMeasurement::Ratio => "ratio",
        };
        f.write_str(name)
    }
}

impl FromStr for LevelOfMeasurement {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "nominal" => Ok(LevelOfMeasurement::Nominal),
            "ordinal" => Ok(LevelOfMeasurement::Ordinal),
            "interval" => Ok(LevelOfMeasurement::Interval),
            "ratio" => Ok(LevelOfMeasurement::Ratio),
            _ => Err(Error::invalid_arg(
                "level_of_measurement",
                format!("unknown level '{s}'"),
            )),
        }
    }
}

/// A Krippendorff's alpha implementation.
///
/// `data` has one row per rater slot and one column per unit, with `NaN` for
/// missing values. `value_domain` lists the distinct values in ascending order.
pub trait AlphaRoutine {
    fn alpha(
        &self,
        data: &[Vec<f64>],
        value_domain: &[f64],
        level: LevelOfMeasurement,
    ) -> Result<f64>;
}

/// Runs `routine` over `matrix`.
pub fn compute_alpha(
    routine: &dyn AlphaRoutine,
    matrix: &ReliabilityMatrix,
    level: LevelOfMeasurement,
) -> Result<f64> {
    let domain: Vec<f64> = matrix.value_domain().into_iter().map(|l| l.value()).collect();
    let alpha = routine.alpha(&matrix.to_alpha_input(), &domain, level)?;
    if alpha.is_nan() {
        return Err(Error::alpha("routine returned NaN"));
    }
    Ok(alpha)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeRow {
    pub row_label: String,
    pub slot: u64,
    pub code: u32,
    pub start: u64,
    pub end: u64,
}

/// Exchange rows of a projection in span order, labeled `u0`, `u1`, ...
pub fn exchange_rows(projection: &Projection) -> Vec<ExchangeRow> {
    projection
        .spans()
        .iter()
        .enumerate()
        .map(|(n, span)| ExchangeRow {
            row_label: format!("u{n}"),
            slot: span.slot as u64,
            code: span.label.code(),
            start: span.range.start,
            end: span.range.end,
        })
        .collect()
}

fn exchange_schema() -> Schema {
    Schema::new(vec![
        Field::new("row_label", DataType::Utf8, false),
        Field::new("user_sequence_id", DataType::UInt64, false),
        Field::new("topic_number", DataType::UInt32, false),
        Field::new("empty_col", DataType::Utf8, true),
        Field::new("start_pos", DataType::UInt64, false),
        Field::new("end_pos", DataType::UInt64, false),
    ])
}

pub fn exchange_batch(rows: &[ExchangeRow]) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(|r| r.row_label.as_str()),
        )),
        Arc::new(UInt64Array::from_iter_values(rows.iter().map(|r| r.slot))),
        Arc::new(UInt32Array::from_iter_values(rows.iter().map(|r| r.code))),
        Arc::new(StringArray::new_null(rows.len())),
        Arc::new(UInt64Array::from_iter_values(rows.iter().map(|r| r.start))),
        Arc::new(UInt64Array::from_iter_values(rows.iter().map(|r| r.end))),
    ];
    RecordBatch::try_new(Arc::new(exchange_schema()), columns)
        .map_err(|e| Error::arrow("failed to assemble exchange rows", e))
}

/// Writes `rows` as headerless CSV and returns the writer.
pub fn write_exchange<W: Write>(rows: &[ExchangeRow], out: W) -> Result<W> {
    let batch = exchange_batch(rows)?;
    let mut writer = arrow_csv::WriterBuilder::new()
        .with_header(false)
        .build(out);
    writer
        .write(&batch)
        .map_err(|e| Error::arrow("failed to write exchange rows", e))?;
    let mut out = writer.into_inner();
    out.flush().map_err(|e| Error::io("exchange output", e))?;
    Ok(out)
}
