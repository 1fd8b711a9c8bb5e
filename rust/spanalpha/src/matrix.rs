//! Dense `[rater slot × virtual position]` reliability matrix.

use std::ops::Range;

use spanalpha_common::{Result, verify_arg};

use crate::projection::{Label, ProjectedSpan};

/// Cells are `None` where the slot did not rate the position.
#[derive(Debug, Clone, PartialEq)]
pub struct ReliabilityMatrix {
    raters: usize,
    units: usize,
    cells: Vec<Option<Label>>,
}

impl ReliabilityMatrix {
    /// An all-missing matrix.
    pub fn new(raters: usize, units: u64) -> ReliabilityMatrix {
        let units = units as usize;
        ReliabilityMatrix {
            raters,
            units,
            cells: vec![None; raters * units],
        }
    }

    pub fn from_spans(
        raters: usize,
        units: u64,
        spans: &[ProjectedSpan],
    ) -> Result<ReliabilityMatrix> {
        let mut matrix = ReliabilityMatrix::new(raters, units);
        for span in spans {
            matrix.fill(span.slot, span.range.clone(), span.label)?;
        }
        Ok(matrix)
    }

    /// Sets `label` on every position of `range` in row `slot`.
    pub fn fill(&mut self, slot: usize, range: Range<u64>, label: Label) -> Result<()> {
        verify_arg!(slot, slot < self.raters);
        verify_arg!(range, range.start <= range.end && range.end as usize <= self.units);
        let row = slot * self.units;
        self.cells[row + range.start as usize..row + range.end as usize].fill(Some(label));
        Ok(())
    }

    pub fn raters(&self) -> usize {
        self.raters
    }

    pub fn units(&self) -> usize {
        self.units
    }

    pub fn get(&self, slot: usize, unit: usize) -> Option<Label> {
        if slot >= self.raters || unit >= self.units {
            return None;
        }
        self.cells[slot * self.units + unit]
    }

    pub fn row(&self, slot: usize) -> &[Option<Label>] {
        &self.cells[slot * self.units..(slot + 1) * self.units]
    }

    /// Number of non-missing cells.
    pub fn observed_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Sum over units of the observed cell count, counting only units with
    /// at least two observations.
    pub fn pairable_values(&self) -> usize {
        (0..self.units)
            .map(|unit| {
                (0..self.raters)
                    .filter(|&slot| self.cells[slot * self.units + unit].is_some())
                    .count()
            })
            .filter(|&observed| observed >= 2)
            .sum()
    }

    /// Distinct labels present, in code order.
    pub fn value_domain(&self) -> Vec<Label> {
        let mut domain: Vec<Label> = self.cells.iter().flatten().copied().collect();
        domain.sort_unstable();
        domain.dedup();
        domain
    }

    /// Rows of label codes with `NaN` for missing cells.
    pub fn to_alpha_input(&self) -> Vec<Vec<f64>> {
        (0..self.raters)
            .map(|slot| {
                self.row(slot)
                    .iter()
                    .map(|cell| cell.map_or(f64::NAN, Label::value))
                    .collect()
            })
            .collect()
    }
}
