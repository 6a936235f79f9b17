use crate::error::{DfResult, DimuForgeError};
use serde::{Deserialize, Serialize};

/// Fixed-width weighted 1D histogram with under/overflow and per-bin sum of squared weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram1D {
    pub name: String,
    pub bins: usize,
    pub min: f64,
    pub max: f64,
    pub contents: Vec<f64>,
    pub sumw2: Vec<f64>,
    pub underflow: f64,
    pub overflow: f64,
    pub entries: u64,
}

impl Histogram1D {
    pub fn new(name: &str, bins: usize, min: f64, max: f64) -> Self {
        Self {
            name: name.to_string(),
            bins,
            min,
            max,
            contents: vec![0.0; bins],
            sumw2: vec![0.0; bins],
            underflow: 0.0,
            overflow: 0.0,
            entries: 0,
        }
    }

    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.bins as f64
    }

    pub fn bin_center(&self, i: usize) -> f64 {
        self.min + (i as f64 + 0.5) * self.bin_width()
    }

    /// Bins are half-open, `[lo, hi)`; `max` itself goes to overflow. NaN is dropped.
    pub fn fill(&mut self, x: f64, w: f64) {
        if x.is_nan() {
            return;
        }
        self.entries += 1;
        if x < self.min {
            self.underflow += w;
            return;
        }
        if x >= self.max {
            self.overflow += w;
            return;
        }
        let i = (((x - self.min) / self.bin_width()) as usize).min(self.bins - 1);
        self.contents[i] += w;
        self.sumw2[i] += w * w;
    }

    /// Sum of in-range bin contents.
    pub fn integral(&self) -> f64 {
        self.contents.iter().sum()
    }

    /// Statistical uncertainty on [`Histogram1D::integral`].
    pub fn integral_error(&self) -> f64 {
        self.sumw2.iter().sum::<f64>().sqrt()
    }

    pub fn scale(&mut self, factor: f64) {
        for c in &mut self.contents {
            *c *= factor;
        }
        for e in &mut self.sumw2 {
            *e *= factor * factor;
        }
        self.underflow *= factor;
        self.overflow *= factor;
    }

    pub fn same_binning(&self, other: &Histogram1D) -> bool {
        self.bins == other.bins && self.min == other.min && self.max == other.max
    }

    pub fn add(&mut self, other: &Histogram1D) -> DfResult<()> {
        if !self.same_binning(other) {
            return Err(DimuForgeError::Validation(format!(
                "cannot add '{}' ({} bins, [{}, {})) to '{}' ({} bins, [{}, {}))",
                other.name, other.bins, other.min, other.max, self.name, self.bins, self.min, self.max
            )));
        }
        for (a, b) in self.contents.iter_mut().zip(&other.contents) {
            *a += b;
        }
        for (a, b) in self.sumw2.iter_mut().zip(&other.sumw2) {
            *a += b;
        }
        self.underflow += other.underflow;
        self.overflow += other.overflow;
        self.entries += other.entries;
        Ok(())
    }
}
