//! Runs one categorizer over every event of a sample and books per-category histograms.

use crate::category::Categorizer;
use crate::config::JetCuts;
use crate::error::DfResult;
use crate::histogram::Histogram1D;
use crate::sample::{Sample, SampleKind};
use crate::selection::JetCleaner;
use crate::variables::{MassBinning, PlotVariable};
use crate::vars::{EventRecord, VarSet};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Signal-region window kept blind in data when filling `dimu_mass`.
pub const BLIND_WINDOW: (f64, f64) = (110.0, 140.0);

#[derive(Debug, Clone)]
pub struct FillSettings {
    pub variable: PlotVariable,
    pub mass_binning: MassBinning,
    /// Integrated luminosity in pb^-1.
    pub luminosity: f64,
    pub blind: bool,
    /// Extra factor applied to simulated samples after the luminosity scale.
    pub trigger_sf: f64,
    pub jet_cuts: JetCuts,
}

impl Default for FillSettings {
    fn default() -> Self {
        Self {
            variable: PlotVariable::DimuMass,
            mass_binning: MassBinning::Default,
            luminosity: 36814.0,
            blind: true,
            trigger_sf: 1.0,
            jet_cuts: JetCuts::default(),
        }
    }
}

/// Histograms of one sample, one per visible category, in registry order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleHistograms {
    pub sample: String,
    pub kind: SampleKind,
    pub events_processed: usize,
    pub histograms: Vec<(String, Histogram1D)>,
}

impl SampleHistograms {
    pub fn get(&self, category: &str) -> Option<&Histogram1D> {
        self.histograms
            .iter()
            .find(|(k, _)| k == category)
            .map(|(_, h)| h)
    }
}

fn is_blinded(settings: &FillSettings, sample: &Sample, x: f64) -> bool {
    settings.blind
        && sample.is_data()
        && settings.variable == PlotVariable::DimuMass
        && x >= BLIND_WINDOW.0
        && x < BLIND_WINDOW.1
}

/// Sequential event loop of one sample: reset, evaluate, fill visible in-category histograms.
pub fn process_sample(
    sample: &Sample,
    events: &[EventRecord],
    categorizer: &mut dyn Categorizer,
    settings: &FillSettings,
) -> SampleHistograms {
    let binning = settings.variable.binning(settings.mass_binning);
    let cleaner = JetCleaner::new(settings.jet_cuts.clone());

    // slot per category so the hot loop never looks up by name
    let mut histograms: Vec<(String, Histogram1D)> = categorizer
        .categories()
        .iter()
        .map(|c| {
            let name = format!("{}_{}_{}", c.key, settings.variable, sample.name);
            (c.key.clone(), Histogram1D::new(&name, binning.bins, binning.min, binning.max))
        })
        .collect();

    for event in events {
        categorizer.reset();
        let vars = VarSet::new(event, &cleaner);
        categorizer.evaluate(&vars);

        let values = settings.variable.values(&vars);
        for (slot, c) in categorizer.categories().iter().enumerate() {
            if c.hide || !c.in_category {
                continue;
            }
            for &x in &values {
                if !is_blinded(settings, sample, x) {
                    histograms[slot].1.fill(x, vars.weight);
                }
            }
        }
    }
    categorizer.reset();

    let mut scale = sample.scale_factor(settings.luminosity);
    if !sample.is_data() {
        scale *= settings.trigger_sf;
    }
    let visible: Vec<bool> = categorizer.categories().iter().map(|c| !c.hide).collect();
    let histograms = histograms
        .into_iter()
        .zip(visible)
        .filter(|(_, keep)| *keep)
        .map(|((key, mut h), _)| {
            h.scale(scale);
            (key, h)
        })
        .collect();

    SampleHistograms {
        sample: sample.name.clone(),
        kind: sample.kind,
        events_processed: events.len(),
        histograms,
    }
}

/// Processes every sample in parallel. Each sample gets its own copy of `prototype`.
pub fn process_samples(
    samples: &[Sample],
    prototype: &dyn Categorizer,
    settings: &FillSettings,
) -> DfResult<Vec<SampleHistograms>> {
    let start = Instant::now();
    let results = samples
        .par_iter()
        .map(|sample| {
            let t0 = Instant::now();
            let events = sample.load_events()?;
            let mut categorizer = dyn_clone::clone_box(prototype);
            let out = process_sample(sample, &events, categorizer.as_mut(), settings);
            info!(
                "✅ {} ({}): {} events in {:.2}s",
                sample.name,
                sample.kind,
                out.events_processed,
                t0.elapsed().as_secs_f32()
            );
            Ok(out)
        })
        .collect::<DfResult<Vec<_>>>()?;

    debug!(
        "Processed {} samples in {:.2}s",
        results.len(),
        start.elapsed().as_secs_f32()
    );
    Ok(results)
}

/// Per-category sums over samples of the same kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub signal: Option<Histogram1D>,
    pub background: Option<Histogram1D>,
    pub data: Option<Histogram1D>,
}

impl CategoryTotals {
    pub fn yield_of(&self, kind: SampleKind) -> f64 {
        let h = match kind {
            SampleKind::Signal => &self.signal,
            SampleKind::Background => &self.background,
            SampleKind::Data => &self.data,
        };
        h.as_ref().map_or(0.0, |h| h.integral())
    }
}

/// Sums histograms per category and sample kind. Category order follows the first sample.
pub fn net_by_kind(results: &[SampleHistograms]) -> DfResult<Vec<(String, CategoryTotals)>> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, CategoryTotals> = HashMap::new();

    for r in results {
        for (key, h) in &r.histograms {
            let entry = totals.entry(key.clone()).or_insert_with(|| {
                order.push(key.clone());
                CategoryTotals::default()
            });
            let slot = match r.kind {
                SampleKind::Signal => &mut entry.signal,
                SampleKind::Background => &mut entry.background,
                SampleKind::Data => &mut entry.data,
            };
            match slot {
                Some(acc) => acc.add(h)?,
                None => {
                    let mut first = h.clone();
                    first.name = format!("{}_Net_{}", key, r.kind.net_suffix());
                    *slot = Some(first);
                }
            }
        }
    }

    Ok(order
        .into_iter()
        .map(|k| {
            let t = totals.remove(&k).unwrap_or_default();
            (k, t)
        })
        .collect())
}

/// Everything a downstream fit needs from one `categorize` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramFile {
    pub variable: PlotVariable,
    pub luminosity: f64,
    pub samples: Vec<SampleHistograms>,
    pub net: Vec<(String, CategoryTotals)>,
}

impl HistogramFile {
    pub fn save<P: AsRef<Path>>(&self, path: P) -> DfResult<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> DfResult<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }
}
