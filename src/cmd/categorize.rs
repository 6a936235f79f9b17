use crate::reports;
use clap::Args;
use dimuforge::category::{build_categorizer, CategorizerKind};
use dimuforge::config::CutConfig;
use dimuforge::driver::{self, FillSettings, HistogramFile};
use dimuforge::error::{DfResult, DimuForgeError};
use dimuforge::sample::load_manifest;
use dimuforge::variables::{MassBinning, PlotVariable};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct CategorizeArgs {
    #[command(flatten)]
    pub cuts: CutConfig,

    /// JSON manifest listing the samples to process
    #[arg(short, long)]
    pub samples: String,

    #[arg(short = 'k', long, default_value = "run1")]
    pub categorizer: CategorizerKind,

    /// XML category tree, required by the `tree` categorizer
    #[arg(short, long)]
    pub tree: Option<String>,

    #[arg(long, default_value = "dimu_mass")]
    pub variable: PlotVariable,

    #[arg(long, default_value = "default")]
    pub binning: MassBinning,

    /// Integrated luminosity in pb^-1
    #[arg(long, default_value_t = 36814.0)]
    pub lumi: f64,

    /// Trigger scale factor applied to simulated samples
    #[arg(long, default_value_t = 1.0)]
    pub trigger_sf: f64,

    /// Fill data inside the signal window too
    #[arg(long, default_value_t = false)]
    pub no_blind: bool,

    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Write per-category yields to this CSV file
    #[arg(long)]
    pub yields: Option<String>,

    /// Save per-sample and net histograms to this JSON file
    #[arg(long)]
    pub histograms: Option<String>,
}

pub fn run(args: CategorizeArgs, cuts: CutConfig) -> DfResult<()> {
    if let Some(n) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .map_err(|e| DimuForgeError::Config(format!("thread pool: {}", e)))?;
        info!("🧵 Using {} worker threads", n);
    }

    let samples = load_manifest(&args.samples)?;
    info!(
        "📦 {} samples from {}, categorizer: {}",
        samples.len(),
        args.samples,
        args.categorizer
    );

    let prototype = build_categorizer(
        args.categorizer,
        &cuts,
        args.tree.as_deref().map(Path::new),
    )?;

    if args.no_blind {
        warn!("👀 Blinding disabled: data in the signal window will be filled.");
    }

    let settings = FillSettings {
        variable: args.variable,
        mass_binning: args.binning,
        luminosity: args.lumi,
        blind: !args.no_blind,
        trigger_sf: args.trigger_sf,
        jet_cuts: cuts.jets.clone(),
    };

    let start = Instant::now();
    let results = driver::process_samples(&samples, prototype.as_ref(), &settings)?;
    let totals = driver::net_by_kind(&results)?;
    info!("🏁 Done in {:.2}s", start.elapsed().as_secs_f32());

    reports::print_sample_summary(&results);
    reports::print_yields(&totals);

    if let Some(path) = &args.yields {
        reports::write_yields_csv(path, &totals)?;
        info!("💾 Yields written to {}", path);
    }

    if let Some(path) = &args.histograms {
        let file = HistogramFile {
            variable: settings.variable,
            luminosity: settings.luminosity,
            samples: results,
            net: totals,
        };
        file.save(path)?;
        info!("💾 Histograms written to {}", path);
    }
    Ok(())
}
