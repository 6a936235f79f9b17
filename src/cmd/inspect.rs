use crate::reports;
use clap::Args;
use dimuforge::category::{build_categorizer, CategorizerKind, TreeCategorizer};
use dimuforge::config::CutConfig;
use dimuforge::error::DfResult;
use dimuforge::selection::JetCleaner;
use dimuforge::vars::{EventRecord, VarSet};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    #[command(flatten)]
    pub cuts: CutConfig,

    #[arg(short = 'k', long, default_value = "run1")]
    pub categorizer: CategorizerKind,

    #[arg(short, long)]
    pub tree: Option<String>,

    /// JSON file with a single event to evaluate
    #[arg(short, long)]
    pub event: Option<String>,
}

pub fn run(args: InspectArgs, cuts: CutConfig) -> DfResult<()> {
    let tree_path = args.tree.as_deref().map(Path::new);
    let mut categorizer = build_categorizer(args.categorizer, &cuts, tree_path)?;

    println!("\n🔎 === CATEGORIES: {} === 🔎", args.categorizer);

    if let Some(path) = tree_path {
        // the boxed categorizer hides the arena, reload for the shape summary
        let tree = TreeCategorizer::load_from_file(path)?;
        reports::print_tree_summary(&tree);
    }

    if let Some(path) = &args.event {
        let content = fs::read_to_string(path)?;
        let event: EventRecord = serde_json::from_str(&content)?;
        let cleaner = JetCleaner::new(cuts.jets.clone());
        let vars = VarSet::new(&event, &cleaner);

        categorizer.reset();
        categorizer.evaluate(&vars);
        println!("\nEvent {}:\n{}", path, categorizer.output_results());
    }

    reports::print_registry(categorizer.categories());
    Ok(())
}
