use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use dimuforge::config::CutConfig;
use std::process;
use tracing::{error, info, warn, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with cut values; flags typed on the command line still win.
    #[arg(global = true, long)]
    cuts_file: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Categorize(cmd::categorize::CategorizeArgs),
    Inspect(cmd::inspect::InspectArgs),
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🚀 Initializing DimuForge...");

    let (cli_cuts, sub_name) = match &cli.command {
        Commands::Categorize(args) => (&args.cuts, "categorize"),
        Commands::Inspect(args) => (&args.cuts, "inspect"),
    };
    let sub_matches = matches.subcommand_matches(sub_name).unwrap_or(&matches);

    let cuts = if let Some(path) = &cli.cuts_file {
        info!("⚖️  Loading cuts from: {}", path);
        let mut file_cuts = CutConfig::load_from_file(path).unwrap_or_else(|e| {
            error!("❌ Failed to load cuts file '{}': {}", path, e);
            process::exit(1);
        });
        file_cuts.merge_from_cli(cli_cuts, sub_matches);
        file_cuts
    } else {
        warn!("⚠️  No cuts file given. Using built-in defaults and CLI flags.");
        cli_cuts.clone()
    };

    let result = match cli.command {
        Commands::Categorize(args) => cmd::categorize::run(args, cuts),
        Commands::Inspect(args) => cmd::inspect::run(args, cuts),
    };

    if let Err(e) = result {
        error!("❌ FATAL: {}", e);
        process::exit(1);
    }
}
