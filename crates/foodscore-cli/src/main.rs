mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "foodscore",
    version,
    about = "Health scoring for packaged food products"
)]
struct Cli {
    /// Log scoring decisions to stderr (overridden by RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a product (OpenFoodFacts JSON or a product record)
    Score {
        /// Path to the product JSON file
        input_file: PathBuf,

        /// Custom JSON threshold file (default: builtin thresholds)
        #[arg(short, long, value_name = "FILE")]
        thresholds: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Show every reason, allergen and the computed Nutri-Score breakdown
        #[arg(long)]
        verbose: bool,
    },
    /// Look up an additive by E-number
    Additive {
        /// Additive code, e.g. "E621" or "en:e621"
        code: String,
    },
    /// Look up an allergen by name or common name
    Allergen {
        /// Allergen name, e.g. "milk" or "peanut butter"
        term: String,
    },
    /// Describe a NOVA processing group
    Nova {
        /// Group number 1-4
        group: String,
    },
    /// Manage and inspect threshold sets
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },
}

#[derive(Subcommand)]
enum RulesAction {
    /// List predefined threshold sets
    List,
    /// Explain a threshold set in plain language
    Explain {
        /// Preset name (e.g., "default")
        preset: String,
    },
    /// Print the JSON schema with field descriptions and example
    Schema,
    /// Validate a custom threshold file
    Validate {
        /// Path to JSON threshold file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.debug {
        "foodscore=debug,foodscore_core=debug"
    } else {
        "foodscore=warn,foodscore_core=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Score {
            input_file,
            thresholds,
            output,
            verbose,
        } => commands::score::run(input_file, thresholds, &output, verbose),
        Commands::Additive { code } => commands::lookup::additive(&code),
        Commands::Allergen { term } => commands::lookup::allergen(&term),
        Commands::Nova { group } => commands::lookup::nova(&group),
        Commands::Rules { action } => match action {
            RulesAction::List => commands::rules::list(),
            RulesAction::Explain { preset } => commands::rules::explain(&preset),
            RulesAction::Schema => commands::rules::schema(),
            RulesAction::Validate { file } => commands::rules::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
