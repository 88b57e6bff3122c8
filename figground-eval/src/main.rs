//! Figground evaluation CLI

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use figground_eval::{
    analysis::RunSummary,
    config::Config,
    items::{discover_items, load_item},
    reporting::{print_console_report, CsvWriter, JsonSummary},
    runner::{ConsoleProgress, Evaluator, ExecutorConfig, NoOpProgress, ProgressCallback},
    validate::validate_dataset,
};

#[derive(Parser)]
#[command(name = "figground-eval")]
#[command(about = "Scores geometry answers for correctness and grounding in diagram marks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a directory of model responses
    Run {
        /// Dataset directory, one subdirectory per item
        #[arg(long)]
        items_dir: PathBuf,

        /// Directory holding one response file per variant
        #[arg(long)]
        responses_dir: PathBuf,

        /// CSV report path (default: <output-dir>/<run id>/<report file>)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Number of items evaluated in parallel
        #[arg(long)]
        parallel: Option<usize>,

        /// Output directory for run results
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Check a dataset for annotation and descriptor problems
    Validate {
        #[arg(long)]
        items_dir: PathBuf,
    },

    /// List items and their variants
    ListItems {
        #[arg(long)]
        items_dir: PathBuf,
    },

    /// Generate sample configuration
    InitConfig {
        /// Output path for configuration file
        #[arg(short, long, default_value = "config/figground.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("figground_eval=debug,figground=debug,info")
    } else {
        EnvFilter::new("figground_eval=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: cannot load {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Config::load_or_default(),
    };

    match cli.command {
        Commands::Run {
            items_dir,
            responses_dir,
            out,
            parallel,
            output_dir,
        } => {
            run_evaluation(config, items_dir, responses_dir, out, parallel, output_dir, cli.verbose).await?;
        }

        Commands::Validate { items_dir } => {
            validate_items(&items_dir);
        }

        Commands::ListItems { items_dir } => {
            list_items(&items_dir)?;
        }

        Commands::InitConfig { output } => {
            init_config(output)?;
        }
    }

    Ok(())
}

async fn run_evaluation(
    mut config: Config,
    items_dir: PathBuf,
    responses_dir: PathBuf,
    out: Option<PathBuf>,
    parallel: Option<usize>,
    output_dir: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let run_id = Utc::now().format("%Y%m%d-%H%M%S").to_string();

    if let Some(parallel) = parallel {
        config.evaluation.parallel_items = parallel;
    }
    if let Some(dir) = output_dir {
        config.output.output_dir = dir.display().to_string();
    }

    println!("=== Figure Grounding Evaluation ===");
    println!("Run ID:    {}", run_id);
    println!("Items:     {}", items_dir.display());
    println!("Responses: {}", responses_dir.display());
    println!();

    let progress: Arc<dyn ProgressCallback> = if verbose {
        Arc::new(ConsoleProgress)
    } else {
        Arc::new(NoOpProgress)
    };

    let evaluator = Evaluator::new(ExecutorConfig::from(&config));
    let results = match evaluator.run(&items_dir, &responses_dir, progress).await {
        Ok(results) => results,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let report_path = out.unwrap_or_else(|| {
        PathBuf::from(&config.output.output_dir)
            .join(&run_id)
            .join(&config.output.report_file)
    });
    let rows: Vec<_> = results.rows().cloned().collect();
    CsvWriter::write_rows(&report_path, &rows)?;

    let summary = RunSummary::from_results(&results);
    print_console_report(&summary);

    println!("\nReport written to: {}", report_path.display());

    if config.output.write_json_summary {
        let summary_path = report_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("summary.json");
        let json = JsonSummary::new(
            &run_id,
            &items_dir,
            &responses_dir,
            config.evaluation.answer_epsilon,
            report_path.display().to_string(),
            summary,
        );
        json.write_to_file(&summary_path)?;
        println!("Summary written to: {}", summary_path.display());
    }

    Ok(())
}

fn validate_items(items_dir: &Path) {
    let results = match validate_dataset(items_dir) {
        Ok(results) => results,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let failed = results.iter().filter(|r| !r.is_ok()).count();
    for result in &results {
        if result.is_ok() {
            println!("  OK   {}", result.item);
        } else {
            println!("  FAIL {}", result.item);
            for error in &result.errors {
                println!("       - {}", error);
            }
        }
    }

    println!("{:-<60}", "");
    println!("{} items, {} failed", results.len(), failed);

    if failed > 0 {
        std::process::exit(1);
    }
}

fn list_items(items_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let items = discover_items(items_dir)?;

    println!("Available Items ({}):", items.len());
    println!("{:-<60}", "");

    for paths in &items {
        match load_item(paths) {
            Ok(family) => {
                let gold = family
                    .gold
                    .as_ref()
                    .map(|g| format!("{}", g.answer.value))
                    .unwrap_or_else(|| "-".to_string());
                println!("  {} | gold {}", family.id, gold);
                for (role, variant) in family.ordered_variants() {
                    println!("    {} | {}", variant.variant_id, role);
                }
            }
            Err(e) => println!("  {} | error: {}", paths.id, e),
        }
    }

    Ok(())
}

fn init_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();

    // Ensure parent directory exists
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    config.save_toml(&output)?;
    println!("Configuration written to: {}", output.display());
    Ok(())
}
