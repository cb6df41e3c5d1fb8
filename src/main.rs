use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use recovery_risk::config::Config;
use recovery_risk::output;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum AssessFormat {
    #[default]
    Table,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum BatchFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assess one patient from a JSON file (use - for stdin)
    Assess {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t)]
        format: AssessFormat,
    },
    /// Assess many patients and rank them by overall risk
    Batch {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long, value_enum, default_value_t)]
        format: BatchFormat,
    },
    /// Print the effective scoring tables as YAML
    Weights,
    /// Write the standard scoring tables to a config file
    Init {
        /// Where to write (defaults to ~/.config/recovery-risk/config.yaml)
        #[arg(long)]
        path: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "recovery-risk")]
#[command(about = "Explainable post-surgical risk scoring", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/recovery-risk/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize output: {}", e);
            std::process::exit(EXIT_INPUT);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::Init { path, force } = &cli.command {
        let path = match path.clone() {
            Some(p) => p,
            None => match recovery_risk::config::get_config_path() {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Config error: {}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            },
        };
        if let Err(e) = recovery_risk::config::write_default_config(&path, *force) {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        println!("Wrote standard scoring tables to {}", path.display());
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match recovery_risk::config::load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config before anything is assessed
    let model = match config.scoring_model() {
        Ok(m) => m,
        Err(errors) => {
            eprintln!("Scoring config errors:");
            for error in errors {
                eprintln!("  - {}", error);
            }
            std::process::exit(EXIT_CONFIG);
        }
    };

    let use_colors = output::should_use_colors();

    match cli.command {
        Commands::Assess { file, format } => {
            let mut inputs = match recovery_risk::input::load_inputs(&file) {
                Ok(inputs) => inputs,
                Err(e) => {
                    eprintln!("Input error: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };
            if inputs.len() != 1 {
                eprintln!(
                    "Input error: expected one patient in {}, found {} (use `batch` for several)",
                    file.display(),
                    inputs.len()
                );
                std::process::exit(EXIT_INPUT);
            }
            let input = inputs.remove(0);
            let assessment = recovery_risk::assess_risk_with(&input, &model);

            match format {
                AssessFormat::Table => {
                    println!("{}", output::format_assessment(&assessment, use_colors))
                }
                AssessFormat::Json => print_json(&assessment),
            }
        }
        Commands::Batch { files, format } => {
            let inputs = match recovery_risk::batch::load_batch(&files) {
                Ok(inputs) => inputs,
                Err(e) => {
                    eprintln!("Input error: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };
            let ranked = recovery_risk::assess_batch(inputs, &model);

            match format {
                BatchFormat::Table => {
                    println!("{}", output::format_batch_table(&ranked, use_colors))
                }
                BatchFormat::Tsv => {
                    let tsv = output::format_tsv(&ranked);
                    if !tsv.is_empty() {
                        println!("{}", tsv);
                    }
                }
                BatchFormat::Json => print_json(&ranked),
            }
        }
        Commands::Weights => {
            let effective = Config {
                scoring: Some(model.to_config()),
            };
            match serde_saphyr::to_string(&effective) {
                Ok(yaml) => print!("{}", yaml),
                Err(e) => {
                    eprintln!("Config error: {}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            }
        }
        Commands::Init { .. } => {}
    }

    std::process::exit(EXIT_SUCCESS);
}
