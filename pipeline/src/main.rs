//! Popstats CLI - clean and reshape population-by-state tables
//!
//! # Main Commands
//!
//! ```bash
//! popstats clean                   # raw/ → processed/ cleaned table
//! popstats transform               # cleaned table → per-state summary
//! popstats run                     # both stages
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! popstats show input.csv          # Load a file and print it as JSON
//! popstats validate summary.csv    # Check a summary's invariants
//! ```
//!
//! Every flag is optional; unset values come from `POPSTATS_*` environment
//! variables (or `.env`), then built-in defaults.

use clap::{Args, Parser, Subcommand};
use popstats::{
    load_summary, load_table, validate_summary, Cleaner, LogFormat, Logger, PipelineConfig,
    Stage, Transformer,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "popstats")]
#[command(about = "Clean and reshape population-by-state tables", long_about = None)]
struct Cli {
    /// Log line format
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Default)]
struct CleanArgs {
    /// Raw input file
    #[arg(long)]
    raw: Option<PathBuf>,

    /// Cleaned output file
    #[arg(long)]
    cleaned: Option<PathBuf>,

    /// Thousands separator stripped from numbers
    #[arg(long)]
    separator: Option<char>,
}

#[derive(Args, Default)]
struct TransformArgs {
    /// Final summary file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Label column (default: first column)
    #[arg(long)]
    label_column: Option<String>,

    /// Label to keep, case-insensitive
    #[arg(short, long)]
    label: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Stage 1: clean the raw table
    Clean(CleanArgs),

    /// Stage 2: reshape the cleaned table into a per-state summary
    Transform {
        /// Cleaned input file
        #[arg(long)]
        cleaned: Option<PathBuf>,

        #[command(flatten)]
        args: TransformArgs,
    },

    /// Both stages; stage 2 is skipped when stage 1 fails
    Run {
        #[command(flatten)]
        clean: CleanArgs,

        #[command(flatten)]
        transform: TransformArgs,
    },

    /// Load a delimited file and print it as JSON records
    Show {
        /// Input file
        input: PathBuf,
    },

    /// Check a summary file's invariants
    Validate {
        /// Summary file
        input: PathBuf,
    },
}

impl CleanArgs {
    fn apply(self, config: &mut PipelineConfig) {
        if let Some(raw) = self.raw {
            config.raw_path = raw;
        }
        if let Some(cleaned) = self.cleaned {
            config.cleaned_path = cleaned;
        }
        if let Some(separator) = self.separator {
            config.thousands_separator = separator;
        }
    }
}

impl TransformArgs {
    fn apply(self, config: &mut PipelineConfig) {
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if self.label_column.is_some() {
            config.label_column = self.label_column;
        }
        if let Some(label) = self.label {
            config.label_filter = label;
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let mut config = match PipelineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    let logger = Logger::stderr(config.log_format);

    // Stage failures are logged by the stage itself and end the run without
    // a failing exit code.
    let result = match cli.command {
        Commands::Clean(args) => {
            args.apply(&mut config);
            let _ = Cleaner::from_config(&config, logger).process();
            Ok(())
        }

        Commands::Transform { cleaned, args } => {
            if let Some(cleaned) = cleaned {
                config.cleaned_path = cleaned;
            }
            args.apply(&mut config);
            let _ = Transformer::from_config(&config, logger).process();
            Ok(())
        }

        Commands::Run { clean, transform } => {
            clean.apply(&mut config);
            transform.apply(&mut config);
            if Cleaner::from_config(&config, logger.clone()).process().is_ok() {
                let _ = Transformer::from_config(&config, logger).process();
            }
            Ok(())
        }

        Commands::Show { input } => cmd_show(&input),

        Commands::Validate { input } => cmd_validate(&input),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_show(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Loading: {}", input.display());

    let result = load_table(input)?;
    eprintln!("   Encoding: {}", result.encoding);
    eprintln!("   Delimiter: '{}'", format_delimiter(result.delimiter));
    eprintln!("   Columns: {}", result.table.columns().join(", "));
    eprintln!("✅ Loaded {} rows", result.table.shape().0);

    let json = serde_json::to_string_pretty(&result.table.to_json_records())?;
    println!("{}", json);
    Ok(())
}

fn cmd_validate(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("✔️  Validating: {}", input.display());

    let records = load_summary(input)?;
    match validate_summary(&records) {
        Ok(()) => {
            eprintln!("   ✅ All {} rows consistent", records.len());
            Ok(())
        }
        Err(errors) => {
            for err in &errors {
                eprintln!("   - {}", err);
            }
            eprintln!("\n📊 {} problem(s) in {} rows", errors.len(), records.len());
            std::process::exit(1);
        }
    }
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}
