//! Stage 2 with no arguments: cleaned table → per-state summary.
//!
//! Paths and settings come from `POPSTATS_*` variables or the defaults.

use popstats::{Logger, PipelineConfig, Stage, Transformer};

fn main() {
    let config = match PipelineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration error: {}", e);
            return;
        }
    };

    let logger = Logger::stderr(config.log_format);
    // failures are already logged
    let _ = Transformer::from_config(&config, logger).process();
}
