//! Stage 1 with no arguments: `raw/` → `processed/`.
//!
//! Paths and settings come from `POPSTATS_*` variables or the defaults.

use popstats::{Cleaner, Logger, PipelineConfig, Stage};

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
    let _ = Cleaner::from_config(&config, logger).process();
}
