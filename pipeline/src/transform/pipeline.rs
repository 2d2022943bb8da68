//! Shared load → run → save orchestration for both stages.
//!
//! Each step logs its own failure at ERROR and returns it; [`Stage::process`]
//! stops at the first `Err`, so a failed load never reaches the run or save
//! steps.
//!
//! # Example
//!
//! ```rust,ignore
//! use popstats::{Cleaner, Logger, PipelineConfig, Stage};
//!
//! let config = PipelineConfig::default();
//! let cleaner = Cleaner::from_config(&config, Logger::stderr(config.log_format));
//! if let Ok(path) = cleaner.process() {
//!     println!("cleaned table at {}", path.display());
//! }
//! ```

use std::path::{Path, PathBuf};

use crate::error::{LoadResult, StageResult, WriteError, WriteResult};
use crate::logs::Logger;
use crate::models::Table;
use crate::parser::load_table;

/// One pipeline stage: a fixed input file, a transformation, a fixed output file.
pub trait Stage {
    /// What [`Stage::run`] produces and [`Stage::write`] persists.
    type Output;

    fn logger(&self) -> &Logger;

    fn input_path(&self) -> &Path;

    fn output_path(&self) -> &Path;

    /// The stage's transformation. Implementations log their own failures.
    fn run(&self, table: Table) -> StageResult<Self::Output>;

    /// Persist the output, without logging.
    fn write(&self, output: &Self::Output, path: &Path) -> WriteResult<()>;

    /// Load a delimited file, logging the outcome.
    fn load(&self, path: &Path) -> LoadResult<Table> {
        match load_table(path) {
            Ok(result) => {
                self.logger()
                    .info(format!("Data loaded successfully from {}", path.display()));
                Ok(result.table)
            }
            Err(e) => {
                self.logger().error(format!("Error: {}", e));
                Err(e)
            }
        }
    }

    /// Write the output, logging the outcome. Not retried.
    fn save(&self, output: &Self::Output, path: &Path) -> Result<(), WriteError> {
        match self.write(output, path) {
            Ok(()) => {
                self.logger().info(format!(
                    "Data has been processed and saved to {}",
                    path.display()
                ));
                Ok(())
            }
            Err(e) => {
                self.logger()
                    .error(format!("An error occurred while saving the file: {}", e));
                Err(e)
            }
        }
    }

    /// Load, run, save. Returns the written path.
    fn process(&self) -> StageResult<PathBuf> {
        let table = self.load(self.input_path())?;
        let output = self.run(table)?;
        self.save(&output, self.output_path())?;
        Ok(self.output_path().to_path_buf())
    }
}
