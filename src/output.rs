//! Output formatting and display utilities

use serde::Serialize;

use crate::config::OutputConfig;
use crate::error::Result;
use crate::ops::{ClearSummary, CopySummary, ItemError, LoginOutcome};

/// Renders request summaries. Overall success and item-level problems
/// are distinct: a summary line is always paired with its error list.
pub struct OutputWriter {
    config: OutputConfig,
}

impl OutputWriter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn render_copy(&self, summary: &CopySummary) -> Result<()> {
        if self.config.format_json {
            return self.write_json(summary);
        }
        if self.config.silent {
            return Ok(());
        }
        let mut line = format!(
            "Copied: {} • Attempted: {}",
            summary.copied, summary.attempted
        );
        if summary.skipped > 0 {
            line.push_str(&format!(" • Skipped: {}", summary.skipped));
        }
        println!("{}", line);
        self.render_item_errors(&summary.errors);
        Ok(())
    }

    pub fn render_clear(&self, summary: &ClearSummary) -> Result<()> {
        if self.config.format_json {
            return self.write_json(summary);
        }
        if self.config.silent {
            return Ok(());
        }
        println!(
            "Removed {} of {} cookies for {}",
            summary.removed, summary.total, summary.host
        );
        self.render_item_errors(&summary.errors);
        Ok(())
    }

    pub fn render_login(&self, outcome: &LoginOutcome) -> Result<()> {
        if self.config.format_json {
            return self.write_json(outcome);
        }
        if self.config.silent {
            return Ok(());
        }
        println!("{}", outcome.message);
        Ok(())
    }

    /// Write verbose information (if enabled)
    pub fn write_verbose(&self, message: &str) {
        if self.config.verbose && !self.config.silent {
            eprintln!("* {}", message);
        }
    }

    fn render_item_errors(&self, errors: &[ItemError]) {
        for ItemError { name, message } in errors {
            println!("  {}: {}", name, message);
        }
    }

    fn write_json<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}
