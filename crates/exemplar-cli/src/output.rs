//! Output formatting and writing utilities
//!
//! Results are written in the selected format. Status lines only appear
//! in human mode.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use exemplar_core::{stringify, Value};
use is_terminal::IsTerminal;
use serde::Serialize;
use std::io::{self, Write};
use tracing::trace;

/// Trait for formatting serializable values
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty | OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    summary_length: usize,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, summary_length: usize) -> Self {
        Self::with_writer(
            format,
            use_color && io::stdout().is_terminal(),
            quiet,
            summary_length,
            Box::new(io::stdout()),
        )
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        summary_length: usize,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            summary_length,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if !self.human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write an error message
    pub fn error(&mut self, message: &str) -> Result<()> {
        if !self.human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.red().to_string())
        } else {
            self.writeln(&format!("ERROR: {}", message))
        }
    }

    /// List validation errors, one per line
    pub fn errors(&mut self, errors: &[String]) -> Result<()> {
        for error in errors {
            self.error(&format!("  • {}", error))?;
        }
        Ok(())
    }

    /// One-line rendering of a value, shortened to the summary length
    pub fn summary(&self, value: Option<&Value>) -> String {
        stringify(value, Some(self.summary_length))
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!(bytes = formatted.len(), "Outputting data");

        // YAML output already ends with a newline
        if self.format == OutputFormat::Yaml {
            write!(self.writer, "{}", formatted)?;
            self.writer.flush()?;
            Ok(())
        } else {
            self.writeln(&formatted)
        }
    }
}
