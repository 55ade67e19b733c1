//! Serverspec (RSpec JSON formatter) report model and parser

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Full serverspec test report as emitted by `rspec --format json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub examples: Vec<Example>,
    #[serde(default)]
    pub summary: Summary,
    #[serde(default)]
    pub summary_line: String,
}

/// A single test case result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Example {
    /// Hierarchical RSpec id, e.g. `./spec/foo_spec.rb[1:1]`
    pub id: String,
    pub description: String,
    pub full_description: String,
    /// Raw status string; mapped later so unknown values surface as `UnknownStatus`
    pub status: String,
    pub file_path: String,
    pub line_number: u64,
    /// Run time in seconds
    pub run_time: f64,
    pub pending_message: Option<String>,
    pub exception: Option<Exception>,
}

/// Failure detail attached to an example
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Exception {
    pub class: String,
    pub message: String,
    pub backtrace: Vec<String>,
}

impl Exception {
    /// RSpec emits `{}` for examples without an exception
    pub fn is_empty(&self) -> bool {
        self.class.is_empty() && self.message.is_empty() && self.backtrace.is_empty()
    }
}

/// Aggregate counters for the whole run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Summary {
    /// Total duration in seconds
    pub duration: f64,
    pub example_count: u64,
    pub failure_count: u64,
    pub pending_count: u64,
    pub errors_outside_of_examples_count: u64,
}

impl Report {
    /// Parse a report out of a check's output.
    ///
    /// Newlines are stripped before decoding: serverspec messages may embed
    /// raw newlines inside string values, which is not valid JSON. This also
    /// drops newlines that were escaped correctly, so the normalisation is lossy.
    pub fn parse(output: &str) -> Result<Self> {
        let flattened = output.replace('\n', "");
        let report: Report = serde_json::from_str(&flattened).map_err(Error::MalformedReport)?;

        if report.examples.is_empty() {
            return Err(Error::EmptyReport);
        }

        Ok(report)
    }

    /// Examples in report order
    pub fn examples(&self) -> impl Iterator<Item = &Example> {
        self.examples.iter()
    }
}

impl Example {
    /// Failure detail, ignoring the empty `{}` placeholder
    pub fn failure(&self) -> Option<&Exception> {
        self.exception.as_ref().filter(|e| !e.is_empty())
    }

    /// Pending reason, ignoring empty strings
    pub fn pending_reason(&self) -> Option<&str> {
        self.pending_message.as_deref().filter(|m| !m.is_empty())
    }
}

/// Human-readable rendering used as the derived check output
impl fmt::Display for Example {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.full_description)?;
        writeln!(f, "id: {}", self.id)?;
        writeln!(f, "description: {}", self.description)?;
        writeln!(f, "status: {}", self.status)?;
        writeln!(f, "location: {}:{}", self.file_path, self.line_number)?;
        write!(f, "run time: {}s", self.run_time)?;

        if let Some(reason) = self.pending_reason() {
            write!(f, "\npending: {}", reason)?;
        }

        if let Some(exception) = self.failure() {
            write!(f, "\nexception: {}: {}", exception.class, exception.message)?;
            for line in &exception.backtrace {
                write!(f, "\n  {}", line)?;
            }
        }

        Ok(())
    }
}
