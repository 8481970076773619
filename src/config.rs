//! Metadata describing the benchmark run being recorded.

use thiserror::Error;

pub const DEFAULT_DATABASE: &str = "benchmarks";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Every failed check, one message per line.
    #[error("{}", .0.join("\n"))]
    Invalid(Vec<String>),
}

/// Settings applied to every record of a run when it is stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    /// Database the processed results are destined for.
    pub database: String,
    /// Toolchain version tag, e.g. `go1.21.4`.
    pub go_version: String,
    /// Unix seconds applied to all results, typically the commit time.
    pub timestamp: i64,
    /// Repository revision tag: a SHA, tag name, or anything useful when querying.
    pub revision: String,
    /// User-chosen identifier of the machine the benchmarks ran on.
    pub hardware_id: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            database: DEFAULT_DATABASE.to_string(),
            go_version: String::new(),
            timestamp: 0,
            revision: String::new(),
            hardware_id: String::new(),
        }
    }
}

impl RunConfig {
    /// Check all fields, reporting every problem at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut msg = Vec::new();

        if self.database.is_empty() {
            msg.push("Database cannot be empty".to_string());
        }
        if self.go_version.is_empty() {
            msg.push("Go version cannot be empty".to_string());
        }
        if self.timestamp <= 0 {
            msg.push("Timestamp must be greater than zero".to_string());
        }
        if self.revision.is_empty() {
            msg.push("Revision cannot be empty".to_string());
        }
        if self.hardware_id.is_empty() {
            msg.push("Hardware ID cannot be empty".to_string());
        }

        if msg.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(msg))
        }
    }
}
