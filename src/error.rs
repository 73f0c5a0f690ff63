//! Structured error types for the planner generator.
//!
//! Every variant is fatal to the build that raised it: a half-built
//! document has no useful partial state, so errors are propagated straight
//! back to the caller and nothing is written to disk.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::canvas::PageId;

/// The unified error type returned by all public planner API functions.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// The canvas refused to allocate a page of the requested size.
    #[error("Failed to allocate a {width}x{height} page")]
    PageAllocation { width: f64, height: f64 },

    /// A drawing call referenced a page the canvas never handed out.
    #[error("Unknown page handle {0:?}")]
    UnknownPage(PageId),

    /// A link was requested to a page node that has not been drawn yet.
    #[error("Page \"{0}\" has not been built yet")]
    NotBuilt(String),

    /// A child date fell outside the representable calendar range.
    #[error("Date {base} + {offset} periods is out of range")]
    DateOutOfRange { base: NaiveDate, offset: usize },

    /// The JSON configuration failed to parse.
    #[error("Failed to parse configuration: {source}{}", hint_suffix(.hint))]
    ConfigParse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// The configuration parsed but holds values no planner can be built from.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading the configuration or writing the document failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the planner configuration. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        PlannerError::ConfigParse { source: e, hint }
    }
}

pub type Result<T, E = PlannerError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_errors_carry_a_hint() {
        let err: PlannerError = serde_json::from_str::<serde_json::Value>("{ \"a\": 1, }")
            .unwrap_err()
            .into();
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to parse configuration"));
        assert!(msg.contains("Hint: Check for trailing commas"));
    }

    #[test]
    fn allocation_error_names_the_size() {
        let err = PlannerError::PageAllocation {
            width: 0.0,
            height: 842.0,
        };
        assert_eq!(err.to_string(), "Failed to allocate a 0x842 page");
    }
}
