//! Error types for the query translator
//!
//! Every failure is a returned value. `TranslateError`'s `Display` output is
//! the human-readable message handed back to whoever asked the question.

use std::fmt;

use thiserror::Error;

/// Usage hint returned when no intent rule recognises the question
pub const USAGE_HINT: &str = "Could not parse query. Try simple phrases like 'Show all customers', \
'How many documents has Ramesh Sharma submitted?', 'Which process has the most documents?', \
or 'Which customers are assigned to Home Loan Application?'.";

/// Kind of named entity a rule tried to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Customer,
    Process,
    DocumentType,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Process => write!(f, "process"),
            Self::DocumentType => write!(f, "document type"),
        }
    }
}

/// Reference-data lookup failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReferenceError {
    #[error("lookup of {table} failed: {message}")]
    Lookup { table: &'static str, message: String },
}

/// Translation failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslateError {
    #[error("Reference data unavailable: {0}")]
    DataUnavailable(#[from] ReferenceError),

    #[error("{}", USAGE_HINT)]
    UnrecognizedIntent,

    #[error("{}", not_found_message(.kind, .fragment, .suggestion.as_deref()))]
    EntityNotFound {
        kind: EntityKind,
        fragment: String,
        suggestion: Option<String>,
    },
}

impl TranslateError {
    pub fn not_found(kind: EntityKind, fragment: impl Into<String>, suggestion: Option<&str>) -> Self {
        Self::EntityNotFound {
            kind,
            fragment: fragment.into(),
            suggestion: suggestion.map(str::to_string),
        }
    }
}

fn not_found_message(kind: &EntityKind, fragment: &str, suggestion: Option<&str>) -> String {
    let mut message = match kind {
        EntityKind::Customer => format!(
            "Customer not found in query: '{}'. Try exact name (e.g., 'How many documents has Ramesh Sharma submitted?')",
            fragment
        ),
        EntityKind::Process => format!(
            "Process '{}' not recognized. Try exact process name.",
            fragment
        ),
        EntityKind::DocumentType => format!(
            "Document type '{}' not recognized. Try exact document name.",
            fragment
        ),
    };
    if let Some(name) = suggestion {
        message.push_str(&format!(" Did you mean '{}'?", name));
    }
    message
}

/// Template refused by the safety validator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SafetyError {
    #[error("Dangerous SQL detected; aborted.")]
    MutatingKeyword { keyword: String },
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Failures while running a question end to end
#[cfg(feature = "database")]
#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("{0}")]
    Translate(#[from] TranslateError),

    #[error("{0}")]
    Unsafe(#[from] SafetyError),

    #[error("SQL execution error: {0}")]
    Sql(#[from] sqlx::Error),
}
