//! OB-NLQ - onboarding questions to parameterized SQL
//!
//! Turns a plain-English question about customers, onboarding processes and
//! documents into a read-only SQL template plus bind parameters. Names in the
//! question are resolved against the live reference data, tolerating typos
//! and partial mentions.
//!
//! ## Call chain
//! Question -> ReferenceSet load -> Intent rules -> Entity resolution -> QueryTemplate
//!
//! ## Quick Start
//!
//! ```rust
//! use ob_nlq::reference::InMemoryReferenceSource;
//! use ob_nlq::translator::translate;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let source = InMemoryReferenceSource::new(
//!     vec!["Ramesh Sharma".into()],
//!     vec!["KYC Verification".into()],
//!     vec!["Passport".into()],
//! );
//! let query = translate("How many documents has ramesh sharma submitted?", &source)
//!     .await
//!     .unwrap();
//! assert_eq!(query.params(), ["Ramesh Sharma"]);
//! # }
//! ```

// Core error handling
pub mod error;

// Configuration (env + YAML)
pub mod config;

// Reference data and its sources
pub mod reference;

// Name resolution: containment, similarity, token overlap
pub mod resolver;

// SQL templates and the execution-boundary guard
pub mod template;

// Assignment status and completion
pub mod progress;

// Ordered intent rules
pub mod intent;

// Entry points
pub mod translator;

// Live execution (when enabled)
#[cfg(feature = "database")]
pub mod executor;

pub use config::NlqConfig;
pub use error::{EntityKind, ReferenceError, SafetyError, TranslateError};
pub use intent::Intent;
pub use reference::{ReferenceSet, ReferenceSource};
pub use resolver::{EntityResolver, Resolution};
pub use template::QueryTemplate;
pub use translator::{translate, translate_with_reference, TranslatedQuery, TranslationParts};

#[cfg(feature = "database")]
pub use error::ExecutorError;
#[cfg(feature = "database")]
pub use executor::{QueryExecutor, QueryResponse};
