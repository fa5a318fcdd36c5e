//! In-memory reference source
//!
//! Backs tests and the offline CLI. Names can come from vectors or from a
//! YAML fixture:
//!
//! ```yaml
//! customers: [Ramesh Sharma, Priya Patel]
//! processes: [KYC Verification, Home Loan Application]
//! document_types: [Passport, PAN Card]
//! ```

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use super::ReferenceSource;
use crate::error::{ConfigError, ReferenceError};

/// Reference source holding fixed name lists
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InMemoryReferenceSource {
    #[serde(default)]
    customers: Vec<String>,
    #[serde(default)]
    processes: Vec<String>,
    #[serde(default)]
    document_types: Vec<String>,
    #[serde(skip)]
    failing_table: Option<&'static str>,
}

impl InMemoryReferenceSource {
    pub fn new(customers: Vec<String>, processes: Vec<String>, document_types: Vec<String>) -> Self {
        Self {
            customers,
            processes,
            document_types,
            failing_table: None,
        }
    }

    /// Parse a YAML fixture
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Load a YAML fixture from disk
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Make lookups of `table` fail, simulating an unreachable store
    pub fn failing_on(mut self, table: &'static str) -> Self {
        self.failing_table = Some(table);
        self
    }

    fn lookup(&self, table: &'static str, names: &[String]) -> Result<Vec<String>, ReferenceError> {
        if self.failing_table == Some(table) {
            return Err(ReferenceError::Lookup {
                table,
                message: "source offline".to_string(),
            });
        }
        Ok(names.to_vec())
    }
}

#[async_trait]
impl ReferenceSource for InMemoryReferenceSource {
    async fn customer_names(&self) -> Result<Vec<String>, ReferenceError> {
        self.lookup("customers", &self.customers)
    }

    async fn process_names(&self) -> Result<Vec<String>, ReferenceError> {
        self.lookup("processes", &self.processes)
    }

    async fn document_type_names(&self) -> Result<Vec<String>, ReferenceError> {
        self.lookup("document_types", &self.document_types)
    }
}
