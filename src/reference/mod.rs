//! Reference data: the names a question can mention
//!
//! A [`ReferenceSet`] is loaded fresh for every translation through an
//! injected [`ReferenceSource`]. Nothing is cached between calls, so a
//! translation sees the store as of its own load.

mod memory;
#[cfg(feature = "database")]
mod postgres;

pub use memory::InMemoryReferenceSource;
#[cfg(feature = "database")]
pub use postgres::PgReferenceSource;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ReferenceError;

/// Snapshot of known customer, process and document-type names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSet {
    customers: Vec<String>,
    processes: Vec<String>,
    document_types: Vec<String>,
}

impl ReferenceSet {
    /// Build a set, dropping blank names and repeated names (first one kept)
    pub fn new(customers: Vec<String>, processes: Vec<String>, document_types: Vec<String>) -> Self {
        Self {
            customers: distinct(customers),
            processes: distinct(processes),
            document_types: distinct(document_types),
        }
    }

    pub fn customers(&self) -> &[String] {
        &self.customers
    }

    pub fn processes(&self) -> &[String] {
        &self.processes
    }

    pub fn document_types(&self) -> &[String] {
        &self.document_types
    }
}

fn distinct(names: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if name.trim().is_empty() || out.contains(&name) {
            continue;
        }
        out.push(name);
    }
    out
}

/// Read-only access to the store's name lists.
///
/// Implementations must return names in store order.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    async fn customer_names(&self) -> Result<Vec<String>, ReferenceError>;

    async fn process_names(&self) -> Result<Vec<String>, ReferenceError>;

    async fn document_type_names(&self) -> Result<Vec<String>, ReferenceError>;
}

/// Load a fresh [`ReferenceSet`]; any failed lookup fails the whole load
pub async fn load_reference_set(
    source: &dyn ReferenceSource,
) -> Result<ReferenceSet, ReferenceError> {
    let customers = source.customer_names().await.map_err(log_failure)?;
    let processes = source.process_names().await.map_err(log_failure)?;
    let document_types = source.document_type_names().await.map_err(log_failure)?;

    let set = ReferenceSet::new(customers, processes, document_types);
    debug!(
        customers = set.customers.len(),
        processes = set.processes.len(),
        document_types = set.document_types.len(),
        "Loaded reference set"
    );
    Ok(set)
}

fn log_failure(err: ReferenceError) -> ReferenceError {
    warn!(error = %err, "Reference lookup failed");
    err
}
