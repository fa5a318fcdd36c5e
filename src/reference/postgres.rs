//! Postgres-backed reference source

use async_trait::async_trait;
use sqlx::PgPool;

use super::ReferenceSource;
use crate::error::ReferenceError;

/// Reads name lists from the onboarding schema.
///
/// The pool is owned by the caller; each lookup acquires and releases its
/// own connection.
#[derive(Clone, Debug)]
pub struct PgReferenceSource {
    pool: PgPool,
}

impl PgReferenceSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn names(&self, table: &'static str, sql: &'static str) -> Result<Vec<String>, ReferenceError> {
        // NULL names are skipped, like blank ones in ReferenceSet
        let rows = sqlx::query_scalar::<_, Option<String>>(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ReferenceError::Lookup {
                table,
                message: e.to_string(),
            })?;

        Ok(rows.into_iter().flatten().collect())
    }
}

#[async_trait]
impl ReferenceSource for PgReferenceSource {
    async fn customer_names(&self) -> Result<Vec<String>, ReferenceError> {
        self.names("customers", "SELECT name FROM customers ORDER BY id")
            .await
    }

    async fn process_names(&self) -> Result<Vec<String>, ReferenceError> {
        self.names("processes", "SELECT name FROM processes ORDER BY id")
            .await
    }

    async fn document_type_names(&self) -> Result<Vec<String>, ReferenceError> {
        self.names("document_types", "SELECT name FROM document_types ORDER BY id")
            .await
    }
}
