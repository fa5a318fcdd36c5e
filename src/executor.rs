//! Translate a question and run the result against Postgres
//!
//! [`QueryExecutor::run`] folds every failure into the response message;
//! [`QueryExecutor::execute`] keeps it as an [`ExecutorError`].

use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::error::ExecutorError;
use crate::reference::PgReferenceSource;
use crate::resolver::EntityResolver;
use crate::template::safety::validate_template;
use crate::translator::{translate_with_resolver, TranslatedQuery};

/// Outcome of one question
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
    pub rows: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl QueryResponse {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.message.is_none()
    }
}

/// Runs questions end to end
#[derive(Clone, Debug)]
pub struct QueryExecutor {
    pool: PgPool,
    resolver: EntityResolver,
}

impl QueryExecutor {
    pub fn new(pool: PgPool, resolver: EntityResolver) -> Self {
        Self { pool, resolver }
    }

    /// Translate against live names, validate, execute.
    ///
    /// Failures are reported through [`QueryResponse::message`].
    pub async fn run(&self, question: &str) -> QueryResponse {
        match self.execute(question).await {
            Ok((translated, rows)) => QueryResponse {
                sql: Some(translated.template.sql),
                params: translated.template.params,
                rows,
                message: None,
            },
            Err(e) => {
                if let ExecutorError::Sql(ref err) = e {
                    warn!("Query execution failed: {}", err);
                }
                QueryResponse::failed(e.to_string())
            }
        }
    }

    /// Like [`run`](Self::run), keeping the failure typed
    pub async fn execute(
        &self,
        question: &str,
    ) -> Result<(TranslatedQuery, Vec<serde_json::Value>), ExecutorError> {
        let source = PgReferenceSource::new(self.pool.clone());
        let translated = translate_with_resolver(question, &source, &self.resolver).await?;
        validate_template(translated.sql())?;

        let rows = self.fetch_rows(&translated).await?;
        info!(intent = ?translated.intent, rows = rows.len(), "Query executed");
        Ok((translated, rows))
    }

    async fn fetch_rows(&self, translated: &TranslatedQuery) -> Result<Vec<serde_json::Value>, sqlx::Error> {
        let sql = wrap_as_json(translated.sql());
        let mut query = sqlx::query_scalar::<_, serde_json::Value>(&sql);
        for param in translated.params() {
            query = query.bind(param);
        }

        match query.fetch_one(&self.pool).await? {
            serde_json::Value::Array(rows) => Ok(rows),
            other => Ok(vec![other]),
        }
    }
}

/// Aggregate any SELECT into a single JSON array of row objects
fn wrap_as_json(sql: &str) -> String {
    format!("SELECT COALESCE(json_agg(t), '[]'::json) FROM ({}) t", sql)
}
