//! Query templates for recognised intents
//!
//! Every template is fixed SQL text with Postgres positional placeholders.
//! Resolved names only ever travel in `params`, never in the text.

pub mod safety;

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::progress::AssignmentStatus;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$(\d+)").unwrap());

const ALL_CUSTOMERS_SQL: &str = "SELECT * FROM customers";

const CUSTOMER_DOCUMENT_COUNT_SQL: &str = r#"
        SELECT COUNT(*) AS doc_count
        FROM document_submissions ds
        JOIN customers c ON ds.customer_id = c.id
        WHERE c.name = $1
        "#;

const PROCESS_WITH_MOST_DOCUMENTS_SQL: &str = r#"
        SELECT p.id AS process_id, p.name AS process_name, COUNT(ds.id) AS total_docs
        FROM processes p
        LEFT JOIN document_submissions ds ON p.id = ds.process_id
        GROUP BY p.id, p.name
        ORDER BY total_docs DESC
        LIMIT 1
        "#;

const CUSTOMERS_BY_PROCESS_SQL: &str = r#"
        SELECT c.id AS customer_id, c.name AS customer_name, c.email
        FROM customers c
        JOIN process_assignments pa ON c.id = pa.customer_id
        JOIN processes p ON pa.process_id = p.id
        WHERE p.name = $1
        "#;

const CUSTOMERS_MISSING_DOCUMENT_SQL: &str = r#"
        SELECT DISTINCT c.id AS customer_id, c.name AS customer_name, c.email
        FROM customers c
        JOIN process_assignments pa ON c.id = pa.customer_id
        JOIN process_documents pd ON pa.process_id = pd.process_id
        JOIN document_types dt ON pd.document_type_id = dt.id
        WHERE dt.name = $1
        AND c.id NOT IN (
            SELECT ds.customer_id
            FROM document_submissions ds
            JOIN document_types dtt ON ds.document_type_id = dtt.id
            WHERE dtt.name = $2
        )
        "#;

/// SQL text plus its ordered bound parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryTemplate {
    pub sql: String,
    pub params: Vec<String>,
}

impl QueryTemplate {
    fn fixed(sql: &str) -> Self {
        Self {
            sql: sql.to_string(),
            params: Vec::new(),
        }
    }

    fn bound(sql: &str, params: Vec<String>) -> Self {
        Self {
            sql: sql.to_string(),
            params,
        }
    }

    /// Every customer row
    pub fn all_customers() -> Self {
        Self::fixed(ALL_CUSTOMERS_SQL)
    }

    /// Processes with at least one assignment in `status`, with the count
    pub fn processes_by_status(status: AssignmentStatus) -> Self {
        let sql = format!(
            r#"
        SELECT p.id AS process_id, p.name AS process_name, COUNT(pa.id) AS {alias}
        FROM processes p
        JOIN process_assignments pa ON p.id = pa.process_id
        WHERE pa.status = '{status}'
        GROUP BY p.id, p.name
        HAVING COUNT(pa.id) > 0
        "#,
            alias = status.count_alias(),
            status = status.as_str(),
        );
        Self { sql, params: Vec::new() }
    }

    /// Number of submissions by one customer
    pub fn customer_document_count(customer: &str) -> Self {
        Self::bound(CUSTOMER_DOCUMENT_COUNT_SQL, vec![customer.to_string()])
    }

    /// The single process with the most submissions
    pub fn process_with_most_documents() -> Self {
        Self::fixed(PROCESS_WITH_MOST_DOCUMENTS_SQL)
    }

    /// Customers assigned to one process
    pub fn customers_by_process(process: &str) -> Self {
        Self::bound(CUSTOMERS_BY_PROCESS_SQL, vec![process.to_string()])
    }

    /// Customers whose processes require `document_type` but who have not
    /// submitted it
    pub fn customers_missing_document(document_type: &str) -> Self {
        Self::bound(
            CUSTOMERS_MISSING_DOCUMENT_SQL,
            vec![document_type.to_string(), document_type.to_string()],
        )
    }

    /// Highest `$n` placeholder in the SQL text
    pub fn placeholder_count(&self) -> usize {
        PLACEHOLDER_RE
            .captures_iter(&self.sql)
            .filter_map(|c| c[1].parse::<usize>().ok())
            .max()
            .unwrap_or(0)
    }
}
