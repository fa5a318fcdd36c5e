//! Intent matching for onboarding questions
//!
//! A question is normalised (trimmed, lowercased) and run through an ordered
//! table of rules. The first rule that produces a template, or fails
//! terminally, decides the outcome.
//!
//! # Rule outcomes
//!
//! ```text
//! NoMatch      pattern did not match          → try next rule
//! Matched      pattern matched, names bound   → done
//! FallThrough  matched, entity unresolved     → try next rule
//! Terminal     matched, entity unresolved     → fail with message
//! ```
//!
//! Rule order is part of the contract: several patterns overlap, so moving a
//! rule changes which intent a question gets.

mod rules;

pub use rules::RULES;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::TranslateError;
use crate::progress::AssignmentStatus;
use crate::reference::ReferenceSet;
use crate::resolver::EntityResolver;
use crate::template::QueryTemplate;

// ============================================================================
// Intents
// ============================================================================

/// Closed set of questions the translator can answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "intent", content = "status", rename_all = "snake_case")]
pub enum Intent {
    /// All customers
    ListCustomers,

    /// Processes with assignments in a given status
    ProcessesByStatus(AssignmentStatus),

    /// Number of documents one customer has submitted
    CustomerDocumentCount,

    /// Process with the most submitted documents
    ProcessWithMostDocuments,

    /// Customers assigned to one process
    CustomersByProcess,

    /// Customers who still owe a document type
    CustomersMissingDocument,
}

// ============================================================================
// Rules
// ============================================================================

/// Result of evaluating one rule
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    NoMatch,
    Matched(QueryTemplate),
    FallThrough,
    Terminal(TranslateError),
}

/// Inputs shared by every rule
pub struct RuleContext<'a> {
    /// Normalised question text
    pub text: &'a str,
    pub reference: &'a ReferenceSet,
    pub resolver: &'a EntityResolver,
}

/// One entry of the ordered rule table
pub struct IntentRule {
    pub name: &'static str,
    pub intent: Intent,
    pub apply: fn(&RuleContext<'_>) -> RuleOutcome,
}

/// Trim and lowercase a question
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Run the rule table against a question
pub fn match_intent(
    query: &str,
    reference: &ReferenceSet,
    resolver: &EntityResolver,
) -> Result<(Intent, QueryTemplate), TranslateError> {
    let text = normalize_query(query);
    let ctx = RuleContext {
        text: &text,
        reference,
        resolver,
    };

    for rule in RULES {
        match (rule.apply)(&ctx) {
            RuleOutcome::NoMatch => {}
            RuleOutcome::FallThrough => {
                debug!(rule = rule.name, "Rule matched but entity unresolved, continuing");
            }
            RuleOutcome::Matched(template) => {
                info!(
                    rule = rule.name,
                    intent = ?rule.intent,
                    params = template.params.len(),
                    "Question translated"
                );
                return Ok((rule.intent, template));
            }
            RuleOutcome::Terminal(err) => {
                debug!(rule = rule.name, error = %err, "Rule failed terminally");
                return Err(err);
            }
        }
    }

    debug!(text = %text, "No rule matched");
    Err(TranslateError::UnrecognizedIntent)
}
