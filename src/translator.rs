//! Question → parameterized query
//!
//! ```text
//! question ──► load_reference_set ──► match_intent ──► TranslatedQuery
//!                     │                     │
//!                     └─ DataUnavailable    └─ UnrecognizedIntent / EntityNotFound
//! ```
//!
//! The translator never executes what it builds. Run the template through
//! [`validate_template`](crate::template::safety::validate_template) before
//! handing it to the store.

use serde::Serialize;

use crate::error::TranslateError;
use crate::intent::{match_intent, Intent};
use crate::reference::{load_reference_set, ReferenceSet, ReferenceSource};
use crate::resolver::EntityResolver;
use crate::template::QueryTemplate;

/// A successfully translated question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslatedQuery {
    pub intent: Intent,
    #[serde(flatten)]
    pub template: QueryTemplate,
}

impl TranslatedQuery {
    pub fn sql(&self) -> &str {
        &self.template.sql
    }

    pub fn params(&self) -> &[String] {
        &self.template.params
    }
}

/// Translate with a fresh reference set loaded from `source`
pub async fn translate(
    query: &str,
    source: &dyn ReferenceSource,
) -> Result<TranslatedQuery, TranslateError> {
    translate_with_resolver(query, source, &EntityResolver::default()).await
}

/// Like [`translate`], with a configured resolver
pub async fn translate_with_resolver(
    query: &str,
    source: &dyn ReferenceSource,
    resolver: &EntityResolver,
) -> Result<TranslatedQuery, TranslateError> {
    let reference = load_reference_set(source).await?;
    translate_with_reference(query, &reference, resolver)
}

/// Translate against an already loaded reference set
pub fn translate_with_reference(
    query: &str,
    reference: &ReferenceSet,
    resolver: &EntityResolver,
) -> Result<TranslatedQuery, TranslateError> {
    let (intent, template) = match_intent(query, reference, resolver)?;
    Ok(TranslatedQuery { intent, template })
}

/// Flattened `(template, params, message)` form of a translation.
///
/// Exactly one of `template` and `message` is set. `params` is absent when
/// the template has no placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TranslationParts {
    pub template: Option<String>,
    pub params: Option<Vec<String>>,
    pub message: Option<String>,
}

impl From<Result<TranslatedQuery, TranslateError>> for TranslationParts {
    fn from(result: Result<TranslatedQuery, TranslateError>) -> Self {
        match result {
            Ok(query) => {
                let QueryTemplate { sql, params } = query.template;
                Self {
                    template: Some(sql),
                    params: (!params.is_empty()).then_some(params),
                    message: None,
                }
            }
            Err(err) => Self {
                template: None,
                params: None,
                message: Some(err.to_string()),
            },
        }
    }
}
