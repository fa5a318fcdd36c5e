//! The ordered rule table
//!
//! Patterns run against the normalised (lowercase) question. Rules 8 and 9
//! fall through when their entity does not resolve, while the similar rules
//! 5, 7 and 10 fail terminally. Existing question phrasings depend on this
//! asymmetry, so it is kept.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{Intent, IntentRule, RuleContext, RuleOutcome};
use crate::error::{EntityKind, TranslateError};
use crate::progress::AssignmentStatus;
use crate::resolver::{find_mentioned, suggest, Resolution};
use crate::template::QueryTemplate;

// =============================================================================
// PATTERNS
// =============================================================================

static LIST_CUSTOMERS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(show|list|get)\b.*\bcustomers\b").unwrap());

// "list/show/what are the" may precede the status phrase; only the phrase matters
static PENDING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bpending processes\b").unwrap());

static IN_PROGRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bin-progress processes\b").unwrap());

static COMPLETED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bcompleted processes\b").unwrap());

static HOW_MANY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"how many documents (?:has|did) (.+?) (?:submitted|did submit)").unwrap()
});

static HOW_MANY_ALT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"how many documents (.+?) submitted").unwrap());

static MOST_DOCUMENTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"which process (?:has|with).*(?:most|maximum).*documents|process.*most documents")
        .unwrap()
});

static ASSIGNED_TO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"which customers are assigned to (?:the )?(.+)").unwrap());

static SHOW_ASSIGNED_TO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:show|list|get)\b.*customers.*assigned to (.+)").unwrap());

static DOCUMENTS_SUBMITTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"documents (?:has|has )?(.*?) submitted").unwrap());

// Fragment runs to the end of the question, minus trailing punctuation
static MISSING_DOCUMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:should provide|needs to submit|have not submitted|have not provided|missing)\s+(.+?)[\s?.!]*$",
    )
    .unwrap()
});

// Generic noun that may trail a document type ("passport documents")
static TRAILING_DOCUMENT_NOUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+(?:documents?|proof|card)$").unwrap());

// =============================================================================
// TABLE
// =============================================================================

/// Rules in evaluation order
pub static RULES: &[IntentRule] = &[
    IntentRule {
        name: "list_customers",
        intent: Intent::ListCustomers,
        apply: list_customers,
    },
    IntentRule {
        name: "pending_processes",
        intent: Intent::ProcessesByStatus(AssignmentStatus::Pending),
        apply: pending_processes,
    },
    IntentRule {
        name: "in_progress_processes",
        intent: Intent::ProcessesByStatus(AssignmentStatus::InProgress),
        apply: in_progress_processes,
    },
    IntentRule {
        name: "completed_processes",
        intent: Intent::ProcessesByStatus(AssignmentStatus::Completed),
        apply: completed_processes,
    },
    IntentRule {
        name: "customer_document_count",
        intent: Intent::CustomerDocumentCount,
        apply: customer_document_count,
    },
    IntentRule {
        name: "process_with_most_documents",
        intent: Intent::ProcessWithMostDocuments,
        apply: process_with_most_documents,
    },
    IntentRule {
        name: "customers_assigned_to",
        intent: Intent::CustomersByProcess,
        apply: customers_assigned_to,
    },
    IntentRule {
        name: "show_customers_assigned_to",
        intent: Intent::CustomersByProcess,
        apply: show_customers_assigned_to,
    },
    IntentRule {
        name: "documents_submitted_by",
        intent: Intent::CustomerDocumentCount,
        apply: documents_submitted_by,
    },
    IntentRule {
        name: "customers_missing_document",
        intent: Intent::CustomersMissingDocument,
        apply: customers_missing_document,
    },
];

// =============================================================================
// HANDLERS
// =============================================================================

fn capture_fragment(caps: &Captures<'_>) -> String {
    caps.get(1).map_or("", |m| m.as_str()).trim().to_string()
}

fn unresolved(kind: EntityKind, fragment: &str, candidates: &[String]) -> RuleOutcome {
    RuleOutcome::Terminal(TranslateError::not_found(
        kind,
        fragment,
        suggest(fragment, candidates),
    ))
}

fn list_customers(ctx: &RuleContext<'_>) -> RuleOutcome {
    if LIST_CUSTOMERS_RE.is_match(ctx.text) {
        RuleOutcome::Matched(QueryTemplate::all_customers())
    } else {
        RuleOutcome::NoMatch
    }
}

fn status_rule(ctx: &RuleContext<'_>, re: &Regex, status: AssignmentStatus) -> RuleOutcome {
    if re.is_match(ctx.text) {
        RuleOutcome::Matched(QueryTemplate::processes_by_status(status))
    } else {
        RuleOutcome::NoMatch
    }
}

fn pending_processes(ctx: &RuleContext<'_>) -> RuleOutcome {
    status_rule(ctx, &PENDING_RE, AssignmentStatus::Pending)
}

fn in_progress_processes(ctx: &RuleContext<'_>) -> RuleOutcome {
    status_rule(ctx, &IN_PROGRESS_RE, AssignmentStatus::InProgress)
}

fn completed_processes(ctx: &RuleContext<'_>) -> RuleOutcome {
    status_rule(ctx, &COMPLETED_RE, AssignmentStatus::Completed)
}

/// A full customer name anywhere in the question wins over the captured
/// fragment; terminal when neither resolves.
///
/// The alternate "how many documents X submitted" phrasing also resolves
/// its fragment fuzzily. Older releases only did that for the primary
/// phrasing and failed the alternate one outright.
fn customer_document_count(ctx: &RuleContext<'_>) -> RuleOutcome {
    let Some(caps) = HOW_MANY_RE
        .captures(ctx.text)
        .or_else(|| HOW_MANY_ALT_RE.captures(ctx.text))
    else {
        return RuleOutcome::NoMatch;
    };
    let customers = ctx.reference.customers();

    if let Some(name) = find_mentioned(ctx.text, customers) {
        return RuleOutcome::Matched(QueryTemplate::customer_document_count(name));
    }

    let fragment = capture_fragment(&caps);
    match ctx.resolver.resolve(&fragment, customers) {
        Resolution::Found(name) => {
            RuleOutcome::Matched(QueryTemplate::customer_document_count(&name))
        }
        Resolution::NotFound => unresolved(EntityKind::Customer, &fragment, customers),
    }
}

fn process_with_most_documents(ctx: &RuleContext<'_>) -> RuleOutcome {
    if MOST_DOCUMENTS_RE.is_match(ctx.text) {
        RuleOutcome::Matched(QueryTemplate::process_with_most_documents())
    } else {
        RuleOutcome::NoMatch
    }
}

/// Fragment resolution first, then a literal process name in the question;
/// terminal when neither resolves.
fn customers_assigned_to(ctx: &RuleContext<'_>) -> RuleOutcome {
    let Some(caps) = ASSIGNED_TO_RE.captures(ctx.text) else {
        return RuleOutcome::NoMatch;
    };
    let processes = ctx.reference.processes();
    let fragment = capture_fragment(&caps);

    let process = ctx
        .resolver
        .resolve(&fragment, processes)
        .into_option()
        .or_else(|| find_mentioned(ctx.text, processes).map(str::to_string));

    match process {
        Some(name) => RuleOutcome::Matched(QueryTemplate::customers_by_process(&name)),
        None => unresolved(EntityKind::Process, &fragment, processes),
    }
}

/// Alternate phrasing of `customers_assigned_to`; falls through when unresolved
fn show_customers_assigned_to(ctx: &RuleContext<'_>) -> RuleOutcome {
    let Some(caps) = SHOW_ASSIGNED_TO_RE.captures(ctx.text) else {
        return RuleOutcome::NoMatch;
    };

    match ctx.resolver.resolve(&capture_fragment(&caps), ctx.reference.processes()) {
        Resolution::Found(name) => RuleOutcome::Matched(QueryTemplate::customers_by_process(&name)),
        Resolution::NotFound => RuleOutcome::FallThrough,
    }
}

/// Looser "documents ... submitted" phrasing; falls through when unresolved
fn documents_submitted_by(ctx: &RuleContext<'_>) -> RuleOutcome {
    let Some(caps) = DOCUMENTS_SUBMITTED_RE.captures(ctx.text) else {
        return RuleOutcome::NoMatch;
    };

    match ctx.resolver.resolve(&capture_fragment(&caps), ctx.reference.customers()) {
        Resolution::Found(name) => {
            RuleOutcome::Matched(QueryTemplate::customer_document_count(&name))
        }
        Resolution::NotFound => RuleOutcome::FallThrough,
    }
}

/// The whole fragment is tried first so names ending in "Document" or
/// "Card" keep their last word; the trailing noun is dropped only as a
/// fallback.
fn customers_missing_document(ctx: &RuleContext<'_>) -> RuleOutcome {
    let Some(caps) = MISSING_DOCUMENT_RE.captures(ctx.text) else {
        return RuleOutcome::NoMatch;
    };
    let document_types = ctx.reference.document_types();
    let fragment = capture_fragment(&caps);

    let document_type = ctx
        .resolver
        .resolve(&fragment, document_types)
        .into_option()
        .or_else(|| {
            let stripped = TRAILING_DOCUMENT_NOUN_RE.replace(&fragment, "");
            let stripped = stripped.trim();
            if stripped == fragment {
                return None;
            }
            ctx.resolver.resolve(stripped, document_types).into_option()
        });

    match document_type {
        Some(name) => RuleOutcome::Matched(QueryTemplate::customers_missing_document(&name)),
        None => unresolved(EntityKind::DocumentType, &fragment, document_types),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceSet;
    use crate::resolver::EntityResolver;

    fn reference() -> ReferenceSet {
        let names = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        ReferenceSet::new(
            names(&["Ramesh Sharma", "Priya Patel"]),
            names(&["KYC Verification", "Home Loan Application"]),
            names(&["Passport", "PAN Card", "Address Proof"]),
        )
    }

    fn run(rule: fn(&RuleContext<'_>) -> RuleOutcome, text: &str) -> RuleOutcome {
        let reference = reference();
        let resolver = EntityResolver::new();
        let ctx = RuleContext {
            text,
            reference: &reference,
            resolver: &resolver,
        };
        rule(&ctx)
    }

    #[test]
    fn test_list_customers_needs_verb() {
        assert!(matches!(
            run(list_customers, "list all customers"),
            RuleOutcome::Matched(_)
        ));
        assert_eq!(run(list_customers, "customers"), RuleOutcome::NoMatch);
        assert_eq!(run(list_customers, "slideshow customers"), RuleOutcome::NoMatch);
    }

    #[test]
    fn test_status_phrases() {
        assert!(matches!(
            run(pending_processes, "what are the pending processes?"),
            RuleOutcome::Matched(_)
        ));
        assert!(matches!(
            run(in_progress_processes, "in-progress processes"),
            RuleOutcome::Matched(_)
        ));
        assert_eq!(
            run(in_progress_processes, "in progress processes"),
            RuleOutcome::NoMatch
        );
        assert_eq!(run(completed_processes, "completed process"), RuleOutcome::NoMatch);
    }

    #[test]
    fn test_count_literal_name_wins() {
        let outcome = run(
            customer_document_count,
            "how many documents did priya patel and ramesh submit? how many documents has ramesh sharma submitted",
        );
        // First customer in list order that appears verbatim
        assert_eq!(
            outcome,
            RuleOutcome::Matched(QueryTemplate::customer_document_count("Ramesh Sharma"))
        );
    }

    #[test]
    fn test_count_fragment_fallback() {
        let outcome = run(
            customer_document_count,
            "how many documents has ramesh sharm submitted?",
        );
        assert_eq!(
            outcome,
            RuleOutcome::Matched(QueryTemplate::customer_document_count("Ramesh Sharma"))
        );
    }

    #[test]
    fn test_count_alternate_phrasing() {
        let outcome = run(customer_document_count, "how many documents priya submitted");
        assert_eq!(
            outcome,
            RuleOutcome::Matched(QueryTemplate::customer_document_count("Priya Patel"))
        );
    }

    #[test]
    fn test_count_terminal_on_unknown() {
        let outcome = run(customer_document_count, "how many documents has zed submitted");
        match outcome {
            RuleOutcome::Terminal(TranslateError::EntityNotFound { kind, fragment, .. }) => {
                assert_eq!(kind, EntityKind::Customer);
                assert_eq!(fragment, "zed");
            }
            other => panic!("expected terminal failure, got {:?}", other),
        }
    }

    #[test]
    fn test_most_documents_short_form() {
        assert!(matches!(
            run(process_with_most_documents, "the process with the most documents"),
            RuleOutcome::Matched(_)
        ));
        assert!(matches!(
            run(process_with_most_documents, "which process with maximum uploaded documents"),
            RuleOutcome::Matched(_)
        ));
    }

    #[test]
    fn test_assigned_to_strips_article() {
        let outcome = run(
            customers_assigned_to,
            "which customers are assigned to the kyc verification?",
        );
        assert_eq!(
            outcome,
            RuleOutcome::Matched(QueryTemplate::customers_by_process("KYC Verification"))
        );
    }

    #[test]
    fn test_assigned_to_terminal() {
        let outcome = run(customers_assigned_to, "which customers are assigned to zzz");
        assert!(matches!(
            outcome,
            RuleOutcome::Terminal(TranslateError::EntityNotFound {
                kind: EntityKind::Process,
                ..
            })
        ));
    }

    #[test]
    fn test_show_assigned_to_falls_through() {
        assert_eq!(
            run(show_customers_assigned_to, "get customers assigned to zzz"),
            RuleOutcome::FallThrough
        );
        assert_eq!(
            run(show_customers_assigned_to, "get customers assigned to home loan"),
            RuleOutcome::Matched(QueryTemplate::customers_by_process("Home Loan Application"))
        );
    }

    #[test]
    fn test_documents_submitted_by() {
        assert_eq!(
            run(documents_submitted_by, "documents has priya submitted"),
            RuleOutcome::Matched(QueryTemplate::customer_document_count("Priya Patel"))
        );
        assert_eq!(
            run(documents_submitted_by, "documents has zed submitted"),
            RuleOutcome::FallThrough
        );
        // Empty fragment never resolves
        assert_eq!(
            run(documents_submitted_by, "documents has submitted"),
            RuleOutcome::FallThrough
        );
        assert_eq!(
            run(documents_submitted_by, "documents submitted"),
            RuleOutcome::NoMatch
        );
    }

    #[test]
    fn test_missing_document_fragment() {
        for (text, expected) in [
            ("which customers should provide pan card?", "PAN Card"),
            ("who needs to submit passport documents", "Passport"),
            ("customers missing address proof.", "Address Proof"),
            ("who have not provided pasport", "Passport"),
        ] {
            assert_eq!(
                run(customers_missing_document, text),
                RuleOutcome::Matched(QueryTemplate::customers_missing_document(expected)),
                "{}",
                text
            );
        }
    }

    #[test]
    fn test_missing_document_terminal() {
        match run(customers_missing_document, "which customers should provide birth certificate?") {
            RuleOutcome::Terminal(err) => {
                assert_eq!(
                    err.to_string(),
                    "Document type 'birth certificate' not recognized. Try exact document name."
                );
            }
            other => panic!("expected terminal failure, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_document_keeps_trailing_noun_of_name() {
        let names = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let reference = ReferenceSet::new(vec![], vec![], names(&["Identity Card", "Identity Document"]));
        let resolver = EntityResolver::new();

        for (text, expected) in [
            ("which customers should provide identity document?", "Identity Document"),
            ("which customers should provide identity card?", "Identity Card"),
            ("who needs to submit identity document documents", "Identity Document"),
        ] {
            let ctx = RuleContext {
                text,
                reference: &reference,
                resolver: &resolver,
            };
            assert_eq!(
                customers_missing_document(&ctx),
                RuleOutcome::Matched(QueryTemplate::customers_missing_document(expected)),
                "{}",
                text
            );
        }
    }
}
