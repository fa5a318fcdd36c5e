//! Entity resolution against known names
//!
//! Maps a free-text fragment onto one of a list of known names. Three tiers
//! are tried in order and the first hit wins:
//!
//! ```text
//! fragment ──► 1. containment     first candidate containing the fragment
//!          ──► 2. similarity      best Ratcliff/Obershelp ratio ≥ cutoff
//!          ──► 3. token overlap   first candidate sharing a word
//! ```
//!
//! The resolver only ever returns a value taken from the candidate list.

pub mod similarity;
pub mod tokens;

use tracing::debug;

use similarity::similarity_ratio;
use tokens::shares_token;

/// Default minimum similarity ratio for tier 2
pub const DEFAULT_SIMILARITY_CUTOFF: f64 = 0.6;

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Outcome of resolving a fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(String),
    NotFound,
}

impl Resolution {
    pub fn into_option(self) -> Option<String> {
        match self {
            Self::Found(name) => Some(name),
            Self::NotFound => None,
        }
    }
}

/// Which tier produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Containment,
    Similarity,
    TokenOverlap,
}

/// Three-tier fragment resolver
#[derive(Debug, Clone, Copy)]
pub struct EntityResolver {
    similarity_cutoff: f64,
}

impl Default for EntityResolver {
    fn default() -> Self {
        Self {
            similarity_cutoff: DEFAULT_SIMILARITY_CUTOFF,
        }
    }
}

impl EntityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cutoff(similarity_cutoff: f64) -> Self {
        Self { similarity_cutoff }
    }

    pub fn similarity_cutoff(&self) -> f64 {
        self.similarity_cutoff
    }

    /// Resolve `fragment` against `candidates`.
    ///
    /// Empty or whitespace-only fragments never resolve.
    pub fn resolve(&self, fragment: &str, candidates: &[String]) -> Resolution {
        match self.resolve_with_tier(fragment, candidates) {
            Some((name, _)) => Resolution::Found(name.to_string()),
            None => Resolution::NotFound,
        }
    }

    /// Like [`resolve`](Self::resolve), also reporting the tier that matched
    pub fn resolve_with_tier<'a>(
        &self,
        fragment: &str,
        candidates: &'a [String],
    ) -> Option<(&'a str, MatchTier)> {
        let needle = fragment.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        let hit = find_containing(&needle, candidates)
            .map(|c| (c, MatchTier::Containment))
            .or_else(|| {
                self.most_similar(fragment, candidates)
                    .map(|c| (c, MatchTier::Similarity))
            })
            .or_else(|| {
                candidates
                    .iter()
                    .find(|c| shares_token(&needle, c))
                    .map(|c| (c.as_str(), MatchTier::TokenOverlap))
            });

        match hit {
            Some((name, tier)) => debug!(fragment, name, ?tier, "Resolved fragment"),
            None => debug!(fragment, candidates = candidates.len(), "Fragment unresolved"),
        }

        hit
    }

    /// Best similarity match at or above the cutoff; earlier candidates win ties
    fn most_similar<'a>(&self, fragment: &str, candidates: &'a [String]) -> Option<&'a str> {
        let mut best: Option<(&'a str, f64)> = None;

        for candidate in candidates {
            let ratio = similarity_ratio(candidate, fragment);
            if ratio < self.similarity_cutoff {
                continue;
            }
            if best.map_or(true, |(_, top)| ratio > top) {
                best = Some((candidate.as_str(), ratio));
            }
        }

        best.map(|(name, _)| name)
    }
}

/// First candidate whose lowercase form contains `needle` (already lowercase)
fn find_containing<'a>(needle: &str, candidates: &'a [String]) -> Option<&'a str> {
    candidates
        .iter()
        .find(|c| c.to_lowercase().contains(needle))
        .map(String::as_str)
}

/// First known name that appears verbatim (case-insensitive) in `text`.
///
/// Used by rules that look for a full name anywhere in the question before
/// falling back to fragment resolution.
pub fn find_mentioned<'a>(text: &str, candidates: &'a [String]) -> Option<&'a str> {
    let haystack = text.to_lowercase();
    candidates
        .iter()
        .filter(|c| !c.trim().is_empty())
        .find(|c| haystack.contains(&c.to_lowercase()))
        .map(String::as_str)
}

/// Closest known name by Jaro-Winkler, for failure messages only
pub fn suggest<'a>(fragment: &str, candidates: &'a [String]) -> Option<&'a str> {
    let needle = fragment.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    let mut best: Option<(&'a str, f64)> = None;
    for candidate in candidates {
        let score = strsim::jaro_winkler(&needle, &candidate.to_lowercase());
        if score >= SUGGESTION_THRESHOLD && best.map_or(true, |(_, top)| score > top) {
            best = Some((candidate.as_str(), score));
        }
    }
    best.map(|(name, _)| name)
}
