//! Word tokens for overlap matching
//!
//! Text is NFKC-folded and lowercased, then split into runs of alphanumeric
//! characters. Everything else separates tokens.

use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

/// Tokenize text into lowercase alphanumeric runs.
///
/// ```
/// use ob_nlq::resolver::tokens::tokenize;
///
/// assert_eq!(tokenize("Home-Loan  Application?"), vec!["home", "loan", "application"]);
/// ```
pub fn tokenize(s: &str) -> Vec<String> {
    let folded: String = s.nfkc().collect();

    folded
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// True when `a` and `b` have at least one token in common
pub fn shares_token(a: &str, b: &str) -> bool {
    let left: HashSet<String> = tokenize(a).into_iter().collect();
    if left.is_empty() {
        return false;
    }
    tokenize(b).iter().any(|t| left.contains(t))
}
