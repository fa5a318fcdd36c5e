//! Ratcliff/Obershelp sequence similarity
//!
//! Finds the longest common block of two sequences, then recurses on the
//! unmatched text to its left and right. The ratio is `2·M / (|a| + |b|)`
//! where `M` is the total length of all matched blocks.

use std::collections::HashMap;

/// Similarity ratio in `[0.0, 1.0]`, compared `char` by `char`.
///
/// The block search prefers the earliest block in `a`, so the ratio is not
/// always symmetric. The resolver passes the candidate as `a` and the
/// fragment as `b`.
///
/// ```
/// use ob_nlq::resolver::similarity::similarity_ratio;
///
/// assert_eq!(similarity_ratio("abcd", "bcde"), 0.75);
/// assert_eq!(similarity_ratio("", ""), 1.0);
/// ```
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matched_len(&a, &b) as f64 / total as f64
}

/// Total length of the matching blocks between `a` and `b`
fn matched_len(a: &[char], b: &[char]) -> usize {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        b2j.entry(*c).or_default().push(j);
    }

    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_block(a, &b2j, (alo, ahi), (blo, bhi));
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }

    matched
}

/// Longest common block within `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Returns `(i, j, len)`. Ties go to the block starting earliest in `a`,
/// then earliest in `b`.
fn longest_block(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    (alo, ahi): (usize, usize),
    (blo, bhi): (usize, usize),
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0);

    // j2len[j] = length of the block ending at a[i - 1], b[j]
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next: HashMap<usize, usize> = HashMap::new();

        if let Some(positions) = b2j.get(c) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let len = j
                    .checked_sub(1)
                    .and_then(|prev| j2len.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next.insert(j, len);
                if len > best_len {
                    best_i = i + 1 - len;
                    best_j = j + 1 - len;
                    best_len = len;
                }
            }
        }

        j2len = next;
    }

    (best_i, best_j, best_len)
}
