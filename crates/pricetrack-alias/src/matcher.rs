//! Fuzzy name matching between catalog entries and canonical products.

use crate::reference::CanonicalProduct;

const SCORE_EPSILON: f64 = 1e-9;

/// How a catalog entry was linked to a canonical product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    Exact,
    Partial,
    Keyword,
    Manual,
    None,
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchType::Exact => write!(f, "EXACT"),
            MatchType::Partial => write!(f, "PARTIAL"),
            MatchType::Keyword => write!(f, "KEYWORD"),
            MatchType::Manual => write!(f, "MANUAL"),
            MatchType::None => write!(f, "NONE"),
        }
    }
}

impl std::str::FromStr for MatchType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EXACT" => Ok(MatchType::Exact),
            "PARTIAL" => Ok(MatchType::Partial),
            "KEYWORD" => Ok(MatchType::Keyword),
            "MANUAL" => Ok(MatchType::Manual),
            "NONE" => Ok(MatchType::None),
            _ => Err(()),
        }
    }
}

/// A scored candidate produced by [`best_match`].
#[derive(Debug, Clone, Copy)]
pub struct MatchCandidate<'a> {
    pub product: &'a CanonicalProduct,
    pub match_type: MatchType,
    pub score: f64,
}

/// Finds the best canonical candidate for a catalog product name.
///
/// Heuristics, strongest first:
/// - exact lowercase-name equality → `EXACT`, returned immediately;
/// - substring containment either direction → `PARTIAL`, score =
///   canonical length ÷ catalog length;
/// - at least two shared whitespace-delimited words → `KEYWORD`, score =
///   overlap ÷ larger word-set size.
///
/// Tie-break is deterministic: on equal score a `PARTIAL` candidate beats a
/// `KEYWORD` one, and within the same type the earlier candidate in
/// iteration order wins (callers pass the canonical list sorted by
/// `product_id`).
#[must_use]
pub fn best_match<'a>(
    catalog_name: &str,
    canonical: &'a [CanonicalProduct],
) -> Option<MatchCandidate<'a>> {
    let catalog_lower = catalog_name.to_lowercase();
    let catalog_words: Vec<&str> = catalog_lower.split_whitespace().collect();

    let mut best: Option<MatchCandidate<'a>> = None;

    let mut consider = |candidate: MatchCandidate<'a>| {
        let wins = match best {
            None => true,
            Some(current) => {
                candidate.score > current.score + SCORE_EPSILON
                    || ((candidate.score - current.score).abs() <= SCORE_EPSILON
                        && candidate.match_type == MatchType::Partial
                        && current.match_type == MatchType::Keyword)
            }
        };
        if wins {
            best = Some(candidate);
        }
    };

    for product in canonical {
        let canon_lower = product.product_name.to_lowercase();

        if catalog_lower == canon_lower {
            return Some(MatchCandidate {
                product,
                match_type: MatchType::Exact,
                score: 1.0,
            });
        }

        if canon_lower.contains(&catalog_lower) || catalog_lower.contains(&canon_lower) {
            #[allow(clippy::cast_precision_loss)]
            let score = canon_lower.len() as f64 / catalog_lower.len().max(1) as f64;
            consider(MatchCandidate {
                product,
                match_type: MatchType::Partial,
                score,
            });
        }

        let canon_words: Vec<&str> = canon_lower.split_whitespace().collect();
        let overlap = canon_words
            .iter()
            .filter(|w| catalog_words.contains(w))
            .count();
        if overlap >= 2 {
            #[allow(clippy::cast_precision_loss)]
            let score = overlap as f64 / canon_words.len().max(catalog_words.len()) as f64;
            consider(MatchCandidate {
                product,
                match_type: MatchType::Keyword,
                score,
            });
        }
    }

    best
}
