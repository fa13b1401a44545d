use serde::Serialize;
use std::collections::BTreeSet;

use super::{CategoryTokens, Taxonomy};
use crate::models::Genre;

/// Matching stage that produced a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// A token equals an exact-table entry
    Exact,
    /// A fallback rule occurs inside a token
    TokenFallback,
    /// A fallback rule occurs inside the whole normalized string
    WholeStringFallback,
}

/// Stages in evaluation order; the first stage with a hit decides
const CHAIN: [MatchTier; 3] = [
    MatchTier::Exact,
    MatchTier::TokenFallback,
    MatchTier::WholeStringFallback,
];

impl MatchTier {
    fn find(self, taxonomy: &Taxonomy, category: &CategoryTokens) -> Option<Genre> {
        match self {
            MatchTier::Exact => category
                .tokens
                .iter()
                .find_map(|token| taxonomy.exact_match(token)),
            MatchTier::TokenFallback => category
                .tokens
                .iter()
                .find_map(|token| taxonomy.rule_match(token)),
            MatchTier::WholeStringFallback => taxonomy.rule_match(&category.normalized),
        }
    }
}

/// A resolved genre and the stage that found it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub genre: Genre,
    pub tier: MatchTier,
}

impl Taxonomy {
    /// Maps a raw category string to at most one canonical genre
    ///
    /// Total over all inputs: blank or unrecognized categories yield `None`.
    pub fn resolve_genre(&self, raw: Option<&str>) -> Option<Genre> {
        raw.and_then(|raw| self.resolve(raw)).map(|r| r.genre)
    }

    /// Like [`Taxonomy::resolve_genre`], also reporting which stage matched
    pub fn resolve(&self, raw: &str) -> Option<Resolution> {
        let category = CategoryTokens::from_raw(raw);
        if category.normalized.is_empty() {
            return None;
        }

        let resolution = CHAIN.iter().find_map(|tier| {
            tier.find(self, &category).map(|genre| Resolution { genre, tier: *tier })
        });

        tracing::trace!(
            raw = %raw,
            leaf = %category.leaf,
            resolved = ?resolution,
            "Category resolved"
        );

        resolution
    }

    /// Resolves every category independently and unions the hits
    pub fn resolve_all<'a>(&self, raws: impl IntoIterator<Item = &'a str>) -> BTreeSet<Genre> {
        raws.into_iter()
            .filter_map(|raw| self.resolve_genre(Some(raw)))
            .collect()
    }

    /// Normalized leaf of a category path, for display
    pub fn leaf_tag(&self, raw: &str) -> Option<String> {
        let leaf = CategoryTokens::from_raw(raw).leaf;
        (!leaf.is_empty()).then_some(leaf)
    }
}
