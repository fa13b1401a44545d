//! Genre taxonomy: curated lookup tables and the category resolver.
//!
//! A [`Taxonomy`] is built once at startup, either from the built-in tables or
//! from a JSON file, and then shared read-only across requests.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use crate::{
    error::{AppError, AppResult},
    models::{Genre, GenreGroup},
};

pub mod normalize;
mod resolver;
mod tables;

pub use normalize::{normalize, CategoryTokens};
pub use resolver::{MatchTier, Resolution};

/// A `(substring, genre)` fallback rule; the pattern is matched case-insensitively
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackRule {
    pub pattern: String,
    pub genre: Genre,
}

impl FallbackRule {
    pub fn new(pattern: impl Into<String>, genre: Genre) -> Self {
        Self {
            pattern: pattern.into().to_lowercase(),
            genre,
        }
    }
}

/// On-disk shape of the taxonomy tables
///
/// ```json
/// {
///   "exact": { "영미소설": "소설", "추리/미스터리": "추리" },
///   "rules": [ { "pattern": "판타지", "genre": "판타지" } ],
///   "groups": [ { "name": "경제/경영", "members": ["경제", "경영"] } ]
/// }
/// ```
///
/// Omitted `top_level` / `sub_level` fall back to the built-in tiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    pub exact: BTreeMap<String, Genre>,
    pub rules: Vec<FallbackRule>,
    #[serde(default = "default_top_level")]
    pub top_level: Vec<Genre>,
    #[serde(default = "default_sub_level")]
    pub sub_level: Vec<Genre>,
    #[serde(default)]
    pub groups: Vec<GenreGroup>,
}

fn default_top_level() -> Vec<Genre> {
    Genre::TOP_LEVEL.to_vec()
}

fn default_sub_level() -> Vec<Genre> {
    Genre::SUB_LEVEL.to_vec()
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            exact: tables::default_exact_matches()
                .into_iter()
                .map(|(name, genre)| (name.to_string(), genre))
                .collect(),
            rules: tables::default_fallback_rules(),
            top_level: default_top_level(),
            sub_level: default_sub_level(),
            groups: tables::default_groups(),
        }
    }
}

/// Immutable genre lookup tables
#[derive(Debug, Clone)]
pub struct Taxonomy {
    /// Normalized, lowercased category name → genre
    exact: HashMap<String, Genre>,
    rules: Vec<FallbackRule>,
    top_level: Vec<Genre>,
    sub_level: Vec<Genre>,
    groups: Vec<GenreGroup>,
    canonical: HashSet<Genre>,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Taxonomy {
    /// Taxonomy backed by the built-in tables
    pub fn builtin() -> Self {
        Self::build(TaxonomyConfig::default())
    }

    /// Builds a taxonomy from configuration, rejecting inconsistent tables
    pub fn from_config(config: TaxonomyConfig) -> AppResult<Self> {
        for (tier, genres) in [("top", &config.top_level), ("sub", &config.sub_level)] {
            if let Some(genre) = first_duplicate(genres) {
                return Err(AppError::Config(format!(
                    "genre {genre} is listed twice in the {tier} level"
                )));
            }
        }

        let top: HashSet<Genre> = config.top_level.iter().copied().collect();
        if let Some(genre) = config.sub_level.iter().find(|g| top.contains(*g)) {
            return Err(AppError::Config(format!(
                "genre {genre} is listed as both top level and sub level"
            )));
        }

        for group in &config.groups {
            if group.members.is_empty() {
                return Err(AppError::Config(format!(
                    "genre group {} has no members",
                    group.name
                )));
            }
            if let Some(member) = group.members.iter().find(|m| !config.sub_level.contains(*m)) {
                return Err(AppError::Config(format!(
                    "genre group {} contains {member}, which is not a sub-level genre",
                    group.name
                )));
            }
        }

        if config.exact.keys().any(|name| normalize(name).is_empty()) {
            return Err(AppError::Config(
                "exact-match table contains a blank category name".to_string(),
            ));
        }

        if let Some(rule) = config.rules.iter().find(|r| r.pattern.trim().is_empty()) {
            return Err(AppError::Config(format!(
                "fallback rule for {} has a blank pattern",
                rule.genre
            )));
        }

        Ok(Self::build(config))
    }

    fn build(config: TaxonomyConfig) -> Self {
        let exact = config
            .exact
            .into_iter()
            .map(|(name, genre)| (normalize(&name).to_lowercase(), genre))
            .collect();

        let rules = config
            .rules
            .into_iter()
            .map(|rule| FallbackRule::new(rule.pattern, rule.genre))
            .collect();

        let canonical = config
            .top_level
            .iter()
            .chain(config.sub_level.iter())
            .copied()
            .collect();

        Self {
            exact,
            rules,
            top_level: config.top_level,
            sub_level: config.sub_level,
            groups: config.groups,
            canonical,
        }
    }

    /// Reads taxonomy tables from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read taxonomy {}: {}", path.display(), e))
        })?;
        let config: TaxonomyConfig = serde_json::from_str(&raw).map_err(|e| {
            AppError::Config(format!("Failed to parse taxonomy {}: {}", path.display(), e))
        })?;
        Self::from_config(config)
    }

    /// Loads the taxonomy named by configuration, or the built-in one
    pub fn load(path: Option<&str>) -> AppResult<Self> {
        let taxonomy = match path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::builtin(),
        };

        tracing::info!(
            source = path.unwrap_or("builtin"),
            exact_entries = taxonomy.exact.len(),
            fallback_rules = taxonomy.rules.len(),
            groups = taxonomy.groups.len(),
            "Taxonomy loaded"
        );

        Ok(taxonomy)
    }

    pub fn top_level(&self) -> &[Genre] {
        &self.top_level
    }

    pub fn sub_level(&self) -> &[Genre] {
        &self.sub_level
    }

    pub fn groups(&self) -> &[GenreGroup] {
        &self.groups
    }

    pub fn is_canonical(&self, genre: Genre) -> bool {
        self.canonical.contains(&genre)
    }

    fn exact_match(&self, token: &str) -> Option<Genre> {
        self.exact
            .get(&token.to_lowercase())
            .copied()
            .filter(|g| self.is_canonical(*g))
    }

    fn rule_match(&self, text: &str) -> Option<Genre> {
        let text = text.to_lowercase();
        self.rules
            .iter()
            .filter(|rule| self.is_canonical(rule.genre))
            .find(|rule| text.contains(rule.pattern.as_str()))
            .map(|rule| rule.genre)
    }
}

fn first_duplicate(genres: &[Genre]) -> Option<Genre> {
    let mut seen = HashSet::new();
    genres.iter().copied().find(|genre| !seen.insert(*genre))
}
