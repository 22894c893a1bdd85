//! Cuisine normalization.
//!
//! Free-text cuisine strings are mapped onto a small vocabulary with an ordered rule list.
//! Rules are checked in order and the first rule with a matching keyword wins, so a
//! "sushi burger" bar is a Burger place. Inputs matching no rule are title-cased.

use crate::models::CanonicalCuisine;

/// Maps any of its lowercase keywords to a canonical cuisine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CuisineRule {
    keywords: Vec<String>,
    canonical: String,
}

impl CuisineRule {
    pub fn new<I, S>(keywords: I, canonical: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
            canonical: canonical.into(),
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

/// Ordered substring rules plus a title-case fallback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CuisineNormalizer {
    rules: Vec<CuisineRule>,
}

impl Default for CuisineNormalizer {
    fn default() -> Self {
        Self {
            rules: vec![
                CuisineRule::new(["burger"], "Burger"),
                CuisineRule::new(["sushi"], "Sushi"),
                CuisineRule::new(["italian", "pizza"], "Italian"),
                CuisineRule::new(["thai"], "Thai"),
                CuisineRule::new(["kebab"], "Middle Eastern"),
            ],
        }
    }
}

impl CuisineNormalizer {
    /// A normalizer with no rules; everything falls through to title case
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Appends a rule with the lowest priority
    pub fn with_rule(mut self, rule: CuisineRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[CuisineRule] {
        &self.rules
    }

    pub fn normalize(&self, raw: &str) -> CanonicalCuisine {
        let lowered = raw.to_lowercase();

        match self.rules.iter().find(|rule| rule.matches(&lowered)) {
            Some(rule) => CanonicalCuisine::new(rule.canonical.clone()),
            None => CanonicalCuisine::new(title_case(&lowered)),
        }
    }
}

/// Uppercases the first letter of every word and lowercases the rest.
/// Any non-alphabetic character starts a new word.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;

    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }

    out
}
