// ABOUTME: Ingredient name matching between recipe requirements and pantry entries
// ABOUTME: Tagged match kinds (exact, normalized, substring, token overlap) with confidence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Intelligence

//! # Ingredient Matcher
//!
//! Resolves a free-text requirement name against pantry entry names. The
//! policy is applied in order and the first success wins per candidate:
//!
//! 1. Exact case-insensitive match
//! 2. Singular/plural normalization (suffix stripping) then exact match
//! 3. Substring containment in either direction
//! 4. Shared significant token, flagged low-confidence
//!
//! Matching is a pure function over two strings, so the strategy can be
//! swapped without touching the planner. "No match" is an absence, never an
//! error: the batch reports the ingredient as not found and moves on.

use serde::{Deserialize, Serialize};

/// How a requirement name matched a pantry entry name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Exact case-insensitive equality
    Exact,
    /// Equal after singular/plural suffix normalization
    Normalized,
    /// One normalized name contains the other
    Substring,
    /// Names share a significant word; lowest-confidence heuristic
    TokenOverlap,
}

impl MatchKind {
    /// Fixed confidence assigned to this match kind
    #[must_use]
    pub const fn confidence(self) -> f64 {
        match self {
            Self::Exact => 1.0,
            Self::Normalized => 0.9,
            Self::Substring => 0.7,
            Self::TokenOverlap => 0.4,
        }
    }

    /// Whether callers should treat this match as a weak guess
    #[must_use]
    pub const fn is_low_confidence(self) -> bool {
        matches!(self, Self::TokenOverlap)
    }
}

/// Result of matching one requirement name against one candidate name
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IngredientMatch {
    /// Which rule produced the match
    pub kind: MatchKind,
    /// Confidence in [0, 1]
    pub confidence: f64,
}

impl IngredientMatch {
    const fn of(kind: MatchKind) -> Self {
        Self {
            kind,
            confidence: kind.confidence(),
        }
    }
}

/// Match a requirement name against one candidate pantry name.
///
/// `allow_token_overlap` disables the last-resort heuristic when false
/// (configuration knob; the stronger rules always apply).
#[must_use]
pub fn match_names(
    requirement: &str,
    candidate: &str,
    allow_token_overlap: bool,
) -> Option<IngredientMatch> {
    let req = normalize(requirement);
    let cand = normalize(candidate);
    if req.is_empty() || cand.is_empty() {
        return None;
    }

    if req == cand {
        return Some(IngredientMatch::of(MatchKind::Exact));
    }

    if singular_forms(&req)
        .iter()
        .any(|r| singular_forms(&cand).iter().any(|c| r == c))
    {
        return Some(IngredientMatch::of(MatchKind::Normalized));
    }

    // Substring either direction; require a few characters so "a" does not
    // match everything
    if (req.len() >= 3 && cand.contains(&req)) || (cand.len() >= 3 && req.contains(&cand)) {
        return Some(IngredientMatch::of(MatchKind::Substring));
    }

    if allow_token_overlap && shares_significant_token(&req, &cand) {
        return Some(IngredientMatch::of(MatchKind::TokenOverlap));
    }

    None
}

fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Candidate singular spellings for a whole name or a single token.
///
/// Simple suffix stripping per the matching contract: "tomatoes" yields
/// "tomato" (strip "es") and "cloves" yields "clove" (strip "s").
fn singular_forms(name: &str) -> Vec<String> {
    let mut forms = vec![name.to_owned()];
    if name.len() > 3 {
        if let Some(stripped) = name.strip_suffix("es") {
            forms.push(stripped.to_owned());
        }
    }
    if name.len() > 2 && !name.ends_with("ss") {
        if let Some(stripped) = name.strip_suffix('s') {
            forms.push(stripped.to_owned());
        }
    }
    forms
}

/// Words too generic to count as a match on their own
const STOPWORDS: &[&str] = &[
    "the", "and", "of", "with", "for", "fresh", "dried", "ground", "chopped", "large", "small",
    "medium", "whole", "raw", "organic", "extra",
];

fn shares_significant_token(a: &str, b: &str) -> bool {
    let tokens_a: Vec<String> = significant_tokens(a);
    let tokens_b: Vec<String> = significant_tokens(b);
    tokens_a
        .iter()
        .any(|ta| tokens_b.iter().any(|tb| ta == tb))
}

fn significant_tokens(name: &str) -> Vec<String> {
    name.split_whitespace()
        .filter(|token| token.len() >= 3 && !STOPWORDS.contains(token))
        .flat_map(|token| singular_forms(token))
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]

    use super::*;

    #[test]
    fn test_exact_case_insensitive() {
        let m = match_names("Basil", "basil", true).unwrap();
        assert_eq!(m.kind, MatchKind::Exact);
        assert_eq!(m.confidence, 1.0);
    }

    #[test]
    fn test_plural_normalization() {
        let m = match_names("tomatoes", "tomato", true).unwrap();
        assert_eq!(m.kind, MatchKind::Normalized);

        let m = match_names("egg", "eggs", true).unwrap();
        assert_eq!(m.kind, MatchKind::Normalized);
    }

    #[test]
    fn test_substring_both_directions() {
        let m = match_names("tomato", "cherry tomatoes", true).unwrap();
        // "tomato" is contained in "cherry tomatoes"
        assert_eq!(m.kind, MatchKind::Substring);

        let m = match_names("unsalted butter", "butter", true).unwrap();
        assert_eq!(m.kind, MatchKind::Substring);
    }

    #[test]
    fn test_token_overlap_low_confidence() {
        let m = match_names("chicken breast", "chicken thighs", true).unwrap();
        assert_eq!(m.kind, MatchKind::TokenOverlap);
        assert!(m.kind.is_low_confidence());
    }

    #[test]
    fn test_token_overlap_can_be_disabled() {
        assert!(match_names("chicken breast", "chicken thighs", false).is_none());
        // Stronger rules still apply with the heuristic disabled
        assert!(match_names("basil", "fresh basil", false).is_some());
    }

    #[test]
    fn test_stopwords_do_not_match() {
        assert!(match_names("fresh parsley", "fresh ginger", true).is_none());
    }

    #[test]
    fn test_no_match_is_none() {
        assert!(match_names("milk", "flour", true).is_none());
        assert!(match_names("", "flour", true).is_none());
    }

    #[test]
    fn test_first_rule_wins() {
        // "cherry tomatoes" vs itself must be Exact, not Substring
        let m = match_names("Cherry  Tomatoes", "cherry tomatoes", true).unwrap();
        assert_eq!(m.kind, MatchKind::Exact);
    }
}
