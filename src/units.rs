// ABOUTME: Unit conversion table with mass, volume, and count categories
// ABOUTME: Static registry of unit aliases and scale factors to category base units
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Intelligence

//! # Unit Conversion Table
//!
//! Maps unit strings to a category (mass, volume, count) and a scale factor
//! to that category's base unit (gram, milliliter, each). Conversion is
//! `quantity * scale(from) / scale(to)` and is only defined within a single
//! category; count units are never convertible to mass or volume.
//!
//! Everything here is pure and stateless, safe for concurrent use.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::ConversionError;

/// Category a unit belongs to. Conversion across categories always fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitCategory {
    /// Weight units, base unit gram
    Mass,
    /// Volume units, base unit milliliter
    Volume,
    /// Discrete units (each, clove, egg), base unit each
    Count,
}

impl fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mass => write!(f, "mass"),
            Self::Volume => write!(f, "volume"),
            Self::Count => write!(f, "count"),
        }
    }
}

/// A unit string resolved against the registry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedUnit {
    /// Canonical short name for the unit
    pub canonical: &'static str,
    /// Category the unit belongs to
    pub category: UnitCategory,
    /// Scale factor to the category base unit
    pub scale: f64,
}

/// Resolve a free-text unit string to its category and scale.
///
/// Matching is case-insensitive and tolerant of surrounding whitespace and
/// a trailing period ("Tbsp." resolves like "tbsp").
///
/// # Errors
///
/// Returns [`ConversionError::UnknownUnit`] when the string matches no
/// registered unit or alias.
pub fn resolve_unit(raw: &str) -> Result<ResolvedUnit, ConversionError> {
    let normalized = raw.trim().trim_end_matches('.').to_lowercase();
    lookup(&normalized).ok_or_else(|| ConversionError::UnknownUnit {
        unit: raw.trim().to_owned(),
    })
}

/// Category of a unit string.
///
/// # Errors
///
/// Returns [`ConversionError::UnknownUnit`] for unregistered units.
pub fn category_of(raw: &str) -> Result<UnitCategory, ConversionError> {
    resolve_unit(raw).map(|unit| unit.category)
}

/// Convert a quantity between two units of the same category.
///
/// # Errors
///
/// Returns [`ConversionError::UnknownUnit`] if either unit is unregistered,
/// or [`ConversionError::UnitCategoryMismatch`] if the categories differ.
pub fn convert(quantity: f64, from: &str, to: &str) -> Result<f64, ConversionError> {
    let from_unit = resolve_unit(from)?;
    let to_unit = resolve_unit(to)?;

    if from_unit.category != to_unit.category {
        return Err(ConversionError::UnitCategoryMismatch {
            from: from_unit.canonical.to_owned(),
            from_category: from_unit.category,
            to: to_unit.canonical.to_owned(),
            to_category: to_unit.category,
        });
    }

    Ok(quantity * from_unit.scale / to_unit.scale)
}

const fn unit(canonical: &'static str, category: UnitCategory, scale: f64) -> ResolvedUnit {
    ResolvedUnit {
        canonical,
        category,
        scale,
    }
}

/// Alias table. US customary volume factors are exact metric definitions.
fn lookup(normalized: &str) -> Option<ResolvedUnit> {
    use UnitCategory::{Count, Mass, Volume};

    let resolved = match normalized {
        // Mass (base: gram)
        "mg" | "milligram" | "milligrams" => unit("mg", Mass, 0.001),
        "g" | "gram" | "grams" => unit("g", Mass, 1.0),
        "kg" | "kilogram" | "kilograms" => unit("kg", Mass, 1000.0),
        "oz" | "ounce" | "ounces" => unit("oz", Mass, 28.349_523_125),
        "lb" | "lbs" | "pound" | "pounds" => unit("lb", Mass, 453.592_37),

        // Volume (base: milliliter)
        "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => {
            unit("ml", Volume, 1.0)
        }
        "cl" | "centiliter" | "centiliters" => unit("cl", Volume, 10.0),
        "dl" | "deciliter" | "deciliters" => unit("dl", Volume, 100.0),
        "l" | "liter" | "liters" | "litre" | "litres" => unit("l", Volume, 1000.0),
        "tsp" | "teaspoon" | "teaspoons" => unit("tsp", Volume, 4.928_921_593_75),
        "tbsp" | "tablespoon" | "tablespoons" => unit("tbsp", Volume, 14.786_764_781_25),
        "fl oz" | "floz" | "fluid ounce" | "fluid ounces" => {
            unit("fl oz", Volume, 29.573_529_562_5)
        }
        "cup" | "cups" => unit("cup", Volume, 236.588_236_5),
        "pt" | "pint" | "pints" => unit("pint", Volume, 473.176_473),
        "qt" | "quart" | "quarts" => unit("quart", Volume, 946.352_946),
        "gal" | "gallon" | "gallons" => unit("gallon", Volume, 3785.411_784),

        // Count (base: each, scale always 1)
        "each" | "ea" | "count" | "item" | "items" | "piece" | "pieces" | "whole" => {
            unit("each", Count, 1.0)
        }
        "egg" | "eggs" => unit("egg", Count, 1.0),
        "clove" | "cloves" => unit("clove", Count, 1.0),
        "slice" | "slices" => unit("slice", Count, 1.0),
        "can" | "cans" => unit("can", Count, 1.0),
        "bunch" | "bunches" => unit("bunch", Count, 1.0),
        "stick" | "sticks" => unit("stick", Count, 1.0),
        "head" | "heads" => unit("head", Count, 1.0),
        "sprig" | "sprigs" => unit("sprig", Count, 1.0),

        _ => return None,
    };

    Some(resolved)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::float_cmp)]

    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn test_resolve_aliases_case_insensitive() {
        let grams = resolve_unit("Grams").unwrap();
        assert_eq!(grams.canonical, "g");
        assert_eq!(grams.category, UnitCategory::Mass);

        let tbsp = resolve_unit(" Tbsp. ").unwrap();
        assert_eq!(tbsp.canonical, "tbsp");
        assert_eq!(tbsp.category, UnitCategory::Volume);
    }

    #[test]
    fn test_unknown_unit() {
        let err = resolve_unit("smidgen").unwrap_err();
        assert_eq!(
            err,
            ConversionError::UnknownUnit {
                unit: "smidgen".to_owned()
            }
        );
    }

    #[test]
    fn test_mass_conversion() {
        let grams = convert(2.0, "kg", "g").unwrap();
        assert!((grams - 2000.0).abs() < TOLERANCE);

        let pounds = convert(453.592_37, "g", "lb").unwrap();
        assert!((pounds - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_two_cups_in_milliliters() {
        // The documented milk scenario: 2 cups ~= 473 ml
        let ml = convert(2.0, "cups", "ml").unwrap();
        assert!((ml - 473.176_473).abs() < 1e-6);
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let pairs = [
            ("g", "oz"),
            ("kg", "lb"),
            ("ml", "cup"),
            ("tsp", "tbsp"),
            ("l", "fl oz"),
            ("egg", "each"),
        ];
        for (a, b) in pairs {
            let q = 3.7;
            let back = convert(convert(q, a, b).unwrap(), b, a).unwrap();
            assert!((back - q).abs() < TOLERANCE, "{a} <-> {b} round trip");
        }
    }

    #[test]
    fn test_cross_category_always_fails() {
        for (from, to) in [("g", "ml"), ("cup", "kg"), ("egg", "g"), ("clove", "ml")] {
            let err = convert(1.0, from, to).unwrap_err();
            assert!(
                matches!(err, ConversionError::UnitCategoryMismatch { .. }),
                "{from} -> {to} must fail with a category mismatch"
            );
        }
    }

    #[test]
    fn test_count_units_identity() {
        assert_eq!(convert(3.0, "eggs", "each").unwrap(), 3.0);
        assert_eq!(convert(2.0, "cloves", "clove").unwrap(), 2.0);
    }
}
