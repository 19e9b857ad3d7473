// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! The validated ingredient catalogue.
//!
//! This module turns raw JSON catalogue data into a normalized, queryable
//! `Catalogue`. Normalization happens exactly once at construction time:
//! ingredient identities are resolved (explicit id, then name, then the
//! positional index rendered as a string), every attribute vector is
//! padded or truncated to the shared attribute length, and non-finite
//! numeric entries are coerced to zero so the search stays total over
//! malformed-but-well-typed input.
//!
//! The catalogue is read-only after construction. Per the solver's
//! concurrency contract it is built once and passed by reference into
//! every solve, never held as ambient mutable state.

use crate::{
    index::IngredientIndex,
    ingredient::{Ingredient, SeasonalKind},
    style::Style,
};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};

/// The error type for catalogue loading.
#[derive(Debug)]
pub enum CatalogueError {
    /// An I/O error occurred while reading the input.
    Io(std::io::Error),
    /// The input was not valid catalogue JSON.
    Json(serde_json::Error),
}

impl std::fmt::Display for CatalogueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json(e) => write!(f, "Catalogue JSON error: {e}"),
        }
    }
}

impl std::error::Error for CatalogueError {}

impl From<std::io::Error> for CatalogueError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for CatalogueError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// The raw shape of one catalogue ingredient entry.
///
/// Identity falls back from `id` to `name` to the positional index, and
/// the seasonal family is derived from whichever label is present.
#[derive(Clone, Debug, Deserialize)]
struct IngredientEntry {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    vec: Vec<f64>,
    #[serde(default)]
    cost: Option<f64>,
    #[serde(default, alias = "seasonalType")]
    seasonal_type: Option<String>,
    #[serde(default)]
    category_label: Option<String>,
}

impl IngredientEntry {
    fn into_ingredient(self, position: usize) -> Ingredient {
        let id = self
            .id
            .or(self.name)
            .unwrap_or_else(|| position.to_string());
        let mut ingredient = Ingredient::new(id, self.vec);
        if let Some(cost) = self.cost {
            ingredient = ingredient.with_unit_cost(cost);
        }
        let label = self.seasonal_type.or(self.category_label);
        if let Some(label) = label {
            if let Some(kind) = SeasonalKind::from_label(&label) {
                ingredient = ingredient.with_seasonal_kind(kind);
            }
        }
        ingredient
    }
}

/// The raw shape of a catalogue document.
#[derive(Clone, Debug, Deserialize)]
struct CatalogueData {
    attrs: Vec<String>,
    #[serde(default)]
    styles: FxHashMap<String, Style>,
    #[serde(default)]
    ingredients: Vec<IngredientEntry>,
}

/// The validated, normalized catalogue shared by every solve.
///
/// Holds the ordered attribute list that defines the index into all
/// attribute vectors, the styles keyed by id, and the ingredient list in
/// its original order (solution count vectors are reported in this
/// order).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "CatalogueData")]
pub struct Catalogue {
    attrs: Vec<String>,
    styles: FxHashMap<String, Style>,
    ingredients: Vec<Ingredient>,
    #[serde(skip_serializing)]
    id_to_index: FxHashMap<String, usize>,
}

impl From<CatalogueData> for Catalogue {
    fn from(data: CatalogueData) -> Self {
        let ingredients = data
            .ingredients
            .into_iter()
            .enumerate()
            .map(|(position, entry)| entry.into_ingredient(position))
            .collect();
        Catalogue::new(data.attrs, data.styles, ingredients)
    }
}

impl Catalogue {
    /// Creates a catalogue from already-built parts, normalizing every
    /// vector to the attribute length and sanitizing non-finite entries.
    ///
    /// When two ingredients resolve to the same id, the later one wins
    /// id-based lookups; both keep their positional slot in count vectors.
    pub fn new(
        attrs: Vec<String>,
        mut styles: FxHashMap<String, Style>,
        mut ingredients: Vec<Ingredient>,
    ) -> Self {
        let num_attrs = attrs.len();
        for style in styles.values_mut() {
            style.normalize(num_attrs);
        }
        let mut id_to_index = FxHashMap::default();
        for (position, ingredient) in ingredients.iter_mut().enumerate() {
            ingredient.normalize(num_attrs);
            id_to_index.insert(ingredient.id().to_string(), position);
        }
        Self {
            attrs,
            styles,
            ingredients,
            id_to_index,
        }
    }

    /// Parses a catalogue from a JSON string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use grist_model::catalogue::Catalogue;
    ///
    /// let catalogue = Catalogue::from_json_str(
    ///     r#"{
    ///         "attrs": ["taste", "color"],
    ///         "styles": { "pale": { "base": [0, 0] } },
    ///         "ingredients": [{ "name": "pale_malt", "vec": [0.4, 0.3] }]
    ///     }"#,
    /// )
    /// .unwrap();
    /// assert_eq!(catalogue.num_attrs(), 2);
    /// assert_eq!(catalogue.num_ingredients(), 1);
    /// ```
    pub fn from_json_str(input: &str) -> Result<Self, CatalogueError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Parses a catalogue from any reader producing JSON.
    pub fn from_reader<R>(reader: R) -> Result<Self, CatalogueError>
    where
        R: std::io::Read,
    {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Parses a catalogue from a JSON file on disk.
    pub fn from_path<P>(path: P) -> Result<Self, CatalogueError>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Returns the ordered attribute list.
    #[inline]
    pub fn attrs(&self) -> &[String] {
        &self.attrs
    }

    /// Returns the number of attributes.
    #[inline]
    pub fn num_attrs(&self) -> usize {
        self.attrs.len()
    }

    /// Returns the position of `attr` in the attribute list.
    #[inline]
    pub fn attr_position(&self, attr: &str) -> Option<usize> {
        self.attrs.iter().position(|a| a == attr)
    }

    /// Returns the style with the given id, if present.
    #[inline]
    pub fn style(&self, style_id: &str) -> Option<&Style> {
        self.styles.get(style_id)
    }

    /// Returns the ingredient list in catalogue order.
    #[inline]
    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    /// Returns the number of ingredients.
    #[inline]
    pub fn num_ingredients(&self) -> usize {
        self.ingredients.len()
    }

    /// Returns the ingredient at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `0..num_ingredients()`.
    #[inline]
    pub fn ingredient(&self, index: IngredientIndex) -> &Ingredient {
        let position = index.get();
        debug_assert!(
            position < self.num_ingredients(),
            "called `Catalogue::ingredient` with ingredient index out of bounds: the len is {} but the index is {}",
            self.num_ingredients(),
            position
        );
        &self.ingredients[position]
    }

    /// Resolves an ingredient id to its catalogue index.
    #[inline]
    pub fn ingredient_index(&self, id: &str) -> Option<IngredientIndex> {
        self.id_to_index.get(id).copied().map(IngredientIndex::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_JSON: &str = r#"{
        "attrs": ["taste", "color", "strength", "foam"],
        "styles": {
            "light_ale": {
                "base": [0, 0, 0, 0],
                "min_counts": { "pale_malt": 1, "standard_yeast": 1 },
                "bands": {
                    "taste": [
                        { "band": "red", "min": 0, "max": 0.99 },
                        { "band": "green", "min": 1, "max": 2.99 }
                    ]
                }
            }
        },
        "ingredients": [
            { "id": "pale_malt", "vec": [0.4, 0.3, 1.0, 0.5], "cost": 2, "seasonal_type": "malt" },
            { "name": "standard_yeast", "vec": [0.5, 0, -1.0, -0.5], "cost": 2 },
            { "vec": [1.5, 1.0] }
        ]
    }"#;

    #[test]
    fn test_from_json_resolves_identities() {
        let catalogue = Catalogue::from_json_str(SAMPLE_JSON).unwrap();
        assert_eq!(catalogue.num_ingredients(), 3);
        assert_eq!(catalogue.ingredients()[0].id(), "pale_malt");
        assert_eq!(catalogue.ingredients()[1].id(), "standard_yeast");
        // No id, no name: falls back to the positional index.
        assert_eq!(catalogue.ingredients()[2].id(), "2");
    }

    #[test]
    fn test_from_json_normalizes_vectors() {
        let catalogue = Catalogue::from_json_str(SAMPLE_JSON).unwrap();
        // Short vector is padded to the attribute length.
        assert_eq!(
            catalogue.ingredients()[2].unit_vector(),
            &[1.5, 1.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_from_json_seasonal_kind() {
        let catalogue = Catalogue::from_json_str(SAMPLE_JSON).unwrap();
        assert_eq!(
            catalogue.ingredients()[0].seasonal_kind(),
            Some(SeasonalKind::Malt)
        );
        assert_eq!(catalogue.ingredients()[1].seasonal_kind(), None);
    }

    #[test]
    fn test_lookups() {
        let catalogue = Catalogue::from_json_str(SAMPLE_JSON).unwrap();
        assert_eq!(catalogue.attr_position("strength"), Some(2));
        assert_eq!(catalogue.attr_position("bitterness"), None);

        let idx = catalogue.ingredient_index("standard_yeast").unwrap();
        assert_eq!(idx.get(), 1);
        assert_eq!(catalogue.ingredient(idx).id(), "standard_yeast");
        assert!(catalogue.ingredient_index("nope").is_none());

        assert!(catalogue.style("light_ale").is_some());
        assert!(catalogue.style("imperial_stout").is_none());
    }

    #[test]
    fn test_duplicate_ids_last_wins_for_lookup() {
        let catalogue = Catalogue::new(
            vec!["a".to_string()],
            FxHashMap::default(),
            vec![
                Ingredient::new("dup", vec![1.0]),
                Ingredient::new("dup", vec![2.0]),
            ],
        );
        let idx = catalogue.ingredient_index("dup").unwrap();
        assert_eq!(idx.get(), 1);
    }

    #[test]
    fn test_serialize_round_trip() {
        let catalogue = Catalogue::from_json_str(SAMPLE_JSON).unwrap();
        let json = serde_json::to_string(&catalogue).unwrap();
        let restored = Catalogue::from_json_str(&json).unwrap();
        assert_eq!(restored.num_attrs(), catalogue.num_attrs());
        assert_eq!(restored.num_ingredients(), catalogue.num_ingredients());
        assert_eq!(
            restored.ingredients()[0].unit_vector(),
            catalogue.ingredients()[0].unit_vector()
        );
        assert_eq!(
            restored.ingredient_index("pale_malt").map(|i| i.get()),
            Some(0)
        );
    }
}
