//! Food composition table.
//!
//! The built-in table holds the foods referenced by the meal blueprints.
//! Lookups by id return `None` for unknown foods; callers decide what a
//! miss means.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Default number of results returned by `FoodTable::search`
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

/// Cached default food table - built once and reused across all plan generations
static DEFAULT_FOOD_TABLE: Lazy<FoodTable> = Lazy::new(build_default_food_table);

/// Keyed collection of food entries
#[derive(Clone, Debug, Default)]
pub struct FoodTable {
    pub foods: HashMap<String, FoodItem>,
}

/// Get a reference to the cached built-in food table
pub fn get_default_food_table() -> &'static FoodTable {
    &DEFAULT_FOOD_TABLE
}

#[allow(clippy::too_many_arguments)]
fn food(
    id: &str,
    name: &str,
    category: FoodCategory,
    portion: &str,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
    tags: &[&str],
) -> FoodItem {
    FoodItem {
        id: id.into(),
        name: name.into(),
        category,
        portion: portion.into(),
        calories,
        protein,
        carbs,
        fat,
        tags: tags.iter().map(|t| (*t).into()).collect(),
    }
}

/// Builds the built-in food table
///
/// **Note**: For plan generation, prefer `get_default_food_table()` which
/// returns a cached reference.
pub fn build_default_food_table() -> FoodTable {
    use FoodCategory::*;

    let foods = vec![
        food("oats", "Rolled Oats", Carb, "1/2 cup (dry)", 150.0, 5.0, 27.0, 3.0, &["breakfast", "fiber", "complex carbs"]),
        food("greek_yogurt", "Plain Greek Yogurt", Protein, "170 g", 100.0, 17.0, 6.0, 0.0, &["protein", "probiotic"]),
        food("berries", "Mixed Berries", Produce, "1 cup", 60.0, 1.0, 14.0, 0.0, &["fiber", "antioxidant"]),
        food("egg_whites", "Egg Whites", Protein, "4 whites", 70.0, 16.0, 1.0, 0.0, &["low fat", "breakfast"]),
        food("whole_egg", "Whole Eggs", Protein, "2 eggs", 150.0, 12.0, 2.0, 10.0, &["healthy fats", "breakfast"]),
        food("avocado", "Avocado", Fat, "1/2 fruit", 120.0, 2.0, 6.0, 10.0, &["monounsaturated fat", "micronutrients"]),
        food("chicken_breast", "Grilled Chicken Breast", Protein, "120 g", 165.0, 32.0, 0.0, 4.0, &["lean protein"]),
        food("salmon", "Baked Salmon", Protein, "120 g", 210.0, 25.0, 0.0, 12.0, &["omega-3", "anti-inflammatory"]),
        food("brown_rice", "Brown Rice", Carb, "1 cup (cooked)", 215.0, 5.0, 45.0, 2.0, &["complex carbs"]),
        food("quinoa", "Quinoa", Carb, "1 cup (cooked)", 220.0, 8.0, 39.0, 4.0, &["complete protein", "gluten free"]),
        food("sweet_potato", "Sweet Potato", Carb, "1 medium", 180.0, 4.0, 41.0, 0.0, &["beta carotene", "satiety"]),
        food("broccoli", "Broccoli", Produce, "1 cup (steamed)", 55.0, 4.0, 11.0, 0.0, &["fiber", "micronutrients"]),
        food("spinach", "Spinach", Produce, "2 cups", 20.0, 2.0, 3.0, 0.0, &["iron", "micronutrients"]),
        food("almonds", "Raw Almonds", Fat, "28 g", 165.0, 6.0, 6.0, 14.0, &["healthy fats", "snack"]),
        food("whey_shake", "Whey Protein Shake", Supplement, "1 scoop", 140.0, 24.0, 4.0, 2.0, &["fast protein"]),
        food("banana", "Banana", Produce, "1 medium", 105.0, 1.0, 27.0, 0.0, &["potassium", "energy"]),
        food("apple", "Apple", Produce, "1 medium", 95.0, 0.0, 25.0, 0.0, &["fiber", "satiety"]),
        food("chickpeas", "Boiled Chickpeas", Protein, "1 cup", 210.0, 11.0, 35.0, 4.0, &["plant protein", "fiber"]),
        food("turkey_breast", "Turkey Breast", Protein, "120 g", 150.0, 30.0, 0.0, 3.0, &["lean protein"]),
        food("olive_oil", "Extra Virgin Olive Oil", Fat, "1 tbsp", 120.0, 0.0, 0.0, 14.0, &["monounsaturated fat"]),
        food("chia_seed", "Chia Seeds", Fat, "2 tbsp", 120.0, 4.0, 10.0, 7.0, &["omega-3", "fiber"]),
        food("cottage_cheese", "Cottage Cheese", Protein, "150 g", 130.0, 18.0, 6.0, 5.0, &["calcium", "protein"]),
        food("lentil_soup", "Lentil Soup", Protein, "1 bowl", 180.0, 12.0, 28.0, 4.0, &["plant protein", "fiber"]),
        food("protein_pancake", "Protein Pancakes", Carb, "2 pancakes", 230.0, 20.0, 28.0, 6.0, &["breakfast", "protein"]),
    ];

    FoodTable::from_items(foods)
}

impl FoodTable {
    /// Build a table keyed by each item's id (later duplicates win)
    pub fn from_items(items: impl IntoIterator<Item = FoodItem>) -> Self {
        Self {
            foods: items
                .into_iter()
                .map(|item| (item.id.clone(), item))
                .collect(),
        }
    }

    /// Look up a food by id
    pub fn get(&self, id: &str) -> Option<&FoodItem> {
        self.foods.get(id)
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    /// Return a new table with `extra` merged in
    ///
    /// Extra items replace built-in entries that share an id.
    pub fn with_items(&self, extra: impl IntoIterator<Item = FoodItem>) -> Self {
        let mut foods = self.foods.clone();
        for item in extra {
            if foods.contains_key(&item.id) {
                tracing::debug!("Custom food '{}' overrides built-in entry", item.id);
            }
            foods.insert(item.id.clone(), item);
        }
        Self { foods }
    }

    /// Return a new table without the given ids
    ///
    /// Unknown ids are ignored with a warning.
    pub fn without<S: AsRef<str>>(&self, ids: &[S]) -> Self {
        let mut foods = self.foods.clone();
        for id in ids {
            if foods.remove(id.as_ref()).is_none() {
                tracing::warn!("Cannot exclude unknown food '{}'", id.as_ref());
            }
        }
        Self { foods }
    }

    /// Keyword search over food names and tags
    ///
    /// Matching is case-insensitive on substrings. An empty query returns
    /// every food. Results are sorted by name, then id, and truncated to
    /// `limit`.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&FoodItem> {
        let token = query.trim().to_lowercase();

        let mut matches: Vec<_> = self
            .foods
            .values()
            .filter(|item| {
                token.is_empty()
                    || item.name.to_lowercase().contains(&token)
                    || item.tags.iter().any(|tag| tag.to_lowercase().contains(&token))
            })
            .collect();

        matches.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        matches.truncate(limit);
        matches
    }

    /// Validate the table for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (id, item) in &self.foods {
            if id.is_empty() || item.id.is_empty() {
                errors.push("Food has empty ID".to_string());
            }
            if id != &item.id {
                errors.push(format!(
                    "Food key '{}' doesn't match food.id '{}'",
                    id, item.id
                ));
            }
            if item.name.is_empty() {
                errors.push(format!("Food '{}' has empty name", id));
            }

            let values = [
                ("calories", item.calories),
                ("protein", item.protein),
                ("carbs", item.carbs),
                ("fat", item.fat),
            ];
            for (field, value) in values {
                if !value.is_finite() || value < 0.0 {
                    errors.push(format!("Food '{}': {} must be non-negative, got {}", id, field, value));
                }
            }
        }

        errors
    }
}
