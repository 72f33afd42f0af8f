//! Meal plan builder.
//!
//! Each goal owns a rotation of daily blueprint sets. A blueprint names a
//! meal, its share of the daily calorie target and the foods it is built
//! from at base portions. Building a meal scales every portion by the same
//! factor so the meal approximates its share while keeping the relative
//! macro mix of its foods.

use crate::nutrition::round_to;
use crate::types::*;
use crate::FoodTable;

/// Smallest portion multiplier a scaled item may receive
pub const MIN_PORTION_MULTIPLIER: f64 = 0.5;

/// A food reference inside a blueprint
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PortionRef {
    pub food_id: &'static str,
    pub base_portion: f64,
}

/// Template for one meal of a day
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MealBlueprint {
    pub name: &'static str,
    pub calorie_share: f64,
    pub items: &'static [PortionRef],
}

impl MealBlueprint {
    /// Calories this meal should supply against a daily target
    pub fn desired_calories(&self, target_calories: f64) -> f64 {
        target_calories * self.calorie_share
    }
}

const fn item(food_id: &'static str, base_portion: f64) -> PortionRef {
    PortionRef {
        food_id,
        base_portion,
    }
}

const fn meal(name: &'static str, calorie_share: f64, items: &'static [PortionRef]) -> MealBlueprint {
    MealBlueprint {
        name,
        calorie_share,
        items,
    }
}

// ============================================================================
// Blueprint Rotations
// ============================================================================

static LOSE_WEIGHT_ROTATION: &[&[MealBlueprint]] = &[
    &[
        meal("Breakfast", 0.25, &[item("oats", 1.0), item("berries", 1.0), item("egg_whites", 1.0)]),
        meal("Snack", 0.15, &[item("almonds", 0.8), item("apple", 1.0)]),
        meal("Lunch", 0.30, &[item("chicken_breast", 1.0), item("quinoa", 0.8), item("spinach", 1.0)]),
        meal("Dinner", 0.30, &[item("salmon", 0.8), item("broccoli", 1.0), item("sweet_potato", 0.7)]),
    ],
    &[
        meal("Breakfast", 0.23, &[item("protein_pancake", 1.0), item("berries", 1.0)]),
        meal("Snack", 0.17, &[item("greek_yogurt", 1.0), item("chia_seed", 0.5)]),
        meal("Lunch", 0.30, &[item("turkey_breast", 1.0), item("brown_rice", 0.8), item("broccoli", 1.0)]),
        meal("Dinner", 0.30, &[item("lentil_soup", 1.0), item("spinach", 1.0), item("avocado", 0.5)]),
    ],
    &[
        meal("Breakfast", 0.24, &[item("oats", 0.8), item("whey_shake", 1.0), item("banana", 0.5)]),
        meal("Snack", 0.16, &[item("cottage_cheese", 1.0), item("berries", 0.5)]),
        meal("Lunch", 0.30, &[item("chickpeas", 0.8), item("quinoa", 0.8), item("spinach", 1.0)]),
        meal("Dinner", 0.30, &[item("chicken_breast", 1.0), item("sweet_potato", 0.7), item("broccoli", 1.0)]),
    ],
];

static GAIN_WEIGHT_ROTATION: &[&[MealBlueprint]] = &[
    &[
        meal("Breakfast", 0.28, &[item("protein_pancake", 1.0), item("whole_egg", 1.0), item("banana", 1.0)]),
        meal("Snack", 0.17, &[item("whey_shake", 1.0), item("almonds", 1.0)]),
        meal("Lunch", 0.28, &[item("chicken_breast", 1.0), item("brown_rice", 1.0), item("avocado", 0.5)]),
        meal("Dinner", 0.27, &[item("salmon", 1.0), item("sweet_potato", 1.0), item("olive_oil", 0.5)]),
    ],
    &[
        meal("Breakfast", 0.26, &[item("oats", 1.0), item("greek_yogurt", 1.0), item("chia_seed", 0.7)]),
        meal("Snack", 0.18, &[item("cottage_cheese", 1.0), item("berries", 1.0)]),
        meal("Lunch", 0.28, &[item("turkey_breast", 1.0), item("quinoa", 1.0), item("olive_oil", 0.4)]),
        meal("Dinner", 0.28, &[item("chickpeas", 1.0), item("sweet_potato", 1.0), item("avocado", 0.6)]),
    ],
    &[
        meal("Breakfast", 0.27, &[item("protein_pancake", 1.0), item("whey_shake", 1.0), item("berries", 0.8)]),
        meal("Snack", 0.18, &[item("almonds", 1.0), item("apple", 1.0)]),
        meal(
            "Lunch",
            0.27,
            &[item("chicken_breast", 1.0), item("brown_rice", 1.0), item("spinach", 1.0), item("olive_oil", 0.4)],
        ),
        meal("Dinner", 0.28, &[item("salmon", 1.0), item("quinoa", 1.0), item("avocado", 0.6)]),
    ],
];

static BUILD_MUSCLE_ROTATION: &[&[MealBlueprint]] = &[
    &[
        meal("Breakfast", 0.26, &[item("oats", 1.0), item("whey_shake", 1.0), item("banana", 1.0)]),
        meal("Snack", 0.16, &[item("greek_yogurt", 1.0), item("almonds", 0.8)]),
        meal("Lunch", 0.30, &[item("chicken_breast", 1.0), item("quinoa", 1.0), item("spinach", 1.0)]),
        meal("Dinner", 0.28, &[item("turkey_breast", 1.0), item("sweet_potato", 1.0), item("broccoli", 1.0)]),
    ],
    &[
        meal("Breakfast", 0.25, &[item("protein_pancake", 1.0), item("berries", 1.0)]),
        meal("Snack", 0.17, &[item("cottage_cheese", 1.0), item("chia_seed", 0.5)]),
        meal("Lunch", 0.30, &[item("salmon", 1.0), item("brown_rice", 1.0), item("broccoli", 1.0)]),
        meal("Dinner", 0.28, &[item("chickpeas", 1.0), item("quinoa", 1.0), item("spinach", 1.0)]),
    ],
    &[
        meal("Breakfast", 0.26, &[item("oats", 1.0), item("egg_whites", 1.0), item("whole_egg", 0.5)]),
        meal("Snack", 0.17, &[item("whey_shake", 1.0), item("banana", 1.0)]),
        meal("Lunch", 0.29, &[item("turkey_breast", 1.0), item("brown_rice", 1.0), item("broccoli", 1.0)]),
        meal("Dinner", 0.28, &[item("salmon", 1.0), item("sweet_potato", 1.0), item("spinach", 1.0)]),
    ],
];

/// Ordered daily blueprint sets for a goal
pub fn blueprint_rotation(goal: Goal) -> &'static [&'static [MealBlueprint]] {
    match goal {
        Goal::LoseWeight => LOSE_WEIGHT_ROTATION,
        Goal::GainWeight => GAIN_WEIGHT_ROTATION,
        Goal::BuildMuscle => BUILD_MUSCLE_ROTATION,
    }
}

/// List every blueprint food id that `table` cannot resolve
///
/// Plan generation drops such items silently; callers use this to surface
/// the problem up front. Each `(goal, food_id)` pair appears once.
pub fn missing_food_references(table: &FoodTable) -> Vec<(Goal, &'static str)> {
    let mut missing = Vec::new();

    for goal in Goal::ALL {
        for day in blueprint_rotation(goal) {
            for blueprint in day.iter() {
                for portion in blueprint.items {
                    let entry = (goal, portion.food_id);
                    if table.get(portion.food_id).is_none() && !missing.contains(&entry) {
                        missing.push(entry);
                    }
                }
            }
        }
    }

    missing
}

// ============================================================================
// Plan Generation
// ============================================================================

fn to_meal_item(food: &FoodItem, multiplier: f64) -> DietMealItem {
    DietMealItem {
        food_id: food.id.clone(),
        food_name: food.name.clone(),
        portion_text: format!("{} x {}", round_to(multiplier, 1), food.portion),
        calories: round_to(food.calories * multiplier, 0),
        protein: round_to(food.protein * multiplier, 1),
        carbs: round_to(food.carbs * multiplier, 1),
        fat: round_to(food.fat * multiplier, 1),
    }
}

/// Build one meal, scaling portions towards the blueprint's calorie share
///
/// Foods missing from `table` are dropped from the meal and excluded from
/// the scaling base.
pub(crate) fn build_meal(
    blueprint: &MealBlueprint,
    target_calories: f64,
    table: &FoodTable,
) -> DietMeal {
    let desired_calories = blueprint.desired_calories(target_calories);

    let resolved: Vec<(&FoodItem, f64)> = blueprint
        .items
        .iter()
        .filter_map(|portion| match table.get(portion.food_id) {
            Some(food) => Some((food, portion.base_portion)),
            None => {
                tracing::warn!(
                    "Meal '{}' references unknown food '{}', dropping it",
                    blueprint.name,
                    portion.food_id
                );
                None
            }
        })
        .collect();

    let base_total: f64 = resolved
        .iter()
        .map(|(food, base_portion)| food.calories * base_portion)
        .sum();

    let scale = if base_total > 0.0 {
        desired_calories / base_total
    } else {
        1.0
    };

    let items: Vec<DietMealItem> = resolved
        .iter()
        .map(|(food, base_portion)| {
            to_meal_item(food, (scale * base_portion).max(MIN_PORTION_MULTIPLIER))
        })
        .collect();

    let macro_summary = items.iter().fold(MacroTargets::default(), |acc, item| MacroTargets {
        protein_grams: acc.protein_grams + item.protein,
        carbs_grams: acc.carbs_grams + item.carbs,
        fat_grams: acc.fat_grams + item.fat,
        fiber_grams: acc.fiber_grams,
    });

    DietMeal {
        name: blueprint.name.to_string(),
        calories: items.iter().map(|item| item.calories).sum(),
        macro_summary: MacroTargets {
            protein_grams: round_to(macro_summary.protein_grams, 1),
            carbs_grams: round_to(macro_summary.carbs_grams, 1),
            fat_grams: round_to(macro_summary.fat_grams, 1),
            fiber_grams: macro_summary.fiber_grams,
        },
        items,
    }
}

/// Generate a week of meals using the built-in food table
pub fn generate_diet_plan(profile: &UserProfile, targets: &NutritionTargets) -> WeeklyDietPlan {
    generate_diet_plan_with(crate::get_default_food_table(), profile, targets)
}

/// Generate a week of meals resolving foods from `table`
///
/// Day `i` (monday = 0) uses blueprint set `i mod rotation length`, so
/// shorter rotations repeat within the week.
pub fn generate_diet_plan_with(
    table: &FoodTable,
    profile: &UserProfile,
    targets: &NutritionTargets,
) -> WeeklyDietPlan {
    let rotation = blueprint_rotation(profile.goal);

    let plan = Week::from_fn(|day| {
        let blueprints = rotation[day.index() % rotation.len()];
        let meals: Vec<DietMeal> = blueprints
            .iter()
            .map(|blueprint| build_meal(blueprint, targets.target_calories, table))
            .collect();
        let total_calories = meals.iter().map(|meal| meal.calories).sum();

        DailyDietPlan {
            day,
            total_calories,
            meals,
        }
    });

    tracing::info!(
        "Generated diet plan for {:?} at {} kcal/day",
        profile.goal,
        targets.target_calories
    );

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foods::build_default_food_table;
    use crate::nutrition::tests::{example_profile, profile};
    use crate::{calculate_summary, get_default_food_table, ActivityLevel, Sex};

    #[test]
    fn test_rotations_are_well_formed() {
        for goal in Goal::ALL {
            let rotation = blueprint_rotation(goal);
            assert!(!rotation.is_empty());
            for day in rotation {
                assert!(!day.is_empty());
                let total: f64 = day.iter().map(|b| b.calorie_share).sum();
                assert!(
                    (total - 1.0).abs() < 1e-9,
                    "{:?} blueprint shares sum to {}",
                    goal,
                    total
                );
            }
        }
    }

    #[test]
    fn test_default_table_resolves_all_blueprints() {
        let missing = missing_food_references(get_default_food_table());
        assert!(missing.is_empty(), "Unresolved foods: {:?}", missing);
    }

    #[test]
    fn test_missing_references_reported_once_per_goal() {
        let mut table = build_default_food_table();
        table.foods.remove("berries");

        let missing = missing_food_references(&table);
        assert_eq!(
            missing,
            vec![
                (Goal::LoseWeight, "berries"),
                (Goal::GainWeight, "berries"),
                (Goal::BuildMuscle, "berries"),
            ]
        );
    }

    #[test]
    fn test_desired_calories_share() {
        let lunch = LOSE_WEIGHT_ROTATION[0][2];
        assert_eq!(lunch.calorie_share, 0.30);
        assert!((lunch.desired_calories(2415.0) - 724.5).abs() < 1e-9);
    }

    #[test]
    fn test_week_has_meals_every_day() {
        for goal in Goal::ALL {
            let p = UserProfile {
                goal,
                ..example_profile()
            };
            let targets = calculate_summary(&p);
            let plan = generate_diet_plan(&p, &targets);

            assert_eq!(plan.iter().count(), 7);
            for (day, daily) in plan.iter() {
                assert_eq!(daily.day, day);
                assert!(!daily.meals.is_empty());
                assert!(daily.total_calories >= 0.0);
                let sum: f64 = daily.meals.iter().map(|m| m.calories).sum();
                assert_eq!(daily.total_calories, sum);
            }
        }
    }

    #[test]
    fn test_rotation_repeats_modulo_length() {
        let p = example_profile();
        let targets = calculate_summary(&p);
        let plan = generate_diet_plan(&p, &targets);

        // Rotation of three: monday, thursday and sunday share a blueprint set
        assert_eq!(plan.get(Weekday::Monday).meals, plan.get(Weekday::Thursday).meals);
        assert_eq!(plan.get(Weekday::Monday).meals, plan.get(Weekday::Sunday).meals);
        assert_ne!(plan.get(Weekday::Monday).meals, plan.get(Weekday::Tuesday).meals);
    }

    #[test]
    fn test_meals_approximate_their_share() {
        let p = example_profile();
        let targets = calculate_summary(&p);
        let plan = generate_diet_plan(&p, &targets);
        let rotation = blueprint_rotation(p.goal);

        for (day, daily) in plan.iter() {
            let blueprints = rotation[day.index() % rotation.len()];
            for (meal, blueprint) in daily.meals.iter().zip(blueprints.iter()) {
                let desired = blueprint.desired_calories(targets.target_calories);
                // Per-item rounding is at most half a calorie
                assert!(
                    (meal.calories - desired).abs() <= 0.5 * meal.items.len() as f64,
                    "{} on {}: {} vs desired {}",
                    meal.name,
                    day,
                    meal.calories,
                    desired
                );
            }

            let drift = (daily.total_calories - targets.target_calories).abs();
            assert!(drift / targets.target_calories < 0.01);
        }
    }

    #[test]
    fn test_scaling_preserves_macro_mix() {
        let table = get_default_food_table();
        let blueprint = LOSE_WEIGHT_ROTATION[0][2];
        let meal = build_meal(&blueprint, 2290.0, table);

        let chicken = &meal.items[0];
        assert_eq!(chicken.food_id, "chicken_breast");
        // 687 kcal over a 361 kcal base: scale ~1.903
        assert_eq!(chicken.portion_text, "1.9 x 120 g");
        assert_eq!(chicken.calories, 314.0);
        assert_eq!(chicken.protein, 60.9);
        assert_eq!(chicken.carbs, 0.0);
    }

    #[test]
    fn test_missing_food_is_dropped_silently() {
        let mut table = build_default_food_table();
        table.foods.remove("berries");

        let breakfast = LOSE_WEIGHT_ROTATION[0][0];
        let meal = build_meal(&breakfast, 2000.0, &table);

        assert_eq!(meal.items.len(), 2);
        assert!(meal.items.iter().all(|i| i.food_id != "berries"));
        // Remaining foods are rescaled against the reduced base
        assert!((meal.calories - 500.0).abs() <= 1.0);
    }

    #[test]
    fn test_meal_with_no_resolvable_foods_is_empty() {
        let table = FoodTable::default();
        let breakfast = LOSE_WEIGHT_ROTATION[0][0];
        let meal = build_meal(&breakfast, 2000.0, &table);

        assert!(meal.items.is_empty());
        assert_eq!(meal.calories, 0.0);
        assert_eq!(meal.macro_summary, MacroTargets::default());
    }

    #[test]
    fn test_zero_calorie_base_does_not_scale() {
        let table = FoodTable::from_items(vec![FoodItem {
            id: "spinach".into(),
            name: "Water Spinach".into(),
            category: FoodCategory::Produce,
            portion: "1 cup".into(),
            calories: 0.0,
            protein: 1.0,
            carbs: 1.0,
            fat: 0.0,
            tags: vec![],
        }]);
        let lunch = LOSE_WEIGHT_ROTATION[0][2];
        let meal = build_meal(&lunch, 2290.0, &table);

        assert_eq!(meal.items.len(), 1);
        assert_eq!(meal.items[0].portion_text, "1 x 1 cup");
        assert_eq!(meal.calories, 0.0);
        assert_eq!(meal.items[0].protein, 1.0);
    }

    #[test]
    fn test_portion_floor() {
        let table = get_default_food_table();
        let snack = LOSE_WEIGHT_ROTATION[1][1];
        // Tiny target forces the scale far below one
        let meal = build_meal(&snack, 100.0, table);

        assert_eq!(meal.items[0].portion_text, "0.5 x 170 g");
        assert_eq!(meal.items[0].calories, 50.0);
        assert_eq!(meal.items[1].portion_text, "0.5 x 2 tbsp");
        assert_eq!(meal.items[1].calories, 60.0);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let p = profile(Sex::Female, 35, 170.0, 65.0, 65.0, Goal::BuildMuscle, ActivityLevel::Moderate, 4);
        let targets = calculate_summary(&p);

        let first = serde_json::to_string(&generate_diet_plan(&p, &targets)).unwrap();
        let second = serde_json::to_string(&generate_diet_plan(&p, &targets)).unwrap();
        assert_eq!(first, second);
    }
}
