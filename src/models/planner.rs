//! Meal planner model. Plans live in memory only and are never persisted.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Recipe;

/// A meal slot in the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealSlot {
    pub const ALL: [MealSlot; 3] = [MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::Lunch => "Lunch",
            MealSlot::Dinner => "Dinner",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MealSlot::ALL
            .into_iter()
            .find(|slot| slot.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown meal slot: {}", s))
    }
}

/// Recipes assigned to each meal slot, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    slots: BTreeMap<MealSlot, Vec<Recipe>>,
}

impl MealPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a recipe to a slot. The same recipe may be planned more than once.
    pub fn add(&mut self, slot: MealSlot, recipe: Recipe) {
        self.slots.entry(slot).or_default().push(recipe);
    }

    /// Drop every entry for `recipe_id` from the slot. Returns how many were removed.
    pub fn remove(&mut self, slot: MealSlot, recipe_id: &str) -> usize {
        let Some(recipes) = self.slots.get_mut(&slot) else {
            return 0;
        };
        let before = recipes.len();
        recipes.retain(|r| r.id != recipe_id);
        let removed = before - recipes.len();
        if recipes.is_empty() {
            self.slots.remove(&slot);
        }
        removed
    }

    pub fn recipes(&self, slot: MealSlot) -> &[Recipe] {
        self.slots.get(&slot).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.slots.values().all(Vec::is_empty)
    }
}
