use crate::{config::Rules, dish::Dish, ingredient::Ingredient};
use thiserror::Error;

/// Why a create-dish request was refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("the dish needs a name")]
    EmptyName,
    #[error("only {0} dishes can be created per turn")]
    TurnLimit(usize),
    #[error("the menu already holds {0} dishes")]
    MenuFull(usize),
    #[error("there is no ingredient {0}")]
    IndexOutOfRange(usize),
    #[error("ingredient {0} was picked twice")]
    DuplicateIndex(usize),
    #[error("a dish needs at least one ingredient")]
    NoIngredients,
    #[error("a dish holds at most {0} ingredients")]
    TooManyIngredients(usize),
}

/// Creation bookkeeping for one design phase.
///
/// Remembers which menu positions were filled during this phase so that
/// deleting one of them frees a creation slot again.
#[derive(Clone, Debug)]
pub struct DesignSession {
    rules: Rules,
    created: Vec<usize>,
}

impl DesignSession {
    pub fn new(rules: Rules) -> Self {
        Self {
            rules,
            created: vec![],
        }
    }

    pub fn created_count(&self) -> usize {
        self.created.len()
    }

    /// Checks a create-dish request against the ingredients on hand and the
    /// current menu size, returning the dish it would produce.
    pub fn check_create(
        &self,
        name: &str,
        indices: &[usize],
        drafted: &[Ingredient],
        menu_size: usize,
    ) -> Result<Dish, Rejection> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Rejection::EmptyName);
        }
        if self.created.len() >= self.rules.dishes_per_turn {
            return Err(Rejection::TurnLimit(self.rules.dishes_per_turn));
        }
        if menu_size >= self.rules.max_dishes {
            return Err(Rejection::MenuFull(self.rules.max_dishes));
        }
        let mut ingredients = Vec::with_capacity(indices.len());
        for (position, &index) in indices.iter().enumerate() {
            let ingredient = drafted
                .get(index)
                .ok_or(Rejection::IndexOutOfRange(index))?;
            if indices[..position].contains(&index) {
                return Err(Rejection::DuplicateIndex(index));
            }
            ingredients.push(ingredient.clone());
        }
        if ingredients.is_empty() {
            return Err(Rejection::NoIngredients);
        }
        if ingredients.len() > self.rules.max_dish_ingredients {
            return Err(Rejection::TooManyIngredients(
                self.rules.max_dish_ingredients,
            ));
        }
        Ok(Dish::new(name, ingredients))
    }

    pub fn record_created(&mut self, menu_index: usize) {
        self.created.push(menu_index);
    }

    /// Keeps tracked positions aligned with the menu after a removal.
    pub fn record_deleted(&mut self, menu_index: usize) {
        self.created.retain(|&created| created != menu_index);
        for created in self.created.iter_mut() {
            if *created > menu_index {
                *created -= 1;
            }
        }
    }
}
