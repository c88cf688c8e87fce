use crate::{dish::Dish, ingredient::Ingredient};

#[derive(Clone, Debug, Default)]
pub struct Player {
    /// Ingredients on hand this turn. Cleared wholesale at turn end.
    pub drafted: Vec<Ingredient>,
    pub dishes: Vec<Dish>,
    pub money: u32,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, ingredient: Ingredient) {
        self.drafted.push(ingredient);
    }

    pub fn add_dish(&mut self, dish: Dish) {
        self.dishes.push(dish);
    }

    pub fn remove_dish(&mut self, index: usize) -> Option<Dish> {
        (index < self.dishes.len()).then(|| self.dishes.remove(index))
    }

    pub fn add_money(&mut self, amount: u32) {
        self.money = self.money.saturating_add(amount);
    }

    pub fn reset_turn(&mut self) {
        self.drafted.clear();
    }
}
