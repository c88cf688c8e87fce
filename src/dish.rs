use crate::ingredient::{Ingredient, Role};
use std::{fmt, fmt::Display};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Dish {
    pub name: String,
    pub ingredients: Vec<Ingredient>,
}

impl Dish {
    pub fn new(name: impl Into<String>, ingredients: Vec<Ingredient>) -> Self {
        Self {
            name: name.into(),
            ingredients,
        }
    }

    /// Name suggested when the player doesn't give one. All-vegetable dishes
    /// become a salad named after the first vegetable.
    pub fn default_name(ingredients: &[Ingredient]) -> String {
        match ingredients {
            [] => String::new(),
            [first, ..] if ingredients.iter().all(|i| i.role == Role::Vegetable) => {
                format!("{} Salad", first.name)
            }
            [only] => only.name.clone(),
            [init @ .., last] => {
                let names: Vec<&str> = init.iter().map(|i| i.name.as_str()).collect();
                format!("{} and {}", names.join(", "), last.name)
            }
        }
    }
}

impl Display for Dish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let names: Vec<&str> = self.ingredients.iter().map(|i| i.name.as_str()).collect();
        write!(f, "{} ({})", self.name, names.join(", "))
    }
}
