//! Messages exchanged between the turn engine and a presentation layer.
//!
//! Events flow from the engine to the presentation, actions flow back. Nothing
//! else is shared between the two.

use crate::{customer::Customer, dish::Dish, ingredient::Ingredient};
use std::{fmt, fmt::Display};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Draft,
    Design,
    Service,
}

impl Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Phase::Draft => "Draft",
                Phase::Design => "Design",
                Phase::Service => "Service",
            }
        )
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Event {
    /// A phase of the given turn begins.
    Phase { turn: u32, phase: Phase },
    /// The ingredients still up for drafting and how many picks remain.
    DraftOptions {
        reveal: Vec<Ingredient>,
        picks: usize,
    },
    IngredientDrafted { ingredient: Ingredient },
    /// Ingredients on hand, addressed by index for the whole design phase.
    DesignOptions {
        drafted: Vec<Ingredient>,
        dishes: Vec<Dish>,
    },
    DishCreated { dish: Dish },
    DishDeleted { index: usize, dish: Dish },
    /// `dish` is `None` when nothing available satisfied the customer.
    ServiceResult {
        customer: Customer,
        dish: Option<Dish>,
        payment: u32,
        money: u32,
        /// Customers still waiting after this one.
        remaining: usize,
    },
    ServiceEnd { money: u32 },
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Action {
    /// Index into the most recent draft reveal.
    DraftSelection { index: usize },
    /// Indices into the drafted ingredients of the current design phase.
    CreateDish { name: String, indices: Vec<usize> },
    DeleteDish { index: usize },
    FinishDesign,
    Continue,
}
