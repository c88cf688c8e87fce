use crate::{deck::Deck, ingredient::Ingredient};
use rand::{seq::SliceRandom, Rng};

static NAMES: [&str; 16] = [
    "Alice", "Bruno", "Chiara", "Dmitri", "Esther", "Farid", "Greta", "Hiro", "Ines", "Jonas",
    "Keiko", "Luca", "Mira", "Nadia", "Oskar", "Priya",
];

pub const MAX_CRAVINGS: usize = 3;
pub const MAX_CRAVING_SIZE: usize = 3;

/// One combination of ingredients a customer would accept.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Craving {
    pub ingredients: Vec<Ingredient>,
}

impl Craving {
    pub fn new(ingredients: Vec<Ingredient>) -> Self {
        Self { ingredients }
    }

    /// Random craving of distinct ingredients from `pool`. Duplicates in the
    /// pool count once.
    pub fn random(rng: &mut impl Rng, pool: &[Ingredient]) -> Self {
        let distinct = distinct(pool);
        if distinct.is_empty() {
            return Self::new(vec![]);
        }
        let size = rng.gen_range(1..=distinct.len().min(MAX_CRAVING_SIZE));
        Self::new(distinct.choose_multiple(rng, size).cloned().collect())
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Customer {
    pub name: String,
    /// Most desired first.
    pub cravings: Vec<Craving>,
    pub constraint: Option<Ingredient>,
}

impl Customer {
    pub fn new(name: impl Into<String>, cravings: Vec<Craving>) -> Self {
        Self {
            name: name.into(),
            cravings,
            constraint: None,
        }
    }

    pub fn refusing(mut self, ingredient: Ingredient) -> Self {
        self.constraint = Some(ingredient);
        self
    }

    pub fn refuses(&self, ingredient: &Ingredient) -> bool {
        self.constraint.as_ref() == Some(ingredient)
    }

    pub fn random(rng: &mut impl Rng, pool: &[Ingredient]) -> Self {
        let name = NAMES.choose(rng).copied().unwrap_or("Guest");
        let cravings = (0..rng.gen_range(1..=MAX_CRAVINGS))
            .map(|_| Craving::random(rng, pool))
            .collect::<Vec<_>>();
        let customer = Self::new(name, cravings);

        // A third of the customers refuse something they don't crave.
        if !rng.gen_ratio(1, 3) {
            return customer;
        }
        let craved = |ingredient: &&Ingredient| {
            customer
                .cravings
                .iter()
                .any(|craving| craving.ingredients.contains(*ingredient))
        };
        let refusable: Vec<&Ingredient> = pool.iter().filter(|i| !craved(i)).collect();
        match refusable.choose(rng) {
            Some(ingredient) => {
                let ingredient = (*ingredient).clone();
                customer.refusing(ingredient)
            }
            None => customer,
        }
    }
}

/// Builds a deck of `size` freshly generated customers.
pub fn deck(rng: &mut impl Rng, pool: &[Ingredient], size: usize) -> Deck<Customer> {
    Deck::new((0..size).map(|_| Customer::random(rng, pool)).collect())
}

fn distinct(pool: &[Ingredient]) -> Vec<Ingredient> {
    let mut distinct: Vec<Ingredient> = Vec::with_capacity(pool.len());
    for ingredient in pool {
        if !distinct.contains(ingredient) {
            distinct.push(ingredient.clone());
        }
    }
    distinct
}
