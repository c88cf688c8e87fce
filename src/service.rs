use crate::{
    customer::{Craving, Customer},
    dish::Dish,
    ingredient::Ingredient,
};

/// True when every needed ingredient is on hand.
pub fn has_ingredients(have: &[Ingredient], needed: &[Ingredient]) -> bool {
    needed.iter().all(|ingredient| have.contains(ingredient))
}

/// Dishes that can be cooked from what was drafted this turn, in menu order.
pub fn available_dishes(dishes: &[Dish], drafted: &[Ingredient]) -> Vec<Dish> {
    dishes
        .iter()
        .filter(|dish| has_ingredients(drafted, &dish.ingredients))
        .cloned()
        .collect()
}

/// Number of ingredients the dish shares with the craving.
pub fn match_score(dish: &Dish, craving: &Craving) -> usize {
    dish.ingredients
        .iter()
        .filter(|ingredient| craving.ingredients.contains(*ingredient))
        .count()
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Match {
    /// Position of the chosen dish among the candidates.
    pub dish: usize,
    /// Rank of the craving the dish satisfies best.
    pub rank: usize,
    pub score: usize,
}

/// Picks the candidate sharing the most ingredients with any of the
/// customer's cravings. Dishes holding the customer's refused ingredient are
/// skipped. Ties keep the earlier dish and, within a dish, the earlier
/// craving. Returns `None` when nothing scores above zero.
pub fn best_match(customer: &Customer, candidates: &[Dish]) -> Option<Match> {
    let mut best: Option<Match> = None;
    for (dish_index, dish) in candidates.iter().enumerate() {
        if dish.ingredients.iter().any(|ingredient| customer.refuses(ingredient)) {
            continue;
        }

        let mut dish_best: Option<Match> = None;
        for (rank, craving) in customer.cravings.iter().enumerate() {
            let score = match_score(dish, craving);
            if score > dish_best.map_or(0, |m| m.score) {
                dish_best = Some(Match {
                    dish: dish_index,
                    rank,
                    score,
                });
            }
        }

        if let Some(candidate) = dish_best {
            if candidate.score > best.map_or(0, |m| m.score) {
                best = Some(candidate);
            }
        }
    }
    best
}
