use rand::{seq::SliceRandom, Rng};
use std::collections::VecDeque;

/// An ordered pile of cards drawn from the front.
#[derive(Clone, Debug)]
pub struct Deck<T> {
    cards: VecDeque<T>,
}

impl<T> Deck<T> {
    pub fn new(cards: Vec<T>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    /// Removes up to `n` cards from the front. A short deck hands out what it has.
    pub fn draw(&mut self, n: usize) -> Vec<T> {
        let n = n.min(self.cards.len());
        self.cards.drain(..n).collect()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl<T: Clone> Deck<T> {
    /// Builds a shuffled deck of `size` cards picked from `pool` with replacement.
    pub fn sample(rng: &mut impl Rng, pool: &[T], size: usize) -> Self {
        let mut cards: Vec<T> = (0..size)
            .filter_map(|_| pool.choose(rng).cloned())
            .collect();
        cards.shuffle(rng);
        Self::new(cards)
    }
}
