use crate::{
    config::Rules,
    customer::Customer,
    deck::Deck,
    event::{Action, Event},
    handoff::{Handoff, Pickup},
    ingredient::Ingredient,
    player::Player,
    turn::{Turn, TurnError},
};
use tracing::info;

/// Queue capacity between the engine and the presentation. Nothing is
/// buffered: each event is taken before the engine moves on.
pub const HANDOFF_CAPACITY: usize = 0;

pub struct Game {
    pub ingredients: Deck<Ingredient>,
    pub customers: Deck<Customer>,
    pub player: Player,
    pub rules: Rules,
    pub(crate) events: Handoff<Event>,
    pub(crate) actions: Pickup<Action>,
    turns_played: u32,
}

impl Game {
    pub fn new(
        ingredients: Deck<Ingredient>,
        customers: Deck<Customer>,
        player: Player,
        rules: Rules,
        events: Handoff<Event>,
        actions: Pickup<Action>,
    ) -> Self {
        Self {
            ingredients,
            customers,
            player,
            rules,
            events,
            actions,
            turns_played: 0,
        }
    }

    pub fn turns_played(&self) -> u32 {
        self.turns_played
    }

    /// Plays turns until the presentation hangs up, which is the only way
    /// this returns.
    pub async fn play(&mut self) -> Result<(), TurnError> {
        loop {
            let number = self.turns_played + 1;
            Turn::new(number, self).run().await?;
            self.player.reset_turn();
            self.turns_played = number;
            info!(
                money = self.player.money,
                dishes = self.player.dishes.len(),
                "turn {} complete",
                number
            );
        }
    }
}
