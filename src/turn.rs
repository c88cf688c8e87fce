use crate::{
    design::DesignSession,
    event::{Action, Event, Phase},
    game::Game,
    ingredient::Ingredient,
    service,
};
use thiserror::Error;
use tracing::{debug, info};

/// The presentation layer hung up. Nothing else stops a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TurnError {
    #[error("presentation stopped receiving events")]
    EventsClosed,
    #[error("presentation stopped sending actions")]
    ActionsClosed,
}

/// One pass through draft, design and service.
pub struct Turn<'g> {
    pub number: u32,
    game: &'g mut Game,
}

impl<'g> Turn<'g> {
    pub fn new(number: u32, game: &'g mut Game) -> Self {
        Self { number, game }
    }

    pub async fn run(&mut self) -> Result<(), TurnError> {
        info!("starting turn {}", self.number);
        self.draft_phase().await?;
        self.design_phase().await?;
        self.service_phase().await
    }

    pub async fn draft_phase(&mut self) -> Result<(), TurnError> {
        self.announce(Phase::Draft).await?;
        let mut reveal = self.game.ingredients.draw(self.game.rules.reveal_size);
        reveal.sort_by(Ingredient::presentation_order);
        let mut picks = self.game.rules.picks_for_turn(self.number);
        debug!(revealed = reveal.len(), picks, "drafting");

        while picks > 0 && !reveal.is_empty() {
            self.emit(Event::DraftOptions {
                reveal: reveal.clone(),
                picks,
            })
            .await?;
            let index = match self.next_action().await? {
                Action::DraftSelection { index } if index < reveal.len() => index,
                action => {
                    debug!(?action, "ignoring action while drafting");
                    continue;
                }
            };
            let ingredient = reveal.remove(index);
            info!("drafted {}", ingredient);
            self.game.player.add(ingredient.clone());
            self.emit(Event::IngredientDrafted { ingredient }).await?;
            picks -= 1;
        }
        Ok(())
    }

    pub async fn design_phase(&mut self) -> Result<(), TurnError> {
        self.announce(Phase::Design).await?;
        self.emit(Event::DesignOptions {
            drafted: self.game.player.drafted.clone(),
            dishes: self.game.player.dishes.clone(),
        })
        .await?;

        let mut session = DesignSession::new(self.game.rules.clone());
        loop {
            match self.next_action().await? {
                Action::CreateDish { name, indices } => {
                    let player = &mut self.game.player;
                    match session.check_create(
                        &name,
                        &indices,
                        &player.drafted,
                        player.dishes.len(),
                    ) {
                        Ok(dish) => {
                            session.record_created(player.dishes.len());
                            player.add_dish(dish.clone());
                            info!("created {}", dish);
                            self.emit(Event::DishCreated { dish }).await?;
                        }
                        Err(rejection) => {
                            debug!(name = name.as_str(), ?indices, "dish refused: {}", rejection)
                        }
                    }
                }
                Action::DeleteDish { index } => match self.game.player.remove_dish(index) {
                    Some(dish) => {
                        session.record_deleted(index);
                        info!("deleted {}", dish);
                        self.emit(Event::DishDeleted { index, dish }).await?;
                    }
                    None => debug!(index, "no dish to delete"),
                },
                Action::FinishDesign => break,
                action => debug!(?action, "ignoring action while designing"),
            }
        }
        debug!(created = session.created_count(), "design finished");
        Ok(())
    }

    pub async fn service_phase(&mut self) -> Result<(), TurnError> {
        self.announce(Phase::Service).await?;
        let customers = self
            .game
            .customers
            .draw(self.game.rules.customers_per_service);
        let player = &self.game.player;
        let mut candidates = service::available_dishes(&player.dishes, &player.drafted);
        debug!(
            customers = customers.len(),
            available = candidates.len(),
            "opening service"
        );

        let total = customers.len();
        for (position, customer) in customers.into_iter().enumerate() {
            let (dish, payment) = match service::best_match(&customer, &candidates) {
                Some(found) => (
                    Some(candidates.remove(found.dish)),
                    self.game.rules.payout_for_rank(found.rank),
                ),
                None => (None, 0),
            };
            self.game.player.add_money(payment);
            match &dish {
                Some(dish) => info!("served {} to {} for ${}", dish.name, customer.name, payment),
                None => info!("{} left unserved", customer.name),
            }

            let remaining = total - position - 1;
            self.emit(Event::ServiceResult {
                customer,
                dish,
                payment,
                money: self.game.player.money,
                remaining,
            })
            .await?;
            if remaining > 0 {
                self.wait_for_continue().await?;
            }
        }

        self.emit(Event::ServiceEnd {
            money: self.game.player.money,
        })
        .await?;
        self.wait_for_continue().await
    }

    async fn announce(&mut self, phase: Phase) -> Result<(), TurnError> {
        debug!(turn = self.number, %phase, "phase starting");
        self.emit(Event::Phase {
            turn: self.number,
            phase,
        })
        .await
    }

    async fn emit(&mut self, event: Event) -> Result<(), TurnError> {
        self.game
            .events
            .send(event)
            .await
            .map_err(|_| TurnError::EventsClosed)
    }

    async fn next_action(&mut self) -> Result<Action, TurnError> {
        self.game
            .actions
            .recv()
            .await
            .map_err(|_| TurnError::ActionsClosed)
    }

    async fn wait_for_continue(&mut self) -> Result<(), TurnError> {
        loop {
            match self.next_action().await? {
                Action::Continue => return Ok(()),
                action => debug!(?action, "waiting to continue, ignoring"),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        config::Rules,
        customer::{Craving, Customer},
        deck::Deck,
        dish::Dish,
        game::HANDOFF_CAPACITY,
        handoff::{self, Handoff, Pickup},
        ingredient::Role,
        player::Player,
    };
    use async_std::{channel, future::timeout, task};
    use std::time::Duration;
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    fn init_tracing() {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::TRACE)
            .finish();

        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    const QUIET: Duration = Duration::from_millis(20);

    struct Table {
        game: Game,
        events: Pickup<Event>,
        actions: Handoff<Action>,
    }

    fn new_table(ingredients: Vec<Ingredient>, customers: Vec<Customer>, player: Player) -> Table {
        table_with_capacity(ingredients, customers, player, 64)
    }

    fn table_with_capacity(
        ingredients: Vec<Ingredient>,
        customers: Vec<Customer>,
        player: Player,
        capacity: usize,
    ) -> Table {
        init_tracing();
        let (event_sender, events) = handoff::bounded(capacity);
        let (actions, action_receiver) = handoff::bounded(capacity);
        let game = Game::new(
            Deck::new(ingredients),
            Deck::new(customers),
            player,
            Rules::default(),
            event_sender,
            action_receiver,
        );
        Table {
            game,
            events,
            actions,
        }
    }

    impl Table {
        fn queue(&self, actions: impl IntoIterator<Item = Action>) {
            for action in actions {
                self.actions.try_send(action).unwrap();
            }
        }

        fn drain(&self) -> Vec<Event> {
            std::iter::from_fn(|| self.events.try_recv().ok()).collect()
        }
    }

    fn numbered(count: usize, role: Role) -> Vec<Ingredient> {
        (1..=count)
            .map(|i| Ingredient::new(format!("Ing{}", i), role))
            .collect()
    }

    fn pick(index: usize) -> Action {
        Action::DraftSelection { index }
    }

    fn create(name: &str, indices: &[usize]) -> Action {
        Action::CreateDish {
            name: name.to_owned(),
            indices: indices.to_vec(),
        }
    }

    fn chicken() -> Ingredient {
        Ingredient::new("Chicken", Role::Protein)
    }
    fn rice() -> Ingredient {
        Ingredient::new("Rice", Role::Carb)
    }
    fn broccoli() -> Ingredient {
        Ingredient::new("Broccoli", Role::Vegetable)
    }

    fn drafted_events(events: &[Event]) -> Vec<Ingredient> {
        events
            .iter()
            .filter_map(|event| match event {
                Event::IngredientDrafted { ingredient } => Some(ingredient.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn five_picks_after_the_first_turn() {
        let mut table = new_table(numbered(10, Role::Protein), vec![], Player::new());
        table.queue((0..5).map(|_| pick(0)));

        task::block_on(Turn::new(2, &mut table.game).draft_phase()).unwrap();

        let events = table.drain();
        let drafted = &table.game.player.drafted;
        assert_eq!(drafted.len(), 5);
        assert_eq!(drafted, &drafted_events(&events));

        // Every pick was the front of the reveal it was made from.
        let fronts: Vec<Ingredient> = events
            .iter()
            .filter_map(|event| match event {
                Event::DraftOptions { reveal, .. } => Some(reveal[0].clone()),
                _ => None,
            })
            .collect();
        assert_eq!(drafted, &fronts);

        let names: Vec<&str> = drafted.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Ing1", "Ing10", "Ing2", "Ing3", "Ing4"]);
    }

    #[test]
    fn three_picks_on_the_first_turn() {
        let mut table = new_table(numbered(10, Role::Carb), vec![], Player::new());
        table.queue((0..5).map(|_| pick(0)));

        task::block_on(Turn::new(1, &mut table.game).draft_phase()).unwrap();

        assert_eq!(table.game.player.drafted.len(), 3);
        assert_eq!(table.actions.len(), 2);
        assert_eq!(table.game.ingredients.len(), 0);
    }

    #[test]
    fn draft_count_is_bounded_by_budget_and_reveal() {
        for turn in [1, 2] {
            for size in 0..=10 {
                let mut table = new_table(numbered(size, Role::Vegetable), vec![], Player::new());
                table.queue((0..10).map(|i| pick(i % 2)));

                task::block_on(Turn::new(turn, &mut table.game).draft_phase()).unwrap();

                let budget = if turn == 1 { 3 } else { 5 };
                let events = table.drain();
                let drafted = drafted_events(&events);
                assert_eq!(drafted.len(), budget.min(size), "turn {} size {}", turn, size);
                assert_eq!(table.game.player.drafted, drafted);
                for (i, ingredient) in drafted.iter().enumerate() {
                    assert!(numbered(size, Role::Vegetable).contains(ingredient));
                    assert!(!drafted[i + 1..].contains(ingredient));
                }
                assert!(!events
                    .iter()
                    .any(|event| matches!(event, Event::DraftOptions { picks: 0, .. })));
            }
        }
    }

    #[test]
    fn stale_and_foreign_draft_actions_are_ignored() {
        let mut table = new_table(numbered(3, Role::Protein), vec![], Player::new());
        table.queue([
            pick(5),
            Action::Continue,
            Action::FinishDesign,
            pick(2),
            pick(2),
            pick(1),
            pick(0),
        ]);

        task::block_on(Turn::new(1, &mut table.game).draft_phase()).unwrap();

        let events = table.drain();
        let options = events
            .iter()
            .filter(|event| matches!(event, Event::DraftOptions { .. }))
            .count();
        assert_eq!(options, 7);
        let names: Vec<&str> = table
            .game
            .player
            .drafted
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, ["Ing3", "Ing2", "Ing1"]);
    }

    fn designing_player() -> Player {
        let mut player = Player::new();
        player.drafted = vec![chicken(), rice(), broccoli()];
        player
    }

    #[test]
    fn deleting_a_new_dish_frees_a_creation_slot() {
        let mut table = new_table(vec![], vec![], designing_player());
        table.queue([
            create("A", &[0]),
            create("B", &[1]),
            create("C", &[2]),
            Action::DeleteDish { index: 1 },
            create("D", &[2]),
            Action::FinishDesign,
        ]);

        task::block_on(Turn::new(1, &mut table.game).design_phase()).unwrap();

        let a = Dish::new("A", vec![chicken()]);
        let b = Dish::new("B", vec![rice()]);
        let d = Dish::new("D", vec![broccoli()]);
        assert_eq!(
            table.drain(),
            vec![
                Event::Phase {
                    turn: 1,
                    phase: Phase::Design
                },
                Event::DesignOptions {
                    drafted: designing_player().drafted,
                    dishes: vec![],
                },
                Event::DishCreated { dish: a.clone() },
                Event::DishCreated { dish: b.clone() },
                Event::DishDeleted { index: 1, dish: b },
                Event::DishCreated { dish: d.clone() },
            ]
        );
        assert_eq!(table.game.player.dishes, vec![a, d]);
    }

    #[test]
    fn deleting_an_old_dish_keeps_the_cap() {
        let mut player = designing_player();
        player.dishes = vec![Dish::new("Old", vec![rice()])];
        let mut table = new_table(vec![], vec![], player);
        table.queue([
            create("A", &[0]),
            create("B", &[1]),
            Action::DeleteDish { index: 0 },
            create("C", &[2]),
            Action::FinishDesign,
        ]);

        task::block_on(Turn::new(3, &mut table.game).design_phase()).unwrap();

        let names: Vec<&str> = table
            .game
            .player
            .dishes
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn two_dishes_per_design_phase() {
        let mut table = new_table(vec![], vec![], designing_player());
        for turn in 1..=3 {
            table.queue([
                create("A", &[0]),
                create("B", &[1]),
                create("C", &[2]),
                Action::FinishDesign,
            ]);
            task::block_on(Turn::new(turn, &mut table.game).design_phase()).unwrap();

            let created = table
                .drain()
                .into_iter()
                .filter(|event| matches!(event, Event::DishCreated { .. }))
                .count();
            assert_eq!(created, 2);
        }
        assert_eq!(table.game.player.dishes.len(), 6);
    }

    #[test]
    fn menu_never_exceeds_ten_dishes() {
        let mut player = designing_player();
        player.dishes = (0..9)
            .map(|i| Dish::new(format!("Dish {}", i), vec![rice()]))
            .collect();
        let mut table = new_table(vec![], vec![], player);
        table.queue([
            create("Tenth", &[0]),
            create("Eleventh", &[1]),
            Action::FinishDesign,
        ]);

        task::block_on(Turn::new(4, &mut table.game).design_phase()).unwrap();

        assert_eq!(table.game.player.dishes.len(), 10);
        assert_eq!(table.game.player.dishes[9].name, "Tenth");
    }

    #[test]
    fn malformed_design_actions_change_nothing() {
        let mut table = new_table(vec![], vec![], designing_player());
        table.queue([
            create("", &[0]),
            create("Twice", &[1, 1]),
            create("Missing", &[3]),
            create("Nothing", &[]),
            create("Crowded", &[0, 1, 2, 0]),
            Action::DeleteDish { index: 0 },
            pick(0),
            Action::Continue,
            Action::FinishDesign,
        ]);

        task::block_on(Turn::new(1, &mut table.game).design_phase()).unwrap();

        assert_eq!(table.drain().len(), 2);
        assert!(table.game.player.dishes.is_empty());
        assert_eq!(table.game.player.drafted, designing_player().drafted);
    }

    #[test]
    fn finish_without_dishes_ends_design() {
        let mut table = new_table(vec![], vec![], designing_player());
        table.queue([Action::FinishDesign, create("Late", &[0])]);

        task::block_on(Turn::new(1, &mut table.game).design_phase()).unwrap();

        assert!(table.game.player.dishes.is_empty());
        assert_eq!(table.actions.len(), 1);
    }

    fn service_results(events: &[Event]) -> Vec<(Option<String>, u32, u32)> {
        events
            .iter()
            .filter_map(|event| match event {
                Event::ServiceResult {
                    dish,
                    payment,
                    money,
                    ..
                } => Some((dish.as_ref().map(|d| d.name.clone()), *payment, *money)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn most_desired_match_pays_five() {
        let mut player = designing_player();
        player.dishes = vec![
            Dish::new("Greens", vec![broccoli()]),
            Dish::new("Chicken Rice", vec![chicken(), rice()]),
        ];
        let customer = Customer::new(
            "Alice",
            vec![
                Craving::new(vec![chicken(), rice()]),
                Craving::new(vec![broccoli()]),
            ],
        );
        let mut table = new_table(vec![], vec![customer], player);
        table.queue([Action::Continue]);

        task::block_on(Turn::new(1, &mut table.game).service_phase()).unwrap();

        let events = table.drain();
        assert_eq!(
            service_results(&events),
            vec![(Some("Chicken Rice".to_owned()), 5, 5)]
        );
        assert_eq!(events.last(), Some(&Event::ServiceEnd { money: 5 }));
        assert_eq!(table.game.player.money, 5);
    }

    #[test]
    fn refused_ingredient_is_never_served() {
        let mut player = designing_player();
        player.money = 7;
        player.dishes = vec![
            Dish::new("Chicken Rice", vec![chicken(), rice()]),
            Dish::new("Greens", vec![broccoli()]),
        ];
        let customer =
            Customer::new("Bruno", vec![Craving::new(vec![chicken(), rice()])]).refusing(rice());
        let mut table = new_table(vec![], vec![customer], player);
        table.queue([Action::Continue]);

        task::block_on(Turn::new(1, &mut table.game).service_phase()).unwrap();

        assert_eq!(service_results(&table.drain()), vec![(None, 0, 7)]);
        assert_eq!(table.game.player.money, 7);
    }

    #[test]
    fn each_dish_serves_one_customer() {
        let mut player = designing_player();
        player.dishes = vec![
            Dish::new("Plain Rice", vec![rice()]),
            Dish::new("Fried Rice", vec![rice(), broccoli()]),
        ];
        let wants_rice = || Customer::new("Guest", vec![Craving::new(vec![rice()])]);
        let customers = vec![wants_rice(), wants_rice(), wants_rice()];
        let mut table = new_table(vec![], customers, player);
        table.queue([Action::Continue, Action::Continue, Action::Continue]);

        task::block_on(Turn::new(2, &mut table.game).service_phase()).unwrap();

        assert_eq!(
            service_results(&table.drain()),
            vec![
                (Some("Plain Rice".to_owned()), 5, 5),
                (Some("Fried Rice".to_owned()), 5, 10),
                (None, 0, 10),
            ]
        );
        assert_eq!(table.game.player.dishes.len(), 2);
    }

    #[test]
    fn dishes_need_this_turns_ingredients() {
        let mut player = Player::new();
        player.drafted = vec![rice()];
        player.dishes = vec![Dish::new("Chicken Rice", vec![chicken(), rice()])];
        let customer = Customer::new("Chiara", vec![Craving::new(vec![chicken()])]);
        let mut table = new_table(vec![], vec![customer], player);
        table.queue([Action::Continue]);

        task::block_on(Turn::new(2, &mut table.game).service_phase()).unwrap();

        assert_eq!(service_results(&table.drain()), vec![(None, 0, 0)]);
    }

    #[test]
    fn service_waits_for_continue_between_customers() {
        let mut player = designing_player();
        player.dishes = vec![Dish::new("Chicken", vec![chicken()])];
        let customers = vec![
            Customer::new("First", vec![Craving::new(vec![rice()])]),
            Customer::new("Second", vec![Craving::new(vec![chicken()])]),
        ];
        let Table {
            mut game,
            events,
            actions,
        } = table_with_capacity(vec![], customers, player, HANDOFF_CAPACITY);
        let (done_sender, done) = channel::bounded(1);

        let service = task::spawn(async move {
            let result = Turn::new(1, &mut game).service_phase().await;
            let _ = done_sender.send(()).await;
            (game, result)
        });

        task::block_on(async {
            assert!(matches!(events.recv().await, Ok(Event::Phase { .. })));
            assert!(matches!(
                events.recv().await,
                Ok(Event::ServiceResult { remaining: 1, .. })
            ));
            assert!(timeout(QUIET, events.recv()).await.is_err());

            actions.send(pick(0)).await.unwrap();
            assert!(timeout(QUIET, events.recv()).await.is_err());

            actions.send(Action::Continue).await.unwrap();
            assert!(matches!(
                events.recv().await,
                Ok(Event::ServiceResult { remaining: 0, .. })
            ));
            assert!(matches!(
                events.recv().await,
                Ok(Event::ServiceEnd { money: 5 })
            ));
            assert!(timeout(QUIET, done.recv()).await.is_err());

            actions.send(Action::Continue).await.unwrap();
            let (game, result) = service.await;
            assert_eq!(result, Ok(()));
            assert_eq!(game.player.money, 5);
            assert!(timeout(QUIET, events.recv()).await.is_err());
        });
    }

    #[test]
    fn empty_service_still_waits_once() {
        let mut table = new_table(vec![], vec![], designing_player());
        table.queue([Action::Continue]);

        task::block_on(Turn::new(1, &mut table.game).service_phase()).unwrap();

        assert_eq!(
            table.drain(),
            vec![
                Event::Phase {
                    turn: 1,
                    phase: Phase::Service
                },
                Event::ServiceEnd { money: 0 },
            ]
        );
        assert!(table.actions.is_empty());
    }

    #[test]
    fn phase_announcement_waits_for_the_presentation() {
        let Table {
            mut game,
            events,
            actions: _actions,
        } = table_with_capacity(
            numbered(3, Role::Carb),
            vec![],
            Player::new(),
            HANDOFF_CAPACITY,
        );
        let (done_sender, done) = channel::bounded(1);

        let announcing = task::spawn(async move {
            let result = Turn::new(1, &mut game).announce(Phase::Draft).await;
            let _ = done_sender.send(()).await;
            result
        });

        task::block_on(async {
            assert!(timeout(QUIET, done.recv()).await.is_err());
            assert_eq!(
                events.recv().await,
                Ok(Event::Phase {
                    turn: 1,
                    phase: Phase::Draft
                })
            );
            assert_eq!(announcing.await, Ok(()));
            assert!(done.recv().await.is_ok());
        });
    }

    #[test]
    fn hang_up_ends_the_turn() {
        let mut table = new_table(numbered(10, Role::Protein), vec![], Player::new());
        table.queue([pick(0)]);
        table.actions.close();

        let result = task::block_on(Turn::new(1, &mut table.game).run());

        assert_eq!(result, Err(TurnError::ActionsClosed));
        assert_eq!(table.game.player.drafted.len(), 1);
    }
}
