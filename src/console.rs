//! Line-based terminal front end.

use crate::{
    config::Rules,
    customer::Customer,
    design::{DesignSession, Rejection},
    dish::Dish,
    event::{Action, Event},
    handoff::{Handoff, Pickup},
    ingredient::Ingredient,
};
use anyhow::Result;
use async_std::io::{self, prelude::*};
use tracing::debug;

const DESIGN_HELP: &str =
    "Commands: new <numbers...> [name] | del <number> | done   (e.g. `new 1 3 Stir Fry`)";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// One-based ingredient numbers and an optional name.
    New { numbers: Vec<usize>, name: String },
    Delete(usize),
    Done,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        match words.next() {
            Some("done") => Ok(Command::Done),
            Some("del") => match (words.next().map(parse_number), words.next()) {
                (Some(number), None) => Ok(Command::Delete(number?)),
                _ => Err("usage: del <number>".to_owned()),
            },
            Some("new") => {
                let words: Vec<&str> = words.collect();
                let split = words
                    .iter()
                    .position(|word| word.parse::<usize>().is_err())
                    .unwrap_or(words.len());
                let numbers = words[..split]
                    .iter()
                    .map(|word| parse_number(word))
                    .collect::<Result<Vec<_>, _>>()?;
                if numbers.is_empty() {
                    return Err("usage: new <numbers...> [name]".to_owned());
                }
                Ok(Command::New {
                    numbers,
                    name: words[split..].join(" "),
                })
            }
            Some(other) => Err(format!("unknown command `{}`", other)),
            None => Err(DESIGN_HELP.to_owned()),
        }
    }
}

fn parse_number(word: &str) -> Result<usize, String> {
    match word.parse::<usize>() {
        Ok(number) if number > 0 => Ok(number),
        _ => Err(format!("`{}` is not a number from the list", word)),
    }
}

fn numbered<T: std::fmt::Display>(items: &[T]) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("  {}) {}", i + 1, item))
        .collect()
}

fn names(ingredients: &[Ingredient]) -> String {
    let names: Vec<&str> = ingredients.iter().map(|i| i.name.as_str()).collect();
    names.join(", ")
}

pub struct Console<R, W> {
    input: R,
    output: W,
    rules: Rules,
    reveal: Vec<Ingredient>,
    drafted: Vec<Ingredient>,
    dishes: Vec<Dish>,
    session: DesignSession,
}

impl<R, W> Console<R, W>
where
    R: io::BufRead + Unpin,
    W: io::Write + Unpin,
{
    pub fn new(rules: Rules, input: R, output: W) -> Self {
        Self {
            input,
            output,
            session: DesignSession::new(rules.clone()),
            rules,
            reveal: vec![],
            drafted: vec![],
            dishes: vec![],
        }
    }

    /// Renders events and answers them until input runs out, the player
    /// quits, or the engine goes away. Hands back the output sink.
    pub async fn run(mut self, events: Pickup<Event>, actions: Handoff<Action>) -> Result<W> {
        while let Ok(event) = events.recv().await {
            let reply = match self.show(event).await? {
                Prompt::Nothing => continue,
                Prompt::Draft => self.ask_draft().await?,
                Prompt::Design => self.ask_design().await?,
                Prompt::Continue => self.ask_continue().await?,
            };
            let Some(action) = reply else {
                debug!("console input closed");
                break;
            };
            if actions.send(action).await.is_err() {
                break;
            }
        }
        self.output.flush().await?;
        Ok(self.output)
    }

    async fn show(&mut self, event: Event) -> Result<Prompt> {
        Ok(match event {
            Event::Phase { turn, phase } => {
                self.say(&format!("\n=== Turn {}: {} ===", turn, phase)).await?;
                Prompt::Nothing
            }
            Event::DraftOptions { reveal, picks } => {
                self.say(&format!("Draft an ingredient ({} picks left):", picks))
                    .await?;
                for line in numbered(&reveal) {
                    self.say(&line).await?;
                }
                self.reveal = reveal;
                Prompt::Draft
            }
            Event::IngredientDrafted { ingredient } => {
                self.say(&format!("You drafted {}.", ingredient.name)).await?;
                Prompt::Nothing
            }
            Event::DesignOptions { drafted, dishes } => {
                self.drafted = drafted;
                self.dishes = dishes;
                self.session = DesignSession::new(self.rules.clone());
                self.show_kitchen().await?;
                Prompt::Design
            }
            Event::DishCreated { dish } => {
                self.session.record_created(self.dishes.len());
                self.say(&format!("Added {} to the menu.", dish)).await?;
                self.dishes.push(dish);
                Prompt::Design
            }
            Event::DishDeleted { index, dish } => {
                if index < self.dishes.len() {
                    self.dishes.remove(index);
                }
                self.session.record_deleted(index);
                self.say(&format!("Removed {} from the menu.", dish.name))
                    .await?;
                Prompt::Design
            }
            Event::ServiceResult {
                customer,
                dish,
                payment,
                money,
                remaining,
            } => {
                self.show_customer(&customer).await?;
                let line = match dish {
                    Some(dish) => {
                        format!("  -> served {} (${}), total ${}", dish.name, payment, money)
                    }
                    None => format!("  -> nothing to serve, total ${}", money),
                };
                self.say(&line).await?;
                if remaining > 0 {
                    Prompt::Continue
                } else {
                    Prompt::Nothing
                }
            }
            Event::ServiceEnd { money } => {
                self.say(&format!("Service is over. You have ${}.", money))
                    .await?;
                Prompt::Continue
            }
        })
    }

    async fn show_kitchen(&mut self) -> Result<()> {
        let mut lines = vec![if self.drafted.is_empty() {
            "No ingredients on hand.".to_owned()
        } else {
            "Ingredients on hand:".to_owned()
        }];
        lines.extend(numbered(&self.drafted));
        if !self.dishes.is_empty() {
            lines.push("Menu:".to_owned());
            lines.extend(numbered(&self.dishes));
        }
        lines.push(DESIGN_HELP.to_owned());
        for line in lines {
            self.say(&line).await?;
        }
        Ok(())
    }

    async fn show_customer(&mut self, customer: &Customer) -> Result<()> {
        self.say(&customer.name).await?;
        for craving in &customer.cravings {
            self.say(&format!("  craves {}", names(&craving.ingredients)))
                .await?;
        }
        if let Some(refused) = &customer.constraint {
            self.say(&format!("  refuses {}", refused.name)).await?;
        }
        Ok(())
    }

    async fn ask_draft(&mut self) -> Result<Option<Action>> {
        loop {
            let Some(line) = self.read_line("Pick: ").await? else {
                return Ok(None);
            };
            match parse_number(&line) {
                Ok(number) if number <= self.reveal.len() => {
                    return Ok(Some(Action::DraftSelection { index: number - 1 }))
                }
                Ok(number) => {
                    self.say(&format!("There is no ingredient {}.", number))
                        .await?
                }
                Err(message) => self.say(&message).await?,
            }
        }
    }

    async fn ask_design(&mut self) -> Result<Option<Action>> {
        loop {
            let Some(line) = self.read_line("Design: ").await? else {
                return Ok(None);
            };
            let action = match Command::parse(&line) {
                Ok(Command::Done) => Ok(Action::FinishDesign),
                Ok(Command::Delete(number)) if number <= self.dishes.len() => {
                    Ok(Action::DeleteDish { index: number - 1 })
                }
                Ok(Command::Delete(number)) => Err(format!("There is no dish {}.", number)),
                Ok(Command::New { numbers, name }) => self.plan_dish(numbers, name),
                Err(message) => Err(message),
            };
            match action {
                Ok(action) => return Ok(Some(action)),
                Err(message) => self.say(&message).await?,
            }
        }
    }

    /// Validates locally so the engine never silently drops our request.
    fn plan_dish(&self, numbers: Vec<usize>, name: String) -> Result<Action, String> {
        let indices: Vec<usize> = numbers.iter().map(|number| number - 1).collect();
        if let Some(missing) = numbers.iter().find(|&&number| number > self.drafted.len()) {
            return Err(format!("There is no ingredient {}.", missing));
        }
        let name = if name.trim().is_empty() {
            let picked: Vec<Ingredient> =
                indices.iter().map(|&i| self.drafted[i].clone()).collect();
            Dish::default_name(&picked)
        } else {
            name
        };
        match self
            .session
            .check_create(&name, &indices, &self.drafted, self.dishes.len())
        {
            Ok(_) => Ok(Action::CreateDish { name, indices }),
            Err(Rejection::IndexOutOfRange(index)) => {
                Err(format!("There is no ingredient {}.", index + 1))
            }
            Err(Rejection::DuplicateIndex(index)) => {
                Err(format!("Ingredient {} was picked twice.", index + 1))
            }
            Err(rejection) => Err(format!("Can't make that: {}.", rejection)),
        }
    }

    async fn ask_continue(&mut self) -> Result<Option<Action>> {
        Ok(self
            .read_line("Press Enter to continue... ")
            .await?
            .map(|_| Action::Continue))
    }

    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.output.write_all(prompt.as_bytes()).await?;
        self.output.flush().await?;
        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") {
            return Ok(None);
        }
        Ok(Some(line.to_owned()))
    }

    async fn say(&mut self, text: &str) -> Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        Ok(())
    }
}

enum Prompt {
    Nothing,
    Draft,
    Design,
    Continue,
}
