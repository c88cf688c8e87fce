use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "chef.toml";

/// Game constants.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Rules {
    pub reveal_size: usize,
    pub first_turn_picks: usize,
    pub picks_per_turn: usize,
    pub max_dishes: usize,
    pub dishes_per_turn: usize,
    pub max_dish_ingredients: usize,
    pub customers_per_service: usize,
    /// Payment by matched craving rank, most desired first.
    pub payouts: Vec<u32>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            reveal_size: 10,
            first_turn_picks: 3,
            picks_per_turn: 5,
            max_dishes: 10,
            dishes_per_turn: 2,
            max_dish_ingredients: 3,
            customers_per_service: 3,
            payouts: vec![5, 3, 1],
        }
    }
}

impl Rules {
    pub fn picks_for_turn(&self, turn: u32) -> usize {
        if turn <= 1 {
            self.first_turn_picks
        } else {
            self.picks_per_turn
        }
    }

    pub fn payout_for_rank(&self, rank: usize) -> u32 {
        self.payouts.get(rank).copied().unwrap_or(0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub catalog: PathBuf,
    /// Fixed seed for deck construction. Random when absent.
    pub seed: Option<u64>,
    pub deck_size: usize,
    pub customer_deck_size: usize,
    pub log_level: String,
    pub rules: Rules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from("ingredients.toml"),
            seed: None,
            deck_size: 50,
            customer_deck_size: 15,
            log_level: "warn".to_owned(),
            rules: Rules::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed config file")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads `path` if given. Otherwise loads [`DEFAULT_CONFIG_FILE`] when it
    /// exists and falls back to defaults when it doesn't.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(err) if !required && err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_owned(),
                source,
            }),
        }
    }
}
