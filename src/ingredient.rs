use serde::Deserialize;
use std::{
    fmt::{self, Display},
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// The part an ingredient plays in a dish. Declaration order is the order
/// ingredients are presented in during the draft.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Deserialize)]
pub enum Role {
    Protein,
    Vegetable,
    Carb,
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Role::Protein => "Protein",
                Role::Vegetable => "Vegetable",
                Role::Carb => "Carb",
            }
        )
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub role: Role,
}

impl Ingredient {
    #[cfg(test)]
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }

    /// Ordering used for the draft reveal: by role, then by name.
    pub fn presentation_order(&self, other: &Self) -> std::cmp::Ordering {
        self.role
            .cmp(&other.role)
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.role)
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read ingredient catalog {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed ingredient catalog")]
    Parse(#[from] toml::de::Error),
    #[error("ingredient catalog contains no ingredients")]
    Empty,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(rename = "ingredient", default)]
    ingredients: Vec<Ingredient>,
}

pub fn parse_catalog(text: &str) -> Result<Vec<Ingredient>, CatalogError> {
    let file: CatalogFile = toml::from_str(text)?;
    if file.ingredients.is_empty() {
        return Err(CatalogError::Empty);
    }
    Ok(file.ingredients)
}

pub fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<Ingredient>, CatalogError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_owned(),
        source,
    })?;
    parse_catalog(&text)
}
