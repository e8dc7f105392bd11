use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    config::{Config, Styleable},
    traits::DisplayTerminal,
    types::{birth_date::BirthDate, guid::Guid},
};

/// An author as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(rename = "autorLibroId")]
    pub id:         i64,
    #[serde(rename = "autorLibroGuid")]
    pub guid:       Guid,
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name:  String,
    #[serde(rename = "fechaNacimiento")]
    pub birth_date: BirthDate,
}

/// Body of `POST /api/Autor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAuthor {
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name:  String,
    #[serde(rename = "fechaNacimiento")]
    pub birth_date: BirthDate,
}

/// Body of `PUT /api/Autor/{guid}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorUpdate {
    #[serde(rename = "autorLibroGuid")]
    pub guid:       Guid,
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name:  String,
    #[serde(rename = "fechaNacimiento")]
    pub birth_date: BirthDate,
}

/// The search endpoint answers with either a single author or a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorList {
    Many(Vec<Author>),
    One(Author),
}

impl AuthorList {
    /// Picks the shape from the JSON itself, so a bad field is reported with its path.
    pub fn from_value(value: Value) -> Result<Self, serde_path_to_error::Error<serde_json::Error>> {
        if value.is_array() {
            serde_path_to_error::deserialize(value).map(AuthorList::Many)
        } else {
            serde_path_to_error::deserialize(value).map(AuthorList::One)
        }
    }

    pub fn into_vec(self) -> Vec<Author> {
        match self {
            AuthorList::Many(authors) => authors,
            AuthorList::One(author) => vec![author],
        }
    }
}

impl Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {} ({}) ({})",
            self.last_name, self.first_name, self.birth_date, self.guid
        )
    }
}

impl DisplayTerminal for Author {
    fn fmt_terminal(&self, config: &Config) -> String {
        format!(
            "{}, {} {}",
            self.last_name,
            self.first_name,
            format!("({})", self.guid).style(&config.style_dimmed)
        )
    }
}
