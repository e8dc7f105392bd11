use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::types::author::Author;

#[derive(Debug, Serialize)]
pub struct Export {
    #[serde(rename = "ID")]
    id:         i64,
    #[serde(rename = "GUID")]
    guid:       String,
    #[serde(rename = "First name")]
    first_name: String,
    #[serde(rename = "Last name")]
    last_name:  String,
    #[serde(rename = "Birth date")]
    birth_date: String,
}

impl From<&Author> for Export {
    fn from(author: &Author) -> Self {
        Self {
            id:         author.id,
            guid:       author.guid.to_string(),
            first_name: author.first_name.clone(),
            last_name:  author.last_name.clone(),
            birth_date: author.birth_date.to_form_value(),
        }
    }
}

/// Write the displayed authors as CSV.
pub fn export(authors: &[Author], writer: impl Write) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for author in authors {
        wtr.serialize(Export::from(author))?;
    }
    wtr.flush()?;
    Ok(())
}
