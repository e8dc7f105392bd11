use anyhow::{bail, Result};
use autores::{
    manager::AuthorForm,
    traits::Confirm,
    types::{author::Author, birth_date::BirthDate, guid::Guid, text::ValidatorNonEmpty},
};
use chrono::{Local, NaiveDate};
use tracing::warn;

/// Asks on the terminal; any prompt failure counts as "no".
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    async fn confirm(&self, message: &str) -> bool {
        match inquire::Confirm::new(message).with_default(false).prompt() {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Confirmation failed: {e}");
                false
            }
        }
    }
}

/// For `delete --yes`.
pub struct AssumeYes;

impl Confirm for AssumeYes {
    async fn confirm(&self, _message: &str) -> bool {
        true
    }
}

fn text(message: &str, initial_value: &str, required: bool) -> Result<String> {
    let mut prompt = inquire::Text::new(message).with_initial_value(initial_value);
    if required {
        prompt = prompt.with_validator(ValidatorNonEmpty {});
    }
    Ok(prompt.prompt()?)
}

fn date(message: &str, initial_value: &str, max: Option<NaiveDate>) -> Result<String> {
    let starting = BirthDate::parse_form(initial_value)
        .map(|x| x.date())
        .unwrap_or_else(|_| Local::now().date_naive());
    let mut prompt = inquire::DateSelect::new(message).with_starting_date(starting);
    if let Some(max) = max {
        prompt = prompt.with_max_date(max);
    }
    Ok(BirthDate(prompt.prompt()?).to_form_value())
}

/// Prompt for every field not already filled, keeping current values as defaults.
pub fn fill_missing(form: &mut AuthorForm, validation: bool) -> Result<()> {
    if form.first_name.is_empty() {
        form.first_name = text("First name:", "", validation)?;
    }
    if form.last_name.is_empty() {
        form.last_name = text("Last name:", "", validation)?;
    }
    if form.birth_date.is_empty() {
        form.birth_date = date("Birth date:", "", max_date(validation))?;
    }
    Ok(())
}

/// Prompt for every field with the current value as the initial value.
pub fn edit_all(form: &mut AuthorForm, validation: bool) -> Result<()> {
    form.first_name = text("First name:", &form.first_name, validation)?;
    form.last_name = text("Last name:", &form.last_name, validation)?;
    form.birth_date = date("Birth date:", &form.birth_date, max_date(validation))?;
    Ok(())
}

fn max_date(validation: bool) -> Option<NaiveDate> {
    validation.then(|| Local::now().date_naive())
}

pub fn search_text(initial_value: &str) -> Result<String> {
    Ok(inquire::Text::new("Search by name:")
        .with_initial_value(initial_value)
        .prompt()?)
}

pub fn pick_author(authors: &[Author], message: &str) -> Result<Guid> {
    if authors.is_empty() {
        bail!("No authors to choose from");
    }
    Ok(inquire::Select::new(message, authors.to_vec()).prompt()?.guid)
}
