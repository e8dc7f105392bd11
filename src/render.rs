use crate::{
    config::{Config, Styleable},
    manager::AuthorForm,
    traits::DisplayTerminal,
    types::author::Author,
};

const HEADERS: [&str; 5] = ["ID", "First name", "Last name", "Born", "GUID"];

/// Plain cells of the author table, one array per author.
pub fn table_rows(authors: &[Author], config: &Config) -> Vec<[String; 5]> {
    let locale = config.locale();
    authors
        .iter()
        .map(|x| {
            [
                x.id.to_string(),
                x.first_name.clone(),
                x.last_name.clone(),
                x.birth_date.format_localized(&config.date_format, locale),
                x.guid.to_string(),
            ]
        })
        .collect()
}

fn pad(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell}{}", " ".repeat(width - cell.chars().count())))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// The author table with a header and alternating row styles.
pub fn author_table(authors: &[Author], config: &Config) -> String {
    if authors.is_empty() {
        return "No authors to display.".style(&config.style_dimmed);
    }
    let rows = table_rows(authors, config);
    let header = HEADERS.map(String::from);
    let mut widths = header.clone().map(|x| x.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = vec![pad(&header, &widths).style(&config.style_header)];
    for (i, row) in rows.iter().enumerate() {
        let style = if i % 2 == 0 {
            &config.style_even
        } else {
            &config.style_odd
        };
        lines.push(pad(row, &widths).style(style));
    }
    lines.join("\n")
}

pub fn inline_error(message: &str, config: &Config) -> String {
    message.style(&config.style_error)
}

impl DisplayTerminal for AuthorForm {
    fn fmt_terminal(&self, config: &Config) -> String {
        let mode = match &self.selected {
            Some(guid) => format!("Editing {guid}").style(&config.style_edit),
            None => "Creating".style(&config.style_create),
        };
        let field = |s: &str| {
            if s.is_empty() {
                "-".style(&config.style_dimmed)
            } else {
                s.to_string()
            }
        };
        format!(
            "{mode}\n  First name: {}\n  Last name:  {}\n  Born:       {}",
            field(&self.first_name),
            field(&self.last_name),
            field(&self.birth_date)
        )
    }
}
