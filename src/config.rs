use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::format::{Item, StrftimeItems};
use crossterm::style::Stylize;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{default_colors::*, manager::Features};

pub const DEFAULT_BASE_URL: &str = "https://autoreslibro.onrender.com";
const USER_CONFIG: &str = "~/.config/autores/config.toml";
const DEFAULT_LOCALE: chrono::Locale = chrono::Locale::es_MX;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    bold:   bool,
    italic: bool,
    color:  crossterm::style::Color,
}

impl StyleConfig {
    fn style(&self, s: impl ToString) -> String {
        let mut s = s.to_string().with(self.color);
        if self.bold {
            s = s.bold();
        }
        if self.italic {
            s = s.italic();
        }
        s.to_string()
    }
}

pub trait Styleable {
    fn style(&self, c: &StyleConfig) -> String;
}

impl<T> Styleable for T
where
    T: ToString + std::fmt::Display,
{
    fn style(&self, c: &StyleConfig) -> String {
        c.style(self)
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            color:  COLOR_WHITE,
            bold:   false,
            italic: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Origin of the author API, without the `/api/Autor` path.
    pub base_url:     String,
    /// Reject empty names and future birth dates before contacting the server.
    pub validation:   bool,
    pub search:       bool,
    pub log_level:    String,
    pub history_file: PathBuf,
    pub date_locale:  String,
    pub date_format:  String,
    pub style_header: StyleConfig,
    pub style_even:   StyleConfig,
    pub style_odd:    StyleConfig,
    pub style_dimmed: StyleConfig,
    pub style_edit:   StyleConfig,
    pub style_create: StyleConfig,
    pub style_error:  StyleConfig,
}

impl Config {
    pub fn default_as_string() -> Result<String> {
        Ok(toml::to_string(&Self::default())?)
    }

    /// Defaults, then the user config, then `./config.toml`, then `AUTORES_*` variables.
    pub fn figment() -> Figment {
        dotenvy::dotenv().ok();
        let user_config = shellexpand::tilde(USER_CONFIG).into_owned();
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(user_config))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("AUTORES_"))
    }

    pub fn read_config() -> Result<Self> {
        Self::extract_from(Self::figment())
    }

    pub fn extract_from(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().context("Invalid configuration")?;
        config.check_date_format()?;
        Ok(config)
    }

    fn check_date_format(&self) -> Result<()> {
        if StrftimeItems::new(&self.date_format).any(|x| matches!(x, Item::Error)) {
            bail!("Invalid date_format `{}`", self.date_format);
        }
        Ok(())
    }

    pub fn features(&self) -> Features {
        Features {
            validation: self.validation,
            search:     self.search,
        }
    }

    pub fn base_url(&self) -> Result<reqwest::Url> {
        reqwest::Url::parse(&self.base_url)
            .with_context(|| format!("Invalid base_url `{}`", self.base_url))
    }

    pub fn log_level(&self) -> Result<tracing::Level> {
        self.log_level
            .parse()
            .with_context(|| format!("Invalid log_level `{}`", self.log_level))
    }

    pub fn history_file(&self) -> PathBuf {
        shellexpand::path::tilde(&self.history_file).into_owned()
    }

    /// Locale for long dates. Unknown names fall back to `es_MX`.
    pub fn locale(&self) -> chrono::Locale {
        match chrono::Locale::try_from(self.date_locale.as_str()) {
            Ok(locale) => locale,
            Err(_) => {
                warn!("Unknown date_locale `{}`, using es_MX", self.date_locale);
                DEFAULT_LOCALE
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url:     DEFAULT_BASE_URL.into(),
            validation:   true,
            search:       true,
            log_level:    "warn".into(),
            history_file: PathBuf::from("~/.local/share/autores/history.txt"),
            date_locale:  "es_MX".into(),
            date_format:  "%-d de %B de %Y".into(),
            style_header: StyleConfig {
                color: COLOR_HEADER,
                bold: true,
                ..StyleConfig::default()
            },
            style_even:   StyleConfig {
                color: COLOR_ROW_EVEN,
                ..StyleConfig::default()
            },
            style_odd:    StyleConfig {
                color: COLOR_ROW_ODD,
                ..StyleConfig::default()
            },
            style_dimmed: StyleConfig {
                color: COLOR_DIMMED,
                ..StyleConfig::default()
            },
            style_edit:   StyleConfig {
                color: COLOR_EDIT_MODE,
                bold: true,
                ..StyleConfig::default()
            },
            style_create: StyleConfig {
                color: COLOR_CREATE_MODE,
                bold: true,
                ..StyleConfig::default()
            },
            style_error:  StyleConfig {
                color: COLOR_ERROR,
                bold: true,
                ..StyleConfig::default()
            },
        }
    }
}
