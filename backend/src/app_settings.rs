use std::str::FromStr;
use serde::{Serialize, Deserialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThemeName {
    #[serde(rename = "light")]
    Light,
    #[default]
    #[serde(rename = "dark")]
    Dark,
}

impl ThemeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Light => "light",
            ThemeName::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            ThemeName::Light => ThemeName::Dark,
            ThemeName::Dark => ThemeName::Light,
        }
    }

    /// Label of the button which switches away from this theme.
    pub fn toggle_label(&self) -> &'static str {
        match self {
            ThemeName::Dark => "☀️ Light",
            ThemeName::Light => "🌙 Dark",
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid theme name: {0}")]
pub struct ParseThemeError(String);

impl FromStr for ThemeName {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(ThemeName::Light),
            "dark" => Ok(ThemeName::Dark),
            _ => Err(ParseThemeError(s.to_string())),
        }
    }
}
