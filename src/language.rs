use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Languages the word api is known to serve for this tool.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    ValueEnum,
    strum_macros::Display,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum SupportedLanguage {
    #[strum(serialize = "english")]
    English,
    #[strum(serialize = "pt-br")]
    PortugueseBr,
}

impl SupportedLanguage {
    /// Query tag sent to the word api. English is the api default and
    /// sends none.
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            SupportedLanguage::English => None,
            SupportedLanguage::PortugueseBr => Some("pt-br"),
        }
    }

    /// Tag recorded in the score log.
    pub fn score_tag(&self) -> &'static str {
        self.tag().unwrap_or("en")
    }

    /// Next language in the cycle, for the in-app switch key.
    pub fn next(&self) -> Self {
        match self {
            SupportedLanguage::English => SupportedLanguage::PortugueseBr,
            SupportedLanguage::PortugueseBr => SupportedLanguage::English,
        }
    }
}
