use std::env;
use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use listing_bot_http_backend::{HttpConfig, HttpConfigBuilder};

const BASE_URL_VAR: &str = "LISTING_API_BASE_URL";
const API_TOKEN_VAR: &str = "LISTING_API_TOKEN";
const CATEGORIES_PATH_VAR: &str = "LISTING_CATEGORIES_PATH";
const PAGE_PATH_VAR: &str = "LISTING_PAGE_PATH";
const TYPING_DELAY_VAR: &str = "LISTING_TYPING_DELAY_MS";

const DEFAULT_TYPING_DELAY: Duration = Duration::from_millis(400);

/// Settings of the terminal front-end.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Where and how to reach the listing API.
    pub http: HttpConfig,
    /// Path of the page hosting the chat, used to sort the categories.
    pub page_path: Option<String>,
    /// How long the bot "types" before each reply.
    pub typing_delay: Duration,
}

impl AppConfig {
    /// Reads the settings from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Reads the settings through `var`, which returns the value of a
    /// variable, or `None` if it's not set.
    pub fn from_vars(
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let Some(base_url) = var(BASE_URL_VAR) else {
            return Err(ConfigError::Missing(BASE_URL_VAR));
        };

        let mut http = HttpConfigBuilder::with_base_url(base_url);
        if let Some(api_token) = var(API_TOKEN_VAR) {
            http = http.with_api_token(api_token);
        }
        if let Some(path) = var(CATEGORIES_PATH_VAR) {
            http = http.with_categories_path(path);
        }

        let typing_delay = match var(TYPING_DELAY_VAR) {
            Some(value) => match value.trim().parse() {
                Ok(millis) => Duration::from_millis(millis),
                Err(_) => {
                    return Err(ConfigError::Invalid {
                        name: TYPING_DELAY_VAR,
                        value,
                    });
                }
            },
            None => DEFAULT_TYPING_DELAY,
        };

        Ok(Self {
            http: http.build(),
            page_path: var(PAGE_PATH_VAR).filter(|path| !path.is_empty()),
            typing_delay,
        })
    }
}

/// The settings in the environment are unusable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set.
    Missing(&'static str),
    /// A variable has a value that can't be parsed.
    Invalid {
        /// Name of the variable.
        name: &'static str,
        /// The offending value.
        value: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(name) => {
                write!(f, "{name} environment variable is not set")
            }
            ConfigError::Invalid { name, value } => {
                write!(f, "{name} environment variable is invalid: {value:?}")
            }
        }
    }
}

impl StdError for ConfigError {}
