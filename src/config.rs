// Runtime configuration.
//
// Values come from two places: the JSON secrets file the bot has always used
// (`secrets/secrets.json`, keys like `google_sheet_id`) and environment
// variables, which `dotenv` may have populated from `.env`. An environment
// variable named after the uppercased key wins over the file.

use chrono_tz::Tz;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_SECRETS_FILE: &str = "secrets/secrets.json";
const DEFAULT_GOOGLE_TOKEN_FILE: &str = "secrets/google_token.json";
const DEFAULT_AI_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_AI_TIMEOUT_SECS: u64 = 20;
const DEFAULT_WINDOW_DAYS: i64 = 7;
const MAX_WINDOW_DAYS: i64 = 3650;
const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Berlin;
const DEFAULT_ASSISTANT_NAME: &str = "Gym-Bro-Tron 9001";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required setting `{0}`")]
    Missing(String),
    #[error("Invalid value for `{key}`: {message}")]
    Invalid { key: String, message: String },
    #[error("Could not read secrets file {path}: {source}")]
    SecretsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Secrets file {path} is not a JSON object: {source}")]
    SecretsFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatBackend {
    Telegram,
    Discord,
}

impl std::str::FromStr for ChatBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "telegram" => Ok(ChatBackend::Telegram),
            "discord" => Ok(ChatBackend::Discord),
            other => Err(format!("unknown chat backend '{}'", other)),
        }
    }
}

/// Where messages go and with which credentials.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub backend: ChatBackend,
    pub token: String,
    /// Group chat that receives the standings message.
    pub destination: String,
    /// Chat that receives crash alerts.
    pub monitor_destination: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub spreadsheet_id: String,
    pub range: String,
    pub chat: ChatConfig,
    pub openai_token: String,
    pub openai_organization: Option<String>,
    pub ai_model: String,
    pub ai_base_url: Option<String>,
    pub ai_timeout: Duration,
    pub window_days: i64,
    pub timezone: Tz,
    pub assistant_name: String,
    pub fallback_template_index: Option<usize>,
    pub google_token_file: PathBuf,
    pub google_service_account_key: Option<PathBuf>,
}

/// Merged view over the secrets file and the environment.
struct Settings<'a> {
    file: HashMap<String, Value>,
    env: &'a dyn Fn(&str) -> Option<String>,
}

impl Settings<'_> {
    /// Looks a key up in the environment (uppercased) first, then in the file.
    /// Blank values count as unset.
    fn get(&self, key: &str) -> Option<String> {
        let from_env = (self.env)(&key.to_ascii_uppercase());
        let value = from_env.or_else(|| match self.file.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            // chat ids are often stored as bare numbers
            other => Some(other.to_string()),
        })?;

        let value = value.trim().to_string();
        (!value.is_empty()).then_some(value)
    }

    fn require(&self, key: &str) -> Result<String, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::Missing(key.to_string()))
    }

    fn parse<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key)
            .map(|raw| {
                raw.parse::<T>().map_err(|e| ConfigError::Invalid {
                    key: key.to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()
    }
}

fn read_secrets_file(path: &Path) -> Result<HashMap<String, Value>, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No secrets file, using environment only");
            return Ok(HashMap::new());
        }
        Err(source) => {
            return Err(ConfigError::SecretsFile {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&raw).map_err(|source| ConfigError::SecretsFormat {
        path: path.to_path_buf(),
        source,
    })
}

impl Config {
    /// Loads from `SECRETS_FILE` (default `secrets/secrets.json`) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let env = |key: &str| std::env::var(key).ok();
        let secrets_path = env("SECRETS_FILE").unwrap_or_else(|| DEFAULT_SECRETS_FILE.to_string());
        Self::from_sources(Path::new(&secrets_path), &env)
    }

    pub fn from_sources(
        secrets_path: &Path,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let settings = Settings {
            file: read_secrets_file(secrets_path)?,
            env,
        };

        let backend = settings
            .parse::<ChatBackend>("chat_backend")?
            .unwrap_or(ChatBackend::Telegram);

        let chat = match backend {
            ChatBackend::Telegram => ChatConfig {
                backend,
                token: settings.require("telegram_token")?,
                destination: settings.require("telegram_chat_id")?,
                monitor_destination: settings.require("telegram_monitor_chat_id")?,
            },
            ChatBackend::Discord => ChatConfig {
                backend,
                token: settings.require("discord_token")?,
                destination: settings.require("discord_channel_id")?,
                monitor_destination: settings.require("discord_monitor_channel_id")?,
            },
        };

        let timezone = match settings.get("standings_timezone") {
            Some(name) => name.parse::<Tz>().map_err(|e| ConfigError::Invalid {
                key: "standings_timezone".to_string(),
                message: e.to_string(),
            })?,
            None => DEFAULT_TIMEZONE,
        };

        let window_days = settings
            .parse::<i64>("standings_window_days")?
            .unwrap_or(DEFAULT_WINDOW_DAYS);
        if !(1..=MAX_WINDOW_DAYS).contains(&window_days) {
            return Err(ConfigError::Invalid {
                key: "standings_window_days".to_string(),
                message: format!("must be between 1 and {}", MAX_WINDOW_DAYS),
            });
        }

        let ai_timeout_secs = settings
            .parse::<u64>("ai_timeout_secs")?
            .unwrap_or(DEFAULT_AI_TIMEOUT_SECS);

        Ok(Config {
            spreadsheet_id: settings.require("google_sheet_id")?,
            range: settings.require("range_name")?,
            chat,
            openai_token: settings.require("open_ai_token")?,
            openai_organization: settings.get("open_ai_organization"),
            ai_model: settings
                .get("ai_model")
                .unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
            ai_base_url: settings.get("ai_base_url"),
            ai_timeout: Duration::from_secs(ai_timeout_secs),
            window_days,
            timezone,
            assistant_name: settings
                .get("assistant_name")
                .unwrap_or_else(|| DEFAULT_ASSISTANT_NAME.to_string()),
            fallback_template_index: settings.parse::<usize>("fallback_template_index")?,
            google_token_file: settings
                .get("google_token_file")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_GOOGLE_TOKEN_FILE)),
            google_service_account_key: settings
                .get("google_service_account_key")
                .map(PathBuf::from),
        })
    }
}
