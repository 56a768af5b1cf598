use anyhow::Context;
use std::path::PathBuf;
use url::Url;

const FIRESTORE_BASE_URL_KEY: &str = "FIRESTORE_BASE_URL";
const TOKEN_URL_KEY: &str = "TOKEN_URL";
const CLIENT_ID_KEY: &str = "CLIENT_ID";
const CLIENT_SECRET_KEY: &str = "CLIENT_SECRET";
const PROJECT_ID_KEY: &str = "PROJECT_ID";
const ENVIRONMENT_KEY: &str = "ENVIRONMENT";
const DECK_DIR_KEY: &str = "DECK_DIR";
const INVALID_ROW_REPORT_KEY: &str = "INVALID_ROW_REPORT";
const LOG_LEVEL_KEY: &str = "LOG_LEVEL";

const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com";
const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const DEFAULT_DECK_DIR: &str = "deck";

/// How much of the invalid-row list the confirm-upload prompt shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidRowReport {
    Full,
    CountOnly,
}

impl InvalidRowReport {
    fn parse(value: &str) -> anyhow::Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "count" | "count-only" => Ok(Self::CountOnly),
            other => anyhow::bail!(
                "{} must be 'full' or 'count', got '{}'",
                INVALID_ROW_REPORT_KEY,
                other
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub firestore_base_url: Url,
    pub token_url: Url,
    pub client_id: String,
    pub client_secret: String,
    pub project_id: String,
    pub environment: String,
    pub deck_dir: PathBuf,
    pub invalid_row_report: InvalidRowReport,
    pub log_level: tracing::Level,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let firestore_base_url =
            Url::try_from(env_or(FIRESTORE_BASE_URL_KEY, DEFAULT_FIRESTORE_BASE_URL).as_str())?;
        let token_url = Url::try_from(env_or(TOKEN_URL_KEY, DEFAULT_TOKEN_URL).as_str())?;
        let client_id = require(CLIENT_ID_KEY)?;
        let client_secret = require(CLIENT_SECRET_KEY)?;
        let project_id = require(PROJECT_ID_KEY)?;
        let environment = require(ENVIRONMENT_KEY)?;
        let deck_dir = PathBuf::from(env_or(DECK_DIR_KEY, DEFAULT_DECK_DIR));
        let invalid_row_report = match std::env::var(INVALID_ROW_REPORT_KEY) {
            Ok(value) => InvalidRowReport::parse(&value)?,
            Err(_) => InvalidRowReport::Full,
        };
        let log_level = match std::env::var(LOG_LEVEL_KEY) {
            Ok(value) => value.parse().map_err(|_| {
                anyhow::anyhow!("{} is not a valid log level: {}", LOG_LEVEL_KEY, value)
            })?,
            Err(_) => tracing::Level::INFO,
        };

        Ok(Self {
            firestore_base_url,
            token_url,
            client_id,
            client_secret,
            project_id,
            environment,
            deck_dir,
            invalid_row_report,
            log_level,
        })
    }
}

fn require(key: &str) -> anyhow::Result<String> {
    std::env::var(key).with_context(|| format!("{} is not set", key))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_invalid_row_report_modes() {
        assert_eq!(
            InvalidRowReport::parse("full").unwrap(),
            InvalidRowReport::Full
        );
        assert_eq!(
            InvalidRowReport::parse("COUNT").unwrap(),
            InvalidRowReport::CountOnly
        );
        assert_eq!(
            InvalidRowReport::parse("count-only").unwrap(),
            InvalidRowReport::CountOnly
        );
        assert!(InvalidRowReport::parse("verbose").is_err());
    }
}
