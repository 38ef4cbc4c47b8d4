use std::env;
use std::path::PathBuf;

use anyhow::Context as _;

use mewdeko_services::converter::DEFAULT_CURRENCY_API_URL;
use mewdeko_services::reddit::DEFAULT_REDDIT_API_URL;

/// Startup settings read from the environment (and `.env`).
#[derive(Debug)]
pub struct Config {
    pub token: String,
    pub database_url: String,
    pub database_max_connections: u32,
    /// Register commands in this guild only; global registration otherwise.
    pub guild_id: Option<u64>,
    pub redis_enabled: bool,
    pub redis_url: Option<String>,
    pub redis_key_prefix: String,
    pub auto_run_migrations: bool,
    pub trivia_questions_path: PathBuf,
    pub units_path: PathBuf,
    pub currency_api_url: String,
    pub reddit_api_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let token = env::var("DISCORD_TOKEN").context("DISCORD_TOKEN is not set")?;
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;

        let guild_id = env_string("DISCORD_GUILD_ID")
            .map(|raw| raw.parse::<u64>())
            .transpose()
            .context("DISCORD_GUILD_ID is not a valid id")?;

        let database_max_connections =
            u32::try_from(env_u64("DATABASE_MAX_CONNECTIONS", 5)).unwrap_or(u32::MAX);

        Ok(Self {
            token,
            database_url,
            database_max_connections,
            guild_id,
            redis_enabled: env_bool("REDIS_ENABLED", false),
            redis_url: env_string("REDIS_URL"),
            redis_key_prefix: env_string("REDIS_KEY_PREFIX")
                .unwrap_or_else(|| "mewdeko:prod".to_owned()),
            auto_run_migrations: env_bool("AUTO_RUN_MIGRATIONS", true),
            trivia_questions_path: env_string("TRIVIA_QUESTIONS_PATH")
                .unwrap_or_else(|| "data/trivia_questions.json".to_owned())
                .into(),
            units_path: env_string("UNITS_PATH")
                .unwrap_or_else(|| "data/units.json".to_owned())
                .into(),
            currency_api_url: env_string("CURRENCY_API_URL")
                .unwrap_or_else(|| DEFAULT_CURRENCY_API_URL.to_owned()),
            reddit_api_url: env_string("REDDIT_API_URL")
                .unwrap_or_else(|| DEFAULT_REDDIT_API_URL.to_owned()),
        })
    }
}

/// A set, non-blank variable.
fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn env_bool(key: &str, default: bool) -> bool {
    env_string(key).map_or(default, |value| parse_flag(&value))
}

fn env_u64(key: &str, default: u64) -> u64 {
    env_string(key)
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::parse_flag;

    #[test]
    fn flags_accept_common_spellings() {
        for value in ["1", "true", "YES", " on "] {
            assert!(parse_flag(value), "{value} should be on");
        }
        for value in ["0", "false", "off", "nope"] {
            assert!(!parse_flag(value), "{value} should be off");
        }
    }
}
