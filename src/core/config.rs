//! Environment-driven configuration
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.7.0
//!
//! ## Changelog
//! - 1.2.0: Add quota reset time and administrator list
//! - 1.1.0: Completion tuning (temperature, max tokens, timeout)
//! - 1.0.0: Initial creation

use anyhow::{anyhow, Context, Result};
use chrono::NaiveTime;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::core::error::UserId;

pub const DEFAULT_MODEL: &str = "text-curie-001";
pub const DEFAULT_PERSONA: &str = "You are a super advanced AI. You are talking to a human through a chat interface. Try to have a conversation with the human, while pretending to be a human yourself.";

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub temperature: f32,
    pub max_tokens: u16,
    pub request_timeout: Duration,
    /// Turns a user may consume between two quota resets
    pub daily_message_limit: u32,
    pub default_persona: String,
    pub database_path: String,
    pub transcript_dir: String,
    /// Wall-clock time (UTC) at which every message counter returns to zero
    pub quota_reset_time: NaiveTime,
    pub admin_user_ids: Vec<UserId>,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup("DISCORD_TOKEN")
            .ok_or_else(|| anyhow!("DISCORD_TOKEN environment variable not set"))?;
        let openai_api_key = lookup("OPENAI_API_KEY")
            .or_else(|| lookup("OPENAI_KEY"))
            .ok_or_else(|| anyhow!("OPENAI_API_KEY environment variable not set"))?;

        let quota_reset_time = match lookup("QUOTA_RESET_TIME") {
            Some(raw) => NaiveTime::parse_from_str(raw.trim(), "%H:%M")
                .with_context(|| format!("QUOTA_RESET_TIME must be HH:MM, got '{raw}'"))?,
            None => NaiveTime::MIN,
        };

        let admin_user_ids = match lookup("ADMIN_USER_IDS") {
            Some(raw) => parse_id_list(&raw)?,
            None => Vec::new(),
        };

        Ok(Config {
            discord_token,
            openai_api_key,
            openai_model: lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: parse_or(&lookup, "OPENAI_TEMPERATURE", 0.7)?,
            max_tokens: parse_or(&lookup, "OPENAI_MAX_TOKENS", 150)?,
            request_timeout: Duration::from_secs(parse_or(&lookup, "OPENAI_TIMEOUT_SECS", 45)?),
            daily_message_limit: parse_or(&lookup, "DAILY_MESSAGE_LIMIT", 100)?,
            default_persona: lookup("DEFAULT_PERSONA")
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PERSONA.to_string()),
            database_path: lookup("DATABASE_PATH").unwrap_or_else(|| "users.db".to_string()),
            transcript_dir: lookup("TRANSCRIPT_DIR").unwrap_or_else(|| "saves".to_string()),
            quota_reset_time,
            admin_user_ids,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn is_admin(&self, user_id: UserId) -> bool {
        self.admin_user_ids.contains(&user_id)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {key}: '{raw}'")),
        None => Ok(default),
    }
}

fn parse_id_list(raw: &str) -> Result<Vec<UserId>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<UserId>()
                .with_context(|| format!("Invalid user id in ADMIN_USER_IDS: '{s}'"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [("DISCORD_TOKEN", "token"), ("OPENAI_API_KEY", "sk-test")];

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&REQUIRED)).unwrap();
        assert_eq!(config.openai_model, DEFAULT_MODEL);
        assert_eq!(config.daily_message_limit, 100);
        assert_eq!(config.max_tokens, 150);
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.quota_reset_time, NaiveTime::MIN);
        assert_eq!(config.default_persona, DEFAULT_PERSONA);
        assert!(config.admin_user_ids.is_empty());
    }

    #[test]
    fn test_missing_token_is_error() {
        let result = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_openai_key_fallback() {
        let config = Config::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "token"),
            ("OPENAI_KEY", "sk-legacy"),
        ]))
        .unwrap();
        assert_eq!(config.openai_api_key, "sk-legacy");
    }

    #[test]
    fn test_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("DAILY_MESSAGE_LIMIT", "5"),
            ("QUOTA_RESET_TIME", "03:30"),
            ("ADMIN_USER_IDS", "1, 2,3"),
        ]);
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.daily_message_limit, 5);
        assert_eq!(
            config.quota_reset_time,
            NaiveTime::from_hms_opt(3, 30, 0).unwrap()
        );
        assert_eq!(config.admin_user_ids, vec![1, 2, 3]);
        assert!(config.is_admin(2));
        assert!(!config.is_admin(4));
    }

    #[test]
    fn test_invalid_limit_is_error() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("DAILY_MESSAGE_LIMIT", "lots"));
        assert!(Config::from_lookup(lookup_from(&pairs)).is_err());
    }

    #[test]
    fn test_invalid_reset_time_is_error() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("QUOTA_RESET_TIME", "midnight"));
        assert!(Config::from_lookup(lookup_from(&pairs)).is_err());
    }
}
