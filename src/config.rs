use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

// Game flow
pub const MAX_CARNIVAL_NODES: usize = 7;
pub const QUESTIONS_PER_NODE: usize = 5;
pub const CATEGORY_QUESTIONS_PER_NODE: usize = 4;
pub const FUN_QUESTIONS_PER_NODE: usize = 1;
pub const MIN_REQUIRED_GENERAL_CATEGORIES: usize = 7;
pub const QUESTIONS_TO_COMPLETE_NODE: i64 = 5;
pub const MIN_NODE_NUMBER: i32 = 1;
pub const MAX_NODE_NUMBER: i32 = 7;
pub const DEFAULT_NODE_START: i32 = 0;

// Scoring
pub const CORRECT_ANSWER_MULTIPLIER: i32 = 100;
pub const PENALTY_MULTIPLIER: i32 = 10;
pub const TIME_PENALTY_INTERVAL_SECONDS: i64 = 30;

// Limits
pub const MAX_SESSION_DURATION_SECONDS: i64 = 2 * 60 * 60;
pub const LEADERBOARD_TOP_ENTRIES: i64 = 10;
pub const QUESTION_FETCH_MULTIPLIER: usize = 2;

pub const FUN_CATEGORY_NAME: &str = "Fun";
pub const TOKEN_ISSUER: &str = "carnival";

/// QR code payloads printed at each physical node.
pub const NODE_CODES: [(&str, i32); 7] = [
    ("NODE_001", 1),
    ("NODE_002", 2),
    ("NODE_003", 3),
    ("NODE_004", 4),
    ("NODE_005", 5),
    ("NODE_006", 6),
    ("NODE_007", 7),
];

pub fn node_number_for_code(code: &str) -> Option<i32> {
    NODE_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, number)| *number)
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiry_seconds: i64,
    pub catalog_seed_path: Option<String>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env("DATABASE_URL")?,
            jwt_secret: get_env("JWT_SECRET")?,
            jwt_expiry_seconds: get_env_parse_or("JWT_EXPIRY_SECONDS", 86_400)?,
            catalog_seed_path: env::var("CATALOG_SEED_PATH").ok(),
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_codes_map_to_their_positions() {
        assert_eq!(node_number_for_code("NODE_001"), Some(1));
        assert_eq!(node_number_for_code("NODE_007"), Some(7));
        assert_eq!(node_number_for_code("NODE_008"), None);
        assert_eq!(node_number_for_code("node_001"), None);
    }

    #[test]
    fn node_table_covers_every_node() {
        assert_eq!(NODE_CODES.len(), MAX_CARNIVAL_NODES);
        for (idx, (_, number)) in NODE_CODES.iter().enumerate() {
            assert_eq!(*number, idx as i32 + MIN_NODE_NUMBER);
        }
    }
}
