use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_acquire_timeout: Duration,
    pub write_attempts: u32,
    pub request_timeout: Duration,
    pub shutdown_timeout: Duration,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", "0.0.0.0:8080"),
            database_url: get_env_or("DATABASE_URL", "postgres://localhost:5432/hr"),
            database_max_connections: get_env_parse_or("DATABASE_MAX_CONNECTIONS", 50)?,
            database_acquire_timeout: Duration::from_secs(get_env_parse_or(
                "DATABASE_ACQUIRE_TIMEOUT_SECS",
                30,
            )?),
            write_attempts: get_env_parse_or::<u32>("WRITE_ATTEMPTS", 5)?.max(1),
            request_timeout: Duration::from_secs(get_env_parse_or("REQUEST_TIMEOUT_SECS", 30)?),
            shutdown_timeout: Duration::from_secs(get_env_parse_or("SHUTDOWN_TIMEOUT_SECS", 60)?),
        })
    }
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
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

pub fn install_config(config: Config) -> Result<&'static Config> {
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(get_config())
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
    fn parse_or_falls_back_and_rejects_garbage() {
        env::remove_var("HR_TEST_UNSET_VALUE");
        assert_eq!(get_env_parse_or::<u32>("HR_TEST_UNSET_VALUE", 7).unwrap(), 7);

        env::set_var("HR_TEST_BAD_VALUE", "five");
        let err = get_env_parse_or::<u32>("HR_TEST_BAD_VALUE", 5).unwrap_err();
        assert!(err.to_string().contains("HR_TEST_BAD_VALUE"));

        env::set_var("HR_TEST_GOOD_VALUE", "12");
        assert_eq!(get_env_parse_or::<u64>("HR_TEST_GOOD_VALUE", 1).unwrap(), 12);
    }
}
