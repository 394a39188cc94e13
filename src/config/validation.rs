//! Configuration validation logic.

use regex::Regex;

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Maximum username length accepted by Instagram.
const MAX_USERNAME_LENGTH: usize = 30;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_username(&config.username)?;
    validate_timeout(config.timeout)?;
    validate_user_agent(&config.user_agent)?;

    Ok(())
}

/// Validate the target username.
pub fn validate_username(username: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(Error::MissingConfig("username".to_string()));
    }

    if username.len() > MAX_USERNAME_LENGTH {
        return Err(Error::ConfigValidation {
            field: "username".to_string(),
            message: format!(
                "Username '{}' is too long (maximum {} characters)",
                username, MAX_USERNAME_LENGTH
            ),
        });
    }

    // Letters, digits, periods and underscores
    let username_pattern = Regex::new(r"^[A-Za-z0-9._]+$")
        .map_err(|e| Error::Config(format!("Invalid username pattern: {}", e)))?;

    if !username_pattern.is_match(username) {
        return Err(Error::ConfigValidation {
            field: "username".to_string(),
            message: format!(
                "Username '{}' contains invalid characters. Only letters, digits, '.' and '_' allowed.",
                username
            ),
        });
    }

    if username.chars().all(|c| c == '.') {
        return Err(Error::ConfigValidation {
            field: "username".to_string(),
            message: format!("Username '{}' is not a valid profile name", username),
        });
    }

    Ok(())
}

/// Validate the fetch timeout.
pub fn validate_timeout(timeout: u64) -> Result<()> {
    if timeout == 0 {
        return Err(Error::ConfigValidation {
            field: "timeout".to_string(),
            message: "Timeout must be a positive number of seconds".to_string(),
        });
    }

    Ok(())
}

/// Validate the user agent string.
pub fn validate_user_agent(user_agent: &str) -> Result<()> {
    if user_agent.trim().is_empty() {
        return Err(Error::MissingConfig("user_agent".to_string()));
    }

    Ok(())
}
