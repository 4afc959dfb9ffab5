//! Subcommand implementations.

pub mod auth;
pub mod cart;
pub mod products;
pub mod tasks;

use std::io::Write;

/// Parse a `key=value` variation selection argument.
pub fn parse_variation(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))
}

/// Ask for confirmation on stdin unless `--yes` was passed.
///
/// # Errors
///
/// Returns an error if stdin or stdout is unusable.
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool, Box<dyn std::error::Error>> {
    if assume_yes {
        return Ok(true);
    }

    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}

/// Read a password from stdin. Input is not masked; pipe it in when
/// scripting.
///
/// # Errors
///
/// Returns an error if stdin or stdout is unusable.
pub fn read_password(prompt: &str) -> Result<String, Box<dyn std::error::Error>> {
    print!("{prompt}: ");
    std::io::stdout().flush()?;

    let mut password = String::new();
    std::io::stdin().read_line(&mut password)?;
    Ok(password.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variation() {
        assert_eq!(
            parse_variation("color=Red").unwrap(),
            ("color".to_string(), "Red".to_string())
        );
        assert!(parse_variation("color").is_err());
        assert!(parse_variation("=Red").is_err());
    }
}
