//! Shared helpers for command handlers

use anyhow::{bail, Result};
use uuid::Uuid;

use crate::config::Config;

/// Parse a UUID argument, turning the parse error into a readable message.
pub fn parse_uuid(value: &str, what: &str) -> Result<Uuid> {
    match Uuid::parse_str(value) {
        Ok(id) => Ok(id),
        Err(_) => bail!("invalid {what} UUID: {value}"),
    }
}

/// Session for a new entry: the explicit argument wins, otherwise the
/// config's current session (if set and well-formed).
pub fn resolve_session(arg: Option<&str>, config: &Config) -> Result<Option<Uuid>> {
    match arg {
        Some(value) => Ok(Some(parse_uuid(value, "session")?)),
        None => match &config.current_session {
            Some(value) => Ok(Some(parse_uuid(value, "session")?)),
            None => Ok(None),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uuid_rejects_garbage() {
        let err = parse_uuid("not-a-uuid", "question").unwrap_err();
        assert!(err.to_string().contains("invalid question UUID"));
    }

    #[test]
    fn test_explicit_session_wins_over_config() {
        let mut config = Config::default();
        config.current_session = Some(Uuid::new_v4().to_string());
        let explicit = Uuid::new_v4();

        let resolved = resolve_session(Some(&explicit.to_string()), &config).unwrap();
        assert_eq!(resolved, Some(explicit));
    }

    #[test]
    fn test_session_falls_back_to_config() {
        let session = Uuid::new_v4();
        let mut config = Config::default();
        config.current_session = Some(session.to_string());

        let resolved = resolve_session(None, &config).unwrap();
        assert_eq!(resolved, Some(session));
    }

    #[test]
    fn test_no_session_anywhere() {
        let config = Config::default();
        assert_eq!(resolve_session(None, &config).unwrap(), None);
    }
}
