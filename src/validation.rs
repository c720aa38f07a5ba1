//! Request validation utilities.

/// Validate that a string is not empty.
pub fn validate_non_empty(s: &str, field: &str) -> crate::types::Result<()> {
    if s.is_empty() {
        return Err(crate::types::Error::validation(format!(
            "{} cannot be empty",
            field
        )));
    }
    Ok(())
}

/// Validate that a relay list has at least one entry.
pub fn validate_relays(relays: &[String]) -> crate::types::Result<()> {
    if relays.is_empty() {
        return Err(crate::types::Error::validation(
            "relay list cannot be empty",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_non_empty() {
        assert!(validate_non_empty("x", "field").is_ok());
        assert!(validate_non_empty("", "field").is_err());
    }

    #[test]
    fn test_validate_relays() {
        assert!(validate_relays(&["ws://a".to_string()]).is_ok());
        assert!(validate_relays(&[]).is_err());
    }
}
