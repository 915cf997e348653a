//! Validation helpers for catalog records.

use validator::ValidationError;

/// Rejects empty and whitespace-only strings.
pub fn validate_non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Accepts absolute http(s) URLs only.
pub fn validate_link(value: &str) -> Result<(), ValidationError> {
    use validator::ValidateUrl;

    let trimmed = value.trim();
    let scheme_ok = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    if !scheme_ok || !trimmed.validate_url() {
        let mut err = ValidationError::new("url");
        err.message = Some(format!("`{trimmed}` is not an http(s) URL").into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_non_blank() {
        assert!(validate_non_blank("Catan").is_ok());
        assert!(validate_non_blank(" a ").is_ok());
        assert!(validate_non_blank("").is_err());
        assert!(validate_non_blank("   ").is_err());
    }

    #[test]
    fn test_validate_link() {
        assert!(validate_link("https://boardgamegeek.com/boardgame/13/catan").is_ok());
        assert!(validate_link("http://example.org").is_ok());
        assert!(validate_link("ftp://example.org").is_err());
        assert!(validate_link("not a url").is_err());
    }
}
