use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("database error: {0}")]
    Db(String),
}

/// Check that `value` is a member of a closed status set.
pub fn validate_member(field: &str, value: &str, allowed: &[&str]) -> Result<(), ModelError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ModelError::Validation(format!(
            "{} must be one of {:?}, got '{}'",
            field, allowed, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_check_accepts_listed_value() {
        assert!(validate_member("status", "active", &["active", "paused"]).is_ok());
    }

    #[test]
    fn member_check_rejects_unlisted_value() {
        let err = validate_member("status", "zombie", &["active", "paused"]).unwrap_err();
        assert!(err.to_string().contains("status"));
    }
}
