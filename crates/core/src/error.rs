/// Domain errors for the site configuration engine.
///
/// `Load` and `Save` are recovered locally (fallback to defaults, log and
/// continue). `Format` and `Validation` reach the caller of an admin operation
/// and never mutate the snapshot.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Settings load failed: {0}")]
    Load(String),

    #[error("Settings save failed for key '{key}': {message}")]
    Save { key: String, message: String },

    #[error("Malformed configuration blob: {0}")]
    Format(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_save_names_key() {
        let err = CoreError::Save {
            key: "theme_mode".to_string(),
            message: "connection reset".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Settings save failed for key 'theme_mode': connection reset"
        );
    }

    #[test]
    fn display_format() {
        let err = CoreError::Format("expected value at line 1 column 1".to_string());
        assert!(err.to_string().starts_with("Malformed configuration blob:"));
    }
}
