use thiserror::Error;

pub type Result<T> = std::result::Result<T, HandGuessError>;

#[derive(Error, Debug)]
pub enum HandGuessError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HandGuessError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn dialog(msg: impl Into<String>) -> Self {
        Self::Dialog(msg.into())
    }
}

// conversion from dialoguer::Error
impl From<dialoguer::Error> for HandGuessError {
    fn from(err: dialoguer::Error) -> Self {
        HandGuessError::Dialog(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_message() {
        let err = HandGuessError::config("min_bet must be greater than 0");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: min_bet must be greater than 0"
        );
    }

    #[test]
    fn test_serde_error_converts() {
        let parse: std::result::Result<u64, _> = serde_json::from_str("not json");
        let err: HandGuessError = parse.unwrap_err().into();
        assert!(matches!(err, HandGuessError::Serialization(_)));
    }

    #[test]
    fn test_dialog_error_message() {
        let err = HandGuessError::dialog("read interrupted");
        assert!(matches!(err, HandGuessError::Dialog(_)));
        assert_eq!(err.to_string(), "Dialog error: read interrupted");
    }
}
