use thiserror::Error;

#[derive(Error, Debug)]
pub enum FiestaError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown probe: {name}")]
    UnknownProbe { name: String },

    #[error("Scoring error: {message}")]
    ScoringError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Io,
    Output,
    Scoring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FiestaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FiestaError::IoError(_) => ErrorCategory::Io,
            FiestaError::SerializationError(_) | FiestaError::CsvError(_) => ErrorCategory::Output,
            FiestaError::ConfigError { .. }
            | FiestaError::ConfigValidationError { .. }
            | FiestaError::InvalidConfigValueError { .. }
            | FiestaError::UnknownProbe { .. } => ErrorCategory::Configuration,
            FiestaError::ScoringError { .. } => ErrorCategory::Scoring,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Scoring => ErrorSeverity::High,
            ErrorCategory::Output => ErrorSeverity::Medium,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            FiestaError::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            FiestaError::SerializationError(_) | FiestaError::CsvError(_) => {
                "Try a different --format, or rerun with --verbose for details".to_string()
            }
            FiestaError::ConfigError { .. } | FiestaError::ConfigValidationError { .. } => {
                "Make sure the config file exists and is valid TOML".to_string()
            }
            FiestaError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}' and try again", field)
            }
            FiestaError::UnknownProbe { .. } => {
                "Run without --only to see every probe name in the summary".to_string()
            }
            FiestaError::ScoringError { .. } => {
                "Use smaller base scores or commit counts".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            FiestaError::IoError(e) => format!("Could not read or write a file: {}", e),
            FiestaError::SerializationError(e) => format!("Could not render the report: {}", e),
            FiestaError::CsvError(e) => format!("Could not render the CSV report: {}", e),
            FiestaError::UnknownProbe { name } => format!("There is no probe called '{}'", name),
            other => other.to_string(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, FiestaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = FiestaError::UnknownProbe {
            name: "NoSuchError".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.exit_code(), 1);
        assert!(err.user_friendly_message().contains("NoSuchError"));
    }

    #[test]
    fn test_io_errors_are_critical() {
        let err = FiestaError::from(std::io::Error::other("disk gone"));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.exit_code(), 3);
    }
}
