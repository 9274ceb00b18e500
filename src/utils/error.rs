use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Failed to connect to statistical engine: {message}")]
    ConnectionError { message: String },

    #[error("Remote evaluation failed for `{expr}`: {message}")]
    EvalError { expr: String, message: String },

    #[error("Remote result for `{expr}` has the wrong shape: expected {expected}, got {actual}")]
    MismatchError {
        expr: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("HTTP transport error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

/// 錯誤分類：兩種致命的遠端錯誤加上環境層的錯誤
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Connection,
    RemoteEvaluation,
    Configuration,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AnalyzerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AnalyzerError::ConnectionError { .. } | AnalyzerError::HttpError(_) => {
                ErrorCategory::Connection
            }
            AnalyzerError::EvalError { .. }
            | AnalyzerError::MismatchError { .. }
            | AnalyzerError::SerializationError(_) => ErrorCategory::RemoteEvaluation,
            AnalyzerError::ConfigValidationError { .. }
            | AnalyzerError::InvalidConfigValueError { .. }
            | AnalyzerError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AnalyzerError::IoError(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Connection => ErrorSeverity::Critical,
            ErrorCategory::RemoteEvaluation => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Medium,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self.category() {
            ErrorCategory::Connection => {
                "Check that the statistical engine is running and --engine-url points at it"
                    .to_string()
            }
            ErrorCategory::RemoteEvaluation => {
                "Check that the dataset URL is reachable from the engine and the column names match"
                    .to_string()
            }
            ErrorCategory::Configuration => {
                "Fix the configuration value and run again (see --help)".to_string()
            }
            ErrorCategory::Io => "Check the console streams and retry".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Connection => {
                format!("Could not reach the statistical engine: {}", self)
            }
            ErrorCategory::RemoteEvaluation => {
                format!("The regression could not be completed: {}", self)
            }
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Io => format!("Console problem: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
