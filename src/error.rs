use thiserror::Error;

/// Errors raised while evaluating column functions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FunctionError {
    #[error("Type mismatch in column '{column}': expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: String,
    },

    #[error("Invalid regex pattern '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },

    #[error("Cannot parse '{value}' with date format '{format}'")]
    InvalidDate { value: String, format: String },

    #[error("Invalid argument for {function}: {message}")]
    InvalidArgument {
        function: String,
        message: String,
    },

    #[error("Unknown function: {0}")]
    UnknownFunction(String),
}

pub type Result<T> = std::result::Result<T, FunctionError>;

impl FunctionError {
    pub fn invalid_argument(function: &str, message: impl Into<String>) -> Self {
        FunctionError::InvalidArgument {
            function: function.to_string(),
            message: message.into(),
        }
    }
}
