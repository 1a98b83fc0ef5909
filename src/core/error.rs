/// Error Types
///
/// Centralized error handling for the assistant using thiserror. Expected
/// conditions such as a tool that is not connected are never errors; they
/// are rendered as report text by the query router.

use thiserror::Error;

/// All error types that can occur in the business assistant
#[derive(Debug, Error)]
pub enum AssistantError {
    /// Identifier outside the fixed tool enumeration
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Invalid configuration value or file
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, AssistantError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tool_message() {
        let err = AssistantError::UnknownTool("jira".to_string());
        assert_eq!(err.to_string(), "Unknown tool: jira");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AssistantError = io.into();
        assert!(matches!(err, AssistantError::Io(_)));
        assert!(err.to_string().contains("missing"));
    }
}
