use thiserror::Error;

/// Main error type for the section profiler
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfilerError {
    /// Blank section name, or an unnamed end with nothing open
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The section is still running from a previous start
    #[error("Section '{name}' already started")]
    AlreadyStarted { name: String },

    /// No statistics were ever recorded under this name
    #[error("Section '{name}' does not exist")]
    UnknownSection { name: String },

    /// The section exists but is not running
    #[error("Section '{name}' was not started")]
    NotStarted { name: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(String),
}

impl ProfilerError {
    pub fn invalid_argument(message: &str) -> Self {
        ProfilerError::InvalidArgument(message.to_string())
    }

    pub fn already_started(name: &str) -> Self {
        ProfilerError::AlreadyStarted { name: name.to_string() }
    }

    pub fn unknown_section(name: &str) -> Self {
        ProfilerError::UnknownSection { name: name.to_string() }
    }

    pub fn not_started(name: &str) -> Self {
        ProfilerError::NotStarted { name: name.to_string() }
    }
}

impl From<std::io::Error> for ProfilerError {
    fn from(err: std::io::Error) -> Self {
        ProfilerError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ProfilerError {
    fn from(err: serde_json::Error) -> Self {
        ProfilerError::Configuration(err.to_string())
    }
}

/// Result type for profiler operations
pub type ProfilerResult<T> = Result<T, ProfilerError>;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidArgument,
    AlreadyStarted,
    UnknownSection,
    NotStarted,
    ConfigInvalid,
    Io,
}

impl ProfilerError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            ProfilerError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            ProfilerError::AlreadyStarted { .. } => ErrorCode::AlreadyStarted,
            ProfilerError::UnknownSection { .. } => ErrorCode::UnknownSection,
            ProfilerError::NotStarted { .. } => ErrorCode::NotStarted,
            ProfilerError::Configuration(_) => ErrorCode::ConfigInvalid,
            ProfilerError::Io(_) => ErrorCode::Io,
        }
    }

    /// True for the section-pairing bugs a caller makes while instrumenting code.
    pub fn is_misuse(&self) -> bool {
        matches!(
            self.code(),
            ErrorCode::InvalidArgument
                | ErrorCode::AlreadyStarted
                | ErrorCode::UnknownSection
                | ErrorCode::NotStarted
        )
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ProfilerError::AlreadyStarted { name } => {
                format!("Section '{}' already started\n\nEvery start_section call needs a matching end_section before the same name can be started again.", name)
            }
            ProfilerError::UnknownSection { name } => {
                format!("Section '{}' does not exist\n\nend_section was called for a name that was never passed to start_section. Check for typos in the section name.", name)
            }
            ProfilerError::NotStarted { name } => {
                format!("Section '{}' was not started\n\nThe section was already ended. Look for a duplicated end_section call.", name)
            }
            _ => self.to_string(),
        }
    }
}
