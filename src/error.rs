use std::path::PathBuf;
use thiserror::Error;

/// Classmap error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsafe entry name '{name}': {reason}")]
    UnsafeName { name: String, reason: String },

    #[error("Path traversal attempt: {0}")]
    PathTraversal(String),

    #[error("Size limit exceeded for {subject}: {actual} bytes (limit {limit} bytes)")]
    SizeLimitExceeded {
        subject: String,
        limit: u64,
        actual: u64,
    },

    #[error("Suspicious compression ratio {ratio:.0}:1 for entry {entry} (possible zip bomb)")]
    SuspiciousCompression { entry: String, ratio: f64 },

    #[error("Parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Renderer failed ({command}), exit code {exit_code:?}: {message}")]
    RendererExecution {
        command: String,
        exit_code: Option<i32>,
        message: String,
    },

    #[error("Renderer timed out after {timeout_secs}s: {command}")]
    RendererTimeout { command: String, timeout_secs: u64 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("Parser error: {0}")]
    Parser(String),
}

/// Result type alias for classmap operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a config validation error
    pub fn config_validation(msg: impl Into<String>) -> Self {
        Error::ConfigValidation(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create an unsafe name error
    pub fn unsafe_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::UnsafeName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a size limit error
    pub fn size_limit(subject: impl Into<String>, limit: u64, actual: u64) -> Self {
        Error::SizeLimitExceeded {
            subject: subject.into(),
            limit,
            actual,
        }
    }

    /// Create a parse error
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a parser error
    pub fn parser(msg: impl Into<String>) -> Self {
        Error::Parser(msg.into())
    }

    /// Create a renderer execution error
    pub fn renderer(command: impl Into<String>, exit_code: Option<i32>, message: impl Into<String>) -> Self {
        Error::RendererExecution {
            command: command.into(),
            exit_code,
            message: message.into(),
        }
    }

    /// Errors that drop a single file or archive entry without aborting the run
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Parse { .. } | Error::UnsafeName { .. } | Error::PathTraversal(_)
        )
    }
}
