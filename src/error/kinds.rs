use std::{fmt, io};

/// Crate-wide `Result` type using [`MentionsError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, MentionsError>;

/// Top-level error type for mention sessions.
#[derive(Debug)]
pub enum MentionsError {
    /// The session was wired to the wrong collaborators.
    Usage(UsageError),

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),

    /// TOML decoding errors from a config file.
    Toml(toml::de::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Programmer misuse, reported at the point of lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// The host element does not contain an editing surface.
    EditorMissing,

    /// The host's editing surface cannot take inserted objects.
    UnsupportedEditor(String),

    /// No session is registered for this owner.
    UnknownSession(u64),

    /// A session is already registered for this owner.
    SessionExists(u64),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for MentionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MentionsError::Usage(e) => write!(f, "Usage error: {e}"),
            MentionsError::Config(e) => write!(f, "Configuration error: {e}"),
            MentionsError::Io(e) => write!(f, "I/O error: {e}"),
            MentionsError::Toml(e) => write!(f, "Invalid TOML: {e}"),
            MentionsError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageError::EditorMissing => write!(f, "no editor element found inside the host"),
            UsageError::UnsupportedEditor(name) => {
                write!(f, "only rich-text editors are supported, found '{name}'")
            }
            UsageError::UnknownSession(id) => write!(f, "no session attached for owner {id}"),
            UsageError::SessionExists(id) => {
                write!(f, "a session is already attached for owner {id}")
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl std::error::Error for MentionsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MentionsError::Io(e) => Some(e),
            MentionsError::Toml(e) => Some(e),
            _ => None,
        }
    }
}
impl std::error::Error for UsageError {}
impl std::error::Error for ConfigError {}

/* ========================= Conversions to MentionsError ========================= */

impl From<io::Error> for MentionsError {
    fn from(err: io::Error) -> Self {
        MentionsError::Io(err)
    }
}

impl From<toml::de::Error> for MentionsError {
    fn from(err: toml::de::Error) -> Self {
        MentionsError::Toml(err)
    }
}

impl From<UsageError> for MentionsError {
    fn from(err: UsageError) -> Self {
        MentionsError::Usage(err)
    }
}

impl From<ConfigError> for MentionsError {
    fn from(err: ConfigError) -> Self {
        MentionsError::Config(err)
    }
}

impl From<String> for MentionsError {
    fn from(msg: String) -> Self {
        MentionsError::Generic(msg)
    }
}

impl From<&str> for MentionsError {
    fn from(msg: &str) -> Self {
        MentionsError::Generic(msg.to_owned())
    }
}
