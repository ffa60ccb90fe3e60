//! Crate-wide error type.
//!
//! Every failure is deterministic in the inputs, so there is nothing to retry:
//! errors surface immediately and the binary maps each variant to an exit code.

pub enum AppError {
    /// Bad argument shape or value, raised before any extraction work.
    Validation(String),
    /// A model could not be tidied or glanced. `model` is the 1-based position.
    Adapter { model: usize, message: String },
    /// Malformed format specifier or unparseable numeric value.
    Format(String),
    /// File read/write failure, passed through unchanged.
    Io(std::io::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn adapter(model: usize, message: impl Into<String>) -> Self {
        AppError::Adapter {
            model,
            message: message.into(),
        }
    }

    pub fn format(message: impl Into<String>) -> Self {
        AppError::Format(message.into())
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Validation(_) => 2,
            AppError::Adapter { .. } => 3,
            AppError::Format(_) => 4,
            AppError::Io(_) => 5,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Validation(message) => write!(f, "Invalid argument: {message}"),
            AppError::Adapter { model, message } => write!(f, "Model {model}: {message}"),
            AppError::Format(message) => write!(f, "Format error: {message}"),
            AppError::Io(err) => write!(f, "{err}"),
        }
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Validation(message) => f.debug_tuple("Validation").field(message).finish(),
            AppError::Adapter { model, message } => f
                .debug_struct("Adapter")
                .field("model", model)
                .field("message", message)
                .finish(),
            AppError::Format(message) => f.debug_tuple("Format").field(message).finish(),
            AppError::Io(err) => f.debug_tuple("Io").field(err).finish(),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Io(err) => Some(err),
            _ => None,
        }
    }
}
