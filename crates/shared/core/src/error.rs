use thiserror::Error;

/// Errors shared by every Agora stage.
///
/// Configuration and shape errors are raised before any state is created.
/// Numerical errors are raised by statistics helpers and are usually
/// recovered by the caller (a degenerate window degrades to zero spillover).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgoraError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Data shape error: {0}")]
    DataShape(String),

    #[error("Numerical error: {0}")]
    Numerical(String),
}

impl AgoraError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn data_shape(msg: impl Into<String>) -> Self {
        Self::DataShape(msg.into())
    }

    pub fn numerical(msg: impl Into<String>) -> Self {
        Self::Numerical(msg.into())
    }

    /// Whether the error may be recovered locally by degrading one window
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Numerical(_))
    }
}

pub type Result<T> = std::result::Result<T, AgoraError>;
