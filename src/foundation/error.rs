/// Convenience result type used across strata.
pub type StrataResult<T> = Result<T, StrataError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Every variant reports a programmer error surfaced at the call site; nothing is retried.
#[derive(thiserror::Error, Debug)]
pub enum StrataError {
    /// Invalid configuration value (frame rate, driver options).
    #[error("configuration error: {0}")]
    Config(String),

    /// Operation needs a capability the surface was not built with.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Event kind name outside `click` / `clickOver`.
    #[error("unknown event kind '{0}'")]
    UnknownEvent(String),

    /// Scene graph misuse: cycles, double attach, removing a non-child.
    #[error("scene structure error: {0}")]
    Structure(String),

    /// A node, handler or surface id that is not (or no longer) live.
    #[error("not found: {0}")]
    NotFound(String),

    /// Errors when serializing recorded output.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StrataError {
    /// Build a [`StrataError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`StrataError::Unsupported`] value.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Build a [`StrataError::UnknownEvent`] value.
    pub fn unknown_event(name: impl Into<String>) -> Self {
        Self::UnknownEvent(name.into())
    }

    /// Build a [`StrataError::Structure`] value.
    pub fn structure(msg: impl Into<String>) -> Self {
        Self::Structure(msg.into())
    }

    /// Build a [`StrataError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`StrataError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
