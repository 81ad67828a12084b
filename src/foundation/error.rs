use crate::registry::handle::ResourceKind;
use crate::term::value::Term;

/// Convenience result type used across pixbridge.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Failure taxonomy shared by every boundary entry point.
#[derive(thiserror::Error, Debug)]
pub enum BridgeError {
    /// Argument count, shape, or type does not match the operation's contract.
    #[error("bad argument: {0}")]
    BadArgument(String),

    /// The handle does not resolve to a live registry entry.
    #[error("invalid handle: {0}")]
    InvalidHandle(String),

    /// The handle resolves, but to a different resource kind.
    #[error("type mismatch: expected {expected} handle, got {found}")]
    TypeMismatch {
        /// Kind the operation requires.
        expected: ResourceKind,
        /// Kind the handle actually carries.
        found: ResourceKind,
    },

    /// Native memory, boundary buffer, or registry slot could not be allocated.
    #[error("allocation failure: {0}")]
    Allocation(String),

    /// The image engine or codec collaborator raised a domain error.
    #[error("{0}")]
    Library(String),

    /// A command script ended without reaching an extraction command.
    #[error("script incomplete: {0}")]
    ScriptIncomplete(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BridgeError {
    /// Build a [`BridgeError::BadArgument`] value.
    pub fn bad_argument(msg: impl Into<String>) -> Self {
        Self::BadArgument(msg.into())
    }

    /// Build a [`BridgeError::InvalidHandle`] value.
    pub fn invalid_handle(msg: impl Into<String>) -> Self {
        Self::InvalidHandle(msg.into())
    }

    /// Build a [`BridgeError::Allocation`] value.
    pub fn allocation(msg: impl Into<String>) -> Self {
        Self::Allocation(msg.into())
    }

    /// Build a [`BridgeError::Library`] value.
    pub fn library(msg: impl Into<String>) -> Self {
        Self::Library(msg.into())
    }

    /// Build a [`BridgeError::ScriptIncomplete`] value.
    pub fn script_incomplete(msg: impl Into<String>) -> Self {
        Self::ScriptIncomplete(msg.into())
    }

    /// Stable atom naming the failure class at the boundary.
    pub fn kind_atom(&self) -> &'static str {
        match self {
            Self::BadArgument(_) => "badarg",
            Self::InvalidHandle(_) => "invalid_handle",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::Allocation(_) => "alloc",
            Self::Library(_) => "library",
            Self::ScriptIncomplete(_) => "script_incomplete",
            Self::Other(_) => "other",
        }
    }

    /// Render the failure as the tagged payload `{:error, {kind, "message"}}`.
    pub fn to_term(&self) -> Term {
        let message = match self {
            Self::Library(msg) => msg.clone(),
            // anyhow's alternate form keeps the context chain.
            Self::Other(err) => format!("{err:#}"),
            other => other.to_string(),
        };
        Term::error_tuple(Term::tuple(vec![
            Term::atom(self.kind_atom()),
            Term::string(message),
        ]))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
