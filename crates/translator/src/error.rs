use std::fmt;

/// Errors raised while turning VTA source into C++.
///
/// `Parsing` covers malformed source (wrong token shape, unknown identifier,
/// unbalanced parens); `Translation` covers source that parses but cannot be
/// lowered (forward reference to a not-yet-assigned slot, a non-numeric
/// token consumed by `read`, a null-sort value escaping into a non-`null`
/// binding).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VtaError {
    Parsing(String),
    Translation(String),
}

impl VtaError {
    pub fn parsing(msg: impl Into<String>) -> Self {
        VtaError::Parsing(msg.into())
    }

    pub fn translation(msg: impl Into<String>) -> Self {
        VtaError::Translation(msg.into())
    }

    pub fn message(&self) -> &str {
        match self {
            VtaError::Parsing(m) | VtaError::Translation(m) => m,
        }
    }
}

impl fmt::Display for VtaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VtaError::Parsing(msg) => write!(f, "parsing error: {msg}"),
            VtaError::Translation(msg) => write!(f, "translation error: {msg}"),
        }
    }
}

impl std::error::Error for VtaError {}

pub type VtaResult<T> = Result<T, VtaError>;
