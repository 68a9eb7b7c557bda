//! Error types surfaced to callers of the session and storage layers.
//!
//! The tree operations themselves never fail: unknown ids are no-ops.
//! These types exist so the UI can tell the user why an action was refused.

use std::fmt;

/// Why a re-parent request was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// The node was asked to become its own parent.
    SameNode,
    /// The new parent lies inside the moved subtree.
    IntoDescendant,
    UnknownNode(String),
    UnknownParent(String),
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::SameNode => write!(f, "a node cannot become its own parent"),
            MoveError::IntoDescendant => {
                write!(f, "a node cannot be moved under one of its own descendants")
            }
            MoveError::UnknownNode(id) => write!(f, "node '{}' not found", id),
            MoveError::UnknownParent(id) => write!(f, "new parent '{}' not found", id),
        }
    }
}
impl std::error::Error for MoveError {}

/// Why an imported chart was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    InvalidJson(String),
    NotAnObject,
    MissingField(&'static str),
    /// Top-level fields are present but the tree does not decode.
    Malformed(String),
    DuplicateId(String),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::InvalidJson(msg) => write!(f, "invalid JSON: {}", msg),
            ImportError::NotAnObject => write!(f, "chart data must be a JSON object"),
            ImportError::MissingField(field) => write!(f, "chart data is missing '{}'", field),
            ImportError::Malformed(msg) => write!(f, "invalid chart data format: {}", msg),
            ImportError::DuplicateId(id) => write!(f, "node id '{}' appears more than once", id),
        }
    }
}
impl std::error::Error for ImportError {}

/// Failure at the persistence boundary. Always non-fatal for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No backing store (e.g. storage disabled in the browser).
    Unavailable,
    /// The store refused the write (quota exceeded, private mode, ...).
    Write { key: String, msg: String },
    Read { key: String, msg: String },
    Serialize(String),
    Deserialize { key: String, msg: String },
    EmptyName,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable => write!(f, "storage is unavailable"),
            StoreError::Write { key, msg } => write!(f, "failed to write '{}': {}", key, msg),
            StoreError::Read { key, msg } => write!(f, "failed to read '{}': {}", key, msg),
            StoreError::Serialize(msg) => write!(f, "failed to serialize chart: {}", msg),
            StoreError::Deserialize { key, msg } => {
                write!(f, "stored value under '{}' is corrupt: {}", key, msg)
            }
            StoreError::EmptyName => write!(f, "a chart name is required"),
        }
    }
}
impl std::error::Error for StoreError {}

/// Errors returned by `EditorSession` operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    Move(MoveError),
    Import(ImportError),
    Store(StoreError),
    /// No saved chart with this id.
    UnknownChart(String),
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::Move(e) => write!(f, "move refused: {}", e),
            EditError::Import(e) => write!(f, "import failed: {}", e),
            EditError::Store(e) => write!(f, "storage error: {}", e),
            EditError::UnknownChart(id) => write!(f, "saved chart '{}' not found", id),
        }
    }
}

impl std::error::Error for EditError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EditError::Move(e) => Some(e),
            EditError::Import(e) => Some(e),
            EditError::Store(e) => Some(e),
            EditError::UnknownChart(_) => None,
        }
    }
}

impl From<MoveError> for EditError {
    fn from(e: MoveError) -> Self {
        EditError::Move(e)
    }
}

impl From<ImportError> for EditError {
    fn from(e: ImportError) -> Self {
        EditError::Import(e)
    }
}

impl From<StoreError> for EditError {
    fn from(e: StoreError) -> Self {
        EditError::Store(e)
    }
}
