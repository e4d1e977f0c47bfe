use crate::model::MapId;
use crate::ordering::ScriptOrderError;
use crate::view::MapField;

/// Errors returned by controller operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    /// The operation exists in the UI but has no implementation yet.
    #[error("{0} is not supported yet")]
    NotSupported(&'static str),
    #[error("no map is being edited")]
    NoActiveMap,
    #[error("map {0} is not in the game data")]
    UnknownMap(MapId),
    #[error("script name must not be empty")]
    EmptyScriptName,
    #[error("map already has a script named '{0}'")]
    DuplicateScript(String),
    #[error("map has no script named '{0}'")]
    UnknownScript(String),
    #[error("invalid value {value:?} for {field}")]
    InvalidFieldValue { field: MapField, value: String },
    #[error("confirmation {0} is not pending")]
    UnknownConfirmation(u64),
    #[error(transparent)]
    ScriptOrder(#[from] ScriptOrderError),
}

/// A view failed to bind a document field to its input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot bind {field}: {reason}")]
pub struct BindError {
    pub field: MapField,
    pub reason: String,
}
