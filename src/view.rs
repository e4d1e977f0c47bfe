//! Capabilities the controller needs from whatever presents it.
//!
//! A GUI implements these over its widgets; tests and the command-line driver
//! implement them over plain records. Nothing here depends on a toolkit.

use crate::error::BindError;
use crate::model::{MapId, Rgb};
use crate::palette::TilePalette;
use crate::session::EditingSession;
use crate::statics;
use std::fmt;

/// Map metadata inputs bound to the active document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapField {
    Name,
    Width,
    Height,
    WrapAround,
}

impl MapField {
    pub const ALL: [MapField; 4] = [
        MapField::Height,
        MapField::Name,
        MapField::Width,
        MapField::WrapAround,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MapField::Name => statics::FIELD_NAME,
            MapField::Width => statics::FIELD_WIDTH,
            MapField::Height => statics::FIELD_HEIGHT,
            MapField::WrapAround => statics::FIELD_WRAP_AROUND,
        }
    }
}

impl fmt::Display for MapField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRow {
    pub name: String,
    pub visible: bool,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEntry {
    pub id: MapId,
    pub name: String,
}

/// Single-use handle for a pending confirmation.
///
/// Not `Clone`: handing it back to the controller consumes it, so at most one
/// outcome can ever be applied.
#[derive(Debug, PartialEq, Eq)]
pub struct ConfirmTicket {
    id: u64,
}

impl ConfirmTicket {
    pub(crate) fn new(id: u64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Confirmed,
    Cancelled,
}

/// Two-way binding between document fields and their inputs.
pub trait PropertyBinder {
    /// Show `value` in the field's input; `None` unbinds it.
    fn bind(&mut self, field: MapField, value: Option<FieldValue>) -> Result<(), BindError>;
    fn set_field_enabled(&mut self, field: MapField, enabled: bool);
}

/// The drawing area a session is attached to.
pub trait EditorSurface {
    fn attach(&mut self, session: &EditingSession);
    /// Release everything the previous `attach` set up.
    fn detach(&mut self);
    fn setup_drag_drop(&mut self, session: &EditingSession);
    fn show_preview(&mut self, session: &EditingSession);
}

pub trait ScriptListView {
    fn show_scripts(&mut self, rows: &[ScriptRow]);
    fn update_script(&mut self, row: &ScriptRow);
    fn clear_script_selection(&mut self);
}

pub trait MapSelectorView {
    fn set_maps(&mut self, maps: &[MapEntry]);
    fn select_map(&mut self, id: Option<MapId>);
    fn selected_map(&self) -> Option<MapId>;
}

pub trait TilePaletteView {
    fn show_palette(&mut self, palette: &TilePalette);
}

/// Asks the user to confirm a destructive action.
///
/// The implementation keeps the ticket until the user answers and then passes
/// it to [`crate::MapEditorController::resolve_confirmation`]. Other events may
/// be handled in between.
pub trait ConfirmationService {
    fn request_confirmation(&mut self, prompt: &str, ticket: ConfirmTicket);
}

/// Everything the controller talks to.
pub trait MapEditorView:
    PropertyBinder
    + EditorSurface
    + ScriptListView
    + MapSelectorView
    + TilePaletteView
    + ConfirmationService
{
}

impl<T> MapEditorView for T where
    T: PropertyBinder
        + EditorSurface
        + ScriptListView
        + MapSelectorView
        + TilePaletteView
        + ConfirmationService
{
}
