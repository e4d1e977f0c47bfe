//! Core library for TMSE, the Tile Map Session Editor.
//! Manages the single active map editing session of a tile-based game
//! authoring tool and keeps the views that depend on it consistent.

pub mod config;
mod controller;
mod error;
mod game_data;
pub mod logging;
mod model;
pub mod ordering;
mod palette;
mod session;
pub mod statics;
mod view;

pub use config::EditorConfig;
pub use controller::MapEditorController;
pub use error::{BindError, EditorError};
pub use game_data::{DataFormat, GameData, GameDataFile, MapRepository};
pub use model::{CellPos, MapDefaults, MapDocument, MapId, PlacedTile, Rgb, Script, Tile, TileId};
pub use palette::{
    CategoryGroup, PaletteEntry, Platform, TileImage, TileImageProvider, TilePalette,
};
pub use session::{DrawMode, EditingSession, ToolType};
pub use view::{
    ConfirmOutcome, ConfirmTicket, ConfirmationService, EditorSurface, FieldValue,
    MapEditorView, MapEntry, MapField, MapSelectorView, PropertyBinder, ScriptListView,
    ScriptRow, TilePaletteView,
};
