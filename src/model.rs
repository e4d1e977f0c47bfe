use crate::statics;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a map within the game data collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapId(pub u64);

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u64);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellPos {
    pub x: u32,
    pub y: u32,
}

impl CellPos {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// A tile placed on a map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedTile {
    pub x: u32,
    pub y: u32,
    pub tile: TileId,
}

/// A named behavior unit attached to a map.
///
/// Names are optional in the stored data, but every operation that orders or
/// toggles scripts expects them to be set before the script reaches it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    /// Trigger cells assigned by dropping the script onto the map.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<CellPos>,
}

impl Script {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(statics::EN_UNNAMED)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Tile {
    /// Palette grouping key; tiles without a category share the empty key.
    pub fn category_key(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(statics::EN_UNNAMED)
    }
}

/// Persisted map entity. Missing name and dimensions are filled in by
/// [`MapDocument::normalize`] when the map becomes active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDocument {
    pub id: MapId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default)]
    pub wrap_around: bool,
    #[serde(default)]
    pub scripts: Vec<Script>,
    #[serde(default)]
    pub cells: Vec<PlacedTile>,
}

impl MapDocument {
    /// A fresh, unsaved map. The repository assigns the real id on insertion.
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: MapId(0),
            name: Some(name.into()),
            width: Some(width),
            height: Some(height),
            wrap_around: false,
            scripts: Vec::new(),
            cells: Vec::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(statics::DEFAULT_MAP_NAME)
    }

    /// Fill in missing name/width/height. Returns true if anything changed.
    pub fn normalize(&mut self, defaults: &MapDefaults) -> bool {
        let mut changed = false;
        if self.height.is_none() {
            self.height = Some(defaults.height);
            changed = true;
        }
        if self.width.is_none() {
            self.width = Some(defaults.width);
            changed = true;
        }
        if self.name.is_none() {
            self.name = Some(defaults.name.clone());
            changed = true;
        }
        changed
    }

    pub fn script(&self, name: &str) -> Option<&Script> {
        self.scripts
            .iter()
            .find(|s| s.name.as_deref() == Some(name))
    }

    pub fn script_mut(&mut self, name: &str) -> Option<&mut Script> {
        self.scripts
            .iter_mut()
            .find(|s| s.name.as_deref() == Some(name))
    }
}

/// Values applied to new maps and to maps missing name or dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapDefaults {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl Default for MapDefaults {
    fn default() -> Self {
        Self {
            name: statics::DEFAULT_MAP_NAME.to_string(),
            width: statics::DEFAULT_MAP_WIDTH,
            height: statics::DEFAULT_MAP_HEIGHT,
        }
    }
}
