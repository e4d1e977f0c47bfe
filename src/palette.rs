//! Tile palette: the tile set grouped by category, with a single selected tile.

use crate::model::{Tile, TileId};
use crate::statics;
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::warn;

/// Target platform the tile artwork is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum Platform {
    #[default]
    AppleII,
    AppleIIgs,
    C64,
}

/// Renderable RGBA image of a tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Renders tiles for display. Implementations must not mutate anything.
pub trait TileImageProvider {
    fn tile_image(&self, tile: &Tile, platform: Platform) -> anyhow::Result<TileImage>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    pub tile: TileId,
    pub label: String,
    pub image: Option<TileImage>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup {
    /// Grouping key; empty for uncategorized tiles.
    pub key: String,
    pub label: String,
    pub entries: Vec<PaletteEntry>,
    /// Set on the group holding the selected tile.
    pub emphasized: bool,
}

impl CategoryGroup {
    fn contains(&self, tile: TileId) -> bool {
        self.entries.iter().any(|e| e.tile == tile)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TilePalette {
    groups: IndexMap<String, CategoryGroup>,
    selected: Option<TileId>,
}

impl TilePalette {
    /// Bucket tiles by category in first-seen order and mark `selected`.
    pub fn rebuild<P: TileImageProvider + ?Sized>(
        tiles: &[Tile],
        provider: &P,
        platform: Platform,
        selected: Option<TileId>,
    ) -> Self {
        let mut groups: IndexMap<String, CategoryGroup> = IndexMap::new();
        let mut seen = HashSet::new();
        for tile in tiles {
            // First definition of an id wins; selection is by id.
            if !seen.insert(tile.id) {
                warn!(tile_id = %tile.id, "duplicate_tile_skipped");
                continue;
            }
            let image = match provider.tile_image(tile, platform) {
                Ok(image) => Some(image),
                Err(error) => {
                    warn!(tile_id = %tile.id, error = %error, "tile_image_failed");
                    None
                }
            };
            let key = tile.category_key();
            let group = groups
                .entry(key.to_string())
                .or_insert_with(|| CategoryGroup {
                    key: key.to_string(),
                    label: if key.is_empty() {
                        statics::EN_UNCATEGORIZED.to_string()
                    } else {
                        key.to_string()
                    },
                    entries: Vec::new(),
                    emphasized: false,
                });
            group.entries.push(PaletteEntry {
                tile: tile.id,
                label: tile.display_name().to_string(),
                image,
                selected: false,
            });
        }

        let mut palette = Self {
            groups,
            selected: None,
        };
        if let Some(tile) = selected {
            palette.select(tile);
        }
        palette
    }

    pub fn groups(&self) -> impl Iterator<Item = &CategoryGroup> {
        self.groups.values()
    }

    pub fn group(&self, key: &str) -> Option<&CategoryGroup> {
        self.groups.get(key)
    }

    pub fn selected_tile(&self) -> Option<TileId> {
        self.selected
    }

    pub fn category_of(&self, tile: TileId) -> Option<&str> {
        self.groups
            .values()
            .find(|g| g.contains(tile))
            .map(|g| g.key.as_str())
    }

    pub fn emphasized_category(&self) -> Option<&str> {
        self.groups
            .values()
            .find(|g| g.emphasized)
            .map(|g| g.key.as_str())
    }

    /// Make `tile` the only selected entry. Unknown tiles leave the palette unchanged.
    pub fn select(&mut self, tile: TileId) -> bool {
        if self.category_of(tile).is_none() {
            return false;
        }
        for group in self.groups.values_mut() {
            group.emphasized = group.contains(tile);
            for entry in &mut group.entries {
                entry.selected = entry.tile == tile;
            }
        }
        self.selected = Some(tile);
        true
    }
}
