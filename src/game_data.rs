use crate::model::{MapDocument, MapId, Tile};
use anyhow::Context;
use flate2::{Compression, GzBuilder, read::GzDecoder};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::{Read, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Ordered, mutable collection of maps plus the tile set they draw with.
///
/// The controller only ever sees game data through this trait, so tests can
/// hand it any in-memory collection.
pub trait MapRepository {
    fn maps(&self) -> &[MapDocument];
    fn map_mut(&mut self, id: MapId) -> Option<&mut MapDocument>;
    /// Append a map, assigning it an id no other map has had in this collection.
    fn push_map(&mut self, doc: MapDocument) -> MapId;
    fn remove_map(&mut self, id: MapId) -> Option<MapDocument>;
    fn tiles(&self) -> &[Tile];

    fn map(&self, id: MapId) -> Option<&MapDocument> {
        self.maps().iter().find(|m| m.id == id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameData {
    #[serde(default)]
    pub maps: Vec<MapDocument>,
    #[serde(default)]
    pub tiles: Vec<Tile>,
    /// Lower bound for the next allocated id. Never moves backwards, so ids
    /// of removed maps are not handed out again.
    #[serde(skip)]
    next_id: u64,
}

impl GameData {
    fn allocate_map_id(&mut self) -> MapId {
        let above_existing = self.maps.iter().map(|m| m.id.0).max().map_or(1, |max| max + 1);
        let id = self.next_id.max(above_existing);
        self.next_id = id + 1;
        MapId(id)
    }
}

// Content equality; the id allocator is bookkeeping.
impl PartialEq for GameData {
    fn eq(&self, other: &Self) -> bool {
        self.maps == other.maps && self.tiles == other.tiles
    }
}

impl MapRepository for GameData {
    fn maps(&self) -> &[MapDocument] {
        &self.maps
    }

    fn map_mut(&mut self, id: MapId) -> Option<&mut MapDocument> {
        self.maps.iter_mut().find(|m| m.id == id)
    }

    fn push_map(&mut self, mut doc: MapDocument) -> MapId {
        let id = self.allocate_map_id();
        doc.id = id;
        self.maps.push(doc);
        id
    }

    fn remove_map(&mut self, id: MapId) -> Option<MapDocument> {
        let idx = self.maps.iter().position(|m| m.id == id)?;
        Some(self.maps.remove(idx))
    }

    fn tiles(&self) -> &[Tile] {
        &self.tiles
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json5,
    GzipJson5,
}

impl DataFormat {
    /// Plain text unless the path ends in `.gz` or the bytes carry the gzip magic.
    pub fn detect(path: &Path, bytes: &[u8]) -> Self {
        if path.extension().and_then(|e| e.to_str()) == Some("gz") || bytes.starts_with(&[0x1F, 0x8B]) {
            DataFormat::GzipJson5
        } else {
            DataFormat::Json5
        }
    }

    fn for_path(path: &Path) -> Self {
        Self::detect(path, &[])
    }
}

/// Game data tied to the file it came from.
///
/// JSON5 is read, pretty JSON is written; comments and formatting of a
/// hand-written file do not survive a save, so callers only save after a
/// real change. Dirtiness is decided by content, not bytes.
#[derive(Debug, Clone)]
pub struct GameDataFile {
    pub source_path: Option<PathBuf>,
    pub format: DataFormat,
    pub data: GameData,
    saved: Option<GameData>,
}

impl GameDataFile {
    /// Wrap data that has never been on disk.
    pub fn new(data: GameData) -> Self {
        Self {
            source_path: None,
            format: DataFormat::Json5,
            data,
            saved: None,
        }
    }

    pub fn load_path(path: &Path) -> anyhow::Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("reading {path:?}"))?;
        let format = DataFormat::detect(path, &bytes);
        let text_bytes = match format {
            DataFormat::Json5 => bytes,
            DataFormat::GzipJson5 => {
                let mut decoder = GzDecoder::new(&bytes[..]);
                let mut out = Vec::new();
                decoder.read_to_end(&mut out).context("gzip decompress")?;
                out
            }
        };

        let text =
            std::str::from_utf8(&text_bytes).context("game data file is not valid UTF-8")?;
        let data: GameData = json5::from_str(text).context("parsing JSON5")?;
        info!(
            path = %path.display(),
            maps = data.maps.len(),
            tiles = data.tiles.len(),
            "game_data_loaded"
        );

        Ok(Self {
            source_path: Some(path.to_path_buf()),
            format,
            saved: Some(data.clone()),
            data,
        })
    }

    /// True when `data` differs from what was last loaded or saved.
    pub fn is_dirty(&self) -> bool {
        self.saved.as_ref() != Some(&self.data)
    }

    pub fn to_bytes(&self, format: DataFormat) -> anyhow::Result<Vec<u8>> {
        let mut text = serde_json::to_string_pretty(&self.data).context("serializing game data")?;
        text.push('\n');
        match format {
            DataFormat::Json5 => Ok(text.into_bytes()),
            DataFormat::GzipJson5 => {
                // mtime 0 keeps the output identical for identical data.
                let mut encoder = GzBuilder::new()
                    .mtime(0)
                    .write(Vec::new(), Compression::default());
                encoder.write_all(text.as_bytes()).context("gzip compress")?;
                encoder.finish().context("gzip finish")
            }
        }
    }

    pub fn save_to_path(&mut self, path: &Path) -> anyhow::Result<()> {
        let format = DataFormat::for_path(path);
        let bytes = self.to_bytes(format)?;
        fs::write(path, &bytes).with_context(|| format!("writing {path:?}"))?;
        debug!(path = %path.display(), bytes = bytes.len(), "game_data_saved");

        self.source_path = Some(path.to_path_buf());
        self.format = format;
        self.saved = Some(self.data.clone());
        Ok(())
    }
}
