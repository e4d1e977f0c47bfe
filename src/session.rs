use crate::model::{CellPos, MapDocument, MapId, PlacedTile, Rgb, Script, TileId};
use crate::statics;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    #[default]
    Pencil1px,
    Pencil3px,
    Pencil5px,
    FilledRect,
    Eraser,
}

impl DrawMode {
    /// Half-width of the square brush stamped by a single draw.
    fn brush_radius(self) -> i64 {
        match self {
            DrawMode::Pencil3px => 1,
            DrawMode::Pencil5px => 2,
            DrawMode::Pencil1px | DrawMode::FilledRect | DrawMode::Eraser => 0,
        }
    }
}

/// Tools that can be dragged from the toolbar onto the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolType {
    Eraser,
}

/// Transient editor state bound to exactly one map.
///
/// Tile placements are edited in memory and only written back to the map
/// document by [`EditingSession::flush_into`]. Scripts and metadata live on
/// the document itself; the session only tracks how they are displayed.
#[derive(Debug, Clone)]
pub struct EditingSession {
    map_id: MapId,
    width: u32,
    height: u32,
    wrap_around: bool,
    cells: HashMap<CellPos, TileId>,
    dirty: bool,
    current_tile: Option<TileId>,
    draw_mode: DrawMode,
    pan_zoom: bool,
    zoom: i32,
    scroll: (i64, i64),
    hidden_scripts: HashSet<String>,
}

impl EditingSession {
    pub fn new(doc: &MapDocument) -> Self {
        let cells = doc
            .cells
            .iter()
            .map(|p| (CellPos::new(p.x, p.y), p.tile))
            .collect();
        Self {
            map_id: doc.id,
            width: doc.width.unwrap_or(statics::DEFAULT_MAP_WIDTH),
            height: doc.height.unwrap_or(statics::DEFAULT_MAP_HEIGHT),
            wrap_around: doc.wrap_around,
            cells,
            dirty: false,
            current_tile: None,
            draw_mode: DrawMode::default(),
            pan_zoom: false,
            zoom: 0,
            scroll: (0, 0),
            hidden_scripts: HashSet::new(),
        }
    }

    pub fn map_id(&self) -> MapId {
        self.map_id
    }

    /// Pick up metadata edits made on the document while the session is open.
    pub fn sync_dimensions(&mut self, doc: &MapDocument) {
        self.width = doc.width.unwrap_or(self.width);
        self.height = doc.height.unwrap_or(self.height);
        self.wrap_around = doc.wrap_around;
    }

    pub fn current_tile(&self) -> Option<TileId> {
        self.current_tile
    }

    pub fn set_current_tile(&mut self, tile: Option<TileId>) {
        self.current_tile = tile;
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    pub fn set_draw_mode(&mut self, mode: DrawMode) {
        self.draw_mode = mode;
    }

    pub fn pan_zoom_enabled(&self) -> bool {
        self.pan_zoom
    }

    pub fn toggle_pan_zoom(&mut self) -> bool {
        self.pan_zoom = !self.pan_zoom;
        self.pan_zoom
    }

    pub fn zoom(&self) -> i32 {
        self.zoom
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + 1).min(statics::ZOOM_MAX);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - 1).max(statics::ZOOM_MIN);
    }

    pub fn scroll_offset(&self) -> (i64, i64) {
        self.scroll
    }

    pub fn scroll_by(&mut self, dx: i64, dy: i64) {
        self.scroll.0 += dx;
        self.scroll.1 += dy;
    }

    pub fn is_script_visible(&self, script: &Script) -> bool {
        match &script.name {
            Some(name) => !self.hidden_scripts.contains(name),
            None => true,
        }
    }

    /// Unnamed scripts cannot be tracked and are always shown.
    pub fn set_script_visible(&mut self, script: &Script, visible: bool) {
        let Some(name) = &script.name else {
            return;
        };
        if visible {
            self.hidden_scripts.remove(name);
        } else {
            self.hidden_scripts.insert(name.clone());
        }
    }

    /// The script's own color, or one picked by its position in the list.
    pub fn script_color(&self, script: &Script, position: usize) -> Rgb {
        script.color.unwrap_or_else(|| {
            let (r, g, b) = statics::SCRIPT_COLORS[position % statics::SCRIPT_COLORS.len()];
            Rgb(r, g, b)
        })
    }

    pub fn tile_at(&self, cell: CellPos) -> Option<TileId> {
        self.cells.get(&cell).copied()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Map signed coordinates onto the map, wrapping or clipping at the edges.
    pub fn resolve(&self, x: i64, y: i64) -> Option<CellPos> {
        let (w, h) = (i64::from(self.width), i64::from(self.height));
        if w == 0 || h == 0 {
            return None;
        }
        if self.wrap_around {
            let x = u32::try_from(x.rem_euclid(w)).ok()?;
            let y = u32::try_from(y.rem_euclid(h)).ok()?;
            return Some(CellPos::new(x, y));
        }
        if x < 0 || y < 0 || x >= w || y >= h {
            return None;
        }
        Some(CellPos::new(u32::try_from(x).ok()?, u32::try_from(y).ok()?))
    }

    /// Apply the current draw mode at a cell. Returns how many cells changed.
    pub fn draw_at(&mut self, x: i64, y: i64) -> usize {
        let radius = self.draw_mode.brush_radius();
        let mut changed = 0;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if let Some(cell) = self.resolve(x + dx, y + dy) {
                    if self.paint(cell) {
                        changed += 1;
                    }
                }
            }
        }
        changed
    }

    /// Paint every cell in the rectangle spanned by two corners.
    pub fn fill_rect(&mut self, from: (i64, i64), to: (i64, i64)) -> usize {
        let (x0, x1) = (from.0.min(to.0), from.0.max(to.0));
        let (y0, y1) = (from.1.min(to.1), from.1.max(to.1));
        let mut changed = 0;
        for y in y0..=y1 {
            for x in x0..=x1 {
                if let Some(cell) = self.resolve(x, y) {
                    if self.paint(cell) {
                        changed += 1;
                    }
                }
            }
        }
        changed
    }

    fn paint(&mut self, cell: CellPos) -> bool {
        let changed = if self.draw_mode == DrawMode::Eraser {
            self.cells.remove(&cell).is_some()
        } else {
            let Some(tile) = self.current_tile else {
                return false;
            };
            self.cells.insert(cell, tile) != Some(tile)
        };
        self.dirty |= changed;
        changed
    }

    /// Write pending tile edits back into the map document.
    pub fn flush_into(&mut self, doc: &mut MapDocument) {
        let mut cells: Vec<PlacedTile> = self
            .cells
            .iter()
            .map(|(pos, tile)| PlacedTile {
                x: pos.x,
                y: pos.y,
                tile: *tile,
            })
            .collect();
        cells.sort_by_key(|p| (p.y, p.x));
        doc.cells = cells;
        self.dirty = false;
    }
}
