//! The map editing session manager.
//!
//! Owns the single active [`EditingSession`] and keeps the metadata fields,
//! script list, map selector and tile palette in step with it. All methods
//! take `&mut self`; the controller is driven from one event thread.

use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::game_data::MapRepository;
use crate::model::{MapDocument, MapId, Script, TileId};
use crate::ordering;
use crate::palette::{TileImageProvider, TilePalette};
use crate::session::{DrawMode, EditingSession, ToolType};
use crate::statics;
use crate::view::{
    ConfirmOutcome, ConfirmTicket, FieldValue, MapEditorView, MapEntry, MapField, ScriptRow,
};
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

pub struct MapEditorController<R, V> {
    repo: R,
    view: V,
    config: EditorConfig,
    session: Option<EditingSession>,
    palette: TilePalette,
    pending_deletions: HashMap<u64, MapId>,
    next_ticket: u64,
}

impl<R: MapRepository, V: MapEditorView> MapEditorController<R, V> {
    /// Starts with no active map; call [`Self::set_current_map`] or
    /// [`Self::on_map_selected`] to begin editing.
    pub fn new(repo: R, view: V, config: EditorConfig) -> Self {
        Self {
            repo,
            view,
            config,
            session: None,
            palette: TilePalette::default(),
            pending_deletions: HashMap::new(),
            next_ticket: 0,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&EditingSession> {
        self.session.as_ref()
    }

    pub fn palette(&self) -> &TilePalette {
        &self.palette
    }

    /// Flush pending edits and hand back the repository and view.
    pub fn into_parts(mut self) -> (R, V) {
        self.complete_inflight_operations();
        (self.repo, self.view)
    }

    pub fn current_map_id(&self) -> Option<MapId> {
        self.session.as_ref().map(EditingSession::map_id)
    }

    pub fn current_map(&self) -> Option<&MapDocument> {
        self.repo.map(self.current_map_id()?)
    }

    /// Switch the active map. Passing the already active map does nothing.
    pub fn set_current_map(&mut self, id: Option<MapId>) {
        if id.is_some() && id == self.current_map_id() {
            return;
        }

        let mut carried_tile = None;
        if let Some(mut old) = self.session.take() {
            carried_tile = old.current_tile();
            if old.is_dirty() {
                if let Some(doc) = self.repo.map_mut(old.map_id()) {
                    old.flush_into(doc);
                }
            }
            self.view.detach();
            debug!(map_id = %old.map_id(), "session_released");
        }

        let target = id.filter(|id| {
            let known = self.repo.map(*id).is_some();
            if !known {
                warn!(map_id = %id, "unknown_map_selected");
            }
            known
        });

        match target {
            Some(id) => self.activate(id, carried_tile),
            None => self.clear_fields(),
        }
        self.redraw_map_scripts();
    }

    fn activate(&mut self, id: MapId, carried_tile: Option<TileId>) {
        let Some(doc) = self.repo.map_mut(id) else {
            return;
        };
        if let Err(error) = ordering::sort_scripts(&mut doc.scripts) {
            warn!(map_id = %id, error = %error, "script_sort_failed");
        }
        doc.normalize(&self.config.map_defaults);

        let values = field_values(doc);
        let name = doc.display_name().to_string();
        let mut session = EditingSession::new(doc);

        for field in MapField::ALL {
            self.view.set_field_enabled(field, true);
        }
        for (field, value) in values {
            if let Err(error) = self.view.bind(field, Some(value)) {
                error!(field = %field, error = %error, "field_bind_failed");
            }
        }

        self.view.attach(&session);
        self.view.setup_drag_drop(&session);
        if carried_tile.is_some() {
            session.set_current_tile(carried_tile);
        }
        info!(map_id = %id, name = %name, "map_activated");
        self.session = Some(session);
    }

    fn clear_fields(&mut self) {
        for field in MapField::ALL {
            if let Err(error) = self.view.bind(field, None) {
                error!(field = %field, error = %error, "field_unbind_failed");
            }
            self.view.set_field_enabled(field, false);
        }
        debug!("no_active_map");
    }

    /// Write the active session's pending tile edits into its map.
    pub fn complete_inflight_operations(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(doc) = self.repo.map_mut(session.map_id()) {
            session.flush_into(doc);
        }
    }

    pub fn on_map_create_pressed(&mut self) -> MapId {
        let defaults = &self.config.map_defaults;
        let doc = MapDocument::new(defaults.name.clone(), defaults.width, defaults.height);
        let id = self.repo.push_map(doc);
        info!(map_id = %id, "map_created");
        self.set_current_map(Some(id));
        self.rebuild_map_selectors();
        id
    }

    /// Ask to delete the active map. Returns false when there is nothing to delete.
    ///
    /// Nothing changes until the ticket comes back through
    /// [`Self::resolve_confirmation`] as confirmed.
    pub fn on_map_delete_pressed(&mut self) -> bool {
        let Some(doc) = self.current_map() else {
            return false;
        };
        let map_id = doc.id;
        let prompt = statics::delete_map_prompt(doc.display_name());

        self.next_ticket += 1;
        let ticket = ConfirmTicket::new(self.next_ticket);
        self.pending_deletions.insert(ticket.id(), map_id);
        debug!(map_id = %map_id, ticket = ticket.id(), "delete_confirmation_requested");
        self.view.request_confirmation(&prompt, ticket);
        true
    }

    pub fn resolve_confirmation(
        &mut self,
        ticket: ConfirmTicket,
        outcome: ConfirmOutcome,
    ) -> Result<(), EditorError> {
        let map_id = self
            .pending_deletions
            .remove(&ticket.id())
            .ok_or(EditorError::UnknownConfirmation(ticket.id()))?;

        match outcome {
            ConfirmOutcome::Cancelled => {
                debug!(map_id = %map_id, "map_delete_cancelled");
            }
            ConfirmOutcome::Confirmed => {
                if self.current_map_id() == Some(map_id) {
                    self.set_current_map(None);
                }
                if self.repo.remove_map(map_id).is_some() {
                    info!(map_id = %map_id, "map_deleted");
                }
                // Other prompts for the same map have nothing left to delete.
                self.pending_deletions.retain(|_, pending| *pending != map_id);
                self.rebuild_map_selectors();
            }
        }
        Ok(())
    }

    pub fn on_map_selected(&mut self) {
        let selected = self.view.selected_map();
        self.set_current_map(selected);
    }

    pub fn rebuild_map_selectors(&mut self) {
        let entries: Vec<MapEntry> = self
            .repo
            .maps()
            .iter()
            .map(|m| MapEntry {
                id: m.id,
                name: m.display_name().to_string(),
            })
            .collect();
        self.view.set_maps(&entries);
        let current = self.current_map_id();
        self.view.select_map(current);
    }

    /// Apply an edit made in one of the metadata inputs to the active map.
    pub fn on_field_edited(&mut self, field: MapField, value: FieldValue) -> Result<(), EditorError> {
        let id = self.current_map_id().ok_or(EditorError::NoActiveMap)?;
        let doc = self.repo.map_mut(id).ok_or(EditorError::UnknownMap(id))?;

        match (field, value) {
            (MapField::Name, FieldValue::Text(text)) => doc.name = Some(text),
            (MapField::Width, FieldValue::Text(text)) => {
                doc.width = Some(parse_dimension(field, &text)?);
            }
            (MapField::Height, FieldValue::Text(text)) => {
                doc.height = Some(parse_dimension(field, &text)?);
            }
            (MapField::WrapAround, FieldValue::Flag(flag)) => doc.wrap_around = flag,
            (MapField::WrapAround, FieldValue::Text(text)) => {
                doc.wrap_around = text.trim().parse::<bool>().map_err(|_| {
                    EditorError::InvalidFieldValue {
                        field,
                        value: text.clone(),
                    }
                })?;
            }
            (_, FieldValue::Flag(flag)) => {
                return Err(EditorError::InvalidFieldValue {
                    field,
                    value: flag.to_string(),
                });
            }
        }

        if let Some(session) = self.session.as_mut() {
            session.sync_dimensions(doc);
        }
        debug!(map_id = %id, field = %field, "map_field_edited");
        if field == MapField::Name {
            self.rebuild_map_selectors();
        }
        Ok(())
    }

    pub fn on_map_clone_pressed(&mut self) -> Result<(), EditorError> {
        Err(EditorError::NotSupported(statics::EN_OP_CLONE_MAP))
    }

    pub fn on_map_export_pressed(&mut self) -> Result<(), EditorError> {
        Err(EditorError::NotSupported(statics::EN_OP_EXPORT_MAP))
    }

    pub fn on_map_script_clone_pressed(&mut self) -> Result<(), EditorError> {
        Err(EditorError::NotSupported(statics::EN_OP_CLONE_SCRIPT))
    }

    pub fn on_map_script_delete_pressed(&mut self) -> Result<(), EditorError> {
        Err(EditorError::NotSupported(statics::EN_OP_DELETE_SCRIPT))
    }

    // Editor surface commands. Without an active session these do nothing.

    fn with_session(&mut self, op: &'static str, f: impl FnOnce(&mut EditingSession)) {
        match self.session.as_mut() {
            Some(session) => f(session),
            None => debug!(op, "ignored_without_session"),
        }
    }

    pub fn set_draw_mode(&mut self, mode: DrawMode) {
        self.with_session("set_draw_mode", |s| s.set_draw_mode(mode));
    }

    pub fn toggle_pan_zoom(&mut self) {
        self.with_session("toggle_pan_zoom", |s| {
            s.toggle_pan_zoom();
        });
    }

    pub fn zoom_in(&mut self) {
        self.with_session("zoom_in", EditingSession::zoom_in);
    }

    pub fn zoom_out(&mut self) {
        self.with_session("zoom_out", EditingSession::zoom_out);
    }

    pub fn scroll_by(&mut self, dx: i64, dy: i64) {
        self.with_session("scroll_by", |s| s.scroll_by(dx, dy));
    }

    pub fn scroll_map_up(&mut self) {
        self.scroll_by(0, -1);
    }

    pub fn scroll_map_down(&mut self) {
        self.scroll_by(0, 1);
    }

    pub fn scroll_map_left(&mut self) {
        self.scroll_by(-1, 0);
    }

    pub fn scroll_map_right(&mut self) {
        self.scroll_by(1, 0);
    }

    pub fn on_map_preview_pressed(&mut self) {
        match self.session.as_ref() {
            Some(session) => self.view.show_preview(session),
            None => debug!(op = "show_preview", "ignored_without_session"),
        }
    }

    /// Apply the current draw mode at a cell; returns how many cells changed.
    pub fn draw_at(&mut self, x: i64, y: i64) -> usize {
        let mut changed = 0;
        self.with_session("draw_at", |s| changed = s.draw_at(x, y));
        changed
    }

    pub fn fill_rect(&mut self, from: (i64, i64), to: (i64, i64)) -> usize {
        let mut changed = 0;
        self.with_session("fill_rect", |s| changed = s.fill_rect(from, to));
        changed
    }

    // Tile palette.

    /// Regroup the tile set and show it, keeping the session's current tile selected.
    pub fn rebuild_tile_selectors<P: TileImageProvider + ?Sized>(&mut self, provider: &P) {
        let selected = self.session.as_ref().and_then(EditingSession::current_tile);
        let palette =
            TilePalette::rebuild(self.repo.tiles(), provider, self.config.platform, selected);
        self.view.show_palette(&palette);
        self.palette = palette;
    }

    /// Select a palette tile and make it the session's drawing tile.
    pub fn on_tile_selected(&mut self, tile: TileId) -> bool {
        if !self.palette.select(tile) {
            warn!(tile_id = %tile, "unknown_tile_selected");
            return false;
        }
        if let Some(session) = self.session.as_mut() {
            session.set_current_tile(Some(tile));
        }
        self.view.show_palette(&self.palette);
        true
    }

    // Scripts.

    /// Rebuild the script list from the active map, in display order.
    pub fn redraw_map_scripts(&mut self) {
        let Some(session) = self.session.as_ref() else {
            self.view.show_scripts(&[]);
            return;
        };
        let Some(doc) = self.repo.map_mut(session.map_id()) else {
            self.view.show_scripts(&[]);
            return;
        };
        if let Err(error) = ordering::sort_scripts(&mut doc.scripts) {
            warn!(map_id = %doc.id, error = %error, "script_sort_failed");
        }
        let rows: Vec<ScriptRow> = doc
            .scripts
            .iter()
            .enumerate()
            .map(|(i, script)| script_row(session, script, i))
            .collect();
        self.view.show_scripts(&rows);
    }

    pub fn on_map_script_add_pressed(&mut self, name: &str) -> Result<(), EditorError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditorError::EmptyScriptName);
        }
        let id = self.current_map_id().ok_or(EditorError::NoActiveMap)?;
        let doc = self.repo.map_mut(id).ok_or(EditorError::UnknownMap(id))?;
        if doc.script(name).is_some() {
            return Err(EditorError::DuplicateScript(name.to_string()));
        }
        doc.scripts.push(Script::named(name));
        info!(map_id = %id, script = name, "script_added");
        self.redraw_map_scripts();
        Ok(())
    }

    /// Visibility of a script in the active session; visible when no session.
    pub fn is_script_visible(&self, script: &Script) -> bool {
        self.session
            .as_ref()
            .is_none_or(|s| s.is_script_visible(script))
    }

    pub fn set_script_visible(&mut self, script: &Script, visible: bool) {
        self.with_session("set_script_visible", |s| {
            s.set_script_visible(script, visible);
        });
    }

    /// Flip a script's visibility, refresh its row and drop the list highlight.
    /// Returns the new state, or `None` if there is no such script to toggle.
    pub fn toggle_script_visibility(&mut self, name: &str) -> Option<bool> {
        let session = self.session.as_mut()?;
        let doc = self.repo.map(session.map_id())?;
        let position = doc
            .scripts
            .iter()
            .position(|s| s.name.as_deref() == Some(name))?;
        let script = &doc.scripts[position];

        let visible = !session.is_script_visible(script);
        session.set_script_visible(script, visible);
        let row = script_row(session, script, position);
        self.view.update_script(&row);
        self.view.clear_script_selection();
        debug!(script = name, visible, "script_visibility_toggled");
        Some(visible)
    }

    /// A script dragged onto the map becomes triggered at that cell.
    pub fn on_script_dropped(&mut self, name: &str, x: i64, y: i64) -> Result<bool, EditorError> {
        let session = self.session.as_ref().ok_or(EditorError::NoActiveMap)?;
        let Some(cell) = session.resolve(x, y) else {
            return Ok(false);
        };
        let id = session.map_id();
        let doc = self.repo.map_mut(id).ok_or(EditorError::UnknownMap(id))?;
        let script = doc
            .script_mut(name)
            .ok_or_else(|| EditorError::UnknownScript(name.to_string()))?;
        if script.locations.contains(&cell) {
            return Ok(false);
        }
        script.locations.push(cell);
        debug!(map_id = %id, script = name, x = cell.x, y = cell.y, "script_location_added");
        Ok(true)
    }

    /// A tool dragged onto the map. Returns how many script triggers it removed.
    pub fn on_tool_dropped(&mut self, tool: ToolType, x: i64, y: i64) -> usize {
        let Some(session) = self.session.as_ref() else {
            return 0;
        };
        let Some(cell) = session.resolve(x, y) else {
            return 0;
        };
        let Some(doc) = self.repo.map_mut(session.map_id()) else {
            return 0;
        };
        match tool {
            ToolType::Eraser => {
                let mut removed = 0;
                for script in &mut doc.scripts {
                    let before = script.locations.len();
                    script.locations.retain(|c| *c != cell);
                    removed += before - script.locations.len();
                }
                removed
            }
        }
    }
}

fn field_values(doc: &MapDocument) -> [(MapField, FieldValue); 4] {
    let number = |v: Option<u32>| FieldValue::Text(v.map(|v| v.to_string()).unwrap_or_default());
    [
        (MapField::Height, number(doc.height)),
        (
            MapField::Name,
            FieldValue::Text(doc.display_name().to_string()),
        ),
        (MapField::Width, number(doc.width)),
        (MapField::WrapAround, FieldValue::Flag(doc.wrap_around)),
    ]
}

fn parse_dimension(field: MapField, text: &str) -> Result<u32, EditorError> {
    match text.trim().parse::<u32>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(EditorError::InvalidFieldValue {
            field,
            value: text.to_string(),
        }),
    }
}

fn script_row(session: &EditingSession, script: &Script, position: usize) -> ScriptRow {
    ScriptRow {
        name: script.display_name().to_string(),
        visible: session.is_script_visible(script),
        color: session.script_color(script, position),
    }
}
