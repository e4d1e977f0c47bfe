#![allow(dead_code)]

use tmse::{
    BindError, ConfirmTicket, ConfirmationService, EditingSession, EditorConfig, EditorSurface,
    FieldValue, GameData, MapDocument, MapEditorController, MapEntry, MapField, MapId,
    MapRepository, MapSelectorView, PropertyBinder, Script, ScriptListView, ScriptRow, Tile,
    TileId, TilePalette, TilePaletteView,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Bind(MapField, Option<FieldValue>),
    Enable(MapField, bool),
    Attach(MapId),
    Detach,
    DragDrop(MapId),
    Preview(MapId),
    Scripts(Vec<ScriptRow>),
    UpdateScript(ScriptRow),
    ClearScriptSelection,
    Maps(Vec<MapEntry>),
    SelectMap(Option<MapId>),
    Palette {
        selected: Option<TileId>,
        emphasized: Option<String>,
    },
}

/// Records every call the controller makes so tests can assert on side effects.
#[derive(Debug, Default)]
pub struct RecordingView {
    pub events: Vec<Event>,
    pub prompts: Vec<String>,
    pub tickets: Vec<ConfirmTicket>,
    pub selected: Option<MapId>,
    pub failing_field: Option<MapField>,
}

impl RecordingView {
    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn last_scripts(&self) -> Option<&[ScriptRow]> {
        self.events.iter().rev().find_map(|e| match e {
            Event::Scripts(rows) => Some(rows.as_slice()),
            _ => None,
        })
    }

    pub fn last_maps(&self) -> Option<&[MapEntry]> {
        self.events.iter().rev().find_map(|e| match e {
            Event::Maps(entries) => Some(entries.as_slice()),
            _ => None,
        })
    }

    pub fn take_ticket(&mut self) -> ConfirmTicket {
        self.tickets.pop().expect("a confirmation was requested")
    }
}

impl PropertyBinder for RecordingView {
    fn bind(&mut self, field: MapField, value: Option<FieldValue>) -> Result<(), BindError> {
        if self.failing_field == Some(field) {
            return Err(BindError {
                field,
                reason: "no accessor".to_string(),
            });
        }
        self.events.push(Event::Bind(field, value));
        Ok(())
    }

    fn set_field_enabled(&mut self, field: MapField, enabled: bool) {
        self.events.push(Event::Enable(field, enabled));
    }
}

impl EditorSurface for RecordingView {
    fn attach(&mut self, session: &EditingSession) {
        self.events.push(Event::Attach(session.map_id()));
    }

    fn detach(&mut self) {
        self.events.push(Event::Detach);
    }

    fn setup_drag_drop(&mut self, session: &EditingSession) {
        self.events.push(Event::DragDrop(session.map_id()));
    }

    fn show_preview(&mut self, session: &EditingSession) {
        self.events.push(Event::Preview(session.map_id()));
    }
}

impl ScriptListView for RecordingView {
    fn show_scripts(&mut self, rows: &[ScriptRow]) {
        self.events.push(Event::Scripts(rows.to_vec()));
    }

    fn update_script(&mut self, row: &ScriptRow) {
        self.events.push(Event::UpdateScript(row.clone()));
    }

    fn clear_script_selection(&mut self) {
        self.events.push(Event::ClearScriptSelection);
    }
}

impl MapSelectorView for RecordingView {
    fn set_maps(&mut self, maps: &[MapEntry]) {
        self.events.push(Event::Maps(maps.to_vec()));
    }

    fn select_map(&mut self, id: Option<MapId>) {
        self.selected = id;
        self.events.push(Event::SelectMap(id));
    }

    fn selected_map(&self) -> Option<MapId> {
        self.selected
    }
}

impl TilePaletteView for RecordingView {
    fn show_palette(&mut self, palette: &TilePalette) {
        self.events.push(Event::Palette {
            selected: palette.selected_tile(),
            emphasized: palette.emphasized_category().map(str::to_string),
        });
    }
}

impl ConfirmationService for RecordingView {
    fn request_confirmation(&mut self, prompt: &str, ticket: ConfirmTicket) {
        self.prompts.push(prompt.to_string());
        self.tickets.push(ticket);
    }
}

pub type Controller = MapEditorController<GameData, RecordingView>;

pub fn map_with_scripts(name: &str, scripts: &[&str]) -> MapDocument {
    let mut doc = MapDocument::new(name, 16, 16);
    doc.scripts = scripts.iter().map(|s| Script::named(*s)).collect();
    doc
}

pub fn tile(id: u64, name: &str, category: Option<&str>) -> Tile {
    Tile {
        id: TileId(id),
        name: Some(name.to_string()),
        category: category.map(str::to_string),
    }
}

/// A controller over two maps ("Town", "Cave") and a small tile set.
pub fn controller() -> (Controller, MapId, MapId) {
    let mut data = GameData::default();
    let town = data.push_map(map_with_scripts("Town", &["shop", "Init", "Gate"]));
    let cave = data.push_map(map_with_scripts("Cave", &["bats"]));
    data.tiles = vec![
        tile(1, "grass", Some("terrain")),
        tile(2, "water", Some("terrain")),
        tile(3, "barrel", Some("props")),
        tile(4, "unknown", None),
    ];
    let controller = MapEditorController::new(data, RecordingView::default(), EditorConfig::default());
    (controller, town, cave)
}
