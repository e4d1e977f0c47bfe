mod common;

use common::{Event, RecordingView, controller};
use pretty_assertions::assert_eq;
use tmse::{
    CellPos, DrawMode, EditorConfig, EditorError, FieldValue, GameData, MapDocument,
    MapEditorController, MapField, MapId, MapRepository, TileId,
};

#[test]
fn active_map_and_session_are_always_paired() {
    let (mut c, town, cave) = controller();
    assert!(c.current_map().is_none() && c.session().is_none());

    for step in [Some(town), Some(cave), None, Some(cave), Some(MapId(99)), Some(town), None] {
        c.set_current_map(step);
        assert_eq!(c.current_map().is_some(), c.session().is_some());
    }
    assert!(c.current_map().is_none());
}

#[test]
fn selecting_the_same_map_twice_binds_once() {
    let (mut c, town, _) = controller();
    c.set_current_map(Some(town));
    let after_first = c.view().events.len();

    c.set_current_map(Some(town));
    assert_eq!(c.view().events.len(), after_first);
    assert_eq!(c.view().count(|e| matches!(e, Event::Attach(_))), 1);
    assert_eq!(c.current_map_id(), Some(town));
}

#[test]
fn switching_maps_detaches_and_rebinds() {
    let (mut c, town, cave) = controller();
    c.set_current_map(Some(town));
    c.view_mut().events.clear();

    c.set_current_map(Some(cave));
    let events = &c.view().events;
    assert_eq!(events.first(), Some(&Event::Detach));
    assert!(events.contains(&Event::Bind(
        MapField::Name,
        Some(FieldValue::Text("Cave".to_string()))
    )));
    assert!(events.contains(&Event::Enable(MapField::WrapAround, true)));
    assert!(events.contains(&Event::Attach(cave)));
    assert!(events.contains(&Event::DragDrop(cave)));
    // The script list is always redrawn last.
    assert!(matches!(events.last(), Some(Event::Scripts(_))));
}

#[test]
fn clearing_the_map_unbinds_and_disables_fields() {
    let (mut c, town, _) = controller();
    c.set_current_map(Some(town));
    c.view_mut().events.clear();

    c.set_current_map(None);
    let view = c.view();
    for field in MapField::ALL {
        assert!(view.events.contains(&Event::Bind(field, None)));
        assert!(view.events.contains(&Event::Enable(field, false)));
    }
    assert_eq!(view.last_scripts(), Some(&[][..]));
    assert!(c.session().is_none());
}

#[test]
fn unknown_map_falls_back_to_no_map() {
    let (mut c, town, _) = controller();
    c.set_current_map(Some(town));
    c.set_current_map(Some(MapId(42)));
    assert_eq!(c.current_map_id(), None);
    assert!(c.view().events.contains(&Event::Enable(MapField::Name, false)));
}

#[test]
fn current_tile_carries_over_to_the_next_map() {
    let (mut c, town, cave) = controller();
    c.set_current_map(Some(town));
    c.rebuild_tile_selectors(&common_images::Blank);
    assert!(c.on_tile_selected(TileId(3)));

    c.set_current_map(Some(cave));
    assert_eq!(c.session().and_then(|s| s.current_tile()), Some(TileId(3)));

    c.set_current_map(None);
    c.set_current_map(Some(town));
    // Nothing to carry from the "no map" state.
    assert_eq!(c.session().and_then(|s| s.current_tile()), None);
}

#[test]
fn new_map_uses_defaults_and_becomes_active() {
    let (mut c, _, _) = controller();
    let id = c.on_map_create_pressed();

    let doc = c.current_map().expect("new map is active");
    assert_eq!(doc.id, id);
    assert_eq!(doc.name.as_deref(), Some("Untitled"));
    assert_eq!((doc.width, doc.height), (Some(512), Some(512)));
    assert!(c.repository().map(id).is_some());
    assert_eq!(c.repository().maps().len(), 3);

    let names: Vec<&str> = c
        .view()
        .last_maps()
        .unwrap()
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(names, vec!["Town", "Cave", "Untitled"]);
    assert_eq!(c.view().selected, Some(id));
}

#[test]
fn new_map_honors_configured_defaults() {
    let mut config = EditorConfig::default();
    config.map_defaults.name = "Fresh".to_string();
    config.map_defaults.width = 40;
    let mut c = MapEditorController::new(GameData::default(), RecordingView::default(), config);
    c.on_map_create_pressed();
    let doc = c.current_map().unwrap();
    assert_eq!(doc.name.as_deref(), Some("Fresh"));
    assert_eq!((doc.width, doc.height), (Some(40), Some(512)));
}

#[test]
fn activating_normalizes_incomplete_documents() {
    let mut data = GameData::default();
    let id = data.push_map(MapDocument {
        id: MapId(0),
        name: None,
        width: None,
        height: Some(20),
        wrap_around: false,
        scripts: Vec::new(),
        cells: Vec::new(),
    });
    let mut c = MapEditorController::new(data, RecordingView::default(), EditorConfig::default());
    c.set_current_map(Some(id));
    let doc = c.current_map().unwrap();
    assert_eq!(doc.name.as_deref(), Some("Untitled"));
    assert_eq!((doc.width, doc.height), (Some(512), Some(20)));
}

#[test]
fn map_selector_drives_the_active_map() {
    let (mut c, _, cave) = controller();
    c.rebuild_map_selectors();
    assert_eq!(c.view().selected, None);

    c.view_mut().selected = Some(cave);
    c.on_map_selected();
    assert_eq!(c.current_map_id(), Some(cave));

    c.view_mut().selected = None;
    c.on_map_selected();
    assert_eq!(c.current_map_id(), None);
}

#[test]
fn bind_failures_are_logged_and_do_not_abort_activation() {
    let (mut c, town, _) = controller();
    c.view_mut().failing_field = Some(MapField::Name);
    c.set_current_map(Some(town));
    assert_eq!(c.current_map_id(), Some(town));
    assert!(c.view().events.contains(&Event::Attach(town)));
    assert!(
        c.view()
            .events
            .contains(&Event::Bind(MapField::Width, Some(FieldValue::Text("16".to_string()))))
    );
}

#[test]
fn field_edits_write_through_to_the_document() {
    let (mut c, town, _) = controller();
    assert_eq!(
        c.on_field_edited(MapField::Name, FieldValue::Text("X".to_string())),
        Err(EditorError::NoActiveMap)
    );

    c.set_current_map(Some(town));
    c.on_field_edited(MapField::Name, FieldValue::Text("Harbor".to_string()))
        .unwrap();
    c.on_field_edited(MapField::Width, FieldValue::Text("32".to_string()))
        .unwrap();
    c.on_field_edited(MapField::WrapAround, FieldValue::Flag(true))
        .unwrap();
    assert!(matches!(
        c.on_field_edited(MapField::Height, FieldValue::Text("-3".to_string())),
        Err(EditorError::InvalidFieldValue { field: MapField::Height, .. })
    ));

    let doc = c.current_map().unwrap();
    assert_eq!(doc.name.as_deref(), Some("Harbor"));
    assert_eq!(doc.width, Some(32));
    assert_eq!(doc.height, Some(16));
    assert!(doc.wrap_around);
    assert_eq!(c.view().last_maps().unwrap()[0].name, "Harbor");

    // The session picks up the new bounds: x=20 is on the map now, and wraps at 32.
    assert_eq!(c.session().unwrap().resolve(20, 0), Some(CellPos::new(20, 0)));
    assert_eq!(c.session().unwrap().resolve(33, 0), Some(CellPos::new(1, 0)));
}

#[test]
fn pending_tile_edits_flush_on_request_and_on_switch() {
    let (mut c, town, cave) = controller();
    c.set_current_map(Some(town));
    c.rebuild_tile_selectors(&common_images::Blank);
    c.on_tile_selected(TileId(1));
    assert_eq!(c.draw_at(2, 3), 1);
    assert!(c.current_map().unwrap().cells.is_empty());

    c.complete_inflight_operations();
    assert_eq!(c.current_map().unwrap().cells.len(), 1);

    c.set_draw_mode(DrawMode::Pencil3px);
    assert_eq!(c.draw_at(8, 8), 9);
    c.set_current_map(Some(cave));
    assert_eq!(c.repository().map(town).unwrap().cells.len(), 10);
}

#[test]
fn editor_commands_without_a_session_are_no_ops() {
    let (mut c, town, _) = controller();
    c.zoom_in();
    c.scroll_map_down();
    c.toggle_pan_zoom();
    c.set_draw_mode(DrawMode::Eraser);
    c.on_map_preview_pressed();
    assert_eq!(c.draw_at(0, 0), 0);
    c.complete_inflight_operations();
    assert!(c.view().events.is_empty());

    c.set_current_map(Some(town));
    c.zoom_in();
    c.scroll_map_right();
    c.scroll_map_down();
    c.scroll_map_down();
    c.toggle_pan_zoom();
    c.on_map_preview_pressed();
    let session = c.session().unwrap();
    assert_eq!(session.zoom(), 1);
    assert_eq!(session.scroll_offset(), (1, 2));
    assert!(session.pan_zoom_enabled());
    assert!(c.view().events.contains(&Event::Preview(town)));
}

mod common_images {
    use tmse::{Platform, Tile, TileImage, TileImageProvider};

    pub struct Blank;

    impl TileImageProvider for Blank {
        fn tile_image(&self, _tile: &Tile, _platform: Platform) -> anyhow::Result<TileImage> {
            Ok(TileImage {
                width: 0,
                height: 0,
                rgba: Vec::new(),
            })
        }
    }
}
