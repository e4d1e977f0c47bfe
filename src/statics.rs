// Central place for user-facing strings and default values.
// Keep these out of the controller to reduce duplication and make tweaks safer.

// Map defaults applied on creation and when normalizing incomplete documents.
pub const DEFAULT_MAP_NAME: &str = "Untitled";
pub const DEFAULT_MAP_WIDTH: u32 = 512;
pub const DEFAULT_MAP_HEIGHT: u32 = 512;

// The script that always sorts first in a map's script list.
pub const INIT_SCRIPT_NAME: &str = "init";

// Zoom steps available to the editor surface.
pub const ZOOM_MIN: i32 = -4;
pub const ZOOM_MAX: i32 = 4;

pub const DEFAULT_LOG_FILTER: &str = "info";

// Colors assigned to scripts that carry no explicit color (cycled by list position).
pub const SCRIPT_COLORS: [(u8, u8, u8); 8] = [
    (0xE6, 0x19, 0x4B),
    (0x3C, 0xB4, 0x4B),
    (0x43, 0x63, 0xD8),
    (0xF5, 0x82, 0x31),
    (0x91, 0x1E, 0xB4),
    (0x42, 0xD4, 0xF4),
    (0xF0, 0x32, 0xE6),
    (0x80, 0x80, 0x00),
];

// English UI strings (EN_ prefix to make future localization easier)
pub const EN_CONFIRM_DELETE_MAP_PREFIX: &str = "Delete map '";
pub const EN_CONFIRM_DELETE_MAP_SUFFIX: &str = "'.  Are you sure?";

pub const EN_OP_CLONE_MAP: &str = "clone map";
pub const EN_OP_EXPORT_MAP: &str = "export map";
pub const EN_OP_CLONE_SCRIPT: &str = "clone script";
pub const EN_OP_DELETE_SCRIPT: &str = "delete script";

pub const EN_UNCATEGORIZED: &str = "(none)";
pub const EN_UNNAMED: &str = "(unnamed)";

// Field labels used in logs and error messages.
pub const FIELD_NAME: &str = "name";
pub const FIELD_WIDTH: &str = "width";
pub const FIELD_HEIGHT: &str = "height";
pub const FIELD_WRAP_AROUND: &str = "wrapAround";

pub fn delete_map_prompt(name: &str) -> String {
    format!("{EN_CONFIRM_DELETE_MAP_PREFIX}{name}{EN_CONFIRM_DELETE_MAP_SUFFIX}")
}
