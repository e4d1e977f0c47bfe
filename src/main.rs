//! Headless driver for TMSE: edits maps in a game data file without a GUI.
//!
//! Usage:
//!   tmse game.json5 maps
//!   tmse game.json5 new-map --name Town
//!   tmse game.json5 delete-map 3 --yes
//!   tmse game.json5 scripts 3

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tmse::{
    BindError, ConfirmOutcome, ConfirmTicket, ConfirmationService, EditingSession, EditorConfig,
    EditorSurface, FieldValue, GameData, GameDataFile, MapEditorController, MapEntry, MapField,
    MapId, MapSelectorView, Platform, PropertyBinder, ScriptListView, ScriptRow, Tile, TileImage,
    TileImageProvider, TilePalette, TilePaletteView, logging,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "tmse")]
#[command(about = "Tile Map Session Editor (headless)")]
struct Cli {
    /// Game data file (.json, .json5 or .gz)
    file: PathBuf,
    /// Editor settings (JSON5)
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List maps
    Maps,
    /// Create a map with the configured defaults
    NewMap {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
    },
    /// Delete a map after confirmation
    DeleteMap {
        id: u64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Print a map's scripts in display order
    Scripts { id: u64 },
    /// Add a script to a map
    AddScript { id: u64, name: String },
    /// Print the tile palette grouped by category
    Palette,
}

/// Collects what a GUI would display; prints the parts a command asks for.
#[derive(Default)]
struct ConsoleView {
    maps: Vec<MapEntry>,
    selected: Option<MapId>,
    scripts: Vec<ScriptRow>,
    pending: Option<(String, ConfirmTicket)>,
}

impl PropertyBinder for ConsoleView {
    fn bind(&mut self, _field: MapField, _value: Option<FieldValue>) -> Result<(), BindError> {
        Ok(())
    }

    fn set_field_enabled(&mut self, _field: MapField, _enabled: bool) {}
}

impl EditorSurface for ConsoleView {
    fn attach(&mut self, _session: &EditingSession) {}

    fn detach(&mut self) {}

    fn setup_drag_drop(&mut self, _session: &EditingSession) {}

    fn show_preview(&mut self, _session: &EditingSession) {}
}

impl ScriptListView for ConsoleView {
    fn show_scripts(&mut self, rows: &[ScriptRow]) {
        self.scripts = rows.to_vec();
    }

    fn update_script(&mut self, row: &ScriptRow) {
        if let Some(existing) = self.scripts.iter_mut().find(|r| r.name == row.name) {
            *existing = row.clone();
        }
    }

    fn clear_script_selection(&mut self) {}
}

impl MapSelectorView for ConsoleView {
    fn set_maps(&mut self, maps: &[MapEntry]) {
        self.maps = maps.to_vec();
    }

    fn select_map(&mut self, id: Option<MapId>) {
        self.selected = id;
    }

    fn selected_map(&self) -> Option<MapId> {
        self.selected
    }
}

impl TilePaletteView for ConsoleView {
    fn show_palette(&mut self, palette: &TilePalette) {
        for group in palette.groups() {
            println!("{} ({})", group.label, group.entries.len());
            for entry in &group.entries {
                println!("  {:>4}  {}", entry.tile, entry.label);
            }
        }
    }
}

impl ConfirmationService for ConsoleView {
    fn request_confirmation(&mut self, prompt: &str, ticket: ConfirmTicket) {
        self.pending = Some((prompt.to_string(), ticket));
    }
}

/// Stand-in artwork: a single grey pixel per tile.
struct PlaceholderImages;

impl TileImageProvider for PlaceholderImages {
    fn tile_image(&self, tile: &Tile, _platform: Platform) -> Result<TileImage> {
        let shade = (tile.id.0 % 256) as u8;
        Ok(TileImage {
            width: 1,
            height: 1,
            rgba: vec![shade, shade, shade, 255],
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EditorConfig::load_path(path)?,
        None => EditorConfig::default(),
    };
    logging::init_tracing(&config.log_filter);

    run_on_file(&cli.file, config, cli.command)?;
    Ok(())
}

/// Runs one command against the game data at `path`. The file is written
/// only when the command changed the data; returns whether it was.
fn run_on_file(path: &Path, config: EditorConfig, command: Commands) -> Result<bool> {
    let mut file = if path.exists() {
        GameDataFile::load_path(path)?
    } else {
        info!(path = %path.display(), "starting_new_game_data");
        GameDataFile::new(GameData::default())
    };

    let data = std::mem::take(&mut file.data);
    let mut controller = MapEditorController::new(data, ConsoleView::default(), config);
    controller.rebuild_map_selectors();

    let result = run(&mut controller, command);
    let (data, _) = controller.into_parts();
    file.data = data;
    let mutating = result?;

    if !mutating || !file.is_dirty() {
        return Ok(false);
    }
    file.save_to_path(path)?;
    info!(path = %path.display(), "game_data_written");
    Ok(true)
}

/// Executes `command`; `true` when it is one that edits the game data.
fn run(controller: &mut MapEditorController<GameData, ConsoleView>, command: Commands) -> Result<bool> {
    match command {
        Commands::Maps => {
            for entry in &controller.view().maps {
                println!("{:>4}  {}", entry.id, entry.name);
            }
            Ok(false)
        }
        Commands::NewMap {
            name,
            width,
            height,
        } => {
            let id = controller.on_map_create_pressed();
            if let Some(name) = name {
                controller.on_field_edited(MapField::Name, FieldValue::Text(name))?;
            }
            if let Some(width) = width {
                controller.on_field_edited(MapField::Width, FieldValue::Text(width.to_string()))?;
            }
            if let Some(height) = height {
                controller
                    .on_field_edited(MapField::Height, FieldValue::Text(height.to_string()))?;
            }
            println!("created map {id}");
            Ok(true)
        }
        Commands::DeleteMap { id, yes } => {
            select(controller, MapId(id))?;
            if !controller.on_map_delete_pressed() {
                bail!("map {id} could not be selected for deletion");
            }
            let (prompt, ticket) = controller
                .view_mut()
                .pending
                .take()
                .context("no confirmation was requested")?;
            let outcome = if yes || ask(&prompt)? {
                ConfirmOutcome::Confirmed
            } else {
                ConfirmOutcome::Cancelled
            };
            controller.resolve_confirmation(ticket, outcome)?;
            Ok(outcome == ConfirmOutcome::Confirmed)
        }
        Commands::Scripts { id } => {
            select(controller, MapId(id))?;
            for row in &controller.view().scripts {
                println!("{}", row.name);
            }
            Ok(false)
        }
        Commands::AddScript { id, name } => {
            select(controller, MapId(id))?;
            controller.on_map_script_add_pressed(&name)?;
            Ok(true)
        }
        Commands::Palette => {
            controller.rebuild_tile_selectors(&PlaceholderImages);
            Ok(false)
        }
    }
}

fn select(controller: &mut MapEditorController<GameData, ConsoleView>, id: MapId) -> Result<()> {
    controller.view_mut().select_map(Some(id));
    controller.on_map_selected();
    if controller.current_map_id() != Some(id) {
        bail!("no map with id {id}");
    }
    Ok(())
}

fn ask(prompt: &str) -> Result<bool> {
    println!("{prompt} [y/N]");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("reading confirmation")?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}
