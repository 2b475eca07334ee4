use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dungeon_core::{
    DungeonNavigator, GeneratedMap, GenerationConfig, LayoutStrategy, MapGenerator, Movement,
    PathStrategy, Pos,
};
use env_logger::{Builder, Env};
use serde::Serialize;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Layout {
    Bsp,
    BspFull,
    Flood,
    Scatter,
}

impl From<Layout> for LayoutStrategy {
    fn from(layout: Layout) -> Self {
        match layout {
            Layout::Bsp => LayoutStrategy::Bsp,
            Layout::BspFull => LayoutStrategy::BspFull,
            Layout::Flood => LayoutStrategy::Flood,
            Layout::Scatter => LayoutStrategy::Scatter,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Carving {
    Astar,
    Straight,
}

impl From<Carving> for PathStrategy {
    fn from(carving: Carving) -> Self {
        match carving {
            Carving::Astar => PathStrategy::AStar,
            Carving::Straight => PathStrategy::Straight,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum Format {
    #[default]
    Ascii,
    Json,
}

#[derive(Parser)]
#[command(author, version, about = "Generate a dungeon grid and print or export it")]
struct Args {
    /// TOML generation config; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long)]
    seed: Option<u64>,
    #[arg(long, value_enum)]
    layout: Option<Layout>,
    #[arg(long, value_enum)]
    path: Option<Carving>,
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    height: Option<usize>,
    #[arg(long)]
    room_size: Option<usize>,
    #[arg(short, long, value_enum, default_value_t)]
    format: Format,
    /// Overlay the walking route from the start room to the exit room
    #[arg(long)]
    route: bool,
}

impl Args {
    fn generation_config(&self) -> Result<GenerationConfig> {
        let mut config = match &self.config {
            Some(path) => GenerationConfig::load(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?,
            None => GenerationConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(layout) = self.layout {
            config.layout_strategy = layout.into();
        }
        if let Some(path) = self.path {
            config.path_strategy = path.into();
        }
        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(room_size) = self.room_size {
            config.room_size = room_size;
        }
        Ok(config)
    }
}

#[derive(Serialize)]
struct Export<'a> {
    fingerprint: String,
    map: &'a GeneratedMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    route: Option<&'a [Pos]>,
}

fn start_to_exit(map: &GeneratedMap) -> Option<Vec<Pos>> {
    let (start, exit) = (map.start()?, map.exit()?);
    DungeonNavigator::new(&map.grid, Movement::Cardinal).find_path(start.center, exit.center)
}

fn render_ascii(map: &GeneratedMap, route: Option<&[Pos]>) -> String {
    let route: BTreeSet<Pos> = route.into_iter().flatten().copied().collect();
    let mut out = String::with_capacity((map.grid.width() + 1) * map.grid.height());
    for y in 0..map.grid.height() as i32 {
        for x in 0..map.grid.width() as i32 {
            let pos = Pos { y, x };
            out.push(if route.contains(&pos) { '*' } else { map.cell_at(pos).glyph() });
        }
        out.push('\n');
    }
    out
}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = args.generation_config()?;
    let seed = config.seed;
    let generator = MapGenerator::new(config).context("Invalid generation config")?;
    let map = generator.generate(seed);

    let route = if args.route {
        let route = start_to_exit(&map);
        if route.is_none() {
            log::warn!("no walkable route between start and exit for seed {seed}");
        }
        route
    } else {
        None
    };

    match args.format {
        Format::Ascii => {
            print!("{}", render_ascii(&map, route.as_deref()));
            println!(
                "Seed: {}  Rooms: {}  Corridors: {}  Fingerprint: {:016x}",
                map.seed,
                map.rooms.len(),
                map.corridor_count,
                map.fingerprint()
            );
        }
        Format::Json => {
            let export = Export {
                fingerprint: format!("{:016x}", map.fingerprint()),
                map: &map,
                route: route.as_deref(),
            };
            let json = serde_json::to_string_pretty(&export)
                .context("Failed to serialize map to JSON")?;
            println!("{json}");
        }
    }
    Ok(())
}
