use anyhow::{Context, Result};
use clap::Parser;
use lodmap::prelude::*;
use std::path::PathBuf;

/// Fly a camera over a tiled map and log what the renderer would draw
#[derive(Parser)]
#[command(name = "lodmap-app")]
#[command(version)]
struct Cli {
    /// Directory holding the high-resolution tiles; synthetic tiles when omitted
    #[arg(short, long)]
    tiles: Option<PathBuf>,

    /// JSON map configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    #[arg(long, default_value_t = 720.0)]
    height: f64,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 180)]
    frames: usize,

    /// Milliseconds between frames
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    lodmap::init_logging("info");
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => MapConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => MapConfig::default(),
    };

    let resolver: Arc<dyn TileResolver> = match &cli.tiles {
        Some(dir) => {
            log::info!("reading tiles from {}", dir.display());
            Arc::new(FileTileResolver::new(dir))
        }
        None => {
            log::info!("no tile directory given, using synthetic tiles");
            Arc::new(synthetic_tiles(&config))
        }
    };

    let spawner = Arc::new(TokioSpawner::current()?);
    let mut map = LodMap::new(config, resolver, spawner)?;

    let viewport = Viewport::new(cli.width, cli.height);
    let mut camera = map.default_camera(&viewport);
    let mut interval = tokio::time::interval(Duration::from_millis(cli.frame_ms.max(1)));
    let mut last: Option<(bool, bool)> = None;

    for (frame, events) in flythrough(cli.frames, map.grid().tile_size()).into_iter().enumerate() {
        interval.tick().await;

        for event in events {
            map.handle_input(&mut camera, event, viewport);
        }
        let directives = map.tick(&mut camera, viewport);

        let layers = (directives.low_res_visible, directives.high_res_visible);
        if last != Some(layers) || frame % 30 == 0 {
            log::info!(
                "frame {:>4}: zoom {:>6.2} target ({:>7.2}, {:>7.2}) low-res {} high-res {} loaded {:>3.0}%",
                frame,
                directives.effective_zoom,
                camera.target.x,
                camera.target.y,
                directives.low_res_visible,
                directives.high_res_visible,
                directives.loaded_fraction * 100.0
            );
        }
        if let Some(correction) = directives.camera_correction {
            log::debug!("camera corrected to {:?}", correction);
        }
        last = Some(layers);
    }

    log::info!(
        "done: {} tiles loaded, {} still loading after {} frames",
        map.store().loaded_count(),
        map.pending_loads(),
        map.frame_count()
    );
    Ok(())
}

/// Placeholder bytes for every tile of the configured grid
fn synthetic_tiles(config: &MapConfig) -> InMemoryResolver {
    let mut resolver = InMemoryResolver::new();
    let count = config.grid_size * config.grid_size;
    for index in (1..=count).map(TileIndex) {
        resolver.insert(index.format(), vec![0xFF, 0xD8, 0xFF, index.get() as u8]);
    }
    resolver
}

/// Zoom in, sweep across the map, then zoom back out
fn flythrough(frames: usize, tile_size: f64) -> Vec<Vec<InputEvent>> {
    let phase = (frames / 3).max(1);
    let step = tile_size / 8.0;

    (0..frames)
        .map(|frame| match frame / phase {
            0 => vec![InputEvent::ZoomBy { factor: 1.04 }],
            1 => vec![InputEvent::pan(step, -step / 2.0)],
            _ => vec![InputEvent::ZoomBy { factor: 0.97 }],
        })
        .collect()
}
