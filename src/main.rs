// Allow unused code for designed-but-not-yet-used APIs
// Remove these as the codebase matures
#![allow(dead_code)]

mod catalog;
mod display;
mod fields;
mod math3d;
mod noise;
mod picking;
mod shading;
mod texture;
mod tween;
mod ui;
mod util;
mod views;
mod zoom;

use catalog::GalaxyCatalog;
use display::{
    draw_text_shadowed, Display, InputEvent, PixelBuffer, RenderTarget, DEFAULT_HEIGHT,
    DEFAULT_WIDTH,
};
use sdl2::keyboard::Keycode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use util::{FpsCounter, Rng};
use views::{HomeView, SolarView, UniverseView, View};

const DEFAULT_SEED: u64 = 9;
const DEFAULT_CATALOG: &str = "galaxies.json";

struct Options {
    width: u32,
    height: u32,
    vsync: bool,
    seed: u64,
    start_view: usize,
    catalog: Option<String>,
}

/// Parse command line arguments
fn parse_args() -> Options {
    let args: Vec<String> = std::env::args().collect();
    let mut opts = Options {
        width: DEFAULT_WIDTH,
        height: DEFAULT_HEIGHT,
        vsync: true,
        seed: DEFAULT_SEED,
        start_view: 0,
        catalog: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--no-vsync" => opts.vsync = false,
            "--width" | "-w" => {
                if i + 1 < args.len() {
                    if let Ok(w) = args[i + 1].parse::<u32>() {
                        opts.width = w;
                    }
                    i += 1;
                }
            },
            "--height" | "-h" => {
                if i + 1 < args.len() {
                    if let Ok(h) = args[i + 1].parse::<u32>() {
                        opts.height = h;
                    }
                    i += 1;
                }
            },
            "--resolution" | "-r" => {
                if i + 1 < args.len() {
                    // Parse WxH format (e.g., 1920x1080)
                    let parts: Vec<&str> = args[i + 1].split('x').collect();
                    if parts.len() == 2 {
                        if let (Ok(w), Ok(h)) = (parts[0].parse::<u32>(), parts[1].parse::<u32>()) {
                            opts.width = w;
                            opts.height = h;
                        }
                    }
                    i += 1;
                }
            },
            "--seed" => {
                if i + 1 < args.len() {
                    if let Ok(s) = args[i + 1].parse::<u64>() {
                        opts.seed = s;
                    }
                    i += 1;
                }
            },
            "--view" => {
                if i + 1 < args.len() {
                    opts.start_view = match args[i + 1].as_str() {
                        "solar" => 1,
                        "universe" => 2,
                        _ => 0,
                    };
                    i += 1;
                }
            },
            "--catalog" => {
                if i + 1 < args.len() {
                    opts.catalog = Some(args[i + 1].clone());
                    i += 1;
                }
            },
            "--help" => {
                println!("Usage: cosmoscope [OPTIONS]");
                println!();
                println!("Options:");
                println!("  --width W, -w W           Set window width (default: {DEFAULT_WIDTH})");
                println!("  --height H, -h H          Set window height (default: {DEFAULT_HEIGHT})");
                println!("  --resolution WxH, -r WxH  Set resolution (e.g., 1920x1080)");
                println!("  --no-vsync                Disable VSync for uncapped framerate");
                println!("  --seed N                  Scene synthesis seed (default: {DEFAULT_SEED})");
                println!("  --view NAME               Starting view: home, solar, universe");
                println!("  --catalog PATH            Galaxy catalog JSON (default: {DEFAULT_CATALOG})");
                println!("  --help                    Show this help message");
                std::process::exit(0);
            },
            _ => {},
        }
        i += 1;
    }

    opts
}

fn load_catalog(explicit: Option<&str>) -> Result<GalaxyCatalog, String> {
    match explicit {
        // An explicitly requested catalog must load
        Some(path) => GalaxyCatalog::load(path).map_err(|e| e.to_string()),
        None => Ok(GalaxyCatalog::load(DEFAULT_CATALOG).unwrap_or_else(|e| {
            warn!(error = %e, "no usable {DEFAULT_CATALOG}, using the built-in catalog");
            GalaxyCatalog::builtin()
        })),
    }
}

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let opts = parse_args();
    let (mut display, texture_creator) =
        Display::with_options("cosmoscope", opts.width, opts.height, opts.vsync)?;
    let mut target = RenderTarget::with_size(&texture_creator, opts.width, opts.height)?;
    let mut buffer = PixelBuffer::with_size(opts.width, opts.height);

    let mut fps_counter = FpsCounter::new(60);
    let mut show_fps = false;

    let catalog = load_catalog(opts.catalog.as_deref())?;
    info!(
        seed = opts.seed,
        galaxies = catalog.len(),
        "synthesizing scenes"
    );

    let mut rng = Rng::new(opts.seed);
    let viewport = (opts.width, opts.height);
    let mut views: Vec<Box<dyn View>> = vec![
        Box::new(HomeView::new(&mut rng)),
        Box::new(SolarView::new(&mut rng, viewport)),
        Box::new(UniverseView::new(&catalog, &mut rng, viewport)),
    ];
    let mut current = opts.start_view.min(views.len() - 1);
    info!(view = views[current].name(), "ready");

    println!("=== cosmoscope ===");
    println!("Resolution: {}x{}", opts.width, opts.height);
    if opts.vsync {
        println!("VSync: ON (60fps locked). Use --no-vsync for uncapped.");
    } else {
        println!("VSync: OFF (uncapped framerate)");
    }
    println!("Controls:");
    println!("  1          - Home (star field)");
    println!("  2          - Solar system");
    println!("  3          - Universe");
    println!("  Drag       - Orbit (solar/universe)");
    println!("  Wheel      - Zoom");
    println!("  Click      - Fly to galaxy (universe)");
    println!("  O          - Toggle orbit lines (solar)");
    println!("  F          - Toggle FPS display");
    println!("  Escape     - Quit");

    'main: loop {
        let (dt, avg_fps) = fps_counter.tick();

        for event in display.poll_events() {
            match &event {
                InputEvent::Quit => break 'main,
                InputEvent::KeyDown(key) => match *key {
                    Keycode::Escape => break 'main,
                    Keycode::Num1 | Keycode::Num2 | Keycode::Num3 => {
                        let next = match *key {
                            Keycode::Num1 => 0,
                            Keycode::Num2 => 1,
                            _ => 2,
                        };
                        if next != current {
                            current = next;
                            info!(view = views[current].name(), "switched view");
                        }
                        continue;
                    },
                    Keycode::F => {
                        show_fps = !show_fps;
                        continue;
                    },
                    _ => {},
                },
                _ => {},
            }
            views[current].handle_event(&event, opts.width, opts.height);
        }

        views[current].update(dt);
        views[current].render(&mut buffer);

        if show_fps {
            let text = format!("FPS {}", avg_fps as u32);
            let y = buffer.height() as i32 - 12;
            draw_text_shadowed(&mut buffer, 4, y, &text, 255, 255, 0);
        }

        display.present(&mut target, &buffer)?;
    }

    Ok(())
}
