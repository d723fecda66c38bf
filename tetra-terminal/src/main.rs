/// Tetra Terminal Demo - Rotating Tetrahedron
///
/// Renders the translucent tetrahedron, its edges, vertex markers and
/// vertex labels as ASCII art.
/// Controls:
///   - WASD / Arrow Keys: Orbit the camera
///   - +/-: Zoom
///   - M: Toggle light/dark mode
///   - Q/ESC: Quit
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tetra_core::SceneConfig;
use tetra_terminal::TerminalApp;

#[derive(Parser, Debug)]
#[command(version, about = "Rotating tetrahedron in the terminal")]
struct Args {
    /// JSON scene configuration; missing fields use the defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Target frames per second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,
}

fn init_logging() {
    // Raw mode owns the screen, so only warnings unless RUST_LOG says otherwise
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<SceneConfig> {
    let Some(path) = path else {
        return Ok(SceneConfig::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    SceneConfig::from_json(&json).with_context(|| format!("invalid config {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    let config = load_config(args.config.as_ref())?;
    if args.print_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }
    log::info!("starting terminal renderer at {} fps", args.fps);

    let mut app = TerminalApp::new(config, args.fps)?;
    app.run()
}
