use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use radar_cv::{DetectionConfig, MinimapDetector};
use std::path::PathBuf;

mod runner;

#[derive(Parser)]
#[command(name = "radar")]
#[command(about = "Detect champion icons on minimap screenshots")]
#[command(version)]
struct Cli {
    /// JSON detection config. Missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Icon catalog directory (overrides `icons_folder`).
    #[arg(long)]
    icons: Option<PathBuf>,

    /// Directory for minimap, mask, contour and detection images.
    #[arg(long, default_value = "outputs")]
    output: PathBuf,

    /// Also write a JSON report per frame.
    #[arg(long)]
    json: bool,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Screenshot files or directories of screenshots.
    #[arg(required = true)]
    frames: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level.as_str())).init();

    let mut config = match &cli.config {
        Some(path) => DetectionConfig::from_json_file(path)?,
        None => DetectionConfig::default(),
    };
    if let Some(icons) = cli.icons {
        config.icons_folder = icons;
    }
    let save_intermediate = config.visualization.save_intermediate;

    let detector = MinimapDetector::new(config).context("invalid detection config")?;
    let mut source = runner::ScreenshotSource::from_inputs(&cli.frames)?;
    let mut sink = runner::DirectorySink::create(&detector, &cli.output, save_intermediate, cli.json)?;

    let processed = runner::run(&detector, &mut source, &mut sink)?;
    info!("processed {} frames into {:?}", processed, cli.output);
    Ok(())
}
