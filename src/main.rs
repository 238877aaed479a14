use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use anyhow::Result;
use undistort::camera::DEFAULT_FOCAL_LENGTH;
use undistort::distortion::ControlSnapshot;
use undistort::encoder;
use undistort::grid::GridSpec;
use undistort::session::SessionState;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    image: PathBuf,
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(i32).range(-500..=500), allow_negative_numbers = true)]
    k1: i32,
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(i32).range(-500..=500), allow_negative_numbers = true)]
    k2: i32,
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(i32).range(-500..=500), allow_negative_numbers = true)]
    k3: i32,
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(i32).range(-500..=500), allow_negative_numbers = true)]
    p1: i32,
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(i32).range(-500..=500), allow_negative_numbers = true)]
    p2: i32,
    #[arg(long, default_value_t = 1)]
    grid: i32,
    #[arg(long, default_value_t = DEFAULT_FOCAL_LENGTH)]
    focal_length: f64,
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[arg(long)]
    preview: Option<PathBuf>,
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let cli = Cli::parse();

    let mut session = SessionState::new();
    session.set_focal_length(cli.focal_length);
    session.set_grid(GridSpec {
        division: cli.grid,
        ..GridSpec::default()
    });
    session.open_image(Some(&cli.image))?;

    let controls = ControlSnapshot {
        k1: cli.k1,
        k2: cli.k2,
        k3: cli.k3,
        p1: cli.p1,
        p2: cli.p2,
    };
    if controls != ControlSnapshot::default() {
        session.edit_coefficients(controls)?;
    }

    if cli.json {
        println!("{}", serde_json::to_string(&session.controls())?);
    } else {
        println!("{}", session.control_summary());
    }

    if let Some(path) = cli.preview {
        if let Some(preview) = session.preview() {
            encoder::save_jpeg(&preview, &path)?;
        }
    }
    if let Some(path) = cli.output {
        session.save_as(path)?;
    }
    Ok(())
}
