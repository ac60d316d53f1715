use bboxlayer::demo::run_simulation;
use bboxlayer::logging::init_logging;
use bboxlayer::models::layer::DEFAULT_PADDING;
use bboxlayer::{Config, FeatureServer, ZoomRange};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bboxlayer", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve GeoJSON files as bbox-queryable layers over HTTP
    Serve {
        #[arg(long, default_value = "data")]
        data_folder: PathBuf,
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },
    /// Drive bbox layers through a scripted pan/zoom/toggle session
    Simulate {
        #[arg(long, default_value = "data")]
        data_folder: PathBuf,
        /// Start with this layer hidden (repeatable)
        #[arg(long)]
        hide: Vec<String>,
        #[arg(long)]
        zoom_min: Option<f64>,
        #[arg(long)]
        zoom_max: Option<f64>,
        #[arg(long, default_value_t = DEFAULT_PADDING)]
        padding: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    match Cli::parse().command {
        Command::Serve { data_folder, port } => {
            let config = Config {
                data_folder,
                port,
                ..Config::default()
            };
            FeatureServer::new(config)?.start().await
        }
        Command::Simulate {
            data_folder,
            hide,
            zoom_min,
            zoom_max,
            padding,
        } => {
            let config = Config {
                data_folder,
                padding,
                ..Config::default()
            };
            run_simulation(&config, ZoomRange::new(zoom_min, zoom_max), &hide).await?;
            Ok(())
        }
    }
}
