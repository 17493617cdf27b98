//! opc-stream: entry point.
//!
//! ```text
//! opc-stream                        Stream with opc-stream.toml or defaults
//! opc-stream --config <path>        Load a custom config TOML
//! opc-stream --server host:port     Override the OPC server
//! opc-stream --layout <file.json>   Override the layout file
//! opc-stream --fps <n>              Override the frame rate
//! opc-stream --gen-config           Write default config to stdout
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use opc_stream::config::StreamConfig;
use opc_stream::service::StreamService;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "opc-stream", about = "Stream LED frames to an Open Pixel Control server")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "opc-stream.toml")]
    config: PathBuf,

    /// OPC server address (overrides config). Example: 127.0.0.1:7890
    #[arg(short, long)]
    server: Option<String>,

    /// JSON layout file (overrides config).
    #[arg(short, long)]
    layout: Option<String>,

    /// Frames per second (overrides config).
    #[arg(short, long)]
    fps: Option<f64>,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        let text = toml::to_string_pretty(&StreamConfig::default())?;
        println!("{text}");
        return Ok(());
    }

    let mut config = StreamConfig::load(&cli.config);
    if let Some(server) = cli.server {
        config.network.server = server;
    }
    if let Some(layout) = cli.layout {
        config.layout.path = layout;
    }
    if let Some(fps) = cli.fps {
        config.stream.fps = fps;
    }

    // Init tracing.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("opc-stream v{}", env!("CARGO_PKG_VERSION"));
    info!("server: {}", config.network.server);
    info!("target FPS: {}", config.stream.fps);

    let service = StreamService::new(config);
    let stop = service.stop_handle();

    // Ctrl-C handler.
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Ctrl-C received, shutting down");
        stop.store(false, std::sync::atomic::Ordering::SeqCst);
    });

    let summary = service.run().await?;
    info!(
        "sent {} frames, dropped {}",
        summary.sent, summary.dropped
    );

    Ok(())
}
