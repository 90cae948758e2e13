// NES Emulator - Main Entry Point

use clap::Parser;
use nes_core::display::{run_emulator, WindowConfig};
use nes_core::emulator::Emulator;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser)]
#[command(name = "nes-core")]
#[command(about = "A cycle-accurate NES emulator")]
struct Cli {
    /// Path to the .nes ROM file to run
    rom: PathBuf,

    /// Window scale factor
    #[arg(long, default_value_t = 3)]
    scale: u32,

    /// Raise the tracing filter to debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    let mut emulator = Emulator::new();
    if let Err(err) = emulator.load_rom(&cli.rom) {
        error!(rom = %cli.rom.display(), %err, "failed to load ROM");
        return ExitCode::FAILURE;
    }

    let window_config = WindowConfig::new().with_scale(cli.scale);

    if let Err(err) = run_emulator(window_config, emulator) {
        error!(%err, "emulator exited with an error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
