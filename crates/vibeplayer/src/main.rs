//! vibeplayer - A themed GTK4 video player
//!
//! This is the main entry point for the vibeplayer application.

mod app;
mod services;
pub mod styles;
mod widgets;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use gtk4::Application;
use gtk4::prelude::*;
use tracing::{debug, error, info, warn};

use vibeplayer_core::{Config, logging};

use crate::services::config_manager::ConfigManager;
use crate::services::player::PlayerService;

/// vibeplayer - A themed GTK4 video player
#[derive(Parser, Debug)]
#[command(name = "vibeplayer", version, about, long_about = None)]
struct Args {
    /// Media file or URI to play (falls back to `[video] source` in config)
    media: Option<String>,

    /// Path to the configuration file (uses XDG lookup if not specified)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Start playback immediately (overrides `[video] autoplay`)
    #[arg(long)]
    autoplay: bool,

    /// Mute audio output (overrides `[video] muted`)
    #[arg(long)]
    muted: bool,

    /// Print example configuration and exit
    #[arg(long)]
    print_example_config: bool,

    /// Validate configuration and exit (returns non-zero on errors)
    #[arg(long)]
    check_config: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    logging::init(args.verbose);

    // Load configuration using XDG lookup chain
    // If --config is specified, it must exist and be valid (no fallback)
    let load_result = match Config::find_and_load(args.config.as_deref()) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(ref source) = load_result.source {
        info!("Loaded configuration from {:?}", source);
    } else if load_result.used_defaults {
        warn!("Using default configuration (no config file found)");
    }

    let mut config = load_result.config;

    // Validate configuration (strict - fail on invalid values)
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    debug!("Configuration validated successfully");

    // --check-config: just validate and exit
    if args.check_config {
        if let Some(ref source) = load_result.source {
            println!("Configuration valid: {}", source.display());
        } else {
            println!("Configuration valid (using defaults)");
        }
        return ExitCode::SUCCESS;
    }

    // --print-example-config: print the example config with comments
    if args.print_example_config {
        print!("{}", vibeplayer_core::config::DEFAULT_CONFIG_TOML);
        return ExitCode::SUCCESS;
    }

    // CLI flags override their config counterparts
    if args.autoplay {
        config.video.autoplay = true;
    }
    if args.muted {
        config.video.muted = true;
    }

    info!("Configuration loaded successfully");
    match config.video.effective_source(args.media.as_deref()) {
        Some(source) => info!("Media source: {}", source),
        None => info!("No media source configured; window starts empty"),
    }

    // Run the GTK application
    run_gtk_app(config, load_result.source, args.media)
}

/// Initialize and run the GTK4 application.
fn run_gtk_app(
    config: Config,
    config_source: Option<PathBuf>,
    media_override: Option<String>,
) -> ExitCode {
    // Log the config source for diagnostics
    if let Some(ref source) = config_source {
        info!("Running with configuration file: {}", source.display());
    } else {
        info!("Running with default configuration (no file found)");
    }

    // Initialize the config manager singleton (before GTK, so it's ready for hot-reload)
    ConfigManager::init_global(config.clone(), config_source.clone());

    let app = Application::builder()
        .application_id("io.github.vibeplayer")
        .flags(gtk4::gio::ApplicationFlags::NON_UNIQUE)
        .build();

    // Clone config for the activate closure
    let config_for_activate = config.clone();

    app.connect_activate(move |app| {
        info!("GTK application activated");

        // Load CSS styling
        app::load_css(&config_for_activate);

        // Start the player service: pipeline construction plus the
        // configured (or CLI-pinned) media source.
        PlayerService::init_global(&config_for_activate.video, media_override.as_deref());

        let window = app::create_player_window(app, &config_for_activate);
        window.present();

        // Start config file watcher for live reload
        ConfigManager::global().start_watching();
    });

    app.connect_startup(|_| {
        info!("GTK application starting up");
    });

    app.connect_shutdown(|_| {
        info!("GTK application shutting down");
        // Stop config watcher and tear the pipeline down
        ConfigManager::global().stop_watching();
        PlayerService::global().shutdown();
    });

    // Run the application with empty args (we already parsed with clap)
    let empty_args: Vec<String> = vec![];
    let status = app.run_with_args(&empty_args);

    if status == gtk4::glib::ExitCode::SUCCESS {
        ExitCode::SUCCESS
    } else {
        error!("GTK application exited with error");
        ExitCode::FAILURE
    }
}
