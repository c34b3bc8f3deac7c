//! # Rig Controller
//!
//! Motion cueing controller for a 3-axis simulator seat rig.
//!
//! Loads `config/controller.toml` (or the given path), connects the actuator
//! driver, homes the rig and then follows the telemetry channel until Ctrl-C.
//! The rig is parked at the home pulse before the process exits.

use clap::Parser;
use rig_common::config::LogLevel;
use rig_common::controller::config::ControllerConfig;
use rig_controller::config::{load_config, log_loaded, Overrides};
use rig_controller::telemetry::CsvFileSource;
use rig_controller::{ControllerError, MotionController};
use rig_hal::DriverRegistry;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::Ordering;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

/// Rig Controller: motion cueing for a 3-axis seat rig
#[derive(Parser, Debug)]
#[command(name = "rig_controller")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Maps game telemetry to actuator motion on a 3-axis seat rig")]
struct Args {
    /// Path to the controller configuration TOML.
    #[arg(default_value = "config/controller.toml")]
    config: PathBuf,

    /// Telemetry CSV file (overrides [telemetry] path).
    #[arg(long, value_name = "PATH")]
    telemetry: Option<PathBuf>,

    /// Use the simulation driver regardless of configuration.
    #[arg(long, conflicts_with = "driver")]
    simulate: bool,

    /// Actuator driver name (overrides [driver] name).
    #[arg(long, value_name = "NAME")]
    driver: Option<String>,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    let loaded = load_config(&args.config);
    let level = loaded
        .as_ref()
        .map(|config| config.shared.log_level)
        .unwrap_or_default();
    setup_tracing(&args, level);

    info!("Rig Controller v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Ok(config) = &loaded {
        log_loaded(config, &args.config);
    }

    let result = loaded
        .map_err(ControllerError::from)
        .and_then(|config| run(&args, config));
    match result {
        Ok(()) | Err(ControllerError::Cancelled(_)) => {}
        Err(e) => {
            error!("FATAL: {e}");
            process::exit(1);
        }
    }

    info!("Rig Controller shutdown complete");
}

fn run(args: &Args, config: ControllerConfig) -> Result<(), ControllerError> {
    let overrides = Overrides {
        telemetry_path: args.telemetry.clone(),
        driver: if args.simulate {
            Some("simulation".to_string())
        } else {
            args.driver.clone()
        },
    };
    let config = overrides.apply(config)?;

    let registry = DriverRegistry::with_builtin_drivers();
    info!("Available drivers: {:?}", registry.list_drivers());
    let driver = registry.create_driver(&config.driver.name)?;

    let source = CsvFileSource::new(&config.telemetry.path);
    source.probe()?;

    let controller = MotionController::new(config);

    // Setup signal handler for graceful shutdown.
    let running = controller.running_flag();
    let store = controller.store();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        running.store(false, Ordering::SeqCst);
        store.wake_all();
    })?;

    let summary = controller.run(driver, Box::new(source))?;
    info!(
        "Run complete: {} samples, {} dispatch cycles, {} moves, {} shakes, parked={}",
        summary.sampler.published,
        summary.dispatch.cycles,
        summary.dispatch.moves,
        summary.dispatch.shakes,
        summary.parked
    );
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments and the configured level.
fn setup_tracing(args: &Args, configured: LogLevel) {
    let filter = if args.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(configured.as_directive()))
    };

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
