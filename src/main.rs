//! expctr CLI - guided user-study experiment controller

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::Local;
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use expctr::catalog;
use expctr::cli::Args;
use expctr::repl::App;
use expctr::sandbox::Docker;
use expctr::session::SessionManager;

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> expctr::Result<()> {
    let log_path = args.log_file.clone().unwrap_or_else(|| {
        PathBuf::from(format!(
            "experiments_{}.log",
            Local::now().format("%Y%m%d_%H%M%S")
        ))
    });
    let log_file = std::fs::File::create(&log_path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "starting experiment controller");
    println!("Experiment controller version {}", env!("CARGO_PKG_VERSION"));

    // the editor container needs an X display
    match std::env::var("DISPLAY") {
        Ok(display_var) if !display_var.is_empty() => {
            debug!(display = display_var, "display found")
        }
        _ => {
            error!("no display variable set");
            eprintln!("Error: no DISPLAY variable set. A graphical interface is required");
            std::process::exit(1);
        }
    }

    if args.dev {
        info!("dev mode enabled");
        println!("devmode enabled");
        println!("logging to {}", log_path.display());
    }

    let definitions = match &args.catalog {
        Some(path) => catalog::load(path)?,
        None => catalog::builtin::catalog(),
    };
    let (registry, groups) = definitions.build()?;
    info!(
        tasks = registry.len(),
        groups = groups.len(),
        "catalog registered"
    );

    let manager = SessionManager::new(Box::new(Docker::new(args.dev)), args.dev);
    let mut app = App {
        registry,
        catalog: groups,
        manager,
    };

    expctr::repl::run_repl(&mut app)
}
