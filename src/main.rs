use clap::Parser;
use tracing_subscriber::EnvFilter;

use amalgam::cli::{Cli, Commands};
use amalgam::error::exit_code_for;

fn main() {
    init_tracing();

    let cli = Cli::parse();

    // Build a context once, pass everywhere
    let ctx = cli.context();

    let result = match cli.command {
        Some(Commands::Init(args)) => amalgam::infra::config::init(args, &ctx),
        Some(Commands::Completions(args)) => amalgam::completion::run(args, &ctx),
        None => amalgam::core::bundle_run(cli.bundle, cli.config.as_deref(), &ctx),
    };

    if let Err(err) = result {
        eprintln!("error: {err:#}");
        std::process::exit(exit_code_for(&err));
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("AMALGAM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
