use anyhow::Result;
use clap::Parser;
use metaclassify::cli::{verbosity_filter, Cli, Commands};
use metaclassify::commands::{classify_project, init_config, ClassifyConfig};
use metaclassify::observability::install_panic_hook;
use tracing_subscriber::EnvFilter;

fn init_logging(verbosity: u8) {
    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity_filter(verbosity)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.command.verbosity());
    install_panic_hook();

    match cli.command {
        Commands::Classify {
            ast,
            header_root,
            inputs,
            format,
            output,
            no_warnings,
            suppress_errors,
            config,
            verbosity: _,
        } => classify_project(ClassifyConfig {
            ast,
            header_root,
            inputs,
            format,
            output,
            no_warnings,
            suppress_errors,
            config,
        }),
        Commands::Init { force } => init_config(force),
    }
}
