use clap::Parser;
use tracing_subscriber::EnvFilter;

use transvar_config::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Downloads report progress at info level
    let filter = if cli.verbose {
        EnvFilter::new("transvar_config=debug,info")
    } else {
        EnvFilter::new("transvar_config=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Config(args) => {
            cli::config::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Catalog(args) => {
            cli::catalog::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
