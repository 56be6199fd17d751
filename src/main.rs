//! nugraph CLI - package dependency graph and version conflict analysis
//!
//! ## Architecture
//!
//! ```text
//! scanner output (JSON facts) → facts loader → graph builder → text / JSON / DOT
//! ```

mod cli;
mod commands;
mod utils;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use nugraph::NugraphError;
use utils::terminal::print_error;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = cli.execute() {
        match err.downcast_ref::<NugraphError>() {
            Some(nugraph_err) => {
                nugraph_err.display_with_hints();
                std::process::exit(nugraph_err.exit_code());
            }
            None => {
                print_error(&format!("{:#}", err));
                std::process::exit(1);
            }
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
