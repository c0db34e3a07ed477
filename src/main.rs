// Entrypoint for the CLI application.
// - Keeps `main` small: set up logging, create an API client and hand it to
//   the interactive shell.

use courier_cli::{ui, ApiClient, ClientConfig};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with prompts. Quiet unless
    // RUST_LOG asks for more.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let api = ApiClient::new(ClientConfig::default())?;
    ui::run(&api)?;
    Ok(())
}
