use tracing_subscriber::EnvFilter;

mod audio;
mod catalog;
mod config;
mod insight;
mod playlist;
mod runtime;
mod transport;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Diagnostics are off unless requested; stderr is unusable while the
    // alternate screen is active anyway.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    runtime::run()
}
