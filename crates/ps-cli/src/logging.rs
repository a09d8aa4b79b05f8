use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

/// Maps the number of `-v` flags to the level logged when `RUST_LOG` is unset.
pub fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Sends log lines to stderr so stdout carries only matrices and timings.
///
/// `RUST_LOG` directives take precedence over `default_level`.
pub fn init_subscriber(default_level: LevelFilter) {
    let filter_layer = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}
