//! Tracing subscriber setup.
//!
//! `RUST_LOG` always wins; otherwise each binary picks its own default
//! filter. Logs go to stderr so the CLI's stdout only carries the result.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter for the `nest` binary.
pub fn cli_filter(verbose: bool) -> &'static str {
    if verbose {
        "nest=debug"
    } else {
        "nest=warn"
    }
}

/// Default filter for the `nest-server` binary.
pub fn server_filter(verbose: bool) -> &'static str {
    if verbose {
        "nest=debug,tower_http=debug"
    } else {
        "nest=info,tower_http=info"
    }
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(cli_filter(verbose)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time()
                .compact(),
        )
        .init();
}

pub fn init_server_logger(verbose: bool, json: bool) {
    let filter = env_filter(server_filter(verbose));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .json(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .compact(),
            )
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filters_parse() {
        for verbose in [false, true] {
            assert!(EnvFilter::try_new(cli_filter(verbose)).is_ok());
            assert!(EnvFilter::try_new(server_filter(verbose)).is_ok());
        }
    }
}
