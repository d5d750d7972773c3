//! Tracing initialization for tests and debugging runs.

use tracing_subscriber::EnvFilter;

/// Initialize a tracing subscriber filtered by `RUST_LOG`.
///
/// Defaults to `ensayo=info` when `RUST_LOG` is unset. Safe to call from
/// every test; only the first call installs a subscriber.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ensayo=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
    }
}
