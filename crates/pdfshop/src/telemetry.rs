use tracing_log::LogTracer;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs a fmt subscriber with `RUST_LOG`-style filtering and bridges the
/// `log` facade into tracing. Safe to call more than once; later calls are
/// no-ops, which keeps test binaries happy.
pub fn init_logging(default_filter: &str) {
    let _ = LogTracer::init();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging("info");
        init_logging("debug");
    }
}
