use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

/// Filter used when RUST_LOG is not set, by number of `-v` flags
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Initialize tracing output on stderr.
///
/// RUST_LOG takes precedence over `verbosity`. Safe to call more than once,
/// later calls are ignored.
pub fn init_logging(verbosity: u8, ansi_colors: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    // Keep stdout free for previews and diffs
    let result = fmt::Subscriber::builder()
        .with_ansi(ansi_colors)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(verbosity > 1)
        .try_init();

    if result.is_ok() {
        tracing::debug!("Initialized blocksplice v{}", crate::version());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(0), "warn");
        assert_eq!(default_directive(1), "debug");
        assert_eq!(default_directive(5), "trace");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging(0, false);
        init_logging(2, false);
    }
}
