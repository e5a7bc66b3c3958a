use tracing_subscriber::{
    EnvFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

/// Directive used when `RUST_LOG` is unset. Stale-cache and 1:1 fallback
/// warnings are always shown; other crates stay quiet.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "spendfx=debug" } else { "spendfx=warn" }
}

/// Installs the global subscriber on stderr so command output stays clean.
pub fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let pretty = verbose.then(|| {
        fmt::layer()
            .pretty()
            .without_time()
            .with_writer(std::io::stderr)
    });
    let compact = (!verbose).then(|| {
        fmt::layer()
            .compact()
            .without_time()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(pretty)
        .with(compact)
        .init();
}
