use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter directives for this workspace's crates at the given level.
fn directives(quiet: bool) -> [&'static str; 2] {
    if quiet {
        ["modelctl=error", "modelctl_core=error"]
    } else {
        ["modelctl=info", "modelctl_core=info"]
    }
}

/// Install the JSON stderr subscriber.
///
/// Quiet mode keeps only error events. `RUST_LOG` still applies on top, so
/// `RUST_LOG=modelctl_core=debug` shows per-document detail.
pub fn init_logging(quiet: bool) {
    let mut filter = EnvFilter::from_default_env();
    for directive in directives(quiet) {
        filter = filter.add_directive(directive.parse().expect("Invalid log directive"));
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(filter)
        .init();
}
