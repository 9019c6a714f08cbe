//! `ktorgen` binary: tracing setup and dispatch to the CLI commands.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

const WORKSPACE_TARGETS: [&str; 3] = ["ktorgen", "ktorgen_core", "ktorgen_cli"];

fn main() {
    init_tracing();
    std::process::exit(ktorgen_cli::run_cli(std::env::args().collect()));
}

fn init_tracing() {
    // KTORGEN_LOG holds a level ("debug") or a full filter ("ktorgen_core=trace")
    let filter = match std::env::var("KTORGEN_LOG") {
        Ok(level) if is_plain_level(&level) => workspace_filter(&level),
        Ok(spec) => spec,
        Err(_) => workspace_filter("info"),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry().with(fmt_layer).try_init().is_err() {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn workspace_filter(level: &str) -> String {
    WORKSPACE_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_level_targets_workspace_crates() {
        assert!(is_plain_level("DEBUG"));
        assert!(!is_plain_level("ktorgen_core=trace"));
        assert_eq!(workspace_filter("warn"), "ktorgen=warn,ktorgen_core=warn,ktorgen_cli=warn");
    }
}
