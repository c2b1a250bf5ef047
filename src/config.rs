use std::{env, path::PathBuf};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::Directive, EnvFilter};

/// Environment variable holding the template root.
pub const TEMPLATES_ENV: &str = "SWEKIT_TEMPLATES";
/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "SWEKIT_LOG";

/// Template root used when neither `--templates` nor `SWEKIT_TEMPLATES` is set.
pub fn default_template_root() -> PathBuf {
    match env::var_os("HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home).join(".swekit").join("templates"),
        _ => PathBuf::from("templates"),
    }
}

/// Build the log filter from a `SWEKIT_LOG` value. `verbosity` only ever makes
/// the filter louder.
pub fn log_filter(env_filter: Option<&str>, verbosity: u8) -> EnvFilter {
    let mut filter = env_filter
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));
    let wanted = match verbosity {
        0 => return filter,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    let louder = filter
        .max_level_hint()
        .map_or(true, |current| wanted > current);
    if louder {
        if let Ok(directive) = format!("swekit={wanted}").parse::<Directive>() {
            filter = filter.add_directive(directive);
        }
    }
    filter
}

/// Install the stderr log subscriber.
pub fn init_logging(verbosity: u8) {
    let env_filter = env::var(LOG_ENV).ok();
    // a subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(env_filter.as_deref(), verbosity))
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}
