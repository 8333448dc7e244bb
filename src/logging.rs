use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the log filter, e.g. `commit_relay=debug`
pub const LOG_ENV_VAR: &str = "COMMIT_RELAY_LOG";

/// Install the global subscriber.
///
/// Under Lambda (`terminal == false`) colors and timestamps are dropped,
/// CloudWatch stamps every line itself.
pub fn setup_logger(terminal: bool) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var(LOG_ENV_VAR)
        .from_env_lossy();

    let fmt = fmt::layer()
        .with_ansi(terminal)
        .with_target(false)
        .with_writer(std::io::stderr);

    let registry = tracing_subscriber::registry().with(env_filter);

    if terminal {
        registry.with(fmt).init();
    } else {
        registry.with(fmt.without_time()).init();
    }
}
