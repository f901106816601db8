use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Registry};

/// Installs the global tracing subscriber: env-filtered fmt layer on stdout.
pub fn init() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_thread_ids(true)
        .with_target(true);

    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    Registry::default().with(env_filter).with(fmt_layer).init();
}
