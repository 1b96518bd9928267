use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
	fmt::{self, MakeWriter},
	layer::SubscriberExt,
	registry::LookupSpan,
	util::SubscriberInitExt,
	EnvFilter, Layer,
};

use crate::config::Config;

/// Plain-text log file plus stdout. Keep the guard alive for as long as logs
/// should be flushed.
pub fn init(config: &Config) -> WorkerGuard {
	let appender = tracing_appender::rolling::never(&config.log_dir, &config.log_file);
	let (file, guard) = tracing_appender::non_blocking(appender);

	tracing_subscriber::registry()
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with(plain_layer(file))
		.with(fmt::layer().with_target(false))
		.init();

	guard
}

/// Lines start with an RFC 3339 timestamp and the level, no colors.
pub fn plain_layer<S, W>(writer: W) -> impl Layer<S>
where
	S: Subscriber + for<'a> LookupSpan<'a>,
	W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
	fmt::layer()
		.with_writer(writer)
		.with_ansi(false)
		.with_target(false)
}
