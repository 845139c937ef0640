use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

pub fn init_logging(verbosity: u8) {
	// 0 = errors only; the selector core's fallback warnings stay quiet
	// 1 (-v) = info for the CLI, warnings from the core
	// 2+ (-vv) = debug for everything, including catalog request tracing
	let filter = match verbosity {
		0 => "error,expsel=off",
		1 => "info,expsel=warn",
		_ => "debug,reqwest=info,hyper_util=info",
	};

	let env_filter = EnvFilter::try_from_env("EXPSEL_LOG").unwrap_or_else(|_| EnvFilter::new(filter));

	let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(stderr)
		.with_target(verbosity > 1)
		.compact()
		.init();
}
