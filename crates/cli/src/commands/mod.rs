pub mod decode;
pub mod encode;
pub mod list;
pub mod variants;

use std::sync::Arc;

use expsel::protocol::{Experiment, UNAUTHORIZED};
use expsel::{ExperimentCatalog, LoadOutcome, SessionGate};
use serde::Serialize;
use tracing::info;

use crate::cli::{Cli, Commands, ListingArgs};
use crate::error::{CliError, Result};
use crate::output::{self, OutputFormat, ResultBuilder};
use crate::source::{HttpExperimentSource, StaticTokenAuth};

pub async fn dispatch(cli: Cli) -> Result<()> {
	let format = cli.format;
	let name = cli.command.name();

	match cli.command {
		Commands::Decode(args) => emit(name, decode::run(&args)?, Vec::new(), format),
		Commands::Encode(args) => emit(name, encode::run(&args)?, Vec::new(), format),
		Commands::List(args) => emit(name, list::run(&args).await?, Vec::new(), format),
		Commands::Variants(args) => {
			let report = variants::run(&args).await?;
			let warnings = report.warnings();
			emit(name, report, warnings, format);
		}
	}
	Ok(())
}

fn emit<T: Serialize>(command: &str, data: T, warnings: Vec<String>, format: OutputFormat) {
	let result = warnings
		.into_iter()
		.fold(ResultBuilder::new(command).data(data), |builder, warning| {
			builder.warning(warning)
		})
		.build();
	output::print_result(&result, format);
}

/// Fetches the listing addressed by `args` through the selector's catalog.
///
/// The token is treated as an already established session, so the same
/// signed-in and authorization handling applies as in the widget.
pub async fn load_catalog(args: &ListingArgs) -> Result<Arc<[Experiment]>> {
	let token = args
		.token
		.clone()
		.filter(|token| !token.trim().is_empty())
		.ok_or(CliError::MissingToken)?;

	let source = HttpExperimentSource::new(&args.api_root, token)?;
	let gate = SessionGate::new(Arc::new(StaticTokenAuth::default()));
	gate.on_status_change(true);
	let catalog = ExperimentCatalog::new(Arc::new(source), args.path());

	match catalog.load(&gate).await? {
		LoadOutcome::Replaced(experiments) => {
			info!(count = experiments.len(), path = %catalog.path(), "listing loaded");
			Ok(experiments)
		}
		LoadOutcome::Unauthorized => Err(expsel::Error::Unauthorized {
			code: UNAUTHORIZED,
			message: "access token rejected by the listing service".into(),
		}
		.into()),
		LoadOutcome::Discarded => Err(anyhow::anyhow!("listing discarded: session ended mid-request").into()),
	}
}
