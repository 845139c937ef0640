use clap::Parser;
use expsel_cli::cli::Cli;
use expsel_cli::error::CliError;
use expsel_cli::output::{self, CommandResult, OutputFormat, ResultBuilder};
use expsel_cli::{commands, logging};

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	let format = cli.format;
	let command = cli.command.name();

	if let Err(err) = commands::dispatch(cli).await {
		handle_error(command, err, format);
		std::process::exit(1);
	}
}

fn handle_error(command: &str, err: CliError, format: OutputFormat) {
	let cmd_error = err.to_command_error();

	output::print_error_stderr(&cmd_error);

	// Machine-readable formats also get a failure envelope on stdout.
	if format != OutputFormat::Text {
		let result: CommandResult<()> = ResultBuilder::new(command)
			.error(cmd_error.code, &cmd_error.message)
			.build();
		output::print_result(&result, format);
	}
}
