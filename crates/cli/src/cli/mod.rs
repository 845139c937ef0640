#[cfg(test)]
mod tests;

use clap::{Args, Parser, Subcommand};
use expsel::protocol::{ANALYTICS_API_ROOT, ListingPath};

use crate::output::OutputFormat;
use crate::styles::cli_styles;

/// Root CLI for expsel.
#[derive(Parser, Debug)]
#[command(name = "expsel")]
#[command(about = "Experiment selector companion - inspect persisted values and listings")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format: json (default), ndjson, or text
	#[arg(short = 'f', long, global = true, value_enum, default_value = "json")]
	pub format: OutputFormat,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Decode a persisted field value into its selection.
	Decode(DecodeArgs),
	/// Encode a selection into the text the host persists.
	Encode(EncodeArgs),
	/// List the experiments of one analytics profile.
	List(ListArgs),
	/// Show the variant options offered for one experiment.
	Variants(VariantsArgs),
}

impl Commands {
	/// Name reported in the result envelope.
	pub fn name(&self) -> &'static str {
		match self {
			Commands::Decode(_) => "decode",
			Commands::Encode(_) => "encode",
			Commands::List(_) => "list",
			Commands::Variants(_) => "variants",
		}
	}
}

#[derive(Args, Debug, Clone)]
pub struct DecodeArgs {
	/// Persisted text, e.g. '["E1","0",{...}]'. Reads stdin when omitted.
	#[arg(value_name = "TEXT")]
	pub text: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct EncodeArgs {
	#[arg(long, value_name = "ID")]
	pub experiment_id: String,

	#[arg(long, value_name = "NAME", default_value = "")]
	pub experiment_name: String,

	/// Position of the variation within the experiment.
	#[arg(long, value_name = "INDEX")]
	pub variant_index: usize,

	#[arg(long, value_name = "NAME", default_value = "")]
	pub variant_name: String,
}

/// Where and how to reach the listing service.
#[derive(Args, Debug, Clone)]
pub struct ListingArgs {
	#[arg(long, value_name = "ID", env = "EXPSEL_ACCOUNT_ID")]
	pub account: String,

	/// Web property id, e.g. UA-1234-1.
	#[arg(long, value_name = "ID", env = "EXPSEL_WEB_PROPERTY_ID")]
	pub property: String,

	#[arg(long, value_name = "ID", env = "EXPSEL_PROFILE_ID")]
	pub profile: String,

	/// OAuth bearer token with the analytics.readonly scope.
	#[arg(long, value_name = "TOKEN", env = "EXPSEL_ACCESS_TOKEN", hide_env_values = true)]
	pub token: Option<String>,

	#[arg(long, value_name = "URL", default_value = ANALYTICS_API_ROOT, hide = true)]
	pub api_root: String,
}

impl ListingArgs {
	pub fn path(&self) -> ListingPath {
		ListingPath::new(&self.account, &self.property, &self.profile)
	}
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
	#[command(flatten)]
	pub listing: ListingArgs,
}

#[derive(Args, Debug, Clone)]
pub struct VariantsArgs {
	#[arg(value_name = "EXPERIMENT_ID")]
	pub experiment_id: String,

	/// Previously stored field value; its variant is checked against the listing.
	#[arg(long, value_name = "TEXT")]
	pub value: Option<String>,

	#[command(flatten)]
	pub listing: ListingArgs,
}
