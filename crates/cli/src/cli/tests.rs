use clap::Parser;

use super::*;

#[test]
fn parse_decode_command() {
	let args = vec!["expsel", "decode", r#"["E1","0",{}]"#];
	let cli = Cli::try_parse_from(args).unwrap();

	match cli.command {
		Commands::Decode(args) => assert_eq!(args.text.as_deref(), Some(r#"["E1","0",{}]"#)),
		_ => panic!("Expected Decode command"),
	}
	assert_eq!(cli.format, OutputFormat::Json);
}

#[test]
fn parse_encode_command() {
	let args = vec![
		"expsel",
		"encode",
		"--experiment-id",
		"E1",
		"--experiment-name",
		"Exp One",
		"--variant-index",
		"1",
	];
	let cli = Cli::try_parse_from(args).unwrap();

	match cli.command {
		Commands::Encode(args) => {
			assert_eq!(args.experiment_id, "E1");
			assert_eq!(args.experiment_name, "Exp One");
			assert_eq!(args.variant_index, 1);
			assert_eq!(args.variant_name, "");
		}
		_ => panic!("Expected Encode command"),
	}
}

#[test]
fn encode_rejects_non_numeric_index() {
	let args = vec!["expsel", "encode", "--experiment-id", "E1", "--variant-index", "first"];
	assert!(Cli::try_parse_from(args).is_err());
}

#[test]
fn parse_list_command_builds_listing_path() {
	let args = vec![
		"expsel",
		"list",
		"--account",
		"1234",
		"--property",
		"UA-1234-1",
		"--profile",
		"5678",
		"--token",
		"ya29.token",
	];
	let cli = Cli::try_parse_from(args).unwrap();

	match cli.command {
		Commands::List(args) => {
			assert_eq!(
				args.listing.path().to_string(),
				"/analytics/v3/management/accounts/1234/webproperties/UA-1234-1/profiles/5678/experiments"
			);
			assert_eq!(args.listing.token.as_deref(), Some("ya29.token"));
			assert_eq!(args.listing.api_root, ANALYTICS_API_ROOT);
		}
		_ => panic!("Expected List command"),
	}
}

#[test]
fn parse_variants_command() {
	let args = vec![
		"expsel",
		"-f",
		"text",
		"variants",
		"E1",
		"--account",
		"1",
		"--property",
		"UA-1-1",
		"--profile",
		"2",
	];
	let cli = Cli::try_parse_from(args).unwrap();

	assert_eq!(cli.format, OutputFormat::Text);
	match cli.command {
		Commands::Variants(args) => {
			assert_eq!(args.experiment_id, "E1");
			assert_eq!(args.value, None);
		}
		_ => panic!("Expected Variants command"),
	}
}

#[test]
fn verbose_flag_counts() {
	let cli = Cli::try_parse_from(["expsel", "-vv", "decode", "null"]).unwrap();
	assert_eq!(cli.verbose, 2);

	let cli = Cli::try_parse_from(["expsel", "decode", "null", "--verbose"]).unwrap();
	assert_eq!(cli.verbose, 1);
}

#[test]
fn command_names_match_subcommands() {
	let cli = Cli::try_parse_from(["expsel", "decode"]).unwrap();
	assert_eq!(cli.command.name(), "decode");
}
