use super::*;

#[test]
fn result_builder_success() {
	let result: CommandResult<String> = ResultBuilder::new("encode").data("[]".to_string()).build();

	assert!(result.ok);
	assert_eq!(result.command, "encode");
	assert_eq!(result.schema_version, Some(SCHEMA_VERSION));
	assert!(result.error.is_none());
	assert!(result.timings.is_some());
}

#[test]
fn result_builder_error() {
	let result: CommandResult<String> = ResultBuilder::new("list")
		.error(ErrorCode::Unauthorized, "Invalid Credentials")
		.build();

	assert!(!result.ok);
	assert!(result.data.is_none());
	assert_eq!(result.error.as_ref().unwrap().code, ErrorCode::Unauthorized);
}

#[test]
fn builder_without_data_is_not_ok() {
	let result: CommandResult<String> = ResultBuilder::new("decode").build();
	assert!(!result.ok);
}

#[test]
fn envelope_serializes_camel_case_and_skips_empty_fields() {
	let result: CommandResult<u32> = ResultBuilder::new("variants").data(3).warning("stale").build();
	let json = serde_json::to_value(&result).unwrap();

	assert_eq!(json["schemaVersion"], 1);
	assert_eq!(json["ok"], true);
	assert_eq!(json["data"], 3);
	assert_eq!(json["warnings"], serde_json::json!(["stale"]));
	assert!(json.get("error").is_none());
	assert!(json["timings"].get("durationMs").is_some());
}

#[test]
fn error_code_display() {
	assert_eq!(ErrorCode::MissingToken.to_string(), "MISSING_TOKEN");
	assert_eq!(ErrorCode::NotFound.to_string(), "NOT_FOUND");
	assert_eq!(
		serde_json::to_value(ErrorCode::RemoteError).unwrap(),
		serde_json::json!("REMOTE_ERROR")
	);
}

#[test]
fn output_format_parse() {
	assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
	assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
	assert!("toon".parse::<OutputFormat>().is_err());
}
