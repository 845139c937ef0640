use thiserror::Error;

use crate::output::{CommandError, ErrorCode};

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error("invalid persisted value: {0}")]
	InvalidValue(#[source] serde_json::Error),

	#[error("no access token; pass --token or set EXPSEL_ACCESS_TOKEN")]
	MissingToken,

	#[error("invalid API root {root}: {source}")]
	ApiRoot {
		root: String,
		#[source]
		source: url::ParseError,
	},

	#[error("experiment not found: {id}")]
	ExperimentNotFound { id: String },

	#[error(transparent)]
	Selector(#[from] expsel::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Anyhow(#[from] anyhow::Error),
}

impl CliError {
	/// Convert this error to a CommandError for structured output
	pub fn to_command_error(&self) -> CommandError {
		let (code, message, details) = match self {
			CliError::InvalidValue(err) => (
				ErrorCode::InvalidInput,
				format!("Persisted value is not a JSON array: {err}"),
				None,
			),
			CliError::MissingToken => (ErrorCode::MissingToken, self.to_string(), None),
			CliError::ApiRoot { root, .. } => (
				ErrorCode::InvalidInput,
				self.to_string(),
				Some(serde_json::json!({ "apiRoot": root })),
			),
			CliError::ExperimentNotFound { id } => (
				ErrorCode::NotFound,
				format!("No experiment with id {id} in this profile"),
				Some(serde_json::json!({ "experimentId": id })),
			),
			CliError::Selector(err) => {
				let code = match err {
					expsel::Error::Unauthorized { .. } => ErrorCode::Unauthorized,
					expsel::Error::Remote { .. } => ErrorCode::RemoteError,
					expsel::Error::Transport(_) => ErrorCode::NetworkError,
					expsel::Error::Json(_) | expsel::Error::Auth(_) => ErrorCode::InternalError,
				};
				(code, err.to_string(), None)
			}
			CliError::Io(err) => (ErrorCode::IoError, err.to_string(), None),
			CliError::Anyhow(err) => (ErrorCode::InternalError, format!("{err:#}"), None),
		};

		CommandError {
			code,
			message,
			details,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unauthorized_maps_to_its_own_code() {
		let err = CliError::from(expsel::Error::Unauthorized {
			code: 401,
			message: "Invalid Credentials".into(),
		});
		let cmd = err.to_command_error();
		assert_eq!(cmd.code, ErrorCode::Unauthorized);
		assert!(cmd.message.contains("Invalid Credentials"));
	}

	#[test]
	fn not_found_carries_experiment_id() {
		let cmd = CliError::ExperimentNotFound { id: "E9".into() }.to_command_error();
		assert_eq!(cmd.code, ErrorCode::NotFound);
		assert_eq!(cmd.details.unwrap()["experimentId"], "E9");
	}

	#[test]
	fn transport_failures_are_network_errors() {
		let cmd = CliError::from(expsel::Error::Transport("connection refused".into())).to_command_error();
		assert_eq!(cmd.code, ErrorCode::NetworkError);
	}
}
