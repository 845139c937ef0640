//! Error types for the experiment selector.

use expsel_protocol::ListingError;
use thiserror::Error;

/// Result type alias for selector operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the selector's collaborators.
///
/// None of these are fatal to a mounted widget: authorization failures are
/// recovered by re-initiating sign-in, and every other failure leaves the
/// catalog in its previous (stale or absent) state.
#[derive(Debug, Error)]
pub enum Error {
	/// Listing call rejected for credential reasons (expired or missing).
	#[error("Authorization rejected ({code}): {message}")]
	Unauthorized { code: i64, message: String },

	/// Listing call answered with a non-authorization error envelope.
	#[error("Listing failed ({code}): {message}")]
	Remote { code: i64, message: String },

	/// The listing request could not be completed.
	#[error("Transport error: {0}")]
	Transport(String),

	/// The listing payload could not be parsed.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// The authentication provider failed to initialise.
	#[error("Authentication provider error: {0}")]
	Auth(String),
}

impl Error {
	/// Returns true if recovery is re-initiating sign-in.
	pub fn is_authorization(&self) -> bool {
		matches!(self, Error::Unauthorized { .. })
	}

	/// Returns true for fetch failures that leave the catalog stale.
	pub fn is_transient(&self) -> bool {
		matches!(
			self,
			Error::Remote { .. } | Error::Transport(_) | Error::Json(_)
		)
	}
}

impl From<ListingError> for Error {
	fn from(error: ListingError) -> Self {
		if error.is_unauthorized() {
			Error::Unauthorized {
				code: error.code,
				message: error.message,
			}
		} else {
			Error::Remote {
				code: error.code,
				message: error.message,
			}
		}
	}
}
