//! Resolver-level error types shared by the fetcher, provider stages, and resolver.
//!
//! The taxonomy distinguishes exactly the failure layers a caller can react to: local
//! configuration problems, transport faults, non-success HTTP statuses, non-JSON content
//! types, and decode failures. Each kind is raised once at the fetcher (or adapter mapping)
//! and propagated unchanged; nothing is retried or recovered internally.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Maximum number of body bytes retained on [`Error::RemoteStatus`] for diagnostics.
const BODY_PREVIEW_MAX: usize = 2_048;

/// Canonical resolver error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or caller-input problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, deadline, cancellation).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body could not be decoded into the expected shape.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// Remote completed the call but returned a non-success HTTP status.
	#[error("The {endpoint} endpoint returned HTTP {status}.")]
	RemoteStatus {
		/// Endpoint label (`profile` or `emails`).
		endpoint: &'static str,
		/// HTTP status code returned by the remote.
		status: u16,
		/// Lossy UTF-8 preview of the response body, capped for diagnostics.
		body: String,
	},
	/// Remote declared a content type other than a JSON media type.
	///
	/// Checked before decode, because an upstream can return an error page with status 200.
	#[error("The {endpoint} endpoint declared a non-JSON content type `{content_type}`.")]
	UnexpectedContentType {
		/// Endpoint label (`profile` or `emails`).
		endpoint: &'static str,
		/// Declared content type; empty when the header was absent.
		content_type: String,
	},
}
impl Error {
	/// Builds an [`Error::RemoteStatus`] with a bounded body preview.
	pub fn remote_status(endpoint: &'static str, status: u16, body: &[u8]) -> Self {
		let preview = &body[..body.len().min(BODY_PREVIEW_MAX)];

		Self::RemoteStatus { endpoint, status, body: String::from_utf8_lossy(preview).into_owned() }
	}
}

/// Configuration and caller-input failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Caller supplied an empty access token.
	#[error("Access token must not be empty.")]
	EmptyAccessToken,
	/// Endpoint base URL cannot carry additional path segments.
	#[error("Endpoint base URL cannot carry a path: {url}.")]
	EndpointNotABase {
		/// Base URL that rejected path segments.
		url: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, deadlines, cancellation).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the user API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The call did not complete within the transport deadline.
	#[error("User API call did not complete within the transport deadline.")]
	TimedOut {
		/// Transport-specific deadline error.
		#[source]
		source: BoxError,
	},
	/// The call was cancelled before completion.
	#[error("User API call was cancelled before completion.")]
	Cancelled,
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the user API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific deadline error.
	pub fn timed_out(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::TimedOut { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timed_out(e) } else { Self::network(e) }
	}
}

/// Decode failures raised after the transport, status, and content-type checks passed.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body was not valid JSON for the expected shape; an empty body lands here too.
	#[error("The {endpoint} endpoint returned a body that does not match the expected shape.")]
	Json {
		/// Endpoint label (`profile` or `emails`).
		endpoint: &'static str,
		/// Structured parsing failure carrying the JSON path that failed.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// JSON parsed, but a required canonical field was absent or unusable.
	#[error("Payload is missing the required `{field}` field.")]
	MissingField {
		/// Name of the missing wire field.
		field: &'static str,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn remote_status_preview_is_bounded_and_lossy() {
		let oversized = vec![b'x'; BODY_PREVIEW_MAX + 64];
		let Error::RemoteStatus { status, body, .. } = Error::remote_status("profile", 502, &oversized)
		else {
			panic!("remote_status must build a RemoteStatus value.");
		};

		assert_eq!(status, 502);
		assert_eq!(body.len(), BODY_PREVIEW_MAX);

		let Error::RemoteStatus { body, .. } = Error::remote_status("emails", 409, &[0xFF, b'o', b'k'])
		else {
			panic!("remote_status must build a RemoteStatus value.");
		};

		assert_eq!(body, "\u{FFFD}ok");
	}
}
