//! Client-level error types shared across the pipelines, stores, and endpoint wrappers.

// self
use crate::{_prelude::*, http::Method, refresh::RefreshError};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// No response was received (DNS, TCP, TLS, IO).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Authorization could not be recovered; the caller must sign in again.
	#[error(transparent)]
	AuthorizationFailed(#[from] AuthorizationFailure),

	/// Backend answered with a non-success status other than a recoverable 401.
	#[error("Backend responded with HTTP {status}.")]
	Application {
		/// HTTP status code.
		status: u16,
		/// Raw response body, lossily decoded as UTF-8.
		body: String,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Response body could not be decoded into the requested type.
	#[error("Response body could not be decoded.")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the decoded response.
		status: u16,
	},
}
impl Error {
	/// Returns `true` when the error means the stored credentials are no longer usable.
	pub fn is_authorization_failure(&self) -> bool {
		matches!(self, Self::AuthorizationFailed(_))
	}

	/// Returns the HTTP status attached to the error, when a response was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Application { status, .. } | Self::Decode { status, .. } => Some(*status),
			Self::AuthorizationFailed(AuthorizationFailure::Rejected { .. }) => Some(401),
			_ => None,
		}
	}
}

/// Terminal authorization failures surfaced after recovery was exhausted.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum AuthorizationFailure {
	/// The request was already replayed with a fresh credential and was still refused.
	#[error("Backend rejected {method} {path} after the credential was refreshed.")]
	Rejected {
		/// Method of the refused request.
		method: Method,
		/// Path of the refused request.
		path: String,
	},
	/// The refresh attempt serving this request failed.
	#[error(transparent)]
	Refresh(#[from] RefreshError),
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot be parsed.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL uses a scheme other than http or https.
	#[error("Base URL scheme `{scheme}` is not supported.")]
	UnsupportedScheme {
		/// Rejected scheme.
		scheme: String,
	},
	/// Required environment variable is not set.
	#[error("Environment variable `{name}` is not set.")]
	MissingEnv {
		/// Variable name.
		name: &'static str,
	},
	/// Request path could not be joined with the base URL.
	#[error("Request path `{path}` does not form a valid URL.")]
	InvalidEndpoint {
		/// Offending request path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Query parameters must serialize into a flat JSON object.
	#[error("Query parameters must serialize into an object: {reason}.")]
	InvalidQuery {
		/// Why the parameters were rejected.
		reason: String,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	InvalidBody(#[from] serde_json::Error),
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

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the backend.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the backend.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
