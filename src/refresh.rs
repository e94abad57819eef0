//! Refresh transport contract and the default implementation that calls the backend's
//! token refresh endpoint.

mod metrics;

pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	auth::{RefreshedTokens, TokenSecret},
	http::{ApiRequest, HttpTransport},
};

/// Boxed future returned by [`RefreshTransport::refresh`].
pub type RefreshFuture<'a> =
	Pin<Box<dyn Future<Output = Result<RefreshedTokens, RefreshError>> + 'a + Send>>;

/// A way to trade a refresh token for a new access token.
///
/// Implementations perform exactly one network call per invocation and must not route it
/// through the authenticated pipeline.
pub trait RefreshTransport
where
	Self: 'static + Send + Sync,
{
	/// Exchanges `refresh_token` for fresh credentials.
	fn refresh<'a>(&'a self, refresh_token: &'a TokenSecret) -> RefreshFuture<'a>;
}

/// Why a refresh attempt failed.
///
/// The same value is delivered to every request that was waiting on the attempt.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum RefreshError {
	/// No refresh token was stored, so the endpoint was never called.
	#[error("No refresh token found.")]
	MissingRefreshToken,
	/// The refresh endpoint answered with a non-success status.
	#[error("Refresh endpoint rejected the refresh token with HTTP {status}.")]
	Rejected {
		/// HTTP status code.
		status: u16,
	},
	/// No response was received from the refresh endpoint.
	#[error("Refresh endpoint could not be reached: {message}.")]
	Transport {
		/// Transport failure summary.
		message: String,
	},
	/// The refresh endpoint returned a body without the expected tokens.
	#[error("Refresh endpoint returned a malformed response: {message}.")]
	MalformedResponse {
		/// Decoding failure summary.
		message: String,
	},
	/// Reading or persisting the credential pair failed.
	#[error("Credential store failed during refresh: {message}.")]
	Storage {
		/// Store failure summary.
		message: String,
	},
	/// The task driving the refresh was dropped before it finished.
	#[error("Refresh was abandoned before it completed.")]
	Abandoned,
}

/// Body returned by the refresh endpoint.
#[derive(Deserialize)]
struct RefreshBody {
	#[serde(rename = "access-token")]
	access_token: String,
	#[serde(rename = "refresh-token", default)]
	refresh_token: Option<String>,
}

/// [`RefreshTransport`] that sends `GET <refresh path>` with the refresh token as bearer.
#[derive(Debug)]
pub struct HttpRefreshTransport<T>
where
	T: ?Sized + HttpTransport,
{
	transport: Arc<T>,
	path: String,
}
impl<T> HttpRefreshTransport<T>
where
	T: ?Sized + HttpTransport,
{
	/// Uses the default refresh path, `/member/refresh`.
	pub fn new(transport: Arc<T>) -> Self {
		Self::with_path(transport, crate::config::ClientConfig::DEFAULT_REFRESH_PATH)
	}

	/// Uses a custom refresh path.
	pub fn with_path(transport: Arc<T>, path: impl Into<String>) -> Self {
		Self { transport, path: path.into() }
	}
}
impl<T> RefreshTransport for HttpRefreshTransport<T>
where
	T: ?Sized + HttpTransport,
{
	fn refresh<'a>(&'a self, refresh_token: &'a TokenSecret) -> RefreshFuture<'a> {
		Box::pin(async move {
			let request = ApiRequest::get(self.path.as_str()).bearer(refresh_token.expose());
			let response = self
				.transport
				.execute(request)
				.await
				.map_err(|e| RefreshError::Transport { message: e.to_string() })?;

			if !response.is_success() {
				return Err(RefreshError::Rejected { status: response.status });
			}

			let body: RefreshBody = response
				.json()
				.map_err(|e| RefreshError::MalformedResponse { message: e.to_string() })?;
			let access_token = TokenSecret::new(body.access_token);

			if access_token.is_empty() {
				return Err(RefreshError::MalformedResponse {
					message: "access-token is empty".into(),
				});
			}

			Ok(RefreshedTokens {
				access_token,
				refresh_token: body
					.refresh_token
					.map(TokenSecret::new)
					.filter(|secret| !secret.is_empty()),
			})
		})
	}
}
