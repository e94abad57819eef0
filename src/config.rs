//! Client configuration: backend base URL, refresh endpoint, and transport tuning.

// std
use std::{env, time::Duration as StdDuration};
// self
use crate::{_prelude::*, error::ConfigError};

/// Connection settings shared by the authenticated and public pipelines.
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// Backend base URL; request paths are appended to it, preserving its own path.
	pub base_url: Url,
	/// Path of the token refresh endpoint.
	pub refresh_path: String,
	/// Per-request timeout applied by the transport, including the refresh call.
	pub timeout: Option<StdDuration>,
	/// Optional `User-Agent` override.
	pub user_agent: Option<String>,
}
impl ClientConfig {
	/// Environment variable consulted by [`ClientConfig::from_env`].
	pub const ENV_BASE_URL: &'static str = "TRIPJOURNAL_API_URL";
	/// Default refresh endpoint path.
	pub const DEFAULT_REFRESH_PATH: &'static str = "/member/refresh";

	/// Creates a configuration for an already-parsed base URL.
	pub fn new(base_url: Url) -> Result<Self> {
		match base_url.scheme() {
			"http" | "https" => Ok(Self {
				base_url,
				refresh_path: Self::DEFAULT_REFRESH_PATH.into(),
				timeout: None,
				user_agent: None,
			}),
			scheme => Err(ConfigError::UnsupportedScheme { scheme: scheme.into() }.into()),
		}
	}

	/// Parses and validates the base URL.
	pub fn parse(base_url: &str) -> Result<Self> {
		let url = Url::parse(base_url).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		Self::new(url)
	}

	/// Reads the base URL from [`ClientConfig::ENV_BASE_URL`].
	pub fn from_env() -> Result<Self> {
		let raw = env::var(Self::ENV_BASE_URL)
			.map_err(|_| ConfigError::MissingEnv { name: Self::ENV_BASE_URL })?;

		Self::parse(raw.trim())
	}

	/// Overrides the refresh endpoint path.
	pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
		self.refresh_path = path.into();

		self
	}

	/// Sets the per-request timeout.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Sets the `User-Agent` header value.
	pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = Some(user_agent.into());

		self
	}

	/// Appends `path` to the base URL.
	pub fn endpoint(&self, path: &str) -> Result<Url> {
		let base = self.base_url.as_str().trim_end_matches('/');
		let joined = if path.starts_with('/') {
			format!("{base}{path}")
		} else {
			format!("{base}/{path}")
		};

		Url::parse(&joined)
			.map_err(|source| ConfigError::InvalidEndpoint { path: path.into(), source }.into())
	}

	/// Builds the reqwest client described by this configuration.
	#[cfg(feature = "reqwest")]
	pub fn build_http_client(&self) -> Result<ReqwestClient> {
		let mut builder = ReqwestClient::builder();

		if let Some(timeout) = self.timeout {
			builder = builder.timeout(timeout);
		}
		if let Some(user_agent) = &self.user_agent {
			builder = builder.user_agent(user_agent.clone());
		}

		builder.build().map_err(|e| ConfigError::from(e).into())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn endpoint_preserves_base_path() {
		let config =
			ClientConfig::parse("https://api.example.com/v1/").expect("Base URL should parse.");

		assert_eq!(
			config.endpoint("/trip-diary/all").expect("Endpoint should join.").as_str(),
			"https://api.example.com/v1/trip-diary/all",
		);
		assert_eq!(
			config.endpoint("trip/sido").expect("Endpoint should join.").as_str(),
			"https://api.example.com/v1/trip/sido",
		);
	}

	#[test]
	fn rejects_non_http_schemes() {
		let err = ClientConfig::parse("ftp://files.example.com")
			.expect_err("Non-HTTP schemes should be rejected.");

		assert!(matches!(
			err,
			Error::Config(ConfigError::UnsupportedScheme { ref scheme }) if scheme == "ftp"
		));
	}

	#[test]
	fn defaults_to_member_refresh_path() {
		let config = ClientConfig::parse("http://localhost:8080")
			.expect("Local base URL should parse.")
			.with_timeout(StdDuration::from_secs(5));

		assert_eq!(config.refresh_path, "/member/refresh");
		assert_eq!(config.timeout, Some(StdDuration::from_secs(5)));
	}
}
