//! Request descriptors, responses, and the transport seam to the network.
//!
//! Every backend call is described by an [`ApiRequest`] and executed by an
//! [`HttpTransport`]. Transports only report failures when no response arrived at all;
//! status classification (success, 401, other errors) belongs to the pipelines in
//! [`crate::client`].

// crates.io
use serde::de::DeserializeOwned;
use serde_json::Value;
use time::format_description::well_known::Rfc2822;
#[cfg(feature = "reqwest")]
use reqwest::{
	Method as ReqwestMethod,
	multipart::{Form, Part},
};
// self
use crate::{_prelude::*, error::ConfigError};
#[cfg(feature = "reqwest")] use crate::{config::ClientConfig, error::TransportError};

/// Boxed future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<ApiResponse>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing backend requests.
///
/// Implementations must return `Ok` for every response that was received, whatever its
/// status, and reserve `Err` for failures where no response exists (network, IO) or the
/// request could not be formed. The pipelines depend on this split to decide whether a
/// refresh is warranted.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and resolves with the raw response.
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_>;
}

/// HTTP methods used by the backend API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `PATCH`
	Patch,
	/// `DELETE`
	Delete,
}
impl Method {
	/// Returns the canonical upper-case method name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Patch => "PATCH",
			Method::Delete => "DELETE",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Payload carried by an [`ApiRequest`].
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RequestBody {
	/// No body.
	#[default]
	Empty,
	/// JSON document sent as `application/json;charset=utf-8`.
	Json(Value),
	/// Single-file `multipart/form-data` upload.
	Multipart(FilePart),
}

/// File attached to a multipart upload.
#[derive(Clone, PartialEq, Eq)]
pub struct FilePart {
	/// Form field name.
	pub field: String,
	/// File name reported to the backend.
	pub file_name: String,
	/// MIME type of the content.
	pub content_type: String,
	/// Raw file content.
	pub bytes: Vec<u8>,
}
impl Debug for FilePart {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FilePart")
			.field("field", &self.field)
			.field("file_name", &self.file_name)
			.field("content_type", &self.content_type)
			.field("len", &self.bytes.len())
			.finish()
	}
}

/// Opaque description of a backend call that can be replayed after a credential refresh.
#[derive(Clone, PartialEq)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Path relative to the configured base URL.
	pub path: String,
	/// Query pairs, in order.
	pub query: Vec<(String, String)>,
	/// Extra headers; header names are stored lower-case.
	pub headers: BTreeMap<String, String>,
	/// Request payload.
	pub body: RequestBody,
	pub(crate) retried: bool,
}
impl ApiRequest {
	/// Header whose value is redacted from `Debug` output.
	const AUTHORIZATION: &'static str = "authorization";

	/// Creates a request without query, headers, or body.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			query: Vec::new(),
			headers: BTreeMap::new(),
			body: RequestBody::Empty,
			retried: false,
		}
	}

	/// Shorthand for a `GET` request.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::Get, path)
	}

	/// Shorthand for a `POST` request.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::Post, path)
	}

	/// Shorthand for a `PUT` request.
	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::Put, path)
	}

	/// Shorthand for a `PATCH` request.
	pub fn patch(path: impl Into<String>) -> Self {
		Self::new(Method::Patch, path)
	}

	/// Shorthand for a `DELETE` request.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::Delete, path)
	}

	/// Sets a header, replacing any previous value.
	pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
		self.headers.insert(name.as_ref().to_ascii_lowercase(), value.into());

		self
	}

	/// Sets the `Authorization: Bearer` header.
	pub fn bearer(self, token: &str) -> Self {
		self.header(Self::AUTHORIZATION, format!("Bearer {token}"))
	}

	/// Serializes `body` as the JSON payload.
	pub fn json(mut self, body: &impl Serialize) -> Result<Self> {
		self.body = RequestBody::Json(serde_json::to_value(body).map_err(ConfigError::from)?);

		Ok(self)
	}

	/// Flattens `params` (which must serialize into an object) into query pairs.
	///
	/// Scalars become a single pair, arrays repeat the key, and nulls are skipped.
	pub fn query(mut self, params: &impl Serialize) -> Result<Self> {
		let value = serde_json::to_value(params).map_err(ConfigError::from)?;
		let Value::Object(map) = value else {
			return Err(ConfigError::InvalidQuery { reason: "top-level value is not an object".into() }
				.into());
		};

		for (key, value) in map {
			match value {
				Value::Null => (),
				Value::Array(items) => {
					for item in items {
						if let Some(item) = query_scalar(&key, item)? {
							self.query.push((key.clone(), item));
						}
					}
				},
				other => {
					if let Some(value) = query_scalar(&key, other)? {
						self.query.push((key, value));
					}
				},
			}
		}

		Ok(self)
	}

	/// Attaches a single file as a `multipart/form-data` body.
	pub fn multipart(mut self, part: FilePart) -> Self {
		self.body = RequestBody::Multipart(part);

		self
	}

	/// Returns `true` once the request has been replayed after a 401.
	pub fn is_retried(&self) -> bool {
		self.retried
	}
}
impl Debug for ApiRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let headers: BTreeMap<&str, &str> = self
			.headers
			.iter()
			.map(|(name, value)| {
				let value = if name == Self::AUTHORIZATION { "<redacted>" } else { value.as_str() };

				(name.as_str(), value)
			})
			.collect();

		f.debug_struct("ApiRequest")
			.field("method", &self.method)
			.field("path", &self.path)
			.field("query", &self.query)
			.field("headers", &headers)
			.field("body", &self.body)
			.field("retried", &self.retried)
			.finish()
	}
}

fn query_scalar(key: &str, value: Value) -> Result<Option<String>> {
	match value {
		Value::Null => Ok(None),
		Value::String(text) => Ok(Some(text)),
		Value::Bool(flag) => Ok(Some(flag.to_string())),
		Value::Number(number) => Ok(Some(number.to_string())),
		Value::Array(_) | Value::Object(_) =>
			Err(ConfigError::InvalidQuery { reason: format!("`{key}` is not a scalar") }.into()),
	}
}

/// Response received from the backend, whatever its status.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response headers with lower-case names.
	pub headers: BTreeMap<String, String>,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// HTTP 401, the only status that engages the refresh protocol.
	pub const UNAUTHORIZED: u16 = 401;

	/// Creates a response with no headers.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, headers: BTreeMap::new(), body: body.into() }
	}

	/// Adds a header; the name is stored lower-case.
	pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
		self.headers.insert(name.as_ref().to_ascii_lowercase(), value.into());

		self
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Returns `true` for HTTP 401.
	pub fn is_unauthorized(&self) -> bool {
		self.status == Self::UNAUTHORIZED
	}

	/// Looks up a header by case-insensitive name.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
	}

	/// Body decoded lossily as UTF-8.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Decodes the body as JSON, reporting the failing path on error.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| Error::Decode { source, status: self.status })
	}

	/// Parses the `Retry-After` header (delta seconds or an RFC 2822 date).
	pub fn retry_after(&self) -> Option<Duration> {
		parse_retry_after(self.header("retry-after")?, OffsetDateTime::now_utc())
	}

	/// Converts a non-success response into [`Error::Application`].
	pub fn into_application_error(self) -> Error {
		let retry_after = self.retry_after();

		Error::Application { status: self.status, body: self.text(), retry_after }
	}
}
impl Debug for ApiResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiResponse")
			.field("status", &self.status)
			.field("headers", &self.headers)
			.field("body_len", &self.body.len())
			.finish()
	}
}

fn parse_retry_after(raw: &str, now: OffsetDateTime) -> Option<Duration> {
	let raw = raw.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX)));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - now;

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

/// [`HttpTransport`] backed by reqwest and anchored at the configured base URL.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
	client: ReqwestClient,
	config: ClientConfig,
}
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a transport and its reqwest client from `config`.
	pub fn from_config(config: &ClientConfig) -> Result<Self> {
		Ok(Self { client: config.build_http_client()?, config: config.clone() })
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient, config: ClientConfig) -> Self {
		Self { client, config }
	}

	/// Configuration this transport resolves paths against.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	fn build(&self, request: ApiRequest) -> Result<reqwest::RequestBuilder> {
		let mut url = self.config.endpoint(&request.path)?;

		if !request.query.is_empty() {
			url.query_pairs_mut().extend_pairs(request.query.iter());
		}

		let method = match request.method {
			Method::Get => ReqwestMethod::GET,
			Method::Post => ReqwestMethod::POST,
			Method::Put => ReqwestMethod::PUT,
			Method::Patch => ReqwestMethod::PATCH,
			Method::Delete => ReqwestMethod::DELETE,
		};
		let mut builder = self.client.request(method, url);

		for (name, value) in &request.headers {
			builder = builder.header(name.as_str(), value.as_str());
		}

		builder = match request.body {
			RequestBody::Empty => builder,
			RequestBody::Json(value) => builder
				.header(reqwest::header::CONTENT_TYPE, "application/json;charset=utf-8")
				.body(serde_json::to_vec(&value).map_err(ConfigError::from)?),
			RequestBody::Multipart(part) => {
				let file = Part::bytes(part.bytes)
					.file_name(part.file_name)
					.mime_str(&part.content_type)
					.map_err(ConfigError::from)?;

				builder.multipart(Form::new().part(part.field, file))
			},
		};

		Ok(builder)
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let response = self.build(request)?.send().await.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let headers = response
				.headers()
				.iter()
				.filter_map(|(name, value)| {
					value.to_str().ok().map(|value| (name.as_str().to_owned(), value.to_owned()))
				})
				.collect();
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

			Ok(ApiResponse { status, headers, body })
		})
	}
}
