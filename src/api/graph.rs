//! Keyword ranking statistics.

// self
use crate::{
	_prelude::*,
	client::AuthenticatedHttpClient,
	http::{ApiRequest, ApiResponse, HttpTransport},
	refresh::RefreshTransport,
};

impl<T, R> AuthenticatedHttpClient<T, R>
where
	T: ?Sized + HttpTransport,
	R: ?Sized + RefreshTransport,
{
	/// Keyword ranking across all users (`GET /graph/keyword/all`).
	pub async fn get_keyword_rank_by_all(&self) -> Result<ApiResponse> {
		self.send(ApiRequest::get("/graph/keyword/all")).await
	}

	/// Keyword ranking grouped by age band (`GET /graph/keyword/age`).
	pub async fn get_keyword_rank_by_age(&self) -> Result<ApiResponse> {
		self.send(ApiRequest::get("/graph/keyword/age")).await
	}
}
