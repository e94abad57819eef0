//! Region, category, and attraction lookups.

// self
use crate::{
	_prelude::*,
	client::PublicClient,
	http::{ApiRequest, ApiResponse, HttpTransport},
};

impl<T> PublicClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Lists provinces (`GET /trip/sido`).
	pub async fn list_sido(&self) -> Result<ApiResponse> {
		self.send(ApiRequest::get("/trip/sido")).await
	}

	/// Lists districts for the given filter (`GET /trip/gugun`).
	pub async fn list_gugun(&self, params: &impl Serialize) -> Result<ApiResponse> {
		self.send(ApiRequest::get("/trip/gugun").query(params)?).await
	}

	/// Lists attraction categories (`GET /trip/category`).
	pub async fn list_category(&self) -> Result<ApiResponse> {
		self.send(ApiRequest::get("/trip/category")).await
	}

	/// Searches attractions (`GET /trip`).
	pub async fn list_attraction(&self, params: &impl Serialize) -> Result<ApiResponse> {
		self.send(ApiRequest::get("/trip").query(params)?).await
	}
}
