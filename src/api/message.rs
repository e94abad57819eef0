//! Direct messages between users.

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
	/// Sends a message (`POST /messages`).
	pub async fn send_message(&self, body: &impl Serialize) -> Result<ApiResponse> {
		self.send(ApiRequest::post("/messages").json(body)?).await
	}
}
