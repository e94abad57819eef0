//! Trip diary CRUD, sharing, and likes.

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
	/// Creates a diary (`POST /trip-diary/`).
	pub async fn save_trip_diary(&self, body: &impl Serialize) -> Result<ApiResponse> {
		self.send(ApiRequest::post("/trip-diary/").json(body)?).await
	}

	/// Reads a diary (`GET /trip-diary/{id}`).
	pub async fn read_trip_diary(&self, diary_id: impl Display) -> Result<ApiResponse> {
		self.send(ApiRequest::get(format!("/trip-diary/{diary_id}"))).await
	}

	/// Replaces a diary (`PUT /trip-diary/{id}`).
	pub async fn update_trip_diary(
		&self,
		diary_id: impl Display,
		body: &impl Serialize,
	) -> Result<ApiResponse> {
		self.send(ApiRequest::put(format!("/trip-diary/{diary_id}")).json(body)?).await
	}

	/// Deletes a diary (`DELETE /trip-diary/{id}`).
	pub async fn delete_trip_diary(&self, diary_id: impl Display) -> Result<ApiResponse> {
		self.send(ApiRequest::delete(format!("/trip-diary/{diary_id}"))).await
	}

	/// Changes who can see a diary (`PATCH /trip-diary/{id}/share-status`).
	pub async fn set_share_status_trip_diary(
		&self,
		diary_id: impl Display,
		body: &impl Serialize,
	) -> Result<ApiResponse> {
		self.send(ApiRequest::patch(format!("/trip-diary/{diary_id}/share-status")).json(body)?)
			.await
	}

	/// Asks whether the signed-in user may edit a diary (`GET /trip-diary/{id}/auth`).
	pub async fn check_edit_authentication(&self, diary_id: impl Display) -> Result<ApiResponse> {
		self.send(ApiRequest::get(format!("/trip-diary/{diary_id}/auth"))).await
	}

	/// Lists every visible diary (`GET /trip-diary/all`).
	pub async fn get_all_trip_diaries(&self) -> Result<ApiResponse> {
		self.send(ApiRequest::get("/trip-diary/all")).await
	}

	/// Lists one user's diaries (`GET /trip-diary/account/{userId}`).
	pub async fn get_account_trip_diary(&self, user_id: impl Display) -> Result<ApiResponse> {
		self.send(ApiRequest::get(format!("/trip-diary/account/{user_id}"))).await
	}

	/// Likes a diary (`POST /trip-diary/{id}/like`).
	pub async fn like_trip_diary(&self, diary_id: impl Display) -> Result<ApiResponse> {
		self.send(ApiRequest::post(format!("/trip-diary/{diary_id}/like"))).await
	}

	/// Removes a like (`DELETE /trip-diary/{id}/like`).
	pub async fn unlike_trip_diary(&self, diary_id: impl Display) -> Result<ApiResponse> {
		self.send(ApiRequest::delete(format!("/trip-diary/{diary_id}/like"))).await
	}
}
