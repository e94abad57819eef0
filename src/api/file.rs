//! Image upload.

// self
use crate::{
	_prelude::*,
	client::AuthenticatedHttpClient,
	http::{ApiRequest, ApiResponse, FilePart, HttpTransport},
	refresh::RefreshTransport,
};

/// Multipart field the backend reads the image from.
pub const UPLOAD_FIELD: &str = "file";

impl<T, R> AuthenticatedHttpClient<T, R>
where
	T: ?Sized + HttpTransport,
	R: ?Sized + RefreshTransport,
{
	/// Uploads an image (`POST /file/upload/image`, `multipart/form-data`).
	pub async fn upload_image(
		&self,
		file_name: impl Into<String>,
		content_type: impl Into<String>,
		bytes: impl Into<Vec<u8>>,
	) -> Result<ApiResponse> {
		let part = FilePart {
			field: UPLOAD_FIELD.into(),
			file_name: file_name.into(),
			content_type: content_type.into(),
			bytes: bytes.into(),
		};

		self.send(ApiRequest::post("/file/upload/image").multipart(part)).await
	}
}
