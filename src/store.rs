//! Storage contract and built-in stores for the persisted credential pair and user profile.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, UserInfo},
};

/// Boxed future returned by [`CredentialStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Persistence contract for the client's credential pair and the signed-in user's profile.
///
/// The authenticated client is the only writer of the pair between sign-in and sign-out;
/// everything else must treat it as read-only and fetch it again after every suspension point
/// since it may be rotated. The profile is owned by [`UserSession`](crate::session::UserSession).
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Returns the stored pair, if any.
	fn get(&self) -> StoreFuture<'_, Option<CredentialPair>>;

	/// Persists or replaces the stored pair.
	fn set(&self, credential: CredentialPair) -> StoreFuture<'_, ()>;

	/// Returns the stored profile, if any.
	fn get_profile(&self) -> StoreFuture<'_, Option<UserInfo>>;

	/// Persists or replaces the stored profile.
	fn set_profile(&self, profile: UserInfo) -> StoreFuture<'_, ()>;

	/// Removes the stored pair together with the profile.
	fn clear(&self) -> StoreFuture<'_, ()>;
}

/// Everything a store keeps for one signed-in user.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
	/// Access/refresh token pair.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub credential: Option<CredentialPair>,
	/// Profile of the signed-in user.
	#[serde(rename = "userInfo", default, skip_serializing_if = "Option::is_none")]
	pub profile: Option<UserInfo>,
}
impl StoredSession {
	/// Returns `true` when nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.credential.is_none() && self.profile.is_none()
	}
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
