//! Thread-safe in-memory [`CredentialStore`] implementation for tests and short-lived sessions.

// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, UserInfo},
	store::{CredentialStore, StoreFuture, StoredSession},
};

/// Keeps the credential pair and profile in-process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<Mutex<StoredSession>>);
impl MemoryStore {
	/// Creates a store pre-seeded with `credential`.
	pub fn with_credential(credential: CredentialPair) -> Self {
		Self(Arc::new(Mutex::new(StoredSession { credential: Some(credential), profile: None })))
	}

	/// Creates a store pre-seeded with both halves of a signed-in user.
	pub fn with_session(session: StoredSession) -> Self {
		Self(Arc::new(Mutex::new(session)))
	}

	/// Returns the current pair without going through the async contract.
	pub fn snapshot(&self) -> Option<CredentialPair> {
		self.0.lock().credential.clone()
	}

	/// Returns the current profile without going through the async contract.
	pub fn profile_snapshot(&self) -> Option<UserInfo> {
		self.0.lock().profile.clone()
	}
}
impl CredentialStore for MemoryStore {
	fn get(&self) -> StoreFuture<'_, Option<CredentialPair>> {
		let current = self.snapshot();

		Box::pin(async move { Ok(current) })
	}

	fn set(&self, credential: CredentialPair) -> StoreFuture<'_, ()> {
		self.0.lock().credential = Some(credential);

		Box::pin(async { Ok(()) })
	}

	fn get_profile(&self) -> StoreFuture<'_, Option<UserInfo>> {
		let current = self.profile_snapshot();

		Box::pin(async move { Ok(current) })
	}

	fn set_profile(&self, profile: UserInfo) -> StoreFuture<'_, ()> {
		self.0.lock().profile = Some(profile);

		Box::pin(async { Ok(()) })
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		*self.0.lock() = StoredSession::default();

		Box::pin(async { Ok(()) })
	}
}
