//! Signed-in user state layered over the credential store.
//!
//! The session writes the credential pair only at sign-in and sign-out. Between those, the
//! authenticated client owns the pair; [`UserSession::sync_with_store`] picks up the case where
//! the client cleared it after a failed refresh. The profile is persisted next to the pair so a
//! restarted process still knows who is signed in.

// self
use crate::{
	_prelude::*,
	auth::CredentialPair,
	client::AuthenticatedHttpClient,
	http::{ApiRequest, HttpTransport},
	refresh::RefreshTransport,
	routing::GuardContext,
	store::CredentialStore,
};

pub use crate::auth::{UserInfo, UserKey};

/// Path of the signed-in user's profile endpoint.
pub const PROFILE_PATH: &str = "/members/myProfile";

/// Result of a successful sign-in.
#[derive(Clone, Debug)]
pub struct LoginInfo {
	/// Profile returned by the login endpoint.
	pub user_info: UserInfo,
	/// Issued access token.
	pub access_token: String,
	/// Issued refresh token.
	pub refresh_token: String,
}

#[derive(Debug, Default)]
struct SessionState {
	logged_in: bool,
	user_info: Option<UserInfo>,
}

/// Tracks whether a user is signed in and who it is.
pub struct UserSession {
	store: Arc<dyn CredentialStore>,
	state: AsyncMutex<SessionState>,
}
impl UserSession {
	/// Creates a signed-out session over `store`.
	pub fn new(store: Arc<dyn CredentialStore>) -> Self {
		Self { store, state: AsyncMutex::new(SessionState::default()) }
	}

	/// Stores the issued tokens and profile, then marks the session signed in.
	pub async fn set_login_info(&self, login: LoginInfo) -> Result<()> {
		let mut state = self.state.lock().await;

		self.store.set(CredentialPair::new(login.access_token, login.refresh_token)).await?;
		self.store.set_profile(login.user_info.clone()).await?;

		state.logged_in = true;
		state.user_info = Some(login.user_info);

		Ok(())
	}

	/// Clears the stored tokens and profile, then the in-memory state.
	///
	/// The session stays signed in if the store cannot be cleared.
	pub async fn logout(&self) -> Result<()> {
		let mut state = self.state.lock().await;

		self.store.clear().await?;

		state.logged_in = false;
		state.user_info = None;

		Ok(())
	}

	/// Restores the signed-in flag and profile from the store; returns whether an access token
	/// was found.
	pub async fn initialize_auth(&self) -> Result<bool> {
		let mut state = self.state.lock().await;
		let has_token = self.has_access_token().await?;

		state.logged_in = has_token;
		state.user_info = if has_token { self.store.get_profile().await? } else { None };

		Ok(has_token)
	}

	/// Loads the signed-in user's profile through `client` and remembers it.
	pub async fn fetch_user_profile<T, R>(
		&self,
		client: &AuthenticatedHttpClient<T, R>,
	) -> Result<UserInfo>
	where
		T: ?Sized + HttpTransport,
		R: ?Sized + RefreshTransport,
	{
		let user_info = client.send(ApiRequest::get(PROFILE_PATH)).await?.json::<UserInfo>()?;
		let mut state = self.state.lock().await;

		self.store.set_profile(user_info.clone()).await?;

		state.user_info = Some(user_info.clone());

		Ok(user_info)
	}

	/// Drops the signed-in state if the store no longer holds an access token.
	///
	/// Returns whether the session is still signed in.
	pub async fn sync_with_store(&self) -> Result<bool> {
		let mut state = self.state.lock().await;

		if state.logged_in && !self.has_access_token().await? {
			state.logged_in = false;
			state.user_info = None;
		}

		Ok(state.logged_in)
	}

	/// Whether the session is signed in.
	pub async fn is_logged_in(&self) -> bool {
		self.state.lock().await.logged_in
	}

	/// Profile of the signed-in user, if loaded.
	pub async fn user_info(&self) -> Option<UserInfo> {
		self.state.lock().await.user_info.clone()
	}

	/// Snapshot used by [`Router::guard`](crate::routing::Router::guard).
	pub async fn guard_context(&self) -> Result<GuardContext> {
		let has_access_token = self.has_access_token().await?;
		let user_id =
			self.state.lock().await.user_info.as_ref().map(|info| info.user_id.to_string());

		Ok(GuardContext { has_access_token, user_id })
	}

	async fn has_access_token(&self) -> Result<bool> {
		let credential = self.store.get().await?;

		Ok(credential.is_some_and(|pair| !pair.access_token.is_empty()))
	}
}
impl Debug for UserSession {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("UserSession").finish_non_exhaustive()
	}
}
