//! The persisted access/refresh token pair and refresh results.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Access + refresh tokens owned by a [`CredentialStore`](crate::store::CredentialStore).
///
/// Either half may be missing in a partially written store; the access token is what
/// authorizes requests, the refresh token is only ever sent to the refresh endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
	/// Short-lived credential attached to API requests.
	pub access_token: TokenSecret,
	/// Longer-lived credential used solely to obtain a new access token.
	pub refresh_token: Option<TokenSecret>,
}
impl CredentialPair {
	/// Builds a pair from raw token strings.
	pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			refresh_token: Some(TokenSecret::new(refresh_token)),
		}
	}

	/// Builds a pair holding only an access token.
	pub fn access_only(access_token: impl Into<String>) -> Self {
		Self { access_token: TokenSecret::new(access_token), refresh_token: None }
	}

	/// Returns the refresh token when one is present and non-empty.
	pub fn usable_refresh_token(&self) -> Option<&TokenSecret> {
		self.refresh_token.as_ref().filter(|secret| !secret.is_empty())
	}

	/// Applies a refresh result, keeping the previous refresh token when none was issued.
	pub fn rotate(&self, refreshed: RefreshedTokens) -> Self {
		Self {
			access_token: refreshed.access_token,
			refresh_token: refreshed.refresh_token.or_else(|| self.refresh_token.clone()),
		}
	}
}
impl Debug for CredentialPair {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialPair")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.finish()
	}
}

/// Tokens returned by a successful refresh call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefreshedTokens {
	/// Newly issued access token.
	pub access_token: TokenSecret,
	/// Rotated refresh token, if the backend issued one.
	pub refresh_token: Option<TokenSecret>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn rotation_keeps_previous_refresh_token_when_omitted() {
		let current = CredentialPair::new("access-old", "refresh-old");
		let rotated = current.rotate(RefreshedTokens {
			access_token: TokenSecret::new("access-new"),
			refresh_token: None,
		});

		assert_eq!(rotated.access_token.expose(), "access-new");
		assert_eq!(rotated.refresh_token.as_ref().map(TokenSecret::expose), Some("refresh-old"));
	}

	#[test]
	fn blank_refresh_tokens_are_unusable() {
		let pair = CredentialPair::new("access", "  ");

		assert!(pair.usable_refresh_token().is_none());
		assert!(CredentialPair::access_only("access").usable_refresh_token().is_none());
	}

	#[test]
	fn debug_output_redacts_both_tokens() {
		let rendered = format!("{:?}", CredentialPair::new("a-secret", "r-secret"));

		assert!(!rendered.contains("a-secret"));
		assert!(!rendered.contains("r-secret"));
	}
}
