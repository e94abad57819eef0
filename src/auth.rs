//! Credential models: redacted secrets, the access/refresh token pair, and the user profile.

pub mod credential;
pub mod profile;
pub mod secret;

pub use credential::*;
pub use profile::*;
pub use secret::*;
