//! Profile of the signed-in user as the backend reports it.

// self
use crate::_prelude::*;

/// Backend user identifier; the backend emits either a string or a number.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserKey {
	/// Numeric identifier.
	Number(i64),
	/// Textual identifier.
	Text(String),
}
impl Display for UserKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Number(id) => write!(f, "{id}"),
			Self::Text(id) => f.write_str(id),
		}
	}
}
impl From<&str> for UserKey {
	fn from(value: &str) -> Self {
		Self::Text(value.into())
	}
}
impl From<i64> for UserKey {
	fn from(value: i64) -> Self {
		Self::Number(value)
	}
}

/// Profile of the signed-in user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
	/// Backend identifier, used for `/my-diary/{userId}`.
	#[serde(rename = "userId")]
	pub user_id: UserKey,
	/// Remaining profile fields, kept as the backend sent them.
	#[serde(flatten)]
	pub profile: serde_json::Map<String, serde_json::Value>,
}
impl UserInfo {
	/// Creates a profile carrying only the identifier.
	pub fn new(user_id: impl Into<UserKey>) -> Self {
		Self { user_id: user_id.into(), profile: Default::default() }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn user_info_accepts_string_and_numeric_ids() {
		let numeric: UserInfo =
			serde_json::from_str(r#"{"userId":7,"nickname":"kim"}"#).expect("Numeric id parses.");
		let text: UserInfo =
			serde_json::from_str(r#"{"userId":"u-7"}"#).expect("Textual id parses.");

		assert_eq!(numeric.user_id.to_string(), "7");
		assert_eq!(numeric.profile.get("nickname"), Some(&serde_json::json!("kim")));
		assert_eq!(text.user_id, UserKey::from("u-7"));
	}

	#[test]
	fn extra_fields_survive_a_round_trip() {
		let raw = serde_json::json!({ "userId": 3, "email": "a@b.c", "age": 31 });
		let info: UserInfo = serde_json::from_value(raw.clone()).expect("Profile parses.");

		assert_eq!(serde_json::to_value(&info).expect("Profile serializes."), raw);
	}
}
