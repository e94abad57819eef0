//! Route table, navigation guards, and the "navigate to login" signal.
//!
//! The client never navigates by itself; on an unrecoverable authorization failure it calls
//! [`RoutingSignal::navigate_to_login`] and the front end decides what that means. [`Router`]
//! is the built-in implementation: it resolves paths against the application's route table,
//! applies the same guards as the web front end, and records pending login redirects.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{_prelude::*, http::ApiResponse};

/// Notification sink for unrecoverable authorization failures.
pub trait RoutingSignal
where
	Self: Send + Sync,
{
	/// Requests navigation to the login entry point.
	fn navigate_to_login(&self);
}

/// Path prefixes that require a stored access token.
pub const AUTH_REQUIRED_PREFIXES: [&str; 4] =
	["/my-diary/", "/trip-diary/edit/", "/trip-diary/", "/graph"];

/// Returns `true` if `path` is only reachable with a stored access token.
pub fn requires_auth(path: &str) -> bool {
	AUTH_REQUIRED_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Named routes of the application.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Route {
	/// `/`
	Home,
	/// `/signup`
	Signup,
	/// `/attractions`
	Attractions,
	/// `/login`
	Login,
	/// `/my-diary/`, resolved to the signed-in user's diary.
	MyDiaryDefault,
	/// `/my-diary/:userId`
	MyDiary {
		/// Owner of the diary list.
		user_id: String,
	},
	/// `/trip-diary/edit/:diaryId`
	TripDiaryEdit {
		/// Diary being edited.
		diary_id: String,
	},
	/// `/trip-diary/edit`
	TripDiaryNew,
	/// `/trip-diary/:diaryId`
	TripDiaryRead {
		/// Diary being read.
		diary_id: String,
	},
	/// `/settings`
	Settings,
	/// `/file`
	File,
	/// `/graph`
	Graph,
	/// `/404`
	NotFound,
}
impl Route {
	/// Resolves a path (query and fragment ignored) to a route.
	pub fn resolve(path: &str) -> Option<Self> {
		let path = path.split(['?', '#']).next().unwrap_or_default();
		let route = match path {
			"/" | "" => Self::Home,
			"/signup" => Self::Signup,
			"/attractions" => Self::Attractions,
			"/login" => Self::Login,
			"/my-diary/" => Self::MyDiaryDefault,
			"/trip-diary/edit" => Self::TripDiaryNew,
			"/settings" => Self::Settings,
			"/file" => Self::File,
			"/graph" => Self::Graph,
			"/404" => Self::NotFound,
			_ =>
				if let Some(user_id) = single_segment(path, "/my-diary/") {
					Self::MyDiary { user_id }
				} else if let Some(diary_id) = single_segment(path, "/trip-diary/edit/") {
					Self::TripDiaryEdit { diary_id }
				} else if let Some(diary_id) = single_segment(path, "/trip-diary/") {
					Self::TripDiaryRead { diary_id }
				} else {
					return None;
				},
		};

		Some(route)
	}

	/// Stable route name.
	pub const fn name(&self) -> &'static str {
		match self {
			Self::Home => "home",
			Self::Signup => "Signup",
			Self::Attractions => "attractions",
			Self::Login => "Login",
			Self::MyDiaryDefault => "MyDiaryDefault",
			Self::MyDiary { .. } => "MyDiary",
			Self::TripDiaryEdit { .. } => "trip-diary-edit",
			Self::TripDiaryNew => "trip-diary-edit-new",
			Self::TripDiaryRead { .. } => "trip-diary-read",
			Self::Settings => "Settings",
			Self::File => "file",
			Self::Graph => "graph",
			Self::NotFound => "not-found",
		}
	}

	/// Concrete path of this route.
	pub fn path(&self) -> String {
		match self {
			Self::Home => "/".into(),
			Self::Signup => "/signup".into(),
			Self::Attractions => "/attractions".into(),
			Self::Login => "/login".into(),
			Self::MyDiaryDefault => "/my-diary/".into(),
			Self::MyDiary { user_id } => format!("/my-diary/{user_id}"),
			Self::TripDiaryEdit { diary_id } => format!("/trip-diary/edit/{diary_id}"),
			Self::TripDiaryNew => "/trip-diary/edit".into(),
			Self::TripDiaryRead { diary_id } => format!("/trip-diary/{diary_id}"),
			Self::Settings => "/settings".into(),
			Self::File => "/file".into(),
			Self::Graph => "/graph".into(),
			Self::NotFound => "/404".into(),
		}
	}
}
impl Display for Route {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.path())
	}
}

fn single_segment(path: &str, prefix: &str) -> Option<String> {
	let rest = path.strip_prefix(prefix)?;

	(!rest.is_empty() && !rest.contains('/')).then(|| rest.to_owned())
}

/// Facts the guards need about the current session.
#[derive(Clone, Debug, Default)]
pub struct GuardContext {
	/// Whether an access token is stored.
	pub has_access_token: bool,
	/// Identifier of the signed-in user, if known.
	pub user_id: Option<String>,
}

/// Result of running the navigation guards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
	/// Navigation may continue to the resolved route.
	Proceed(Route),
	/// Navigation must continue to another route instead.
	Redirect(Route),
	/// Navigation is cancelled and the login prompt should be shown.
	LoginPrompt,
	/// Navigation is cancelled.
	Reject,
}

/// Route guard and [`RoutingSignal`] implementation that records pending redirects.
#[derive(Debug, Default)]
pub struct Router {
	pending: Mutex<Option<Route>>,
	login_signals: AtomicU64,
}
impl Router {
	/// Runs the navigation guards for a move from `from` to `to`.
	pub fn guard(&self, to: &str, from: Option<&str>, context: &GuardContext) -> Navigation {
		if requires_auth(to) && !context.has_access_token {
			return Navigation::Redirect(Route::Login);
		}

		let Some(route) = Route::resolve(to) else {
			return Navigation::Redirect(Route::NotFound);
		};

		match route {
			Route::Login => Navigation::LoginPrompt,
			Route::MyDiaryDefault => match &context.user_id {
				Some(user_id) => Navigation::Redirect(Route::MyDiary { user_id: user_id.clone() }),
				None => Navigation::Redirect(Route::Login),
			},
			Route::TripDiaryEdit { diary_id } => {
				let expected = Route::TripDiaryRead { diary_id: diary_id.clone() }.path();

				if from == Some(expected.as_str()) {
					Navigation::Proceed(Route::TripDiaryEdit { diary_id })
				} else {
					Navigation::Reject
				}
			},
			route => Navigation::Proceed(route),
		}
	}

	/// Decides where a diary read lands once the diary has been fetched.
	pub fn guard_diary_read(&self, diary_id: &str, outcome: &Result<ApiResponse>) -> Navigation {
		match outcome {
			Ok(_) => Navigation::Proceed(Route::TripDiaryRead { diary_id: diary_id.into() }),
			Err(err) if err.status() == Some(404) => Navigation::Redirect(Route::NotFound),
			Err(_) => Navigation::Reject,
		}
	}

	/// Takes the pending navigation recorded by [`RoutingSignal::navigate_to_login`].
	pub fn take_pending(&self) -> Option<Route> {
		self.pending.lock().take()
	}

	/// Number of login redirects requested so far.
	pub fn login_signals(&self) -> u64 {
		self.login_signals.load(Ordering::Relaxed)
	}
}
impl RoutingSignal for Router {
	fn navigate_to_login(&self) {
		*self.pending.lock() = Some(Route::Login);

		self.login_signals.fetch_add(1, Ordering::Relaxed);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn signed_in(user_id: &str) -> GuardContext {
		GuardContext { has_access_token: true, user_id: Some(user_id.into()) }
	}

	#[test]
	fn resolves_the_route_table() {
		assert_eq!(Route::resolve("/"), Some(Route::Home));
		assert_eq!(Route::resolve("/my-diary/"), Some(Route::MyDiaryDefault));
		assert_eq!(Route::resolve("/my-diary/42"), Some(Route::MyDiary { user_id: "42".into() }));
		assert_eq!(
			Route::resolve("/trip-diary/edit/7?tab=photos"),
			Some(Route::TripDiaryEdit { diary_id: "7".into() }),
		);
		assert_eq!(Route::resolve("/trip-diary/edit"), Some(Route::TripDiaryNew));
		assert_eq!(
			Route::resolve("/trip-diary/7"),
			Some(Route::TripDiaryRead { diary_id: "7".into() }),
		);
		assert_eq!(Route::resolve("/trip-diary/7/extra"), None);
		assert_eq!(Route::resolve("/unknown"), None);
	}

	#[test]
	fn paths_round_trip_through_resolve() {
		for route in [
			Route::Home,
			Route::Graph,
			Route::MyDiary { user_id: "u1".into() },
			Route::TripDiaryEdit { diary_id: "3".into() },
			Route::TripDiaryRead { diary_id: "3".into() },
		] {
			assert_eq!(Route::resolve(&route.path()), Some(route));
		}
	}

	#[test]
	fn protected_paths_redirect_to_login_without_token() {
		let router = Router::default();
		let anonymous = GuardContext::default();

		for path in ["/my-diary/1", "/trip-diary/9", "/trip-diary/edit/9", "/graph"] {
			assert_eq!(
				router.guard(path, None, &anonymous),
				Navigation::Redirect(Route::Login),
				"{path} should require a token",
			);
		}

		assert_eq!(
			router.guard("/attractions", None, &anonymous),
			Navigation::Proceed(Route::Attractions),
		);
		assert_eq!(router.guard("/login", None, &anonymous), Navigation::LoginPrompt);
	}

	#[test]
	fn default_diary_redirects_to_signed_in_user() {
		let router = Router::default();

		assert_eq!(
			router.guard("/my-diary/", None, &signed_in("u-9")),
			Navigation::Redirect(Route::MyDiary { user_id: "u-9".into() }),
		);
	}

	#[test]
	fn editing_requires_coming_from_the_read_page() {
		let router = Router::default();
		let context = signed_in("u-1");

		assert_eq!(
			router.guard("/trip-diary/edit/5", Some("/trip-diary/5"), &context),
			Navigation::Proceed(Route::TripDiaryEdit { diary_id: "5".into() }),
		);
		assert_eq!(router.guard("/trip-diary/edit/5", Some("/"), &context), Navigation::Reject);
		assert_eq!(
			router.guard("/trip-diary/edit/5", Some("/trip-diary/6"), &context),
			Navigation::Reject,
		);
	}

	#[test]
	fn diary_read_failures_route_by_status() {
		let router = Router::default();
		let missing: Result<ApiResponse> =
			Err(Error::Application { status: 404, body: String::new(), retry_after: None });
		let forbidden: Result<ApiResponse> =
			Err(Error::Application { status: 403, body: String::new(), retry_after: None });

		assert_eq!(router.guard_diary_read("5", &missing), Navigation::Redirect(Route::NotFound));
		assert_eq!(router.guard_diary_read("5", &forbidden), Navigation::Reject);
		assert_eq!(
			router.guard_diary_read("5", &Ok(ApiResponse::new(200, "{}"))),
			Navigation::Proceed(Route::TripDiaryRead { diary_id: "5".into() }),
		);
	}

	#[test]
	fn login_signal_records_pending_navigation() {
		let router = Router::default();

		router.navigate_to_login();
		router.navigate_to_login();

		assert_eq!(router.login_signals(), 2);
		assert_eq!(router.take_pending(), Some(Route::Login));
		assert_eq!(router.take_pending(), None);
	}
}
