//! Demonstrates a signed-in session whose access token expires mid-flight.
//!
//! A mock backend rejects the stale token, the client refreshes once against
//! `/member/refresh`, replays the rejected requests, and the rotated pair lands in a
//! [`FileStore`]. Point `TRIPJOURNAL_API_URL` at a real backend to skip the mock.

// std
use std::{env, sync::Arc};
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use tripjournal_client::{
	client::AuthenticatedHttpClient,
	config::ClientConfig,
	routing::{Router, RoutingSignal},
	session::{LoginInfo, UserInfo, UserSession},
	store::{CredentialStore, FileStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;

	for path in ["/trip-diary/all", "/graph/keyword/all"] {
		server
			.mock_async(|when, then| {
				when.method(GET).path(path).header("authorization", "Bearer demo-stale");
				then.status(401);
			})
			.await;
		server
			.mock_async(|when, then| {
				when.method(GET).path(path).header("authorization", "Bearer demo-fresh");
				then.status(200).header("content-type", "application/json").body("[]");
			})
			.await;
	}

	let refresh_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/member/refresh");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access-token\":\"demo-fresh\",\"refresh-token\":\"demo-refresh-2\"}");
		})
		.await;
	let config = match ClientConfig::from_env() {
		Ok(config) => config,
		Err(_) => ClientConfig::parse(&server.base_url())?,
	};
	let file_store = Arc::new(FileStore::open(env::temp_dir().join("tripjournal-demo.json"))?);
	let store: Arc<dyn CredentialStore> = file_store.clone();
	let router = Arc::new(Router::default());
	let routing: Arc<dyn RoutingSignal> = router.clone();
	let client = AuthenticatedHttpClient::new(&config, store.clone(), routing)?;
	let session = UserSession::new(store);

	session
		.set_login_info(LoginInfo {
			user_info: UserInfo::new(1),
			access_token: "demo-stale".into(),
			refresh_token: "demo-refresh-1".into(),
		})
		.await?;

	let (diaries, ranks) =
		tokio::join!(client.get_all_trip_diaries(), client.get_keyword_rank_by_all());

	println!("diaries: {}", diaries?.text());
	println!("keyword ranks: {}", ranks?.text());
	println!("refresh calls: {}", refresh_mock.calls_async().await);
	println!("still signed in: {}", session.sync_with_store().await?);
	println!("credentials persisted at {}", file_store.path().display());

	session.logout().await?;

	Ok(())
}
