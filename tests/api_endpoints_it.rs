#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use tripjournal_client::{_preludet::*, auth::CredentialPair, store::CredentialStore};

async fn signed_in_client(
	server: &MockServer,
) -> tripjournal_client::client::ReqwestAuthClient {
	let (client, store, _) = build_reqwest_test_client(&server.base_url());

	store
		.set(CredentialPair::new("access-ok", "refresh-ok"))
		.await
		.expect("Seeding the store should succeed.");

	client
}

#[tokio::test]
async fn public_lookups_send_flattened_query_without_credentials() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_public_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/trip")
				.query_param("sidoCode", "1")
				.query_param("contentTypeId", "12");
			then.status(200)
				.header("content-type", "application/json")
				.body("[{\"title\":\"Gyeongbokgung\"}]");
		})
		.await;
	let response = client
		.list_attraction(&json!({ "sidoCode": 1, "contentTypeId": "12", "keyword": null }))
		.await
		.expect("Attraction search should succeed.");

	mock.assert_async().await;

	let body: serde_json::Value = response.json().expect("Body should decode.");

	assert_eq!(body[0]["title"], "Gyeongbokgung");
}

#[tokio::test]
async fn diary_writes_carry_bearer_and_json_body() {
	let server = MockServer::start_async().await;
	let client = signed_in_client(&server).await;
	let save = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/trip-diary/")
				.header("authorization", "Bearer access-ok")
				.json_body(json!({ "title": "Jeju", "content": "windy" }));
			then.status(201).body("{\"id\":11}");
		})
		.await;
	let share = server
		.mock_async(|when, then| {
			when.method(PATCH)
				.path("/trip-diary/11/share-status")
				.json_body(json!({ "shareStatus": "PUBLIC" }));
			then.status(200);
		})
		.await;
	let unlike = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/trip-diary/11/like");
			then.status(204);
		})
		.await;

	client
		.save_trip_diary(&json!({ "title": "Jeju", "content": "windy" }))
		.await
		.expect("Saving a diary should succeed.");
	client
		.set_share_status_trip_diary(11, &json!({ "shareStatus": "PUBLIC" }))
		.await
		.expect("Updating share status should succeed.");
	client.unlike_trip_diary(11).await.expect("Unliking should succeed.");

	save.assert_async().await;
	share.assert_async().await;
	unlike.assert_async().await;
}

#[tokio::test]
async fn account_diaries_use_the_user_path() {
	let server = MockServer::start_async().await;
	let client = signed_in_client(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/trip-diary/account/u-42");
			then.status(200).body("[]");
		})
		.await;

	client.get_account_trip_diary("u-42").await.expect("Account diaries should load.");

	mock.assert_async().await;
}

#[tokio::test]
async fn image_upload_is_multipart_with_file_field() {
	let server = MockServer::start_async().await;
	let client = signed_in_client(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/file/upload/image")
				.header("authorization", "Bearer access-ok")
				.body_includes("name=\"file\"")
				.body_includes("filename=\"cliff.png\"");
			then.status(200).body("{\"url\":\"/img/cliff.png\"}");
		})
		.await;

	client
		.upload_image("cliff.png", "image/png", b"PNGDATA".to_vec())
		.await
		.expect("Upload should succeed.");

	mock.assert_async().await;
}

#[tokio::test]
async fn message_posts_json() {
	let server = MockServer::start_async().await;
	let client = signed_in_client(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/messages").json_body(json!({ "content": "hello" }));
			then.status(200);
		})
		.await;

	client.send_message(&json!({ "content": "hello" })).await.expect("Message should send.");

	mock.assert_async().await;
}
