//! Client for the trip-journaling backend: bearer-authenticated requests, single-flight token
//! refresh with replay of every request that raced into an expired credential, and thin
//! wrappers over the trip, diary, graph, file, and messaging endpoints.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod refresh;
pub mod routing;
pub mod session;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		client::{AuthenticatedHttpClient, PublicClient, ReqwestAuthClient},
		config::ClientConfig,
		http::ReqwestTransport,
		refresh::HttpRefreshTransport,
		routing::{Router, RoutingSignal},
		store::{CredentialStore, MemoryStore},
	};

	/// Builds a reqwest transport pointed at the provided mock server base URL.
	pub fn test_reqwest_transport(base_url: &str) -> ReqwestTransport {
		let config =
			ClientConfig::parse(base_url).expect("Failed to parse mock server base URL for tests.");

		ReqwestTransport::from_config(&config)
			.expect("Failed to build Reqwest transport for tests.")
	}

	/// Constructs an [`AuthenticatedHttpClient`] backed by an in-memory store and a recording
	/// router, with both pipelines aimed at `base_url`.
	pub fn build_reqwest_test_client(
		base_url: &str,
	) -> (ReqwestAuthClient, Arc<MemoryStore>, Arc<Router>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn CredentialStore> = store_backend.clone();
		let router = Arc::new(Router::default());
		let routing: Arc<dyn RoutingSignal> = router.clone();
		let transport = Arc::new(test_reqwest_transport(base_url));
		let refresher = Arc::new(HttpRefreshTransport::new(Arc::new(test_reqwest_transport(
			base_url,
		))));
		let client = AuthenticatedHttpClient::with_transport(transport, refresher, store, routing);

		(client, store_backend, router)
	}

	/// Constructs a [`PublicClient`] aimed at `base_url`.
	pub fn build_reqwest_public_client(base_url: &str) -> PublicClient<ReqwestTransport> {
		PublicClient::new(Arc::new(test_reqwest_transport(base_url)))
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, VecDeque},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
