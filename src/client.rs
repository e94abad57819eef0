//! Request pipelines: the authenticated client with single-flight credential refresh, and the
//! unauthenticated public client.
//!
//! [`AuthenticatedHttpClient::send`] attaches the stored access token to every request. The
//! first 401 a request receives moves it into the refresh protocol: exactly one request (the
//! leader) calls the [`RefreshTransport`], every other request that fails meanwhile parks in a
//! FIFO queue. Once the refresh settles the leader wakes the queue in arrival order and hands
//! each parked request the new token; every request then reissues itself, so a caller that
//! stops polling the leader cannot take the others down with it. A failed refresh rejects the
//! whole batch with the same error, clears the stored credentials, and fires
//! [`RoutingSignal::navigate_to_login`].

mod coordinator;

// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, TokenSecret},
	error::AuthorizationFailure,
	http::{ApiRequest, ApiResponse, HttpTransport, Method},
	obs::{self, PipelineKind, PipelineOutcome, PipelineSpan},
	refresh::{RefreshError, RefreshMetrics, RefreshTransport},
	routing::RoutingSignal,
	store::{CredentialStore, StoreError},
};
#[cfg(feature = "reqwest")]
use crate::{config::ClientConfig, http::ReqwestTransport, refresh::HttpRefreshTransport};
use coordinator::{Admission, RefreshCoordinator, RefreshTicket};

#[cfg(feature = "reqwest")]
/// Authenticated client specialized for the crate's default reqwest transport stack.
pub type ReqwestAuthClient =
	AuthenticatedHttpClient<ReqwestTransport, HttpRefreshTransport<ReqwestTransport>>;

/// Issues backend requests with the stored bearer credential and recovers from expired
/// access tokens without callers noticing.
///
/// Construct one per process and share it (it is cheap to clone); the refresh state lives in
/// the instance, so two independent clients would refresh independently.
pub struct AuthenticatedHttpClient<T, R>
where
	T: ?Sized + HttpTransport,
	R: ?Sized + RefreshTransport,
{
	/// Transport used for every API request and replay.
	pub transport: Arc<T>,
	/// Transport used to call the refresh endpoint.
	pub refresher: Arc<R>,
	/// Store holding the credential pair; this client is its only writer.
	pub store: Arc<dyn CredentialStore>,
	/// Sink notified when the user must sign in again.
	pub routing: Arc<dyn RoutingSignal>,
	/// Shared counters for refresh outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	coordinator: Arc<RefreshCoordinator>,
}
impl<T, R> AuthenticatedHttpClient<T, R>
where
	T: ?Sized + HttpTransport,
	R: ?Sized + RefreshTransport,
{
	/// Creates a client from caller-provided transports.
	pub fn with_transport(
		transport: impl Into<Arc<T>>,
		refresher: impl Into<Arc<R>>,
		store: Arc<dyn CredentialStore>,
		routing: Arc<dyn RoutingSignal>,
	) -> Self {
		Self {
			transport: transport.into(),
			refresher: refresher.into(),
			store,
			routing,
			refresh_metrics: Default::default(),
			coordinator: Default::default(),
		}
	}

	/// Returns `true` while a refresh is in flight.
	pub fn is_refreshing(&self) -> bool {
		self.coordinator.is_refreshing()
	}

	/// Number of requests currently parked behind the in-flight refresh.
	pub fn queued_requests(&self) -> usize {
		self.coordinator.queued()
	}

	/// Sends `request`, transparently refreshing the credential once on a 401.
	pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
		const KIND: PipelineKind = PipelineKind::Request;

		let span = PipelineSpan::new(KIND, "send");

		obs::record_pipeline_outcome(KIND, PipelineOutcome::Attempt);

		let result = span.instrument(self.send_inner(request)).await;

		match &result {
			Ok(_) => obs::record_pipeline_outcome(KIND, PipelineOutcome::Success),
			Err(_) => obs::record_pipeline_outcome(KIND, PipelineOutcome::Failure),
		}

		result
	}

	async fn send_inner(&self, mut request: ApiRequest) -> Result<ApiResponse> {
		let observed_generation = self.coordinator.generation();
		let response = self.dispatch(request.clone()).await?;

		if !response.is_unauthorized() || request.retried {
			return classify(request.method, &request.path, request.retried, response);
		}

		request.retried = true;

		match self.coordinator.admit(request, observed_generation) {
			Admission::Queued(request, receiver) => {
				let depth = self.coordinator.queued();

				self.refresh_metrics.record_queued();
				obs::record_pipeline_outcome(PipelineKind::Request, PipelineOutcome::Queued);
				obs::record_queue_depth(depth);
				obs::queued_event(depth);

				match receiver.await {
					Ok(Ok(access_token)) => self.reissue(request, &access_token).await,
					Ok(Err(err)) => Err(AuthorizationFailure::Refresh(err).into()),
					Err(_) => Err(AuthorizationFailure::Refresh(RefreshError::Abandoned).into()),
				}
			},
			Admission::Rotated(request) => self.dispatch_retried(request).await,
			Admission::Leader(request, ticket) => self.lead_refresh(request, ticket).await,
		}
	}

	/// Sends with whatever access token is stored right now.
	async fn dispatch(&self, request: ApiRequest) -> Result<ApiResponse> {
		let request = match self.store.get().await? {
			Some(credential) => request.bearer(credential.access_token.expose()),
			None => request,
		};

		self.transport.execute(request).await
	}

	async fn dispatch_retried(&self, request: ApiRequest) -> Result<ApiResponse> {
		let (method, path) = (request.method, request.path.clone());
		let response = self.dispatch(request).await?;

		classify(method, &path, true, response)
	}

	async fn lead_refresh(
		&self,
		request: ApiRequest,
		ticket: RefreshTicket<'_>,
	) -> Result<ApiResponse> {
		match self.refresh_credentials().await {
			Ok(credential) => {
				for pending in ticket.succeed() {
					pending.resume(credential.access_token.clone());
				}

				obs::record_queue_depth(0);

				self.reissue(request, &credential.access_token).await
			},
			Err(err) => {
				for pending in ticket.fail() {
					pending.reject(err.clone());
				}

				obs::record_queue_depth(0);

				obs::warn_event("refresh_credentials", &err);

				if let Err(clear_err) = self.store.clear().await {
					obs::warn_event("clear_credentials", &clear_err);
				}

				self.routing.navigate_to_login();

				Err(AuthorizationFailure::Refresh(err).into())
			},
		}
	}

	/// Reads the stored refresh token, calls the refresh transport, and persists the rotated
	/// pair. Never called while another refresh is in flight.
	async fn refresh_credentials(&self) -> Result<CredentialPair, RefreshError> {
		const KIND: PipelineKind = PipelineKind::Refresh;

		let span = PipelineSpan::new(KIND, "refresh_credentials");

		obs::record_pipeline_outcome(KIND, PipelineOutcome::Attempt);
		self.refresh_metrics.record_attempt();

		let result = span
			.instrument(async {
				let current = self
					.store
					.get()
					.await
					.map_err(store_failure)?
					.ok_or(RefreshError::MissingRefreshToken)?;
				let refresh_token = current
					.usable_refresh_token()
					.cloned()
					.ok_or(RefreshError::MissingRefreshToken)?;
				let refreshed = self.refresher.refresh(&refresh_token).await?;
				let rotated = current.rotate(refreshed);

				self.store.set(rotated.clone()).await.map_err(store_failure)?;

				Ok::<_, RefreshError>(rotated)
			})
			.await;

		match &result {
			Ok(_) => {
				self.refresh_metrics.record_success();
				obs::record_pipeline_outcome(KIND, PipelineOutcome::Success);
			},
			Err(_) => {
				self.refresh_metrics.record_failure();
				obs::record_pipeline_outcome(KIND, PipelineOutcome::Failure);
			},
		}

		result
	}

	/// Replays a request with the freshly issued access token. A 401 here is terminal.
	async fn reissue(&self, request: ApiRequest, access_token: &TokenSecret) -> Result<ApiResponse> {
		const KIND: PipelineKind = PipelineKind::Replay;

		let span = PipelineSpan::new(KIND, "reissue");
		let (method, path) = (request.method, request.path.clone());
		let result = span
			.instrument(async {
				let response =
					self.transport.execute(request.bearer(access_token.expose())).await?;

				classify(method, &path, true, response)
			})
			.await;

		match &result {
			Ok(_) => obs::record_pipeline_outcome(KIND, PipelineOutcome::Success),
			Err(_) => obs::record_pipeline_outcome(KIND, PipelineOutcome::Failure),
		}

		result
	}
}
#[cfg(feature = "reqwest")]
impl AuthenticatedHttpClient<ReqwestTransport, HttpRefreshTransport<ReqwestTransport>> {
	/// Creates a client whose API and refresh calls share one reqwest transport.
	///
	/// The refresh call goes straight to the transport, never through this pipeline.
	pub fn new(
		config: &ClientConfig,
		store: Arc<dyn CredentialStore>,
		routing: Arc<dyn RoutingSignal>,
	) -> Result<Self> {
		let transport = Arc::new(ReqwestTransport::from_config(config)?);
		let refresher =
			HttpRefreshTransport::with_path(Arc::clone(&transport), config.refresh_path.clone());

		Ok(Self::with_transport(transport, refresher, store, routing))
	}
}
impl<T, R> Clone for AuthenticatedHttpClient<T, R>
where
	T: ?Sized + HttpTransport,
	R: ?Sized + RefreshTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: Arc::clone(&self.transport),
			refresher: Arc::clone(&self.refresher),
			store: Arc::clone(&self.store),
			routing: Arc::clone(&self.routing),
			refresh_metrics: Arc::clone(&self.refresh_metrics),
			coordinator: Arc::clone(&self.coordinator),
		}
	}
}
impl<T, R> Debug for AuthenticatedHttpClient<T, R>
where
	T: ?Sized + HttpTransport,
	R: ?Sized + RefreshTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthenticatedHttpClient")
			.field("coordinator", &self.coordinator)
			.field("refresh_metrics", &self.refresh_metrics)
			.finish()
	}
}

/// Sends requests without credentials and without any refresh handling.
pub struct PublicClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Transport used for every request.
	pub transport: Arc<T>,
}
impl<T> PublicClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a client over `transport`.
	pub fn new(transport: impl Into<Arc<T>>) -> Self {
		Self { transport: transport.into() }
	}

	/// Sends `request`; every non-2xx status, 401 included, is an [`Error::Application`].
	pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
		let (method, path) = (request.method, request.path.clone());
		let response = self.transport.execute(request).await?;

		classify(method, &path, false, response)
	}
}
#[cfg(feature = "reqwest")]
impl PublicClient<ReqwestTransport> {
	/// Creates a reqwest-backed public client.
	pub fn from_config(config: &ClientConfig) -> Result<Self> {
		Ok(Self::new(ReqwestTransport::from_config(config)?))
	}
}
impl<T> Clone for PublicClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self { transport: Arc::clone(&self.transport) }
	}
}
impl<T> Debug for PublicClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("PublicClient(..)")
	}
}

fn classify(
	method: Method,
	path: &str,
	retried: bool,
	response: ApiResponse,
) -> Result<ApiResponse> {
	if response.is_success() {
		return Ok(response);
	}
	if response.is_unauthorized() && retried {
		return Err(AuthorizationFailure::Rejected { method, path: path.into() }.into());
	}

	Err(response.into_application_error())
}

fn store_failure(err: StoreError) -> RefreshError {
	RefreshError::Storage { message: err.to_string() }
}

#[cfg(test)]
mod tests {
	// std
	use std::{
		io,
		pin::pin,
		sync::atomic::{AtomicUsize, Ordering},
	};
	// crates.io
	use futures::{channel::oneshot, poll};
	// self
	use super::*;
	use crate::{
		auth::RefreshedTokens,
		error::TransportError,
		http::TransportFuture,
		refresh::RefreshFuture,
		routing::{Route, Router},
		store::MemoryStore,
	};

	const OLD_ACCESS: &str = "access-old";
	const NEW_ACCESS: &str = "access-new";

	/// Accepts one bearer token, answers 401 to anything else, and logs what it saw.
	#[derive(Default)]
	struct FakeBackend {
		accepted: Option<&'static str>,
		status: Option<u16>,
		offline: bool,
		hold: Mutex<Option<(&'static str, oneshot::Receiver<()>)>>,
		log: Mutex<Vec<(String, Option<String>)>>,
	}
	impl FakeBackend {
		fn accepting(token: &'static str) -> Self {
			Self { accepted: Some(token), ..Default::default() }
		}

		fn seen(&self) -> Vec<(String, Option<String>)> {
			self.log.lock().clone()
		}
	}
	impl HttpTransport for FakeBackend {
		fn execute(&self, request: ApiRequest) -> TransportFuture<'_> {
			let authorization = request.headers.get("authorization").cloned();

			self.log.lock().push((request.path.clone(), authorization.clone()));

			let outcome = if self.offline {
				Err(TransportError::Io(io::Error::new(io::ErrorKind::ConnectionRefused, "offline"))
					.into())
			} else if let Some(status) = self.status {
				Ok(ApiResponse::new(status, "upstream"))
			} else if self.accepted.map(|token| format!("Bearer {token}")) == authorization {
				Ok(ApiResponse::new(200, request.path.clone()))
			} else {
				Ok(ApiResponse::new(401, ""))
			};
			let hold = {
				let mut slot = self.hold.lock();

				match slot.take() {
					Some((path, gate)) if path == request.path => Some(gate),
					other => {
						*slot = other;

						None
					},
				}
			};

			Box::pin(async move {
				if let Some(gate) = hold {
					let _ = gate.await;
				}

				outcome
			})
		}
	}

	struct FakeRefresher {
		outcome: Result<RefreshedTokens, RefreshError>,
		gate: Mutex<Option<oneshot::Receiver<()>>>,
		calls: AtomicUsize,
		tokens: Mutex<Vec<String>>,
	}
	impl FakeRefresher {
		fn succeeding() -> Self {
			Self::with_outcome(Ok(RefreshedTokens {
				access_token: TokenSecret::new(NEW_ACCESS),
				refresh_token: Some(TokenSecret::new("refresh-new")),
			}))
		}

		fn with_outcome(outcome: Result<RefreshedTokens, RefreshError>) -> Self {
			Self {
				outcome,
				gate: Mutex::new(None),
				calls: AtomicUsize::new(0),
				tokens: Mutex::new(Vec::new()),
			}
		}

		fn gated(self) -> (Self, oneshot::Sender<()>) {
			let (open, gate) = oneshot::channel();

			*self.gate.lock() = Some(gate);

			(self, open)
		}

		fn calls(&self) -> usize {
			self.calls.load(Ordering::SeqCst)
		}
	}
	impl RefreshTransport for FakeRefresher {
		fn refresh<'a>(&'a self, refresh_token: &'a TokenSecret) -> RefreshFuture<'a> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			self.tokens.lock().push(refresh_token.expose().to_owned());

			let gate = self.gate.lock().take();
			let outcome = self.outcome.clone();

			Box::pin(async move {
				if let Some(gate) = gate {
					let _ = gate.await;
				}

				outcome
			})
		}
	}

	type TestClient = AuthenticatedHttpClient<FakeBackend, FakeRefresher>;

	fn build(
		backend: FakeBackend,
		refresher: FakeRefresher,
		credential: Option<CredentialPair>,
	) -> (TestClient, Arc<MemoryStore>, Arc<Router>) {
		let store = Arc::new(match credential {
			Some(credential) => MemoryStore::with_credential(credential),
			None => MemoryStore::default(),
		});
		let router = Arc::new(Router::default());
		let client =
			TestClient::with_transport(backend, refresher, store.clone(), router.clone());

		(client, store, router)
	}

	fn stale_credential() -> Option<CredentialPair> {
		Some(CredentialPair::new(OLD_ACCESS, "refresh-old"))
	}

	#[tokio::test]
	async fn queued_requests_replay_in_fifo_order_after_a_single_refresh() {
		let (refresher, open) = FakeRefresher::succeeding().gated();
		let (client, store, router) =
			build(FakeBackend::accepting(NEW_ACCESS), refresher, stale_credential());
		let mut leader = pin!(client.send(ApiRequest::get("/trip-diary/leader")));

		assert!(poll!(leader.as_mut()).is_pending());
		assert!(client.is_refreshing());

		let mut a = pin!(client.send(ApiRequest::get("/trip-diary/a")));
		let mut b = pin!(client.send(ApiRequest::get("/trip-diary/b")));
		let mut c = pin!(client.send(ApiRequest::get("/trip-diary/c")));

		assert!(poll!(a.as_mut()).is_pending());
		assert!(poll!(b.as_mut()).is_pending());
		assert!(poll!(c.as_mut()).is_pending());
		assert_eq!(client.queued_requests(), 3);

		open.send(()).expect("Refresh gate should still be awaited.");

		let (leader, a, b, c) = futures::join!(leader, a, b, c);

		for (result, path) in [
			(leader, "/trip-diary/leader"),
			(a, "/trip-diary/a"),
			(b, "/trip-diary/b"),
			(c, "/trip-diary/c"),
		] {
			let response = result.expect("Every caller should succeed after the refresh.");

			assert_eq!(response.text(), path);
		}

		assert_eq!(client.refresher.calls(), 1);
		assert_eq!(client.refresher.tokens.lock().as_slice(), ["refresh-old"]);
		assert!(!client.is_refreshing());
		assert_eq!(client.queued_requests(), 0);

		let replays: Vec<_> = client
			.transport
			.seen()
			.into_iter()
			.filter(|(_, auth)| auth.as_deref() == Some("Bearer access-new"))
			.map(|(path, _)| path)
			.collect();

		assert_eq!(
			replays,
			["/trip-diary/leader", "/trip-diary/a", "/trip-diary/b", "/trip-diary/c"],
		);

		let stored = store.snapshot().expect("Rotated credentials should be stored.");

		assert_eq!(stored.access_token.expose(), NEW_ACCESS);
		assert_eq!(stored.refresh_token.as_ref().map(TokenSecret::expose), Some("refresh-new"));
		assert_eq!(router.login_signals(), 0);
		assert_eq!(client.refresh_metrics.queued(), 3);
		assert_eq!(client.refresh_metrics.successes(), 1);
	}

	#[tokio::test]
	async fn refresh_failure_rejects_the_whole_batch_and_signals_login() {
		let (refresher, open) =
			FakeRefresher::with_outcome(Err(RefreshError::Rejected { status: 401 })).gated();
		let (client, store, router) =
			build(FakeBackend::accepting(NEW_ACCESS), refresher, stale_credential());
		let mut leader = pin!(client.send(ApiRequest::get("/graph/keyword/all")));

		assert!(poll!(leader.as_mut()).is_pending());

		let mut waiter = pin!(client.send(ApiRequest::get("/graph/keyword/age")));

		assert!(poll!(waiter.as_mut()).is_pending());

		open.send(()).expect("Refresh gate should still be awaited.");

		let (leader, waiter) = futures::join!(leader, waiter);

		for result in [leader, waiter] {
			let err = result.expect_err("Every caller should see the refresh failure.");

			assert!(matches!(
				err,
				Error::AuthorizationFailed(AuthorizationFailure::Refresh(RefreshError::Rejected {
					status: 401
				}))
			));
		}

		assert!(store.snapshot().is_none());
		assert_eq!(router.login_signals(), 1);
		assert_eq!(router.take_pending(), Some(Route::Login));
		assert!(!client.is_refreshing());
		assert_eq!(client.refresh_metrics.failures(), 1);
	}

	#[tokio::test]
	async fn missing_refresh_token_fails_without_calling_the_refresher() {
		let (client, store, router) = build(
			FakeBackend::accepting(NEW_ACCESS),
			FakeRefresher::succeeding(),
			Some(CredentialPair::access_only(OLD_ACCESS)),
		);
		let err = client
			.send(ApiRequest::get("/trip-diary/all"))
			.await
			.expect_err("A 401 without a refresh token should fail.");

		assert!(matches!(
			err,
			Error::AuthorizationFailed(AuthorizationFailure::Refresh(
				RefreshError::MissingRefreshToken
			))
		));
		assert_eq!(client.refresher.calls(), 0);
		assert!(store.snapshot().is_none());
		assert_eq!(router.login_signals(), 1);
	}

	#[tokio::test]
	async fn replayed_request_refused_again_is_not_retried() {
		let (client, _store, router) =
			build(FakeBackend::default(), FakeRefresher::succeeding(), stale_credential());
		let err = client
			.send(ApiRequest::get("/trip-diary/all"))
			.await
			.expect_err("A second 401 must surface.");

		assert!(matches!(
			err,
			Error::AuthorizationFailed(AuthorizationFailure::Rejected {
				method: Method::Get,
				ref path,
			}) if path == "/trip-diary/all"
		));
		assert_eq!(client.refresher.calls(), 1);
		assert_eq!(client.transport.seen().len(), 2);
		assert_eq!(router.login_signals(), 0);
	}

	#[tokio::test]
	async fn server_errors_bypass_the_refresh_protocol() {
		let backend = FakeBackend { status: Some(500), ..Default::default() };
		let (client, store, _router) =
			build(backend, FakeRefresher::succeeding(), stale_credential());
		let err = client
			.send(ApiRequest::post("/messages"))
			.await
			.expect_err("A 500 must surface immediately.");

		assert!(matches!(err, Error::Application { status: 500, .. }));
		assert_eq!(client.refresher.calls(), 0);
		assert_eq!(client.transport.seen().len(), 1);
		assert!(store.snapshot().is_some());
	}

	#[tokio::test]
	async fn network_failures_bypass_the_refresh_protocol() {
		let backend = FakeBackend { offline: true, ..Default::default() };
		let (client, _store, router) =
			build(backend, FakeRefresher::succeeding(), stale_credential());
		let err = client
			.send(ApiRequest::get("/trip-diary/all"))
			.await
			.expect_err("Network failures must surface immediately.");

		assert!(matches!(err, Error::Transport(_)));
		assert_eq!(client.refresher.calls(), 0);
		assert_eq!(router.login_signals(), 0);
	}

	#[tokio::test]
	async fn late_401_reuses_a_credential_rotated_while_in_flight() {
		let (release, hold) = oneshot::channel();
		let backend = FakeBackend::accepting(NEW_ACCESS);

		*backend.hold.lock() = Some(("/trip-diary/slow", hold));

		let (client, _store, _router) =
			build(backend, FakeRefresher::succeeding(), stale_credential());
		let mut slow = pin!(client.send(ApiRequest::get("/trip-diary/slow")));

		assert!(poll!(slow.as_mut()).is_pending());

		client
			.send(ApiRequest::get("/trip-diary/fast"))
			.await
			.expect("The leader should succeed after refreshing.");
		release.send(()).expect("Slow request should still be held.");

		let response = slow.await.expect("The late request should reuse the rotated token.");

		assert_eq!(response.text(), "/trip-diary/slow");
		assert_eq!(client.refresher.calls(), 1);
	}

	#[tokio::test]
	async fn dropping_the_leader_releases_waiters() {
		let (refresher, _open) = FakeRefresher::succeeding().gated();
		let (client, _store, _router) =
			build(FakeBackend::accepting(NEW_ACCESS), refresher, stale_credential());
		let mut leader = Box::pin(client.send(ApiRequest::get("/trip-diary/1")));

		assert!(poll!(leader.as_mut()).is_pending());

		let mut waiter = pin!(client.send(ApiRequest::get("/trip-diary/2")));

		assert!(poll!(waiter.as_mut()).is_pending());

		drop(leader);

		let err = waiter.await.expect_err("The waiter should be released with an error.");

		assert!(matches!(
			err,
			Error::AuthorizationFailed(AuthorizationFailure::Refresh(RefreshError::Abandoned))
		));
		assert!(!client.is_refreshing());
	}

	#[tokio::test]
	async fn waiters_complete_after_the_leader_is_dropped_post_refresh() {
		let (refresher, open) = FakeRefresher::succeeding().gated();
		let (client, store, router) =
			build(FakeBackend::accepting(NEW_ACCESS), refresher, stale_credential());
		let mut leader = Box::pin(client.send(ApiRequest::get("/trip-diary/leader")));

		assert!(poll!(leader.as_mut()).is_pending());

		let mut waiter = pin!(client.send(ApiRequest::get("/trip-diary/waiter")));

		assert!(poll!(waiter.as_mut()).is_pending());

		// Park the leader's own reissue so it is still in flight when dropped.
		let (_release, hold) = oneshot::channel();

		*client.transport.hold.lock() = Some(("/trip-diary/leader", hold));

		open.send(()).expect("Refresh gate should still be awaited.");

		assert!(poll!(leader.as_mut()).is_pending());
		assert!(!client.is_refreshing());

		drop(leader);

		let response = waiter.await.expect("The waiter should reissue with the new token.");

		assert_eq!(response.status, 200);
		assert_eq!(response.text(), "/trip-diary/waiter");
		assert_eq!(client.refresher.calls(), 1);
		assert_eq!(
			store.snapshot().map(|credential| credential.access_token.expose().to_owned()),
			Some(NEW_ACCESS.to_owned()),
		);
		assert_eq!(router.login_signals(), 0);
	}

	#[tokio::test]
	async fn public_client_treats_401_as_an_application_error() {
		let client = PublicClient::new(FakeBackend::default());
		let err = client
			.send(ApiRequest::get("/trip/sido"))
			.await
			.expect_err("Public requests never refresh.");

		assert!(matches!(err, Error::Application { status: 401, .. }));
	}
}
