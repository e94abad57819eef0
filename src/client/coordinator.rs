//! Refresh state shared by every request issued through one client.

// std
use std::mem;
// crates.io
use futures::channel::oneshot;
// self
use crate::{_prelude::*, auth::TokenSecret, http::ApiRequest, refresh::RefreshError};

/// What a parked request learns once the refresh settles.
pub(crate) type RefreshOutcome = Result<TokenSecret, RefreshError>;

/// Wake-up handle of a request parked until the in-flight refresh settles.
///
/// Only the outcome crosses the channel; the parked request reissues itself, so its result
/// never depends on the leader still being polled.
pub(crate) struct PendingRequest {
	reply: oneshot::Sender<RefreshOutcome>,
}
impl PendingRequest {
	pub(crate) fn resume(self, access_token: TokenSecret) {
		// The waiting caller may have gone away; nothing to deliver to then.
		let _ = self.reply.send(Ok(access_token));
	}

	pub(crate) fn reject(self, err: RefreshError) {
		let _ = self.reply.send(Err(err));
	}
}

#[derive(Default)]
struct RefreshState {
	refreshing: bool,
	/// Bumped on every successful refresh.
	generation: u64,
	queue: VecDeque<PendingRequest>,
}

/// What a request that just received its first 401 must do next.
pub(crate) enum Admission<'a> {
	/// A refresh is in flight; wait for its outcome, then reissue the request.
	Queued(ApiRequest, oneshot::Receiver<RefreshOutcome>),
	/// A refresh completed after the request was sent; retry with the stored credential.
	Rotated(ApiRequest),
	/// No refresh is in flight; this request performs it.
	Leader(ApiRequest, RefreshTicket<'a>),
}

/// Owns the `refreshing` flag and the FIFO queue.
///
/// The lock is only ever taken between suspension points, so flag flips and queue
/// hand-offs are atomic with respect to every other request.
#[derive(Default)]
pub(crate) struct RefreshCoordinator(Mutex<RefreshState>);
impl RefreshCoordinator {
	pub(crate) fn generation(&self) -> u64 {
		self.0.lock().generation
	}

	pub(crate) fn is_refreshing(&self) -> bool {
		self.0.lock().refreshing
	}

	pub(crate) fn queued(&self) -> usize {
		self.0.lock().queue.len()
	}

	pub(crate) fn admit(&self, request: ApiRequest, observed_generation: u64) -> Admission<'_> {
		let mut state = self.0.lock();

		if state.refreshing {
			let (reply, receiver) = oneshot::channel();

			state.queue.push_back(PendingRequest { reply });

			return Admission::Queued(request, receiver);
		}
		if state.generation != observed_generation {
			return Admission::Rotated(request);
		}

		state.refreshing = true;

		Admission::Leader(request, RefreshTicket { coordinator: self, settled: false })
	}

	fn settle(&self, succeeded: bool) -> VecDeque<PendingRequest> {
		let mut state = self.0.lock();

		state.refreshing = false;

		if succeeded {
			state.generation += 1;
		}

		mem::take(&mut state.queue)
	}
}
impl Debug for RefreshCoordinator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let state = self.0.lock();

		f.debug_struct("RefreshCoordinator")
			.field("refreshing", &state.refreshing)
			.field("generation", &state.generation)
			.field("queued", &state.queue.len())
			.finish()
	}
}

/// Proof that the holder is the single request allowed to refresh.
///
/// Dropping an unsettled ticket returns the coordinator to idle and rejects every waiter
/// with [`RefreshError::Abandoned`].
pub(crate) struct RefreshTicket<'a> {
	coordinator: &'a RefreshCoordinator,
	settled: bool,
}
impl RefreshTicket<'_> {
	/// Flips to idle after the new credential was stored and hands back the queue.
	pub(crate) fn succeed(mut self) -> VecDeque<PendingRequest> {
		self.settled = true;

		self.coordinator.settle(true)
	}

	/// Flips to idle after a failed refresh and hands back the queue.
	pub(crate) fn fail(mut self) -> VecDeque<PendingRequest> {
		self.settled = true;

		self.coordinator.settle(false)
	}
}
impl Drop for RefreshTicket<'_> {
	fn drop(&mut self) {
		if self.settled {
			return;
		}

		for pending in self.coordinator.settle(false) {
			pending.reject(RefreshError::Abandoned);
		}

		crate::obs::record_queue_depth(0);
	}
}
