//! Deferred invocation handles.
//!
//! A handle is a [`Future`] over one call's outcome plus synchronous status
//! inspection. The outcome lives in a shared settlement cell: the plan that
//! matched the call keeps the cell while it is pending and settles it when its
//! resolution state is set.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use parking_lot::Mutex;

use crate::{Error, Result};

/// Observable state of an [`InvokeHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleStatus {
	/// No outcome yet.
	Pending,
	/// Settled with a value (or void completion).
	Succeeded,
	/// Settled with a planned fault.
	Faulted,
	/// Settled as canceled.
	Canceled,
}

struct CellState<T> {
	outcome: Option<Result<T>>,
	wakers: Vec<Waker>,
}

/// Write-once settlement slot shared between a plan and the handles it issued.
pub(crate) struct HandleCell<T> {
	state: Mutex<CellState<T>>,
}

impl<T> HandleCell<T> {
	fn new(outcome: Option<Result<T>>) -> Self {
		Self {
			state: Mutex::new(CellState { outcome, wakers: Vec::new() }),
		}
	}

	/// Settles the cell. Returns false if it was already settled.
	pub(crate) fn settle(&self, outcome: Result<T>) -> bool {
		let mut state = self.state.lock();
		if state.outcome.is_some() {
			return false;
		}
		state.outcome = Some(outcome);
		let wakers = std::mem::take(&mut state.wakers);
		drop(state);
		for waker in wakers {
			waker.wake();
		}
		true
	}
}

/// Handle to the outcome of one deferred invocation.
///
/// Clones observe the same settlement. Awaiting yields `Ok(value)`,
/// `Err(Error::Faulted(_))` or `Err(Error::Canceled)`.
pub struct InvokeHandle<T> {
	cell: Arc<HandleCell<T>>,
}

impl<T> Clone for InvokeHandle<T> {
	fn clone(&self) -> Self {
		Self {
			cell: Arc::clone(&self.cell),
		}
	}
}

impl<T> InvokeHandle<T> {
	/// Creates a pending handle together with the cell that settles it.
	pub(crate) fn pending() -> (Self, Arc<HandleCell<T>>) {
		let cell = Arc::new(HandleCell::new(None));
		(Self { cell: Arc::clone(&cell) }, cell)
	}

	/// Creates an already settled handle.
	pub(crate) fn settled(outcome: Result<T>) -> Self {
		Self {
			cell: Arc::new(HandleCell::new(Some(outcome))),
		}
	}

	/// Current status.
	pub fn status(&self) -> HandleStatus {
		match &self.cell.state.lock().outcome {
			None => HandleStatus::Pending,
			Some(Ok(_)) => HandleStatus::Succeeded,
			Some(Err(Error::Canceled)) => HandleStatus::Canceled,
			Some(Err(_)) => HandleStatus::Faulted,
		}
	}

	/// Returns true while no outcome has been delivered.
	pub fn is_pending(&self) -> bool {
		self.status() == HandleStatus::Pending
	}

	/// Returns true once settled with a value.
	pub fn is_completed_successfully(&self) -> bool {
		self.status() == HandleStatus::Succeeded
	}

	/// Returns true once settled with a fault.
	pub fn is_faulted(&self) -> bool {
		self.status() == HandleStatus::Faulted
	}

	/// Returns true once settled as canceled.
	pub fn is_canceled(&self) -> bool {
		self.status() == HandleStatus::Canceled
	}
}

impl<T: Clone> InvokeHandle<T> {
	/// Peeks at the outcome without consuming the handle.
	pub fn try_outcome(&self) -> Option<Result<T>> {
		self.cell.state.lock().outcome.clone()
	}
}

impl<T> std::fmt::Debug for InvokeHandle<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("InvokeHandle").field("status", &self.status()).finish()
	}
}

impl<T: Clone> Future for InvokeHandle<T> {
	type Output = Result<T>;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		let mut state = self.cell.state.lock();
		if let Some(outcome) = &state.outcome {
			return Poll::Ready(outcome.clone());
		}
		if !state.wakers.iter().any(|w| w.will_wake(cx.waker())) {
			state.wakers.push(cx.waker().clone());
		}
		Poll::Pending
	}
}

#[cfg(test)]
mod tests {
	use futures::FutureExt;

	use super::*;
	use crate::PlannedFault;

	#[test]
	fn pending_handle_is_not_ready() {
		let (handle, _cell) = InvokeHandle::<u32>::pending();
		assert_eq!(handle.status(), HandleStatus::Pending);
		assert!(handle.clone().now_or_never().is_none());
		assert!(handle.try_outcome().is_none());
	}

	#[tokio::test]
	async fn settle_wakes_awaiting_task() {
		let (handle, cell) = InvokeHandle::<u32>::pending();
		let waiter = tokio::spawn(handle.clone());
		tokio::task::yield_now().await;

		assert!(cell.settle(Ok(7)));
		assert_eq!(waiter.await.expect("waiter task").ok(), Some(7));
		assert!(handle.is_completed_successfully());
	}

	#[test]
	fn settle_is_write_once() {
		let (handle, cell) = InvokeHandle::<u32>::pending();
		assert!(cell.settle(Err(Error::Canceled)));
		assert!(!cell.settle(Ok(1)));
		assert!(handle.is_canceled());
	}

	#[test]
	fn faulted_status_for_planned_fault() {
		let fault = PlannedFault::new(std::io::Error::other("boom"));
		let handle = InvokeHandle::<u32>::settled(Err(Error::Faulted(fault)));
		assert!(handle.is_faulted());
		assert!(!handle.is_canceled());
	}
}
