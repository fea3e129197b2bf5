//! One-shot completion shared between an [`Observer`] and whoever waits on
//! it.
//!
//! The observer keeps the sending half of a `futures` oneshot channel; the
//! receiving half lives in a [`Completion`] handle. The sender doubles as the
//! observer's disposal signal: writing the terminal result consumes it, and
//! disposing without a result drops it, which wakes every waiter with
//! [`Settlement::Disposed`] instead of leaving it parked.
//!
//! [`Observer`]: crate::observer::Observer

use std::{
  future::Future,
  pin::Pin,
  sync::{Arc, Mutex, PoisonError},
  task::{Context, Poll},
};

use futures::channel::oneshot;
use pin_project_lite::pin_project;

pub(crate) type Resolver<E> = oneshot::Sender<Result<(), E>>;
type Receiver<E> = oneshot::Receiver<Result<(), E>>;

/// How a stream settled, as seen by a waiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement<E> {
  /// `on_done` was the terminal event.
  Done,
  /// `on_error` was the terminal event.
  Failed(E),
  /// The observer was disposed, or dropped, before any terminal event.
  Disposed,
  /// The single result was already consumed by an earlier waiter.
  Taken,
}

impl<E> Settlement<E> {
  /// Collapse into the error, if any.
  ///
  /// Everything except [`Settlement::Failed`] maps to `Ok(())`.
  pub fn into_result(self) -> Result<(), E> {
    match self {
      Settlement::Failed(err) => Err(err),
      _ => Ok(()),
    }
  }

  pub fn is_done(&self) -> bool { matches!(self, Settlement::Done) }

  pub fn is_failed(&self) -> bool { matches!(self, Settlement::Failed(_)) }

  fn received(res: Result<Result<(), E>, oneshot::Canceled>) -> Self {
    match res {
      Ok(Ok(())) => Settlement::Done,
      Ok(Err(err)) => Settlement::Failed(err),
      Err(oneshot::Canceled) => Settlement::Disposed,
    }
  }
}

/// Waiting side of an observer's terminal result.
///
/// Clones share the same underlying channel, so exactly one `block` or
/// `settled` call across all clones receives the result; the rest see
/// [`Settlement::Taken`].
pub struct Completion<E> {
  receiver: Arc<Mutex<Option<Receiver<E>>>>,
}

pub(crate) fn completion<E>() -> (Resolver<E>, Completion<E>) {
  let (tx, rx) = oneshot::channel();
  (tx, Completion { receiver: Arc::new(Mutex::new(Some(rx))) })
}

impl<E> Completion<E> {
  fn take(&self) -> Option<Receiver<E>> {
    self.receiver.lock().unwrap_or_else(PoisonError::into_inner).take()
  }

  /// Park the calling thread until the observer settles.
  ///
  /// Returns at once if the observer already settled or was disposed. A
  /// stream that never terminates and is never disposed blocks forever, so
  /// never call this on the thread that is expected to drive the producer.
  pub fn block(&self) -> Settlement<E> {
    match self.take() {
      Some(rx) => Settlement::received(futures::executor::block_on(rx)),
      None => Settlement::Taken,
    }
  }

  /// Async counterpart of [`block`](Completion::block).
  ///
  /// The result is claimed when this is called, not when the future is first
  /// polled.
  pub fn settled(&self) -> Settled<E> { Settled { rx: self.take() } }

  /// Whether the result has already been claimed by a waiter.
  pub fn is_taken(&self) -> bool {
    self.receiver.lock().unwrap_or_else(PoisonError::into_inner).is_none()
  }
}

impl<E> Clone for Completion<E> {
  fn clone(&self) -> Self { Completion { receiver: self.receiver.clone() } }
}

impl<E> std::fmt::Debug for Completion<E> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Completion").field("is_taken", &self.is_taken()).finish()
  }
}

pin_project! {
  /// Future returned by [`Completion::settled`].
  #[must_use = "futures do nothing unless polled"]
  pub struct Settled<E> {
    #[pin]
    rx: Option<Receiver<E>>,
  }
}

impl<E> Future for Settled<E> {
  type Output = Settlement<E>;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    match self.project().rx.as_pin_mut() {
      Some(rx) => rx.poll(cx).map(Settlement::received),
      None => Poll::Ready(Settlement::Taken),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[rxsingle_macro::test]
  fn resolved_result_is_returned_once() {
    let (tx, completion) = completion::<&str>();
    tx.send(Err("boom")).unwrap();
    let other = completion.clone();
    assert_eq!(completion.block(), Settlement::Failed("boom"));
    assert!(other.is_taken());
    assert_eq!(other.block(), Settlement::Taken);
  }

  #[rxsingle_macro::test]
  fn dropped_resolver_reads_as_disposed() {
    let (tx, completion) = completion::<()>();
    drop(tx);
    assert_eq!(completion.block(), Settlement::Disposed);
  }

  #[rxsingle_macro::test]
  fn into_result_keeps_only_failures() {
    assert_eq!(Settlement::<i32>::Done.into_result(), Ok(()));
    assert_eq!(Settlement::<i32>::Disposed.into_result(), Ok(()));
    assert_eq!(Settlement::<i32>::Taken.into_result(), Ok(()));
    assert_eq!(Settlement::Failed(3).into_result(), Err(3));
  }

  #[rxsingle_macro::test]
  async fn settled_future_resolves() {
    let (tx, completion) = completion::<()>();
    let settled = completion.settled();
    tx.send(Ok(())).unwrap();
    assert_eq!(settled.await, Settlement::Done);
    assert_eq!(completion.settled().await, Settlement::Taken);
  }
}
