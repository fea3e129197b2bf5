//! Backpressure strategies and the bounded channel that enforces them.
//!
//! An [`Observer`] only stores its [`BackpressureStrategy`]; it never
//! enforces it. Enforcement happens on the producer side: [`channel`] reads
//! the strategy off the observer and builds a [`Publisher`] for the producing
//! thread and a [`Drain`] that feeds the observer on the consuming thread.
//! When the consumer falls behind and the queue is full, the publisher
//! applies the strategy.
//!
//! ```
//! use std::thread;
//!
//! use rxsingle::prelude::*;
//!
//! let mut total = 0;
//! let mut observer = Observer::<u32, BackpressureError>::builder()
//!   .on_next(|v| total += v)
//!   .backpressure(BackpressureStrategy::Block)
//!   .build();
//! let (publisher, drain) = backpressure::channel(&observer, 4);
//!
//! let producer = thread::spawn(move || {
//!   for v in 1..=100 {
//!     publisher.next(v).unwrap();
//!   }
//!   publisher.complete();
//! });
//! drain.run(&mut observer);
//! producer.join().unwrap();
//!
//! assert_eq!(observer.block(), Settlement::Done);
//! drop(observer);
//! assert_eq!(total, 5050);
//! ```

use std::{
  collections::VecDeque,
  sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
};

use tracing::{debug, trace, warn};

use crate::{error::BackpressureError, observer::Observer};

/// What a producer does when the consumer cannot keep up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackpressureStrategy {
  /// Park the producer until the consumer frees a slot.
  #[default]
  Block,
  /// Queue without bound; capacity is ignored.
  Buffer,
  /// Discard the incoming value.
  DropNewest,
  /// Evict the oldest queued value to make room for the incoming one.
  DropOldest,
  /// Fail fast: reject the value and terminate the stream with
  /// [`BackpressureError::Overflow`].
  Error,
}

enum Terminal<E> {
  Done,
  Failed(E),
  Overflow,
  Abandoned,
}

struct State<T, E> {
  queue: VecDeque<T>,
  terminal: Option<Terminal<E>>,
  // Set once the drain has taken the terminal event.
  terminated: bool,
  drain_gone: bool,
  dropped: usize,
}

impl<T, E> State<T, E> {
  fn is_closed(&self) -> bool { self.drain_gone || self.terminated || self.terminal.is_some() }
}

struct Shared<T, E> {
  state: Mutex<State<T, E>>,
  readable: Condvar,
  writable: Condvar,
  capacity: usize,
  strategy: BackpressureStrategy,
}

impl<T, E> Shared<T, E> {
  fn lock(&self) -> MutexGuard<'_, State<T, E>> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

/// Build a channel that enforces `observer`'s strategy with room for
/// `capacity` queued values (at least one).
pub fn channel<T, E>(observer: &Observer<'_, T, E>, capacity: usize) -> (Publisher<T, E>, Drain<T, E>) {
  let shared = Arc::new(Shared {
    state: Mutex::new(State {
      queue: VecDeque::new(),
      terminal: None,
      terminated: false,
      drain_gone: false,
      dropped: 0,
    }),
    readable: Condvar::new(),
    writable: Condvar::new(),
    capacity: capacity.max(1),
    strategy: observer.backpressure_strategy(),
  });
  (Publisher { shared: shared.clone(), finished: false }, Drain { shared })
}

// ============================================================================
// Publisher
// ============================================================================

/// Producing half of a backpressure [`channel`].
///
/// Dropping it without [`complete`](Publisher::complete) or
/// [`error`](Publisher::error) disposes the observer once the queue drains.
pub struct Publisher<T, E> {
  shared: Arc<Shared<T, E>>,
  finished: bool,
}

impl<T, E> Publisher<T, E> {
  /// Offer a value, applying the strategy if the queue is full.
  ///
  /// # Errors
  /// - [`BackpressureError::Overflow`] under
  ///   [`BackpressureStrategy::Error`] when the queue is full; the stream is
  ///   failed from then on.
  /// - [`BackpressureError::Closed`] once the drain is gone or the stream has
  ///   terminated.
  pub fn next(&self, value: T) -> Result<(), BackpressureError> {
    let shared = &*self.shared;
    let mut state = shared.lock();
    if state.is_closed() {
      return Err(BackpressureError::Closed);
    }

    if state.queue.len() >= shared.capacity {
      match shared.strategy {
        BackpressureStrategy::Buffer => {}
        BackpressureStrategy::Block => {
          while state.queue.len() >= shared.capacity && !state.drain_gone {
            state = shared.writable.wait(state).unwrap_or_else(PoisonError::into_inner);
          }
          if state.drain_gone {
            return Err(BackpressureError::Closed);
          }
        }
        BackpressureStrategy::DropNewest => {
          state.dropped += 1;
          debug!(dropped = state.dropped, "queue full, newest value dropped");
          return Ok(());
        }
        BackpressureStrategy::DropOldest => {
          state.queue.pop_front();
          state.dropped += 1;
          debug!(dropped = state.dropped, "queue full, oldest value evicted");
        }
        BackpressureStrategy::Error => {
          warn!(capacity = shared.capacity, "queue full, failing the stream");
          state.terminal = Some(Terminal::Overflow);
          shared.readable.notify_one();
          return Err(BackpressureError::Overflow { capacity: shared.capacity });
        }
      }
    }

    state.queue.push_back(value);
    shared.readable.notify_one();
    Ok(())
  }

  /// Finish the stream with `err` after the queued values.
  pub fn error(mut self, err: E) { self.finish(Terminal::Failed(err)) }

  /// Finish the stream successfully after the queued values.
  pub fn complete(mut self) { self.finish(Terminal::Done) }

  /// Values discarded by the drop strategies so far.
  pub fn dropped(&self) -> usize { self.shared.lock().dropped }

  /// Whether [`next`](Publisher::next) would be rejected as closed.
  pub fn is_closed(&self) -> bool {
    self.shared.lock().is_closed()
  }

  fn finish(&mut self, terminal: Terminal<E>) {
    self.finished = true;
    let mut state = self.shared.lock();
    if state.terminal.is_none() && !state.terminated {
      state.terminal = Some(terminal);
    }
    self.shared.readable.notify_one();
  }
}

impl<T, E> Drop for Publisher<T, E> {
  fn drop(&mut self) {
    if !self.finished {
      self.finish(Terminal::Abandoned);
    }
  }
}

// ============================================================================
// Drain
// ============================================================================

/// Consuming half of a backpressure [`channel`].
pub struct Drain<T, E> {
  shared: Arc<Shared<T, E>>,
}

enum Step<T, E> {
  Value(T),
  End(Terminal<E>),
}

impl<T, E> Drain<T, E> {
  fn step(&self) -> Step<T, E> {
    let shared = &*self.shared;
    let mut state = shared.lock();
    loop {
      if let Some(v) = state.queue.pop_front() {
        shared.writable.notify_one();
        return Step::Value(v);
      }
      if let Some(terminal) = state.terminal.take() {
        state.terminated = true;
        return Step::End(terminal);
      }
      state = shared.readable.wait(state).unwrap_or_else(PoisonError::into_inner);
    }
  }

  /// Deliver queued values to `observer` on the calling thread until the
  /// stream terminates, then deliver the terminal event.
  ///
  /// Returns early if the observer is disposed while draining; the publisher
  /// then sees [`BackpressureError::Closed`].
  pub fn run(self, observer: &mut Observer<'_, T, E>)
  where
    E: From<BackpressureError>,
  {
    loop {
      match self.step() {
        Step::Value(v) => {
          observer.on_next(v);
          if observer.is_disposed() {
            return;
          }
        }
        Step::End(Terminal::Done) => return observer.on_done(),
        Step::End(Terminal::Failed(err)) => return observer.on_error(err),
        Step::End(Terminal::Overflow) => {
          let capacity = self.shared.capacity;
          return observer.on_error(BackpressureError::Overflow { capacity }.into());
        }
        Step::End(Terminal::Abandoned) => {
          trace!("publisher dropped without a terminal event");
          return observer.dispose();
        }
      }
    }
  }
}

impl<T, E> Drop for Drain<T, E> {
  fn drop(&mut self) {
    self.shared.lock().drain_gone = true;
    self.shared.writable.notify_all();
  }
}
