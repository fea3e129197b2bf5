//! Observer: the terminal consumer of a stream
//!
//! An [`Observer`] owns three handlers (next, error, done), a one-shot
//! completion channel and a backpressure strategy. It accepts any number of
//! values followed by exactly one terminal event; the first terminal event
//! disposes it and resolves its [`Completion`], so a caller can
//! [`block`](Observer::block) until the stream settles.
//!
//! Delivery is synchronous: handlers run on whichever thread calls
//! `on_next`/`on_error`/`on_done`. An observer expects a single producer at a
//! time, which the `&mut self` receivers enforce.

use tracing::{debug, trace};

use crate::{
  backpressure::BackpressureStrategy,
  completion::{completion, Completion, Resolver, Settlement},
};

// ============================================================================
// Emitter Trait
// ============================================================================

/// Push interface every source and operator writes into.
///
/// Sources receive a `&mut dyn Emitter` so they never learn the concrete
/// downstream type: it may be an operator stage or the final [`Observer`].
pub trait Emitter<T, E> {
  fn next(&mut self, value: T);
  fn error(&mut self, err: E);
  fn complete(&mut self);

  /// Returns `true` once the downstream accepts no more values.
  ///
  /// Sources check this to stop producing early, e.g. after `element_at` has
  /// found its element.
  fn is_closed(&self) -> bool;
}

// ============================================================================
// Item
// ============================================================================

/// A unit flowing through a stream: a value or an error.
///
/// Completion is not an item; it is signalled separately through
/// [`Observer::on_done`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item<T, E> {
  Value(T),
  Error(E),
}

impl<T, E> Item<T, E> {
  pub fn is_value(&self) -> bool { matches!(self, Item::Value(_)) }

  pub fn is_error(&self) -> bool { matches!(self, Item::Error(_)) }

  pub fn into_result(self) -> Result<T, E> {
    match self {
      Item::Value(v) => Ok(v),
      Item::Error(e) => Err(e),
    }
  }
}

impl<T, E> From<Result<T, E>> for Item<T, E> {
  fn from(res: Result<T, E>) -> Self {
    match res {
      Ok(v) => Item::Value(v),
      Err(e) => Item::Error(e),
    }
  }
}

// ============================================================================
// Observer
// ============================================================================

// Handlers are `Send` so an observer can be moved onto a producer thread,
// e.g. `thread::spawn(move || source.subscribe(observer))`. Borrowed state
// still works through `&mut` captures; `Rc`/`Cell` state does not.
type NextFn<'a, T> = Box<dyn FnMut(T) + Send + 'a>;
type ErrFn<'a, E> = Box<dyn FnMut(&E) + Send + 'a>;
type DoneFn<'a> = Box<dyn FnMut() + Send + 'a>;

/// Terminal state machine of a stream.
///
/// Built with [`Observer::builder`], [`Observer::new`] or
/// [`Observer::with_next`]. Unset handlers are no-ops, so every observer is
/// safe to drive.
///
/// Values, errors or completions that arrive after disposal never reach a
/// handler. They are counted (see [`dropped`](Observer::dropped)) and logged
/// at `debug` level.
pub struct Observer<'a, T, E> {
  next: NextFn<'a, T>,
  error: ErrFn<'a, E>,
  done: DoneFn<'a>,
  // `None` once disposed: consumed by the terminal write or dropped by
  // `dispose`, which wakes any waiter either way.
  resolver: Option<Resolver<E>>,
  completion: Completion<E>,
  strategy: BackpressureStrategy,
  dropped: usize,
}

impl<'a, T, E> Observer<'a, T, E> {
  /// An observer whose handlers all do nothing.
  pub fn new() -> Self { Self::builder().build() }

  pub fn builder() -> ObserverBuilder<'a, T, E> { ObserverBuilder::default() }

  /// An observer with only a next-handler.
  pub fn with_next<F>(next: F) -> Self
  where
    F: FnMut(T) + Send + 'a,
  {
    Self::builder().on_next(next).build()
  }

  /// Deliver a value to the next-handler.
  ///
  /// Dropped if the observer is disposed. Never disposes the observer.
  pub fn on_next(&mut self, value: T) {
    if self.is_disposed() {
      self.record_drop("next");
      return;
    }
    (self.next)(value);
  }

  /// Deliver the terminal error.
  ///
  /// Runs the error-handler, disposes the observer and resolves the
  /// completion with `err`. A no-op (counted as dropped) if the observer is
  /// already disposed.
  pub fn on_error(&mut self, err: E) {
    if self.is_disposed() {
      self.record_drop("error");
      return;
    }
    (self.error)(&err);
    trace!("observer settled with error");
    self.resolve(Err(err));
  }

  /// Deliver the terminal completion.
  ///
  /// Runs the done-handler, disposes the observer and resolves the
  /// completion with success. A no-op (counted as dropped) if the observer is
  /// already disposed.
  pub fn on_done(&mut self) {
    if self.is_disposed() {
      self.record_drop("done");
      return;
    }
    (self.done)();
    trace!("observer settled with done");
    self.resolve(Ok(()));
  }

  /// Route a tagged item: values to [`on_next`](Observer::on_next), errors to
  /// [`on_error`](Observer::on_error).
  pub fn handle(&mut self, item: Item<T, E>) {
    match item {
      Item::Value(v) => self.on_next(v),
      Item::Error(e) => self.on_error(e),
    }
  }

  /// Dispose without a terminal event.
  ///
  /// Waiters wake with [`Settlement::Disposed`]. Calling it again, or after a
  /// terminal event, does nothing.
  pub fn dispose(&mut self) {
    if self.resolver.take().is_some() {
      trace!("observer disposed before settling");
    }
  }

  pub fn is_disposed(&self) -> bool { self.resolver.is_none() }

  /// Block the calling thread until the stream settles.
  ///
  /// Shorthand for `self.completion().block()`; see [`Completion::block`].
  pub fn block(&self) -> Settlement<E> { self.completion.block() }

  /// A handle on this observer's terminal result.
  ///
  /// Take it before moving the observer to a producer thread to wait on the
  /// result from elsewhere.
  pub fn completion(&self) -> Completion<E> { self.completion.clone() }

  pub fn backpressure_strategy(&self) -> BackpressureStrategy { self.strategy }

  pub fn set_backpressure_strategy(&mut self, strategy: BackpressureStrategy) {
    self.strategy = strategy;
  }

  /// Number of deliveries discarded because they arrived after disposal.
  pub fn dropped(&self) -> usize { self.dropped }

  fn resolve(&mut self, result: Result<(), E>) {
    if let Some(resolver) = self.resolver.take() {
      // The receiver only disappears when a waiter gave up on its future.
      let _ = resolver.send(result);
    }
  }

  fn record_drop(&mut self, kind: &'static str) {
    self.dropped += 1;
    debug!(kind, dropped = self.dropped, "delivery to disposed observer dropped");
  }
}

impl<T, E> Default for Observer<'_, T, E> {
  fn default() -> Self { Self::new() }
}

impl<T, E> std::fmt::Debug for Observer<'_, T, E> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Observer")
      .field("disposed", &self.is_disposed())
      .field("strategy", &self.strategy)
      .field("dropped", &self.dropped)
      .finish()
  }
}

impl<T, E> Emitter<T, E> for Observer<'_, T, E> {
  #[inline]
  fn next(&mut self, value: T) { self.on_next(value) }

  #[inline]
  fn error(&mut self, err: E) { self.on_error(err) }

  #[inline]
  fn complete(&mut self) { self.on_done() }

  #[inline]
  fn is_closed(&self) -> bool { self.is_disposed() }
}

// ============================================================================
// ObserverBuilder
// ============================================================================

/// Builder for [`Observer`] with one named setter per handler role.
///
/// [`inherit`](ObserverBuilder::inherit) adopts every handler and the
/// strategy of an existing observer; setters called afterwards override
/// single handlers. The built observer always gets its own fresh completion
/// channel.
pub struct ObserverBuilder<'a, T, E> {
  next: Option<NextFn<'a, T>>,
  error: Option<ErrFn<'a, E>>,
  done: Option<DoneFn<'a>>,
  strategy: BackpressureStrategy,
}

impl<T, E> Default for ObserverBuilder<'_, T, E> {
  fn default() -> Self {
    ObserverBuilder { next: None, error: None, done: None, strategy: BackpressureStrategy::default() }
  }
}

impl<'a, T, E> ObserverBuilder<'a, T, E> {
  pub fn on_next<F>(mut self, f: F) -> Self
  where
    F: FnMut(T) + Send + 'a,
  {
    self.next = Some(Box::new(f));
    self
  }

  pub fn on_error<F>(mut self, f: F) -> Self
  where
    F: FnMut(&E) + Send + 'a,
  {
    self.error = Some(Box::new(f));
    self
  }

  pub fn on_done<F>(mut self, f: F) -> Self
  where
    F: FnMut() + Send + 'a,
  {
    self.done = Some(Box::new(f));
    self
  }

  pub fn backpressure(mut self, strategy: BackpressureStrategy) -> Self {
    self.strategy = strategy;
    self
  }

  /// Take over the handlers and strategy of `observer`.
  ///
  /// Its completion channel is not carried over; anyone still waiting on the
  /// old observer sees [`Settlement::Disposed`].
  pub fn inherit(mut self, observer: Observer<'a, T, E>) -> Self {
    let Observer { next, error, done, strategy, .. } = observer;
    self.next = Some(next);
    self.error = Some(error);
    self.done = Some(done);
    self.strategy = strategy;
    self
  }

  pub fn build(self) -> Observer<'a, T, E> {
    let (resolver, completion) = completion();
    Observer {
      next: self.next.unwrap_or_else(|| Box::new(|_| {})),
      error: self.error.unwrap_or_else(|| Box::new(|_| {})),
      done: self.done.unwrap_or_else(|| Box::new(|| {})),
      resolver: Some(resolver),
      completion,
      strategy: self.strategy,
      dropped: 0,
    }
  }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
  use std::{
    sync::{
      atomic::{AtomicUsize, Ordering},
      Arc,
    },
    thread,
  };

  use bencher::Bencher;

  use super::*;

  #[rxsingle_macro::test]
  fn done_settles_once() {
    let mut values = vec![];
    let mut done = 0;
    let settlement = {
      let mut observer = Observer::<i32, ()>::builder()
        .on_next(|v| values.push(v))
        .on_done(|| done += 1)
        .build();
      observer.on_next(1);
      observer.on_next(2);
      observer.on_done();
      observer.on_done();
      assert!(observer.is_disposed());
      assert_eq!(observer.dropped(), 1);
      observer.block()
    };
    assert_eq!(settlement, Settlement::Done);
    assert_eq!(values, vec![1, 2]);
    assert_eq!(done, 1);
  }

  #[rxsingle_macro::test]
  fn error_settles_once_and_skips_done() {
    let mut errors = vec![];
    let mut done = 0;
    let settlement = {
      let mut observer = Observer::<i32, &str>::builder()
        .on_error(|e| errors.push(*e))
        .on_done(|| done += 1)
        .build();
      observer.on_next(1);
      observer.on_error("boom");
      observer.on_error("again");
      observer.on_done();
      assert_eq!(observer.dropped(), 2);
      observer.block()
    };
    assert_eq!(settlement, Settlement::Failed("boom"));
    assert_eq!(errors, vec!["boom"]);
    assert_eq!(done, 0);
  }

  #[rxsingle_macro::test]
  fn next_after_terminal_is_dropped() {
    let mut values = vec![];
    {
      let mut observer = Observer::<i32, ()>::with_next(|v| values.push(v));
      observer.on_next(1);
      observer.on_done();
      observer.on_next(2);
      observer.on_next(3);
      assert_eq!(observer.dropped(), 2);
    }
    assert_eq!(values, vec![1]);
  }

  #[rxsingle_macro::test]
  fn manual_dispose_wakes_block() {
    let mut observer = Observer::<i32, ()>::new();
    observer.dispose();
    observer.dispose();
    assert!(observer.is_disposed());
    assert_eq!(observer.block(), Settlement::Disposed);
  }

  #[rxsingle_macro::test]
  fn terminal_after_dispose_is_counted_not_delivered() {
    let mut errors = 0;
    let mut done = 0;
    let settlement = {
      let mut observer = Observer::<i32, &str>::builder()
        .on_error(|_| errors += 1)
        .on_done(|| done += 1)
        .build();
      observer.dispose();
      observer.on_error("late");
      observer.on_done();
      observer.handle(Item::Error("later"));
      assert_eq!(observer.dropped(), 3);
      observer.block()
    };
    assert_eq!(settlement, Settlement::Disposed);
    assert_eq!(errors, 0);
    assert_eq!(done, 0);
  }

  #[rxsingle_macro::test]
  fn second_block_sees_taken() {
    let mut observer = Observer::<i32, &str>::new();
    observer.on_error("boom");
    assert_eq!(observer.block(), Settlement::Failed("boom"));
    assert_eq!(observer.block(), Settlement::Taken);
  }

  #[rxsingle_macro::test]
  fn dropped_observer_reads_as_disposed() {
    let completion = Observer::<i32, ()>::new().completion();
    assert_eq!(completion.block(), Settlement::Disposed);
  }

  #[rxsingle_macro::test]
  fn handle_routes_by_variant() {
    let mut values = vec![];
    let mut errors = vec![];
    {
      let mut observer = Observer::builder()
        .on_next(|v: i32| values.push(v))
        .on_error(|e: &String| errors.push(e.clone()))
        .build();
      observer.handle(Item::Value(7));
      observer.handle(Item::from(Err("bad".to_string())));
      observer.handle(Item::Value(8));
    }
    assert_eq!(values, vec![7]);
    assert_eq!(errors, vec!["bad".to_string()]);
  }

  #[rxsingle_macro::test]
  fn inherit_keeps_handlers_and_strategy() {
    let nexts = Arc::new(AtomicUsize::new(0));
    let dones = Arc::new(AtomicUsize::new(0));
    let c_nexts = nexts.clone();
    let c_dones = dones.clone();
    let base = Observer::<i32, ()>::builder()
      .on_next(move |_| {
        c_nexts.fetch_add(1, Ordering::SeqCst);
      })
      .backpressure(BackpressureStrategy::DropOldest)
      .build();
    let old = base.completion();

    let mut derived = Observer::builder()
      .inherit(base)
      .on_done(move || {
        c_dones.fetch_add(1, Ordering::SeqCst);
      })
      .build();
    assert_eq!(derived.backpressure_strategy(), BackpressureStrategy::DropOldest);
    assert_eq!(old.block(), Settlement::Disposed);

    derived.on_next(1);
    derived.on_done();
    assert_eq!(nexts.load(Ordering::SeqCst), 1);
    assert_eq!(dones.load(Ordering::SeqCst), 1);
    assert_eq!(derived.block(), Settlement::Done);
  }

  #[rxsingle_macro::test]
  fn strategy_is_stored_not_enforced() {
    let mut observer = Observer::<i32, ()>::new();
    assert_eq!(observer.backpressure_strategy(), BackpressureStrategy::Block);
    observer.set_backpressure_strategy(BackpressureStrategy::Error);
    assert_eq!(observer.backpressure_strategy(), BackpressureStrategy::Error);
    for v in 0..1000 {
      observer.on_next(v);
    }
    assert!(!observer.is_disposed());
  }

  #[cfg(not(target_arch = "wasm32"))]
  #[rxsingle_macro::test]
  fn block_waits_for_producer_thread() {
    let sum = Arc::new(AtomicUsize::new(0));
    let c_sum = sum.clone();
    let mut observer = Observer::<usize, String>::with_next(move |v| {
      c_sum.fetch_add(v, Ordering::SeqCst);
    });
    let completion = observer.completion();

    let producer = thread::spawn(move || {
      for v in 1..=10 {
        observer.on_next(v);
      }
      observer.on_error("late failure".to_string());
    });

    assert_eq!(completion.block(), Settlement::Failed("late failure".to_string()));
    producer.join().unwrap();
    assert_eq!(sum.load(Ordering::SeqCst), 55);
  }

  #[cfg(not(target_arch = "wasm32"))]
  #[rxsingle_macro::test(threaded)]
  async fn settled_resolves_from_another_thread() {
    let mut observer = Observer::<i32, ()>::new();
    let settled = observer.completion().settled();
    thread::spawn(move || {
      observer.on_next(1);
      observer.on_done();
    });
    assert_eq!(settled.await, Settlement::Done);
  }

  #[rxsingle_macro::test]
  fn bench() { bencher::bench::run_once(bench_observer_delivery); }

  fn bench_observer_delivery(b: &mut Bencher) {
    b.iter(|| {
      let mut hits = 0;
      {
        let mut observer = Observer::<i32, ()>::with_next(|_| hits += 1);
        (0..100).for_each(|v| observer.on_next(v));
        observer.on_done();
      }
      assert_eq!(hits, 100);
    });
  }
}
