use std::marker::PhantomData;

use crate::{observable::Observable, observer::Emitter};

/// Observable returned by [`map`](crate::observable::ObservableExt::map).
#[derive(Clone)]
pub struct Map<S, F, U> {
  source: S,
  func: F,
  _p: PhantomData<fn() -> U>,
}

impl<S, F, U> Map<S, F, U> {
  pub(crate) fn new(source: S, func: F) -> Self { Map { source, func, _p: PhantomData } }
}

struct MapEmitter<'e, F, U, E> {
  down: &'e mut dyn Emitter<U, E>,
  func: &'e F,
}

impl<T, U, E, F> Emitter<T, E> for MapEmitter<'_, F, U, E>
where
  F: Fn(T) -> U,
{
  fn next(&mut self, value: T) { self.down.next((self.func)(value)) }

  fn error(&mut self, err: E) { self.down.error(err) }

  fn complete(&mut self) { self.down.complete() }

  fn is_closed(&self) -> bool { self.down.is_closed() }
}

impl<S, F, U> Observable for Map<S, F, U>
where
  S: Observable,
  F: Fn(S::Item) -> U,
{
  type Item = U;
  type Err = S::Err;

  fn actual_subscribe(&self, emitter: &mut dyn Emitter<U, S::Err>) {
    self.source.actual_subscribe(&mut MapEmitter { down: emitter, func: &self.func });
  }
}

/// Observable returned by [`try_map`](crate::observable::ObservableExt::try_map).
#[derive(Clone)]
pub struct TryMap<S, F, U> {
  source: S,
  func: F,
  _p: PhantomData<fn() -> U>,
}

impl<S, F, U> TryMap<S, F, U> {
  pub(crate) fn new(source: S, func: F) -> Self { TryMap { source, func, _p: PhantomData } }
}

struct TryMapEmitter<'e, F, U, E> {
  down: &'e mut dyn Emitter<U, E>,
  func: &'e F,
  failed: bool,
}

impl<T, U, E, F> Emitter<T, E> for TryMapEmitter<'_, F, U, E>
where
  F: Fn(T) -> Result<U, E>,
{
  fn next(&mut self, value: T) {
    if self.failed {
      return;
    }
    match (self.func)(value) {
      Ok(v) => self.down.next(v),
      Err(err) => {
        self.failed = true;
        self.down.error(err);
      }
    }
  }

  fn error(&mut self, err: E) {
    if !self.failed {
      self.down.error(err)
    }
  }

  fn complete(&mut self) {
    if !self.failed {
      self.down.complete()
    }
  }

  fn is_closed(&self) -> bool { self.failed || self.down.is_closed() }
}

impl<S, F, U> Observable for TryMap<S, F, U>
where
  S: Observable,
  F: Fn(S::Item) -> Result<U, S::Err>,
{
  type Item = U;
  type Err = S::Err;

  fn actual_subscribe(&self, emitter: &mut dyn Emitter<U, S::Err>) {
    self.source.actual_subscribe(&mut TryMapEmitter {
      down: emitter,
      func: &self.func,
      failed: false,
    });
  }
}

#[cfg(test)]
mod tests {
  use std::cell::Cell;

  use float_cmp::approx_eq;

  use crate::prelude::*;

  #[rxsingle_macro::test]
  fn primitive_type() {
    let mut i = 0;
    from_iter(100..101).map(|v| v * 2).subscribe(Observer::with_next(|v| i += v));
    assert_eq!(i, 200);
  }

  #[rxsingle_macro::test]
  fn map_types_mixed() {
    let mut i = 0;
    from_iter(vec!['a', 'b', 'c']).map(|_v| 1).subscribe(Observer::with_next(|v| i += v));
    assert_eq!(i, 3);
  }

  #[rxsingle_macro::test]
  fn map_to_float() {
    let mut total = 0.0;
    from_iter(vec![1, 2, 3]).map(|v| v as f64 / 10.).subscribe(Observer::with_next(|v| total += v));
    assert!(approx_eq!(f64, total, 0.6, epsilon = 1e-9));
  }

  #[rxsingle_macro::test]
  fn try_map_failure_stops_upstream() {
    let mut seen = vec![];
    let pulled = Cell::new(0);
    let source = create(|emitter: &mut dyn Emitter<i32, String>| {
      for v in 0..10 {
        if emitter.is_closed() {
          break;
        }
        pulled.set(pulled.get() + 1);
        emitter.next(v);
      }
      emitter.complete();
    });
    let settlement = source
      .try_map(|v| if v < 3 { Ok(v) } else { Err(format!("{v} is too large")) })
      .subscribe(Observer::with_next(|v| seen.push(v)))
      .block();

    assert_eq!(settlement, Settlement::Failed("3 is too large".to_string()));
    assert_eq!(seen, vec![0, 1, 2]);
    assert_eq!(pulled.get(), 4);
  }
}
