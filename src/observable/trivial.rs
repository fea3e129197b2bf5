use std::{convert::Infallible, marker::PhantomData};

use crate::{observable::Observable, observer::Emitter};

/// Creates an observable that emits no values and completes immediately.
pub fn empty<T>() -> Empty<T> { Empty(PhantomData) }

/// Creates an observable that emits no values and fails with `err`.
///
/// Every subscription receives a clone of `err`.
pub fn throw_err<T, E: Clone>(err: E) -> ThrowErr<T, E> { ThrowErr { err, _marker: PhantomData } }

#[derive(Clone, Copy)]
pub struct Empty<T>(PhantomData<fn() -> T>);

impl<T> Observable for Empty<T> {
  type Item = T;
  type Err = Infallible;

  fn actual_subscribe(&self, emitter: &mut dyn Emitter<T, Infallible>) { emitter.complete() }
}

#[derive(Clone)]
pub struct ThrowErr<T, E> {
  err: E,
  _marker: PhantomData<fn() -> T>,
}

impl<T, E: Clone> Observable for ThrowErr<T, E> {
  type Item = T;
  type Err = E;

  fn actual_subscribe(&self, emitter: &mut dyn Emitter<T, E>) { emitter.error(self.err.clone()) }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;

  #[rxsingle_macro::test]
  fn empty_completes() {
    let mut hits = 0;
    let settlement = empty::<i32>().subscribe(Observer::with_next(|_| hits += 1)).block();
    assert_eq!(settlement, Settlement::Done);
    assert_eq!(hits, 0);
  }

  #[rxsingle_macro::test]
  fn throw_err_fails_every_subscription() {
    let source = throw_err::<i32, _>("nope");
    assert_eq!(source.subscribe(Observer::new()).block(), Settlement::Failed("nope"));
    assert_eq!(source.subscribe(Observer::new()).block(), Settlement::Failed("nope"));
  }
}
