//! Single: a stage that delivers at most one value before completing
//!
//! A [`Single`] wraps an observable that is known to emit no more than one
//! value, such as the output of
//! [`element_at`](crate::observable::ObservableExt::element_at) or
//! [`Single::of`]. Operators on it keep that guarantee. Like every
//! observable chain it holds no results: each [`subscribe`](Single::subscribe)
//! runs the upstream and every transform again.
//!
//! ```
//! use rxsingle::prelude::*;
//!
//! let mut got = 0;
//! let settlement = from_iter(vec![1, 2, 3])
//!   .element_at(1)
//!   .filter(|v| *v == 2)
//!   .present()
//!   .map(|v| v + 10)
//!   .subscribe(Observer::with_next(|v| got = v))
//!   .block();
//! assert_eq!(settlement, Settlement::Done);
//! assert_eq!(got, 12);
//! ```

use std::iter::Once;

use crate::{
  observable::{of, FromIter, Observable},
  observer::{Emitter, Observer},
  ops::{
    filter::FilterOptional,
    map::{Map, TryMap},
    present::Present,
  },
  optional::Optional,
};

#[derive(Clone, Debug)]
pub struct Single<S>(S);

impl<T: Clone> Single<FromIter<Once<T>>> {
  /// A single emitting `value`, then completing.
  pub fn of(value: T) -> Self { Single(of(value)) }
}

impl<S> Single<S> {
  pub(crate) fn new(source: S) -> Self { Single(source) }

  pub fn into_inner(self) -> S { self.0 }
}

impl<S: Observable> Single<S> {
  /// Transform the value, if one arrives.
  pub fn map<U, F>(self, f: F) -> Single<Map<S, F, U>>
  where
    F: Fn(S::Item) -> U,
  {
    Single(Map::new(self.0, f))
  }

  /// Transform the value with a fallible function; `Err` becomes the
  /// terminal error.
  pub fn try_map<U, F>(self, f: F) -> Single<TryMap<S, F, U>>
  where
    F: Fn(S::Item) -> Result<U, S::Err>,
  {
    Single(TryMap::new(self.0, f))
  }

  /// Run the chain against `observer` and hand it back, ready for
  /// [`Observer::block`].
  pub fn subscribe<'a>(
    &self, mut observer: Observer<'a, S::Item, S::Err>,
  ) -> Observer<'a, S::Item, S::Err> {
    self.0.actual_subscribe(&mut observer);
    observer
  }
}

impl<S, T> Single<S>
where
  S: Observable<Item = Optional<T>>,
{
  /// Apply `predicate` to the wrapped value and re-wrap the outcome.
  ///
  /// A rejected or absent value yields an absent optional downstream.
  pub fn filter<P>(self, predicate: P) -> Single<FilterOptional<S, P>>
  where
    P: Fn(&T) -> bool,
  {
    Single(FilterOptional::new(self.0, predicate))
  }

  /// Unwrap the optional: a present value is forwarded as is, an absent one
  /// forwards nothing. Completion follows either way.
  pub fn present(self) -> Single<Present<S>> { Single(Present::new(self.0)) }
}

impl<S: Observable> Observable for Single<S> {
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe(&self, emitter: &mut dyn Emitter<S::Item, S::Err>) {
    self.0.actual_subscribe(emitter)
  }
}
