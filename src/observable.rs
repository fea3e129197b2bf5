//! Observable trait, operator extension and sources
//!
//! An [`Observable`] is a recipe: every
//! [`actual_subscribe`](Observable::actual_subscribe) runs the whole chain
//! again from the source, so subscribing the same built chain twice yields
//! two independent runs with no shared results.

mod create;
mod from_iter;
mod trivial;

pub use create::{create, Create};
pub use from_iter::{from_iter, of, FromIter, Of};
pub use trivial::{empty, throw_err, Empty, ThrowErr};

use crate::{
  observer::{Emitter, Observer},
  ops::{element_at::ElementAt, filter::Filter, map::Map, map::TryMap},
  single::Single,
};

/// A source of values that can be run against any [`Emitter`].
pub trait Observable {
  type Item;
  type Err;

  /// Run the source, pushing every event into `emitter`.
  ///
  /// Sources must stop producing once `emitter.is_closed()` reports `true`
  /// and must send at most one terminal event.
  fn actual_subscribe(&self, emitter: &mut dyn Emitter<Self::Item, Self::Err>);
}

/// Operators and subscription for every [`Observable`].
pub trait ObservableExt: Observable + Sized {
  /// Transform every value with `f`.
  fn map<U, F>(self, f: F) -> Map<Self, F, U>
  where
    F: Fn(Self::Item) -> U,
  {
    Map::new(self, f)
  }

  /// Transform every value with a fallible `f`.
  ///
  /// The first `Err` becomes the stream's terminal error and stops the
  /// upstream.
  fn try_map<U, F>(self, f: F) -> TryMap<Self, F, U>
  where
    F: Fn(Self::Item) -> Result<U, Self::Err>,
  {
    TryMap::new(self, f)
  }

  /// Keep only the values `predicate` accepts.
  fn filter<P>(self, predicate: P) -> Filter<Self, P>
  where
    P: Fn(&Self::Item) -> bool,
  {
    Filter::new(self, predicate)
  }

  /// Select the value at `index` (0-based) as a [`Single`] of
  /// [`Optional`](crate::optional::Optional).
  ///
  /// Emits a present optional and completes as soon as the element arrives;
  /// emits an absent optional if the upstream completes first.
  ///
  /// ```
  /// use rxsingle::prelude::*;
  ///
  /// let mut got = None;
  /// from_iter(vec![1, 2, 3])
  ///   .element_at(1)
  ///   .subscribe(Observer::with_next(|o: Optional<i32>| got = o.into_option()));
  /// assert_eq!(got, Some(2));
  /// ```
  fn element_at(self, index: usize) -> Single<ElementAt<Self>> {
    Single::new(ElementAt::new(self, index))
  }

  /// Shorthand for `element_at(0)`.
  fn first(self) -> Single<ElementAt<Self>> { self.element_at(0) }

  /// Run the chain against `observer` and hand it back, ready for
  /// [`Observer::block`].
  fn subscribe<'a>(
    &self, mut observer: Observer<'a, Self::Item, Self::Err>,
  ) -> Observer<'a, Self::Item, Self::Err> {
    self.actual_subscribe(&mut observer);
    observer
  }
}

impl<O> ObservableExt for O where O: Observable {}
