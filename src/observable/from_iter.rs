use std::{convert::Infallible, iter::Once};

use crate::{observable::Observable, observer::Emitter};

/// Creates an observable that produces values from an iterator.
///
/// Completes when all elements have been emitted, or stops early once the
/// downstream is closed. Never emits an error. Each subscription clones the
/// iterator and starts over.
///
/// ```
/// use rxsingle::prelude::*;
///
/// let mut sum = 0;
/// from_iter(0..10).subscribe(Observer::with_next(|v| sum += v));
/// assert_eq!(sum, 45);
/// ```
pub fn from_iter<Iter>(iter: Iter) -> FromIter<Iter>
where
  Iter: IntoIterator + Clone,
{
  FromIter(iter)
}

/// Creates an observable that emits `value` once, then completes.
pub fn of<T: Clone>(value: T) -> Of<T> { from_iter(std::iter::once(value)) }

#[derive(Clone, Debug)]
pub struct FromIter<Iter>(Iter);

pub type Of<T> = FromIter<Once<T>>;

impl<Iter> Observable for FromIter<Iter>
where
  Iter: IntoIterator + Clone,
{
  type Item = Iter::Item;
  type Err = Infallible;

  fn actual_subscribe(&self, emitter: &mut dyn Emitter<Self::Item, Self::Err>) {
    for v in self.0.clone() {
      if emitter.is_closed() {
        return;
      }
      emitter.next(v);
    }
    emitter.complete();
  }
}
