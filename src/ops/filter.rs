use crate::{observable::Observable, observer::Emitter, optional::Optional};

/// Observable returned by [`filter`](crate::observable::ObservableExt::filter).
#[derive(Clone)]
pub struct Filter<S, P> {
  source: S,
  predicate: P,
}

impl<S, P> Filter<S, P> {
  pub(crate) fn new(source: S, predicate: P) -> Self { Filter { source, predicate } }
}

struct FilterEmitter<'e, P, T, E> {
  down: &'e mut dyn Emitter<T, E>,
  predicate: &'e P,
}

impl<T, E, P> Emitter<T, E> for FilterEmitter<'_, P, T, E>
where
  P: Fn(&T) -> bool,
{
  fn next(&mut self, value: T) {
    if (self.predicate)(&value) {
      self.down.next(value)
    }
  }

  fn error(&mut self, err: E) { self.down.error(err) }

  fn complete(&mut self) { self.down.complete() }

  fn is_closed(&self) -> bool { self.down.is_closed() }
}

impl<S, P> Observable for Filter<S, P>
where
  S: Observable,
  P: Fn(&S::Item) -> bool,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe(&self, emitter: &mut dyn Emitter<S::Item, S::Err>) {
    self.source.actual_subscribe(&mut FilterEmitter { down: emitter, predicate: &self.predicate });
  }
}

/// Filter over a stream of [`Optional`]s, returned by
/// [`Single::filter`](crate::single::Single::filter).
///
/// The predicate sees the wrapped value only when present. A rejected value
/// is forwarded as an absent optional, never dropped and never an error.
#[derive(Clone)]
pub struct FilterOptional<S, P> {
  source: S,
  predicate: P,
}

impl<S, P> FilterOptional<S, P> {
  pub(crate) fn new(source: S, predicate: P) -> Self { FilterOptional { source, predicate } }
}

struct FilterOptionalEmitter<'e, P, T, E> {
  down: &'e mut dyn Emitter<Optional<T>, E>,
  predicate: &'e P,
}

impl<T, E, P> Emitter<Optional<T>, E> for FilterOptionalEmitter<'_, P, T, E>
where
  P: Fn(&T) -> bool,
{
  fn next(&mut self, value: Optional<T>) {
    let predicate = self.predicate;
    self.down.next(value.filter(|v| predicate(v)))
  }

  fn error(&mut self, err: E) { self.down.error(err) }

  fn complete(&mut self) { self.down.complete() }

  fn is_closed(&self) -> bool { self.down.is_closed() }
}

impl<S, P, T> Observable for FilterOptional<S, P>
where
  S: Observable<Item = Optional<T>>,
  P: Fn(&T) -> bool,
{
  type Item = Optional<T>;
  type Err = S::Err;

  fn actual_subscribe(&self, emitter: &mut dyn Emitter<Optional<T>, S::Err>) {
    self
      .source
      .actual_subscribe(&mut FilterOptionalEmitter { down: emitter, predicate: &self.predicate });
  }
}

#[cfg(test)]
mod tests {
  use super::FilterOptional;
  use crate::prelude::*;

  #[rxsingle_macro::test]
  fn keeps_even_numbers() {
    let mut coll = vec![];
    from_iter(0..10).filter(|v| *v % 2 == 0).subscribe(Observer::with_next(|v| coll.push(v)));
    assert_eq!(coll, vec![0, 2, 4, 6, 8]);
  }

  #[rxsingle_macro::test]
  fn forwards_terminal_error() {
    let settlement = throw_err::<i32, _>("bad").filter(|_| true).subscribe(Observer::new()).block();
    assert_eq!(settlement, Settlement::Failed("bad"));
  }

  #[rxsingle_macro::test]
  fn optional_filter_rewraps() {
    let mut got = vec![];
    let source = from_iter(vec![Optional::of(1), Optional::of(2), Optional::empty()]);
    FilterOptional::new(source, |v: &i32| *v == 2).subscribe(Observer::with_next(|o| got.push(o)));
    assert_eq!(got, vec![Optional::empty(), Optional::of(2), Optional::empty()]);
  }
}
