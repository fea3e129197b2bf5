use crate::{observable::Observable, observer::Emitter, optional::Optional};

/// Value extraction returned by [`Single::present`](crate::single::Single::present).
///
/// Forwards the wrapped value of a present optional and nothing for an
/// absent one; completion and errors pass through unchanged.
#[derive(Clone)]
pub struct Present<S> {
  source: S,
}

impl<S> Present<S> {
  pub(crate) fn new(source: S) -> Self { Present { source } }
}

struct PresentEmitter<'e, T, E> {
  down: &'e mut dyn Emitter<T, E>,
}

impl<T, E> Emitter<Optional<T>, E> for PresentEmitter<'_, T, E> {
  fn next(&mut self, value: Optional<T>) {
    if let Some(v) = value.into_option() {
      self.down.next(v)
    }
  }

  fn error(&mut self, err: E) { self.down.error(err) }

  fn complete(&mut self) { self.down.complete() }

  fn is_closed(&self) -> bool { self.down.is_closed() }
}

impl<S, T> Observable for Present<S>
where
  S: Observable<Item = Optional<T>>,
{
  type Item = T;
  type Err = S::Err;

  fn actual_subscribe(&self, emitter: &mut dyn Emitter<T, S::Err>) {
    self.source.actual_subscribe(&mut PresentEmitter { down: emitter });
  }
}
