use tracing::trace;

use crate::{observable::Observable, observer::Emitter, optional::Optional};

/// Positional selection returned by
/// [`element_at`](crate::observable::ObservableExt::element_at).
///
/// Turns a stream of any length into at most one [`Optional`] followed by
/// completion. Once the element is found the upstream sees a closed emitter
/// and the rest of its events are ignored.
#[derive(Clone)]
pub struct ElementAt<S> {
  source: S,
  index: usize,
}

impl<S> ElementAt<S> {
  pub(crate) fn new(source: S, index: usize) -> Self { ElementAt { source, index } }
}

struct ElementAtEmitter<'e, T, E> {
  down: &'e mut dyn Emitter<Optional<T>, E>,
  remaining: usize,
  decided: bool,
}

impl<T, E> Emitter<T, E> for ElementAtEmitter<'_, T, E> {
  fn next(&mut self, value: T) {
    if self.decided {
      return;
    }
    if self.remaining > 0 {
      self.remaining -= 1;
      return;
    }
    self.decided = true;
    self.down.next(Optional::of(value));
    self.down.complete();
  }

  fn error(&mut self, err: E) {
    if !self.decided {
      self.decided = true;
      self.down.error(err);
    }
  }

  fn complete(&mut self) {
    if !self.decided {
      self.decided = true;
      trace!(
        short_by = self.remaining.saturating_add(1),
        "upstream completed before element was reached"
      );
      self.down.next(Optional::empty());
      self.down.complete();
    }
  }

  fn is_closed(&self) -> bool { self.decided || self.down.is_closed() }
}

impl<S> Observable for ElementAt<S>
where
  S: Observable,
{
  type Item = Optional<S::Item>;
  type Err = S::Err;

  fn actual_subscribe(&self, emitter: &mut dyn Emitter<Optional<S::Item>, S::Err>) {
    self.source.actual_subscribe(&mut ElementAtEmitter {
      down: emitter,
      remaining: self.index,
      decided: false,
    });
  }
}
