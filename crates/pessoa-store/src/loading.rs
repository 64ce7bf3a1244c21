//! Scoped loading flag.
//!
//! Every store operation holds a [`LoadingGuard`] for its whole duration. The
//! guard bumps an in-flight counter on creation and releases it on drop, so
//! the flag is cleared on success, on failure and when the operation's future
//! is dropped mid-flight.

use tokio::sync::watch;

/// State carrying an in-flight counter.
pub(crate) trait InFlight {
  fn in_flight(&mut self) -> &mut usize;
}

pub(crate) struct LoadingGuard<'a, S: InFlight> {
  state: &'a watch::Sender<S>,
}

impl<'a, S: InFlight> LoadingGuard<'a, S> {
  pub(crate) fn acquire(state: &'a watch::Sender<S>) -> Self {
    state.send_modify(|s| *s.in_flight() += 1);
    Self { state }
  }
}

impl<S: InFlight> Drop for LoadingGuard<'_, S> {
  fn drop(&mut self) {
    self.state.send_modify(|s| {
      let n = s.in_flight();
      *n = n.saturating_sub(1);
    });
  }
}
