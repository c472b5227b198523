use hashbrown::HashSet;
use tokio::time::Instant;

use crate::core::TaskId;

// -----------------------------------------------------------------------------
// Wake
// -----------------------------------------------------------------------------

/// Reason a parked poll is released.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub(crate) enum Wake {
  /// A watched sender delivered a message.
  Sender(TaskId),
  /// A watched sender was torn down.
  Defunct(TaskId),
  /// The waiting task itself was torn down.
  Retired,
}

impl Wake {
  /// Returns the watched sender this wake concerns, if any.
  #[inline]
  pub(crate) const fn subject(&self) -> Option<TaskId> {
    match self {
      Self::Sender(task) | Self::Defunct(task) => Some(*task),
      Self::Retired => None,
    }
  }
}

// -----------------------------------------------------------------------------
// Wait State
// -----------------------------------------------------------------------------

/// State of one blocked poll call.
///
/// Created under the caller's state lock when the immediate-match scan comes
/// up empty, and destroyed when the poll resolves. The trigger arms at most
/// once; later matching sends enqueue without waking again.
#[derive(Debug)]
pub(crate) struct WaitState {
  watched: HashSet<TaskId>,
  deadline: Instant,
  wake: Option<Wake>,
}

impl WaitState {
  /// Creates a `WaitState` watching every task in `watch`.
  pub(crate) fn new(watch: &[TaskId], deadline: Instant) -> Self {
    Self {
      watched: watch.iter().copied().collect(),
      deadline,
      wake: None,
    }
  }

  /// Returns the instant this wait gives up.
  #[inline]
  pub(crate) const fn deadline(&self) -> Instant {
    self.deadline
  }

  /// Arms the wake trigger with `wake`.
  ///
  /// A trigger concerning a sender arms only if that sender is watched, and
  /// the first armed trigger wins. Returns `true` if this call armed it.
  pub(crate) fn arm(&mut self, wake: Wake) -> bool {
    if self.wake.is_some() {
      return false;
    }

    if let Some(subject) = wake.subject() {
      if !self.watched.contains(&subject) {
        return false;
      }
    }

    self.wake = Some(wake);

    true
  }

  /// Takes the armed trigger, leaving the wait installed.
  #[inline]
  pub(crate) fn take_wake(&mut self) -> Option<Wake> {
    self.wake.take()
  }

  /// Consumes the wait, returning the armed trigger, if any.
  #[inline]
  pub(crate) fn into_wake(self) -> Option<Wake> {
    self.wake
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  fn wait_on(watch: &[u64]) -> WaitState {
    let watch: Vec<TaskId> = watch.iter().copied().map(TaskId::from_bits).collect();

    WaitState::new(&watch, Instant::now())
  }

  #[test]
  fn test_arm_requires_watched_sender() {
    let mut wait: WaitState = wait_on(&[1, 2]);

    assert!(!wait.arm(Wake::Sender(TaskId::from_bits(3))));
    assert!(wait.take_wake().is_none());

    assert!(wait.arm(Wake::Sender(TaskId::from_bits(2))));
    assert_eq!(wait.take_wake(), Some(Wake::Sender(TaskId::from_bits(2))));
  }

  #[test]
  fn test_first_trigger_wins() {
    let mut wait: WaitState = wait_on(&[1, 2]);

    assert!(wait.arm(Wake::Sender(TaskId::from_bits(1))));
    assert!(!wait.arm(Wake::Sender(TaskId::from_bits(2))));
    assert!(!wait.arm(Wake::Retired));

    assert_eq!(wait.into_wake(), Some(Wake::Sender(TaskId::from_bits(1))));
  }

  #[test]
  fn test_retired_always_arms() {
    let mut wait: WaitState = wait_on(&[1]);

    assert!(wait.arm(Wake::Retired));
    assert_eq!(wait.into_wake(), Some(Wake::Retired));
  }

  #[test]
  fn test_defunct_requires_watched_sender() {
    let mut wait: WaitState = wait_on(&[1]);

    assert!(!wait.arm(Wake::Defunct(TaskId::from_bits(9))));
    assert!(wait.arm(Wake::Defunct(TaskId::from_bits(1))));
  }
}
